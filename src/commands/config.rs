use crate::cli::ConfigCommands;
use crate::config::{Config, CONFIG_FILE_NAME};
use crate::error::Result;
use crate::version;
use std::path::Path;

pub fn execute(command: &ConfigCommands, explicit: Option<&Path>) -> Result<()> {
    let cwd = std::env::current_dir()?;
    match command {
        ConfigCommands::Validate { file } => validate(&cwd, file.as_deref().or(explicit)),
        ConfigCommands::Show => show(&cwd, explicit),
    }
}

fn validate(cwd: &Path, explicit: Option<&Path>) -> Result<()> {
    let project_config = cwd.join(CONFIG_FILE_NAME);

    println!("Validating configuration files...\n");

    match Config::global_config_path() {
        Some(global_config) if global_config.exists() => {
            println!("  Global config: {}", global_config.display());
        }
        Some(global_config) => {
            println!(
                "  Global config: {} - not found (optional)",
                global_config.display()
            );
        }
        None => println!("  Global config: HOME is not set - skipped"),
    }

    if project_config.exists() {
        println!("  Project config: {}", project_config.display());
    } else {
        println!(
            "  Project config: {} - not found (optional)",
            project_config.display()
        );
    }

    if let Some(explicit) = explicit {
        println!("  Explicit config: {}", explicit.display());
    }

    // Loading the merged config validates every file
    println!("\nLoading and validating configuration...");
    match Config::load(cwd, explicit) {
        Ok(_) => {
            println!("✓ Configuration is valid!");
            Ok(())
        }
        Err(e) => {
            println!("✗ Configuration is invalid!");
            println!("  Error: {}", e);
            Err(e)
        }
    }
}

fn show(cwd: &Path, explicit: Option<&Path>) -> Result<()> {
    let config = Config::load(cwd, explicit)?;
    print!("{}", describe(&config));
    Ok(())
}

/// The effective configuration in the order a reader would look for it.
fn describe(config: &Config) -> String {
    let rules = config.rule_set();
    let mut lines = vec![
        format!("Effective Configuration ({}):", version::long_version()),
        "(CLI > Environment > --config > Project config > Global config > Defaults)".to_string(),
        String::new(),
        format!("path: {}", config.path),
        format!("strict: {}", config.strict),
        format!("naming: {}", config.naming.as_str()),
        format!("parser: {}", config.parser.as_str()),
        format!("allow_empty: {}", config.allow_empty),
        format!("unique_names: {}", config.unique_names),
        String::new(),
        "Rules:".to_string(),
        format!("  required_fields: {}", rules.required_fields.join(", ")),
        format!("  known_tools: {}", rules.known_tools.join(", ")),
    ];

    if !rules.exclude.is_empty() {
        lines.push(format!("  exclude: {}", rules.exclude.join(", ")));
    }

    lines.push(format!("  content_checks: {}", rules.content_checks));
    if rules.content_checks {
        lines.push(format!(
            "  require_proactive_hint: {}",
            rules.require_proactive_hint
        ));
        lines.push(format!(
            "  description: {}-{} chars",
            rules.description_min_chars, rules.description_max_chars
        ));
        lines.push(format!(
            "  body: {}-{} chars",
            rules.body_min_chars, rules.body_max_chars
        ));
        lines.push(format!(
            "  recommended_sections: {}",
            rules.recommended_sections.join(", ")
        ));
    }
    lines.push(format!("  max_tools: {}", rules.max_tools));

    lines.push(String::new());
    lines.push("Logging:".to_string());
    lines.push(format!("  level: {}", config.logging.level));
    lines.push(format!("  format: {}", config.logging.format));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
