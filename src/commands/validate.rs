use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::{Result, ValidatorError};
use crate::validation::{ValidationReport, Validator};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::Write;
use std::path::Path;

/// Validate the configured path and emit the report.
///
/// Returns whether every file passed.
pub fn execute(config: &Config) -> Result<bool> {
    let rules = config.rule_set();
    let target = config.target_path();
    let validator = Validator::new(&rules);

    let discovery = validator.collect_files(&target)?;
    if discovery.is_empty() && !config.allow_empty {
        return Err(ValidatorError::NoAgentFiles(target));
    }

    let show_progress = config.format == OutputFormat::Human && !config.quiet && discovery.len() > 1;
    let pb = make_progress_bar(show_progress, discovery.len() as u64);

    let report = validator.validate_files(&target, &discovery, |file| {
        pb.set_message(file_label(&file.path));
        pb.inc(1);
    });
    pb.finish_and_clear();

    let rendered = render(&report, config)?;
    match &config.output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            tracing::info!(path = %path.display(), "wrote report");
            if config.format == OutputFormat::Human && !config.quiet {
                println!("Report written to {}", path.display());
            }
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(report.all_passed())
}

pub fn render(report: &ValidationReport, config: &Config) -> Result<String> {
    match config.format {
        OutputFormat::Json => {
            let mut json = report.to_json()?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Human => {
            if report.is_empty() {
                return Ok(format!(
                    "No agent definitions found under {}\n",
                    report.root.display()
                ));
            }
            Ok(report.render_human(config.quiet))
        }
    }
}

fn make_progress_bar(visible: bool, len: u64) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    // Draws nothing when stderr is not a terminal.
    let pb = ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
