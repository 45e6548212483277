use std::env;
use std::process::Command;

/// Stamps `VALIDATE_AGENTS_VERSION`. Release builds carry the package
/// version as-is; debug builds get a `-dev+<commit>` suffix so reports
/// from local builds can be told apart.
fn main() -> Result<(), env::VarError> {
    let version = env::var("CARGO_PKG_VERSION")?;
    let stamped = match env::var("PROFILE")?.as_str() {
        "release" => version,
        _ => format!("{}-dev+{}", version, commit_label()),
    };

    println!("cargo:rustc-env=VALIDATE_AGENTS_VERSION={}", stamped);
    for watched in [".git/HEAD", ".git/index", ".git/refs/heads/"] {
        println!("cargo:rerun-if-changed={}", watched);
    }
    Ok(())
}

/// Short commit id, with `.dirty` appended when the tree has local edits.
/// Falls back to `unknown` outside a git checkout.
fn commit_label() -> String {
    git(&["describe", "--always", "--abbrev=8", "--dirty=.dirty", "--exclude=*"])
        .unwrap_or_else(|| "unknown".to_string())
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}
