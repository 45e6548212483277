// Compile-time constants from Cargo.toml and build.rs
pub const VERSION: &str = env!("VALIDATE_AGENTS_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Name and version as printed by `config show`.
pub fn long_version() -> String {
    format!("{} {}", PKG_NAME, VERSION)
}
