//! Version information for the devbox CLI.

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `devbox <version>`
pub fn version_string() -> String {
    format!("devbox {}", VERSION)
}
