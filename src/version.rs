//! Build and version information printed at startup.

/// Crate version, e.g. "0.1.0".
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Lines printed before anything else runs.
pub fn version_statement() -> Vec<String> {
    vec![
        format!(
            "edge-bootstrap {} ({}/{})",
            version(),
            std::env::consts::OS,
            std::env::consts::ARCH
        ),
        "Configuration bootstrap for the edge proxy engine.".to_string(),
    ]
}
