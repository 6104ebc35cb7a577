use serde::Serialize;

mod built {
    include!(concat!(env!("OUT_DIR"), "/compiled_features.rs"));
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionReport {
    pub package_name: String,
    pub package_version: String,
    /// Cargo features, e.g. wire compressors forwarded to the driver.
    pub compiled_features: Vec<String>,
}

pub fn version() -> VersionReport {
    VersionReport {
        package_name: env!("CARGO_PKG_NAME").to_string(),
        package_version: env!("CARGO_PKG_VERSION").to_string(),
        compiled_features: built::COMPILED_FEATURES.iter().map(|s| s.to_string()).collect(),
    }
}
