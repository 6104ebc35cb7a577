use std::env;
use std::fs;
use std::path::PathBuf;

// Records the cargo features this build was compiled with, for `crud-usage version`.
fn main() {
    let out = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR"));
    let mut features: Vec<String> = env::vars()
        .filter_map(|(k, _)| k.strip_prefix("CARGO_FEATURE_").map(|n| n.to_ascii_lowercase().replace('_', "-")))
        .filter(|n| n != "default")
        .collect();
    features.sort();
    let list = features.iter().map(|s| format!("\"{s}\"")).collect::<Vec<_>>().join(", ");
    let content = format!("pub static COMPILED_FEATURES: &[&str] = &[{list}];\n");
    fs::write(out.join("compiled_features.rs"), content).expect("write compiled_features.rs");
    println!("cargo:rerun-if-changed=build.rs");
}
