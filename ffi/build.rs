use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()));
    let config = cbindgen::Config {
        language: cbindgen::Language::C,
        include_guard: Some("ACTIVITY_LOG_H".to_string()),
        ..Default::default()
    };

    // A failed header generation leaves the previous header in place.
    if let Ok(bindings) = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        bindings.write_to_file(crate_dir.join("include").join("activity_log.h"));
    }
}
