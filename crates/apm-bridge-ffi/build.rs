use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR"));
    let include_dir = crate_dir.join("include");

    for path in [
        "src/lib.rs",
        "src/types.rs",
        "src/functions.rs",
        "cbindgen.toml",
    ] {
        println!("cargo::rerun-if-changed={path}");
    }

    fs::create_dir_all(&include_dir).expect("failed to create include/ directory");

    let config = cbindgen::Config::from_file(crate_dir.join("cbindgen.toml"))
        .expect("failed to read cbindgen.toml");

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(include_dir.join("apm_bridge.h"));
        }
        // Packaging can run before the workspace crates resolve; keep the
        // previously generated header in that case.
        Err(e) => println!("cargo::warning=header generation skipped: {e}"),
    }
}
