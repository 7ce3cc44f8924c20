use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=WAP_LIB_DIR");

    // An explicit directory wins over pkg-config, for engines built out of tree.
    if let Ok(dir) = env::var("WAP_LIB_DIR") {
        println!("cargo:rustc-link-search=native={dir}");
        println!("cargo:rustc-link-lib=wap_audio_processing");
        return;
    }

    if let Err(e) = pkg_config::Config::new()
        .atleast_version("0.1")
        .probe("wap-audio-processing")
    {
        // Without the engine the declarations still type-check; only a
        // binary that actually calls into the engine fails to link.
        println!("cargo:warning=wap-audio-processing not found: {e}");
    }
}
