fn main() {
    // Only emit link directives when the native feature is enabled
    if std::env::var("CARGO_FEATURE_NATIVE").is_ok() {
        // The engine library is not distributed with this crate; point the
        // linker at it with OSCACHE_ENGINE_DIR (falls back to the default
        // search path when unset).
        if let Ok(dir) = std::env::var("OSCACHE_ENGINE_DIR") {
            println!("cargo:rustc-link-search=native={dir}");
        }
        println!("cargo:rustc-link-lib=dylib=osrscache");
    }

    // Rerun if the engine location or the binding source changes
    println!("cargo:rerun-if-env-changed=OSCACHE_ENGINE_DIR");
    println!("cargo:rerun-if-changed=src/native.rs");
}
