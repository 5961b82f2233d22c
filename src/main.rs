/// JadeScroll terminal session for native builds
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use jadescroll::AppConfig;

    let config = AppConfig::load_from_default_path().unwrap_or_default();

    // RUST_LOG overrides the configured level
    env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let first_run = AppConfig::default_path().is_some_and(|path| !path.exists());
    if first_run {
        config
            .save_to_default_path()
            .unwrap_or_else(|e| log::warn!("Could not write default config: {}", e));
    }

    if let Err(e) = jadescroll::native::run(config) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
