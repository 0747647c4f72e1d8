use std::process::ExitCode;

use kronos_predict::infra::{self, config::AppConfig};

fn main() -> ExitCode {
    let level = AppConfig::from_env_and_toml()
        .map(|cfg| cfg.log_level)
        .unwrap_or_else(|_| "info".to_string());
    infra::logging::init_with_default(&level);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "BOOT kronos-predict");

    kronos_predict::cli::run()
}
