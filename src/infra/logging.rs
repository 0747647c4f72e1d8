pub fn init() {
    init_with_default("info");
}

/// Install the global subscriber once. `RUST_LOG` wins over `default`.
/// Logs go to stderr so stdout stays reserved for command output.
pub fn init_with_default(default: &str) {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default.to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Simple helper to log a metrics-like line until a real sink/exporter is added.
pub fn log_metric(component: &str, metric: &str, value: f64) {
    tracing::info!(component = component, metric = metric, value = value, "metric");
}
