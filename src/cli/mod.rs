use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::core::array::ResultArray;
use crate::core::error::SmokeError;
use crate::domain::{Observation, PredictionRequest, PredictionResult, Real, TargetKind};
use crate::infra::config::AppConfig;
use crate::infra::logging::log_metric;
use crate::plugins::{PluginRegistry, RealtimeModelInstance};
use crate::smoke::run_smoke_with;

#[derive(Parser)]
#[command(name = "kronos-predict")]
#[command(about = "KronosPredict - forecasting runtime smoke test and admin CLI")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the torch_demo smoke test (default)
    Smoke,
    /// Print a random 2x3 demo tensor
    Demo,
    /// Feed observations to a plugin model and print its prediction as JSON
    Predict {
        /// Plugin name or library path (defaults to configured plugin)
        #[arg(short, long)]
        plugin: Option<String>,
        /// Model config as a JSON object
        #[arg(short, long)]
        config: Option<String>,
        /// Comma-separated endogenous values; repeat for each observation
        #[arg(long = "obs", required = true)]
        observations: Vec<String>,
        /// Target kind to predict
        #[arg(short, long, default_value = "return")]
        target: TargetKind,
        #[arg(long, default_value_t = 1)]
        steps_ahead: i32,
        /// Skip uncertainty estimates
        #[arg(long)]
        no_uncertainty: bool,
    },
    /// Show the effective configuration, or validate it with --validate
    Config {
        /// Validate config without running anything
        #[arg(long)]
        validate: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    run_commands(cli.command.unwrap_or(Commands::Smoke))
}

pub fn run_commands(command: Commands) -> ExitCode {
    match command {
        Commands::Smoke => smoke_exit(crate::demo::torch_demo_array),
        Commands::Demo => {
            print!("{}", render_demo(&crate::demo::torch_demo()));
            ExitCode::SUCCESS
        }
        Commands::Predict {
            plugin,
            config,
            observations,
            target,
            steps_ahead,
            no_uncertainty,
        } => {
            let req = PredictionRequest {
                target_kind: target,
                steps_ahead,
                want_uncertainty: !no_uncertainty,
            };
            match predict(plugin, config.as_deref(), &observations, &req) {
                Ok(result) => match serde_json::to_string_pretty(&result) {
                    Ok(s) => {
                        println!("{s}");
                        ExitCode::SUCCESS
                    }
                    Err(e) => {
                        eprintln!("❌ Failed to encode prediction: {}", e);
                        ExitCode::FAILURE
                    }
                },
                Err(e) => {
                    eprintln!("❌ Prediction failed: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Config { validate: true } => match validate_config() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Configuration validation failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Config { validate: false } => match show_config() {
            Ok(summary) => {
                print!("{summary}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

/// Run the smoke check against `entry` on stdout and map the outcome to an exit code.
pub fn smoke_exit<F>(entry: F) -> ExitCode
where
    F: FnOnce() -> anyhow::Result<ResultArray>,
{
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    match run_smoke_with(entry, &mut lock) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", smoke_failure_message(&e));
            ExitCode::FAILURE
        }
    }
}

fn smoke_failure_message(e: &SmokeError) -> String {
    match e {
        SmokeError::ShapeMismatch { .. } | SmokeError::DtypeMismatch { .. } => {
            format!("AssertionError: {e}")
        }
        SmokeError::ExternalCall(_) => format!("❌ torch_demo failed: {e}"),
        SmokeError::Io(_) => format!("❌ {e}"),
    }
}

fn render_demo(m: &crate::demo::DemoMatrix) -> String {
    let mut out = format!("torch_demo rows={} cols={}\n", m.rows, m.cols);
    for row in m.data.chunks(m.cols.max(1)).take(m.rows) {
        for v in row {
            out.push_str(&format!("{v} "));
        }
        out.push('\n');
    }
    out
}

fn parse_observation(raw: &str) -> anyhow::Result<Vec<Real>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Real>()
                .map_err(|e| anyhow::anyhow!("invalid value {s:?}: {e}"))
        })
        .collect()
}

fn predict(
    plugin: Option<String>,
    config: Option<&str>,
    observations: &[String],
    req: &PredictionRequest,
) -> anyhow::Result<PredictionResult> {
    let app = AppConfig::from_env_and_toml()?;
    let plugin = plugin.unwrap_or_else(|| app.plugin.clone());
    let model_cfg = match config {
        Some(raw) => serde_json::from_str(raw)?,
        None => app.plugin_config(),
    };

    let lib = PluginRegistry::builtin().load(&plugin)?;
    let mut instance = RealtimeModelInstance::create(lib, &model_cfg)?;

    for raw in observations {
        let values = parse_observation(raw)?;
        let obs = Observation::new(chrono::Utc::now(), &values, &[]);
        instance.model_mut().ingest(&obs);
    }
    log_metric("predict", "observations", observations.len() as f64);
    tracing::info!(
        plugin = %plugin,
        observations = observations.len(),
        ready = instance.model().ready(),
        "observations ingested"
    );

    if !instance.model().ready() {
        anyhow::bail!(
            "model not ready after {} observation(s); feed more data",
            observations.len()
        );
    }
    Ok(instance.model().predict(req))
}

fn show_config() -> anyhow::Result<String> {
    let cfg = AppConfig::from_env_and_toml()?;
    Ok(format!(
        "📋 Configuration:\n  Plugin: {}\n  Warmup count: {}\n  Log level: {}\n",
        cfg.plugin, cfg.warmup_count, cfg.log_level
    ))
}

fn validate_config() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env_and_toml()?;
    cfg.validate()?;
    let lib = PluginRegistry::builtin().load(&cfg.plugin)?;
    if !lib.has_realtime() {
        anyhow::bail!("plugin {} has no realtime model", lib.name());
    }
    Ok(())
}
