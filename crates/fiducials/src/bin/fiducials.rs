use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use fiducials::locate::{LocateConfig, LocateReport};
use fiducials::replay::replay_config;
use log::LevelFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Replay a recorded marker observation log and write a JSON location report.
#[derive(Debug, Parser)]
#[command(name = "fiducials", version, about)]
struct Cli {
    /// JSON config file; command-line flags override its fields.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON observation log (`{"frames": [...]}`).
    #[arg(long)]
    observations: Option<PathBuf>,
    /// Report path (default: `locate_report.json`).
    #[arg(long)]
    output: Option<PathBuf>,
    /// Goodness values closer than this count as a tie.
    #[arg(long)]
    goodness_epsilon: Option<f64>,
    /// Reject observations with goodness above this value.
    #[arg(long)]
    max_goodness: Option<f64>,
    /// Log level; `RUST_LOG` overrides it when built with `tracing`.
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
    /// Emit tracing output as JSON lines.
    #[cfg(feature = "tracing")]
    #[arg(long)]
    json_trace: bool,
}

impl Cli {
    fn build_config(&self) -> Result<LocateConfig, Box<dyn std::error::Error>> {
        let mut cfg = match &self.config {
            Some(path) => LocateConfig::load_json(path)?,
            None => {
                let Some(observations) = &self.observations else {
                    return Err("either --config or --observations is required".into());
                };
                LocateConfig {
                    observations_path: observations.to_string_lossy().into_owned(),
                    output_path: None,
                    params: Default::default(),
                }
            }
        };
        if let Some(observations) = &self.observations {
            cfg.observations_path = observations.to_string_lossy().into_owned();
        }
        if let Some(output) = &self.output {
            cfg.output_path = Some(output.to_string_lossy().into_owned());
        }
        if let Some(epsilon) = self.goodness_epsilon {
            cfg.params.goodness_epsilon = epsilon;
        }
        if let Some(max_goodness) = self.max_goodness {
            cfg.params.max_goodness = Some(max_goodness);
        }
        Ok(cfg)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    #[cfg(feature = "tracing")]
    fiducials::core::init_tracing(cli.json_trace, cli.log_level.into());
    #[cfg(not(feature = "tracing"))]
    fiducials::core::init_with_level(cli.log_level.into())?;

    let cfg = cli.build_config()?;
    let output_path = cfg.output_path();

    let report = match replay_config(&cfg) {
        Ok(report) => report,
        Err(err) => {
            log::error!("replay failed: {err}");
            let mut report = LocateReport::new(&cfg);
            report.set_error(&err);
            report.write_json(&output_path)?;
            return Err(err.into());
        }
    };

    report.write_json(&output_path)?;
    println!(
        "{} markers from {} frames ({} invalid sightings); wrote report to {}",
        report.locations.len(),
        report.summary.frames,
        report.summary.invalid,
        output_path.display()
    );
    Ok(())
}
