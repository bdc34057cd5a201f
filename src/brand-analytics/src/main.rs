//! Brand Analytics: replays landing-page interaction scripts through the
//! tracking layer and prints the payloads the analytics tag would receive.

mod script;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;

use brand_core::config::AnalyticsConfig;
use brand_core::reporter::Reporter;
use brand_web_sdk::{
    BrandAnalytics, DataLayerAdaptor, DataLayerReporter, GaAdaptor, GaReporter, PayloadAdaptor,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use crate::script::{parse_script, ReplaySession};

#[derive(Parser, Debug)]
#[command(name = "brand-analytics")]
#[command(about = "Landing-page interaction tracking and lead scoring")]
#[command(version)]
struct Cli {
    /// TOML config file (environment variables with prefix BRAND_ANALYTICS__ override it)
    #[arg(long, global = true, env = "BRAND_ANALYTICS_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a JSON-lines interaction script and print forwarded payloads
    Replay {
        /// Script file (reads stdin when omitted)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Payload format printed for each forwarded event
        #[arg(long, value_enum, default_value_t = Format::Datalayer)]
        format: Format,

        /// Element ids present on the simulated page
        #[arg(long, value_delimiter = ',', default_value = "hero,posologia,evidencias,cursos,contato")]
        sections: Vec<String>,

        /// Simulate a page where the analytics tag never loaded
        #[arg(long, default_value_t = false)]
        no_channel: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Datalayer,
    Ga4,
}

enum Output {
    DataLayer(Arc<DataLayerReporter>),
    Ga(Arc<GaReporter>),
}

impl Output {
    fn build(format: Format, config: &AnalyticsConfig) -> Self {
        match format {
            Format::Datalayer => {
                let adaptor = DataLayerAdaptor::new(config.data_layer.clone());
                if let Err(e) = adaptor.validate_config() {
                    warn!(error = %e, "data layer settings invalid");
                }
                Output::DataLayer(Arc::new(DataLayerReporter::new(adaptor)))
            }
            Format::Ga4 => {
                let adaptor = GaAdaptor::new(config.ga.clone());
                if let Err(e) = adaptor.validate_config() {
                    warn!(error = %e, "GA4 settings invalid, payloads cannot be forwarded as-is");
                }
                Output::Ga(Arc::new(GaReporter::new(adaptor)))
            }
        }
    }

    fn reporter(&self) -> Arc<dyn Reporter> {
        match self {
            Output::DataLayer(r) => r.clone() as Arc<dyn Reporter>,
            Output::Ga(r) => r.clone() as Arc<dyn Reporter>,
        }
    }

    fn drain(&self) -> Vec<serde_json::Value> {
        match self {
            Output::DataLayer(r) => r.drain(),
            Output::Ga(r) => r.drain(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only payloads.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "brand_analytics=info,brand_web_sdk=info".into());
    if cli.log_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    let config = AnalyticsConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AnalyticsConfig::default()
    });

    match cli.command {
        Command::Replay {
            input,
            format,
            sections,
            no_channel,
        } => replay(config, input, format, sections, no_channel),
    }
}

fn replay(
    config: AnalyticsConfig,
    input: Option<PathBuf>,
    format: Format,
    sections: Vec<String>,
    no_channel: bool,
) -> anyhow::Result<()> {
    let interactions = match &input {
        Some(path) => parse_script(BufReader::new(File::open(path)?))?,
        None => parse_script(io::stdin().lock())?,
    };

    let output = Output::build(format, &config);
    let channel = (!no_channel).then(|| output.reporter());
    let analytics = BrandAnalytics::new(channel, config);

    info!(
        interactions = interactions.len(),
        ?format,
        active = analytics.is_active(),
        "replaying interaction script"
    );

    let mut session = ReplaySession::new(analytics, sections);
    let mut stdout = io::stdout().lock();
    let mut forwarded = 0usize;

    for interaction in interactions {
        session.apply(interaction);
        for payload in output.drain() {
            writeln!(stdout, "{}", serde_json::to_string(&payload)?)?;
            forwarded += 1;
        }
    }
    session.finish();
    for payload in output.drain() {
        writeln!(stdout, "{}", serde_json::to_string(&payload)?)?;
        forwarded += 1;
    }

    info!(forwarded, "replay complete");
    Ok(())
}
