use clap::Parser;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use sia_core::{Config, FixedElapsed};
use sia_server::logging::init_logging_with_filter;
use sia_server::{run_server_with_state, AppState, SupportLoopConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "sia-server")]
#[command(about = "SIA seller support assistant HTTP server")]
#[command(version)]
struct Cli {
    /// Enable debug logging for the sia crates
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,

    /// Server port
    #[arg(long, env = "PORT", default_value = "8080")]
    port: u16,

    /// OpenAI-compatible API base URL used for topic classification
    #[arg(long, env = "API_BASE")]
    api_base: Option<String>,

    /// API key for the completion endpoint
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model or Azure deployment name
    #[arg(long, env = "MODEL")]
    model: Option<String>,

    /// Azure OpenAI api-version
    #[arg(long, env = "API_VERSION")]
    api_version: Option<String>,

    /// Delay between lookup attempts in milliseconds
    #[arg(long, env = "SIA_RETRY_DELAY_MS")]
    retry_delay_ms: Option<u64>,

    /// Report this many hours since every brand request instead of the synthetic timeline
    #[arg(long)]
    brand_elapsed_hours: Option<u32>,

    /// Never call the completion endpoint
    #[arg(long)]
    no_llm: bool,

    /// Log level (overrides debug flag)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Minutes a session may sit idle before it is dropped
    #[arg(long, env = "SIA_SESSION_IDLE_MINUTES", default_value = "60")]
    session_idle_minutes: u64,
}

impl Cli {
    fn apply_to(&self, config: &mut Config) {
        if let Some(api_base) = &self.api_base {
            config.api_base = Some(api_base.clone());
        }
        if let Some(api_key) = &self.api_key {
            config.api_key = Some(api_key.clone());
        }
        if let Some(model) = &self.model {
            config.model = Some(model.clone());
        }
        if let Some(api_version) = &self.api_version {
            config.api_version = Some(api_version.clone());
        }
        if let Some(retry_delay_ms) = self.retry_delay_ms {
            config.retry_delay_ms = retry_delay_ms;
        }
        if self.no_llm {
            config.llm_enabled = false;
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging_with_filter(cli.log_level.as_deref(), cli.debug);

    let mut config = Config::new();
    cli.apply_to(&mut config);

    log::info!("Starting SIA server on port {}", cli.port);
    if !config.llm_configured() {
        log::info!("No completion endpoint configured, topics come from keywords only");
    }

    let mut loop_config = SupportLoopConfig::from_config(&config);
    if let Some(hours) = cli.brand_elapsed_hours {
        log::debug!("Brand requests report {}h elapsed", hours);
        loop_config.assistant = loop_config
            .assistant
            .with_elapsed_source(Arc::new(FixedElapsed(hours)));
    }

    let idle_timeout = Duration::from_secs(cli.session_idle_minutes.saturating_mul(60));
    let state = AppState::new(loop_config).with_idle_timeout(idle_timeout);
    run_server_with_state(cli.port, state).await
}
