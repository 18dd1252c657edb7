use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::{self, Write};
use std::sync::Arc;

use sia_core::{
    prompts, Config, FixedElapsed, Identifier, LookupKind, Session, Speaker,
    TurnReport,
};
use sia_loop::{open_session, run_turn, SupportLoopConfig};

#[derive(Parser)]
#[command(name = "sia-cli")]
#[command(about = "Talk to the SIA seller support assistant from a terminal")]
#[command(version)]
struct Cli {
    /// Enable debug mode
    #[arg(long, short, default_value = "false")]
    debug: bool,

    /// Delay between lookup attempts in milliseconds
    #[arg(long, env = "SIA_RETRY_DELAY_MS")]
    retry_delay_ms: Option<u64>,

    /// Report this many hours since every brand request
    #[arg(long)]
    brand_elapsed_hours: Option<u32>,

    /// Never call the completion endpoint
    #[arg(long)]
    no_llm: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start interactive chat
    Chat,
    /// Feed turns in order and print each reply
    Run {
        /// User turns, e.g. `1001 "listing 1002"`
        #[arg(required = true)]
        turns: Vec<String>,
    },
    /// Run one retried lookup and print the raw status
    Classify {
        /// user, listing or brand
        kind: LookupKind,
        /// Numeric identifier
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.debug);

    let loop_config = build_loop_config(&cli);

    match &cli.command {
        Commands::Chat => run_interactive_chat(&loop_config, cli.debug).await,
        Commands::Run { turns } => run_scripted(&loop_config, turns, cli.debug).await,
        Commands::Classify { kind, id } => classify(&loop_config, *kind, id),
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        "warn,sia_cli=debug,sia_core=debug,sia_loop=debug,sia_llm=debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

fn build_loop_config(cli: &Cli) -> SupportLoopConfig {
    let mut config = Config::new();
    if let Some(retry_delay_ms) = cli.retry_delay_ms {
        config.retry_delay_ms = retry_delay_ms;
    }
    if cli.no_llm {
        config.llm_enabled = false;
    }

    let mut loop_config = SupportLoopConfig::from_config(&config);
    if let Some(hours) = cli.brand_elapsed_hours {
        log::debug!("Brand requests report {}h elapsed", hours);
        loop_config.assistant = loop_config
            .assistant
            .with_elapsed_source(Arc::new(FixedElapsed(hours)));
    }
    loop_config
}

async fn run_interactive_chat(config: &SupportLoopConfig, debug: bool) -> anyhow::Result<()> {
    let mut session = Session::new(uuid::Uuid::new_v4().to_string());

    println!("{}", "SIA seller support".cyan().bold());
    println!("{}", format!("Session ID: {}", session.id).dimmed());
    println!("{}", "Type 'restart' to start over, 'exit' or 'quit' to leave".dimmed());
    println!();

    open_session(config, &mut session);
    print_assistant(prompts::GREETING);

    loop {
        print!("{} ", "You:".cyan().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            println!("{}", "Goodbye!".cyan());
            break;
        }
        if input.eq_ignore_ascii_case("restart") {
            config.assistant.restart(&mut session);
            println!("{}", "Session restarted".dimmed());
            print_assistant(prompts::GREETING);
            continue;
        }
        if input.is_empty() {
            continue;
        }

        let report = run_turn(config, &mut session, input).await;
        print_report(&report, debug);

        if report.outcome.is_terminal() {
            println!(
                "{}",
                "Conversation ended. Type 'restart' to begin again.".dimmed()
            );
        }
        println!();
    }

    Ok(())
}

async fn run_scripted(
    config: &SupportLoopConfig,
    turns: &[String],
    debug: bool,
) -> anyhow::Result<()> {
    let mut session = Session::new(uuid::Uuid::new_v4().to_string());
    open_session(config, &mut session);

    for turn in turns {
        println!("{} {}", "You:".cyan().bold(), turn);
        let report = run_turn(config, &mut session, turn).await;
        print_report(&report, debug);
    }

    if debug {
        for turn in session.transcript() {
            let speaker = match turn.speaker {
                Speaker::User => "user",
                Speaker::Assistant => "assistant",
                Speaker::System => "system",
            };
            eprintln!("{}", format!("[DEBUG] {}: {}", speaker, turn.text).dimmed());
        }
    }
    Ok(())
}

fn classify(config: &SupportLoopConfig, kind: LookupKind, raw_id: &str) -> anyhow::Result<()> {
    let id = Identifier::parse(raw_id)?;
    let resolution = config.assistant.resolve(kind, &id);
    println!(
        "{} {} -> {} ({} attempt{})",
        kind,
        id,
        resolution.status.to_string().bold(),
        resolution.attempts,
        if resolution.attempts == 1 { "" } else { "s" }
    );
    Ok(())
}

fn print_assistant(text: &str) {
    println!("{} {}", "SIA:".green().bold(), text);
}

fn print_report(report: &TurnReport, debug: bool) {
    print_assistant(&report.reply);

    if let Some(ticket) = &report.ticket {
        println!("{}", format!("Ticket: {}", ticket.id).yellow());
    }
    if debug {
        eprintln!(
            "{}",
            format!(
                "[DEBUG] stage={} outcome={} status={} attempts={}",
                report.stage,
                report.outcome,
                report
                    .status
                    .map_or_else(|| "-".to_string(), |s| s.to_string()),
                report.attempts
            )
            .dimmed()
        );
    }
}
