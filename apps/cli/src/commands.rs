//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use novainfor_core::{Assistant, Library};
use novainfor_llm::{ClientSettings, OpenAiClient};
use novainfor_shared::{AppConfig, init_config, load_config, load_config_from, resolve_api_key};
use tracing::info;

use crate::chat::{self, Spinner};
use crate::display;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Nova-Infor — academic guidance for Computer Engineering students.
#[derive(Parser)]
#[command(
    name = "novainfor",
    version,
    about = "Ask about Computer Engineering specializations, answered from professor and student interviews.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ~/.novainfor/novainfor.toml).
    #[arg(long, global = true, env = "NOVAINFOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory that relative source paths resolve against.
    #[arg(long, global = true, default_value = ".")]
    pub data_dir: PathBuf,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Start an interactive conversation.
    Chat,

    /// Ask a single question and print the answer.
    Ask {
        /// The question (words are joined with spaces).
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Print the loaded interview tables.
    Data,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "novainfor=warn",
        1 => "novainfor=info",
        2 => "novainfor=debug",
        _ => "novainfor=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Chat => cmd_chat(cli.config.as_deref(), &cli.data_dir).await,
        Command::Ask { ref question } => {
            cmd_ask(cli.config.as_deref(), &cli.data_dir, &question.join(" ")).await
        }
        Command::Data => cmd_data(cli.config.as_deref(), &cli.data_dir).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(cli.config.as_deref()).await,
        },
    }
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Everything a session needs. Any failure here is fatal.
fn start(
    config_path: Option<&Path>,
    data_dir: &Path,
) -> Result<(Assistant<OpenAiClient>, Library)> {
    let config = resolve_config(config_path)?;
    let api_key = resolve_api_key(&config)?;
    let library = Library::load(&config.sources, data_dir)?;

    let client = OpenAiClient::new(ClientSettings::from_config(&config.openai, api_key))?;
    info!(model = client.model(), questions = library.knowledge.len(), "assistant ready");

    let assistant = Assistant::new(client, library.knowledge.clone(), &config);
    Ok((assistant, library))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_chat(config_path: Option<&Path>, data_dir: &Path) -> Result<()> {
    let (assistant, library) = start(config_path, data_dir)?;
    chat::run(&assistant, &library).await
}

async fn cmd_ask(config_path: Option<&Path>, data_dir: &Path, question: &str) -> Result<()> {
    if question.trim().is_empty() {
        return Err(eyre!("question must not be empty"));
    }

    let (assistant, _library) = start(config_path, data_dir)?;
    let mut transcript = assistant.new_transcript();

    let spinner = Spinner::start("Pensando...");
    let reply = assistant.respond(&mut transcript, question).await;
    spinner.finish();

    println!("{}", reply.text);
    Ok(())
}

async fn cmd_data(config_path: Option<&Path>, data_dir: &Path) -> Result<()> {
    let config = resolve_config(config_path)?;
    let library = Library::load(&config.sources, data_dir)?;

    for table in &library.tables {
        print!("{}", display::render_table(table));
        println!();
    }
    println!("{} preguntas indexadas.", library.knowledge.len());
    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
