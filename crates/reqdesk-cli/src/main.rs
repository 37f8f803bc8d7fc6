mod cmd;
mod output;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use cmd::generate::GenerateArgs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "reqdesk",
    about = "Classify feature requests by product and draft requirement documents",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (missing file = built-in defaults)
    #[arg(long, global = true, env = "REQDESK_CONFIG", default_value = reqdesk_core::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify request text against the product catalog
    Classify {
        /// Request text (multiple words are joined with spaces)
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// List the clarification questions asked after classification
    Questions,

    /// Render a requirement document
    Generate {
        /// Original request text
        #[arg(long)]
        request: Option<String>,

        /// Product display name (empty = undetermined)
        #[arg(long)]
        product: Option<String>,

        /// Clarification answer as id=value (repeatable)
        #[arg(long = "answer", value_name = "ID=VALUE")]
        answers: Vec<String>,

        /// Document date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Use this id instead of allocating one
        #[arg(long)]
        id: Option<String>,
    },

    /// Replay a task-tracker webhook payload and print the response
    Webhook {
        /// JSON file (default: stdin)
        file: Option<PathBuf>,
    },

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Run the HTTP API and webhook receiver
    Serve {
        /// Host to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_path();

    let result = match cli.command {
        Commands::Classify { text } => cmd::classify::run(config, &text, cli.json),
        Commands::Questions => cmd::questions::run(cli.json),
        Commands::Generate {
            request,
            product,
            answers,
            date,
            id,
        } => cmd::generate::run(
            config,
            GenerateArgs {
                request,
                product,
                answers,
                date,
                id,
            },
            cli.json,
        ),
        Commands::Webhook { file } => cmd::webhook::run(config, file.as_deref()),
        Commands::Config { subcommand } => cmd::config::run(config, subcommand, cli.json),
        Commands::Serve { host, port } => cmd::serve::run(config, host, port),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
