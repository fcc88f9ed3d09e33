use clap::Parser;
use colored::Colorize;
use sqlplay::{render_error, repl, OutputFormat, Playground, PlaygroundConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "sqlplay")]
#[command(about = "SQL Playground - learn SELECT against a built-in dataset", long_about = None)]
struct Args {
    /// Run a single query and exit
    #[arg(short, long)]
    execute: Option<String>,

    /// JSON dataset to load instead of the built-in tables
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Configuration file (default: ./sqlplay.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report unknown columns and unsupported predicates as errors
    #[arg(long)]
    strict: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sqlplay=warn,sqlplay_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = PlaygroundConfig::load(args.config.as_deref())?;
    if args.dataset.is_some() {
        config.dataset = args.dataset;
    }
    if args.strict {
        config.strict = true;
    }
    if let Some(format) = args.format {
        config.format = format;
    }
    tracing::debug!(?config, "Effective configuration");

    let mut playground = Playground::from_config(config)?;

    if let Some(sql) = args.execute {
        return match playground.run_query(&sql) {
            Ok(result) => {
                println!("{}", playground.render_result(&result));
                Ok(())
            }
            Err(err) => {
                eprintln!("{}", render_error(&err).red());
                std::process::exit(1);
            }
        };
    }

    repl::run(&mut playground)
}
