//! The `streamwise` command-line front-end.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "streamwise",
    version,
    about = "Discover your natural talents and find the stream that fits"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take the assessment interactively
    Assess {
        /// Question bank JSON file (defaults to the bundled bank)
        #[arg(long)]
        questions: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Download the full report to this file once results are in
        #[arg(long)]
        report_out: Option<PathBuf>,
    },

    /// Administrator tools
    Admin {
        /// Admin password (falls back to config, then a prompt)
        #[arg(long, global = true)]
        password: Option<String>,

        /// Config file path
        #[arg(long, global = true)]
        config: Option<PathBuf>,

        #[command(subcommand)]
        command: AdminCommand,
    },

    /// Validate a question bank file
    Validate {
        /// Question bank JSON file (defaults to the bundled bank)
        #[arg(long)]
        questions: Option<PathBuf>,

        /// Questions per page used for the layout summary
        #[arg(long, default_value = "10")]
        page_size: usize,
    },

    /// Create a starter config file
    Init,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// List every stored student record
    Students,

    /// Download the CSV export of all records
    Export {
        /// Output file
        #[arg(long, default_value = "students.csv")]
        output: PathBuf,
    },

    /// Download one student's report
    Report {
        /// Report identifier
        #[arg(long)]
        id: String,

        /// Output file
        #[arg(long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("streamwise=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Assess {
            questions,
            config,
            report_out,
        } => commands::assess::execute(questions, config, report_out).await,
        Commands::Admin {
            password,
            config,
            command,
        } => commands::admin::execute(command, password, config).await,
        Commands::Validate {
            questions,
            page_size,
        } => commands::validate::execute(questions, page_size),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
