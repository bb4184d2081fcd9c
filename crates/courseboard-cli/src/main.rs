use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use courseboard_core::CoreError;

mod commands;

#[derive(Parser)]
#[command(name = "courseboard-cli", version, about = "Courseboard CLI")]
struct Cli {
    /// Config file (defaults to ~/.config/courseboard/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Section, subsection and module tables
    Sections(commands::content::SectionsArgs),
    /// Graded assignment tables
    Assignments(commands::content::AssignmentsArgs),
    /// Per-video watch timeline
    Timeline(commands::engagement::TimelineArgs),
    /// Daily enrollment trend
    Enrollment(commands::learners::EnrollmentArgs),
    /// Learner demographics
    Demographics {
        #[command(subcommand)]
        action: commands::learners::DemographicsAction,
    },
    /// Answer distribution for one problem
    Answers(commands::answers::AnswersArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Sections(args) => commands::content::sections(config, args).await,
        Commands::Assignments(args) => commands::content::assignments(config, args).await,
        Commands::Timeline(args) => commands::engagement::timeline(config, args).await,
        Commands::Enrollment(args) => commands::learners::enrollment(config, args).await,
        Commands::Demographics { action } => commands::learners::demographics(config, action).await,
        Commands::Answers(args) => commands::answers::run(config, args).await,
        Commands::Config { action } => commands::config::run(config, action),
    };

    if let Err(e) = result {
        match e.downcast_ref::<CoreError>() {
            Some(core) if core.is_empty_state() => {
                eprintln!("{core}");
            }
            _ => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
    }
}
