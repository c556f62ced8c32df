use clap::{Parser, Subcommand};
use tracing_subscriber::filter::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "repcycle", version, about = "Plan workouts and play them back")]
struct Cli {
    /// User id that owns the data (defaults to identity.user_id in config)
    #[arg(long, global = true, env = "REPCYCLE_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Planned set management
    Set {
        #[command(subcommand)]
        action: commands::set::SetAction,
    },
    /// Workout template management
    Template {
        #[command(subcommand)]
        action: commands::template::TemplateAction,
    },
    /// Workout playback
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Finished workouts
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("repcycle=info"));

    // stdout carries JSON only
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let user = cli.user.as_deref();
    let result = match cli.command {
        Commands::Set { action } => commands::set::run(action, user),
        Commands::Template { action } => commands::template::run(action, user),
        Commands::Session { action } => commands::session::run(action, user),
        Commands::History { action } => commands::history::run(action, user),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
