use clap::{Parser, Subcommand};
use medkeeper_core::Config;

mod commands;

#[derive(Parser)]
#[command(name = "medkeeper", version, about = "Medkeeper CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record today's dose as taken
    Done {
        /// User to record the dose for
        #[arg(long)]
        user: String,
    },
    /// Reminder management
    Remind {
        #[command(subcommand)]
        action: commands::remind::RemindAction,
    },
    /// Print roster state as JSON
    Status {
        /// Limit output to one user
        #[arg(long)]
        user: Option<String>,
    },
    /// Run the day-rollover sweep immediately
    Rollover,
    /// Run the polling scheduler in the foreground
    Run,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let config = Config::load_or_default();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Done { user } => commands::habit::done(&config, &user),
        Commands::Remind { action } => commands::remind::run(&config, action),
        Commands::Status { user } => commands::habit::status(&config, user.as_deref()),
        Commands::Rollover => commands::habit::rollover(&config),
        Commands::Run => commands::run::run(&config),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
