//! user-console - interactive shell for the user record manager.

mod shell;

use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use user_service::{Database, UserManager, UserStore};

#[derive(Parser)]
#[command(name = "user-console")]
#[command(about = "Single-tenant user record manager")]
struct Cli {
    /// Database connection URL
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite://users.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu (default)
    Run,
    /// Apply pending database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let db = Database::connect(&cli.database_url).await?;
            let repo = Arc::new(UserStore::new(db.get_connection()));
            let service = UserManager::new(repo);

            shell::Shell::new(service).run().await?;

            db.close().await?;
        }
        Commands::Migrate => {
            let db = Database::connect_without_migrations(&cli.database_url).await?;
            db.run_migrations().await?;
            tracing::info!("Migrations applied successfully");
            db.close().await?;
        }
    }

    Ok(())
}
