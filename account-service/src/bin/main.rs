use account_service::{AccountService, AccountServiceConfig};
use clap::{Parser, Subcommand};
use common::db;
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Account Service CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Set the log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Database URL
    #[arg(short, long, env = "DATABASE_URL")]
    database_url: String,

    /// Database pool size
    #[arg(short, long, default_value_t = 5)]
    pool_size: u32,

    /// Commands
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,
    /// Print an account as JSON
    Show {
        /// Account ID
        id: i32,
    },
    /// List the accounts owned by a user
    List {
        /// User ID
        user_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    // Parse command line arguments
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!("account_service={},common={}", cli.log_level, cli.log_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Migrate => {
            let pool = db::init_db_pool(&cli.database_url, cli.pool_size).await?;
            db::run_migrations(&pool).await?;
            info!("Schema is up to date");
        }
        Commands::Show { id } => {
            let service = connect(&cli).await?;
            match service.find_account(id).await {
                Ok(account) => println!("{}", serde_json::to_string_pretty(&account)?),
                Err(e) => {
                    error!("{}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::List { ref user_id } => {
            let service = connect(&cli).await?;
            let accounts = service.find_accounts(user_id).await?;
            println!("{}", serde_json::to_string_pretty(&accounts)?);
        }
    }

    Ok(())
}

async fn connect(cli: &Cli) -> common::Result<AccountService> {
    let config = AccountServiceConfig::new(Some(cli.database_url.clone()), cli.pool_size, false);
    AccountService::with_config(&config).await
}
