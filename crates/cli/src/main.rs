//! Larkspur CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! lk-cli migrate
//!
//! # Provision an admin account
//! lk-cli admin create -u maya -e maya@example.com -r ADMIN
//!
//! # Seed the catalog from a YAML file
//! lk-cli seed catalog -f seeds/catalog.yaml
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lk-cli")]
#[command(author, version, about = "Larkspur CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Login username
        #[arg(short, long)]
        username: String,

        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Password; a random one is generated and printed if omitted
        #[arg(short, long)]
        password: Option<String>,

        /// Role (`STAFF`, `ADMIN`, `SUPER_ADMIN`)
        #[arg(short, long, default_value = "ADMIN")]
        role: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Seed categories and products from a YAML file
    Catalog {
        /// Path to the YAML seed file
        #[arg(short, long)]
        file: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                username,
                email,
                password,
                role,
            } => {
                commands::admin::create_user(&username, &email, password.as_deref(), &role).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Catalog { file } => commands::seed::catalog(&file).await?,
        },
    }
    Ok(())
}
