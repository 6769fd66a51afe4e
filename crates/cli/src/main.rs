//! Shopfront CLI - Database management and a command-line shopper.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations (schema + session table)
//! shop-cli migrate
//!
//! # Create a login
//! shop-cli user create -u alice -p 'correct horse'
//!
//! # Load or refresh the catalog
//! shop-cli seed inventory catalog.yaml
//!
//! # Browse and buy against a running storefront
//! shop-cli shop items --search mug
//! shop-cli shop checkout -u alice -p 'correct horse' 1 2 2
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user` - Create users, reset passwords
//! - `seed` - Seed the inventory from YAML
//! - `shop` - Talk to the storefront API like a shopper would

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "shop-cli")]
#[command(author, version, about = "Shopfront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage login accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Use a running storefront
    Shop {
        /// Storefront base URL
        #[arg(
            long,
            env = "SHOPFRONT_URL",
            default_value = "http://localhost:3000",
            global = true
        )]
        url: String,

        #[command(subcommand)]
        action: ShopAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
    /// Replace a user's password
    SetPassword {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// New password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert or update products from a YAML file
    Inventory {
        /// Path to the YAML file
        file: String,
    },
}

#[derive(Subcommand)]
enum ShopAction {
    /// List items, optionally filtered
    Items {
        /// Case-insensitive text to find in name or description
        #[arg(short, long)]
        search: Option<String>,

        /// Exact category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Log in and buy one unit of each listed product id
    Checkout {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Product ids, repeat an id to buy it more than once
        #[arg(required = true)]
        product_ids: Vec<i32>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::User { action } => match action {
            UserAction::Create { username, password } => {
                commands::user::create(&username, &password).await?;
            }
            UserAction::SetPassword { username, password } => {
                commands::user::set_password(&username, &password).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Inventory { file } => commands::seed::inventory(&file).await?,
        },
        Commands::Shop { url, action } => match action {
            ShopAction::Items { search, category } => {
                commands::shop::items(&url, search.as_deref(), category.as_deref()).await?;
            }
            ShopAction::Checkout {
                username,
                password,
                product_ids,
            } => {
                commands::shop::checkout(&url, &username, &password, &product_ids).await?;
            }
        },
    }
    Ok(())
}
