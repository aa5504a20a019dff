//! Cloud Kitchen CLI - browse the menu, manage the cart, place orders.
//!
//! # Usage
//!
//! ```bash
//! # Browse the menu, cheapest breads first
//! kitchen menu --category breads --sort price-low
//!
//! # The cart survives between invocations
//! kitchen cart add 65a1f0c2e4b0a1b2c3d4e5f6
//! kitchen cart show
//!
//! # Sign in, check out and manage orders interactively
//! kitchen shell
//! ```
//!
//! # Commands
//!
//! - `menu` - List dishes with client-side filtering and sorting
//! - `categories` - List menu categories
//! - `cart` - Show or change the durable cart
//! - `shell` - Interactive session; sign-ins last until the shell exits

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use cloud_kitchen_client::config::ClientConfig;
use cloud_kitchen_client::error::AppError;
use cloud_kitchen_client::models::{MenuQuery, MenuSort};
use cloud_kitchen_client::state::AppState;
use cloud_kitchen_client::telemetry;
use cloud_kitchen_core::DishId;

mod commands;

#[derive(Parser)]
#[command(name = "kitchen")]
#[command(author, version, about = "Cloud Kitchen command-line client")]
struct Cli {
    /// Write logs to stderr as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List dishes
    Menu {
        /// Only dishes in this category slug (e.g. `main-course`)
        #[arg(short, long)]
        category: Option<String>,

        /// Case-insensitive text to find in the name or description
        #[arg(short, long)]
        search: Option<String>,

        /// Sort order (`name`, `price-low`, `price-high`, `server`)
        #[arg(long, default_value = "name")]
        sort: MenuSort,
    },
    /// List menu categories
    Categories,
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Start an interactive session
    Shell,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with totals
    Show,
    /// Add one unit of a dish
    Add { dish_id: String },
    /// Remove a dish entirely
    Remove { dish_id: String },
    /// Add one more unit of a dish already in the cart
    Inc { dish_id: String },
    /// Take one unit away (never below one)
    Dec { dish_id: String },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _sentry_guard = telemetry::init(&config, cli.json_logs);

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            eprintln!("error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: ClientConfig) -> Result<(), AppError> {
    let state = AppState::open(config)?;

    match command {
        Commands::Menu {
            category,
            search,
            sort,
        } => {
            let query = MenuQuery {
                category,
                search,
                sort,
            };
            commands::menu::list(&state, &query).await?;
        }
        Commands::Categories => commands::menu::categories(&state).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state).await,
            CartAction::Add { dish_id } => {
                commands::cart::add(&state, &DishId::new(dish_id)).await?;
            }
            CartAction::Remove { dish_id } => {
                commands::cart::remove(&state, &DishId::new(dish_id)).await;
            }
            CartAction::Inc { dish_id } => {
                commands::cart::change(&state, &DishId::new(dish_id), 1).await;
            }
            CartAction::Dec { dish_id } => {
                commands::cart::change(&state, &DishId::new(dish_id), -1).await;
            }
            CartAction::Clear => commands::cart::clear(&state).await,
        },
        Commands::Shell => commands::shell::run(&state).await?,
    }
    Ok(())
}
