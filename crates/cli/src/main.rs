//! NearWomen CLI - browse the catalog, manage the cart and check out.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally filtered
//! nw products --category safety --search alarm
//!
//! # Work with the cart
//! nw cart add 2 --quantity 2
//! nw cart remove 2
//! nw cart update 2 5
//! nw cart show
//!
//! # Place an order for the cart
//! nw checkout --user 64f0c2 --address "12 Rose Lane" --city Pune \
//!     --postal-code 411001 --country India --phone "+91 98000 00000"
//!
//! # Create the cart snapshot table for postgres storage
//! nw migrate
//! ```
//!
//! Configuration comes from `NEARWOMEN_*` environment variables (see
//! `nearwomen_storefront::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use nearwomen_core::Category;
use nearwomen_storefront::config::StorefrontConfig;
use nearwomen_storefront::error::StorefrontError;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "nw")]
#[command(author, version, about = "NearWomen storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Only show this category (menstrual, safety, wellness, food)
        #[arg(short, long)]
        category: Option<Category>,

        /// Case-insensitive text to look for in name or description
        #[arg(short, long)]
        search: Option<String>,

        /// Fetch the live listing from the order service
        #[arg(long)]
        remote: bool,
    },
    /// Inspect or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for everything in the cart
    Checkout(commands::checkout::CheckoutArgs),
    /// Create the cart snapshot table in `PostgreSQL`
    Migrate,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and total
    Show,
    /// Add a product
    Add {
        /// Product ID
        id: i32,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Take one unit of a product out of the cart
    Remove {
        /// Product ID
        id: i32,
    },
    /// Set the quantity of a product already in the cart (0 removes it)
    Update {
        /// Product ID
        id: i32,

        /// New quantity; negative values are treated as 0
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Remove a product regardless of quantity
    Drop {
        /// Product ID
        id: i32,
    },
    /// Empty the cart
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nearwomen_storefront=info,nearwomen_cli=info".into());

    // JSON lines when NEARWOMEN_LOG_JSON is set, text otherwise
    let json = std::env::var_os("NEARWOMEN_LOG_JSON").is_some();
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Configuration first: Sentry needs the DSN before tracing starts
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            return fail(&e.into());
        }
    };
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), StorefrontError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run(&config).await,
        Commands::Products {
            category,
            search,
            remote,
        } => {
            let state = commands::open_state(config).await?;
            commands::products::list(&state, category, search, remote).await
        }
        Commands::Cart { action } => {
            let state = commands::open_state(config).await?;
            match action {
                CartAction::Show => commands::cart::show(&state).await,
                CartAction::Add { id, quantity } => commands::cart::add(&state, id, quantity).await,
                CartAction::Remove { id } => commands::cart::remove(&state, id).await,
                CartAction::Update { id, quantity } => {
                    commands::cart::update(&state, id, quantity).await
                }
                CartAction::Drop { id } => commands::cart::drop_line(&state, id).await,
                CartAction::Clear => commands::cart::clear(&state).await,
            }
        }
        Commands::Checkout(args) => {
            let state = commands::open_state(config).await?;
            commands::checkout::run(&state, args).await
        }
    }
}

#[allow(clippy::print_stderr)]
fn fail(error: &StorefrontError) -> ExitCode {
    let message = error.report();
    eprintln!("error: {message}");
    ExitCode::FAILURE
}
