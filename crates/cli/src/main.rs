//! Herba CLI - Database migrations and tenant management.
//!
//! # Usage
//!
//! ```bash
//! # Run platform database migrations
//! herba-cli migrate
//!
//! # Onboard a tenant
//! herba-cli tenant create -n "Grove Dispensary" -s grove -c DE
//!
//! # Store a tenant's Provider credentials (encrypts the secret at rest)
//! herba-cli tenant set-credentials <id> --api-key pk_live_...
//!
//! # Toggle activation
//! herba-cli tenant activate <id>
//! herba-cli tenant deactivate <id>
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `tenant create|list|activate|deactivate|set-credentials` - Tenant
//!   management
//!
//! The Provider secret for `set-credentials` is read from the
//! `PROVIDER_SECRET_KEY` environment variable, never from argv, so it does
//! not land in shell history or the process table.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "herba-cli")]
#[command(author, version, about = "Herba CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage tenants
    Tenant {
        #[command(subcommand)]
        action: TenantAction,
    },
}

#[derive(Subcommand)]
enum TenantAction {
    /// Onboard a new tenant
    Create {
        /// Display name of the dispensary
        #[arg(short, long)]
        name: String,

        /// Subdomain / path slug (unique)
        #[arg(short, long)]
        subdomain: String,

        /// ISO 3166-1 alpha-2 country code
        #[arg(short, long, default_value = "DE")]
        country: String,
    },
    /// List all tenants
    List,
    /// Activate a tenant
    Activate {
        /// Tenant ID
        id: String,
    },
    /// Deactivate a tenant (storefront answers 404 on the next request)
    Deactivate {
        /// Tenant ID
        id: String,
    },
    /// Store a tenant's Provider API key and secret
    SetCredentials {
        /// Tenant ID
        id: String,

        /// Provider API key
        #[arg(long)]
        api_key: String,

        /// Provider secret key (from env, not argv)
        #[arg(long, env = "PROVIDER_SECRET_KEY", hide_env_values = true)]
        secret_key: String,
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

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Tenant { action } => match action {
            TenantAction::Create {
                name,
                subdomain,
                country,
            } => commands::tenant::create(&name, &subdomain, &country).await?,
            TenantAction::List => commands::tenant::list().await?,
            TenantAction::Activate { id } => commands::tenant::set_active(&id, true).await?,
            TenantAction::Deactivate { id } => commands::tenant::set_active(&id, false).await?,
            TenantAction::SetCredentials {
                id,
                api_key,
                secret_key,
            } => commands::tenant::set_credentials(&id, &api_key, &secret_key).await?,
        },
    }
    Ok(())
}
