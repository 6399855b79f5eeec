//! CLI administration tool for shortly.
//!
//! Manages accounts, shows statistics and performs database checks without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (prompts for anything not given)
//! cargo run --bin admin -- user create --name "Ann" --email ann@example.com
//!
//! # List accounts
//! cargo run --bin admin -- user list
//!
//! # Delete an account and its links
//! cargo run --bin admin -- user delete ann@example.com
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection / apply migrations
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//!
//! # Generate a JWT_SECRET value
//! cargo run --bin admin -- secret generate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components: required for every command except
//!   `secret generate`

use shortly::api::dto::auth::SignupRequest;
use shortly::application::services::{LinkService, UserService};
use shortly::config::{Config, MIN_SECRET_BYTES, mask_connection_string};
use shortly::infrastructure::persistence::{PgLinkRepository, PgUserRepository};

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use rand::RngCore;
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

/// CLI tool for managing shortly.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Signing secret helpers
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },
}

/// Account management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// Create a new account
    Create {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all accounts
    List,

    /// Delete an account and all of its links
    Delete {
        email: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[derive(Subcommand)]
enum SecretAction {
    /// Print a random secret suitable for JWT_SECRET
    Generate {
        /// Print only the secret
        #[arg(long)]
        raw: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Secret { action } => handle_secret_action(action),
        Commands::User { action } => handle_user_action(action, &connect().await?).await,
        Commands::Stats => handle_stats(&connect().await?).await,
        Commands::Db { action } => handle_db_action(action, &connect().await?).await,
    }
}

async fn connect() -> Result<PgPool> {
    let database_url = Config::load_database_url()?;

    PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })
}

fn user_service(pool: &PgPool) -> UserService<PgUserRepository> {
    UserService::new(Arc::new(PgUserRepository::new(Arc::new(pool.clone()))))
}

/// Dispatches account management commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let service = user_service(pool);

    match action {
        UserAction::Create { name, email, yes } => create_user(&service, name, email, yes).await,
        UserAction::List => list_users(&service).await,
        UserAction::Delete { email, yes } => delete_user(&service, email, yes).await,
    }
}

/// Creates an account with interactive prompts.
///
/// The input goes through the same validation as `POST /signup`.
async fn create_user(
    service: &UserService<PgUserRepository>,
    name: Option<String>,
    email: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Name").interact_text()?,
    };

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;

    let request = SignupRequest {
        name,
        email,
        repeat_password: password.clone(),
        password,
    };

    if let Err(errors) = request.validate() {
        println!("{}", "❌ Invalid input:".red().bold());
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_deref()
                    .unwrap_or("invalid value")
                    .to_string();
                println!("  {}: {}", field.to_string().cyan(), message);
            }
        }
        return Ok(());
    }

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Create user {}?", request.email))
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let user = service
        .signup(&request.name, &request.email, &request.password)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!();
    println!("{}", "✅ User created successfully!".green().bold());
    println!("  ID:    {}", user.id.to_string().bright_black());
    println!("  Email: {}", user.email.cyan());
    println!();

    Ok(())
}

/// Lists all accounts.
///
/// # Output Format
///
/// ```text
/// 📋 Users
///
///   ID                                    Name                 Email                          Created
///   ───────────────────────────────────────────────────────────────────────────────────────────────────
///   5f0c...                               Ann                  ann@example.com                2026-01-15 10:30
/// ```
async fn list_users(service: &UserService<PgUserRepository>) -> Result<()> {
    println!("{}", "📋 Users".bright_blue().bold());
    println!();

    let users = service
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<37} {:<20} {:<30} {}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Email".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(100).bright_black());

    for user in &users {
        println!(
            "  {:<37} {:<20} {:<30} {}",
            user.id.to_string().bright_black(),
            user.name.cyan(),
            user.email,
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Deletes an account by email, with confirmation (default: No).
async fn delete_user(
    service: &UserService<PgUserRepository>,
    email: String,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🗑  Delete User".bright_blue().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete {} and all of their links?", email))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let user = service
        .delete_by_email(&email)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete user: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ Deleted".green().bold(),
        user.email.cyan()
    );
    println!();

    Ok(())
}

/// Displays account, link and click totals.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let pool = Arc::new(pool.clone());
    let users = user_service(&pool)
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count users: {}", e))?;
    let totals = LinkService::new(Arc::new(PgLinkRepository::new(pool)))
        .totals()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

    println!("  Users:  {}", users.to_string().bright_green().bold());
    println!("  Links:  {}", totals.links.to_string().bright_green().bold());
    println!("  Clicks: {}", totals.clicks.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
        DbAction::Migrate => {
            println!("{}", "🔧 Applying migrations...".bright_blue());

            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to run migrations")?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}

fn handle_secret_action(action: SecretAction) -> Result<()> {
    match action {
        SecretAction::Generate { raw } => {
            let secret = generate_secret();

            if raw {
                println!("{secret}");
            } else {
                println!("{}", "🔑 New signing secret".bright_blue().bold());
                println!();
                println!("  JWT_SECRET={}", secret.bright_yellow().bold());
                println!();
                println!(
                    "{}",
                    "⚠️  Changing the secret invalidates every issued token.".yellow()
                );
            }
        }
    }

    Ok(())
}

/// Generates a random URL-safe secret, comfortably above the minimum length.
fn generate_secret() -> String {
    let mut bytes = [0u8; MIN_SECRET_BYTES * 2];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_secret_is_long_enough() {
        let secret = generate_secret();

        assert!(secret.len() >= MIN_SECRET_BYTES);
        assert_ne!(secret, generate_secret());
    }

    #[test]
    fn test_cli_parses_user_delete() {
        let cli = Cli::try_parse_from(["admin", "user", "delete", "ann@example.com", "-y"]).unwrap();

        assert!(matches!(
            cli.command,
            Commands::User {
                action: UserAction::Delete { ref email, yes: true }
            } if email == "ann@example.com"
        ));
    }
}
