//! CLI administration tool for linktree-backend.
//!
//! Provides commands for managing links, viewing click statistics,
//! and performing database checks without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # List all links
//! cargo run --bin admin -- link list
//!
//! # Create a link (prompts for missing values)
//! cargo run --bin admin -- link create --title "Shop" --url https://example.com
//!
//! # Activate or deactivate a link
//! cargo run --bin admin -- link toggle 3
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use linktree_backend::application::services::{LinkService, StatsService};
use linktree_backend::domain::entities::LinkPatch;
use linktree_backend::infrastructure::persistence::{PgClickRepository, PgLinkRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linktree-backend.
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
    /// Manage links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show click statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// List all links, active and inactive
    List,

    /// Create a new link
    Create {
        #[arg(short, long)]
        title: Option<String>,

        /// Target URL (http or https)
        #[arg(short, long)]
        url: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Position in the public list, lower first
        #[arg(short, long, default_value_t = 0)]
        order: i32,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Flip a link between active and inactive
    Toggle {
        id: i64,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));
    let service = LinkService::new(repo);

    match action {
        LinkAction::List => list_links(pool).await?,
        LinkAction::Create {
            title,
            url,
            description,
            order,
            yes,
        } => create_link(&service, title, url, description, order, yes).await?,
        LinkAction::Toggle { id } => toggle_link(&service, id).await?,
    }

    Ok(())
}

/// Lists every link with its counter and status.
///
/// # Output Format
///
/// ```text
/// 📋 Links
///
///   ID   Title                          Clicks   Status     URL
///   ──────────────────────────────────────────────────────────────────────
///   1    Shop                           12       ACTIVE     https://example.com
/// ```
async fn list_links(pool: &PgPool) -> Result<()> {
    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    let stats = StatsService::new(
        Arc::new(PgLinkRepository::new(Arc::new(pool.clone()))),
        Arc::new(PgClickRepository::new(Arc::new(pool.clone()))),
    );
    let snapshot = stats
        .compute_stats()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if snapshot.links.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        println!(
            "  Create one with: {} admin link create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<4} {:<30} {:<8} {:<10} {}",
        "ID".bright_white().bold(),
        "Title".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Status".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &snapshot.links {
        let status = if link.is_active {
            "ACTIVE".green()
        } else {
            "INACTIVE".red()
        };

        println!(
            "  {:<4} {:<30} {:<8} {:<10} {}",
            link.id.to_string().bright_black(),
            link.title.cyan(),
            link.click_count.to_string().bright_white(),
            status,
            link.url.bright_black()
        );
    }

    println!();
    println!(
        "  Total: {}",
        snapshot.links.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Creates a link, prompting for the title and URL when not given.
async fn create_link(
    service: &LinkService<PgLinkRepository>,
    title: Option<String>,
    url: Option<String>,
    description: Option<String>,
    order: i32,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔗 Create Link".bright_blue().bold());
    println!();

    let title = match title {
        Some(t) => t,
        None => Input::new().with_prompt("Title").interact_text()?,
    };

    let url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Target URL")
            .with_initial_text("https://")
            .interact_text()?,
    };

    println!();
    println!("  Title: {}", title.cyan());
    println!("  URL:   {}", url.bright_white());
    println!("  Order: {}", order.to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this link?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let link = service
        .create_link(title, url, description, order)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    println!(
        "{} {}",
        "✅ Link created with id".green().bold(),
        link.id.to_string().bright_yellow().bold()
    );
    println!();
    println!("{}", "Track clicks with:".bright_white());
    println!("  curl -X POST http://localhost:3000/click/{}", link.id);
    println!();

    Ok(())
}

/// Flips the active flag of a link after confirmation.
async fn toggle_link(service: &LinkService<PgLinkRepository>, id: i64) -> Result<()> {
    let link = service
        .get_link(id)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let (verb, next) = if link.is_active {
        ("Deactivate", false)
    } else {
        ("Activate", true)
    };

    println!("  Link: {} ({})", link.title.cyan(), link.url.bright_black());

    let confirmed = Confirm::new()
        .with_prompt(format!("{} this link?", verb))
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    let patch = LinkPatch {
        is_active: Some(next),
        ..Default::default()
    };
    service
        .update_link(id, patch)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to update link: {}", e))?;

    let state = if next { "active".green() } else { "inactive".red() };
    println!("{} {}", "✅ Link is now".green().bold(), state);

    Ok(())
}

/// Displays click statistics.
///
/// Shows totals, counter drift against the event log, and the last seven
/// days of clicks.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let stats = StatsService::new(
        Arc::new(PgLinkRepository::new(Arc::new(pool.clone()))),
        Arc::new(PgClickRepository::new(Arc::new(pool.clone()))),
    );
    let snapshot = stats
        .compute_stats()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to compute stats: {}", e))?;

    println!(
        "  Links:         {} ({} active, {} inactive)",
        snapshot.total_links.to_string().bright_green().bold(),
        snapshot.active_links,
        snapshot.inactive_links
    );
    println!(
        "  Clicks:        {}",
        snapshot.total_clicks.to_string().bright_green().bold()
    );
    println!(
        "  Click events:  {}",
        snapshot.total_events.to_string().bright_green().bold()
    );

    if snapshot.total_events != snapshot.total_clicks {
        println!(
            "  {}",
            "⚠️  Link counters differ from the event log".yellow()
        );
    }

    if !snapshot.daily_clicks.is_empty() {
        println!();
        println!("{}", "  Last 7 days:".bright_white());
        for day in &snapshot.daily_clicks {
            println!(
                "    {}  {}",
                day.date.format("%Y-%m-%d").to_string().bright_black(),
                day.clicks.to_string().bright_white()
            );
        }
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
