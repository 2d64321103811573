//! CLI administration tool for shortlink.
//!
//! Inspects and removes short links and checks backing services without
//! going through the HTTP API. Deletions go through the same service as the
//! API, so cached entries are evicted too.
//!
//! # Usage
//!
//! ```bash
//! # List the newest links
//! cargo run --bin admin -- links list --page 1 --size 20
//!
//! # Show one link
//! cargo run --bin admin -- links show aZ3kP9qX
//!
//! # Delete a link by id (asks for confirmation)
//! cargo run --bin admin -- links delete 6f1c2b0e-...
//!
//! # Check database and cache connectivity
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`shortlink::config`].

use shortlink::application::services::ShortLinkService;
use shortlink::config::{self, Config};
use shortlink::domain::entities::ShortLink;
use shortlink::domain::repositories::ShortLinkRepository;
use shortlink::infrastructure::persistence::PgShortLinkRepository;
use shortlink::server::{build_cache, connect_pool};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;
use uuid::Uuid;

/// CLI tool for managing shortlink.
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
    /// Inspect and remove short links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum LinksAction {
    /// List links, newest first
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(short, long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=100))]
        size: u32,
    },

    /// Show a single link by short code
    Show {
        code: String,
    },

    /// Delete a link by id
    Delete {
        id: Uuid,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database and cache connectivity
    Check,
}

type Service = ShortLinkService<dyn ShortLinkRepository>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    let service = build_service(&config).await?;

    match cli.command {
        Commands::Links { action } => handle_links_action(action, &service).await?,
        Commands::Db { action } => handle_db_action(action, &service).await?,
    }

    Ok(())
}

async fn build_service(config: &Config) -> Result<Service> {
    let pool = connect_pool(config).await?;
    let cache = build_cache(config).await;

    let repository: Arc<dyn ShortLinkRepository> =
        Arc::new(PgShortLinkRepository::new(Arc::new(pool)));

    Ok(ShortLinkService::new(repository, cache).with_cache_ttl(config.cache_ttl))
}

async fn handle_links_action(action: LinksAction, service: &Service) -> Result<()> {
    match action {
        LinksAction::List { page, size } => list_links(service, page, size).await,
        LinksAction::Show { code } => show_link(service, &code).await,
        LinksAction::Delete { id, yes } => delete_link(service, id, yes).await,
    }
}

/// Prints one page of links as a table.
///
/// # Output Format
///
/// ```text
/// Short links (page 1)
///
///   Code       Clicks   Created            Expires            URL
///   ---------------------------------------------------------------------------
///   aZ3kP9qX   12       2026-01-15 10:30   -                  https://example.com/a
/// ```
async fn list_links(service: &Service, page: u32, size: u32) -> Result<()> {
    println!(
        "{}",
        format!("Short links (page {page})").bright_blue().bold()
    );
    println!();

    let links = service
        .list_all(page, size)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<10} {:<8} {:<18} {:<18} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "Expires".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "-".repeat(75).bright_black());

    for link in &links {
        let expires = match link.expires_at {
            Some(at) if link.is_expired() => at.format("%Y-%m-%d %H:%M").to_string().red(),
            Some(at) => at.format("%Y-%m-%d %H:%M").to_string().normal(),
            None => "-".bright_black(),
        };

        println!(
            "  {:<10} {:<8} {:<18} {:<18} {}",
            link.short_code.cyan(),
            link.click_count,
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            expires,
            link.original_url
        );
    }

    println!();
    println!("  Shown: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn show_link(service: &Service, code: &str) -> Result<()> {
    let link = service
        .get_details(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("No link with code '{code}'"))?;

    print_link(&link);
    Ok(())
}

fn print_link(link: &ShortLink) {
    let status = if link.is_expired() {
        "EXPIRED".red()
    } else {
        "ACTIVE".green()
    };

    println!("  Code:     {}", link.short_code.cyan());
    println!("  ID:       {}", link.id.to_string().bright_black());
    println!("  URL:      {}", link.original_url);
    println!("  Clicks:   {}", link.click_count);
    println!(
        "  Created:  {}",
        link.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    match link.expires_at {
        Some(at) => println!("  Expires:  {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("  Expires:  never"),
    }
    if let Some(ip) = &link.created_by_ip {
        println!("  From IP:  {}", ip.bright_black());
    }
    println!("  Status:   {}", status);
    println!();
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(service: &Service, id: Uuid, skip_confirm: bool) -> Result<()> {
    println!("{}", "Delete short link".bright_blue().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete link {id}?"))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let deleted = service
        .delete(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    if deleted {
        println!("{}", "Link deleted".green().bold());
    } else {
        println!("{}", "No link with this id".yellow());
    }
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, service: &Service) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking backing services...".bright_blue());

            if !service.store_healthy().await {
                anyhow::bail!("Database check failed");
            }
            println!("{}", "  Database: OK".green().bold());

            let cache_ok = service.cache_healthy().await;
            if cache_ok {
                println!("{}", "  Cache:    OK".green().bold());
            } else {
                println!("{}", "  Cache:    unreachable".yellow().bold());
            }
        }
    }

    Ok(())
}
