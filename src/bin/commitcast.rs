//! commitcast CLI — one-shot commit announcer.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use commitcast::config::{Config, PublishMode};
use commitcast::db::Db;
use commitcast::dispatch::Dispatcher;
use commitcast::model::CommitRecord;
use commitcast::publish::{BroadcastClient, Sink};
use commitcast::resolve::GithubResolver;
use commitcast::telemetry;
use secrecy::ExposeSecret;

#[derive(Parser)]
#[command(name = "commitcast", about = "Announces the freshest pending commit")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Claim the newest pending commit and announce it
    Run {
        /// Print the message instead of broadcasting, whatever PUBLISH_MODE says
        #[arg(long)]
        dry_run: bool,
    },
    /// Insert a commit into the pending set (ingestion shim for local dev)
    Seed {
        /// Unique commit identifier
        sha: String,
        /// Commit message
        message: String,
        /// Canonical permalink
        url: String,
        /// Author login in the identity directory
        #[arg(long)]
        author: Option<String>,
        /// Commit timestamp (RFC 3339), defaults to now
        #[arg(long)]
        date: Option<String>,
    },
    /// List pending commits, newest first
    Pending {
        /// Maximum records to show
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    telemetry::init(&config.log_level)?;

    let db = Db::connect(config.database_url().expose_secret()).await?;
    db.migrate().await?;

    // Close the pool on every exit path, success or not.
    let result = match cli.command {
        Command::Run { dry_run } => cmd_run(config, &db, dry_run).await,
        Command::Seed {
            sha,
            message,
            url,
            author,
            date,
        } => cmd_seed(&db, sha, message, url, author, date).await,
        Command::Pending { limit } => cmd_pending(&db, limit).await,
    };
    db.close().await;
    result
}

async fn cmd_run(config: Config, db: &Db, dry_run: bool) -> anyhow::Result<()> {
    let sink = if dry_run {
        Sink::DryRun
    } else {
        match config.publish_mode {
            PublishMode::DryRun => Sink::DryRun,
            PublishMode::Broadcast => {
                // from_env guarantees both are present in broadcast mode
                let url = config
                    .broadcast_url
                    .ok_or_else(|| anyhow::anyhow!("BROADCAST_URL missing"))?;
                let token = config
                    .broadcast_token
                    .ok_or_else(|| anyhow::anyhow!("BROADCAST_TOKEN missing"))?;
                Sink::Broadcast(BroadcastClient::new(url, token))
            }
        }
    };

    let resolver = GithubResolver::new(config.github_token);
    let mut dispatcher = Dispatcher::new(db, resolver, sink);

    match dispatcher.run_once().await? {
        Some(sha) => println!("Announced {sha}"),
        None => println!("Nothing pending."),
    }
    Ok(())
}

async fn cmd_seed(
    db: &Db,
    sha: String,
    message: String,
    url: String,
    author: Option<String>,
    date: Option<String>,
) -> anyhow::Result<()> {
    let date: DateTime<Utc> = match date {
        Some(s) => s.parse()?,
        None => Utc::now(),
    };

    let record = CommitRecord {
        sha,
        author,
        message,
        url,
        date,
    };
    db.insert_pending(&record).await?;
    println!("Seeded {}", record.sha);
    Ok(())
}

async fn cmd_pending(db: &Db, limit: i64) -> anyhow::Result<()> {
    let records = db.list_pending(limit).await?;
    let archived = db.archived_count().await?;

    if records.is_empty() {
        println!("No pending commits ({archived} archived).");
        return Ok(());
    }

    println!("{:<10}  {:<20}  {:<40}  DATE", "SHA", "AUTHOR", "MESSAGE");
    println!("{}", "-".repeat(100));

    for record in &records {
        let short_sha = if record.sha.len() > 10 {
            &record.sha[..10]
        } else {
            &record.sha
        };
        let author = record.author.as_deref().unwrap_or("-");
        let first_line = record.message.lines().next().unwrap_or("");
        let message: String = first_line.chars().take(40).collect();
        println!(
            "{:<10}  {:<20}  {:<40}  {}",
            short_sha,
            author,
            message,
            record.date.format("%Y-%m-%d %H:%M")
        );
    }

    println!("\n{} pending, {} archived", records.len(), archived);
    Ok(())
}
