use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod auth;
mod cli;
mod config;
mod errors;
mod models;
mod push;
mod store;

use api::CemsApi;
use auth::StaticCredentialStore;
use store::{FeedSnapshot, SessionRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "cems=info,cems_client=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = cli::Cli::parse();

    let mut cfg = config::load()?;
    if let Some(base_url) = args.base_url.clone() {
        cfg.base_url = base_url;
    }
    if let Some(user_id) = args.user_id {
        cfg.user_id = Some(user_id);
    }

    let creds = StaticCredentialStore::from_config(&cfg)
        .context("credentials missing; set CEMS_TOKEN and CEMS_USER_ID")?;
    let user_id = creds.user_id();
    let api = Arc::new(CemsApi::new(&cfg, Arc::new(creds))?);

    match args.command {
        cli::Commands::Watch => watch(api, &cfg, user_id).await,
        cli::Commands::List { unread } => list(api, &cfg, user_id, unread).await,
        cli::Commands::MarkRead { id } => {
            let session = SessionRegistry::global()
                .session_for(api, &cfg, user_id)
                .await;
            let changed = session.mark_read(id).await?;
            println!("{}", if changed { "marked read" } else { "no change" });
            Ok(())
        }
        cli::Commands::MarkAllRead => {
            let session = SessionRegistry::global()
                .session_for(api, &cfg, user_id)
                .await;
            session.mark_all_read().await?;
            println!("all read");
            Ok(())
        }
        cli::Commands::Activities => {
            for a in api.list_activities().await? {
                println!(
                    "#{:<5} {:<30} {:>3}/{:<3} {:?}",
                    a.id, a.title, a.registered, a.capacity, a.status
                );
            }
            Ok(())
        }
        cli::Commands::Clubs => {
            for c in api.list_clubs().await? {
                println!("#{:<5} {:<30} {} members", c.id, c.name, c.member_count);
            }
            Ok(())
        }
        cli::Commands::Reports { command } => reports(api, user_id, command).await,
        cli::Commands::Whoami => {
            let user = api.get_user(user_id).await?;
            println!("#{} {} <{}> {:?}", user.id, user.name, user.email, user.role);
            Ok(())
        }
        cli::Commands::Dashboard => {
            let stats = api.dashboard_stats().await?;
            println!("users                 {}", stats.total_users);
            println!("clubs                 {}", stats.total_clubs);
            println!("activities            {}", stats.total_activities);
            println!("active activities     {}", stats.active_activities);
            println!("registrations (month) {}", stats.registrations_this_month);
            Ok(())
        }
    }
}

async fn list(
    api: Arc<CemsApi>,
    cfg: &config::Config,
    user_id: i64,
    unread_only: bool,
) -> anyhow::Result<()> {
    let session = SessionRegistry::global()
        .session_for(api, cfg, user_id)
        .await;
    let snap = session.snapshot();
    if let Some(err) = &snap.error {
        eprintln!("load failed: {err}");
    }
    print_snapshot(&snap, unread_only);
    Ok(())
}

async fn watch(api: Arc<CemsApi>, cfg: &config::Config, user_id: i64) -> anyhow::Result<()> {
    let session = SessionRegistry::global()
        .session_for(api, cfg, user_id)
        .await;
    let mut feed = session.subscribe();

    let snap = feed.snapshot();
    print_snapshot(&snap, false);
    println!("-- watching (ctrl-c to quit) --");

    loop {
        tokio::select! {
            snap = feed.changed() => {
                if snap.degraded {
                    println!("[connection degraded, retrying]");
                }
                print_snapshot(&snap, false);
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                return Ok(());
            }
        }
    }
}

async fn reports(api: Arc<CemsApi>, user_id: i64, command: cli::ReportCommands) -> anyhow::Result<()> {
    match command {
        cli::ReportCommands::List => {
            for r in api.list_reports(user_id).await? {
                let state = if r.ready { "ready" } else { "pending" };
                println!("#{:<5} {:<30} {:?} [{state}]", r.id, r.title, r.kind);
            }
        }
        cli::ReportCommands::Request { kind } => {
            let report = api.request_report(user_id, kind.into()).await?;
            println!("queued report #{}", report.id);
        }
        cli::ReportCommands::Delete { id } => {
            api.delete_report(id).await?;
            println!("deleted");
        }
    }
    Ok(())
}

fn print_snapshot(snap: &FeedSnapshot, unread_only: bool) {
    println!("== {} unread ==", snap.unread_count);
    for n in &snap.notifications {
        if unread_only && n.is_read {
            continue;
        }
        let marker = if n.is_read { ' ' } else { '*' };
        println!(
            "{marker} #{:<5} {} [{}] {}",
            n.id,
            n.created_at.format("%Y-%m-%d %H:%M"),
            n.kind.label(),
            n.message
        );
    }
}
