//! Command handlers. Each handler wires its own services, so maintenance
//! commands never touch the clipboard unless they have to.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::info;

use pl_app::{FactoryReset, HistoryItemView, ListHistory, PollingWatcher};
use pl_core::config::AppConfig;
use pl_core::history::EntryKind;
use pl_core::ports::SnippetStorePort;
use pl_core::snippet::{Snippet, SnippetFolder};

use crate::bootstrap::{wire_dependencies, AppServices, ClipboardMode};
use crate::cli::{Command, ExcludeAction, SnippetsAction};

pub async fn dispatch(command: Command, config: AppConfig) -> Result<()> {
    match command {
        Command::Run => run(&config).await,
        Command::List => list(&config).await,
        Command::Paste { index } => paste(&config, index).await,
        Command::Clear => clear(&config).await,
        Command::RotateKey => rotate_key(&config).await,
        Command::Reset => reset(&config).await,
        Command::Exclude { action } => exclude(&config, action).await,
        Command::Snippets { action } => snippets(&config, action).await,
    }
}

async fn services(config: &AppConfig, mode: ClipboardMode) -> Result<AppServices> {
    wire_dependencies(config, mode)
        .await
        .context("failed to initialize application")
}

/// Services with the persisted history already loaded.
async fn started(config: &AppConfig, mode: ClipboardMode) -> Result<AppServices> {
    let services = services(config, mode).await?;
    services.engine.start().await;
    Ok(services)
}

async fn run(config: &AppConfig) -> Result<()> {
    let services = started(config, ClipboardMode::Required).await?;
    let watcher = PollingWatcher::new(
        Arc::clone(&services.engine),
        Duration::from_millis(config.poll_interval_ms),
    );
    watcher.start().await;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for interrupt")?;

    watcher.stop().await;
    info!("shutting down");
    Ok(())
}

async fn list(config: &AppConfig) -> Result<()> {
    let services = started(config, ClipboardMode::BestEffort).await?;
    let rows = ListHistory::new(services.engine).execute().await;
    if rows.is_empty() {
        println!("History is empty.");
    }
    for (index, row) in rows.iter().enumerate() {
        println!("{}", format_history_row(index, row));
    }
    Ok(())
}

async fn paste(config: &AppConfig, index: usize) -> Result<()> {
    let services = started(config, ClipboardMode::Required).await?;
    let snapshot = services.engine.snapshot().await;
    let Some(entry) = snapshot.get(index) else {
        bail!("no history entry at index {index} ({} entries)", snapshot.len());
    };
    if !services.engine.request_paste(&entry.id).await? {
        bail!("history entry {} disappeared", entry.id);
    }
    Ok(())
}

async fn clear(config: &AppConfig) -> Result<()> {
    let services = started(config, ClipboardMode::BestEffort).await?;
    services.engine.request_clear().await?;
    println!("History cleared.");
    Ok(())
}

async fn rotate_key(config: &AppConfig) -> Result<()> {
    let services = started(config, ClipboardMode::BestEffort).await?;
    services.engine.rotate_key().await?;
    println!("Encryption key rotated; history re-encrypted.");
    Ok(())
}

async fn reset(config: &AppConfig) -> Result<()> {
    let services = started(config, ClipboardMode::BestEffort).await?;
    FactoryReset::new(services.snippets, services.engine)
        .execute()
        .await?;
    println!("Snippets restored and history cleared.");
    Ok(())
}

async fn exclude(config: &AppConfig, action: ExcludeAction) -> Result<()> {
    let services = services(config, ClipboardMode::BestEffort).await?;
    let exclusions = services.exclusions;
    match action {
        ExcludeAction::Add { app_id } => {
            if exclusions.add(&app_id).await? {
                println!("Excluded {app_id}.");
            } else {
                println!("{app_id} was already excluded.");
            }
        }
        ExcludeAction::Remove { app_id } => {
            if exclusions.remove(&app_id).await? {
                println!("{app_id} is no longer excluded.");
            } else {
                println!("{app_id} was not excluded.");
            }
        }
        ExcludeAction::List => {
            for app_id in exclusions.list() {
                println!("{app_id}");
            }
        }
    }
    Ok(())
}

async fn snippets(config: &AppConfig, action: SnippetsAction) -> Result<()> {
    let mode = match action {
        SnippetsAction::Paste { .. } => ClipboardMode::Required,
        _ => ClipboardMode::BestEffort,
    };
    let services = services(config, mode).await?;
    let library = services.snippets;
    match action {
        SnippetsAction::List => print!("{}", format_snippet_folders(&library.folders().await)),
        SnippetsAction::Add {
            folder,
            title,
            content,
        } => {
            if !library.add_snippet(folder, Snippet::new(title, content)).await? {
                bail!("no snippet folder at index {folder}");
            }
        }
        SnippetsAction::Paste { folder, snippet } => {
            let folders = library.folders().await;
            let Some(chosen) = folders
                .get(folder)
                .and_then(|f| f.snippets.get(snippet))
            else {
                bail!("no snippet at {folder}/{snippet}");
            };
            // Only the token is recorded, so the engine skips it on the next poll.
            services.engine.start().await;
            services.engine.paste_text(&chosen.content).await?;
        }
        SnippetsAction::Reset => {
            library.reset_to_factory().await?;
            println!("Snippets restored.");
        }
    }
    Ok(())
}

fn kind_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Text => "text",
        EntryKind::Image => "image",
    }
}

fn format_history_row(index: usize, row: &HistoryItemView) -> String {
    format!(
        "{:>3}  {}  {:<5}  {}",
        index,
        row.captured_at.format("%Y-%m-%d %H:%M:%S"),
        kind_label(row.kind),
        row.preview
    )
}

fn format_snippet_folders(folders: &[SnippetFolder]) -> String {
    let mut out = String::new();
    for (fi, folder) in folders.iter().enumerate() {
        out.push_str(&format!("{fi}  {}\n", folder.title));
        for (si, snippet) in folder.snippets.iter().enumerate() {
            out.push_str(&format!("  {fi}/{si}  {}\n", snippet.title));
        }
    }
    out
}
