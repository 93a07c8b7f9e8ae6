use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use scheduler_core::{storage_stats, TaskService};

use super::Store;

pub fn export(store: &Store<'_>, output: Option<&Path>) -> Result<()> {
    let json = store.export_json(Utc::now())?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            println!("{} {}", "Exported to".green(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn import(store: &Store<'_>, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    store
        .import_json(&text)
        .with_context(|| format!("`{}` is not a valid export", path.display()))?;
    println!("{} {}", "Imported".green(), path.display());
    Ok(())
}

pub fn clear(store: &Store<'_>, yes: bool) -> Result<()> {
    let confirmed = yes
        || Confirm::new()
            .with_prompt("Delete all events and tasks and reset settings?")
            .default(false)
            .interact()?;
    if !confirmed {
        println!("{}", "Aborted".dimmed());
        return Ok(());
    }

    store.clear_all()?;
    println!("{}", "All data cleared".red());
    Ok(())
}

pub fn stats(store: &Store<'_>) -> Result<()> {
    let now = Local::now();
    let stats = storage_stats(store, now.naive_local())?;
    let overdue = TaskService::new(store).stats(now.date_naive())?.overdue;

    println!("{}", "Events".bold());
    println!("  total:     {}", stats.total_events);
    println!("  upcoming:  {}", stats.upcoming_events);
    println!("  attended:  {}", stats.attended_events);
    println!("{}", "Tasks".bold());
    println!("  total:     {}", stats.total_tasks);
    println!("  pending:   {}", stats.pending_tasks);
    println!("  completed: {}", stats.completed_tasks);
    println!("  overdue:   {overdue}");
    Ok(())
}
