use anyhow::{Context, Result, bail};
use chrono::{Local, Utc};
use owo_colors::OwoColorize;
use scheduler_core::{TaskDraft, TaskFilter, TaskPatch, TaskService};

use super::Store;
use crate::TaskCommand;
use crate::render;

pub fn run(store: &Store<'_>, command: TaskCommand) -> Result<()> {
    let service = TaskService::new(store);
    let today = Local::now().date_naive();

    match command {
        TaskCommand::Add {
            title,
            category,
            priority,
            due,
            description,
        } => {
            let task = service.create(TaskDraft {
                title,
                description,
                category,
                priority,
                due_date: due,
            })?;
            println!("{} {}", "Created".green(), render::task_line(&task, today));
        }
        TaskCommand::List {
            category,
            priority,
            status,
        } => {
            let filter = TaskFilter::from_sentinels(&category, &priority, &status)
                .context("Invalid task filter")?;
            let tasks = service.list(&filter)?;
            if tasks.is_empty() {
                println!("{}", "No tasks found".dimmed());
            }
            for task in &tasks {
                println!("{}", render::task_line(task, today));
            }
        }
        TaskCommand::Show { id } => match service.get(&id)? {
            Some(task) => {
                for line in render::task_details(&task, today) {
                    println!("{line}");
                }
            }
            None => bail!("Task '{id}' not found"),
        },
        TaskCommand::Edit {
            id,
            title,
            category,
            priority,
            due,
            clear_due,
            description,
            clear_description,
        } => {
            let patch = TaskPatch {
                title,
                description: if clear_description {
                    Some(None)
                } else {
                    description.map(Some)
                },
                category,
                priority,
                due_date: if clear_due { Some(None) } else { due.map(Some) },
                ..TaskPatch::default()
            };
            if patch == TaskPatch::default() {
                bail!("Nothing to update; pass at least one field flag");
            }
            let task = service.update(&id, &patch)?;
            println!("{} {}", "Updated".green(), render::task_line(&task, today));
        }
        TaskCommand::Toggle { id } => {
            let task = service.toggle_completion(&id, Utc::now())?;
            println!("{}", render::task_line(&task, today));
        }
        TaskCommand::Delete { id } => {
            service.delete(&id)?;
            println!("{} {id}", "Deleted".red());
        }
    }

    Ok(())
}
