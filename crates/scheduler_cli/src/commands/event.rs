use anyhow::{Result, bail};
use chrono::Local;
use owo_colors::OwoColorize;
use scheduler_core::{Event, EventDraft, EventPatch, EventService};

use super::Store;
use crate::render;
use crate::{EventCommand, EventView};

pub fn run(store: &Store<'_>, command: EventCommand) -> Result<()> {
    let service = EventService::new(store);

    match command {
        EventCommand::Add {
            title,
            date,
            time,
            kind,
            reminder,
            description,
        } => {
            let event = service.create(EventDraft {
                title,
                description,
                date,
                time,
                kind,
                reminder_minutes: reminder,
            })?;
            println!("{} {}", "Created".green(), render::event_line(&event));
        }
        EventCommand::List { view } => {
            let now = Local::now().naive_local();
            let events = match view {
                EventView::All => service.list()?,
                EventView::Upcoming => service.upcoming(now)?,
                EventView::Attended => service.attended(now)?,
            };
            print_events(&events, "No events found");
        }
        EventCommand::Show { id } => match service.get(&id)? {
            Some(event) => {
                for line in render::event_details(&event) {
                    println!("{line}");
                }
            }
            None => bail!("Event '{id}' not found"),
        },
        EventCommand::Edit {
            id,
            title,
            date,
            time,
            kind,
            reminder,
            description,
            clear_description,
        } => {
            let description = if clear_description {
                Some(None)
            } else {
                description.map(Some)
            };
            let patch = EventPatch {
                title,
                description,
                date,
                time,
                kind,
                reminder_minutes: reminder,
                is_completed: None,
            };
            if patch.is_empty() {
                bail!("Nothing to update; pass at least one field flag");
            }
            let event = service.update(&id, &patch)?;
            println!("{} {}", "Updated".green(), render::event_line(&event));
        }
        EventCommand::Complete { id } => {
            let event = service.complete(&id)?;
            println!("{} {}", "Completed".green(), render::event_line(&event));
        }
        EventCommand::Delete { id } => {
            service.delete(&id)?;
            println!("{} {id}", "Deleted".red());
        }
        EventCommand::On { date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let events = service.on_date(date)?;
            println!("{}", render::format_date(date).bold());
            print_events(&events, "Nothing scheduled");
        }
        EventCommand::Month { year, month } => {
            let events = service.in_month(year, month)?;
            print_events(&events, "No events this month");
        }
    }

    Ok(())
}

fn print_events(events: &[Event], empty: &str) {
    if events.is_empty() {
        println!("{}", empty.dimmed());
        return;
    }
    for event in events {
        println!("{}", render::event_line(event));
    }
}
