//! Terminal rendering for scheduler records.

use chrono::{NaiveDate, NaiveTime};
use owo_colors::OwoColorize;
use scheduler_core::query::tasks::{is_due_soon, is_due_today, is_overdue};
use scheduler_core::{Event, Priority, ReminderSignal, Settings, Task};

/// 12-hour clock, e.g. "2:05 PM".
pub fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%a %b %-d, %Y").to_string()
}

pub fn event_line(event: &Event) -> String {
    let status = if event.is_completed {
        "✓".green().to_string()
    } else {
        "•".to_string()
    };
    format!(
        "{status} {} {} {} {}",
        format_date(event.date).bold(),
        format_time(event.time),
        event.title,
        format!("[{}] {}", event.kind, event.id).dimmed()
    )
}

pub fn event_details(event: &Event) -> Vec<String> {
    let mut lines = vec![
        event.title.bold().to_string(),
        format!("  id:        {}", event.id),
        format!(
            "  when:      {} at {}",
            format_date(event.date),
            format_time(event.time)
        ),
        format!("  type:      {}", event.kind),
        format!("  reminder:  {} min before", event.reminder_minutes),
        format!("  completed: {}", event.is_completed),
    ];
    if let Some(description) = &event.description {
        lines.push(format!("  notes:     {description}"));
    }
    lines
}

pub fn task_line(task: &Task, today: NaiveDate) -> String {
    let check = if task.is_completed { "[x]" } else { "[ ]" };
    let title = if task.is_completed {
        task.title.strikethrough().dimmed().to_string()
    } else {
        task.title.clone()
    };
    let mut line = format!("{check} {} {title}", priority_badge(task.priority));
    if let Some(badge) = due_badge(task, today) {
        line.push(' ');
        line.push_str(&badge);
    }
    line.push(' ');
    line.push_str(&format!("[{}] {}", task.category, task.id).dimmed().to_string());
    line
}

pub fn task_details(task: &Task, today: NaiveDate) -> Vec<String> {
    let mut lines = vec![
        task.title.bold().to_string(),
        format!("  id:        {}", task.id),
        format!("  category:  {}", task.category),
        format!("  priority:  {}", task.priority),
        format!("  completed: {}", task.is_completed),
    ];
    if let Some(due) = task.due_date {
        let badge = due_badge(task, today).unwrap_or_default();
        lines.push(format!("  due:       {} {badge}", format_date(due)));
    }
    if let Some(completed) = task.completed_date {
        lines.push(format!("  done at:   {}", completed.format("%Y-%m-%d %H:%M UTC")));
    }
    if let Some(description) = &task.description {
        lines.push(format!("  notes:     {description}"));
    }
    lines
}

pub fn settings_lines(settings: &Settings) -> Vec<String> {
    vec![
        format!("theme:            {}", settings.theme),
        format!("default reminder: {} min", settings.default_reminder_time),
        format!("notifications:    {}", settings.notifications),
    ]
}

pub fn signal_line(signal: &ReminderSignal) -> String {
    match signal {
        ReminderSignal::Reminder { .. } => format!("🔔 {signal}").yellow().to_string(),
        ReminderSignal::Overdue { .. } => format!("⏰ {signal}").red().to_string(),
    }
}

fn priority_badge(priority: Priority) -> String {
    match priority {
        Priority::High => "high".red().to_string(),
        Priority::Medium => "med ".yellow().to_string(),
        Priority::Low => "low ".blue().to_string(),
    }
}

fn due_badge(task: &Task, today: NaiveDate) -> Option<String> {
    if is_overdue(task, today) {
        Some("overdue".red().bold().to_string())
    } else if is_due_today(task, today) {
        Some("due today".yellow().to_string())
    } else if is_due_soon(task, today) {
        Some("due soon".cyan().to_string())
    } else {
        task.due_date
            .map(|due| format!("due {}", due.format("%Y-%m-%d")).dimmed().to_string())
    }
}
