use chrono::{DateTime, Local, Utc};
use studyhelper_core::{DismissReason, Event, ReminderSource, StudyHelper};

fn clock(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

pub fn catalog(app: &StudyHelper) {
    let now = Utc::now();
    let mut section = None;
    for (i, def) in app.catalog().list().iter().enumerate() {
        if section != Some(def.source) {
            section = Some(def.source);
            match def.source {
                ReminderSource::Builtin => println!("Built-in Reminders"),
                ReminderSource::Custom => println!("Custom Reminders"),
            }
        }
        let status = match app.registry().get(&def.key()) {
            Some(active) => format!("running, next at {}", clock(active.next_fire_at(now))),
            None => "stopped".to_string(),
        };
        println!("  {:>2}. {:<40} [{status}]", i + 1, def.label());
    }
}

pub fn delivery_notice(app: &StudyHelper) {
    if !app.scheduler().sink().has_native() {
        println!("(desktop notifications unavailable; reminders will pop up here)");
    }
}

pub fn log(app: &StudyHelper) {
    let lines = app.log().lines();
    if lines.is_empty() {
        println!("(status log is empty)");
    }
    for line in lines {
        println!("{line}");
    }
}

pub fn popups(app: &StudyHelper) {
    let visible = app.scheduler().sink().popups().visible();
    if visible.is_empty() {
        println!("(no popups)");
    }
    for popup in visible {
        println!(
            "  #{} {} (closes at {})",
            popup.id,
            popup.message,
            popup.dismiss_at.with_timezone(&Local).format("%H:%M:%S")
        );
    }
}

pub fn event(event: &Event) {
    match event {
        Event::LogAppended { line, .. } => println!("{line}"),
        Event::LogCleared { .. } => println!("(status log cleared)"),
        Event::PopupShown { id, title, message, .. } => {
            println!("┌── 🔔 {title} ── #{id}");
            println!("│ {message}");
            println!("└── type `ack {id}` when done");
        }
        Event::PopupDismissed {
            id,
            reason: DismissReason::Expired,
            ..
        } => println!("(popup #{id} closed)"),
        _ => {}
    }
}
