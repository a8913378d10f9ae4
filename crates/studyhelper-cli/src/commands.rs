use clap::{Parser, Subcommand};
use studyhelper_core::{Config, ReminderDefinition, ReminderKey, StudyHelper, QUICK_CHECK_IN};

use crate::render;

#[derive(Parser)]
#[command(name = "studyhelper", no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

/// A row is addressed by its number in `list`, its key, or its name.
#[derive(Subcommand)]
enum Command {
    /// Show all reminders and whether they are running
    #[command(alias = "ls")]
    List,
    /// Start a reminder
    Start { target: String },
    /// Stop a reminder
    Stop { target: String },
    /// Start a stopped reminder or stop a running one
    Toggle { target: String },
    /// Restart a running reminder's countdown from now
    Reset { target: String },
    /// Add a custom reminder (quote arguments that contain spaces)
    Add {
        name: String,
        message: String,
        minutes: String,
    },
    /// Stop and delete a custom reminder
    #[command(alias = "rm")]
    Remove { target: String },
    /// Send a quick check-in reminder right away
    Now,
    /// Print the whole status log
    Log,
    /// Clear the status log
    Clear,
    /// List popups that are still on screen
    Popups,
    /// Dismiss a popup
    Ack { id: u64 },
    /// Show configuration, or a single dot-separated key
    Config { key: Option<String> },
    /// Leave Study Helper
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn dispatch(app: &StudyHelper, config: &Config, input: &str) -> Flow {
    let Some(words) = shlex::split(input) else {
        println!("error: unbalanced quotes");
        return Flow::Continue;
    };
    if words.is_empty() {
        return Flow::Continue;
    }
    match Line::try_parse_from(words) {
        Ok(line) => run(app, config, line.command),
        Err(e) => {
            print!("{e}");
            Flow::Continue
        }
    }
}

/// Find a catalog row by 1-based position, key, or case-insensitive name.
fn resolve(app: &StudyHelper, target: &str) -> Option<ReminderDefinition> {
    let rows = app.catalog().list();
    if let Ok(n) = target.parse::<usize>() {
        if let Some(def) = n.checked_sub(1).and_then(|i| rows.get(i)) {
            return Some(def.clone());
        }
    }
    app.catalog()
        .find(&ReminderKey::from(target))
        .or_else(|| rows.into_iter().find(|d| d.name.eq_ignore_ascii_case(target)))
}

fn resolve_key(app: &StudyHelper, target: &str) -> ReminderKey {
    resolve(app, target)
        .map(|d| d.key())
        .unwrap_or_else(|| ReminderKey::from(target))
}

fn run(app: &StudyHelper, config: &Config, command: Command) -> Flow {
    let scheduler = app.scheduler();
    match command {
        Command::List => render::catalog(app),
        Command::Start { target } => match resolve(app, &target) {
            Some(def) => {
                if let Err(e) = scheduler.start(&def.key(), def.interval_minutes, &def.message) {
                    println!("error: {e}");
                }
            }
            None => println!("no reminder matches '{target}'"),
        },
        Command::Stop { target } => {
            scheduler.stop(&resolve_key(app, &target));
        }
        Command::Toggle { target } => match resolve(app, &target) {
            Some(def) => {
                if let Err(e) = scheduler.toggle(&def.key(), def.interval_minutes, &def.message) {
                    println!("error: {e}");
                }
            }
            None => println!("no reminder matches '{target}'"),
        },
        Command::Reset { target } => {
            scheduler.reset(&resolve_key(app, &target));
        }
        Command::Add {
            name,
            message,
            minutes,
        } => {
            // Failures are already reported in the status log.
            let _ = app.add_custom(&name, &message, &minutes);
        }
        Command::Remove { target } => {
            let key = resolve_key(app, &target);
            if app.remove_custom(&key).is_none() {
                println!("'{target}' is not a custom reminder");
            }
        }
        Command::Now => {
            scheduler.remind_now(QUICK_CHECK_IN);
        }
        Command::Log => render::log(app),
        Command::Clear => app.log().clear(),
        Command::Popups => render::popups(app),
        Command::Ack { id } => {
            if !scheduler.sink().popups().acknowledge(id) {
                println!("no popup #{id} on screen");
            }
        }
        Command::Config { key: Some(key) } => match config.get(&key) {
            Some(value) => println!("{value}"),
            None => println!("unknown key: {key}"),
        },
        Command::Config { key: None } => match serde_json::to_string_pretty(config) {
            Ok(json) => println!("{json}"),
            Err(e) => println!("error: {e}"),
        },
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use studyhelper_core::reminder::builtin_reminders;
    use studyhelper_core::{EventBus, NotificationSink, PopupBoard};

    fn helper() -> StudyHelper {
        let bus = EventBus::new();
        let sink = NotificationSink::fallback_only(
            "Study Reminder",
            PopupBoard::new(Duration::from_secs(10), bus.clone()),
        );
        StudyHelper::new(builtin_reminders(), sink, bus)
    }

    #[test]
    fn resolves_by_row_key_and_name() {
        let app = helper();
        assert_eq!(resolve(&app, "1").unwrap().name, "Hydrate");
        assert_eq!(resolve(&app, "Hydrate_30").unwrap().name, "Hydrate");
        assert_eq!(resolve(&app, "deep breathing").unwrap().interval_minutes, 45);
        assert!(resolve(&app, "0").is_none());
        assert!(resolve(&app, "99").is_none());
    }

    #[test]
    fn unknown_key_is_passed_through() {
        let app = helper();
        assert_eq!(resolve_key(&app, "ghost_5").as_str(), "ghost_5");
    }

    #[tokio::test(start_paused = true)]
    async fn dispatch_add_then_toggle() {
        let app = helper();
        let config = Config::default();
        assert_eq!(
            dispatch(&app, &config, r#"add Posture "Check your posture" 20"#),
            Flow::Continue
        );
        assert_eq!(app.catalog().customs().len(), 1);

        dispatch(&app, &config, "toggle 8");
        assert!(app.registry().is_active(&ReminderKey::from("custom_Posture_20")));
        dispatch(&app, &config, "stop custom_Posture_20");
        assert!(app.registry().is_empty());
    }

    #[test]
    fn quit_and_exit_end_the_loop() {
        let app = helper();
        let config = Config::default();
        assert_eq!(dispatch(&app, &config, "quit"), Flow::Quit);
        assert_eq!(dispatch(&app, &config, "exit"), Flow::Quit);
    }

    #[test]
    fn bad_input_keeps_going() {
        let app = helper();
        let config = Config::default();
        assert_eq!(dispatch(&app, &config, ""), Flow::Continue);
        assert_eq!(dispatch(&app, &config, "frobnicate"), Flow::Continue);
        assert_eq!(dispatch(&app, &config, "add \"unterminated"), Flow::Continue);
    }
}
