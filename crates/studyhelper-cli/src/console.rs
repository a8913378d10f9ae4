//! The interactive loop.
//!
//! Reads one command per stdin line while rendering core events (log lines,
//! popups) as they arrive. Reminder tasks run on the same runtime and are
//! abandoned when the loop returns. Input is read as raw bytes and decoded
//! lossily, so a stray non-UTF-8 line is just an unknown command.

use std::io::Write;

use studyhelper_core::{Config, Event, StudyHelper};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::broadcast::Receiver;
use tracing::warn;

use crate::commands::{self, Flow};
use crate::render;

pub async fn run(app: &StudyHelper, config: &Config) {
    let mut events = app.events().subscribe();
    app.announce();
    render::catalog(app);
    render::delivery_notice(app);
    drain(&mut events);
    prompt();

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut buf = Vec::new();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            // `read_until` keeps partial input in `buf` if another branch wins.
            read = stdin.read_until(b'\n', &mut buf) => {
                match read {
                    Ok(0) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "stdin closed");
                        break;
                    }
                }
                let line = String::from_utf8_lossy(&buf)
                    .trim_end_matches(['\r', '\n'])
                    .to_string();
                buf.clear();
                let flow = commands::dispatch(app, config, &line);
                drain(&mut events);
                if flow == Flow::Quit {
                    break;
                }
                prompt();
            }
            event = events.recv() => match event {
                Ok(event) => render::event(&event),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "console fell behind on events"),
                Err(RecvError::Closed) => break,
            },
            _ = &mut ctrl_c => break,
        }
    }

    drain(&mut events);
    println!("Bye!");
}

/// Render everything already published, without waiting.
fn drain(events: &mut Receiver<Event>) {
    loop {
        match events.try_recv() {
            Ok(event) => render::event(&event),
            Err(TryRecvError::Lagged(skipped)) => warn!(skipped, "console fell behind on events"),
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
