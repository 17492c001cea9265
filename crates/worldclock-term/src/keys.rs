//! Quit keys for the clock loop.
//!
//! In raw mode Ctrl+C arrives as a key event instead of a signal, so a
//! listener thread watches the keyboard and signals the loop the same
//! way the Ctrl+C handler does.

use std::io;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Ctrl+C, `q` and Esc stop the clocks.
pub fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') | KeyCode::Esc => true,
        _ => false,
    }
}

/// Starts a thread that sends `()` on `tx` when a quit key is pressed.
///
/// The thread ends after the first quit key or when the terminal
/// stops delivering events.
pub fn spawn_listener(tx: Sender<()>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("worldclock-keys".into())
        .spawn(move || {
            loop {
                match event::poll(POLL_INTERVAL) {
                    Ok(true) => match event::read() {
                        Ok(Event::Key(key)) if is_quit(&key) => {
                            let _ = tx.send(());
                            return;
                        }
                        Ok(_) => {}
                        Err(_) => return,
                    },
                    Ok(false) => {}
                    Err(_) => return,
                }
            }
        })
}
