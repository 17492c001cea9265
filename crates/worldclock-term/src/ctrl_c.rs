//! Ctrl+C handling for the clock loop.

use std::sync::mpsc::Sender;

/// Registers a Ctrl+C handler that sends `()` on the given channel.
///
/// Only one handler can be registered per process.
pub fn set_handler(tx: Sender<()>) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        let _ = tx.send(());
    })
}
