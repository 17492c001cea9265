//! Full-screen terminal session.

use std::io::{self, Write};

use crossterm::terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, style};
use worldclock_core::ClockPanel;
use worldclock_core::config::DisplayConfig;

use crate::render;

/// How the screen is attached to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Attach {
    /// Output is the user's terminal: raw mode on, layout fitted to its width.
    Terminal,
    /// Output is any writer: escape sequences only, no tty calls.
    #[default]
    Detached,
}

/// Owns the alternate screen while alive.
///
/// Dropping it restores the normal screen, cursor and tty mode,
/// including when the clock loop exits with an error.
pub struct Screen<W: Write> {
    out: W,
    attach: Attach,
}

impl<W: Write> Screen<W> {
    /// Switches to the alternate screen and hides the cursor.
    ///
    /// When attached to a terminal, raw mode stops key presses from being
    /// echoed over the clocks.
    pub fn enter(mut out: W, attach: Attach) -> io::Result<Self> {
        if attach == Attach::Terminal {
            terminal::enable_raw_mode()?;
        }
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        Ok(Self { out, attach })
    }

    /// Current width in columns, when attached to a terminal.
    pub fn columns(&self) -> Option<u16> {
        match self.attach {
            Attach::Terminal => terminal::size().ok().map(|(cols, _)| cols),
            Attach::Detached => None,
        }
    }

    /// Paints the panel as a complete frame.
    pub fn draw(&mut self, panel: &ClockPanel, display: &DisplayConfig) -> io::Result<()> {
        let columns = self.columns();
        render::draw(&mut self.out, panel, display, columns)?;
        self.out.flush()
    }
}

impl<W: Write> Drop for Screen<W> {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            style::ResetColor,
            cursor::Show,
            LeaveAlternateScreen
        );
        if self.attach == Attach::Terminal {
            let _ = terminal::disable_raw_mode();
        }
    }
}
