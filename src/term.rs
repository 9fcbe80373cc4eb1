use std::io::{self, Write};

use crossterm::{cursor, event, execute, terminal};
use tracing::warn;

/// Raw mode plus alternate screen for as long as it lives. Dropping it puts
/// the terminal back, also when unwinding from an error.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter(out: &mut impl Write) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self { _private: () };
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            event::EnableMouseCapture,
        )?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        let restored = execute!(
            out,
            event::DisableMouseCapture,
            terminal::EnableLineWrap,
            cursor::Show,
            terminal::LeaveAlternateScreen,
        )
        .and_then(|()| terminal::disable_raw_mode());
        if let Err(e) = restored {
            warn!(error = %e, "could not restore the terminal");
        }
    }
}
