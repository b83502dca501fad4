use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout, Write, stdout};

use crate::error::Result;

pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Owns the terminal while the UI runs; raw mode and the alternate screen are
/// left on drop, including when the event loop bails out with an error.
pub struct TerminalGuard {
    terminal: AppTerminal,
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        if let Err(err) = crossterm::execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                let _ = leave_screen(&mut io::stdout());
                let _ = disable_raw_mode();
                Err(err.into())
            }
        }
    }

    pub fn terminal(&mut self) -> &mut AppTerminal {
        &mut self.terminal
    }
}

/// Switch back from the alternate screen on `out`.
fn leave_screen<W: Write>(out: &mut W) -> io::Result<()> {
    crossterm::execute!(out, LeaveAlternateScreen)
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = leave_screen(self.terminal.backend_mut());
        let _ = self.terminal.show_cursor();
    }
}
