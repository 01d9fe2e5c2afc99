use color_eyre::Result;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stdout, Write};
use tracing::{debug, warn};

/// Raw mode, alternate screen and mouse capture, undone step by step on failure
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
    debug!(width, height, "setting up terminal");

    enable_raw_mode().map_err(|e| color_eyre::eyre::eyre!("Failed to enable raw mode: {e}"))?;

    let mut stdout = stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        let _ = disable_raw_mode();
        return Err(color_eyre::eyre::eyre!(
            "Failed to enter alternate screen: {e}"
        ));
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(term) => term,
        Err(e) => {
            let _ = execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
            let _ = disable_raw_mode();
            return Err(color_eyre::eyre::eyre!("Failed to create terminal: {e}"));
        }
    };

    // Not fatal
    if let Err(e) = terminal.clear() {
        warn!("Failed to clear terminal: {e}");
    }
    if let Err(e) = execute!(std::io::stdout(), cursor::Hide) {
        warn!("Failed to hide cursor: {e}");
    }

    Ok(terminal)
}

/// Restore the terminal, reporting but not failing on each step
pub fn cleanup_terminal_state(raw_mode: bool, alternate_screen: bool) {
    let mut stdout_handle = stdout();

    if let Err(e) = execute!(stdout_handle, cursor::Show) {
        warn!("Failed to show cursor: {e}");
    }

    if alternate_screen {
        if let Err(e) = execute!(stdout_handle, DisableMouseCapture, LeaveAlternateScreen) {
            warn!("Failed to leave alternate screen: {e}");
        }
    }

    if raw_mode {
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to disable raw mode: {e}");
        }
    }

    let _ = execute!(stdout_handle, cursor::MoveToNextLine(1));
    let _ = stdout_handle.flush();
    debug!("terminal restored");
}
