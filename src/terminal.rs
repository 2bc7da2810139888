//! Raw-mode terminal setup for the quiz runner.

use std::io::{self, Stdout};
use std::panic;
use std::sync::Once;

use crossterm::{
    ExecutableCommand,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

static PANIC_HOOK: Once = Once::new();

/// Switches to the alternate screen, runs `body`, and restores the terminal
/// whether or not `body` succeeded.
pub fn with_terminal<T, E>(body: impl FnOnce(&mut AppTerminal) -> Result<T, E>) -> Result<T, E>
where
    E: From<io::Error>,
{
    let mut terminal = init()?;
    let result = body(&mut terminal);
    settle(result, restore())
}

/// The body's own error takes precedence over a failure to restore.
fn settle<T, E>(result: Result<T, E>, restored: io::Result<()>) -> Result<T, E>
where
    E: From<io::Error>,
{
    let value = result?;
    restored?;
    Ok(value)
}

pub fn init() -> io::Result<AppTerminal> {
    PANIC_HOOK.call_once(install_panic_hook);
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(io::stdout()))
}

pub fn restore() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}
