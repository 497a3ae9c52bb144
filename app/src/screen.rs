use anyhow::Result;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType};
use pdf_chat::{render, ChatState, RenderOptions};
use std::io::{self, Write};
use tokio::sync::watch;

pub fn draw(state: &ChatState) -> Result<()> {
    let width = terminal::size().map(|(w, _)| w as usize).unwrap_or(80);
    let opts = RenderOptions {
        width,
        ..RenderOptions::default()
    };

    let mut stdout = io::stdout();
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    for line in render(state, &opts) {
        writeln!(stdout, "{}", line)?;
    }
    stdout.flush()?;
    Ok(())
}

/// Redraws on every published state until the view goes away.
pub async fn redraw_loop(mut rx: watch::Receiver<ChatState>) {
    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        if let Err(e) = draw(&state) {
            log::error!("Failed to draw screen: {:#}", e);
        }
    }
    log::debug!("Chat view closed, redraw loop finished");
}
