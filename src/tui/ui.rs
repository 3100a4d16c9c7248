use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

use super::app::{App, UiEvent};
use super::render::render_ui;
use crate::constants::{UI_REFRESH_INTERVAL_MS, UI_SCROLL_LINES};
use crate::render::{display_text, stream_words, visible_entries, FixedDelay};
use crate::session::Page;

const HELP_TEXT: &str = "Commands: :clear (clear this page), :help (this help) • \
Keys: Enter send, Tab switch page, F2 language, PgUp/PgDn scroll, Esc/Ctrl+C quit";

/// Run the terminal UI until the user quits. Returns the final app state.
pub async fn run_ui(mut app: App) -> Result<App> {
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        eprintln!("❌ The interactive mentor requires a terminal.");
        eprintln!("   Use --prompt for non-interactive use.");
        return Err(anyhow::anyhow!("No interactive terminal available"));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Unbounded so streamed words are never dropped
    let (tx, mut rx) = mpsc::unbounded_channel::<UiEvent>();

    let res = run_app(&mut terminal, &mut app, tx, &mut rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map(|_| app)
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tx: mpsc::UnboundedSender<UiEvent>,
    rx: &mut mpsc::UnboundedReceiver<UiEvent>,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(Duration::from_millis(UI_REFRESH_INTERVAL_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key.code, key.modifiers, &tx);
                }
            }
        }

        while let Ok(update) = rx.try_recv() {
            app.apply(update);
        }
    }

    Ok(())
}

fn handle_key(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    tx: &mpsc::UnboundedSender<UiEvent>,
) {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Esc => app.quit(),
        KeyCode::Tab => app.switch_page(),
        KeyCode::F(2) => app.cycle_language(),
        KeyCode::PageUp => app.scroll_up(UI_SCROLL_LINES * 3),
        KeyCode::PageDown => app.scroll_down(UI_SCROLL_LINES * 3),
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.input);
            if let Some(command) = input.trim().strip_prefix(':') {
                handle_command(app, command);
            } else {
                send_prompt(app, input, tx.clone());
            }
        }
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => {
            app.input.pop();
        }
        _ => {}
    }
}

fn handle_command(app: &mut App, command: &str) {
    match command.trim() {
        "clear" => app.clear_page(),
        "help" | "h" => app.set_status(HELP_TEXT),
        "quit" | "q" => app.quit(),
        other => app.set_status(format!("Unknown command: :{}", other)),
    }
}

/// Answer a prompt in the background and feed the result back word by word
fn send_prompt(app: &mut App, prompt: String, tx: mpsc::UnboundedSender<UiEvent>) {
    if !app.submit(&prompt) {
        return;
    }

    let manager = app.manager.clone();
    let page = app.page;
    let language = app.language_name();
    let pacer = FixedDelay::from_millis(manager.config().ui.stream_delay_ms);
    info!(?page, language, "Sending prompt");

    tokio::spawn(async move {
        let result = match page {
            Page::Home => manager.home_response(&prompt, Some(language)).await,
            Page::Rag => manager.generate_response(&prompt, Some(language)).await,
        };

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                error!("Request failed: {}", e);
                let _ = tx.send(UiEvent::Failed(e.user_message()));
                return;
            }
        };

        let streamed = visible_entries(&response.messages)
            .iter()
            .find(|e| e.streamed)
            .map(|e| display_text(e.message));
        let _ = tx.send(UiEvent::Reply {
            page,
            messages: response.messages,
        });

        if let Some(text) = streamed {
            stream_words(&text, &pacer, |word| {
                let _ = tx.send(UiEvent::Word(word.to_string()));
            })
            .await;
        }
        let _ = tx.send(UiEvent::Done);
    });
}
