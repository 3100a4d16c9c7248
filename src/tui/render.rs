use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::app::App;
use super::markdown::parse_markdown;
use crate::agents::Role;
use crate::constants::LANGUAGES;
use crate::render::{avatar_for, display_text, visible_entries};
use crate::session::Page;

const TITLE: &str = "On-boarding Mentor";

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(20)])
        .split(chunks[1]);

    render_sidebar(frame, content[0], app);
    render_chat(frame, content[1], app);
    render_input(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let ui = &app.manager.config().ui;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            TITLE,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(ui.user_name.as_str(), Style::default().fg(Color::Gray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .alignment(Alignment::Center);

    frame.render_widget(header, area);
}

fn selectable(label: &str, selected: bool) -> ListItem<'static> {
    let (marker, style) = if selected {
        ("▶ ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    } else {
        ("  ", Style::default().fg(Color::White))
    };
    ListItem::new(Line::from(vec![
        Span::styled(marker, style),
        Span::styled(label.to_string(), style),
    ]))
}

/// Page navigation and language selection
fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let mut items = vec![ListItem::new(Span::styled("Pages (Tab)", heading))];
    for page in [Page::Home, Page::Rag] {
        items.push(selectable(page.title(), page == app.page));
    }

    items.push(ListItem::new(""));
    items.push(ListItem::new(Span::styled("Language (F2)", heading)));
    for (i, language) in LANGUAGES.iter().enumerate() {
        items.push(selectable(language, i == app.language));
    }

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::RIGHT)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    frame.render_widget(list, area);
}

fn role_color(role: Role) -> Color {
    match role {
        Role::User => Color::Blue,
        Role::Proxy => Color::Yellow,
        Role::GraphAgent | Role::TextAgent => Color::Green,
        Role::Assistant => Color::Cyan,
    }
}

/// Timeline of the current page
fn render_chat(frame: &mut Frame, area: Rect, app: &App) {
    let ui = &app.manager.config().ui;
    let mut lines: Vec<Line> = Vec::new();

    for entry in visible_entries(app.messages()) {
        let role = entry.message.role;
        lines.push(Line::from(vec![
            Span::raw(format!("{} ", avatar_for(role, ui))),
            Span::styled(
                role.name(),
                Style::default().fg(role_color(role)).add_modifier(Modifier::BOLD),
            ),
        ]));

        match app.revealed_text(entry.index) {
            Some(partial) => {
                lines.push(Line::from(vec![
                    Span::raw(partial.to_string()),
                    Span::styled("▋", Style::default().fg(Color::Green)),
                ]));
            }
            None => lines.extend(parse_markdown(&display_text(entry.message))),
        }
        lines.push(Line::from(""));
    }

    if app.is_generating && app.reveal.is_none() {
        lines.push(Line::from(Span::styled(
            "Thinking...",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    if let Some(notice) = &app.notice {
        lines.push(Line::from(vec![
            Span::styled(
                "[System] ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw(notice.clone()),
        ]));
    }

    // Keep the newest rows in view unless the user scrolled up. Rows are
    // counted after wrapping, since that is what `scroll` moves by.
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let height = area.height.saturating_sub(2);
    let rows = paragraph.line_count(area.width.saturating_sub(2));
    let total = u16::try_from(rows).unwrap_or(u16::MAX);
    let top = total.saturating_sub(height).saturating_sub(app.scroll_offset);

    let paragraph = paragraph
        .block(
            Block::default()
                .title(format!(" {} ", app.page.title()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .scroll((top, 0));

    frame.render_widget(paragraph, area);
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let placeholder = &app.manager.config().ui.placeholder;
    let text = if app.input.is_empty() {
        Span::styled(placeholder.as_str(), Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(app.input.as_str(), Style::default().fg(Color::White))
    };

    let input = Paragraph::new(Line::from(text)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Message (Enter to send • :help for commands) "),
    );
    frame.render_widget(input, area);

    let cursor_offset = u16::try_from(app.input.chars().count()).unwrap_or(u16::MAX);
    let cursor_x = (area.x + 1)
        .saturating_add(cursor_offset)
        .min(area.x + area.width.saturating_sub(2));
    frame.set_cursor_position((cursor_x, area.y + 1));
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let status = if let Some(status) = &app.status_message {
        status.clone()
    } else if app.is_generating {
        "Generating response...".to_string()
    } else {
        "Ready".to_string()
    };

    let spans = vec![
        Span::styled(
            format!(" {} ", app.page.title()),
            Style::default()
                .bg(Color::Green)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::raw(app.language_name()),
        Span::raw(" | "),
        Span::raw(status),
        Span::raw(" | "),
        Span::styled("Esc/Ctrl+C: quit", Style::default().fg(Color::DarkGray)),
    ];

    let status_bar = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::Black))
        .block(Block::default());

    frame.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::ChatMessage;
    use crate::app::Config;
    use crate::docs::DocumentStore;
    use crate::router::ChatManager;
    use crate::tui::UiEvent;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn app() -> App {
        let config = Arc::new(Config::default());
        let store = DocumentStore::from_config(&config.documents);
        let manager = ChatManager::with_agents(config, store, None, None, None);
        App::new(Arc::new(manager), Page::Rag, "English")
    }

    fn screen(app: &App) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| render_ui(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    fn long_answer(app: &mut App) {
        assert!(app.submit("Tell me everything about the Sales team"));
        app.apply(UiEvent::Reply {
            page: Page::Rag,
            messages: vec![ChatMessage::new(
                Role::GraphAgent,
                format!("{}FINALWORD", "word ".repeat(200)),
            )],
        });
        app.apply(UiEvent::Done);
    }

    #[test]
    fn test_end_of_wrapped_answer_is_visible() {
        let mut app = app();
        long_answer(&mut app);

        let rows = screen(&app);
        assert!(
            rows.iter().any(|row| row.contains("FINALWORD")),
            "newest answer is cut off:\n{}",
            rows.join("\n")
        );
    }

    #[test]
    fn test_scrolling_up_moves_past_wrapped_rows() {
        let mut app = app();
        long_answer(&mut app);
        app.scroll_up(20);

        let rows = screen(&app);
        assert!(!rows.iter().any(|row| row.contains("FINALWORD")));
    }
}
