use crate::application::{App, AppMode, SwipeState};
use crate::domain::{Book, LikedBooks};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);

    let view = if app.mode == AppMode::Help { app.help_return } else { app.mode };
    match view {
        AppMode::Liked | AppMode::ExportCsv => {
            render_liked(f, &app.liked, app.liked_selected, chunks[1])
        }
        _ => render_swipe(f, &app.swipe, chunks[1]),
    }

    render_status_bar(f, app, chunks[2]);

    if app.mode == AppMode::Help {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(format!(
        "bookswipe - Book Discovery | Liked: {}",
        app.liked.len()
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_swipe(f: &mut Frame, swipe: &SwipeState, area: Rect) {
    match swipe {
        SwipeState::Loading { attempts, candidate } => {
            let mut lines = vec![Line::from("Searching for a book...")];
            if let Some(isbn) = candidate {
                lines.push(Line::from(format!("Attempt {attempts}: ISBN {isbn}")));
            }
            let loading = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Discover"))
                .style(Style::default().fg(Color::Yellow));
            f.render_widget(loading, area);
        }
        SwipeState::Showing(book) => render_book_card(f, book, area),
        SwipeState::Failed(message) => {
            let text = vec![
                Line::from(Span::styled("Error", Style::default().add_modifier(Modifier::BOLD))),
                Line::from(message.as_str()),
                Line::from(""),
                Line::from("Press r to retry"),
            ];
            let panel = Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title("Discover"))
                .style(Style::default().fg(Color::Red));
            f.render_widget(panel, area);
        }
    }
}

fn render_book_card(f: &mut Frame, book: &Book, area: Rect) {
    let text = Text::from(vec![
        Line::from(Span::styled(
            book.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("ISBN {}", book.id),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            format!("Cover: {}", book.display_image_url()),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(book.caption.as_str()),
    ]);

    let card = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Discover"));
    f.render_widget(card, area);
}

fn render_liked(f: &mut Frame, liked: &LikedBooks, selected: usize, area: Rect) {
    let title = format!("Liked books ({})", liked.len());

    if liked.is_empty() {
        let empty = Paragraph::new("No liked books yet. Swipe right on a book to keep it here.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = liked
        .books()
        .iter()
        .map(|book| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    book.title.as_str(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("  {}  {}", book.id, book.caption),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Swipe => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else if matches!(app.swipe, SwipeState::Failed(_)) {
                "r: retry | Tab: liked books | F1/?: help | q: quit".to_string()
            } else {
                "←/h: skip | →/l: like | Tab: liked books | F1/?: help | q: quit".to_string()
            }
        }
        AppMode::Liked => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                "↑↓/jk: select | d: remove | Ctrl+E: export CSV | Tab/Esc: back | q: quit".to_string()
            }
        }
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
        AppMode::ExportCsv => format!("Export CSV as: {} (Enter to export, Esc to cancel)", app.filename_input),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Swipe => Style::default(),
            AppMode::Liked => Style::default().fg(Color::Green),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::ExportCsv => Style::default().fg(Color::Magenta),
        });
    f.render_widget(input, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("bookswipe Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> &'static str {
    r#"BOOKSWIPE

=== HOW IT WORKS ===
• A random ISBN-13 in the configured namespace is generated
• The book metadata service is asked about it
• Unknown or failed candidates are retried every 500ms (configurable)
• The first match is shown; decide whether you like it

=== DISCOVER VIEW ===
← / h / x       Skip this book
→ / l / Enter   Like this book (adds it to the liked list)
r               Retry after an error
Tab / b         Open liked books

Swiping is disabled while a search is running.

=== LIKED BOOKS VIEW ===
↑↓ or j/k       Select a book
d / Delete      Remove the selected book
Ctrl+E          Export liked books to a CSV file
Tab / Esc       Back to discovering

Liked books are kept for this session only.

=== CONFIGURATION (environment) ===
BOOKSWIPE_API_URL            Lookup service URL
BOOKSWIPE_ISBN_PREFIX        6-digit ISBN namespace (978409)
BOOKSWIPE_RETRY_DELAY_MS     Pause between attempts (500)
BOOKSWIPE_MAX_ATTEMPTS       Give up after N attempts (0 = never)
BOOKSWIPE_HTTP_TIMEOUT_SECS  Per-request timeout (30)
BOOKSWIPE_LOG_FILE           Log destination
RUST_LOG                     Log filter (info)

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window"#
}
