// this_file: fontpick/src/tui/ui.rs
//
// Rendering of the browser screen

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::state::{BrowserState, Focus, StatusKind};

/// Consistent theme for the browser
struct Theme {
    title: Style,
    label: Style,
    selected: Style,
    focused_border: Style,
    border: Style,
    muted: Style,
    success: Style,
    error: Style,
    info: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            label: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            selected: Style::default()
                .bg(Color::Rgb(50, 50, 80))
                .add_modifier(Modifier::BOLD),
            focused_border: Style::default().fg(Color::Yellow),
            border: Style::default().fg(Color::DarkGray),
            muted: Style::default().fg(Color::DarkGray),
            success: Style::default().fg(Color::Green),
            error: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            info: Style::default().fg(Color::Blue),
        }
    }
}

/// Render the whole screen
pub fn render(frame: &mut Frame, state: &BrowserState) {
    let theme = Theme::default();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[0]);

    render_left_pane(frame, panes[0], state, &theme);
    render_info_pane(frame, panes[1], state, &theme);
    render_status_bar(frame, chunks[1], state, &theme);
    render_help_bar(frame, chunks[2], &theme);
}

/// Search box above the filtered font list
fn render_left_pane(frame: &mut Frame, area: Rect, state: &BrowserState, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let searching = state.focus == Focus::Search;
    let search_text = if state.query.value().is_empty() && !searching {
        Line::from(Span::styled("Type / to filter fonts...", theme.muted))
    } else {
        Line::from(state.query.value())
    };
    let search = Paragraph::new(search_text).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_style(if searching { theme.focused_border } else { theme.border }),
    );
    frame.render_widget(search, chunks[0]);

    if searching {
        let cursor_x = chunks[0].x + 1 + state.query.visual_cursor() as u16;
        frame.set_cursor_position((cursor_x.min(chunks[0].right().saturating_sub(2)), chunks[0].y + 1));
    }

    let items: Vec<ListItem> = state
        .matches
        .iter()
        .map(|entry| ListItem::new(entry.display_name()))
        .collect();
    let title = format!(" Fonts ({}) ", state.matches.len());
    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(if searching { theme.border } else { theme.focused_border }),
        )
        .highlight_style(theme.selected)
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if !state.matches.is_empty() {
        list_state.select(Some(state.selected));
    }
    frame.render_stateful_widget(list, chunks[1], &mut list_state);
}

/// Details and instructions for the highlighted font
fn render_info_pane(frame: &mut Frame, area: Rect, state: &BrowserState, theme: &Theme) {
    let mut lines: Vec<Line> = Vec::new();

    match state.selected_entry() {
        Some(entry) => {
            let location = state
                .font_dir
                .as_ref()
                .map(|dir| dir.display().to_string())
                .unwrap_or_else(|| "unavailable on this system".to_string());

            lines.push(Line::from(Span::styled("Font Name:", theme.label)));
            lines.push(Line::from(entry.display_name()));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Repository:", theme.label)));
            lines.push(Line::from(state.repository.as_str()));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Installation Location:", theme.label)));
            lines.push(Line::from(location));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Instructions:",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from("1. Press 'i' or Enter to install"));
            lines.push(Line::from("2. Wait for the download to complete"));
            lines.push(Line::from("3. Restart applications to use the font"));
            lines.push(Line::from("4. On Linux the font cache is refreshed automatically"));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Fonts are installed for the current user only.",
                theme.success,
            )));
        }
        None => {
            lines.push(Line::from(Span::styled("No font matches the search.", theme.muted)));
        }
    }

    let info = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(Span::styled(" Font Information ", theme.title))
            .borders(Borders::ALL)
            .border_style(theme.border),
    );
    frame.render_widget(info, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &BrowserState, theme: &Theme) {
    let style = match state.status.kind {
        StatusKind::Info => theme.info,
        StatusKind::Success => theme.success,
        StatusKind::Error => theme.error,
    };
    let status = Paragraph::new(Line::from(Span::styled(state.status.message.as_str(), style)))
        .block(Block::default().borders(Borders::ALL).border_style(theme.border));
    frame.render_widget(status, area);
}

fn render_help_bar(frame: &mut Frame, area: Rect, theme: &Theme) {
    let help = Line::from(vec![
        Span::styled(" / ", theme.label),
        Span::raw("search  "),
        Span::styled("j/k ", theme.label),
        Span::raw("move  "),
        Span::styled("i ", theme.label),
        Span::raw("install  "),
        Span::styled("r ", theme.label),
        Span::raw("reset  "),
        Span::styled("q/Esc ", theme.label),
        Span::raw("quit"),
    ]);
    frame.render_widget(Paragraph::new(help), area);
}
