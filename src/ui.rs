use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Tabs},
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    symbols,
};

use crate::app::App;
use crate::models::{Tab, User};
use crate::panel::RowSlot;
use crate::theme::Theme;

/// Rows that have a bundled avatar colour; later rows get the fallback glyph.
const BUNDLED_AVATARS: usize = 8;
const FALLBACK_AVATAR: &str = "◆";

/// Renders the whole panel and records the list height on the app.
pub fn render(f: &mut Frame, app: &mut App, theme: &Theme) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    render_tabs(f, chunks[0], app.panel().snapshot().tab, theme);

    // Borders take one row each side.
    app.set_viewport_height(chunks[1].height.saturating_sub(2) as usize);
    render_list(f, chunks[1], app, theme);
    render_footer(f, chunks[2], app, theme);
}

fn render_tabs(f: &mut Frame, area: Rect, active: Tab, theme: &Theme) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| {
            let style = if *tab == active { theme.tab_active } else { theme.tab_inactive };
            Line::from(Span::styled(tab.title(), style))
        })
        .collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(theme.border)))
        .highlight_style(theme.tab_active)
        .select(active.as_index())
        .divider(symbols::line::VERTICAL)
        .padding("  ", "  ");
    f.render_widget(tabs, area);
}

fn render_list(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let panel = app.panel();
    let rows = panel.rows();
    let height = app.viewport_height().max(1);
    let inner_width = layout[0].width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = rows
        .iter()
        .skip(app.offset())
        .take(height)
        .map(|slot| match slot {
            RowSlot::User { key, user } => ListItem::new(user_line(user, key.position, inner_width, theme)),
            RowSlot::Placeholder(i) => ListItem::new(placeholder_line(*i, inner_width, theme)),
        })
        .collect();

    let mut state = ListState::default();
    if panel.visible_user_count() > 0 {
        state.select(Some(app.selected().saturating_sub(app.offset())));
    }

    let title = format!(" {} ", panel.snapshot().tab.title());
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL).border_style(Style::default().fg(theme.border)))
        .highlight_style(Style::default().bg(theme.selection_bg));
    f.render_stateful_widget(list, layout[0], &mut state);

    let mut sb = ScrollbarState::default()
        .position(app.offset())
        .content_length(rows.len());
    f.render_stateful_widget(
        Scrollbar::default().orientation(ScrollbarOrientation::VerticalRight),
        layout[1],
        &mut sb,
    );
}

pub fn avatar(position: usize, user: &User, theme: &Theme) -> Span<'static> {
    if position < BUNDLED_AVATARS {
        let initial = user
            .name
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "?".to_string());
        Span::styled(initial, Style::default().fg(theme.avatar_palette[position]).add_modifier(Modifier::BOLD))
    } else {
        Span::styled(FALLBACK_AVATAR, theme.avatar_fallback)
    }
}

pub fn follow_button(user: &User, theme: &Theme) -> (&'static str, Style) {
    if user.is_following {
        (" Following ", theme.following_button)
    } else {
        ("  Follow   ", theme.follow_button)
    }
}

fn user_line(user: &User, position: usize, width: usize, theme: &Theme) -> Line<'static> {
    let handle = format!("@{}", user.username);
    let (label, button_style) = follow_button(user, theme);
    // avatar + spaces + name + two spaces + handle
    let used = 3 + user.name.chars().count() + 2 + handle.chars().count() + label.chars().count();
    let pad = width.saturating_sub(used).max(1);
    Line::from(vec![
        avatar(position, user, theme),
        Span::raw("  "),
        Span::styled(user.name.clone(), theme.user_name),
        Span::raw("  "),
        Span::styled(handle, theme.user_handle),
        Span::raw(" ".repeat(pad)),
        Span::styled(label, button_style),
    ])
}

fn placeholder_line(index: usize, width: usize, theme: &Theme) -> Line<'static> {
    // Vary the bar length a little so the block does not look like a grid.
    let name_len = 14 + (index * 7) % 9;
    let handle_len = 8 + (index * 5) % 6;
    let bars = format!("▇  {}  {}", "▆".repeat(name_len), "▃".repeat(handle_len));
    let used = bars.chars().count();
    let tail = if width > used + 12 { format!("{}{}", " ".repeat(width - used - 11), "▆".repeat(11)) } else { String::new() };
    Line::from(Span::styled(format!("{}{}", bars, tail), theme.placeholder))
}

fn render_footer(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let snapshot = app.panel().snapshot();
    let status = if let Some(err) = &snapshot.last_error {
        Span::styled(format!("Load failed: {} (r to retry)", err), theme.error)
    } else if snapshot.in_flight() {
        Span::styled("Loading…", theme.status)
    } else {
        let more = if snapshot.has_more { "more available" } else { "end of list" };
        Span::styled(
            format!("{} users · page {} · {}", app.panel().users().len(), snapshot.cursor.page, more),
            Style::default().fg(theme.text_secondary),
        )
    };
    let keys = Span::styled(
        " | 1/2 or Tab switch | ↑/↓ j/k move | PgUp/PgDn | g/G top/bottom | r retry | q quit",
        theme.footer,
    );
    let footer = Paragraph::new(Line::from(vec![status, keys]))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.border)))
        .style(Style::default().fg(theme.text));
    f.render_widget(footer, area);
}
