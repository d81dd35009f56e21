//! Full-screen connection list.
//!
//! Draws the header (count and active filter), the scrollable list with the
//! cursor row highlighted, the status line and the key help bar.

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{Mode, Status};
use crate::pgpass::Connection;

/// Everything the list needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct PickerView<'a> {
    pub filtered: &'a [Connection],
    pub total: usize,
    pub cursor: usize,
    pub filter_text: &'a str,
    pub mode: Mode,
    pub status: Option<&'a Status>,
}

/// Scroll state for the list. The cursor itself lives in the controller.
pub struct ConnectionList {
    scroll_offset: usize,
    /// Visible rows (set during render)
    visible_height: usize,
}

impl ConnectionList {
    pub fn new() -> Self {
        Self {
            scroll_offset: 0,
            visible_height: 10,
        }
    }

    /// Rows visible in the last frame, used as the page size.
    pub fn visible_height(&self) -> usize {
        self.visible_height
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    fn ensure_visible(&mut self, cursor: usize, len: usize) {
        if len == 0 || self.visible_height == 0 {
            self.scroll_offset = 0;
            return;
        }

        let max_offset = len.saturating_sub(self.visible_height);
        if self.scroll_offset > max_offset {
            self.scroll_offset = max_offset;
        }
        if cursor < self.scroll_offset {
            self.scroll_offset = cursor;
        }
        if cursor >= self.scroll_offset + self.visible_height {
            self.scroll_offset = cursor + 1 - self.visible_height;
        }
    }

    /// Render the picker into `area`.
    ///
    /// While the filter is being edited a 3-row slot is kept free between the
    /// list and the status line; its area is returned for the input box.
    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        view: PickerView<'_>,
    ) -> Option<Rect> {
        let editing = view.mode == Mode::EditingFilter;
        let mut constraints = vec![
            Constraint::Length(1), // Header
            Constraint::Min(3),    // List
        ];
        if editing {
            constraints.push(Constraint::Length(3)); // Filter box
        }
        constraints.push(Constraint::Length(1)); // Status
        constraints.push(Constraint::Length(1)); // Help
        let chunks = Layout::vertical(constraints).split(area);
        let n = chunks.len();

        frame.render_widget(header(&view), chunks[0]);
        self.render_list(frame, chunks[1], &view);
        frame.render_widget(status_line(view.status), chunks[n - 2]);
        frame.render_widget(help_line(view.mode), chunks[n - 1]);

        editing.then(|| chunks[2])
    }

    fn render_list(&mut self, frame: &mut Frame, area: Rect, view: &PickerView<'_>) {
        let border_color = match view.mode {
            Mode::Browsing => Color::Cyan,
            Mode::EditingFilter => Color::DarkGray,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.visible_height = inner.height as usize;

        if view.filtered.is_empty() {
            let msg = if view.total == 0 {
                "No connections found in the credentials file"
            } else {
                "No connections match the filter"
            };
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(msg, Style::default().fg(Color::DarkGray))),
            ])
            .alignment(Alignment::Center);
            frame.render_widget(empty, inner);
            return;
        }

        self.ensure_visible(view.cursor, view.filtered.len());

        let needs_scrollbar = view.filtered.len() > self.visible_height;
        let (list_area, scrollbar_area) = if needs_scrollbar {
            let chunks =
                Layout::horizontal([Constraint::Min(1), Constraint::Length(1)]).split(inner);
            (chunks[0], Some(chunks[1]))
        } else {
            (inner, None)
        };

        let width = list_area.width as usize;
        let items: Vec<ListItem> = view
            .filtered
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(self.visible_height)
            .map(|(i, conn)| connection_item(conn, i == view.cursor, width))
            .collect();

        frame.render_widget(List::new(items), list_area);

        if let Some(sb_area) = scrollbar_area {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None)
                .thumb_symbol("█")
                .track_symbol(Some("│"));
            let mut state = ScrollbarState::new(view.filtered.len()).position(self.scroll_offset);
            frame.render_stateful_widget(scrollbar, sb_area, &mut state);
        }
    }
}

impl Default for ConnectionList {
    fn default() -> Self {
        Self::new()
    }
}

fn header(view: &PickerView<'_>) -> Paragraph<'static> {
    let title_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut spans = if view.filter_text.is_empty() {
        vec![Span::styled(
            format!(" Connections ({}) ", view.total),
            title_style,
        )]
    } else {
        vec![
            Span::styled(
                format!(" Connections ({} of {}) ", view.filtered.len(), view.total),
                title_style,
            ),
            Span::raw(" filter: "),
            Span::styled(
                view.filter_text.to_string(),
                Style::default().fg(Color::Yellow),
            ),
        ]
    };

    spans.push(Span::styled(
        format!("  [{}]", view.mode.label()),
        Style::default().fg(Color::DarkGray),
    ));

    Paragraph::new(Line::from(spans))
}

fn connection_item(conn: &Connection, is_selected: bool, width: usize) -> ListItem<'static> {
    let marker = if is_selected { "> " } else { "  " };
    let label = truncate_to_width(&conn.label(), width.saturating_sub(marker.len()));

    let line = Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Yellow)),
        Span::raw(label),
    ]);

    let style = if is_selected {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    ListItem::new(line).style(style)
}

fn status_line(status: Option<&Status>) -> Paragraph<'static> {
    match status {
        Some(status) => {
            let color = if status.is_error() {
                Color::Red
            } else {
                Color::Green
            };
            Paragraph::new(Span::styled(
                format!(" {}", status.message()),
                Style::default().fg(color),
            ))
        }
        None => Paragraph::new(""),
    }
}

fn help_line(mode: Mode) -> Paragraph<'static> {
    let key = Style::default().fg(Color::Yellow);
    let spans = match mode {
        Mode::Browsing => vec![
            Span::styled("[j/k]", key),
            Span::raw(" move "),
            Span::styled("[f]", key),
            Span::raw("ilter "),
            Span::styled("[c]", key),
            Span::raw("lear "),
            Span::styled("[r]", key),
            Span::raw("eload "),
            Span::styled("[Enter]", key),
            Span::raw(" connect "),
            Span::styled("[q]", key),
            Span::raw(" quit"),
        ],
        Mode::EditingFilter => vec![
            Span::styled("[Enter]", key),
            Span::raw(" apply "),
            Span::styled("[Esc]", key),
            Span::raw(" cancel "),
            Span::styled("[Ctrl+c]", key),
            Span::raw(" quit"),
        ],
    };

    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

/// Truncate a string to a display width, adding ellipsis if needed.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return take_width(s, max_width);
    }
    format!("{}...", take_width(s, max_width - 3))
}

fn take_width(s: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}
