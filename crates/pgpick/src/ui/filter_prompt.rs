use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear};
use ratatui::Frame;
use tui_textarea::{CursorMove, Input, TextArea};

/// Single-line input box for the filter text.
pub struct FilterPrompt {
    pub active: bool,
    pub textarea: TextArea<'static>,
}

impl FilterPrompt {
    pub fn new() -> Self {
        let mut textarea = TextArea::new(vec![String::new()]);
        textarea.set_cursor_line_style(Style::default().add_modifier(Modifier::UNDERLINED));

        Self {
            active: false,
            textarea,
        }
    }

    /// Open the box pre-filled with `initial`, cursor at the end.
    pub fn open(&mut self, initial: &str) {
        self.active = true;
        self.textarea = TextArea::new(vec![initial.to_string()]);
        self.textarea
            .set_cursor_line_style(Style::default().add_modifier(Modifier::UNDERLINED));
        self.textarea.move_cursor(CursorMove::End);
    }

    pub fn close(&mut self) {
        self.active = false;
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    /// Forward an unbound key to the text box.
    pub fn input(&mut self, key: KeyEvent) {
        self.textarea.input(Input::from(key));
    }

    /// Render into the slot the list leaves free for it.
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .title("Filter (Enter apply, Esc cancel)")
                .border_style(Style::default().fg(Color::Yellow)),
        );

        frame.render_widget(Clear, area);
        frame.render_widget(&self.textarea, area);
    }
}

impl Default for FilterPrompt {
    fn default() -> Self {
        Self::new()
    }
}
