use std::io::Stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as TermEvent, KeyEvent, KeyEventKind};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::{Frame, Terminal};
use tracing::debug;

use super::controller::SelectionController;
use super::input::{browse_event, filter_key, FilterKey};
use super::state::{Event, ExitAction, Mode, Step};
use crate::pgpass::ConnectionSource;
use crate::ui::{ConnectionList, FilterPrompt, PickerView};

/// The interactive picker: controller plus the widgets that draw it.
pub struct App<S> {
    pub controller: SelectionController<S>,
    list: ConnectionList,
    prompt: FilterPrompt,
}

impl<S: ConnectionSource> App<S> {
    pub fn new(controller: SelectionController<S>) -> Self {
        Self {
            controller,
            list: ConnectionList::new(),
            prompt: FilterPrompt::new(),
        }
    }

    /// Run until the user confirms a connection or quits.
    pub fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<ExitAction> {
        loop {
            self.draw(terminal)?;

            if event::poll(Duration::from_millis(50))? {
                if let TermEvent::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    if let Step::Exit(action) = self.on_key(key) {
                        return Ok(action);
                    }
                }
            }
        }
    }

    pub fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        terminal.draw(|frame| self.render(frame))?;
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();
        let c = &self.controller;
        let view = PickerView {
            filtered: c.filtered(),
            total: c.connections().len(),
            cursor: c.cursor(),
            filter_text: c.filter_text(),
            mode: c.mode(),
            status: c.status(),
        };

        let slot = self.list.render(frame, size, view);

        if let (true, Some(area)) = (self.prompt.active, slot) {
            self.prompt.render(frame, area);
        }
    }

    /// Route one key press to the handler set of the current mode.
    pub fn on_key(&mut self, key: KeyEvent) -> Step {
        let event = match self.controller.mode() {
            Mode::Browsing => match browse_event(key, self.list.visible_height()) {
                Some(ev) => Event::Browse(ev),
                None => {
                    debug!(?key, "unbound key");
                    return Step::Continue;
                }
            },
            Mode::EditingFilter => match filter_key(key, || self.prompt.text()) {
                FilterKey::Event(ev) => Event::Filter(ev),
                FilterKey::Edit => {
                    self.prompt.input(key);
                    return Step::Continue;
                }
            },
        };

        let before = self.controller.mode();
        let step = self.controller.handle(event);
        self.sync_prompt(before);
        step
    }

    /// Open or close the filter box when the mode changed.
    fn sync_prompt(&mut self, before: Mode) {
        match (before, self.controller.mode()) {
            (Mode::Browsing, Mode::EditingFilter) => {
                self.prompt.open(self.controller.filter_text());
            }
            (Mode::EditingFilter, Mode::Browsing) => self.prompt.close(),
            _ => {}
        }
    }

    pub fn prompt(&self) -> &FilterPrompt {
        &self.prompt
    }
}
