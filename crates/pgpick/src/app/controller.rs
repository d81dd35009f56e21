//! Selection state machine over the filtered connection list.
//!
//! The controller owns the filter text, the filtered view, the cursor and the
//! input mode. A key dispatcher feeds it [`Event`]s; the renderer only reads
//! it between events.

use tracing::{debug, info, warn};

use super::state::{BrowseEvent, Event, ExitAction, FilterEvent, Mode, Status, Step};
use crate::pgpass::{filter_connections, Connection, ConnectionSource, StoreError};

pub struct SelectionController<S> {
    source: S,
    /// Every connection from the last successful load.
    connections: Vec<Connection>,
    /// Subsequence of `connections` matching `filter_text`.
    filtered: Vec<Connection>,
    filter_text: String,
    cursor: usize,
    mode: Mode,
    status: Option<Status>,
    /// Set once a terminal transition happened.
    exit: Option<ExitAction>,
}

impl<S: ConnectionSource> SelectionController<S> {
    /// Load the initial connection set. Failing here is fatal to the caller,
    /// there is nothing to show.
    pub fn load(source: S) -> Result<Self, StoreError> {
        let connections = source.load()?;
        Ok(Self::with_connections(source, connections))
    }

    /// Build a controller over an already loaded set.
    pub fn with_connections(source: S, connections: Vec<Connection>) -> Self {
        Self {
            source,
            filtered: connections.clone(),
            connections,
            filter_text: String::new(),
            cursor: 0,
            mode: Mode::Browsing,
            status: None,
            exit: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn filtered(&self) -> &[Connection] {
        &self.filtered
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// The terminal exit action, once the session has ended.
    pub fn exit_action(&self) -> Option<&ExitAction> {
        self.exit.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.exit.is_some()
    }

    /// The connection under the cursor, if the filtered list is non-empty.
    pub fn selected(&self) -> Option<&Connection> {
        self.filtered.get(self.cursor)
    }

    /// Apply one event.
    ///
    /// Events that do not belong to the current mode are ignored, as is
    /// everything after a terminal transition.
    pub fn handle(&mut self, event: Event) -> Step {
        if let Some(action) = &self.exit {
            return Step::Exit(action.clone());
        }

        self.status = None;

        match (self.mode, event) {
            (Mode::Browsing, Event::Browse(ev)) => self.handle_browse(ev),
            (Mode::EditingFilter, Event::Filter(ev)) => self.handle_filter(ev),
            (mode, ev) => {
                debug!(?mode, ?ev, "ignoring event for inactive mode");
                Step::Continue
            }
        }
    }

    fn handle_browse(&mut self, event: BrowseEvent) -> Step {
        match event {
            BrowseEvent::MoveUp => self.move_up(1),
            BrowseEvent::MoveDown => self.move_down(1),
            BrowseEvent::PageUp(rows) => self.move_up(rows),
            BrowseEvent::PageDown(rows) => self.move_down(rows),
            BrowseEvent::MoveTop => self.cursor = 0,
            BrowseEvent::MoveBottom => self.cursor = self.last_index(),
            BrowseEvent::StartFilter => self.mode = Mode::EditingFilter,
            BrowseEvent::ClearFilter => self.apply_filter(String::new()),
            BrowseEvent::Reload => self.reload(),
            BrowseEvent::ConfirmSelection => {
                if let Some(conn) = self.selected().cloned() {
                    info!(label = %conn.label(), "connection selected");
                    return self.finish(ExitAction::ConnectToSelected(conn));
                }
            }
            BrowseEvent::Quit => return self.finish(ExitAction::None),
        }
        Step::Continue
    }

    fn handle_filter(&mut self, event: FilterEvent) -> Step {
        match event {
            FilterEvent::Commit(buffer) => {
                self.mode = Mode::Browsing;
                self.apply_filter(buffer.trim().to_string());
            }
            FilterEvent::Cancel => self.mode = Mode::Browsing,
            FilterEvent::Quit => return self.finish(ExitAction::None),
        }
        Step::Continue
    }

    fn finish(&mut self, action: ExitAction) -> Step {
        self.exit = Some(action.clone());
        Step::Exit(action)
    }

    fn apply_filter(&mut self, text: String) {
        self.filtered = filter_connections(&self.connections, &text);
        self.filter_text = text;
        self.cursor = 0;
        debug!(
            filter = %self.filter_text,
            matches = self.filtered.len(),
            "filter applied"
        );
    }

    fn reload(&mut self) {
        match self.source.load() {
            Ok(connections) => {
                self.connections = connections;
                let text = std::mem::take(&mut self.filter_text);
                self.apply_filter(text);
                self.status = Some(Status::Info(format!(
                    "Reloaded {} connections from {}",
                    self.connections.len(),
                    self.source.describe()
                )));
            }
            Err(e) => {
                warn!(error = %e, "reload failed, keeping previous connections");
                self.status = Some(Status::Error(format!("Reload failed: {}", e)));
            }
        }
    }

    fn last_index(&self) -> usize {
        self.filtered.len().saturating_sub(1)
    }

    fn move_up(&mut self, rows: usize) {
        self.cursor = self.cursor.saturating_sub(rows);
    }

    fn move_down(&mut self, rows: usize) {
        self.cursor = self.cursor.saturating_add(rows).min(self.last_index());
    }
}
