//! Key bindings for each input mode.
//!
//! Browsing keys map straight to a [`BrowseEvent`]. In filter mode only the
//! commit, cancel and quit keys are bound; everything else belongs to the
//! text box.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{BrowseEvent, FilterEvent};

/// Translate a key pressed while browsing. `page` is the number of visible
/// list rows.
pub fn browse_event(key: KeyEvent, page: usize) -> Option<BrowseEvent> {
    let page = page.max(1);
    let half = (page / 2).max(1);

    let event = match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => BrowseEvent::Quit,
        (KeyCode::Esc, _) | (KeyCode::Char('q'), KeyModifiers::NONE) => BrowseEvent::Quit,

        (KeyCode::Enter, _) => BrowseEvent::ConfirmSelection,
        (KeyCode::Char('r'), KeyModifiers::NONE) => BrowseEvent::Reload,

        (KeyCode::Char('f'), KeyModifiers::NONE) | (KeyCode::Char('/'), KeyModifiers::NONE) => {
            BrowseEvent::StartFilter
        }
        (KeyCode::Char('c'), KeyModifiers::NONE) => BrowseEvent::ClearFilter,

        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => BrowseEvent::MoveUp,
        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => BrowseEvent::MoveDown,
        (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => BrowseEvent::MoveTop,
        (KeyCode::Char('G'), KeyModifiers::SHIFT)
        | (KeyCode::Char('G'), KeyModifiers::NONE)
        | (KeyCode::End, _) => BrowseEvent::MoveBottom,

        (KeyCode::Char('u'), KeyModifiers::CONTROL) => BrowseEvent::PageUp(half),
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => BrowseEvent::PageDown(half),
        (KeyCode::Char('b'), KeyModifiers::CONTROL) | (KeyCode::PageUp, _) => {
            BrowseEvent::PageUp(page)
        }
        (KeyCode::Char('f'), KeyModifiers::CONTROL) | (KeyCode::PageDown, _) => {
            BrowseEvent::PageDown(page)
        }

        _ => return None,
    };
    Some(event)
}

/// Result of a key pressed while the filter box is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterKey {
    /// A bound key.
    Event(FilterEvent),
    /// Forward to the text box.
    Edit,
}

/// Translate a key pressed while editing the filter.
///
/// `buffer` is the current text box contents, used for the commit event.
/// Every key the text box would turn into a line break commits instead, so
/// the filter stays on one line.
pub fn filter_key(key: KeyEvent, buffer: impl FnOnce() -> String) -> FilterKey {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => FilterKey::Event(FilterEvent::Quit),
        (KeyCode::Esc, _) => FilterKey::Event(FilterEvent::Cancel),
        (KeyCode::Enter, _)
        | (KeyCode::Char('m'), KeyModifiers::CONTROL)
        | (KeyCode::Char('\n' | '\r'), _) => FilterKey::Event(FilterEvent::Commit(buffer())),
        _ => FilterKey::Edit,
    }
}
