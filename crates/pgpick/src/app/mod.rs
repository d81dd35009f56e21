#[allow(clippy::module_inception)]
mod app;
mod controller;
mod input;
mod state;

pub use app::App;
pub use controller::SelectionController;
pub use input::{browse_event, filter_key, FilterKey};
pub use state::{BrowseEvent, Event, ExitAction, FilterEvent, Mode, Status, Step};
