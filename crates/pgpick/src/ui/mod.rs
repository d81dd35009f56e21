mod connection_list;
mod filter_prompt;

pub use connection_list::{ConnectionList, PickerView};
pub use filter_prompt::FilterPrompt;
