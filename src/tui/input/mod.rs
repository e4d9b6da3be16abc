//! Text entry widgets.

pub mod text_input;

pub use text_input::TextInput;
