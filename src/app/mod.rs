mod host;
mod keymap;
mod state;
mod types;

pub use types::{App, Screen};
