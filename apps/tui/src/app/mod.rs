// App module for prefmap
// Handles application state and the work behind key and mouse input

pub mod actions;
pub mod input;
pub mod state;
pub mod submit;

pub use input::{handle_input, handle_mouse};
pub use state::{App, AppMessage, AppScreen};
