pub mod auth;
pub mod controller;
pub mod form;
pub mod protocol;
pub mod render;
pub mod shell;
pub mod state;
pub mod tickets;
pub mod toast;

// Re-export the pieces the binary needs to wire up the front end.
pub use controller::Controller;
pub use shell::{run, Shell};
pub use state::AppState;
