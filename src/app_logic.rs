/*
 * The application logic layer: `SelectorSession` drives the interactive
 * selection flow (brand menu, model menu, deployment) without touching
 * stdin/stdout itself. Unit tests live in `session_tests.rs`.
 */
pub mod session;

#[cfg(test)]
mod session_tests;

pub use session::{MenuView, SelectorSession, SessionReply, SessionState};
