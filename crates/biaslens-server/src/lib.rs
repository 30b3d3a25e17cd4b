//! BiasLens HTTP server: shared state, route handlers, background evaluation.

pub mod evaluation;
pub mod routes;
pub mod state;
pub mod validate;

pub use state::AppState;
