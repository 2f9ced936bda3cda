//! HTTP surface (spec.md S1 "Out of scope" — ambient, not the specified
//! core, but wired the way the teacher wires its own axum surface).

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
