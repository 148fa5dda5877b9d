pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod routes;
pub mod state;
pub mod validation;

#[doc(hidden)]
pub mod testing;

pub use routes::app;
pub use state::AppState;
