//! Web server module
//!
//! Provides the search form, the results page and a small JSON API.

mod handlers;
mod routes;
mod state;
mod templates;

pub use handlers::SearchParams;
pub use routes::create_router;
pub use state::AppState;
pub use templates::Templates;
