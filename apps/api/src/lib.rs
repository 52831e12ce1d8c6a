pub mod config;
pub mod errors;
pub mod interview;
pub mod llm_client;
pub mod models;
pub mod resume;
pub mod routes;
pub mod session;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
