// Web layer - the axum router and its handlers.
// Handlers only translate between HTTP and the core services.

#[path = "app_state.rs"]
pub mod app_state;

#[path = "api_error.rs"]
pub mod api_error;

#[path = "handlers/bonuses.rs"]
pub mod bonuses;

#[path = "handlers/health.rs"]
pub mod health;

#[path = "router.rs"]
pub mod router;

#[path = "shutdown.rs"]
pub mod shutdown;

pub use app_state::AppState;
pub use router::create_router;
pub use shutdown::shutdown_signal;
