pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod session;
pub mod source;
pub mod state;
pub mod stats;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use errors::{AppError, DashboardError};
pub use session::SessionState;
pub use source::CovidApi;
pub use state::AppState;
