pub mod app;
pub mod config;
pub mod display;
pub mod engine;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod recommendations;
pub mod state;
pub mod storage;
pub mod theme;
pub mod ui;

pub use app::router;
pub use config::AppConfig;
pub use engine::{compute, compute_with, AuditInputs, AuditOutcome, AuditReport};
pub use state::AppState;
pub use storage::load_data;
