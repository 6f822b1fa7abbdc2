pub mod app;
pub mod config;
pub mod evaluate;
pub mod handlers;
pub mod metrics;
pub mod provider;
pub mod rule;

pub use app::{build_router, AppState};
pub use evaluate::{evaluate, EvaluationResult, IneligibleReason};
