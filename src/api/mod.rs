//! Read-only HTTP API over a computed analysis report.
//!
//! The server holds one immutable snapshot of the dataset, the report and
//! the configuration. Handlers serve report tables and dashboards, plus
//! ad hoc enrollment-rate and retention breakdowns by a named dimension.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::BreakdownQuery;
pub use response::{ApiError, ApiErrorResponse, DashboardResponse, HealthResponse};
pub use state::AppState;
