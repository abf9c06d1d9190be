pub mod habits;
pub mod handlers;
pub mod streak;
pub mod timeframe;
pub mod trend;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
