/* src/server/adapter/axum/src/lib.rs */

mod error;
mod extract;

/// Re-export the rendering core for convenience
pub use inline_chart;

pub use error::ChartResponseError;
pub use extract::{ChartScope, ChartState, CspNonce, SecureHeadersNonce};
