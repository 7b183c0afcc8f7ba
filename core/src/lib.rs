//! Investment ROI calculator core.
//!
//! Two cooperating pieces:
//!   - the ROI engine (`roi`, `market`, `metrics`, tables in `factors`):
//!     stateless pure functions, safe to call from anywhere;
//!   - the usage ledgers (`ledger`, `usage`, `report`): bounded,
//!     newest-first logs persisted as whole snapshots through `store`.

pub mod clock;
pub mod config;
pub mod error;
pub mod factors;
pub mod ledger;
pub mod market;
pub mod metrics;
pub mod report;
pub mod roi;
pub mod store;
pub mod types;
pub mod usage;

pub use error::{CoreError, CoreResult};
pub use market::{assess_market, MarketAssessment, MarketQuery};
pub use roi::{compute_roi, RoiAnalysis, RoiInput, RoiRequest};
