//! Per-run and per-year projection steps
//!
//! - **initializer**: assigns posts and tracks before the first year
//! - **retirement**: retires employees reaching retirement in the year
//! - **promotion**: fills vacancies post by post, most senior first
//!
//! Steps borrow the roster from the orchestrator and return only the events
//! they emit; none of them keeps state between calls.

pub mod initializer;
pub mod promotion;
pub mod retirement;

pub use initializer::{initialize_roster, InitSummary};
pub use promotion::run_promotions;
pub use retirement::{run_retirements, settle_pre_horizon_retirements};
