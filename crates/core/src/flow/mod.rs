//! One module per user-facing flow. Each owns its slice of state and the
//! transitions on it; `crate::app` sequences them.

pub mod detail;
pub mod error;
pub mod recommendation;
pub mod search;
pub mod sentiment;

pub use error::FlowError;
