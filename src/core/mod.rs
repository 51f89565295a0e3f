pub mod engine;
pub mod prober;
pub mod resolver;
pub mod sink;
pub mod source;
pub mod worker;

pub use crate::domain::model::{CheckOutcome, LogLine, RunStats};
pub use crate::domain::ports::Resolver;
pub use crate::utils::error::Result;
