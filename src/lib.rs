pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::CheckConfig;
pub use core::engine::CheckEngine;
pub use core::prober::Prober;
pub use core::resolver::SystemResolver;
pub use domain::model::{CheckOutcome, LogLine, RunStats};
pub use domain::ports::Resolver;
pub use utils::error::{CheckError, Result};
