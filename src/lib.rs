pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::LoginFormScraper;
pub use config::{Credentials, PortalSettings};
pub use core::PortalClient;
pub use domain::model::{CsrfToken, Interval, Premise, UsageRecord};
pub use domain::ports::TokenExtractor;
pub use utils::error::{PortalError, Result};
