pub mod client;
mod session;

pub use crate::domain::model::{Interval, Premise, UsageRecord};
pub use crate::domain::ports::{PortalSettingsProvider, TokenExtractor};
pub use crate::utils::error::Result;
pub use client::PortalClient;
