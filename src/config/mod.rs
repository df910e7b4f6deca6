pub mod credentials;
pub mod toml_config;

pub use credentials::Credentials;
pub use toml_config::PortalSettings;

#[cfg(feature = "cli")]
use crate::domain::model::Interval;
#[cfg(feature = "cli")]
use crate::utils::error::{PortalError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use chrono::NaiveDate;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "evergy-usage")]
#[command(about = "Fetch electricity usage from the Evergy customer portal")]
pub struct CliConfig {
    #[arg(long, default_value = "credentials.json")]
    pub credentials: String,

    #[arg(long, help = "TOML file with a [portal] section")]
    pub config: Option<String>,

    #[arg(long, default_value = "1", help = "Days back from today")]
    pub days: u32,

    #[arg(
        long,
        default_value = "day",
        help = "month|day|hour|fifteen-minute, or the portal codes m|d|h|mi"
    )]
    pub interval: Interval,

    #[arg(long, requires = "end", help = "First day (YYYY-MM-DD); overrides --days")]
    pub start: Option<NaiveDate>,

    #[arg(long, requires = "start", help = "Last day (YYYY-MM-DD)")]
    pub end: Option<NaiveDate>,

    #[arg(long, help = "Print usage records as JSON")]
    pub json: bool,

    #[arg(long, help = "Write logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn portal_settings(&self) -> Result<PortalSettings> {
        match &self.config {
            Some(path) => PortalSettings::from_file(path),
            None => Ok(PortalSettings::default()),
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        crate::utils::validation::validate_non_empty_string("credentials", &self.credentials)?;
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(PortalError::InvalidRange { start, end });
            }
        }
        Ok(())
    }
}
