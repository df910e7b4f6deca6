use crate::domain::model::CsrfToken;
use crate::utils::error::Result;

/// Pulls the anti-forgery token out of the login page markup.
pub trait TokenExtractor {
    fn extract(&self, html: &str) -> Result<CsrfToken>;
}

/// Where the portal lives and how the transport is built.
pub trait PortalSettingsProvider {
    fn base_url(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
    fn user_agent(&self) -> Option<&str>;
}
