use crate::domain::model::CsrfToken;
use crate::domain::ports::TokenExtractor;
use crate::utils::error::{PortalError, Result};
use scraper::{Html, Selector};

pub const DEFAULT_LOGIN_FORM_SELECTOR: &str = ".login-form > input";

/// Reads the token from the first input element matching a CSS selector.
///
/// The portal renders the anti-forgery input as the first direct child of
/// the `.login-form` element, so the default selector targets exactly that.
#[derive(Debug, Clone)]
pub struct LoginFormScraper {
    selector: String,
}

impl LoginFormScraper {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }
}

impl Default for LoginFormScraper {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_FORM_SELECTOR)
    }
}

impl TokenExtractor for LoginFormScraper {
    fn extract(&self, html: &str) -> Result<CsrfToken> {
        let selector =
            Selector::parse(&self.selector).map_err(|e| PortalError::InvalidConfigValue {
                field: "portal.login_form_selector".to_string(),
                value: self.selector.clone(),
                reason: format!("Invalid CSS selector: {}", e),
            })?;

        let doc = Html::parse_document(html);
        let not_found = || PortalError::CsrfTokenNotFound {
            selector: self.selector.clone(),
        };

        let input = doc.select(&selector).next().ok_or_else(not_found)?;
        let field_name = input.value().attr("name").ok_or_else(not_found)?;
        let value = input.value().attr("value").ok_or_else(not_found)?;

        tracing::debug!("Found anti-forgery field `{}`", field_name);

        Ok(CsrfToken {
            field_name: field_name.to_string(),
            value: value.to_string(),
        })
    }
}
