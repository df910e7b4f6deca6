use crate::adapters::DEFAULT_LOGIN_FORM_SELECTOR;
use crate::domain::ports::PortalSettingsProvider;
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://www.evergy.com";

/// Top-level layout of the settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub portal: PortalSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalSettings {
    #[serde(default = "PortalSettings::default_base_url")]
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
    #[serde(default = "PortalSettings::default_login_form_selector")]
    pub login_form_selector: String,
}

impl PortalSettings {
    fn default_base_url() -> String {
        DEFAULT_BASE_URL.to_string()
    }

    fn default_login_form_selector() -> String {
        DEFAULT_LOGIN_FORM_SELECTOR.to_string()
    }

    /// Settings pointing at another host, e.g. a local mock of the portal.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Loads the `[portal]` section of a TOML settings file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PortalError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let file: SettingsFile =
            toml::from_str(&processed_content).map_err(|e| PortalError::ConfigValidation {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        Ok(file.portal)
    }

    /// Replaces `${VAR}` references with environment values; unknown vars stay as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PortalError::ConfigValidation {
            field: "toml_parsing".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout_seconds: None,
            user_agent: None,
            login_form_selector: Self::default_login_form_selector(),
        }
    }
}

impl PortalSettingsProvider for PortalSettings {
    fn base_url(&self) -> &str {
        self.normalized_base_url()
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}

impl Validate for PortalSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("portal.base_url", &self.base_url)?;
        validation::validate_non_empty_string(
            "portal.login_form_selector",
            &self.login_form_selector,
        )?;
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_positive_number("portal.timeout_seconds", timeout, 1)?;
        }
        Ok(())
    }
}
