use crate::utils::error::{PortalError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;

/// Portal login plus the account the usage belongs to.
///
/// Read from a flat JSON object:
/// `{"username": "...", "password": "...", "account_num": "...", "premise_id": "..."}`.
/// An absent, null or empty `premise_id` means "use the first premise on the account".
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    #[serde(rename = "account_num")]
    pub account_number: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub premise_id: Option<String>,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        account_number: impl Into<String>,
        premise_id: Option<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            account_number: account_number.into(),
            premise_id: premise_id.filter(|p| !p.trim().is_empty()),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PortalError::Io)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let credentials: Credentials = serde_json::from_str(content)?;
        credentials.validate()?;
        Ok(credentials)
    }
}

// Keep the password out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .field("account_number", &self.account_number)
            .field("premise_id", &self.premise_id)
            .finish()
    }
}

impl Validate for Credentials {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("username", &self.username)?;
        validation::validate_non_empty_string("password", &self.password)?;
        validation::validate_non_empty_string("account_num", &self.account_number)?;
        Ok(())
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|p| !p.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_credentials_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"username": "jdoe", "password": "hunter2", "account_num": "1234567890", "premise_id": "445566"}}"#
        )
        .unwrap();

        let creds = Credentials::from_file(file.path()).unwrap();
        assert_eq!(creds.username, "jdoe");
        assert_eq!(creds.account_number, "1234567890");
        assert_eq!(creds.premise_id.as_deref(), Some("445566"));
    }

    #[test]
    fn test_blank_premise_is_unset() {
        let creds = Credentials::from_json_str(
            r#"{"username": "jdoe", "password": "pw", "account_num": "1", "premise_id": ""}"#,
        )
        .unwrap();
        assert!(creds.premise_id.is_none());

        let creds =
            Credentials::from_json_str(r#"{"username": "jdoe", "password": "pw", "account_num": "1"}"#)
                .unwrap();
        assert!(creds.premise_id.is_none());
    }

    #[test]
    fn test_missing_account_is_rejected() {
        let err = Credentials::from_json_str(r#"{"username": "jdoe", "password": "pw"}"#);
        assert!(matches!(err, Err(PortalError::Decode(_))));

        let err = Credentials::from_json_str(
            r#"{"username": "jdoe", "password": "pw", "account_num": " "}"#,
        );
        assert!(matches!(err, Err(PortalError::InvalidConfigValue { .. })));
    }

    #[test]
    fn test_debug_hides_password() {
        let creds = Credentials::new("jdoe", "hunter2", "1", None);
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("hunter2"));
    }
}
