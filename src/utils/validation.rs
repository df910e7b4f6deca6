use crate::utils::error::{PortalError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(PortalError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(PortalError::InvalidConfigValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(PortalError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| PortalError::MissingConfig {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PortalError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(PortalError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("portal.base_url", "https://www.evergy.com").is_ok());
        assert!(validate_url("portal.base_url", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("portal.base_url", "").is_err());
        assert!(validate_url("portal.base_url", "www.evergy.com").is_err());
        assert!(validate_url("portal.base_url", "ftp://evergy.com").is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("username", "jdoe").is_ok());
        assert!(validate_non_empty_string("username", "   ").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("12345".to_string());
        let absent: Option<String> = None;
        assert_eq!(validate_required_field("premise_id", &present).unwrap(), "12345");
        assert!(matches!(
            validate_required_field("premise_id", &absent),
            Err(PortalError::MissingConfig { .. })
        ));
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("portal.timeout_seconds", 30, 1).is_ok());
        assert!(validate_positive_number("portal.timeout_seconds", 0, 1).is_err());
    }
}
