use crate::adapters::LoginFormScraper;
use crate::config::{Credentials, PortalSettings};
use crate::core::session::{Session, TransportOptions};
use crate::domain::model::{Dashboard, Interval, Premise, UsageRecord, UsageReport};
use crate::domain::ports::{PortalSettingsProvider, TokenExtractor};
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::{self, Validate};
use chrono::{Days, Local, NaiveDate};
use reqwest::blocking::Response;
use reqwest::StatusCode;
use url::Url;

/// Portal routes, relative to the configured base URL.
///
/// Account and premise ids go through `path_segments_mut`, so they are
/// percent-encoded and always stay a single path segment.
#[derive(Debug, Clone)]
struct Endpoints {
    base_url: Url,
}

impl Endpoints {
    fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| PortalError::InvalidConfigValue {
            field: "portal.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(PortalError::InvalidConfigValue {
                field: "portal.base_url".to_string(),
                value: base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }
        Ok(Self { base_url })
    }

    fn route(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn login(&self) -> Url {
        self.route(&["log-in"])
    }

    fn logout(&self) -> Url {
        self.route(&["logout"])
    }

    fn account_summary(&self) -> Url {
        self.route(&["ma", "my-account", "account-summary"])
    }

    fn dashboard(&self, account_number: &str) -> Url {
        self.route(&["api", "account", account_number, "dashboard", "current"])
    }

    fn usage(
        &self,
        premise_id: &str,
        interval: Interval,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Url {
        let mut url = self.route(&["api", "report", "usage", premise_id]);
        url.query_pairs_mut()
            .append_pair("interval", interval.code())
            .append_pair("from", &start.format("%Y-%m-%d").to_string())
            .append_pair("to", &end.format("%Y-%m-%d").to_string());
        url
    }
}

/// Client for the Evergy customer portal.
///
/// The portal has no public API: the client logs in through the web form,
/// keeps the resulting cookies, and calls the JSON endpoints the site itself
/// uses. Every read operation logs in first when needed, and a usage request
/// answered with 403 is taken as an expired session and retried once after a
/// fresh login.
///
/// One client owns at most one session. Operations take `&mut self`; there is
/// no internal locking.
pub struct PortalClient<T: TokenExtractor = LoginFormScraper> {
    credentials: Credentials,
    premise_id: Option<String>,
    endpoints: Endpoints,
    transport: TransportOptions,
    extractor: T,
    session: Option<Session>,
    logged_in: bool,
}

impl PortalClient<LoginFormScraper> {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_settings(credentials, &PortalSettings::default())
    }

    pub fn with_settings(credentials: Credentials, settings: &PortalSettings) -> Result<Self> {
        settings.validate()?;
        let extractor = LoginFormScraper::new(settings.login_form_selector.clone());
        PortalClient::with_extractor(credentials, settings, extractor)
    }
}

impl<T: TokenExtractor> PortalClient<T> {
    pub fn with_extractor(
        credentials: Credentials,
        settings: &impl PortalSettingsProvider,
        extractor: T,
    ) -> Result<Self> {
        credentials.validate()?;
        validation::validate_url("portal.base_url", settings.base_url())?;

        Ok(Self {
            premise_id: credentials.premise_id.clone(),
            credentials,
            endpoints: Endpoints::new(settings.base_url())?,
            transport: TransportOptions::from_settings(settings),
            extractor,
            session: None,
            logged_in: false,
        })
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn account_number(&self) -> &str {
        &self.credentials.account_number
    }

    /// Premise the usage calls target; resolved on login when not configured.
    pub fn premise_id(&self) -> Option<&str> {
        self.premise_id.as_deref()
    }

    /// Logs in through the portal's login form.
    ///
    /// Any previous session is dropped first. On success the client holds a
    /// fresh session and, if no premise was configured, adopts the first
    /// premise listed on the account.
    pub fn login(&mut self) -> Result<()> {
        tracing::info!("Logging in with username: {}", self.credentials.username);
        self.logged_in = false;
        self.session = None;

        let session = Session::open(&self.transport)?;

        let login_url = self.endpoints.login();
        let login_page = session.client.get(login_url.clone()).send()?;
        tracing::debug!("Login page response: {}", login_page.status());
        let token = self.extractor.extract(&login_page.text()?)?;

        let form = [
            ("Username", self.credentials.username.as_str()),
            ("Password", self.credentials.password.as_str()),
            (token.field_name.as_str(), token.value.as_str()),
        ];
        let response = session.form_client.post(login_url).form(&form).send()?;
        tracing::info!("Login response: {}", response.status());

        let probe = session.client.get(self.endpoints.account_summary()).send()?;
        let status = probe.status();
        if status != StatusCode::OK {
            tracing::error!("Account summary response: {}", status);
            return Err(PortalError::Authentication {
                status,
                body: probe.text().unwrap_or_default(),
            });
        }
        tracing::info!("Account summary response: {}", status);

        if self.premise_id.is_none() {
            let first = self
                .fetch_premises(&session)?
                .into_iter()
                .next()
                .ok_or_else(|| PortalError::NoPremises {
                    account: self.credentials.account_number.clone(),
                })?;
            tracing::info!("Using premise {} ({})", first.premise_id, first.address);
            self.premise_id = Some(first.premise_id);
        }

        self.session = Some(session);
        self.logged_in =
            !self.credentials.account_number.is_empty() && self.premise_id.is_some();
        Ok(())
    }

    /// Ends the portal session. Local state is dropped whatever the portal answers.
    pub fn logout(&mut self) {
        tracing::info!("Logging out");
        if let Some(session) = self.session.take() {
            match session.client.get(self.endpoints.logout()).send() {
                Ok(response) => tracing::debug!("Logout response: {}", response.status()),
                Err(e) => tracing::debug!("Logout request failed: {}", e),
            }
        }
        self.logged_in = false;
    }

    /// Premises on the account, in the order the portal lists them.
    pub fn get_premises(&mut self) -> Result<Vec<Premise>> {
        tracing::info!("Getting premises");
        self.ensure_logged_in()?;
        self.fetch_premises(self.active_session()?)
    }

    /// Usage from `days` days ago up to and including today.
    pub fn get_usage(&mut self, days: u32, interval: Interval) -> Result<Vec<UsageRecord>> {
        let today = Local::now().date_naive();
        let start = today
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or_else(|| PortalError::InvalidConfigValue {
                field: "days".to_string(),
                value: days.to_string(),
                reason: "Date range reaches before the supported calendar".to_string(),
            })?;
        self.get_usage_range(start, today, interval)
    }

    /// Usage between `start` and `end`, both inclusive, oldest record first.
    pub fn get_usage_range(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<Vec<UsageRecord>> {
        if start > end {
            tracing::error!("'start' date can't be after 'end' date");
            return Err(PortalError::InvalidRange { start, end });
        }

        self.ensure_logged_in()?;
        tracing::info!("Getting usage: {} - {}", start, end);

        let mut response = self.fetch_usage(start, end, interval)?;
        // The portal answers 403 once the session timed out from inactivity.
        if self.logged_in && response.status() == StatusCode::FORBIDDEN {
            tracing::warn!("Received HTTP 403, logging in again");
            self.login()?;
            response = self.fetch_usage(start, end, interval)?;
        }

        let status = response.status();
        if status != StatusCode::OK {
            return Err(PortalError::Authentication {
                status,
                body: response.text().unwrap_or_default(),
            });
        }

        let report: UsageReport = serde_json::from_str(&response.text()?)?;
        tracing::debug!("Received {} usage records", report.data.len());
        Ok(report.data)
    }

    fn ensure_logged_in(&mut self) -> Result<()> {
        if !self.logged_in {
            self.login()?;
        }
        Ok(())
    }

    fn active_session(&self) -> Result<&Session> {
        match (&self.session, self.logged_in) {
            (Some(session), true) => Ok(session),
            _ => Err(PortalError::NotLoggedIn),
        }
    }

    fn fetch_premises(&self, session: &Session) -> Result<Vec<Premise>> {
        let url = self.endpoints.dashboard(&self.credentials.account_number);
        tracing::debug!("Fetching {}", url);
        let response = session.client.get(url).send()?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(PortalError::Authentication {
                status,
                body: response.text().unwrap_or_default(),
            });
        }

        let dashboard: Dashboard = serde_json::from_str(&response.text()?)?;
        Ok(dashboard.addresses.into_iter().map(Premise::from).collect())
    }

    fn fetch_usage(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<Response> {
        let premise_id = validation::validate_required_field("premise_id", &self.premise_id)?;
        let url = self.endpoints.usage(premise_id, interval, start, end);
        tracing::debug!("Fetching {}", url);
        let response = self.active_session()?.client.get(url).send()?;
        tracing::debug!("Usage response: {}", response.status());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new("jdoe", "hunter2", "1234567890", Some("445566".to_string()))
    }

    #[test]
    fn test_usage_url_format() {
        let endpoints = Endpoints::new("https://www.evergy.com/").unwrap();
        let url = endpoints.usage(
            "445566",
            Interval::FifteenMinute,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
        );
        assert_eq!(
            url.as_str(),
            "https://www.evergy.com/api/report/usage/445566?interval=mi&from=2024-01-05&to=2024-01-06"
        );
        assert_eq!(
            endpoints.dashboard("1234567890").as_str(),
            "https://www.evergy.com/api/account/1234567890/dashboard/current"
        );
        assert_eq!(endpoints.login().as_str(), "https://www.evergy.com/log-in");
    }

    #[test]
    fn test_ids_cannot_change_the_route() {
        let endpoints = Endpoints::new("https://www.evergy.com").unwrap();

        let url = endpoints.usage(
            "12/34?interval=h&x",
            Interval::Day,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
        );
        assert_eq!(url.path_segments().unwrap().count(), 4);
        assert!(url.path().starts_with("/api/report/usage/12%2F34%3F"));
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            query,
            vec![
                ("interval".to_string(), "d".to_string()),
                ("from".to_string(), "2024-01-05".to_string()),
                ("to".to_string(), "2024-01-06".to_string()),
            ]
        );

        let url = endpoints.dashboard("../../admin");
        assert_eq!(url.path_segments().unwrap().count(), 5);
        assert!(url.path().starts_with("/api/account/..%2F..%2Fadmin/"));
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let endpoints = Endpoints::new("http://127.0.0.1:8080/portal/").unwrap();
        assert_eq!(
            endpoints.account_summary().as_str(),
            "http://127.0.0.1:8080/portal/ma/my-account/account-summary"
        );
    }

    #[test]
    fn test_new_client_starts_logged_out() {
        let client = PortalClient::new(credentials()).unwrap();
        assert!(!client.is_logged_in());
        assert_eq!(client.premise_id(), Some("445566"));
        assert_eq!(client.account_number(), "1234567890");
    }

    #[test]
    fn test_invalid_range_fails_before_login() {
        // Unroutable base URL: any request attempt would surface as a transport error.
        let settings = PortalSettings::with_base_url("http://127.0.0.1:9");
        let mut client = PortalClient::with_settings(credentials(), &settings).unwrap();

        let err = client
            .get_usage_range(
                NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                Interval::Day,
            )
            .unwrap_err();

        assert!(matches!(err, PortalError::InvalidRange { .. }));
        assert!(!client.is_logged_in());
    }

    #[test]
    fn test_logout_without_session_is_noop() {
        let mut client = PortalClient::new(credentials()).unwrap();
        client.logout();
        assert!(!client.is_logged_in());
    }

    #[test]
    fn test_rejects_blank_credentials() {
        let result = PortalClient::new(Credentials::new("", "pw", "1", None));
        assert!(matches!(result, Err(PortalError::InvalidConfigValue { .. })));
    }
}
