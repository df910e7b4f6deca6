use crate::domain::ports::PortalSettingsProvider;
use crate::utils::error::Result;
use reqwest::blocking::{Client, ClientBuilder};
use reqwest::cookie::Jar;
use reqwest::redirect::Policy;
use std::sync::Arc;
use std::time::Duration;

/// Transport options captured from the settings when the client is built.
#[derive(Debug, Clone, Default)]
pub(crate) struct TransportOptions {
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl TransportOptions {
    pub fn from_settings(settings: &impl PortalSettingsProvider) -> Self {
        Self {
            timeout: settings.timeout_seconds().map(Duration::from_secs),
            user_agent: settings.user_agent().map(str::to_string),
        }
    }

    fn builder(&self, jar: Arc<Jar>) -> ClientBuilder {
        let mut builder = Client::builder().cookie_provider(jar);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        builder
    }
}

/// Cookie-bearing portal session.
///
/// Both clients share one cookie jar: `client` follows redirects like a
/// browser would, `form_client` does not, so the login POST response is the
/// one carrying the auth cookies.
pub(crate) struct Session {
    pub client: Client,
    pub form_client: Client,
}

impl Session {
    pub fn open(options: &TransportOptions) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = options.builder(Arc::clone(&jar)).build()?;
        let form_client = options.builder(jar).redirect(Policy::none()).build()?;
        Ok(Self {
            client,
            form_client,
        })
    }
}
