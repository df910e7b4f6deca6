// Adapters layer: concrete implementations of the domain ports.

pub mod login_form;

pub use login_form::{LoginFormScraper, DEFAULT_LOGIN_FORM_SELECTOR};
