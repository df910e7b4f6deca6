#![allow(dead_code)]

use evergy_client::{Credentials, PortalClient, PortalSettings};
use httpmock::prelude::*;
use httpmock::Mock;

pub const ACCOUNT: &str = "1234567890";
pub const PREMISE: &str = "445566";
pub const TOKEN_FIELD: &str = "__RequestVerificationToken";
pub const TOKEN_VALUE: &str = "CfDJ8tok-xyz";

pub fn login_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body>
  <form class="login-form" action="/log-in" method="post">
    <input name="{}" type="hidden" value="{}">
    <label>Username <input name="Username" type="text"></label>
    <label>Password <input name="Password" type="password"></label>
    <button type="submit">Log in</button>
  </form>
</body>
</html>"#,
        TOKEN_FIELD, TOKEN_VALUE
    )
}

pub fn credentials(premise_id: Option<&str>) -> Credentials {
    Credentials::new("jdoe", "hunter2", ACCOUNT, premise_id.map(str::to_string))
}

pub fn client_for(server: &MockServer, premise_id: Option<&str>) -> PortalClient {
    let settings = PortalSettings::with_base_url(server.base_url());
    PortalClient::with_settings(credentials(premise_id), &settings).unwrap()
}

pub fn mock_login_page(server: &MockServer) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path("/log-in");
        then.status(200)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(login_page());
    })
}

/// Login POST that answers like the portal: a redirect plus the session cookie.
pub fn mock_login_post<'a>(server: &'a MockServer, session_cookie: &str) -> Mock<'a> {
    let set_cookie = format!("session={}; Path=/; HttpOnly", session_cookie);
    server.mock(|when, then| {
        when.method(POST)
            .path("/log-in")
            .x_www_form_urlencoded_tuple("Username", "jdoe")
            .x_www_form_urlencoded_tuple("Password", "hunter2")
            .x_www_form_urlencoded_tuple(TOKEN_FIELD, TOKEN_VALUE);
        then.status(302)
            .header("Location", "/ma/my-account/account-summary")
            .header("Set-Cookie", &set_cookie);
    })
}

pub fn mock_probe(server: &MockServer, status: u16) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/ma/my-account/account-summary")
            .header_exists("cookie");
        then.status(status).body("<html>account summary</html>");
    })
}

pub fn mock_dashboard(server: &MockServer, body: serde_json::Value) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/api/account/{}/dashboard/current", ACCOUNT));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(body);
    })
}

pub fn usage_body() -> serde_json::Value {
    serde_json::json!({
        "data": [
            {"period": "2024-03-01", "usage": 21.4, "cost": 2.87},
            {"period": "2024-03-02", "usage": 18.9, "cost": 2.53}
        ]
    })
}
