use std::time::Duration;

use log::debug;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// OAuth2 client registration used by the Tado web app. These are public
// knowledge, but a deployment that owns its own registration should make
// them configurable instead of relying on these defaults.
pub(crate) const CLIENT_ID: &str = "tado-web-app";
pub(crate) const CLIENT_SECRET: &str =
    "wZaRN7rpjn3FoNyF5IFuxg9uMzYJcvOoQ8QWiIqS3hfk6gLhVlG57j5YNoZL2Rtc";
pub(crate) const SCOPE: &str = "home.user";

#[derive(Serialize)]
struct PasswordGrant<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
    scope: &'a str,
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
    scope: &'a str,
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

/// Exchange a username and password for an access/refresh token pair.
pub(crate) async fn password_grant(
    http: &reqwest::Client,
    token_url: &str,
    username: &str,
    password: &str,
    timeout: Duration,
) -> Result<TokenResponse> {
    let form = PasswordGrant {
        client_id: CLIENT_ID,
        client_secret: CLIENT_SECRET,
        grant_type: "password",
        scope: SCOPE,
        username,
        password,
    };

    let response = post_token_form(http, token_url, &form, timeout).await?;

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = response.text().await?;

    if !content_type.contains("application/json") {
        return Err(Error::Protocol(format!(
            "unexpected token response. Content-Type: {}, Response body: {}",
            content_type, body
        )));
    }

    let token = serde_json::from_str(&body).map_err(|err| {
        Error::Protocol(format!(
            "malformed token response: {}. Response body: {}",
            err, body
        ))
    })?;

    debug!("password grant succeeded for user: {}", username);
    Ok(token)
}

/// Mint a new access token from the current refresh token.
pub(crate) async fn refresh_grant(
    http: &reqwest::Client,
    token_url: &str,
    refresh_token: &str,
    timeout: Duration,
) -> Result<TokenResponse> {
    let form = RefreshGrant {
        client_id: CLIENT_ID,
        client_secret: CLIENT_SECRET,
        grant_type: "refresh_token",
        scope: SCOPE,
        refresh_token,
    };

    let response = post_token_form(http, token_url, &form, timeout).await?;
    let body = response.text().await?;

    let token = serde_json::from_str(&body).map_err(|err| {
        Error::Protocol(format!(
            "malformed token response: {}. Response body: {}",
            err, body
        ))
    })?;

    debug!("access token refreshed");
    Ok(token)
}

async fn post_token_form<T: Serialize>(
    http: &reqwest::Client,
    token_url: &str,
    form: &T,
    timeout: Duration,
) -> Result<reqwest::Response> {
    let response = http
        .post(token_url)
        .form(form)
        .timeout(timeout)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await?;
        return Err(Error::from_status(status.as_u16(), body));
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_grant_form_fields() {
        let form = PasswordGrant {
            client_id: CLIENT_ID,
            client_secret: CLIENT_SECRET,
            grant_type: "password",
            scope: SCOPE,
            username: "test@example.com",
            password: "password123",
        };

        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(value["client_id"], "tado-web-app");
        assert_eq!(value["grant_type"], "password");
        assert_eq!(value["scope"], "home.user");
        assert_eq!(value["username"], "test@example.com");
        assert_eq!(value["password"], "password123");
    }

    #[test]
    fn test_refresh_grant_form_fields() {
        let form = RefreshGrant {
            client_id: CLIENT_ID,
            client_secret: CLIENT_SECRET,
            grant_type: "refresh_token",
            scope: SCOPE,
            refresh_token: "refresh456",
        };

        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(value["grant_type"], "refresh_token");
        assert_eq!(value["refresh_token"], "refresh456");
    }

    #[test]
    fn test_token_response_parsing() {
        let json = r#"{
            "access_token": "access123",
            "token_type": "bearer",
            "refresh_token": "refresh456",
            "expires_in": 600,
            "scope": "home.user"
        }"#;

        let token: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(token.access_token, "access123");
        assert_eq!(token.refresh_token, "refresh456");
        assert_eq!(token.expires_in, 600);
    }
}
