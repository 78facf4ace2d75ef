use std::time::Duration;

use chrono::Utc;
use log::debug;
use reqwest::header::AUTHORIZATION;
use reqwest::Method;

use crate::auth;
use crate::error::{Error, Result};
use crate::models::{Device, Me, MobileDevice, Zone};

const TOKEN_URL: &str = "https://auth.tado.com/oauth/token";
const API_URL: &str = "https://my.tado.com/api/v2";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// Refresh the access token once we are within this margin of its expiry.
const REFRESH_WINDOW_SECS: i64 = 30;

/// Authenticated session against the Tado cloud API.
///
/// Holds the credentials, the current token pair and its expiry, and the
/// home id discovered at login. All accessors funnel through the same
/// authenticated request pipeline, which refreshes the access token
/// shortly before it expires.
pub struct TadoClient {
    http: Option<reqwest::Client>,
    username: String,
    password: String,
    request_timeout: Duration,
    token_url: String,
    api_url: String,
    access_token: Option<String>,
    refresh_token: Option<String>,
    token_expires_at: Option<i64>,
    home_id: Option<i64>,
    me: Option<Me>,
}

impl TadoClient {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            http: None,
            username: username.to_string(),
            password: password.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            token_url: TOKEN_URL.to_string(),
            api_url: API_URL.to_string(),
            access_token: None,
            refresh_token: None,
            token_expires_at: None,
            home_id: None,
            me: None,
        }
    }

    // Test-specific constructor for custom endpoints
    pub fn new_with_base_urls(
        username: &str,
        password: &str,
        token_url: String,
        api_url: String,
    ) -> Self {
        let mut client = Self::new(username, password);
        client.token_url = token_url;
        client.api_url = api_url;
        client
    }

    /// Bound every network call with this timeout instead of the 10 second
    /// default.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Reuse an existing `reqwest::Client` instead of letting the session
    /// create its own. The caller keeps its handle; dropping the session
    /// never invalidates it.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    // Test-specific accessor methods
    pub fn home_id(&self) -> Option<i64> {
        self.home_id
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn token_expires_at(&self) -> Option<i64> {
        self.token_expires_at
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn set_token_state(&mut self, access_token: &str, refresh_token: &str, expires_at: i64) {
        self.access_token = Some(access_token.to_string());
        self.refresh_token = Some(refresh_token.to_string());
        self.token_expires_at = Some(expires_at);
    }

    pub fn set_home_id(&mut self, home_id: i64) {
        self.home_id = Some(home_id);
    }

    /// Authenticate with the stored credentials and discover the home id.
    ///
    /// Calling this again re-authenticates and overwrites the token state.
    pub async fn login(&mut self) -> Result<()> {
        debug!("Authenticating user: {}", self.username);

        let http = self.transport().clone();
        let token = auth::password_grant(
            &http,
            &self.token_url,
            &self.username,
            &self.password,
            self.request_timeout,
        )
        .await?;
        self.store_token(token);

        let me = self.get_me().await?;
        let home = me
            .homes
            .first()
            .ok_or_else(|| Error::Protocol("authenticated user has no homes".to_string()))?;
        self.home_id = Some(home.id);

        debug!("Authentication successful, home id: {}", home.id);
        Ok(())
    }

    /// Get the authenticated user's profile.
    ///
    /// The first successful fetch is cached for the lifetime of the
    /// session; later calls return the cached record without a network
    /// round trip.
    pub async fn get_me(&mut self) -> Result<Me> {
        if let Some(me) = &self.me {
            return Ok(me.clone());
        }

        debug!("Fetching user profile");
        let body = self.request(Method::GET, "me", None).await?;
        let me: Me = serde_json::from_str(&body)?;
        self.me = Some(me.clone());
        Ok(me)
    }

    /// Get the devices in the home.
    pub async fn get_devices(&mut self) -> Result<Vec<Device>> {
        debug!("Fetching devices list");
        let path = self.home_path("devices")?;
        let body = self.request(Method::GET, &path, None).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get the mobile devices registered to the home.
    pub async fn get_mobile_devices(&mut self) -> Result<Vec<MobileDevice>> {
        debug!("Fetching mobile devices list");
        let path = self.home_path("mobileDevices")?;
        let body = self.request(Method::GET, &path, None).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get the zones in the home.
    pub async fn get_zones(&mut self) -> Result<Vec<Zone>> {
        debug!("Fetching zones list");
        let path = self.home_path("zones")?;
        let body = self.request(Method::GET, &path, None).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get the zones with their current state records.
    pub async fn get_zone_states(&mut self) -> Result<Vec<Zone>> {
        debug!("Fetching zone states");
        let path = self.home_path("zoneStates")?;
        let body = self.request(Method::GET, &path, None).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Refresh the access token if it expires within the safety margin.
    ///
    /// Fails with `Error::NotAuthenticated` when called before `login`.
    async fn ensure_fresh_token(&mut self) -> Result<()> {
        let expires_at = self.token_expires_at.ok_or(Error::NotAuthenticated)?;
        if Utc::now().timestamp() < expires_at - REFRESH_WINDOW_SECS {
            return Ok(());
        }

        let refresh_token = self.refresh_token.clone().ok_or(Error::NotAuthenticated)?;
        debug!("Access token near expiry, refreshing");

        let http = self.transport().clone();
        let token = auth::refresh_grant(
            &http,
            &self.token_url,
            &refresh_token,
            self.request_timeout,
        )
        .await?;
        self.store_token(token);
        Ok(())
    }

    async fn request(
        &mut self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<String> {
        self.ensure_fresh_token().await?;

        let url = format!("{}/{}", self.api_url, path);
        let access_token = self.access_token.clone().ok_or(Error::NotAuthenticated)?;

        debug!("{} {}", method, url);

        let http = self.transport().clone();
        let mut request = http
            .request(method, &url)
            .header(AUTHORIZATION, format!("Bearer {}", access_token))
            .timeout(self.request_timeout);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(Error::from_status(status.as_u16(), body));
        }

        Ok(response.text().await?)
    }

    fn home_path(&self, suffix: &str) -> Result<String> {
        let home_id = self.home_id.ok_or(Error::NotAuthenticated)?;
        Ok(format!("homes/{}/{}", home_id, suffix))
    }

    fn store_token(&mut self, token: auth::TokenResponse) {
        self.token_expires_at = Some(Utc::now().timestamp() + token.expires_in as i64);
        self.access_token = Some(token.access_token);
        self.refresh_token = Some(token.refresh_token);
    }

    fn transport(&mut self) -> &reqwest::Client {
        self.http.get_or_insert_with(reqwest::Client::new)
    }
}
