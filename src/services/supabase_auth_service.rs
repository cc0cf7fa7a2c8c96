use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::{form_urlencoded, Url};

use crate::{
    adapters::dto::auth_dto::{
        PasswordCredentials, RefreshTokenRequest, SessionResponse, SignUpResponse, StoredSession,
        SupabaseUser,
    },
    application::{
        error::ApplicationError,
        repositories::cookie_repository::CookieRepository,
        services::{AuthListeners, AuthService, AuthStateCallback, AuthSubscription, AuthUser},
    },
    domain::config::client::SupabaseConfig,
    services::error::RemoteError,
};

pub const AUTH_SESSION_COOKIE_NAME: &str = "VAULT-KRATE-AUTH-SESSION";

/// The refresh token outlives the access token; the jar keeps the session
/// for a week.
const SESSION_TTL_HOURS: f64 = 24.0 * 7.0;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const OAUTH_REDIRECT_PATH: &str = "/dashboard";

/// Email/password and Google sign-in against Supabase auth (GoTrue), with
/// the session persisted in the cookie jar.
pub struct SupabaseAuthService {
    client: Client,
    base_url: Option<Url>,
    anon_key: String,
    app_url: String,
    cookies: Arc<dyn CookieRepository>,
    listeners: AuthListeners,
}

impl SupabaseAuthService {
    /// An empty Supabase URL yields a service that reports every sign-in as
    /// unavailable and never has a current user.
    pub fn new(
        config: &SupabaseConfig,
        app_url: &str,
        cookies: Arc<dyn CookieRepository>,
    ) -> Result<Self, ApplicationError> {
        let base_url = if config.url.is_empty() {
            None
        } else {
            let mut url = Url::parse(&config.url).map_err(|e| {
                ApplicationError::Validation(format!("Invalid Supabase URL: {}", e))
            })?;
            if !url.path().ends_with('/') {
                let path = format!("{}/", url.path());
                url.set_path(&path);
            }
            Some(url)
        };

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                ApplicationError::InternalError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url,
            anon_key: config.anon_key.clone(),
            app_url: app_url.trim_end_matches('/').to_string(),
            cookies,
            listeners: AuthListeners::new(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApplicationError> {
        let base = self
            .base_url
            .as_ref()
            .ok_or_else(|| ApplicationError::Auth("Supabase is not configured".to_string()))?;
        base.join(path)
            .map_err(|e| ApplicationError::InternalError(format!("Invalid auth URL: {}", e)))
    }

    fn request(
        &self,
        method: Method,
        url: Url,
        access_token: Option<&str>,
    ) -> RequestBuilder {
        debug!("{} {}", method, url.path());
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token.unwrap_or(&self.anon_key))
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, RemoteError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::from_status(status, &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))
    }

    fn load_session(&self) -> Result<Option<StoredSession>, ApplicationError> {
        let Some(raw) = self.cookies.get(AUTH_SESSION_COOKIE_NAME)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!("Discarding unreadable auth session: {}", e);
                self.cookies.remove(AUTH_SESSION_COOKIE_NAME)?;
                Ok(None)
            }
        }
    }

    fn store_session(&self, response: SessionResponse) -> Result<StoredSession, ApplicationError> {
        let session = StoredSession::from_response(response, Utc::now()).ok_or_else(|| {
            RemoteError::InvalidResponse("Session lifetime out of range".to_string())
        })?;
        let value = serde_json::to_string(&session).map_err(|e| {
            ApplicationError::InternalError(format!("Cannot serialize session: {}", e))
        })?;
        self.cookies
            .set(AUTH_SESSION_COOKIE_NAME, &value, SESSION_TTL_HOURS)?;
        Ok(session)
    }

    async fn password_grant(&self, email: &str, password: &str) -> Result<SessionResponse, RemoteError> {
        let mut url = self
            .endpoint("auth/v1/token")
            .map_err(|e| RemoteError::InternalError(e.to_string()))?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let request = self
            .request(Method::POST, url, None)
            .json(&PasswordCredentials { email, password });
        Self::send(request).await
    }

    async fn refresh(&self, session: &StoredSession) -> Result<StoredSession, ApplicationError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "refresh_token");

        let request = self.request(Method::POST, url, None).json(&RefreshTokenRequest {
            refresh_token: &session.refresh_token,
        });
        let response: SessionResponse = Self::send(request)
            .await
            .map_err(|e| ApplicationError::Auth(format!("Session refresh failed: {}", e.message())))?;

        debug!("Refreshed session for {}", response.user.id);
        self.store_session(response)
    }

    async fn fetch_user(&self, access_token: &str) -> Result<SupabaseUser, RemoteError> {
        let url = self
            .endpoint("auth/v1/user")
            .map_err(|e| RemoteError::InternalError(e.to_string()))?;
        Self::send(self.request(Method::GET, url, Some(access_token))).await
    }

    /// Drops a session the server no longer accepts.
    fn expire_session(&self) -> Result<(), ApplicationError> {
        self.cookies.remove(AUTH_SESSION_COOKIE_NAME)?;
        self.listeners.notify(None);
        Ok(())
    }
}

/// Reads the OAuth result from the callback URL. Implicit-flow providers put
/// it in the fragment; the query is checked as a fallback.
fn oauth_params(callback_url: &str) -> Result<HashMap<String, String>, ApplicationError> {
    let url = Url::parse(callback_url)
        .map_err(|e| ApplicationError::Validation(format!("Invalid callback URL: {}", e)))?;

    let raw = url
        .fragment()
        .filter(|f| !f.is_empty())
        .or_else(|| url.query())
        .unwrap_or_default();

    Ok(form_urlencoded::parse(raw.as_bytes()).into_owned().collect())
}

#[async_trait]
impl AuthService for SupabaseAuthService {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, ApplicationError> {
        let request = self
            .request(Method::POST, self.endpoint("auth/v1/signup")?, None)
            .json(&PasswordCredentials { email, password });

        let response: SignUpResponse = Self::send(request)
            .await
            .map_err(|e| ApplicationError::Auth(format!("Sign up failed: {}", e.message())))?;

        match response {
            SignUpResponse::Session(session) => {
                let session = self.store_session(session)?;
                info!("Signed up and signed in as {}", session.user.email);
                self.listeners.notify(Some(&session.user));
                Ok(session.user)
            }
            SignUpResponse::User(user) => {
                info!("Signed up {}, awaiting e-mail confirmation", user.id);
                Ok(user.into())
            }
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, ApplicationError> {
        let response = self
            .password_grant(email, password)
            .await
            .map_err(|e| ApplicationError::Auth(format!("Sign in failed: {}", e.message())))?;

        let session = self.store_session(response)?;
        info!("Signed in as {}", session.user.email);
        self.listeners.notify(Some(&session.user));
        Ok(session.user)
    }

    async fn sign_in_with_google(&self) -> Result<String, ApplicationError> {
        let mut url = self.endpoint("auth/v1/authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", "google")
            .append_pair(
                "redirect_to",
                &format!("{}{}", self.app_url, OAUTH_REDIRECT_PATH),
            );
        Ok(url.to_string())
    }

    async fn complete_oauth(&self, callback_url: &str) -> Result<AuthUser, ApplicationError> {
        let params = oauth_params(callback_url)?;

        if let Some(error) = params.get("error_description").or_else(|| params.get("error")) {
            return Err(ApplicationError::Auth(format!(
                "Google sign in failed: {}",
                error
            )));
        }

        let access_token = params.get("access_token").ok_or_else(|| {
            ApplicationError::Auth("Google sign in failed: no access token in callback".to_string())
        })?;
        let refresh_token = params.get("refresh_token").cloned().unwrap_or_default();
        let expires_in = params
            .get("expires_in")
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        let user = self
            .fetch_user(access_token)
            .await
            .map_err(|e| ApplicationError::Auth(format!("Google sign in failed: {}", e.message())))?;

        let session = self.store_session(SessionResponse {
            access_token: access_token.clone(),
            refresh_token,
            expires_in,
            user,
        })?;
        info!("Signed in with Google as {}", session.user.email);
        self.listeners.notify(Some(&session.user));
        Ok(session.user)
    }

    async fn sign_out(&self) -> Result<(), ApplicationError> {
        if let Some(session) = self.load_session()? {
            match self.endpoint("auth/v1/logout") {
                Ok(url) => {
                    let request = self.request(Method::POST, url, Some(&session.access_token));
                    if let Err(e) = request.send().await.and_then(|r| r.error_for_status()) {
                        warn!("Remote sign out failed, clearing local session: {}", e);
                    }
                }
                Err(e) => warn!("{}", e),
            }
        }

        self.cookies.remove(AUTH_SESSION_COOKIE_NAME)?;
        info!("Signed out");
        self.listeners.notify(None);
        Ok(())
    }

    async fn get_current_user(&self) -> Result<Option<AuthUser>, ApplicationError> {
        let Some(mut session) = self.load_session()? else {
            return Ok(None);
        };

        if session.needs_refresh(Utc::now()) {
            match self.refresh(&session).await {
                Ok(refreshed) => session = refreshed,
                Err(e) => {
                    warn!("{}", e);
                    self.expire_session()?;
                    return Ok(None);
                }
            }
        }

        match self.fetch_user(&session.access_token).await {
            Ok(user) => Ok(Some(user.into())),
            Err(RemoteError::Unauthorized(_)) => match self.refresh(&session).await {
                Ok(refreshed) => Ok(Some(refreshed.user)),
                Err(e) => {
                    warn!("{}", e);
                    self.expire_session()?;
                    Ok(None)
                }
            },
            Err(e) => Err(ApplicationError::Auth(format!(
                "Failed to get current user: {}",
                e.message()
            ))),
        }
    }

    fn on_auth_state_change(&self, callback: AuthStateCallback) -> AuthSubscription {
        self.listeners.subscribe(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::repositories::InMemoryCookieRepository;
    use mockito::{Matcher, Server};
    use std::sync::Mutex;

    const ANON_KEY: &str = "anon-key";

    fn session_body(access_token: &str) -> String {
        format!(
            r#"{{"access_token":"{}","token_type":"bearer","expires_in":3600,"refresh_token":"r1","user":{{"id":"u1","email":"u1@example.com"}}}}"#,
            access_token
        )
    }

    fn service(server: &Server) -> (SupabaseAuthService, Arc<InMemoryCookieRepository>) {
        let cookies = Arc::new(InMemoryCookieRepository::new(false));
        let config = SupabaseConfig {
            url: server.url(),
            anon_key: ANON_KEY.to_string(),
        };
        let service =
            SupabaseAuthService::new(&config, "https://app.example/", cookies.clone()).unwrap();
        (service, cookies)
    }

    fn stored(cookies: &InMemoryCookieRepository) -> Option<StoredSession> {
        cookies
            .get(AUTH_SESSION_COOKIE_NAME)
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    #[tokio::test]
    async fn test_sign_in_persists_session_and_notifies() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/v1/token")
            .match_query(Matcher::UrlEncoded("grant_type".into(), "password".into()))
            .match_header("apikey", ANON_KEY)
            .match_body(Matcher::Json(
                serde_json::json!({ "email": "u1@example.com", "password": "pw" }),
            ))
            .with_status(200)
            .with_body(session_body("a1"))
            .create_async()
            .await;
        let (auth, cookies) = service(&server);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _subscription = auth.on_auth_state_change(Arc::new(move |user: Option<AuthUser>| {
            sink.lock().unwrap().push(user.map(|u| u.id));
        }));

        let user = auth.sign_in("u1@example.com", "pw").await.unwrap();

        mock.assert_async().await;
        assert_eq!(user.id, "u1");
        assert_eq!(stored(&cookies).unwrap().access_token, "a1");
        assert_eq!(*seen.lock().unwrap(), vec![Some("u1".to_string())]);
    }

    #[tokio::test]
    async fn test_sign_in_failure_message() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/auth/v1/token")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#)
            .create_async()
            .await;
        let (auth, cookies) = service(&server);

        let err = auth.sign_in("u1@example.com", "bad").await.unwrap_err();

        assert_eq!(
            err,
            ApplicationError::Auth("Sign in failed: Invalid login credentials".into())
        );
        assert!(stored(&cookies).is_none());
    }

    #[tokio::test]
    async fn test_sign_in_rejects_unusable_lifetime() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/auth/v1/token")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"access_token":"a1","expires_in":9223372036854775807,"refresh_token":"r1","user":{"id":"u1"}}"#,
            )
            .create_async()
            .await;
        let (auth, cookies) = service(&server);

        let err = auth.sign_in("u1@example.com", "pw").await.unwrap_err();

        assert!(matches!(err, ApplicationError::InternalError(_)));
        assert!(stored(&cookies).is_none());
    }

    #[tokio::test]
    async fn test_sign_up_without_session() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/auth/v1/signup")
            .with_status(200)
            .with_body(r#"{"id":"u2","email":"u2@example.com"}"#)
            .create_async()
            .await;
        let (auth, cookies) = service(&server);

        let user = auth.sign_up("u2@example.com", "pw").await.unwrap();

        assert_eq!(user.id, "u2");
        assert!(stored(&cookies).is_none());
    }

    #[tokio::test]
    async fn test_google_url_redirects_to_dashboard() {
        let server = Server::new_async().await;
        let (auth, _) = service(&server);

        let url = Url::parse(&auth.sign_in_with_google().await.unwrap()).unwrap();

        assert_eq!(url.path(), "/auth/v1/authorize");
        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(query["provider"], "google");
        assert_eq!(query["redirect_to"], "https://app.example/dashboard");
    }

    #[tokio::test]
    async fn test_complete_oauth_from_fragment() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/auth/v1/user")
            .match_header("authorization", "Bearer a9")
            .with_status(200)
            .with_body(r#"{"id":"u1","email":"u1@example.com"}"#)
            .create_async()
            .await;
        let (auth, cookies) = service(&server);

        let user = auth
            .complete_oauth(
                "https://app.example/dashboard#access_token=a9&expires_in=3600&refresh_token=r9&token_type=bearer",
            )
            .await
            .unwrap();

        assert_eq!(user.email, "u1@example.com");
        let session = stored(&cookies).unwrap();
        assert_eq!(session.access_token, "a9");
        assert_eq!(session.refresh_token, "r9");
    }

    #[tokio::test]
    async fn test_complete_oauth_reports_provider_error() {
        let server = Server::new_async().await;
        let (auth, _) = service(&server);

        let err = auth
            .complete_oauth("https://app.example/dashboard#error=access_denied&error_description=User+cancelled")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ApplicationError::Auth("Google sign in failed: User cancelled".into())
        );
    }

    #[tokio::test]
    async fn test_current_user_without_session_skips_network() {
        let server = Server::new_async().await;
        let (auth, _) = service(&server);

        assert_eq!(auth.get_current_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_current_user_refreshes_rejected_token() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/auth/v1/token")
            .match_query(Matcher::UrlEncoded("grant_type".into(), "password".into()))
            .with_status(200)
            .with_body(session_body("stale"))
            .create_async()
            .await;
        server
            .mock("GET", "/auth/v1/user")
            .match_header("authorization", "Bearer stale")
            .with_status(401)
            .with_body(r#"{"msg":"JWT expired"}"#)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/auth/v1/token")
            .match_query(Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()))
            .match_body(Matcher::Json(serde_json::json!({ "refresh_token": "r1" })))
            .with_status(200)
            .with_body(session_body("fresh"))
            .create_async()
            .await;
        let (auth, cookies) = service(&server);
        auth.sign_in("u1@example.com", "pw").await.unwrap();

        let user = auth.get_current_user().await.unwrap();

        refresh.assert_async().await;
        assert_eq!(user.map(|u| u.id).as_deref(), Some("u1"));
        assert_eq!(stored(&cookies).unwrap().access_token, "fresh");
    }

    #[tokio::test]
    async fn test_current_user_drops_unrecoverable_session() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/auth/v1/token")
            .match_query(Matcher::UrlEncoded("grant_type".into(), "password".into()))
            .with_status(200)
            .with_body(session_body("stale"))
            .create_async()
            .await;
        server
            .mock("GET", "/auth/v1/user")
            .with_status(401)
            .create_async()
            .await;
        server
            .mock("POST", "/auth/v1/token")
            .match_query(Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()))
            .with_status(400)
            .with_body(r#"{"error_description":"Invalid Refresh Token"}"#)
            .create_async()
            .await;
        let (auth, cookies) = service(&server);
        auth.sign_in("u1@example.com", "pw").await.unwrap();

        assert_eq!(auth.get_current_user().await.unwrap(), None);
        assert!(stored(&cookies).is_none());
    }

    #[tokio::test]
    async fn test_sign_out_clears_session_even_if_remote_fails() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/auth/v1/token")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(session_body("a1"))
            .create_async()
            .await;
        let logout = server
            .mock("POST", "/auth/v1/logout")
            .match_header("authorization", "Bearer a1")
            .with_status(500)
            .create_async()
            .await;
        let (auth, cookies) = service(&server);
        auth.sign_in("u1@example.com", "pw").await.unwrap();

        auth.sign_out().await.unwrap();

        logout.assert_async().await;
        assert!(stored(&cookies).is_none());
    }

    #[tokio::test]
    async fn test_unconfigured_service() {
        let cookies = Arc::new(InMemoryCookieRepository::new(false));
        let auth = SupabaseAuthService::new(&SupabaseConfig::default(), "http://localhost:5173", cookies)
            .unwrap();

        assert_eq!(auth.get_current_user().await.unwrap(), None);
        assert_eq!(
            auth.sign_in("a@b.c", "pw").await.unwrap_err(),
            ApplicationError::Auth("Sign in failed: Supabase is not configured".into())
        );
    }
}
