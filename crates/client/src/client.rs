//! Session-aware client for the SkyCast API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;
use url::Url;

use crate::error::ClientError;
use crate::query::TableQuery;
use crate::session::{AuthEvent, AuthState, Session, User};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Optional profile fields sent at signup.
#[derive(Debug, Clone, Default)]
pub struct SignUpOptions {
    /// Defaults to the part of the email before `@`.
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

/// Fields to change on the signed-in user. `None` leaves a field alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Serialize)]
struct SignupBody<'a> {
    email: &'a str,
    password: &'a str,
    full_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
}

#[derive(Serialize)]
struct SigninBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

#[derive(Deserialize)]
struct SigninEnvelope {
    session: Session,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Shared HTTP plumbing: base URL resolution, bearer auth and error
/// extraction.
#[derive(Debug, Clone)]
pub(crate) struct Http {
    client: Client,
    base_url: Url,
}

impl Http {
    pub(crate) fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Base URL with `segments` appended, each percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send `request` and decode a JSON body.
    ///
    /// Non-2xx responses become [`ClientError::Api`] carrying the body's
    /// `error` field, or `fallback` when there is none.
    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
        token: Option<&str>,
        fallback: &str,
    ) -> Result<Value, ClientError> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| fallback.to_string());
            tracing::debug!(status = status.as_u16(), %message, "API request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Client for the auth, table and function endpoints.
///
/// Cloning is cheap; clones share the session and its subscribers.
#[derive(Debug, Clone)]
pub struct DatabaseClient {
    http: Http,
    state: Arc<watch::Sender<AuthState>>,
}

impl DatabaseClient {
    /// A signed-out client for the API at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_session(base_url, None)
    }

    /// A client resuming a stored session. Expired sessions are dropped.
    pub fn with_session(base_url: &str, session: Option<Session>) -> Result<Self, ClientError> {
        let http = Http::new(base_url)?;
        let session = session.filter(|s| !s.is_expired());
        let (state, _) = watch::channel(AuthState {
            event: AuthEvent::InitialSession,
            session,
        });
        Ok(Self {
            http,
            state: Arc::new(state),
        })
    }

    /// Observe auth state changes. The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// The current session, or `None` once it has expired.
    pub fn get_session(&self) -> Option<Session> {
        let mut current = None;
        self.state.send_if_modified(|state| {
            let expired = state.session.as_ref().is_some_and(Session::is_expired);
            if expired {
                tracing::debug!("Session expired");
                state.session = None;
            } else {
                current = state.session.clone();
            }
            // Expiry is not an auth event; subscribers are not woken.
            false
        });
        current
    }

    /// Register a new account. Does not sign in.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        options: SignUpOptions,
    ) -> Result<User, ClientError> {
        let full_name = options
            .full_name
            .unwrap_or_else(|| email.split('@').next().unwrap_or(email).to_string());
        let body = SignupBody {
            email,
            password,
            full_name: &full_name,
            phone: options.phone.as_deref(),
        };

        let url = self.http.endpoint(&["api", "auth", "signup"])?;
        let value = self
            .http
            .send(self.http.client().post(url).json(&body), None, "Signup failed")
            .await?;
        let envelope: UserEnvelope = serde_json::from_value(value)?;
        Ok(envelope.user)
    }

    /// Exchange credentials for a session and emit [`AuthEvent::SignedIn`].
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ClientError> {
        let url = self.http.endpoint(&["api", "auth", "signin"])?;
        let body = SigninBody { email, password };
        let value = self
            .http
            .send(
                self.http.client().post(url).json(&body),
                None,
                "Invalid credentials",
            )
            .await?;
        let envelope: SigninEnvelope = serde_json::from_value(value)?;

        tracing::debug!(user_id = envelope.session.user.id, "Signed in");
        self.state.send_replace(AuthState {
            event: AuthEvent::SignedIn,
            session: Some(envelope.session.clone()),
        });
        Ok(envelope.session)
    }

    /// Forget the session and emit [`AuthEvent::SignedOut`].
    pub fn sign_out(&self) {
        self.state.send_replace(AuthState {
            event: AuthEvent::SignedOut,
            session: None,
        });
    }

    /// Update the signed-in user's profile and emit
    /// [`AuthEvent::UserUpdated`].
    pub async fn update_user(&self, update: ProfileUpdate) -> Result<User, ClientError> {
        let session = self.get_session().ok_or(ClientError::NotAuthenticated)?;
        let url = self.http.endpoint(&["api", "auth", "update"])?;
        let value = self
            .http
            .send(
                self.http.client().put(url).json(&update),
                Some(&session.access_token),
                "Update failed",
            )
            .await?;
        let envelope: UserEnvelope = serde_json::from_value(value)?;

        self.state.send_replace(AuthState {
            event: AuthEvent::UserUpdated,
            session: Some(Session {
                user: envelope.user.clone(),
                ..session
            }),
        });
        Ok(envelope.user)
    }

    /// Start a query against `table`, authorised by the current session.
    pub fn from(&self, table: &str) -> TableQuery {
        let token = self.get_session().map(|s| s.access_token);
        TableQuery::new(self.http.clone(), table, token)
    }

    /// `POST /api/{function}` with a JSON body, e.g. `weather` or
    /// `weather-assistant`.
    pub async fn invoke<B: Serialize + ?Sized>(
        &self,
        function: &str,
        body: &B,
    ) -> Result<Value, ClientError> {
        let url = self.http.endpoint(&["api", function])?;
        let token = self.get_session().map(|s| s.access_token);
        self.http
            .send(
                self.http.client().post(url).json(body),
                token.as_deref(),
                "API call failed",
            )
            .await
    }
}
