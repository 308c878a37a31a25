//! Session binding between page navigation and stream credentials
//!
//! The address bar is the shareable snapshot of the session: credentials are
//! read from the query string once navigation is ready, and every new set of
//! credentials is written back with a client-side navigation.

use async_trait::async_trait;
use scenic_core::credentials::{CLIENT_ID_PARAM, STREAM_KEY_PARAM, VERTEX_ENV_PARAM};
use scenic_core::{encode_credentials, StreamCredentials};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Navigation to {url} failed: {reason}")]
    Push { url: String, reason: String },
}

/// Page navigation (router) state
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Whether the query string has been parsed
    fn is_ready(&self) -> bool;

    /// Every value of a query parameter, in order
    fn query(&self, name: &str) -> Vec<String>;

    /// Client-side navigation to `url`
    async fn push(&self, url: &str) -> Result<(), NavigationError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Unbound,
    Bound(StreamCredentials),
}

pub struct SessionBinding<N> {
    navigator: N,
    state: SessionState,
    initialized: bool,
}

impl<N: Navigator> SessionBinding<N> {
    pub fn new(navigator: N) -> Self {
        Self {
            navigator,
            state: SessionState::Unbound,
            initialized: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn credentials(&self) -> Option<&StreamCredentials> {
        match &self.state {
            SessionState::Bound(credentials) => Some(credentials),
            SessionState::Unbound => None,
        }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Read credentials from the URL the first time navigation is ready.
    ///
    /// Binds only when all three parameters are present; otherwise the
    /// session stays unbound. Later calls do nothing.
    pub async fn on_navigation_ready(&mut self) -> Result<(), NavigationError> {
        if self.initialized || !self.navigator.is_ready() {
            return Ok(());
        }
        self.initialized = true;

        let head = |name: &str| self.navigator.query(name).into_iter().next();
        let client_id = head(CLIENT_ID_PARAM);
        let stream_key = head(STREAM_KEY_PARAM);
        let vertex_env = head(VERTEX_ENV_PARAM);

        match StreamCredentials::from_query_values(
            client_id.as_deref(),
            stream_key.as_deref(),
            vertex_env.as_deref(),
        ) {
            Ok(credentials) => self.assign(credentials).await,
            Err(e) => {
                info!(reason = %e, "No stream credentials in URL, session unbound");
                Ok(())
            }
        }
    }

    /// Bind new credentials and mirror them into the URL
    pub async fn assign(&mut self, credentials: StreamCredentials) -> Result<(), NavigationError> {
        let url = encode_credentials(&credentials);
        info!(
            client_id = %credentials.client_id,
            env = %credentials.vertex_env,
            "Binding stream credentials"
        );
        self.state = SessionState::Bound(credentials);

        self.navigator.push(&url).await.map_err(|e| {
            warn!(error = %e, "Failed to update URL with credentials");
            e
        })?;
        debug!(url = %url, "Session URL updated");
        Ok(())
    }

    /// The viewer renders only with navigation ready and credentials bound
    pub fn should_render(&self) -> bool {
        self.navigator.is_ready() && matches!(self.state, SessionState::Bound(_))
    }
}
