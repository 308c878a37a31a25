//! Stream credentials and their shareable URL form
//!
//! A viewing session is identified by a client id, a stream key and the
//! platform environment. The triple is carried in the page URL so a session
//! can be shared as a link:
//!
//! `scene-viewer/?clientId=<enc>&streamKey=<enc>&vertexEnv=<enc>`

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use thiserror::Error;

use crate::query::{first_value, query_pairs};

/// Path of the viewer page
pub const SCENE_VIEWER_PATH: &str = "scene-viewer";
/// Query parameter carrying the client id
pub const CLIENT_ID_PARAM: &str = "clientId";
/// Query parameter carrying the stream key
pub const STREAM_KEY_PARAM: &str = "streamKey";
/// Query parameter carrying the environment
pub const VERTEX_ENV_PARAM: &str = "vertexEnv";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("Missing query parameter: {0}")]
    MissingParameter(&'static str),
}

/// Platform environment the stream connects to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment(Cow<'static, str>);

impl Environment {
    pub const PLATPROD: Environment = Environment(Cow::Borrowed("platprod"));
    pub const PLATSTAGING: Environment = Environment(Cow::Borrowed("platstaging"));
    pub const PLATDEV: Environment = Environment(Cow::Borrowed("platdev"));

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::PLATPROD
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Credentials identifying one viewing session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamCredentials {
    pub client_id: String,
    pub stream_key: String,
    pub vertex_env: Environment,
}

impl StreamCredentials {
    pub fn new(
        client_id: impl Into<String>,
        stream_key: impl Into<String>,
        vertex_env: Environment,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            stream_key: stream_key.into(),
            vertex_env,
        }
    }

    /// Build credentials from raw query values.
    ///
    /// All three must be present and non-empty.
    pub fn from_query_values(
        client_id: Option<&str>,
        stream_key: Option<&str>,
        vertex_env: Option<&str>,
    ) -> Result<Self, CredentialsError> {
        fn present(value: Option<&str>) -> Option<&str> {
            value.filter(|v| !v.is_empty())
        }

        let client_id =
            present(client_id).ok_or(CredentialsError::MissingParameter(CLIENT_ID_PARAM))?;
        let stream_key =
            present(stream_key).ok_or(CredentialsError::MissingParameter(STREAM_KEY_PARAM))?;
        let vertex_env =
            present(vertex_env).ok_or(CredentialsError::MissingParameter(VERTEX_ENV_PARAM))?;

        Ok(Self::new(client_id, stream_key, Environment::new(vertex_env)))
    }
}

/// Encode credentials as the shareable viewer URL (relative path + query)
pub fn encode_credentials(credentials: &StreamCredentials) -> String {
    format!(
        "{}/?{}={}&{}={}&{}={}",
        SCENE_VIEWER_PATH,
        CLIENT_ID_PARAM,
        urlencoding::encode(&credentials.client_id),
        STREAM_KEY_PARAM,
        urlencoding::encode(&credentials.stream_key),
        VERTEX_ENV_PARAM,
        urlencoding::encode(credentials.vertex_env.as_str()),
    )
}

/// Decode credentials from a viewer URL or a bare query string
pub fn decode_credentials(url: &str) -> Result<StreamCredentials, CredentialsError> {
    let query = match url.find('?') {
        Some(start) => &url[start + 1..],
        None => url,
    };
    let query = query.split('#').next().unwrap_or_default();
    let pairs = query_pairs(query);

    StreamCredentials::from_query_values(
        first_value(&pairs, CLIENT_ID_PARAM),
        first_value(&pairs, STREAM_KEY_PARAM),
        first_value(&pairs, VERTEX_ENV_PARAM),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_format() {
        let credentials = StreamCredentials::new("client", "key", Environment::PLATDEV);
        assert_eq!(
            encode_credentials(&credentials),
            "scene-viewer/?clientId=client&streamKey=key&vertexEnv=platdev"
        );
    }

    #[test]
    fn test_encode_escapes_values() {
        let credentials =
            StreamCredentials::new("a&b=c", "key with spaces/+", Environment::PLATPROD);
        let url = encode_credentials(&credentials);
        assert!(url.contains("clientId=a%26b%3Dc"));
        assert!(url.contains("streamKey=key%20with%20spaces%2F%2B"));
    }

    #[test]
    fn test_round_trip() {
        let samples = [
            StreamCredentials::new("client-1", "sk_abc123", Environment::PLATPROD),
            StreamCredentials::new("ü ñ ✓", "k?&=#%", Environment::new("custom env")),
            StreamCredentials::new("x", "y", Environment::PLATSTAGING),
        ];
        for credentials in samples {
            let decoded = decode_credentials(&encode_credentials(&credentials)).unwrap();
            assert_eq!(decoded, credentials);
        }
    }

    #[test]
    fn test_decode_missing_parameter() {
        let err = decode_credentials("scene-viewer/?clientId=a&vertexEnv=platprod").unwrap_err();
        assert_eq!(err, CredentialsError::MissingParameter(STREAM_KEY_PARAM));
    }

    #[test]
    fn test_decode_empty_value_is_missing() {
        let err = decode_credentials("?clientId=&streamKey=k&vertexEnv=platprod").unwrap_err();
        assert_eq!(err, CredentialsError::MissingParameter(CLIENT_ID_PARAM));
    }

    #[test]
    fn test_decode_uses_first_value() {
        let credentials =
            decode_credentials("?clientId=a&clientId=b&streamKey=k&vertexEnv=platdev#frag")
                .unwrap();
        assert_eq!(credentials.client_id, "a");
        assert_eq!(credentials.vertex_env, Environment::PLATDEV);
    }
}
