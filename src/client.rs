use log::{debug, warn};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::model::{
    api::{
        admin::AdminCredentials,
        ballot::BallotSpec,
        candidate::CandidateSpec,
        error::ErrorMessage,
        results::{VoterStats, VotingResult},
    },
    common::{Candidate, CandidateId, Vote, VoterRecord, VotingSession},
};

/// Shown whenever the server gives no usable explanation.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
    #[error("Could not reach the voting API: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Voting API responded {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: StatusCode,
        message: Option<String>,
    },
}

impl ClientError {
    /// The sentence to show the user.
    pub fn message(&self) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } => message.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// The HTTP status, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// A typed client for the voting API. Cookies are kept between calls, so an
/// admin login applies to every later request made through this client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self { base, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    // Public reads

    pub async fn session(&self) -> Result<VotingSession> {
        self.fetch(self.http.get(self.url(&["session"])?)).await
    }

    pub async fn candidates(&self) -> Result<Vec<Candidate>> {
        self.fetch(self.http.get(self.url(&["candidates"])?)).await
    }

    pub async fn results(&self) -> Result<Vec<VotingResult>> {
        self.fetch(self.http.get(self.url(&["results"])?)).await
    }

    pub async fn stats(&self) -> Result<VoterStats> {
        self.fetch(self.http.get(self.url(&["stats"])?)).await
    }

    // Auth

    pub async fn login(&self, password: &str) -> Result<()> {
        let credentials = AdminCredentials {
            password: password.to_string(),
        };
        let request = self.http.post(self.url(&["auth", "admin"])?).json(&credentials);
        self.send(request).await.map(drop)
    }

    pub async fn logout(&self) -> Result<()> {
        self.send(self.http.delete(self.url(&["auth"])?))
            .await
            .map(drop)
    }

    // Admin commands

    pub async fn add_candidate(&self, spec: &CandidateSpec) -> Result<Candidate> {
        self.fetch(self.http.post(self.url(&["candidates"])?).json(spec))
            .await
    }

    pub async fn remove_candidate(&self, id: CandidateId) -> Result<()> {
        let id = id.to_string();
        self.send(self.http.delete(self.url(&["candidates", &id])?))
            .await
            .map(drop)
    }

    pub async fn start_voting(&self) -> Result<VotingSession> {
        self.session_command("start").await
    }

    pub async fn stop_voting(&self) -> Result<VotingSession> {
        self.session_command("stop").await
    }

    pub async fn show_results(&self) -> Result<VotingSession> {
        self.session_command("display").await
    }

    pub async fn hide_results(&self) -> Result<VotingSession> {
        self.session_command("hide").await
    }

    async fn session_command(&self, command: &str) -> Result<VotingSession> {
        let url = self.url(&["admin", "session", command])?;
        self.fetch(self.http.post(url)).await
    }

    // Voting

    pub async fn cast_vote(&self, ballot: &BallotSpec) -> Result<Vote> {
        self.fetch(self.http.post(self.url(&["votes"])?).json(ballot))
            .await
    }

    /// Look up a voter by index number; `None` if the server knows nothing
    /// about them.
    pub async fn voter(&self, index_number: &str) -> Result<Option<VoterRecord>> {
        let request = self.http.get(self.url(&["voters", index_number])?);
        match self.fetch(request).await {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// The base URL with the given path segments appended, each one
    /// percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        debug!("{} {}", status, response.url());
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorMessage>()
            .await
            .ok()
            .map(|body| body.message);
        warn!(
            "Voting API rejected request with {status}: {}",
            message.as_deref().unwrap_or("no message")
        );
        Err(ClientError::Server { status, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_shown() {
        let err = ClientError::Server {
            status: StatusCode::CONFLICT,
            message: Some("Voting is not currently active".to_string()),
        };

        assert_eq!("Voting is not currently active", err.message());
        assert_eq!(Some(StatusCode::CONFLICT), err.status());
    }

    #[test]
    fn missing_message_falls_back() {
        let err = ClientError::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };

        assert_eq!(GENERIC_ERROR_MESSAGE, err.message());
    }

    #[test]
    fn invalid_base_url() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            ApiClient::new("mailto:admin@example.com"),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn urls_are_joined_and_encoded() {
        let client = ApiClient::new("http://localhost:8000/api/").unwrap();

        assert_eq!(
            "http://localhost:8000/api/admin/session/start",
            client.url(&["admin", "session", "start"]).unwrap().as_str()
        );
        assert_eq!(
            "http://localhost:8000/api/voters/A%2F1%20B",
            client.url(&["voters", "A/1 B"]).unwrap().as_str()
        );

        let client = ApiClient::new("http://localhost:8000").unwrap();
        assert_eq!(
            "http://localhost:8000/session",
            client.url(&["session"]).unwrap().as_str()
        );
    }

    #[rocket::async_test]
    async fn unreachable_server_falls_back() {
        // Nothing listens on port 9 locally.
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();

        let err = client.session().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(GENERIC_ERROR_MESSAGE, err.message());
        assert_eq!(None, err.status());
    }
}
