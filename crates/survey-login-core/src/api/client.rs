//! API client for communicating with the Survey REST API.
//!
//! This module provides the `ApiClient` struct for the auth endpoints
//! (login, signup, probe) and the authenticated survey endpoints
//! (listing, create, delete, questions, answers, responses).

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::models::{
    Answer, AuthResponse, Credentials, MessageResponse, NewQuestion, NewSurvey, Question,
    QuestionsResponse, ResponsesResponse, SignupRequest, Survey, SurveysResponse,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL of the deployed Survey API
pub const DEFAULT_API_BASE_URL: &str = "https://survey-site-98jc.onrender.com";

/// Path of the login endpoint, relative to the base URL
pub const LOGIN_PATH: &str = "/api/auth/login";

const SIGNUP_PATH: &str = "/api/auth/signup";
const AUTH_PROBE_PATH: &str = "/api/auth/test";
const SURVEYS_PATH: &str = "/api/surveys";
const MY_SURVEYS_PATH: &str = "/api/surveys/my-surveys";

/// HTTP request timeout in seconds.
/// Transport-level only; the login flow itself never retries.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Status and parsed body of a login attempt.
///
/// Non-2xx statuses are not errors here: the caller branches on `status`.
#[derive(Debug, Clone)]
pub struct AuthReply {
    pub status: StatusCode,
    pub body: AuthResponse,
}

impl AuthReply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// API client for the Survey API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the deployed API
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_API_BASE_URL)
    }

    /// Create a client for an arbitrary base URL (staging, local server, mocks)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST credentials to the login endpoint and parse the JSON body.
    ///
    /// Returns the reply for any HTTP status. Only transport failures and
    /// bodies that are not JSON objects are errors.
    pub async fn login(&self, credentials: &Credentials) -> std::result::Result<AuthReply, ApiError> {
        let url = self.url(LOGIN_PATH);
        debug!(url = %url, username = %credentials.username, "Sending login request");

        // .json() sets Content-Type: application/json
        let response = self.client.post(&url).json(credentials).send().await?;

        let status = response.status();
        let text = response.text().await?;
        let body: AuthResponse = serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("login body is not valid JSON ({}): {}", status, e))
        })?;

        debug!(status = status.as_u16(), has_token = body.token.is_some(), "Login response received");
        Ok(AuthReply { status, body })
    }

    /// Create an account. Returns the server's confirmation message.
    pub async fn signup(&self, request: &SignupRequest) -> Result<String> {
        let url = self.url(SIGNUP_PATH);
        debug!(url = %url, username = %request.username, "Sending signup request");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .context("Failed to send signup request")?;

        let response = Self::check_response(response).await?;
        let body: MessageResponse = response
            .json()
            .await
            .context("Failed to parse signup response")?;

        Ok(body.message.unwrap_or_else(|| "User registered".to_string()))
    }

    /// Hit the unauthenticated auth probe to check the API is reachable
    pub async fn probe(&self) -> Result<String> {
        let body: MessageResponse = self.get(AUTH_PROBE_PATH).await?;
        Ok(body.message.unwrap_or_default())
    }

    /// Fetch the surveys created by the signed-in user
    pub async fn fetch_my_surveys(&self) -> Result<Vec<Survey>> {
        if self.token.is_none() {
            warn!("Fetching surveys without a token");
        }
        let body: SurveysResponse = self.get(MY_SURVEYS_PATH).await?;
        Ok(body.surveys)
    }

    /// Create a survey owned by the signed-in user
    pub async fn create_survey(&self, survey: &NewSurvey) -> Result<String> {
        let body: MessageResponse = self.post(SURVEYS_PATH, survey).await?;
        Ok(body.message.unwrap_or_default())
    }

    /// Delete a survey along with its questions and responses
    pub async fn delete_survey(&self, survey_id: i64) -> Result<String> {
        let path = format!("{}/{}/delete", SURVEYS_PATH, survey_id);
        let body: MessageResponse = self.post(&path, &serde_json::json!({})).await?;
        Ok(body.message.unwrap_or_default())
    }

    pub async fn fetch_questions(&self, survey_id: i64) -> Result<Vec<Question>> {
        let path = format!("{}/{}/questions", SURVEYS_PATH, survey_id);
        let body: QuestionsResponse = self.get(&path).await?;
        Ok(body.questions)
    }

    pub async fn add_question(&self, survey_id: i64, question_text: &str) -> Result<String> {
        let path = format!("{}/{}/add-question", SURVEYS_PATH, survey_id);
        let request = NewQuestion {
            question_text: question_text.to_string(),
        };
        let body: MessageResponse = self.post(&path, &request).await?;
        Ok(body.message.unwrap_or_default())
    }

    pub async fn submit_answer(&self, survey_id: i64, answer: &Answer) -> Result<String> {
        let path = format!("{}/{}/answer", SURVEYS_PATH, survey_id);
        let body: MessageResponse = self.post(&path, answer).await?;
        Ok(body.message.unwrap_or_default())
    }

    /// Answers for a survey, grouped by question text
    pub async fn fetch_responses(&self, survey_id: i64) -> Result<BTreeMap<String, Vec<String>>> {
        let path = format!("{}/{}/responses", SURVEYS_PATH, survey_id);
        let body: ResponsesResponse = self.get(&path).await?;
        Ok(body.responses)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_error_body(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::with_base_url("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url(LOGIN_PATH), "http://localhost:5000/api/auth/login");
    }

    #[test]
    fn test_default_login_url() {
        let client = ApiClient::new().unwrap();
        assert_eq!(
            client.url(LOGIN_PATH),
            "https://survey-site-98jc.onrender.com/api/auth/login"
        );
    }

    #[test]
    fn test_with_token_sets_bearer_header() {
        let client = ApiClient::new().unwrap();
        assert!(client.auth_headers().unwrap().is_empty());

        let authed = client.with_token("abc123".to_string());
        let headers = authed.auth_headers().unwrap();
        assert_eq!(headers.get(header::AUTHORIZATION).unwrap(), "Bearer abc123");
    }
}
