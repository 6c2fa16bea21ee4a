//! HTTP client for the game backend.
//!
//! The backend owns exercise generation and progress storage. `ApiClient` is
//! the seam the rest of the crate talks to; `HttpApi` is the real thing and
//! `StubApi` serves canned answers for tests and offline demos.

use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::{Exercise, ProgressRecord, ProgressReport, SelectionParams, User};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_EXERCISE_COUNT: usize = 10;

const REQUEST_TIMEOUT_SECS: u64 = 15;
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Errors produced by backend calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never got a response.
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}")]
    Status { status: u16, body: String },

    /// The response body was not what we expected.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

pub trait ApiClient: Send + Sync {
    fn create_user(&self, name: &str, age: u8) -> Result<User, ApiError>;

    fn fetch_exercises(
        &self,
        params: &SelectionParams,
        count: usize,
    ) -> Result<Vec<Exercise>, ApiError>;

    fn submit_progress(&self, report: &ProgressReport) -> Result<(), ApiError>;

    fn user_progress(&self, user_id: &str) -> Result<Vec<ProgressRecord>, ApiError>;
}

// =============================================================================
// HTTP
// =============================================================================

pub struct HttpApi {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }
}

/// Read the body and reject non-2xx statuses.
fn read_body(response: reqwest::blocking::Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| ApiError::Request(e.to_string()))?;
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

impl ApiClient for HttpApi {
    fn create_user(&self, name: &str, age: u8) -> Result<User, ApiError> {
        let response = self
            .http
            .post(self.endpoint("users"))
            .json(&CreateUserRequest { name, age })
            .send()
            .map_err(|e| ApiError::Request(e.to_string()))?;
        parse_user(&read_body(response)?)
    }

    fn fetch_exercises(
        &self,
        params: &SelectionParams,
        count: usize,
    ) -> Result<Vec<Exercise>, ApiError> {
        let count = count.to_string();
        let response = self
            .http
            .get(self.endpoint("exercises"))
            .query(&[
                ("age_group", params.age_group.id()),
                ("operation", params.operation.id()),
                ("level", params.level.id()),
                ("count", count.as_str()),
            ])
            .send()
            .map_err(|e| ApiError::Request(e.to_string()))?;
        parse_exercises(&read_body(response)?)
    }

    fn submit_progress(&self, report: &ProgressReport) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.endpoint("progress"))
            .json(report)
            .send()
            .map_err(|e| ApiError::Request(e.to_string()))?;
        read_body(response).map(|_| ())
    }

    fn user_progress(&self, user_id: &str) -> Result<Vec<ProgressRecord>, ApiError> {
        let response = self
            .http
            .get(self.endpoint(&format!("users/{user_id}/progress")))
            .send()
            .map_err(|e| ApiError::Request(e.to_string()))?;
        parse_progress_records(&read_body(response)?)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct CreateUserRequest<'a> {
    name: &'a str,
    age: u8,
}

#[derive(Deserialize)]
struct ExercisesResponse {
    exercises: Vec<Exercise>,
}

// =============================================================================
// PARSING
// =============================================================================

pub fn parse_user(json: &str) -> Result<User, ApiError> {
    serde_json::from_str(json).map_err(|e| ApiError::Parse(e.to_string()))
}

pub fn parse_exercises(json: &str) -> Result<Vec<Exercise>, ApiError> {
    let response: ExercisesResponse =
        serde_json::from_str(json).map_err(|e| ApiError::Parse(e.to_string()))?;
    Ok(response.exercises)
}

pub fn parse_progress_records(json: &str) -> Result<Vec<ProgressRecord>, ApiError> {
    serde_json::from_str(json).map_err(|e| ApiError::Parse(e.to_string()))
}

// =============================================================================
// STUB
// =============================================================================

/// In-memory backend with canned responses
#[derive(Debug, Default)]
pub struct StubApi {
    exercises: Vec<Exercise>,
    fail_users: bool,
    fail_exercises: bool,
    fail_progress: bool,
    created: Mutex<Vec<(String, u8)>>,
    submitted: Mutex<Vec<ProgressReport>>,
}

impl StubApi {
    pub fn new(exercises: Vec<Exercise>) -> Self {
        Self {
            exercises,
            ..Self::default()
        }
    }

    pub fn failing_users(mut self) -> Self {
        self.fail_users = true;
        self
    }

    pub fn failing_exercises(mut self) -> Self {
        self.fail_exercises = true;
        self
    }

    pub fn failing_progress(mut self) -> Self {
        self.fail_progress = true;
        self
    }

    /// Users created so far, in call order
    pub fn created_users(&self) -> Vec<(String, u8)> {
        self.created.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Progress reports accepted so far, in call order
    pub fn submitted(&self) -> Vec<ProgressReport> {
        self.submitted.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn unavailable() -> ApiError {
        ApiError::Status {
            status: 503,
            body: "stub unavailable".to_string(),
        }
    }
}

impl ApiClient for StubApi {
    fn create_user(&self, name: &str, age: u8) -> Result<User, ApiError> {
        if self.fail_users {
            return Err(Self::unavailable());
        }
        let mut created = self
            .created
            .lock()
            .map_err(|e| ApiError::Request(e.to_string()))?;
        created.push((name.to_string(), age));
        Ok(User {
            id: format!("stub-{}", created.len()),
            name: name.to_string(),
            age,
        })
    }

    fn fetch_exercises(
        &self,
        _params: &SelectionParams,
        count: usize,
    ) -> Result<Vec<Exercise>, ApiError> {
        if self.fail_exercises {
            return Err(Self::unavailable());
        }
        Ok(self.exercises.iter().take(count).cloned().collect())
    }

    fn submit_progress(&self, report: &ProgressReport) -> Result<(), ApiError> {
        if self.fail_progress {
            return Err(Self::unavailable());
        }
        self.submitted
            .lock()
            .map_err(|e| ApiError::Request(e.to_string()))?
            .push(report.clone());
        Ok(())
    }

    fn user_progress(&self, user_id: &str) -> Result<Vec<ProgressRecord>, ApiError> {
        let submitted = self
            .submitted
            .lock()
            .map_err(|e| ApiError::Request(e.to_string()))?;
        Ok(submitted
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| ProgressRecord {
                user_id: r.user_id.clone(),
                age_group: r.age_group.id().to_string(),
                operation: r.operation.id().to_string(),
                level: r.level.id().to_string(),
                score: r.score,
                stars: r.stars,
                completed_exercises: r.completed_exercises,
                timestamp: None,
            })
            .collect())
    }
}
