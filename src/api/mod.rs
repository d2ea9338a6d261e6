use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;
use crate::models::{
    ExerciseTemplate, PersonalBest, ProgressSummary, Workout, WorkoutId, WorkoutPayload,
    WorkoutType, WorkoutTypeId,
};
use crate::session::{Session, UserInfo};

mod backend;
mod error;
mod retry;

pub use backend::WorkoutBackend;
pub use error::ApiError;
pub use retry::RetryConfig;

/// Login request payload
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request payload
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Response of `/login` and `/register`
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserInfo>,
}

/// API client for the FitTrack backend
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
    retry_config: RetryConfig,
}

impl ApiClient {
    /// Create a new API client; GET retries follow the `[api]` config section
    pub fn new(config: &Config, session: Session) -> Result<Self> {
        let retry_config = RetryConfig {
            max_retries: config.api.max_get_retries,
            initial_delay_ms: config.api.retry_initial_delay_ms,
            ..RetryConfig::default()
        };
        Self::with_retry_config(config, session, retry_config)
    }

    /// Create a new API client with custom retry configuration
    pub fn with_retry_config(
        config: &Config,
        session: Session,
        retry_config: RetryConfig,
    ) -> Result<Self> {
        let timeout = Duration::from_secs(config.api.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            session,
            retry_config,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.session.token().ok_or(ApiError::NotLoggedIn)?;
        Ok(self.client.request(method, self.url(path)).bearer_auth(token))
    }

    /// Map the response to `T`, tearing the session down on 401
    async fn read<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_status(status, body);
        if error.is_auth_expired() {
            self.session.expire();
        }
        tracing::debug!("Request failed with {}: {}", status, error);
        Err(error)
    }

    async fn get_once<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        tracing::debug!("GET {}", path);
        let response = self.authorized(Method::GET, path)?.send().await?;
        self.read(response).await
    }

    /// Authenticated GET with bounded retry for transient failures
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.retry_config
            .execute(move || self.get_once::<T>(path))
            .await
    }

    /// Authenticated write; sent exactly once
    async fn write<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("{} {}", method, path);
        let response = self.authorized(method, path)?.json(body).send().await?;
        self.read(response).await
    }

    async fn authenticate<B: Serialize>(&self, path: &str, body: &B) -> Result<AuthResponse, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await?;

        let auth: AuthResponse = self.read(response).await?;
        self.session.establish(auth.token.clone(), auth.user.clone());
        Ok(auth)
    }

    /// Login with email and password; establishes the session
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        tracing::debug!("Logging in as {}", email);

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth = self.authenticate("/login", &request).await?;

        tracing::info!("Successfully logged in as {}", email);
        Ok(auth)
    }

    /// Create an account; establishes the session like a login
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        tracing::debug!("Registering {}", request.email);

        let auth = self.authenticate("/register", request).await?;

        tracing::info!("Registered account {}", request.email);
        Ok(auth)
    }

    /// Forget the current session (the backend keeps no logout state)
    pub fn logout(&self) {
        self.session.end();
    }

    /// Get current user information
    pub async fn profile(&self) -> Result<UserInfo, ApiError> {
        let user: UserInfo = self.get("/profile").await?;
        self.session.set_user(user.clone());
        Ok(user)
    }

    pub async fn workout_types(&self) -> Result<Vec<WorkoutType>, ApiError> {
        self.get("/workout_types").await
    }

    pub async fn exercise_templates(
        &self,
        workout_type_id: WorkoutTypeId,
    ) -> Result<Vec<ExerciseTemplate>, ApiError> {
        self.get(&format!("/workout_types/{}/exercises", workout_type_id))
            .await
    }

    pub async fn list_workouts(&self) -> Result<Vec<Workout>, ApiError> {
        self.get("/workouts").await
    }

    pub async fn get_workout(&self, id: WorkoutId) -> Result<Workout, ApiError> {
        self.get(&format!("/workouts/{}", id)).await
    }

    pub async fn create_workout(&self, payload: &WorkoutPayload) -> Result<Workout, ApiError> {
        let workout: Workout = self.write(Method::POST, "/workouts", payload).await?;
        tracing::info!("Created workout {:?}", workout.id);
        Ok(workout)
    }

    pub async fn update_workout(
        &self,
        id: WorkoutId,
        payload: &WorkoutPayload,
    ) -> Result<Workout, ApiError> {
        let workout: Workout = self
            .write(Method::PATCH, &format!("/workouts/{}", id), payload)
            .await?;
        tracing::info!("Updated workout {}", id);
        Ok(workout)
    }

    pub async fn delete_workout(&self, id: WorkoutId) -> Result<(), ApiError> {
        let path = format!("/workouts/{}", id);
        tracing::debug!("DELETE {}", path);

        let response = self.authorized(Method::DELETE, &path)?.send().await?;
        let status = response.status();

        if status.is_success() {
            tracing::info!("Deleted workout {}", id);
            return Ok(());
        }

        // Reuse the error mapping; the body of a failed delete is never a value
        self.read::<serde_json::Value>(response).await.map(|_| ())
    }

    /// `GET /progress` without personal bests
    pub async fn progress_summary(&self) -> Result<ProgressSummary, ApiError> {
        self.get("/progress").await
    }

    pub async fn personal_bests(&self) -> Result<Vec<PersonalBest>, ApiError> {
        self.get("/personal-bests").await
    }

    /// Server-computed progress: summary and personal bests fetched together
    pub async fn progress(&self) -> Result<ProgressSummary, ApiError> {
        let (mut summary, personal_bests) =
            tokio::try_join!(self.progress_summary(), self.personal_bests())?;
        summary.personal_bests = personal_bests;
        Ok(summary)
    }
}

#[async_trait]
impl WorkoutBackend for ApiClient {
    async fn workout_types(&self) -> Result<Vec<WorkoutType>, ApiError> {
        ApiClient::workout_types(self).await
    }

    async fn exercise_templates(
        &self,
        workout_type_id: WorkoutTypeId,
    ) -> Result<Vec<ExerciseTemplate>, ApiError> {
        ApiClient::exercise_templates(self, workout_type_id).await
    }

    async fn create_workout(&self, payload: &WorkoutPayload) -> Result<Workout, ApiError> {
        ApiClient::create_workout(self, payload).await
    }

    async fn update_workout(
        &self,
        id: WorkoutId,
        payload: &WorkoutPayload,
    ) -> Result<Workout, ApiError> {
        ApiClient::update_workout(self, id, payload).await
    }
}
