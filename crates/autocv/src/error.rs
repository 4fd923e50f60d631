use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::cover_letter::{
    ApplicantError, EngineError, JobCredentialsError, TraversalError,
};
use crate::workflows::profile::ProfileError;
use crate::workflows::render::RenderError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Traversal(TraversalError),
    Profile(ProfileError),
    Applicant(ApplicantError),
    JobCredentials(JobCredentialsError),
    Document(EngineError),
    Render(RenderError),
    /// Request could not be served as asked (bad reference, incomplete letter).
    Rejected(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Traversal(err) => write!(f, "field traversal error: {}", err),
            AppError::Profile(err) => write!(f, "profile error: {}", err),
            AppError::Applicant(err) => write!(f, "applicant error: {}", err),
            AppError::JobCredentials(err) => write!(f, "job credentials error: {}", err),
            AppError::Document(err) => write!(f, "cover letter error: {}", err),
            AppError::Render(err) => write!(f, "render error: {}", err),
            AppError::Rejected(reason) => write!(f, "request rejected: {}", reason),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Traversal(err) => Some(err),
            AppError::Profile(err) => Some(err),
            AppError::Applicant(err) => Some(err),
            AppError::JobCredentials(err) => Some(err),
            AppError::Document(err) => Some(err),
            AppError::Render(err) => Some(err),
            AppError::Rejected(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Applicant(_) | AppError::JobCredentials(_) | AppError::Rejected(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Document(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Traversal(_)
            | AppError::Profile(_)
            | AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<TraversalError> for AppError {
    fn from(value: TraversalError) -> Self {
        Self::Traversal(value)
    }
}

impl From<ProfileError> for AppError {
    fn from(value: ProfileError) -> Self {
        Self::Profile(value)
    }
}

impl From<ApplicantError> for AppError {
    fn from(value: ApplicantError) -> Self {
        Self::Applicant(value)
    }
}

impl From<JobCredentialsError> for AppError {
    fn from(value: JobCredentialsError) -> Self {
        Self::JobCredentials(value)
    }
}

impl From<EngineError> for AppError {
    fn from(value: EngineError) -> Self {
        Self::Document(value)
    }
}

impl From<RenderError> for AppError {
    fn from(value: RenderError) -> Self {
        Self::Render(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::cover_letter::{CoverLetterField, ResolveError};

    #[test]
    fn client_errors_map_to_4xx() {
        let response = AppError::Rejected("unknown company".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::from(EngineError::Resolve {
            line: 4,
            source: ResolveError::Unbound {
                field: CoverLetterField::Date,
            },
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn configuration_errors_map_to_5xx() {
        let response = AppError::from(TraversalError::Empty).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
