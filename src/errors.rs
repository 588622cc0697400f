use axum::http::StatusCode;

/// Failures of the dashboard core: fetching, decoding, deriving and selecting.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Transport failure, timeout or non-success status from the data source.
    #[error("data source unavailable: {0}")]
    SourceUnavailable(String),
    /// The data source answered, but not with the documented shape.
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse {
        endpoint: &'static str,
        reason: String,
    },
    /// A series or session has nothing to show yet.
    #[error("no data: {0}")]
    NoData(String),
    /// A country or stat outside the offered choices.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),
}

impl DashboardError {
    pub fn malformed(endpoint: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            endpoint,
            reason: reason.into(),
        }
    }

    /// Errors raised while refreshing data, as opposed to contract violations.
    pub fn is_source_failure(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable(_) | Self::MalformedResponse { .. } | Self::NoData(_)
        )
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::SourceUnavailable(format!("request timed out: {err}"))
        } else {
            Self::SourceUnavailable(err.to_string())
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        let status = match err {
            DashboardError::SourceUnavailable(_) | DashboardError::MalformedResponse { .. } => {
                StatusCode::BAD_GATEWAY
            }
            DashboardError::NoData(_) => StatusCode::NOT_FOUND,
            DashboardError::InvalidSelection(_) => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
