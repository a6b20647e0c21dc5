use super::ApiError;
use crate::strings::Strings;

/// Both phrases must appear for an error to count as an Aurora cold start.
pub const COLD_START_MARKERS: [&str; 2] = [
    "The Aurora DB instance",
    "is resuming after being auto-paused",
];

pub fn is_cold_start(text: &str) -> bool {
    COLD_START_MARKERS.iter().all(|marker| text.contains(marker))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The database behind the backend is waking up; retrying shortly works.
    ColdStart,
    /// The backend explained what went wrong; shown verbatim.
    Reported(String),
    /// The backend failed without saying why.
    Unspecified,
    /// The request never produced a usable response.
    Network,
}

impl FailureKind {
    pub fn user_message(&self, strings: &Strings) -> String {
        match self {
            FailureKind::ColdStart => strings.cold_start.to_string(),
            FailureKind::Reported(text) => text.clone(),
            FailureKind::Unspecified => strings.generic_error.to_string(),
            FailureKind::Network => strings.network_error.to_string(),
        }
    }
}

pub fn classify(err: &ApiError) -> FailureKind {
    match err {
        ApiError::Backend(text) if is_cold_start(text) => FailureKind::ColdStart,
        ApiError::Backend(text) => FailureKind::Reported(text.clone()),
        ApiError::BackendUnspecified { .. } => FailureKind::Unspecified,
        other if is_cold_start(&other.to_string()) => FailureKind::ColdStart,
        _ => FailureKind::Network,
    }
}
