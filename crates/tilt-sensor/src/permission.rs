use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Outcome of a motion-sensor permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    #[error("Permission request failed: {0}")]
    RequestFailed(String),
    #[error("No async runtime available to run the permission request")]
    NoRuntime,
    #[error("Permission request was dropped before it resolved")]
    Abandoned,
}

pub type PermissionResult = Result<PermissionState, PermissionError>;

pub type PermissionFuture = Pin<Box<dyn Future<Output = PermissionResult> + Send>>;

/// Host capability for platforms that gate motion sensors behind a prompt.
pub trait MotionPermission: Send + Sync {
    /// Ask for access. The returned future resolves once the user answers.
    fn request(&self) -> PermissionFuture;
}

/// A prompt with a fixed answer.
#[derive(Debug, Clone)]
pub struct StaticPermission {
    outcome: PermissionResult,
}

impl StaticPermission {
    pub fn granted() -> Self {
        Self {
            outcome: Ok(PermissionState::Granted),
        }
    }

    pub fn denied() -> Self {
        Self {
            outcome: Ok(PermissionState::Denied),
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            outcome: Err(PermissionError::RequestFailed(reason.into())),
        }
    }
}

impl MotionPermission for StaticPermission {
    fn request(&self) -> PermissionFuture {
        let outcome = self.outcome.clone();
        Box::pin(async move { outcome })
    }
}
