//! Read-path loading with canned fallback data
//!
//! A fetch produces a [`FetchOutcome`]; [`resolve`] turns it into the [`LoadState`]
//! a page renders. Failures never leave a page in `Loading`: they resolve to the
//! fallback dataset and keep the cause for display.

use std::future::Future;

use serde::Serialize;

use crate::error::{DashboardError, Result};

/// Result of a single read fetch
#[derive(Debug)]
pub enum FetchOutcome<T> {
    Success(T),
    Failure(DashboardError),
}

impl<T> From<Result<T>> for FetchOutcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => FetchOutcome::Success(data),
            Err(e) => FetchOutcome::Failure(e),
        }
    }
}

/// What a page shows
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Fallback { data: T, cause: String },
}

/// [`LoadState`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Loading,
    Ready,
    Fallback,
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Loading
    }
}

impl<T> LoadState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loading => None,
            LoadState::Ready(data) | LoadState::Fallback { data, .. } => Some(data),
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            LoadState::Loading => None,
            LoadState::Ready(data) | LoadState::Fallback { data, .. } => Some(data),
        }
    }

    pub fn cause(&self) -> Option<&str> {
        match self {
            LoadState::Fallback { cause, .. } => Some(cause),
            _ => None,
        }
    }

    pub fn status(&self) -> LoadStatus {
        match self {
            LoadState::Loading => LoadStatus::Loading,
            LoadState::Ready(_) => LoadStatus::Ready,
            LoadState::Fallback { .. } => LoadStatus::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, LoadState::Fallback { .. })
    }
}

/// Choose the displayed data. The fallback is only built on failure.
pub fn resolve<T>(outcome: FetchOutcome<T>, fallback: impl FnOnce() -> T) -> LoadState<T> {
    match outcome {
        FetchOutcome::Success(data) => LoadState::Ready(data),
        FetchOutcome::Failure(cause) => LoadState::Fallback {
            data: fallback(),
            cause: cause.to_string(),
        },
    }
}

/// Await `fetch` and resolve it, logging the cause of a failure.
pub async fn fetch_or_fallback<T, F>(
    what: &str,
    fetch: F,
    fallback: impl FnOnce() -> T,
) -> LoadState<T>
where
    F: Future<Output = Result<T>>,
{
    let outcome = FetchOutcome::from(fetch.await);
    if let FetchOutcome::Failure(e) = &outcome {
        tracing::warn!("Failed to load {}, showing sample data: {}", what, e);
    }
    resolve(outcome, fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_ready() {
        let state = resolve(FetchOutcome::Success(vec![1, 2]), Vec::new);
        assert_eq!(state, LoadState::Ready(vec![1, 2]));
        assert_eq!(state.status(), LoadStatus::Ready);
        assert_eq!(state.cause(), None);
    }

    #[test]
    fn failure_uses_fallback_not_empty() {
        let state = resolve(
            FetchOutcome::Failure(DashboardError::Http("connection refused".to_string())),
            || vec![7, 8, 9],
        );
        assert_eq!(state.data(), Some(&vec![7, 8, 9]));
        assert!(state.is_fallback());
        assert!(state.cause().unwrap().contains("connection refused"));
    }

    #[test]
    fn loading_has_no_data() {
        let state: LoadState<Vec<u8>> = LoadState::default();
        assert_eq!(state.status(), LoadStatus::Loading);
        assert!(state.into_data().is_none());
    }

    #[tokio::test]
    async fn fetch_or_fallback_awaits_future() {
        let state = fetch_or_fallback("logs", async { Ok(3) }, || 0).await;
        assert_eq!(state, LoadState::Ready(3));

        let state = fetch_or_fallback(
            "logs",
            async { Err::<i32, _>(DashboardError::NotFound("logs".to_string())) },
            || 42,
        )
        .await;
        assert_eq!(state.into_data(), Some(42));
    }

    #[test]
    fn undecodable_body_falls_back() {
        let fetch = async {
            serde_json::from_str::<Vec<u32>>("<html>").map_err(DashboardError::from)
        };
        let state = tokio_test::block_on(fetch_or_fallback("logs", fetch, || vec![1]));
        assert_eq!(state.status(), LoadStatus::Fallback);
        assert_eq!(state.into_data(), Some(vec![1]));
    }
}
