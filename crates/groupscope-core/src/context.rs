//! Request context types.
//!
//! A [`RequestContext`] is created by the UI layer for each inbound request and
//! passed to every gateway call and facade operation. It carries the request
//! ID used for log correlation, a cancellation token and an optional deadline.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{GroupscopeError, GroupscopeResult};

/// A unique identifier for each request, using UUID v7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-request cancellation and deadline signal.
///
/// Cloning a context shares its cancellation token: cancelling any clone
/// cancels them all.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use groupscope_core::RequestContext;
///
/// let ctx = RequestContext::new().with_timeout(Duration::from_secs(30));
/// assert!(ctx.deadline().is_some());
/// assert!(!ctx.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request.
    request_id: RequestId,

    /// Cancelled when the originating request goes away.
    cancel: CancellationToken,

    /// Point in time after which work for this request is abandoned.
    deadline: Option<Instant>,

    /// When the request started processing.
    started_at: Instant,
}

impl RequestContext {
    /// Creates a new context with a fresh request ID, no deadline and an
    /// uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            cancel: CancellationToken::new(),
            deadline: None,
            started_at: Instant::now(),
        }
    }

    /// Returns a context bound to an externally owned cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Returns a context with an absolute deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Returns a context whose deadline is `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        self.with_deadline(deadline)
    }

    /// Returns a context that shares this request ID but owns an independent
    /// token, with no deadline.
    ///
    /// Cancelling the detached context does not affect this one and vice
    /// versa. Used for work shared between several callers.
    #[must_use]
    pub fn detached(&self) -> Self {
        Self {
            request_id: self.request_id,
            cancel: CancellationToken::new(),
            deadline: None,
            started_at: Instant::now(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the cancellation token.
    #[must_use]
    pub const fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Cancels this context and every clone of it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns true once the context has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Returns the elapsed time since the context was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Drives `fut` to completion unless the context is cancelled or its
    /// deadline passes first.
    ///
    /// On cancellation or deadline the future is dropped, which aborts any
    /// network I/O it owns, and a [`GroupscopeError::Cancelled`] or
    /// [`GroupscopeError::Timeout`] naming `operation` is returned.
    pub async fn run<F, T>(&self, operation: &str, fut: F) -> GroupscopeResult<T>
    where
        F: Future<Output = GroupscopeResult<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(GroupscopeError::cancelled(operation));
        }

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(GroupscopeError::cancelled(operation)),
            () = sleep_until(self.deadline) => Err(GroupscopeError::timeout(operation)),
            result = fut => result,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_new_generates_unique_ids() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();
        assert_ne!(id1, id2, "Each RequestId should be unique");
    }

    #[test]
    fn test_request_id_display() {
        let display = RequestId::new().to_string();
        assert_eq!(display.len(), 36, "UUID string should be 36 characters");
    }

    #[tokio::test]
    async fn test_run_completes() {
        let ctx = RequestContext::new();
        let value = ctx.run("op", async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_run_propagates_inner_error() {
        let ctx = RequestContext::new();
        let err = ctx
            .run::<_, ()>("op", async { Err(GroupscopeError::not_found("user", "x")) })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_run_already_cancelled() {
        let ctx = RequestContext::new();
        ctx.cancel();
        let err = ctx.run("list users", async { Ok(()) }).await.unwrap_err();
        assert_eq!(err, GroupscopeError::cancelled("list users"));
    }

    #[tokio::test]
    async fn test_cancel_aborts_pending_work() {
        let ctx = RequestContext::new();
        let clone = ctx.clone();
        let handle = tokio::spawn(async move {
            clone
                .run::<_, ()>("slow", std::future::pending())
                .await
        });
        ctx.cancel();
        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, GroupscopeError::Cancelled { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_expires() {
        let ctx = RequestContext::new().with_timeout(Duration::from_secs(5));
        let err = ctx
            .run::<_, ()>("slow", std::future::pending())
            .await
            .unwrap_err();
        assert_eq!(err, GroupscopeError::timeout("slow"));
    }

    #[tokio::test]
    async fn test_detached_is_independent() {
        let ctx = RequestContext::new();
        let detached = ctx.detached();
        ctx.cancel();
        assert!(!detached.is_cancelled());
        assert_eq!(detached.request_id(), ctx.request_id());
    }
}
