//! TTL snapshot cache with single-flight refresh.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt, Shared, WeakShared};
use groupscope_config::CacheSettings;
use groupscope_core::{
    ApiToken, Field, GroupscopeResult, RequestContext, User, Workspace, WorkspaceGroup,
};
use groupscope_upstream::CollectionSource;
use parking_lot::{Mutex, RwLock};
use tokio::time::Instant;

use crate::snapshot::Snapshot;
use crate::stats::{CacheStats, Counters};

/// Default time a snapshot stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Snapshot cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a snapshot is served before the next call refreshes it.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL }
    }
}

impl From<&CacheSettings> for CacheConfig {
    fn from(settings: &CacheSettings) -> Self {
        Self { ttl: settings.ttl }
    }
}

type RefreshResult = GroupscopeResult<Arc<Snapshot>>;
type RefreshFuture = Shared<BoxFuture<'static, RefreshResult>>;

struct Inner<S> {
    source: S,
    token: ApiToken,
    config: CacheConfig,
    /// `None` until the first successful refresh.
    current: RwLock<Option<Arc<Snapshot>>>,
    /// The refresh in flight, if any. Held weakly: when every waiter gives
    /// up, the refresh future is dropped and its upstream calls abort.
    inflight: Mutex<Option<WeakShared<BoxFuture<'static, RefreshResult>>>>,
    counters: Counters,
}

/// In-memory snapshot of the upstream collections for one API token.
///
/// [`ensure_fresh`](Self::ensure_fresh) serves the current snapshot while it
/// is younger than the TTL. Once stale, the first caller starts a refresh that
/// fetches all four collections concurrently; callers arriving meanwhile wait
/// on that same refresh instead of issuing their own. A refresh commits only
/// if all four fetches succeed; otherwise every waiter receives the error and
/// the previous snapshot stays in place, still stale, so the next call tries
/// again.
///
/// Readers never block on a refresh: they see the previous snapshot until the
/// new one is swapped in.
///
/// Cloning is cheap and shares the cache.
pub struct SnapshotCache<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for SnapshotCache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> std::fmt::Debug for SnapshotCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotCache")
            .field("token", &self.inner.token)
            .field("ttl", &self.inner.config.ttl)
            .field("populated", &self.inner.current.read().is_some())
            .finish_non_exhaustive()
    }
}

impl<S> SnapshotCache<S>
where
    S: CollectionSource + 'static,
{
    /// Create an empty cache fetching from `source` with `token`.
    pub fn new(source: S, token: ApiToken, config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                token,
                config,
                current: RwLock::new(None),
                inflight: Mutex::new(None),
                counters: Counters::default(),
            }),
        }
    }

    /// The underlying collection source.
    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// The token this cache fetches with.
    pub fn token(&self) -> &ApiToken {
        &self.inner.token
    }

    /// The configured TTL.
    pub fn ttl(&self) -> Duration {
        self.inner.config.ttl
    }

    /// Returns a fresh snapshot, refreshing first if the current one is
    /// missing or older than the TTL.
    ///
    /// # Errors
    ///
    /// The first failing upstream fetch of the refresh, or a cancellation /
    /// timeout error if `ctx` gives up while waiting.
    pub async fn ensure_fresh(&self, ctx: &RequestContext) -> GroupscopeResult<Arc<Snapshot>> {
        if let Some(snapshot) = self.fresh_snapshot() {
            self.inner.counters.hit();
            return Ok(snapshot);
        }

        let refresh = {
            let mut inflight = self.inner.inflight.lock();

            // Another caller may have committed while we waited for the lock.
            if let Some(snapshot) = self.fresh_snapshot() {
                self.inner.counters.hit();
                return Ok(snapshot);
            }

            match inflight.as_ref().and_then(WeakShared::upgrade) {
                // A finished refresh is never joined; a failure is delivered
                // only to the callers that were waiting on it.
                Some(running) if running.peek().is_none() => {
                    self.inner.counters.joined();
                    tracing::debug!(request_id = %ctx.request_id(), "joining in-flight refresh");
                    running
                }
                _ => {
                    let refresh: RefreshFuture =
                        Self::refresh(Arc::clone(&self.inner), ctx.detached())
                            .boxed()
                            .shared();
                    *inflight = refresh.downgrade();
                    refresh
                }
            }
        };

        ctx.run("refresh snapshot", refresh).await
    }

    /// Fetches all four collections concurrently and commits them together.
    async fn refresh(inner: Arc<Inner<S>>, ctx: RequestContext) -> RefreshResult {
        let started = Instant::now();
        tracing::debug!(request_id = %ctx.request_id(), "refreshing snapshot");

        let source = &inner.source;
        let token = &inner.token;
        let fetched = tokio::try_join!(
            source.fetch_users(token, &ctx),
            source.fetch_workspaces(token, &ctx),
            source.fetch_workspace_groups(token, &ctx),
            source.fetch_fields(token, &ctx),
        );

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match fetched {
            Ok((users, workspaces, groups, fields)) => {
                let snapshot = Arc::new(Snapshot::new(users, workspaces, groups, fields));
                *inner.current.write() = Some(Arc::clone(&snapshot));
                inner.counters.refreshed();
                tracing::info!(
                    request_id = %ctx.request_id(),
                    users = snapshot.users.len(),
                    workspaces = snapshot.workspaces.len(),
                    groups = snapshot.groups.len(),
                    fields = snapshot.fields.len(),
                    duration_ms,
                    "snapshot refreshed"
                );
                Ok(snapshot)
            }
            Err(err) => {
                inner.counters.failed();
                tracing::warn!(
                    request_id = %ctx.request_id(),
                    error = %err,
                    duration_ms,
                    "snapshot refresh failed, keeping previous snapshot"
                );
                Err(err)
            }
        }
    }
}

impl<S> SnapshotCache<S> {
    fn fresh_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner
            .current
            .read()
            .as_ref()
            .filter(|snapshot| snapshot.is_fresh(self.inner.config.ttl))
            .cloned()
    }

    /// The current snapshot regardless of age, if any refresh has succeeded.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.current.read().clone()
    }

    /// True when a snapshot exists and is within the TTL.
    pub fn is_fresh(&self) -> bool {
        self.fresh_snapshot().is_some()
    }

    /// Copy of the cached users; empty before the first refresh.
    pub fn users(&self) -> Vec<User> {
        self.read(|s| s.users.clone())
    }

    /// Copy of the cached workspaces; empty before the first refresh.
    pub fn workspaces(&self) -> Vec<Workspace> {
        self.read(|s| s.workspaces.clone())
    }

    /// Copy of the cached workspace groups; empty before the first refresh.
    pub fn groups(&self) -> Vec<WorkspaceGroup> {
        self.read(|s| s.groups.clone())
    }

    /// Copy of the cached fields; empty before the first refresh.
    pub fn fields(&self) -> Vec<Field> {
        self.read(|s| s.fields.clone())
    }

    /// Current counter values.
    pub fn stats(&self) -> CacheStats {
        self.inner.counters.snapshot()
    }

    fn read<T: Default>(&self, f: impl FnOnce(&Snapshot) -> T) -> T {
        self.snapshot().map(|s| f(&s)).unwrap_or_default()
    }
}
