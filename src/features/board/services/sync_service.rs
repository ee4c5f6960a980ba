use std::sync::Arc;

use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;

use crate::core::config::SyncConfig;
use crate::core::error::Result;
use crate::features::board::models::{Assignment, Short, User};
use crate::features::board::state::{reduce, BoardAction, SharedBoardState};
use crate::modules::api::{AssignmentScope, BoardApi};

/// Who the board is rendered for. Admins see every short plus the full
/// assignment and user lists; everyone else sees only their assigned
/// shorts and the public assignment view.
#[derive(Debug, Clone, Copy)]
pub struct Viewer {
    pub is_admin: bool,
}

/// Cloneable handle for requesting an immediate out-of-band refresh, used
/// after every successful mutation instead of waiting for the next tick.
#[derive(Clone)]
pub struct SyncHandle {
    reload: Arc<Notify>,
}

impl SyncHandle {
    pub fn reload_now(&self) {
        self.reload.notify_one();
    }
}

/// Background poller that keeps the shared board state fresh.
///
/// Each tick takes one guard snapshot and skips the refresh while a modal
/// is open or a load is already in flight. A forced reload via
/// [`SyncHandle::reload_now`] ignores the modal guard (the mutation that
/// triggered it usually happened inside a modal) but still yields to an
/// in-flight load.
pub struct SyncService<A: BoardApi> {
    api: Arc<A>,
    state: SharedBoardState,
    viewer: Viewer,
    config: SyncConfig,
    reload: Arc<Notify>,
}

impl<A: BoardApi> SyncService<A> {
    pub fn new(api: Arc<A>, state: SharedBoardState, viewer: Viewer, config: SyncConfig) -> Self {
        Self {
            api,
            state,
            viewer,
            config,
            reload: Arc::new(Notify::new()),
        }
    }

    pub fn handle(&self) -> SyncHandle {
        SyncHandle {
            reload: self.reload.clone(),
        }
    }

    /// Poll loop. The first tick fires immediately, doubling as the initial
    /// board load. Runs until the owning task is dropped.
    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.config.poll_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            "Board sync started (every {}s)",
            self.config.poll_interval_secs
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.refresh(false).await {
                        tracing::error!("Board refresh failed: {}", e);
                    }
                }
                _ = self.reload.notified() => {
                    if let Err(e) = self.refresh(true).await {
                        tracing::error!("Forced board refresh failed: {}", e);
                    }
                }
            }
        }
    }

    async fn refresh(&self, forced: bool) -> Result<()> {
        {
            let state = self.state.read().await;
            let suspended = if forced {
                state.loading
            } else {
                !state.sync_may_run()
            };
            if suspended {
                tracing::debug!("Board refresh skipped (forced: {})", forced);
                return Ok(());
            }
        }

        self.apply(BoardAction::LoadStarted).await;
        let fetched = self.fetch().await;
        self.apply(BoardAction::LoadFinished).await;

        let (shorts, assignments, users) = fetched?;
        tracing::debug!(
            "Board refreshed: {} shorts, {} assignments",
            shorts.len(),
            assignments.len()
        );

        self.apply(BoardAction::ShortsLoaded(shorts)).await;
        self.apply(BoardAction::AssignmentsLoaded(assignments)).await;
        if let Some(users) = users {
            self.apply(BoardAction::UsersLoaded(users)).await;
        }
        Ok(())
    }

    async fn fetch(&self) -> Result<(Vec<Short>, Vec<Assignment>, Option<Vec<User>>)> {
        if self.viewer.is_admin {
            let shorts = self.api.list_shorts(false).await?;
            let assignments = self.api.list_assignments(AssignmentScope::All).await?;
            let users = self.api.list_users().await?;
            Ok((shorts, assignments, Some(users)))
        } else {
            let shorts = self.api.list_shorts(true).await?;
            let assignments = self.api.list_assignments(AssignmentScope::Public).await?;
            Ok((shorts, assignments, None))
        }
    }

    async fn apply(&self, action: BoardAction) {
        let mut guard = self.state.write().await;
        let current = std::mem::take(&mut *guard);
        *guard = reduce(current, action);
    }
}
