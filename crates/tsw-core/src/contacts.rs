use std::{collections::HashSet, sync::Arc, time::Duration};

use tokio::{sync::RwLock, task::JoinHandle, time::sleep};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{policy::Policy, ports::StorySession, Result};

/// Shared handle over the account's current contact ids.
///
/// The refresher is the single writer and replaces the whole set in one
/// guarded assignment, so a reader sees either the old set or the new one,
/// never a partially-written set. Decision passes read a cloned snapshot.
#[derive(Clone, Default)]
pub struct ContactSet {
    inner: Arc<RwLock<HashSet<i64>>>,
}

impl ContactSet {
    pub fn new(ids: HashSet<i64>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ids)),
        }
    }

    pub async fn snapshot(&self) -> HashSet<i64> {
        self.inner.read().await.clone()
    }

    /// Swap in a freshly resolved set wholesale.
    pub async fn replace(&self, ids: HashSet<i64>) {
        *self.inner.write().await = ids;
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }
}

/// Fetch the current contact ids.
///
/// Returns an empty set without any network call when no selector
/// references the contact group. The platform response may carry dedicated
/// contact records, or only the user objects attached to the same payload;
/// the dedicated records win when present. An empty contact list is fine.
pub async fn load_contact_ids(
    session: &dyn StorySession,
    policy: &Policy,
) -> Result<HashSet<i64>> {
    if !policy.needs_contacts() {
        return Ok(HashSet::new());
    }

    let snapshot = session.contacts().await?;
    let source = if snapshot.contact_ids.is_empty() {
        snapshot.attached_user_ids
    } else {
        snapshot.contact_ids
    };

    let ids: HashSet<i64> = source.into_iter().collect();
    info!("loaded {} contacts", ids.len());
    Ok(ids)
}

/// Long-lived periodic refresh of the contact set.
pub struct ContactRefresher {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ContactRefresher {
    /// Spawn the refresh task, or return `None` when the interval is zero
    /// or the policy never looks at contacts.
    pub fn spawn(
        session: Arc<dyn StorySession>,
        policy: Arc<Policy>,
        contacts: ContactSet,
        interval: Duration,
    ) -> Option<Self> {
        if interval.is_zero() || !policy.needs_contacts() {
            return None;
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = sleep(interval) => {
                        match load_contact_ids(session.as_ref(), &policy).await {
                            Ok(ids) => {
                                let count = ids.len();
                                contacts.replace(ids).await;
                                info!("refreshed contacts (count={count})");
                            }
                            // Keep the stale set; retry at the next interval.
                            Err(e) => warn!("contact refresh failed: {e}"),
                        }
                    }
                }
            }
        });

        Some(Self { cancel, handle })
    }

    /// Stop the task and wait for it to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}
