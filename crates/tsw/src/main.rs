//! Telegram story watcher: watches, reads, and reacts to stories for one
//! account, filtered by the configured selector policy.

use std::sync::Arc;

use tracing::{info, warn};

use tsw_core::{
    actions,
    config::Config,
    contacts::{self, ContactRefresher, ContactSet},
    intake,
    policy::Policy,
    ports::PlatformUpdate,
    Error,
};
use tsw_telegram::{auth, updates, TelegramSession};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tsw_core::logging::init("tsw")?;

    let cfg = Arc::new(Config::load()?);
    let policy = Arc::new(Policy::from_config(&cfg));

    // Fail fast on unusable reaction config, before any network traffic.
    actions::validate_reaction_config(cfg.react_stories, &cfg.reaction_emoji)?;

    let client = auth::connect(&cfg).await?;
    let session = Arc::new(TelegramSession::new(client));

    let contact_ids = contacts::load_contact_ids(session.as_ref(), &policy).await?;
    let contact_set = ContactSet::new(contact_ids);
    let refresher = ContactRefresher::spawn(
        session.clone(),
        policy.clone(),
        contact_set.clone(),
        cfg.contacts_refresh,
    );

    // One pass over everything already in the feed.
    let snapshot = contact_set.snapshot().await;
    intake::sweep(session.as_ref(), &cfg, &policy, &snapshot).await?;

    info!("listening for new story updates...");
    let result = run_update_loop(&session, &cfg, &policy, &contact_set).await;

    if let Some(refresher) = refresher {
        refresher.stop().await;
    }

    result
}

/// Drive the live update stream until the transport gives up.
///
/// Per-update failures (unresolvable peers, transient request errors) are
/// logged and skipped; a dead update stream terminates the process, since
/// supervision and retry live outside this program.
async fn run_update_loop(
    session: &Arc<TelegramSession>,
    cfg: &Config,
    policy: &Policy,
    contact_set: &ContactSet,
) -> Result<(), Error> {
    loop {
        let raw = session
            .client()
            .next_update()
            .await
            .map_err(|e| Error::Transport(format!("update stream failed: {e}")))?;

        let update = updates::map_update(&raw);
        if update == PlatformUpdate::Other {
            continue;
        }

        let snapshot = contact_set.snapshot().await;
        if let Err(e) =
            intake::handle_update(session.as_ref(), cfg, policy, &snapshot, &update).await
        {
            warn!("story update failed: {e}");
        }
    }
}
