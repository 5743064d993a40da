use std::collections::HashSet;

use tracing::{debug, info};

use crate::{
    actions,
    config::Config,
    policy::Policy,
    ports::{PlatformUpdate, StorySession},
    Result,
};

/// Totals for one initial sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub peers: usize,
    pub stories: usize,
}

/// Walk the whole active-story feed once and watch/react per policy.
///
/// Totals are accumulated and logged once at the end; there are no
/// per-peer partial totals to double count.
pub async fn sweep(
    session: &dyn StorySession,
    cfg: &Config,
    policy: &Policy,
    contacts: &HashSet<i64>,
) -> Result<SweepSummary> {
    if !cfg.watch_stories {
        info!("story watching disabled; skipping initial sweep");
        return Ok(SweepSummary::default());
    }

    let feed = session.active_stories().await?;
    if feed.is_empty() {
        info!("no active stories in feed");
        return Ok(SweepSummary::default());
    }

    let reaction = actions::build_reaction(&cfg.reaction_emoji);
    let mut summary = SweepSummary::default();

    for entry in feed {
        if !policy.should_watch(entry.peer, contacts) {
            continue;
        }

        let handle = session.resolve_peer(entry.peer).await?;

        if entry.story_ids.is_empty() {
            continue;
        }

        let watched =
            actions::watch_stories(session, &handle, &entry.story_ids, cfg.read_stories).await?;
        if cfg.react_stories && policy.should_react(entry.peer, contacts) {
            actions::react_to_stories(session, &handle, &entry.story_ids, &reaction).await?;
        }

        summary.peers += 1;
        summary.stories += watched;
    }

    info!(
        "initial sweep watched {} stories across {} peers",
        summary.stories, summary.peers
    );
    Ok(summary)
}

/// Handle one live update, under the same gating as the sweep.
///
/// Non-story updates and ineligible peers are ignored; a transport failure
/// propagates to the caller, which owns per-update logging.
pub async fn handle_update(
    session: &dyn StorySession,
    cfg: &Config,
    policy: &Policy,
    contacts: &HashSet<i64>,
    update: &PlatformUpdate,
) -> Result<()> {
    let PlatformUpdate::Story(story) = update else {
        return Ok(());
    };

    if !cfg.watch_stories {
        return Ok(());
    }
    if !policy.should_watch(story.peer, contacts) {
        debug!("skipping story {} on {}", story.story_id, story.peer);
        return Ok(());
    }

    let handle = session.resolve_peer(story.peer).await?;
    actions::watch_stories(session, &handle, &[story.story_id], cfg.read_stories).await?;

    if cfg.react_stories && policy.should_react(story.peer, contacts) {
        let reaction = actions::build_reaction(&cfg.reaction_emoji);
        actions::react_to_stories(session, &handle, &[story.story_id], &reaction).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Peer, Reaction, StoryRef},
        ports::FeedEntry,
        test_support::{policy_from, test_config, Call, RecordingSession},
    };

    fn no_contacts() -> HashSet<i64> {
        HashSet::new()
    }

    #[tokio::test]
    async fn sweep_watches_eligible_peers_and_skips_empty_story_lists() {
        // included=["all"], react disabled: User(1) has [5, 3, 3], Channel(9)
        // has nothing.
        let session = RecordingSession::with_feed(vec![
            FeedEntry {
                peer: Peer::User(1),
                story_ids: vec![5, 3, 3],
            },
            FeedEntry {
                peer: Peer::Channel(9),
                story_ids: vec![],
            },
        ]);
        let cfg = test_config();
        let policy = policy_from(&["all"], &[], &[]);

        let summary = sweep(&session, &cfg, &policy, &no_contacts()).await.unwrap();

        assert_eq!(summary, SweepSummary { peers: 1, stories: 2 });
        let views: Vec<_> = session
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::IncrementViews { .. }))
            .collect();
        assert_eq!(
            views,
            vec![Call::IncrementViews {
                peer: Peer::User(1),
                ids: vec![3, 5],
            }]
        );
    }

    #[tokio::test]
    async fn sweep_skips_network_entirely_when_watching_disabled() {
        let session = RecordingSession::with_feed(vec![FeedEntry {
            peer: Peer::User(1),
            story_ids: vec![1],
        }]);
        let mut cfg = test_config();
        cfg.watch_stories = false;
        let policy = policy_from(&["all"], &[], &[]);

        let summary = sweep(&session, &cfg, &policy, &no_contacts()).await.unwrap();

        assert_eq!(summary, SweepSummary::default());
        assert!(session.calls().is_empty());
    }

    #[tokio::test]
    async fn sweep_skips_excluded_peers() {
        let session = RecordingSession::with_feed(vec![
            FeedEntry {
                peer: Peer::User(1),
                story_ids: vec![1],
            },
            FeedEntry {
                peer: Peer::User(2),
                story_ids: vec![7],
            },
        ]);
        let cfg = test_config();
        let policy = policy_from(&["all"], &["1"], &[]);

        let summary = sweep(&session, &cfg, &policy, &no_contacts()).await.unwrap();

        assert_eq!(summary, SweepSummary { peers: 1, stories: 1 });
        assert!(!session
            .calls()
            .iter()
            .any(|c| matches!(c, Call::ResolvePeer(Peer::User(1)))));
    }

    #[tokio::test]
    async fn sweep_reacts_only_where_not_reaction_excluded() {
        let session = RecordingSession::with_feed(vec![
            FeedEntry {
                peer: Peer::User(1),
                story_ids: vec![4],
            },
            FeedEntry {
                peer: Peer::User(2),
                story_ids: vec![6],
            },
        ]);
        let mut cfg = test_config();
        cfg.react_stories = true;
        cfg.reaction_emoji = "777".to_string();
        let policy = policy_from(&["all"], &[], &["2"]);

        sweep(&session, &cfg, &policy, &no_contacts()).await.unwrap();

        let reactions: Vec<_> = session
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::SendReaction { .. }))
            .collect();
        assert_eq!(
            reactions,
            vec![Call::SendReaction {
                peer: Peer::User(1),
                story_id: 4,
                reaction: Reaction::CustomEmoji(777),
            }]
        );
    }

    #[tokio::test]
    async fn live_update_dispatches_single_story_watch() {
        let session = RecordingSession::default();
        let cfg = test_config();
        let policy = policy_from(&["all"], &[], &[]);
        let update = PlatformUpdate::Story(StoryRef {
            peer: Peer::Channel(9),
            story_id: 12,
        });

        handle_update(&session, &cfg, &policy, &no_contacts(), &update)
            .await
            .unwrap();

        assert_eq!(
            session.calls(),
            vec![
                Call::ResolvePeer(Peer::Channel(9)),
                Call::IncrementViews {
                    peer: Peer::Channel(9),
                    ids: vec![12],
                },
            ]
        );
    }

    #[tokio::test]
    async fn live_update_ignores_non_story_events() {
        let session = RecordingSession::default();
        let cfg = test_config();
        let policy = policy_from(&["all"], &[], &[]);

        handle_update(&session, &cfg, &policy, &no_contacts(), &PlatformUpdate::Other)
            .await
            .unwrap();

        assert!(session.calls().is_empty());
    }

    #[tokio::test]
    async fn live_update_respects_master_watch_flag() {
        let session = RecordingSession::default();
        let mut cfg = test_config();
        cfg.watch_stories = false;
        let policy = policy_from(&["all"], &[], &[]);
        let update = PlatformUpdate::Story(StoryRef {
            peer: Peer::User(1),
            story_id: 3,
        });

        handle_update(&session, &cfg, &policy, &no_contacts(), &update)
            .await
            .unwrap();

        assert!(session.calls().is_empty());
    }

    #[tokio::test]
    async fn live_update_reacts_under_same_gating() {
        let session = RecordingSession::default();
        let mut cfg = test_config();
        cfg.react_stories = true;
        cfg.reaction_emoji = "\u{1f525}".to_string();
        let policy = policy_from(&["all"], &[], &[]);
        let update = PlatformUpdate::Story(StoryRef {
            peer: Peer::User(4),
            story_id: 2,
        });

        handle_update(&session, &cfg, &policy, &no_contacts(), &update)
            .await
            .unwrap();

        assert!(session.calls().iter().any(|c| matches!(
            c,
            Call::SendReaction {
                peer: Peer::User(4),
                story_id: 2,
                ..
            }
        )));
    }

    #[tokio::test]
    async fn live_update_skips_ineligible_peers_with_read_marking() {
        let session = RecordingSession::default();
        let mut cfg = test_config();
        cfg.read_stories = true;
        let policy = policy_from(&["users"], &[], &[]);
        let update = PlatformUpdate::Story(StoryRef {
            peer: Peer::Chat(3),
            story_id: 1,
        });

        handle_update(&session, &cfg, &policy, &no_contacts(), &update)
            .await
            .unwrap();

        assert!(session.calls().is_empty());
    }

    #[tokio::test]
    async fn contact_scoped_policy_flows_through_sweep() {
        let session = RecordingSession::with_feed(vec![
            FeedEntry {
                peer: Peer::User(7),
                story_ids: vec![1],
            },
            FeedEntry {
                peer: Peer::User(8),
                story_ids: vec![2],
            },
        ]);
        let cfg = test_config();
        let policy = policy_from(&["contacts"], &[], &[]);
        let contacts = HashSet::from([7]);

        let summary = sweep(&session, &cfg, &policy, &contacts).await.unwrap();

        assert_eq!(summary, SweepSummary { peers: 1, stories: 1 });
    }
}
