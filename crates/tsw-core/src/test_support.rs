//! In-memory session double and config/policy builders shared by the core
//! test modules.

use std::{path::PathBuf, sync::Mutex, time::Duration};

use async_trait::async_trait;

use crate::{
    config::Config,
    domain::{Peer, PeerHandle, Reaction},
    policy::Policy,
    ports::{ContactsSnapshot, FeedEntry, StorySession},
    selectors::SelectorSet,
    Result,
};

/// Every port call a test run observed, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    ResolvePeer(Peer),
    ActiveStories,
    Contacts,
    IncrementViews { peer: Peer, ids: Vec<i32> },
    MarkRead { peer: Peer, max_id: i32 },
    SendReaction { peer: Peer, story_id: i32, reaction: Reaction },
}

#[derive(Default)]
pub struct RecordingSession {
    pub feed: Vec<FeedEntry>,
    pub contacts: ContactsSnapshot,
    calls: Mutex<Vec<Call>>,
}

impl RecordingSession {
    pub fn with_feed(feed: Vec<FeedEntry>) -> Self {
        Self {
            feed,
            ..Default::default()
        }
    }

    pub fn with_contacts(contacts: ContactsSnapshot) -> Self {
        Self {
            contacts,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl StorySession for RecordingSession {
    async fn resolve_peer(&self, peer: Peer) -> Result<PeerHandle> {
        self.record(Call::ResolvePeer(peer));
        Ok(PeerHandle {
            peer,
            access_hash: Some(1),
        })
    }

    async fn active_stories(&self) -> Result<Vec<FeedEntry>> {
        self.record(Call::ActiveStories);
        Ok(self.feed.clone())
    }

    async fn contacts(&self) -> Result<ContactsSnapshot> {
        self.record(Call::Contacts);
        Ok(self.contacts.clone())
    }

    async fn increment_views(&self, peer: &PeerHandle, story_ids: &[i32]) -> Result<()> {
        self.record(Call::IncrementViews {
            peer: peer.peer,
            ids: story_ids.to_vec(),
        });
        Ok(())
    }

    async fn mark_read(&self, peer: &PeerHandle, max_id: i32) -> Result<()> {
        self.record(Call::MarkRead {
            peer: peer.peer,
            max_id,
        });
        Ok(())
    }

    async fn send_reaction(
        &self,
        peer: &PeerHandle,
        story_id: i32,
        reaction: &Reaction,
    ) -> Result<()> {
        self.record(Call::SendReaction {
            peer: peer.peer,
            story_id,
            reaction: reaction.clone(),
        });
        Ok(())
    }
}

/// Policy from raw selector tokens, without a full config round trip.
pub fn policy_from(included: &[&str], excluded: &[&str], reaction_excluded: &[&str]) -> Policy {
    let parse = |raw: &[&str]| {
        let raw: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        SelectorSet::parse(&raw)
    };
    Policy {
        included: parse(included),
        excluded: parse(excluded),
        reaction_excluded: parse(reaction_excluded),
    }
}

/// A config with credentials stubbed and every optional behavior off.
pub fn test_config() -> Config {
    Config {
        api_id: 1,
        api_hash: "hash".to_string(),
        session_file: PathBuf::from("/tmp/tsw-test.session"),
        watch_stories: true,
        read_stories: false,
        react_stories: false,
        reaction_emoji: "\u{2764}\u{fe0f}".to_string(),
        contacts_refresh: Duration::ZERO,
        included: Vec::new(),
        excluded: Vec::new(),
        reaction_excluded: Vec::new(),
    }
}
