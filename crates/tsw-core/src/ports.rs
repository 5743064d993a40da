use async_trait::async_trait;

use crate::{
    domain::{Peer, PeerHandle, Reaction, StoryRef},
    Result,
};

/// One entry of the active-story feed: a peer and the ids of its stories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedEntry {
    pub peer: Peer,
    pub story_ids: Vec<i32>,
}

/// The two shapes a contact-list response can take: dedicated contact
/// records, and/or the user objects attached to the same response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactsSnapshot {
    pub contact_ids: Vec<i64>,
    pub attached_user_ids: Vec<i64>,
}

/// A platform update, reduced to what intake consumes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlatformUpdate {
    /// A new or changed story on some peer.
    Story(StoryRef),
    /// Anything else; intake ignores it.
    Other,
}

/// Session port over the messaging platform.
///
/// Telegram/MTProto is the first implementation. The engine only ever talks
/// to this trait, so tests drive it with an in-memory double. Transport
/// failures surface as `Error::Transport` and are not retried here.
#[async_trait]
pub trait StorySession: Send + Sync {
    /// Resolve a peer into the callable form story requests need.
    async fn resolve_peer(&self, peer: Peer) -> Result<PeerHandle>;

    /// Fetch the full active-story feed. Single page; the platform's
    /// next-page flag stays unset.
    async fn active_stories(&self) -> Result<Vec<FeedEntry>>;

    /// Fetch the account's contact list.
    async fn contacts(&self) -> Result<ContactsSnapshot>;

    /// Increment the view counter of every listed story in one call.
    async fn increment_views(&self, peer: &PeerHandle, story_ids: &[i32]) -> Result<()>;

    /// Mark stories read up to and including `max_id`.
    async fn mark_read(&self, peer: &PeerHandle, max_id: i32) -> Result<()>;

    /// Send one reaction to one story.
    async fn send_reaction(
        &self,
        peer: &PeerHandle,
        story_id: i32,
        reaction: &Reaction,
    ) -> Result<()>;
}
