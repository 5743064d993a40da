use std::fmt;

/// A story-capable peer, identified by its numeric id within its own kind.
///
/// The platform's peer union is closed (user, channel, basic group chat),
/// so this enum is too; ids never migrate between kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Peer {
    User(i64),
    Channel(i64),
    Chat(i64),
}

impl Peer {
    pub fn id(&self) -> i64 {
        match *self {
            Peer::User(id) | Peer::Channel(id) | Peer::Chat(id) => id,
        }
    }

    /// Kind token, as it appears in group selectors.
    pub fn kind(&self) -> &'static str {
        match self {
            Peer::User(_) => "user",
            Peer::Channel(_) => "channel",
            Peer::Chat(_) => "chat",
        }
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

/// A peer resolved to the callable form story requests need.
///
/// Users and channels carry the access hash the account learned when it
/// first saw the peer; basic chats are addressable by id alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeerHandle {
    pub peer: Peer,
    pub access_hash: Option<i64>,
}

/// One story on one peer. Story ids are positive and unique per peer within
/// the platform's retention window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StoryRef {
    pub peer: Peer,
    pub story_id: i32,
}

/// The reaction sent to watched stories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reaction {
    /// Literal emoji character sequence.
    Emoji(String),
    /// Custom-emoji document id.
    CustomEmoji(i64),
}
