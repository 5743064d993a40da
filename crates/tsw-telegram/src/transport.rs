//! `StorySession` port implementation over raw MTProto story functions.

use std::collections::HashMap;

use async_trait::async_trait;
use grammers_client::Client;
use grammers_tl_types as tl;
use tokio::sync::Mutex;

use tsw_core::{
    domain::{Peer, PeerHandle, Reaction},
    errors::Error,
    ports::{ContactsSnapshot, FeedEntry, StorySession},
    Result,
};

use crate::transport_err;

/// Access hashes learned from the users/chats attached to feed and contact
/// responses.
///
/// Raw updates carry bare peers, while story requests need the hash the
/// account saw when the peer was first attached to a response; basic chats
/// have no hash at all. A peer that never appeared in any response cannot
/// be resolved.
#[derive(Default)]
struct PeerHashCache {
    users: HashMap<i64, i64>,
    channels: HashMap<i64, i64>,
}

impl PeerHashCache {
    fn harvest_users(&mut self, users: &[tl::enums::User]) {
        for user in users {
            if let tl::enums::User::User(u) = user {
                if let Some(hash) = u.access_hash {
                    self.users.insert(u.id, hash);
                }
            }
        }
    }

    fn harvest_chats(&mut self, chats: &[tl::enums::Chat]) {
        for chat in chats {
            if let tl::enums::Chat::Channel(c) = chat {
                if let Some(hash) = c.access_hash {
                    self.channels.insert(c.id, hash);
                }
            }
        }
    }
}

pub struct TelegramSession {
    client: Client,
    cache: Mutex<PeerHashCache>,
}

impl TelegramSession {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            cache: Mutex::new(PeerHashCache::default()),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn input_peer(&self, handle: &PeerHandle) -> Result<tl::enums::InputPeer> {
        match handle.peer {
            Peer::User(user_id) => {
                let access_hash = handle.access_hash.ok_or(Error::UnresolvedPeer {
                    kind: "user",
                    id: user_id,
                })?;
                Ok(tl::types::InputPeerUser {
                    user_id,
                    access_hash,
                }
                .into())
            }
            Peer::Channel(channel_id) => {
                let access_hash = handle.access_hash.ok_or(Error::UnresolvedPeer {
                    kind: "channel",
                    id: channel_id,
                })?;
                Ok(tl::types::InputPeerChannel {
                    channel_id,
                    access_hash,
                }
                .into())
            }
            Peer::Chat(chat_id) => Ok(tl::types::InputPeerChat { chat_id }.into()),
        }
    }
}

pub(crate) fn map_peer(peer: &tl::enums::Peer) -> Peer {
    match peer {
        tl::enums::Peer::User(p) => Peer::User(p.user_id),
        tl::enums::Peer::Chat(p) => Peer::Chat(p.chat_id),
        tl::enums::Peer::Channel(p) => Peer::Channel(p.channel_id),
    }
}

/// Every story item variant (live, deleted, skipped) still carries its id.
pub(crate) fn story_id(item: &tl::enums::StoryItem) -> i32 {
    match item {
        tl::enums::StoryItem::Item(it) => it.id,
        tl::enums::StoryItem::Deleted(it) => it.id,
        tl::enums::StoryItem::Skipped(it) => it.id,
    }
}

#[async_trait]
impl StorySession for TelegramSession {
    async fn resolve_peer(&self, peer: Peer) -> Result<PeerHandle> {
        let cache = self.cache.lock().await;
        let access_hash = match peer {
            Peer::User(id) => Some(
                cache
                    .users
                    .get(&id)
                    .copied()
                    .ok_or(Error::UnresolvedPeer { kind: "user", id })?,
            ),
            Peer::Channel(id) => Some(
                cache
                    .channels
                    .get(&id)
                    .copied()
                    .ok_or(Error::UnresolvedPeer { kind: "channel", id })?,
            ),
            Peer::Chat(_) => None,
        };

        Ok(PeerHandle { peer, access_hash })
    }

    async fn active_stories(&self) -> Result<Vec<FeedEntry>> {
        let response = self
            .client
            .invoke(&tl::functions::stories::GetAllStories {
                next: false,
                hidden: false,
                state: None,
            })
            .await
            .map_err(transport_err)?;

        let data = match response {
            tl::enums::stories::AllStories::Stories(data) => data,
            _ => return Ok(Vec::new()),
        };

        {
            let mut cache = self.cache.lock().await;
            cache.harvest_users(&data.users);
            cache.harvest_chats(&data.chats);
        }

        let mut feed = Vec::with_capacity(data.peer_stories.len());
        for entry in data.peer_stories {
            let tl::enums::PeerStories::Stories(ps) = entry;
            feed.push(FeedEntry {
                peer: map_peer(&ps.peer),
                story_ids: ps.stories.iter().map(story_id).collect(),
            });
        }

        Ok(feed)
    }

    async fn contacts(&self) -> Result<ContactsSnapshot> {
        let response = self
            .client
            .invoke(&tl::functions::contacts::GetContacts { hash: 0 })
            .await
            .map_err(transport_err)?;

        let data = match response {
            tl::enums::contacts::Contacts::Contacts(data) => data,
            _ => return Ok(ContactsSnapshot::default()),
        };

        {
            let mut cache = self.cache.lock().await;
            cache.harvest_users(&data.users);
        }

        let mut snapshot = ContactsSnapshot::default();
        for contact in &data.contacts {
            let tl::enums::Contact::Contact(c) = contact;
            snapshot.contact_ids.push(c.user_id);
        }
        for user in &data.users {
            if let tl::enums::User::User(u) = user {
                snapshot.attached_user_ids.push(u.id);
            }
        }

        Ok(snapshot)
    }

    async fn increment_views(&self, peer: &PeerHandle, story_ids: &[i32]) -> Result<()> {
        let peer = self.input_peer(peer)?;
        self.client
            .invoke(&tl::functions::stories::IncrementStoryViews {
                peer,
                id: story_ids.to_vec(),
            })
            .await
            .map_err(transport_err)?;
        Ok(())
    }

    async fn mark_read(&self, peer: &PeerHandle, max_id: i32) -> Result<()> {
        let peer = self.input_peer(peer)?;
        self.client
            .invoke(&tl::functions::stories::ReadStories { peer, max_id })
            .await
            .map_err(transport_err)?;
        Ok(())
    }

    async fn send_reaction(
        &self,
        peer: &PeerHandle,
        story_id: i32,
        reaction: &Reaction,
    ) -> Result<()> {
        let peer = self.input_peer(peer)?;
        let reaction = match reaction {
            Reaction::Emoji(emoticon) => tl::types::ReactionEmoji {
                emoticon: emoticon.clone(),
            }
            .into(),
            Reaction::CustomEmoji(document_id) => tl::types::ReactionCustomEmoji {
                document_id: *document_id,
            }
            .into(),
        };

        self.client
            .invoke(&tl::functions::stories::SendReaction {
                add_to_recent: false,
                peer,
                story_id,
                reaction,
            })
            .await
            .map_err(transport_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_peer_keeps_kind_and_id() {
        let peer: tl::enums::Peer = tl::types::PeerUser { user_id: 7 }.into();
        assert_eq!(map_peer(&peer), Peer::User(7));

        let peer: tl::enums::Peer = tl::types::PeerChannel { channel_id: 9 }.into();
        assert_eq!(map_peer(&peer), Peer::Channel(9));

        let peer: tl::enums::Peer = tl::types::PeerChat { chat_id: 3 }.into();
        assert_eq!(map_peer(&peer), Peer::Chat(3));
    }

    #[test]
    fn deleted_and_skipped_story_items_still_have_ids() {
        let item: tl::enums::StoryItem = tl::types::StoryItemDeleted { id: 5 }.into();
        assert_eq!(story_id(&item), 5);
    }
}
