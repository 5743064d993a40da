//! Raw update stream → `PlatformUpdate` mapping.

use grammers_client::Update;
use grammers_tl_types as tl;

use tsw_core::{domain::StoryRef, ports::PlatformUpdate};

use crate::transport::{map_peer, story_id};

/// Reduce a raw client update to what intake consumes.
///
/// Only story updates survive; every other update kind (messages, edits,
/// service notifications) maps to `Other` and is dropped by the caller.
pub fn map_update(update: &Update) -> PlatformUpdate {
    match update {
        Update::Raw(tl::enums::Update::Story(u)) => PlatformUpdate::Story(StoryRef {
            peer: map_peer(&u.peer),
            story_id: story_id(&u.story),
        }),
        _ => PlatformUpdate::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsw_core::domain::Peer;

    #[test]
    fn story_updates_are_extracted() {
        let raw: tl::enums::Update = tl::types::UpdateStory {
            peer: tl::types::PeerUser { user_id: 7 }.into(),
            story: tl::types::StoryItemDeleted { id: 4 }.into(),
        }
        .into();

        let mapped = map_update(&Update::Raw(raw));
        assert_eq!(
            mapped,
            PlatformUpdate::Story(StoryRef {
                peer: Peer::User(7),
                story_id: 4,
            })
        );
    }
}
