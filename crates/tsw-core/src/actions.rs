use std::collections::BTreeSet;

use tracing::info;

use crate::{
    domain::{PeerHandle, Reaction},
    errors::Error,
    ports::StorySession,
    Result,
};

/// Turn the configured reaction value into its wire form: a trimmed
/// all-digits value is a custom-emoji document id, anything else a literal
/// emoji sequence.
pub fn build_reaction(value: &str) -> Reaction {
    let value = value.trim();
    if is_all_digits(value) {
        if let Ok(document_id) = value.parse::<i64>() {
            return Reaction::CustomEmoji(document_id);
        }
    }
    Reaction::Emoji(value.to_string())
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Reject unusable reaction configuration at startup, before any network
/// activity; a bad value would otherwise silently no-op on every story.
///
/// With reactions disabled, any value passes.
pub fn validate_reaction_config(enabled: bool, value: &str) -> Result<()> {
    if !enabled {
        return Ok(());
    }

    let value = value.trim();
    if value.is_empty() || value == "0" {
        return Err(Error::Config(
            "REACTION_EMOJI must be a custom emoji id or an emoji when REACT_STORIES_ENABLED=true"
                .to_string(),
        ));
    }

    if is_all_digits(value) {
        match value.parse::<i64>() {
            Ok(id) if id > 0 => {}
            _ => {
                return Err(Error::Config(
                    "REACTION_EMOJI must be a positive custom emoji id when numeric".to_string(),
                ));
            }
        }
    }

    Ok(())
}

fn unique_sorted(ids: &[i32]) -> Vec<i32> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Watch every story in `story_ids`: one view-counter call covering the
/// whole batch, optionally followed by one mark-read call.
///
/// Duplicate ids collapse within a single call; separate calls stay fully
/// independent. Returns the number of distinct stories watched.
pub async fn watch_stories(
    session: &dyn StorySession,
    peer: &PeerHandle,
    story_ids: &[i32],
    mark_read: bool,
) -> Result<usize> {
    let ids = unique_sorted(story_ids);
    if ids.is_empty() {
        return Ok(0);
    }

    session.increment_views(peer, &ids).await?;

    if mark_read {
        // Reading up to an id reads everything at or below it, so only the
        // maximum goes out.
        if let Some(&max_id) = ids.last() {
            session.mark_read(peer, max_id).await?;
        }
    }

    info!(
        "watched {} stories for {} (read={mark_read})",
        ids.len(),
        peer.peer,
    );
    Ok(ids.len())
}

/// React to every story in `story_ids`, one call per story in ascending id
/// order; the platform has no batch reaction. Returns the count reacted.
pub async fn react_to_stories(
    session: &dyn StorySession,
    peer: &PeerHandle,
    story_ids: &[i32],
    reaction: &Reaction,
) -> Result<usize> {
    let ids = unique_sorted(story_ids);
    if ids.is_empty() {
        return Ok(0);
    }

    for &story_id in &ids {
        session.send_reaction(peer, story_id, reaction).await?;
    }

    info!("reacted to {} stories for {}", ids.len(), peer.peer);
    Ok(ids.len())
}
