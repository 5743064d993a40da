use std::collections::HashSet;

use tracing::info;

use crate::{
    config::Config,
    domain::Peer,
    selectors::{PeerGroup, SelectorSet},
};

/// The watch/react policy, built once at startup and shared read-only.
///
/// Watch eligibility is an allow-list with a deny override: nothing is
/// watched unless explicitly included, and exclusion always wins. Reaction
/// eligibility is a pure deny-list: any peer not explicitly excluded is
/// reactable, because reacting is already opted into by the master flag
/// plus a validated emoji. The asymmetry is deliberate; keep the two
/// decisions separate.
#[derive(Clone, Debug, Default)]
pub struct Policy {
    pub included: SelectorSet,
    pub excluded: SelectorSet,
    pub reaction_excluded: SelectorSet,
}

impl Policy {
    /// Parse the three raw selector lists and log a one-line summary.
    pub fn from_config(cfg: &Config) -> Self {
        let policy = Self {
            included: SelectorSet::parse(&cfg.included),
            excluded: SelectorSet::parse(&cfg.excluded),
            reaction_excluded: SelectorSet::parse(&cfg.reaction_excluded),
        };

        info!(
            "policy loaded | included_ids={} included_groups={:?} | excluded_ids={} excluded_groups={:?} | react_excluded_ids={} react_excluded_groups={:?}",
            policy.included.ids.len(),
            policy.included.sorted_group_names(),
            policy.excluded.ids.len(),
            policy.excluded.sorted_group_names(),
            policy.reaction_excluded.ids.len(),
            policy.reaction_excluded.sorted_group_names(),
        );

        policy
    }

    /// True when any selector list references the contact group. Gates the
    /// contact-list fetch, which is a network round trip.
    pub fn needs_contacts(&self) -> bool {
        [&self.included, &self.excluded, &self.reaction_excluded]
            .into_iter()
            .any(|set| set.groups.contains(&PeerGroup::Contact))
    }

    /// Whether this peer's stories should be watched.
    pub fn should_watch(&self, peer: Peer, contacts: &HashSet<i64>) -> bool {
        if selector_matches(&self.excluded, peer, contacts) {
            return false;
        }
        selector_matches(&self.included, peer, contacts)
    }

    /// Whether a watched story on this peer should also get a reaction.
    pub fn should_react(&self, peer: Peer, contacts: &HashSet<i64>) -> bool {
        !selector_matches(&self.reaction_excluded, peer, contacts)
    }
}

/// One selector set against one peer: explicit id, `all`, the peer's own
/// kind token, or (users only) contact membership. The `contact` group
/// never matches channels or chats.
fn selector_matches(set: &SelectorSet, peer: Peer, contacts: &HashSet<i64>) -> bool {
    if set.ids.contains(&peer.id()) || set.groups.contains(&PeerGroup::All) {
        return true;
    }

    match peer {
        Peer::User(id) => {
            set.groups.contains(&PeerGroup::User)
                || (set.groups.contains(&PeerGroup::Contact) && contacts.contains(&id))
        }
        Peer::Channel(_) => set.groups.contains(&PeerGroup::Channel),
        Peer::Chat(_) => set.groups.contains(&PeerGroup::Chat),
    }
}
