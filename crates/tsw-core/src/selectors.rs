use std::collections::HashSet;

use tracing::warn;

/// Group tokens accepted in selector lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PeerGroup {
    User,
    Contact,
    Channel,
    Chat,
    All,
}

impl PeerGroup {
    /// Parse an already-normalized (trimmed, lowercased, de-pluralized)
    /// token.
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "user" => Some(Self::User),
            "contact" => Some(Self::Contact),
            "channel" => Some(Self::Channel),
            "chat" => Some(Self::Chat),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Contact => "contact",
            Self::Channel => "channel",
            Self::Chat => "chat",
            Self::All => "all",
        }
    }
}

/// A parsed selector list: explicit peer ids plus whole peer groups.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectorSet {
    pub ids: HashSet<i64>,
    pub groups: HashSet<PeerGroup>,
}

impl SelectorSet {
    /// Parse raw configuration tokens into id and group sets.
    ///
    /// Numeric tokens are peer ids. Everything else must normalize into the
    /// group vocabulary (case-insensitive, one trailing "s" stripped) or the
    /// token is dropped with a warning. Never fatal: bad selectors must not
    /// abort startup.
    pub fn parse(raw: &[String]) -> Self {
        let mut set = Self::default();

        for value in raw {
            let token = value.trim();
            if token.is_empty() {
                continue;
            }

            if let Ok(id) = token.parse::<i64>() {
                set.ids.insert(id);
                continue;
            }

            let mut name = token.to_lowercase();
            if name.ends_with('s') {
                name.pop();
            }

            match PeerGroup::from_token(&name) {
                Some(group) => {
                    set.groups.insert(group);
                }
                None => warn!("ignoring unknown selector {value:?}"),
            }
        }

        set
    }

    /// Group names, sorted, for summary logging.
    pub fn sorted_group_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.groups.iter().map(PeerGroup::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &[&str]) -> SelectorSet {
        let raw: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        SelectorSet::parse(&raw)
    }

    #[test]
    fn numeric_tokens_become_ids() {
        let set = parse(&["123", "-1001234567890", "123"]);
        assert_eq!(set.ids, HashSet::from([123, -1001234567890]));
        assert!(set.groups.is_empty());
    }

    #[test]
    fn plural_forms_normalize_to_singular() {
        assert_eq!(parse(&["channels"]), parse(&["channel"]));
        assert_eq!(parse(&["contacts"]), parse(&["contact"]));
        assert_eq!(parse(&["users"]), parse(&["user"]));
        assert_eq!(parse(&["chats"]), parse(&["chat"]));
    }

    #[test]
    fn parsing_is_case_insensitive_and_trims() {
        let set = parse(&["  Contacts ", "CHANNEL"]);
        assert_eq!(
            set.groups,
            HashSet::from([PeerGroup::Contact, PeerGroup::Channel])
        );
    }

    #[test]
    fn unknown_tokens_are_dropped_not_fatal() {
        let set = parse(&["friends", "everyone", "user"]);
        assert_eq!(set.groups, HashSet::from([PeerGroup::User]));
        assert!(set.ids.is_empty());
    }

    #[test]
    fn empty_tokens_are_skipped() {
        let set = parse(&["", "   "]);
        assert!(set.ids.is_empty());
        assert!(set.groups.is_empty());
    }

    #[test]
    fn duplicate_groups_collapse() {
        let set = parse(&["user", "users", "USER"]);
        assert_eq!(set.groups.len(), 1);
    }

    #[test]
    fn all_group_is_recognized() {
        let set = parse(&["all"]);
        assert_eq!(set.groups, HashSet::from([PeerGroup::All]));
    }

    #[test]
    fn sorted_group_names_are_stable() {
        let set = parse(&["users", "contacts", "channels"]);
        assert_eq!(set.sorted_group_names(), vec!["channel", "contact", "user"]);
    }
}
