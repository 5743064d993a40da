use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, Result};

/// Typed configuration, read once at process start from the environment
/// (with an optional `.env` file that never overrides real variables).
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram API credentials
    pub api_id: i32,
    pub api_hash: String,
    pub session_file: PathBuf,

    // Behavior flags
    /// Master switch; nothing is fetched or watched when off.
    pub watch_stories: bool,
    /// Also mark watched stories as read.
    pub read_stories: bool,
    /// Also react to watched stories.
    pub react_stories: bool,
    /// Emoji character sequence, or an all-digits custom-emoji id.
    pub reaction_emoji: String,

    /// Wholesale contact refresh interval; zero disables the refresh task.
    pub contacts_refresh: Duration,

    // Raw selector lists; parsed into the policy at startup.
    pub included: Vec<String>,
    pub excluded: Vec<String>,
    pub reaction_excluded: Vec<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let api_id = env_str("TG_API_ID")
            .and_then(non_empty)
            .ok_or_else(|| Error::Config("TG_API_ID environment variable is required".to_string()))?
            .trim()
            .parse::<i32>()
            .map_err(|_| Error::Config("TG_API_ID must be a number".to_string()))?;

        let api_hash = env_str("TG_API_HASH").and_then(non_empty).ok_or_else(|| {
            Error::Config("TG_API_HASH environment variable is required".to_string())
        })?;

        let session_file = env_path("TG_SESSION").unwrap_or_else(|| PathBuf::from("tsw.session"));

        let watch_stories = env_bool("WATCH_STORIES_ENABLED").unwrap_or(true);
        let read_stories = env_bool("READ_STORIES_ENABLED").unwrap_or(false);
        let react_stories = env_bool("REACT_STORIES_ENABLED").unwrap_or(false);

        // REACTION_EMOJI_ID is the legacy spelling for custom-emoji ids.
        let reaction_emoji = env_str("REACTION_EMOJI")
            .or_else(|| env_str("REACTION_EMOJI_ID"))
            .and_then(non_empty)
            .unwrap_or_else(|| "\u{2764}\u{fe0f}".to_string());

        let contacts_refresh =
            Duration::from_secs(env_u64("CONTACTS_REFRESH_SECONDS").unwrap_or(3600));

        let included = parse_csv(env_str("INCLUDED_USERS").or_else(|| Some("contacts".to_string())));
        let excluded = parse_csv(env_str("EXCLUDED_USERS"));
        let reaction_excluded = parse_csv(env_str("REACTIONS_EXCLUDED"));

        Ok(Self {
            api_id,
            api_hash,
            session_file,
            watch_stories,
            read_stories,
            react_stories,
            reaction_emoji,
            contacts_refresh,
            included,
            excluded,
            reaction_excluded,
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}

fn env_bool(key: &str) -> Option<bool> {
    env_str(key).map(|s| matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Split a comma-separated selector list into raw tokens. Case and plural
/// normalization happen later, in the selector parser.
fn parse_csv(v: Option<String>) -> Vec<String> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}
