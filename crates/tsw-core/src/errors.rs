/// Core error type for the story watcher.
///
/// The adapter crate maps its library errors into this type so the
/// application core can handle failures consistently (fatal config vs
/// propagated transport).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("no cached access hash for {kind} {id}")]
    UnresolvedPeer { kind: &'static str, id: i64 },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
