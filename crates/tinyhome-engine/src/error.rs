//! Error kinds raised by the engine.

/// Errors that can occur while loading layouts or driving navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The layout document is missing `rooms` or fails validation.
    MalformedLayout(String),
    /// A fetch result arrived after a newer fetch was issued.
    StaleResponse { ticket: u64, latest: u64 },
    /// A room name did not resolve in the current layout.
    RoomNotFound(String),
    /// An incoming scene node id collides with an existing one.
    DuplicateNodeId(String),
    /// An interior was requested for a room without a door.
    PrimaryDoorMissing(String),
    /// The engine configuration could not be parsed.
    Config(String),
}

impl EngineError {
    /// Internal-invariant violations point at a builder or naming bug
    /// rather than bad input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            EngineError::RoomNotFound(_) | EngineError::DuplicateNodeId(_)
        )
    }

    /// Whether the host should surface this error to the user.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            EngineError::MalformedLayout(_) | EngineError::PrimaryDoorMissing(_)
        )
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::MalformedLayout(reason) => write!(f, "Malformed layout: {}", reason),
            EngineError::StaleResponse { ticket, latest } => write!(
                f,
                "Stale layout response: ticket {} superseded by {}",
                ticket, latest
            ),
            EngineError::RoomNotFound(name) => write!(f, "Room '{}' not found in layout", name),
            EngineError::DuplicateNodeId(id) => write!(f, "Duplicate scene node id '{}'", id),
            EngineError::PrimaryDoorMissing(name) => {
                write!(f, "Room '{}' has no door to enter through", name)
            }
            EngineError::Config(reason) => write!(f, "Invalid engine config: {}", reason),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::MalformedLayout(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
