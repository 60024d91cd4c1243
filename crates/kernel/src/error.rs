use nexus_common::WorldId;

/// A malformed world definition or catalog. Raised when a catalog is loaded
/// or a session is constructed, never mid-tick.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read world catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse world catalog: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("world {0} is missing from the catalog")]
    MissingWorld(WorldId),
    #[error("world {0} is defined more than once")]
    DuplicateWorld(WorldId),
    #[error("world {world}: course has no checkpoints")]
    EmptyCourse { world: WorldId },
    #[error("world {world}: {name} has non-positive radius {radius}")]
    InvalidRadius {
        world: WorldId,
        name: String,
        radius: f32,
    },
    #[error("world {world}: enemy {name} has invalid pursuit speed {speed}")]
    InvalidSpeed {
        world: WorldId,
        name: String,
        speed: f32,
    },
    #[error("world {world}: enemies and runes need an artifact spawn point")]
    MissingArtifact { world: WorldId },
    #[error("world {world}: rune {name} is defined more than once")]
    DuplicateRune { world: WorldId, name: String },
    #[error("world {world}: expected exactly one return portal to nexus, found {found}")]
    ReturnPortal { world: WorldId, found: usize },
    #[error("world {world}: portal {label} leads to {target}, which is not allowed from here")]
    IllegalPortal {
        world: WorldId,
        label: String,
        target: WorldId,
    },
    #[error("world {world}: invalid hand-off url: {source}")]
    HandoffUrl {
        world: WorldId,
        #[source]
        source: url::ParseError,
    },
}

/// A rejected world switch.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    /// Worlds connect only through nexus, and a portal only works while its
    /// own world is active. Ignored by the game loop.
    #[error("cannot go from {from} to {to}: worlds connect only through nexus")]
    InvalidTransition { from: WorldId, to: WorldId },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A trigger evaluation that was correctly refused. These are local, silent
/// corrections: callers log them at trace level and carry on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("{name} was already activated")]
    DuplicateActivation { name: String },
    #[error("checkpoint {visited} reached while checkpoint {expected} is expected")]
    OutOfSequenceCheckpoint { expected: usize, visited: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_world() {
        let e = ConfigError::EmptyCourse {
            world: WorldId::Racing,
        };
        assert_eq!(e.to_string(), "world racing: course has no checkpoints");

        let t = TransitionError::InvalidTransition {
            from: WorldId::Combat,
            to: WorldId::Magic,
        };
        assert!(t.to_string().contains("combat"));
        assert!(t.to_string().contains("magic"));
    }

    #[test]
    fn config_errors_convert_into_transition_errors() {
        let t: TransitionError = ConfigError::MissingWorld(WorldId::Magic).into();
        assert!(matches!(t, TransitionError::Config(_)));
    }
}
