/// Validation failures raised before any search work starts.
///
/// Running out of time or nodes, or draining the frontier, are not errors;
/// they are reported through [`crate::SearchOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleError {
    /// Board dimension outside the supported range.
    #[error("board size must be between {min} and {max}, got {size}")]
    InvalidSize { size: usize, min: usize, max: usize },
    /// A state described a different number of tiles than the board holds.
    #[error("expected {expected} tiles for a {size}x{size} board, got {found}")]
    TileCount {
        size: usize,
        expected: usize,
        found: usize,
    },
    /// No tile with value 0.
    #[error("state has no blank tile")]
    MissingBlank,
    /// A tile value that cannot appear on this board, or appears twice.
    #[error("tile {0} is out of range or duplicated")]
    InvalidTile(u32),
    /// A coordinate outside the board, or shared by two tiles.
    #[error("cell ({row}, {col}) is out of range or occupied twice")]
    InvalidCell { row: usize, col: usize },
    /// A state built for another board size was handed to this model.
    #[error("state is {found}x{found} but the puzzle is {expected}x{expected}")]
    SizeMismatch { expected: usize, found: usize },
    /// Path reconstruction was asked for a key never recorded.
    #[error("state key is not present in the parent map")]
    MissingKey,
    /// A configuration value that cannot drive a search.
    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),
}

/// Failures while loading a [`crate::SearchConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] PuzzleError),
}
