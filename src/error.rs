//! Error type shared by the validator, analyzers, and converters.

/// All failures surfaced by this crate, tagged by kind.
///
/// Every variant message embeds the offending type name (and field name or id
/// where applicable). Checks are fail-fast: the first violation aborts the
/// call that detected it.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Malformed document shape: wrong arity, wrong JSON types.
    #[error("structural: {0}")]
    Structural(String),
    /// A type or field definition violates a schema invariant.
    #[error("semantic: {0}")]
    Semantic(String),
    /// The meta-schema round-trip disagrees with the hand-written checks.
    /// This is an internal-consistency fault, not a user-schema fault.
    #[error("meta-schema inconsistency: {0}")]
    MetaSchema(String),
    /// A JIDL line matches no recognized pattern.
    #[error("grammar: {0}")]
    Grammar(String),
    /// Unsupported file extension at the load dispatch boundary.
    #[error("unsupported schema format: {0}")]
    Lookup(String),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
