//! Domain error types.

/// Top-level error type for propplan.
///
/// The metrics deriver never produces one of these; the projection engine
/// degrades per-figure instead of failing; everything else reports through
/// this enum.
#[derive(Debug, thiserror::Error)]
pub enum PropplanError {
    #[error("invalid {field}: {reason}")]
    Input { field: String, reason: String },

    #[error("{figure} is undefined (division by zero)")]
    DivisionUndefined { figure: String },

    #[error("not authorized: {reason}")]
    Authorization { reason: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PropplanError {
    pub fn input(field: &str, reason: &str) -> Self {
        PropplanError::Input {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn not_found(kind: &str, id: &str) -> Self {
        PropplanError::NotFound {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<&PropplanError> for std::process::ExitCode {
    fn from(err: &PropplanError) -> Self {
        let code: u8 = match err {
            PropplanError::Io(_) => 1,
            PropplanError::ConfigParse { .. }
            | PropplanError::ConfigMissing { .. }
            | PropplanError::ConfigInvalid { .. } => 2,
            PropplanError::Database { .. } | PropplanError::DatabaseQuery { .. } => 3,
            PropplanError::Input { .. } => 4,
            PropplanError::Authorization { .. } => 5,
            PropplanError::NotFound { .. } => 6,
            PropplanError::DivisionUndefined { .. } => 7,
        };
        std::process::ExitCode::from(code)
    }
}
