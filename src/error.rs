//! Errors raised while constructing protocol steps.

pub type Result<T> = std::result::Result<T, StepError>;

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("step on line {line}: {kind} has no {role} party")]
    MissingParty {
        line: usize,
        kind: &'static str,
        role: &'static str,
    },

    #[error("step on line {line}: reply_to `{target}` does not name an earlier request")]
    UnresolvedReply { line: usize, target: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
