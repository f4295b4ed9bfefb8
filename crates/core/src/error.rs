#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The ledger or an inbound request named an action type outside the
    /// closed [`ActionKind`](crate::actions::ActionKind) enumeration.
    #[error("Unknown action kind: {0}")]
    UnknownActionKind(String),

    /// An action record is structurally unusable (missing action type,
    /// missing achievement payload, ...).
    #[error("Malformed action record: {0}")]
    MalformedAction(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
