use crate::debug::normalize::NormalizedResponse;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum AppEvent {
    DebugCompleted {
        session: Uuid,
        normalized: NormalizedResponse,
    },
    DebugFailed {
        session: Uuid,
        message: String,
    },
    /// Non-fatal startup problem worth surfacing in diagnostics.
    Warning(String),
}
