use serde::{Deserialize, Serialize};

/// State of a derived view.
///
/// `Loading` means no snapshot has arrived yet and is distinct from a
/// ready view whose sums happen to be zero. A load error is reported as
/// `Failed` instead of falling back to zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum LiveState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for LiveState<T> {
    fn default() -> Self {
        LiveState::Loading
    }
}

impl<T> LiveState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LiveState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LiveState::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LiveState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LiveState::Failed(message) => Some(message),
            _ => None,
        }
    }
}
