use thiserror::Error;

use crate::handle::Handle;

/// Errors returned by the fallible node operations.
///
/// Link mutation and traversal never fail; unknown handles there are no-ops.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("unknown node handle {0}")]
    UnknownHandle(Handle),

    #[error("node {0} reaches itself through its attributes")]
    AttributeCycle(Handle),

    #[error("broken link between {from} and {to}: {reason}")]
    BrokenLink {
        from: Handle,
        to: Handle,
        reason: &'static str,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rendered json is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, NodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_handles() {
        let err = NodeError::BrokenLink {
            from: Handle(3),
            to: Handle(4),
            reason: "next.previous mismatch",
        };
        assert_eq!(
            err.to_string(),
            "broken link between #3 and #4: next.previous mismatch"
        );
        assert_eq!(NodeError::UnknownHandle(Handle(9)).to_string(), "unknown node handle #9");
    }
}
