//! Error types for the reconciler, the runtime, and renderer adapters.

use thiserror::Error;

/// Errors raised by a [`Renderer`](crate::renderer::Renderer) adapter.
///
/// Adapters report targets they do not know about and patches their targets
/// cannot service. The core never swallows these: they surface from
/// [`Runtime::start`](crate::runtime::Runtime::start), from dispatching, or
/// from flushing a deferred render.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The target handle does not refer to a live resource.
    #[error("unknown target: {0}")]
    UnknownTarget(String),

    /// The target exists but cannot service this kind of patch
    /// (for example a text patch sent to an element).
    #[error("target {target} cannot apply {patch} patch")]
    Unsupported {
        target: String,
        patch: &'static str,
    },
}

/// Errors raised by the reconciler and the dispatch loop.
#[derive(Debug, Error)]
pub enum Error {
    /// The renderer rejected a target creation or a patch.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The runtime state was already borrowed by an update, a render, or a
    /// `with_*` reader. Messages sent at that point stay queued.
    #[error("runtime is busy; state is already borrowed")]
    Busy,

    /// A render task or dispatch handle outlived its runtime.
    #[error("runtime has been dropped")]
    Detached,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_converts() {
        let err: Error = RenderError::UnknownTarget("#7".into()).into();
        assert!(matches!(err, Error::Render(RenderError::UnknownTarget(_))));
        assert_eq!(err.to_string(), "unknown target: #7");
    }

    #[test]
    fn test_unsupported_message() {
        let err = RenderError::Unsupported {
            target: "#3".into(),
            patch: "text",
        };
        assert_eq!(err.to_string(), "target #3 cannot apply text patch");
    }

    #[test]
    fn test_busy_message() {
        assert_eq!(Error::Busy.to_string(), "runtime is busy; state is already borrowed");
    }
}
