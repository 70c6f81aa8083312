//! Error types for native window backends.

use thiserror::Error;

/// Errors a native window backend reports to the widget layer.
///
/// Most backend operations are best-effort and never fail: OS failures are
/// logged and the call proceeds. Only the operations that hand out new
/// windows can fail, and of those only class registration is fatal.
#[derive(Error, Debug)]
pub enum BackendError {
    /// A native window class could not be registered.
    ///
    /// The backend cannot create any window of this category; callers treat
    /// this as unrecoverable.
    #[error("failed to register window class '{class}': {message}")]
    ClassRegistration {
        /// The class name that failed to register.
        class: &'static str,
        /// The OS failure description.
        message: String,
    },

    /// The OS refused to create the native window.
    #[error("failed to create native window: {0}")]
    CreationFailed(String),

    /// The window id is invalid or the window has already been released.
    #[error("invalid or released window id")]
    InvalidWindow,

    /// The window has been destroyed.
    #[error("window has been destroyed")]
    WindowDestroyed,

    /// The requested parent cannot hold this window.
    #[error("invalid parent window: {0}")]
    InvalidParent(&'static str),
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::ClassRegistration {
            class: "casementToplevel",
            message: "access denied".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("casementToplevel"));
        assert!(text.contains("access denied"));

        let err = BackendError::CreationFailed("CreateWindowExW failed".to_string());
        assert!(err.to_string().contains("CreateWindowExW"));

        assert!(BackendError::WindowDestroyed.to_string().contains("destroyed"));
        assert!(BackendError::InvalidParent("root").to_string().contains("root"));
    }
}
