//! Logging facilities for Casement backends.
//!
//! Casement uses the `tracing` crate for instrumentation. The library never
//! installs a subscriber; applications (and tests) do that themselves:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("casement::lifecycle=debug,casement::os=warn")
//!     .init();
//! ```
//!
//! Level conventions:
//!
//! - `error!` for fatal conditions (window class registration)
//! - `warn!` for OS calls that were expected to succeed but failed, and for
//!   consistency-check mismatches
//! - `debug!` for window lifecycle transitions
//! - `trace!` for high-frequency paths (DC leases, notifications)

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Window creation, adoption, destruction and reparenting.
    pub const LIFECYCLE: &str = "casement::lifecycle";
    /// Visibility and window-state transitions.
    pub const STATE: &str = "casement::state";
    /// Window class registration.
    pub const CLASS: &str = "casement::class";
    /// Device-context leases.
    pub const DC: &str = "casement::dc";
    /// Modal window stack.
    pub const MODAL: &str = "casement::modal";
    /// Failed OS calls.
    pub const OS: &str = "casement::os";
    /// Decoration and style policy.
    pub const STYLE: &str = "casement::style";
}

/// Span names used by the backends.
pub mod span_names {
    /// Native window creation.
    pub const CREATE: &str = "casement::create";
    /// Native window destruction.
    pub const DESTROY: &str = "casement::destroy";
    /// Draining queued OS notifications.
    pub const NOTIFICATIONS: &str = "casement::notifications";
}
