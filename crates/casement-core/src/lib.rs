//! Platform-neutral window model for Casement.
//!
//! This crate holds everything a native window backend and the widget layer
//! above it need to agree on, without any OS types leaking through:
//!
//! - **Geometry**: [`Rect`] and [`Point`] in integer device coordinates
//! - **Window kinds**: [`WindowType`] (toplevel/child/temp/foreign/root) and the
//!   window-manager [`TypeHint`]
//! - **State**: the [`WindowState`] bitmask (withdrawn, iconified, maximized, ...)
//! - **Policy inputs**: [`Decorations`], [`Functions`], [`GeometryHints`] with
//!   [`HintFlags`] and [`Gravity`]
//! - **Configuration**: [`WindowAttributes`], the creation request builder
//! - **Backend contract**: the [`NativeWindowBackend`] capability trait and the
//!   [`BackendEvent`]s a backend reports back to the widget layer
//!
//! # Example
//!
//! ```
//! use casement_core::{TypeHint, WindowAttributes, WindowType};
//!
//! let attributes = WindowAttributes::new(WindowType::Toplevel)
//!     .with_title("Example")
//!     .with_size(640, 480)
//!     .with_type_hint(TypeHint::Dialog);
//!
//! assert_eq!(attributes.title(), Some("Example"));
//! assert_eq!(attributes.size(), (640, 480));
//! ```

#[doc(hidden)]
#[macro_use]
pub mod flags;

mod attributes;
mod backend;
mod decorations;
mod error;
mod event;
mod geometry;
mod hints;
pub mod logging;
mod state;
mod window_type;

pub use attributes::{RawCursor, WindowAttributes};
pub use backend::{NativeWindowBackend, WindowId};
pub use decorations::{Decorations, Functions};
pub use error::{BackendError, Result};
pub use event::{BackendEvent, EventMask};
pub use geometry::{Point, Rect};
pub use hints::{GeometryHints, Gravity, HintFlags};
pub use state::WindowState;
pub use window_type::{TypeHint, WindowType};
