//! Window class registration.
//!
//! One native window class exists per category. Classes are registered the
//! first time a window of that category is created and live until the
//! process exits.

use std::collections::HashMap;

use casement_core::logging::targets;
use casement_core::{BackendError, Result, TypeHint, WindowType};

use crate::api::{ClassAtom, ClassSpec, ClassStyle, IconHandle, Win32Api, log_failure};

/// The kinds of window class the backend registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassCategory {
    Toplevel,
    Child,
    Temp,
    /// Temp windows acting as menus, with a drop shadow where available.
    TempShadow,
}

impl ClassCategory {
    /// The category for a window, or `None` for types that never get a class.
    pub fn for_window(window_type: WindowType, type_hint: TypeHint) -> Option<Self> {
        match window_type {
            WindowType::Toplevel => Some(ClassCategory::Toplevel),
            WindowType::Child => Some(ClassCategory::Child),
            WindowType::Temp if type_hint.is_menu() => Some(ClassCategory::TempShadow),
            WindowType::Temp => Some(ClassCategory::Temp),
            WindowType::Root | WindowType::Foreign => None,
        }
    }

    /// The registered class name.
    pub fn class_name(&self) -> &'static str {
        match self {
            ClassCategory::Toplevel => "casementWindowToplevel",
            ClassCategory::Child => "casementWindowChild",
            ClassCategory::Temp => "casementWindowTemp",
            ClassCategory::TempShadow => "casementWindowTempShadow",
        }
    }

    /// The class style. No class asks for `CS_HREDRAW`/`CS_VREDRAW`.
    pub fn class_style<A: Win32Api>(&self, api: &A) -> ClassStyle {
        match self {
            ClassCategory::Toplevel => ClassStyle::empty(),
            ClassCategory::Child => ClassStyle::PARENTDC,
            ClassCategory::Temp => ClassStyle::SAVEBITS,
            ClassCategory::TempShadow => {
                if api.supports_drop_shadow() {
                    ClassStyle::SAVEBITS | ClassStyle::DROPSHADOW
                } else {
                    ClassStyle::SAVEBITS
                }
            }
        }
    }
}

/// Lazily registered window classes and the shared application icons.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: HashMap<ClassCategory, ClassAtom>,
    /// Application icon pair `(large, small)`, loaded on first success.
    app_icons: Option<(IconHandle, IconHandle)>,
}

impl ClassRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The class for a window, registering it on first use.
    ///
    /// Registration failure is fatal for the backend and is returned as
    /// [`BackendError::ClassRegistration`].
    pub fn get_class<A: Win32Api>(
        &mut self,
        api: &A,
        window_type: WindowType,
        type_hint: TypeHint,
    ) -> Result<ClassAtom> {
        let category = ClassCategory::for_window(window_type, type_hint).ok_or_else(|| {
            BackendError::CreationFailed(format!("{window_type} windows have no window class"))
        })?;

        if let Some(atom) = self.classes.get(&category) {
            return Ok(*atom);
        }

        let (icon, small_icon) = match self.app_icons(api) {
            Some((large, small)) => (
                log_failure(api.copy_icon(large), api.desktop_window()),
                log_failure(api.copy_icon(small), api.desktop_window()),
            ),
            None => (None, None),
        };
        let cursor = log_failure(api.load_arrow_cursor(), api.desktop_window());

        let spec = ClassSpec {
            name: category.class_name(),
            style: category.class_style(api),
            icon,
            small_icon,
            cursor,
        };

        match api.register_class(&spec) {
            Ok(atom) => {
                tracing::debug!(
                    target: targets::CLASS,
                    class = spec.name,
                    style = spec.style.bits(),
                    "registered window class"
                );
                self.classes.insert(category, atom);
                Ok(atom)
            }
            Err(err) => {
                tracing::error!(
                    target: targets::CLASS,
                    class = spec.name,
                    %err,
                    "window class registration failed"
                );
                Err(BackendError::ClassRegistration {
                    class: spec.name,
                    message: err.to_string(),
                })
            }
        }
    }

    /// Check if a category has been registered.
    pub fn is_registered(&self, category: ClassCategory) -> bool {
        self.classes.contains_key(&category)
    }

    /// The application icon pair, loading it if no earlier attempt succeeded.
    ///
    /// Icons come from the executable first and the stock application icon
    /// second. If only one size is found it is used for both.
    fn app_icons<A: Win32Api>(&mut self, api: &A) -> Option<(IconHandle, IconHandle)> {
        if self.app_icons.is_some() {
            return self.app_icons;
        }

        let mut icons = match api.module_file_name() {
            Ok(path) => api.extract_icons(&path),
            Err(err) => {
                tracing::warn!(target: targets::CLASS, %err, "cannot locate executable for icons");
                (None, None)
            }
        };
        if icons.0.is_none() && icons.1.is_none() {
            icons = api.load_application_icons();
        }

        self.app_icons = match icons {
            (Some(large), Some(small)) => Some((large, small)),
            (Some(icon), None) | (None, Some(icon)) => Some((icon, icon)),
            (None, None) => None,
        };
        self.app_icons
    }
}
