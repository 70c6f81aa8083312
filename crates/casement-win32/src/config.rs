//! Backend configuration.

use std::path::Path;

/// Environment variable naming the application, used for default titles.
pub const APPLICATION_NAME_VAR: &str = "CASEMENT_APPLICATION_NAME";

/// Title used when a window would otherwise have none.
pub const PLACEHOLDER_TITLE: &str = "casement";

/// Process-level settings for a [`Win32Backend`](crate::Win32Backend).
///
/// # Example
///
/// ```
/// use casement_win32::BackendConfig;
///
/// let config = BackendConfig::new()
///     .with_application_name("Editor")
///     .with_program_name("editor");
///
/// assert_eq!(config.default_title(), "Editor");
/// ```
#[derive(Debug, Clone, Default)]
pub struct BackendConfig {
    /// Human-readable application name.
    application_name: Option<String>,
    /// Executable name.
    program_name: Option<String>,
}

impl BackendConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the configuration from the process environment.
    ///
    /// The application name comes from [`APPLICATION_NAME_VAR`], the program
    /// name from the executable's file stem.
    pub fn from_env() -> Self {
        let application_name = std::env::var(APPLICATION_NAME_VAR)
            .ok()
            .filter(|name| !name.is_empty());
        let program_name = std::env::args_os().next().and_then(|arg0| {
            Path::new(&arg0)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        });

        Self {
            application_name,
            program_name,
        }
    }

    /// Set the application name.
    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    /// Set the program name.
    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = Some(name.into());
        self
    }

    /// Get the application name.
    pub fn application_name(&self) -> Option<&str> {
        self.application_name.as_deref()
    }

    /// Get the program name.
    pub fn program_name(&self) -> Option<&str> {
        self.program_name.as_deref()
    }

    /// The title for windows created without one.
    pub fn default_title(&self) -> &str {
        self.application_name
            .as_deref()
            .or(self.program_name.as_deref())
            .unwrap_or(PLACEHOLDER_TITLE)
    }

    /// `title`, or the default title if it is missing, or the placeholder if
    /// the result is empty.
    pub fn resolve_title<'a>(&'a self, title: Option<&'a str>) -> &'a str {
        match title.unwrap_or_else(|| self.default_title()) {
            "" => PLACEHOLDER_TITLE,
            title => title,
        }
    }
}
