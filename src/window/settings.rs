//! Window settings
//!
//! Configuration for window creation.

use super::event::KeyBindings;

/// Settings for creating a window.
#[derive(Debug, Clone)]
pub struct WindowSettings {
    /// Window title.
    pub title: String,
    /// Initial window size (width, height) in logical pixels.
    pub size: (u32, u32),
    /// Whether the window is resizable.
    pub resizable: bool,
    /// Whether to enable vsync.
    pub vsync: bool,
    /// Key to control mapping.
    pub bindings: KeyBindings,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "texcube".to_string(),
            size: (1280, 720),
            resizable: true,
            vsync: true,
            bindings: KeyBindings::default(),
        }
    }
}

impl WindowSettings {
    /// Create new window settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the initial window size.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Set whether the window is resizable.
    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Set whether to enable vsync.
    pub fn vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Replace the key bindings.
    pub fn bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = WindowSettings::default();
        assert_eq!(settings.title, "texcube");
        assert_eq!(settings.size, (1280, 720));
        assert!(settings.vsync);
        assert_eq!(settings.bindings, KeyBindings::default());
    }
}
