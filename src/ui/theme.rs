//! Visual theme and styling.

use console::Style;

/// Styles used for terminal output.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Success messages (green).
    pub success: Style,
    /// Errors (red bold).
    pub error: Style,
    /// Headers (cyan bold).
    pub header: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme {
    /// Create the colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            error: Style::new().red().bold(),
            header: Style::new().cyan().bold(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            error: Style::new(),
            header: Style::new(),
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(title))
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var_os("NO_COLOR").is_some() || !console::colors_enabled() {
        return false;
    }

    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_theme_formats_markers() {
        let theme = Theme::plain();
        assert_eq!(theme.format_success("Built"), "✓ Built");
        assert_eq!(theme.format_error("Failed"), "✗ Failed");
    }

    #[test]
    fn colored_theme_keeps_text() {
        let theme = Theme::new();
        assert!(theme.format_success("test").contains("test"));
        assert!(theme.format_header("nodebundle").contains("nodebundle"));
    }
}
