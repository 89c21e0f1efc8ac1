//! Output styles using owo-colors stylesheet pattern

use owo_colors::Style;

/// Stylesheet for terminal output. Plain until [`Styles::colorize`] is called.
#[derive(Default, Clone)]
pub struct Styles {
    /// `✓` marks (green)
    pub success: Style,
    /// `⚠` marks (yellow)
    pub warning: Style,
    /// `ℹ` marks (blue)
    pub info: Style,
    /// `→` step arrows (cyan)
    pub step: Style,
    /// Labels and story types
    pub dim: Style,
    /// Jira issue keys
    pub issue_key: Style,
}

impl Styles {
    /// Apply colors to the stylesheet.
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.info = Style::new().blue();
        self.step = Style::new().cyan();
        self.dim = Style::new().dimmed();
        self.issue_key = Style::new().bold().cyan();
    }
}
