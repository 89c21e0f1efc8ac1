//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::domain::{SemverBump, Story};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.info(&format!("cfdeploy v{version}"));
    }

    /// Render story details followed by the suggested version bump.
    pub fn render_stories(&self, stories: &[Story], bump: SemverBump) {
        if self.ctx.quiet {
            return;
        }
        for story in stories {
            println!(
                "  {} {} {}",
                story.key.style(self.ctx.styles.issue_key),
                format!("[{}]", story.story_type).style(self.ctx.styles.dim),
                story.summary
            );
            self.ctx.kv("    url:", &story.url);
            if !story.labels.is_empty() {
                self.ctx.kv("    labels:", &story.labels.join(", "));
            }
            if !story.fix_versions.is_empty() {
                self.ctx.kv("    fix versions:", &story.fix_versions.join(", "));
            }
        }
        println!();
        self.ctx.kv("Suggested bump:", &bump.to_string());
    }

    /// Render the outcome of a change-request submission.
    pub fn render_change(&self, number: Option<&str>) {
        match number {
            Some(number) => self.ctx.kv("Change request:", number),
            None => self.ctx.warn("no change request was created"),
        }
    }
}
