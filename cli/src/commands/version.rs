//! Version command

use crate::output::OutputContext;
use crate::output::human::HumanRenderer;

/// Run the version command.
pub fn run(ctx: &OutputContext) {
    HumanRenderer::new(ctx).render_version(env!("CARGO_PKG_VERSION"));
}
