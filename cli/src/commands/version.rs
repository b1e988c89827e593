//! Version command

use crate::output::{HumanRenderer, OutputContext};

/// Run the version command.
pub fn run(ctx: &OutputContext) {
    HumanRenderer::new(ctx).render_version(env!("CARGO_PKG_VERSION"));
}
