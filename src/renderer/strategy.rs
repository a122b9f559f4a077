//! Strategies for committing a render pass to the mounted root

use crate::host::{Host, NodeId};
use crate::renderer::Renderer;
use crate::vnode::VirtualNode;
use crate::Error;

/// How a render pass replaces the content of the root
pub trait RenderStrategy {
    /// Strategy name for logs
    fn name(&self) -> &'static str;

    /// Render `tree` and make it the content of `root`
    fn commit(
        &self,
        host: &dyn Host,
        root: NodeId,
        tree: &VirtualNode,
        renderer: &mut Renderer<'_>,
    ) -> Result<(), Error>;
}

/// Discard everything under the root and rebuild it from scratch
///
/// No host node survives a pass, so host-only state such as focus or
/// uncontrolled input text is lost on every re-render.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullRebuild;

impl RenderStrategy for FullRebuild {
    fn name(&self) -> &'static str {
        "full-rebuild"
    }

    fn commit(
        &self,
        host: &dyn Host,
        root: NodeId,
        tree: &VirtualNode,
        renderer: &mut Renderer<'_>,
    ) -> Result<(), Error> {
        host.clear_children(root);
        match renderer.render_node(tree) {
            Ok(output) => {
                output.append_to(host, root);
                Ok(())
            }
            Err(err) => {
                renderer.discard_created();
                Err(err)
            }
        }
    }
}
