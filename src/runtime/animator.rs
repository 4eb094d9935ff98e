//! Pluggable show/hide animation strategies.

use std::time::Duration;

use crate::runtime::host::HostServices;
use crate::scene::NodeId;

/// Show/hide transition strategy selected per window.
///
/// Both methods must arrange for `on_complete` to run exactly once when the
/// transition finishes, on a later tick. A strategy only drives visuals; the
/// window owns every state change around it.
pub trait WindowAnimator {
    fn show(
        &mut self,
        host: &HostServices,
        node: NodeId,
        from: f32,
        to: f32,
        duration: Duration,
        on_complete: Box<dyn FnOnce()>,
    );

    fn hide(
        &mut self,
        host: &HostServices,
        node: NodeId,
        from: f32,
        to: f32,
        duration: Duration,
        on_complete: Box<dyn FnOnce()>,
    );
}

/// Default strategy: opacity cross-fade through the host transition runner.
#[derive(Default)]
pub struct CrossFade;

impl WindowAnimator for CrossFade {
    fn show(
        &mut self,
        host: &HostServices,
        node: NodeId,
        from: f32,
        to: f32,
        duration: Duration,
        on_complete: Box<dyn FnOnce()>,
    ) {
        host.transitions
            .borrow_mut()
            .run(node, from, to, duration, on_complete);
    }

    fn hide(
        &mut self,
        host: &HostServices,
        node: NodeId,
        from: f32,
        to: f32,
        duration: Duration,
        on_complete: Box<dyn FnOnce()>,
    ) {
        host.transitions
            .borrow_mut()
            .run(node, from, to, duration, on_complete);
    }
}
