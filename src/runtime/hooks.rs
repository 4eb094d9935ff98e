//! Deferred-call scheduling and timed visual transitions.
//!
//! Both hooks follow the host's cooperative frame loop. The reference
//! implementations buffer work and hand completed callbacks back to the
//! caller, who invokes them after releasing the collaborator borrow; nothing
//! here ever runs a callback synchronously from inside `call_later` or
//! `run`.

use std::time::Duration;

use crate::runtime::host::SceneRef;
use crate::scene::NodeId;

/// Deferred-call scheduler collaborator.
pub trait Scheduler {
    /// Run `callback` after `frames` scheduling ticks (at least one).
    fn call_later(&mut self, frames: u32, callback: Box<dyn FnOnce()>);
}

/// Timed visual transition collaborator.
pub trait TransitionRunner {
    /// Animate `node`'s opacity from `from` to `to` over `duration`.
    ///
    /// `on_complete` must be invoked exactly once, on a later tick, never
    /// from inside this call.
    fn run(
        &mut self,
        node: NodeId,
        from: f32,
        to: f32,
        duration: Duration,
        on_complete: Box<dyn FnOnce()>,
    );
}

struct Deferred {
    frames_left: u32,
    callback: Box<dyn FnOnce()>,
}

/// Frame-stepped [`Scheduler`].
///
/// The host calls [`FrameScheduler::advance`] once per tick and invokes the
/// returned callbacks, in order, with the scheduler borrow released.
#[derive(Default)]
pub struct FrameScheduler {
    pending: Vec<Deferred>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step one tick; returns the callbacks that came due, in the order they
    /// were scheduled.
    pub fn advance(&mut self) -> Vec<Box<dyn FnOnce()>> {
        let mut due = Vec::new();
        let mut pending = Vec::new();
        for mut entry in self.pending.drain(..) {
            entry.frames_left -= 1;
            if entry.frames_left == 0 {
                due.push(entry.callback);
            } else {
                pending.push(entry);
            }
        }
        self.pending = pending;
        due
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Scheduler for FrameScheduler {
    fn call_later(&mut self, frames: u32, callback: Box<dyn FnOnce()>) {
        self.pending.push(Deferred {
            frames_left: frames.max(1),
            callback,
        });
    }
}

struct ActiveTransition {
    node: NodeId,
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
    on_complete: Option<Box<dyn FnOnce()>>,
}

/// Frame-stepped [`TransitionRunner`] interpolating opacity linearly.
///
/// The host calls [`FrameTransitions::advance`] with the elapsed frame time
/// and invokes the returned completions with the runner borrow released.
/// Zero-duration transitions complete on the next tick, keeping the
/// never-synchronous completion contract.
pub struct FrameTransitions {
    scene: SceneRef,
    active: Vec<ActiveTransition>,
}

impl FrameTransitions {
    pub fn new(scene: SceneRef) -> Self {
        Self {
            scene,
            active: Vec::new(),
        }
    }

    /// Step all transitions by `elapsed`; returns completions in start order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Box<dyn FnOnce()>> {
        let mut completions = Vec::new();
        {
            let mut scene = self.scene.borrow_mut();
            self.active.retain_mut(|transition| {
                transition.elapsed += elapsed;
                if transition.elapsed >= transition.duration {
                    if scene.exists(transition.node) {
                        scene.set_opacity(transition.node, transition.to);
                    }
                    if let Some(on_complete) = transition.on_complete.take() {
                        completions.push(on_complete);
                    }
                    false
                } else {
                    let progress =
                        transition.elapsed.as_secs_f32() / transition.duration.as_secs_f32();
                    if scene.exists(transition.node) {
                        let value =
                            transition.from + (transition.to - transition.from) * progress;
                        scene.set_opacity(transition.node, value);
                    }
                    true
                }
            });
        }
        completions
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }
}

impl TransitionRunner for FrameTransitions {
    fn run(
        &mut self,
        node: NodeId,
        from: f32,
        to: f32,
        duration: Duration,
        on_complete: Box<dyn FnOnce()>,
    ) {
        if self.scene.borrow().exists(node) {
            self.scene.borrow_mut().set_opacity(node, from);
        }
        self.active.push(ActiveTransition {
            node,
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            on_complete: Some(on_complete),
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::{FrameScheduler, FrameTransitions, Scheduler, TransitionRunner};
    use crate::scene::tree::SceneTree;
    use crate::scene::Scene;

    #[test]
    fn scheduler_fires_in_scheduling_order_after_frame_delay() {
        let mut scheduler = FrameScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (frames, tag) in [(2, "late"), (1, "first"), (1, "second")] {
            let log = Rc::clone(&log);
            scheduler.call_later(frames, Box::new(move || log.borrow_mut().push(tag)));
        }

        for callback in scheduler.advance() {
            callback();
        }
        assert_eq!(log.borrow().as_slice(), ["first", "second"]);

        for callback in scheduler.advance() {
            callback();
        }
        assert_eq!(log.borrow().as_slice(), ["first", "second", "late"]);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn zero_frame_requests_still_wait_one_tick() {
        let mut scheduler = FrameScheduler::new();
        let fired = Rc::new(RefCell::new(false));
        {
            let fired = Rc::clone(&fired);
            scheduler.call_later(0, Box::new(move || *fired.borrow_mut() = true));
        }
        assert!(!*fired.borrow());
        for callback in scheduler.advance() {
            callback();
        }
        assert!(*fired.borrow());
    }

    #[test]
    fn transitions_interpolate_and_complete_once() {
        let scene = Rc::new(RefCell::new(SceneTree::new()));
        let node = scene.borrow_mut().create_node("panel", None);
        let mut transitions = FrameTransitions::new(scene.clone());

        let completed = Rc::new(RefCell::new(0));
        {
            let completed = Rc::clone(&completed);
            transitions.run(
                node,
                0.0,
                1.0,
                Duration::from_millis(100),
                Box::new(move || *completed.borrow_mut() += 1),
            );
        }
        assert_eq!(*completed.borrow(), 0);

        let done = transitions.advance(Duration::from_millis(50));
        assert!(done.is_empty());
        let midway = scene.borrow().opacity(node);
        assert!((midway - 0.5).abs() < 1e-4);

        let done = transitions.advance(Duration::from_millis(50));
        assert_eq!(done.len(), 1);
        for callback in done {
            callback();
        }
        assert_eq!(*completed.borrow(), 1);
        assert!((scene.borrow().opacity(node) - 1.0).abs() < 1e-6);
        assert!(transitions.is_idle());
    }

    #[test]
    fn destroyed_target_still_completes() {
        let scene = Rc::new(RefCell::new(SceneTree::new()));
        let node = scene.borrow_mut().create_node("panel", None);
        let mut transitions = FrameTransitions::new(scene.clone());

        let completed = Rc::new(RefCell::new(false));
        {
            let completed = Rc::clone(&completed);
            transitions.run(
                node,
                1.0,
                0.0,
                Duration::from_millis(20),
                Box::new(move || *completed.borrow_mut() = true),
            );
        }
        scene.borrow_mut().destroy(node);

        let done = transitions.advance(Duration::from_millis(20));
        for callback in done {
            callback();
        }
        assert!(*completed.borrow());
    }
}
