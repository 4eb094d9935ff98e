//! Window lifecycle state machine.
//!
//! A `Window` is a cheap clonable handle over single-runtime state, in the
//! spirit of a surface handle: the manager, the pools, and the caller all
//! hold the same instance. Every transition keeps three rules:
//!
//! - State mutations happen inside short borrows; observer dispatch and
//!   collaborator calls happen with every borrow released.
//! - Completions are delivered through the scheduler or transition runner,
//!   never synchronously from the call that started the transition, except
//!   for the non-animated hide path which completes in place.
//! - Overlapping transitions resolve deterministically: repeat requests
//!   toward the current state are no-ops, a close during an in-flight show
//!   is queued until the show completes, and a show during an in-flight
//!   hide is rejected.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::core::events::{dispatch, Observers, ObserverId};
use crate::core::options::{TemplateKey, UniqueWindowId, WindowOptions};
use crate::core::snapshot::HierarchySnapshot;
use crate::core::state::WindowState;
use crate::runtime::animator::{CrossFade, WindowAnimator};
use crate::runtime::host::HostServices;
use crate::scene::{NodeId, OverlayKind};

/// Opacity used to hold an activated window invisible until its show
/// transition starts, and the resting value after a fade-out.
pub(crate) const NEAR_INVISIBLE: f32 = 0.01;

/// Opacity a completed show always lands on.
pub(crate) const FULL_OPACITY: f32 = 1.0;

/// Lifecycle notification emitted by a [`Window`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WindowEvent {
    /// A show sequence started; the scene object is active again.
    ShowStarted,
    /// Layout-affecting work settled; the final control rect is measurable.
    LayoutSettled,
    /// The window reached `Visible`.
    Shown,
    /// A hide sequence started.
    HideStarted,
    /// The window reached `Hidden`.
    Closed,
    /// The window's sibling order changed.
    DepthChanged,
    /// The scene object is about to be destroyed. `immediate` is the only
    /// signal distinguishing graceful from immediate teardown.
    Destroyed { immediate: bool },
}

type WindowObservers = Rc<RefCell<Observers<Window, WindowEvent>>>;

pub(crate) struct WindowInner {
    id: u32,
    key: TemplateKey,
    options: WindowOptions,
    show_time: Duration,
    state: WindowState,
    root: NodeId,
    background: Option<NodeId>,
    parent: Option<WeakWindow>,
    snapshot: Option<HierarchySnapshot>,
    disabled_groups: Vec<NodeId>,
    animated_show_in_flight: bool,
    suppress_animation: bool,
    close_requested: bool,
    reusable: bool,
    deinitialized: bool,
    animator: Box<dyn WindowAnimator>,
    on_deinit: Option<Box<dyn FnOnce(&Window)>>,
    observers: WindowObservers,
    host: HostServices,
}

/// Handle to one instantiated panel.
#[derive(Clone)]
pub struct Window {
    inner: Rc<RefCell<WindowInner>>,
}

/// Non-owning window reference for deferred callbacks and parent links.
#[derive(Clone)]
pub(crate) struct WeakWindow {
    inner: Weak<RefCell<WindowInner>>,
}

impl WeakWindow {
    pub(crate) fn upgrade(&self) -> Option<Window> {
        self.inner.upgrade().map(|inner| Window { inner })
    }
}

impl Window {
    pub(crate) fn new(
        host: HostServices,
        key: TemplateKey,
        options: WindowOptions,
        show_time: Duration,
        root: NodeId,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(WindowInner {
                id: 0,
                key,
                options,
                show_time,
                state: WindowState::None,
                root,
                background: None,
                parent: None,
                snapshot: None,
                disabled_groups: Vec::new(),
                animated_show_in_flight: false,
                suppress_animation: false,
                close_requested: false,
                reusable: false,
                deinitialized: true,
                animator: Box::new(CrossFade),
                on_deinit: None,
                observers: Rc::new(RefCell::new(Observers::default())),
                host,
            })),
        }
    }

    pub(crate) fn downgrade(&self) -> WeakWindow {
        WeakWindow {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Same underlying instance.
    pub fn same(&self, other: &Window) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn id(&self) -> u32 {
        self.inner.borrow().id
    }

    pub(crate) fn set_id(&self, id: u32) {
        self.inner.borrow_mut().id = id;
    }

    pub fn key(&self) -> TemplateKey {
        self.inner.borrow().key.clone()
    }

    pub fn unique_id(&self) -> UniqueWindowId {
        let inner = self.inner.borrow();
        UniqueWindowId::new(inner.key.identity(), inner.id)
    }

    pub fn state(&self) -> WindowState {
        self.inner.borrow().state
    }

    pub fn options(&self) -> WindowOptions {
        self.inner.borrow().options
    }

    /// Adjust the flags of this instance. Flags are reset from the template
    /// whenever a pooled instance is reused.
    pub fn set_options(&self, options: WindowOptions) {
        self.inner.borrow_mut().options = options;
    }

    pub fn show_time(&self) -> Duration {
        self.inner.borrow().show_time
    }

    pub fn set_show_time(&self, show_time: Duration) {
        self.inner.borrow_mut().show_time = show_time;
    }

    pub fn root(&self) -> NodeId {
        self.inner.borrow().root
    }

    pub fn background_node(&self) -> Option<NodeId> {
        self.inner.borrow().background
    }

    pub fn parent(&self) -> Option<Window> {
        let parent = self.inner.borrow().parent.clone();
        parent.and_then(|weak| weak.upgrade())
    }

    pub(crate) fn set_parent(&self, parent: Option<&Window>) {
        self.inner.borrow_mut().parent = parent.map(Window::downgrade);
    }

    /// Whether the scene object still exists.
    pub fn exists(&self) -> bool {
        let (host, root) = self.host_and_root();
        let scene = host.scene.borrow();
        scene.exists(root)
    }

    /// Scene object's own active flag.
    pub fn is_active(&self) -> bool {
        let (host, root) = self.host_and_root();
        let scene = host.scene.borrow();
        scene.is_active(root)
    }

    /// Active flag of the scene object and all its ancestors.
    pub fn is_active_in_hierarchy(&self) -> bool {
        let (host, root) = self.host_and_root();
        let scene = host.scene.borrow();
        scene.is_active_in_hierarchy(root)
    }

    pub fn is_reusable(&self) -> bool {
        self.inner.borrow().reusable
    }

    pub(crate) fn set_reusable(&self, reusable: bool) {
        self.inner.borrow_mut().reusable = reusable;
    }

    /// Replace the show/hide animation strategy.
    pub fn set_animator(&self, animator: Box<dyn WindowAnimator>) {
        self.inner.borrow_mut().animator = animator;
    }

    /// One-shot hook invoked at de-initialization (after a close or before
    /// destruction). Re-arm it from setup logic on every reuse if needed.
    pub fn set_on_deinit(&self, hook: Box<dyn FnOnce(&Window)>) {
        self.inner.borrow_mut().on_deinit = Some(hook);
    }

    pub fn observe(&self, callback: Box<dyn FnMut(&Window, &WindowEvent)>) -> ObserverId {
        let observers = self.observers();
        let mut observers = observers.borrow_mut();
        observers.subscribe(callback)
    }

    pub fn unobserve(&self, id: ObserverId) -> bool {
        let observers = self.observers();
        let mut observers = observers.borrow_mut();
        observers.unsubscribe(id)
    }

    /// Sibling position under the UI root; higher is in front.
    pub fn depth(&self) -> usize {
        let (host, root) = self.host_and_root();
        let scene = host.scene.borrow();
        scene.sibling_index(root)
    }

    /// Move to an explicit sibling position, announcing the change.
    pub fn set_depth(&self, depth: usize) {
        let (host, root) = self.host_and_root();
        let changed = {
            let mut scene = host.scene.borrow_mut();
            let before = scene.sibling_index(root);
            scene.set_sibling_index(root, depth);
            scene.sibling_index(root) != before
        };
        if changed {
            self.emit(WindowEvent::DepthChanged);
        }
    }

    /// Raise in front of all siblings, announcing the change if any.
    pub fn bring_to_front(&self) {
        let (host, root) = self.host_and_root();
        let changed = {
            let mut scene = host.scene.borrow_mut();
            let before = scene.sibling_index(root);
            scene.place_last(root);
            scene.sibling_index(root) != before
        };
        if changed {
            self.emit(WindowEvent::DepthChanged);
        }
    }

    /// First-time or reuse initialization: parks the blocker overlay beneath
    /// the window and captures the hierarchy snapshot when configured.
    pub(crate) fn init(&self) {
        let (host, root, options, background) = {
            let inner = self.inner.borrow();
            (
                inner.host.clone(),
                inner.root,
                inner.options,
                inner.background,
            )
        };

        if options.input_block && background.is_none() {
            let node = {
                let mut scene = host.scene.borrow_mut();
                let kind = if options.show_background {
                    OverlayKind::Background
                } else {
                    OverlayKind::InputBlocker
                };
                let node = scene.create_overlay(root, kind);
                scene.place_first(node);
                node
            };
            self.inner.borrow_mut().background = Some(node);
        }

        let need_snapshot = {
            let inner = self.inner.borrow();
            !options.destroy_on_close && options.restore_hierarchy && inner.snapshot.is_none()
        };
        if need_snapshot {
            let snapshot = HierarchySnapshot::capture(&*host.scene.borrow(), root);
            self.inner.borrow_mut().snapshot = Some(snapshot);
        }

        self.inner.borrow_mut().deinitialized = false;
    }

    /// Fresh setup state for a pooled instance being handed out again.
    pub(crate) fn reinitialize(&self, options: WindowOptions) {
        let mut inner = self.inner.borrow_mut();
        inner.options = options;
        inner.reusable = false;
        inner.close_requested = false;
        inner.animated_show_in_flight = false;
    }

    /// Start the show sequence.
    ///
    /// No-op while already Showing or Visible; rejected while Hiding. The
    /// scene object activates and rises to the front immediately, the shown
    /// completion lands on a later tick.
    pub fn show(&self) {
        let (host, root, animated) = {
            let mut inner = self.inner.borrow_mut();
            match inner.state {
                WindowState::Showing | WindowState::Visible | WindowState::Hiding => return,
                WindowState::None | WindowState::Hidden => {}
            }
            inner.state = WindowState::Showing;
            let animated = inner.options.animated_show && !inner.suppress_animation;
            inner.animated_show_in_flight = animated;
            (inner.host.clone(), inner.root, animated)
        };

        host.scene.borrow_mut().set_active(root, true);
        self.bring_to_front();
        self.emit(WindowEvent::ShowStarted);

        let deferred = self.downgrade();
        if animated {
            host.scene.borrow_mut().set_opacity(root, NEAR_INVISIBLE);
            host.scheduler.borrow_mut().call_later(
                1,
                Box::new(move || {
                    if let Some(window) = deferred.upgrade() {
                        window.begin_show_transition();
                    }
                }),
            );
        } else {
            host.scene.borrow_mut().set_opacity(root, FULL_OPACITY);
            host.scheduler.borrow_mut().call_later(
                1,
                Box::new(move || {
                    if let Some(window) = deferred.upgrade() {
                        window.finish_show();
                    }
                }),
            );
        }
    }

    /// Show without animation for this call only.
    pub fn show_immediate(&self) {
        self.inner.borrow_mut().suppress_animation = true;
        self.show();
        self.inner.borrow_mut().suppress_animation = false;
    }

    fn begin_show_transition(&self) {
        let (host, root, show_time) = {
            let inner = self.inner.borrow();
            if inner.state != WindowState::Showing {
                return;
            }
            (inner.host.clone(), inner.root, inner.show_time)
        };
        if !host.scene.borrow().exists(root) {
            return;
        }

        self.disable_interactables();

        let deferred = self.downgrade();
        let on_complete: Box<dyn FnOnce()> = Box::new(move || {
            if let Some(window) = deferred.upgrade() {
                window.finish_show();
            }
        });
        let mut inner = self.inner.borrow_mut();
        let WindowInner {
            ref mut animator, ..
        } = *inner;
        animator.show(
            &host,
            root,
            NEAR_INVISIBLE,
            FULL_OPACITY,
            show_time,
            on_complete,
        );
    }

    /// Shown completion: layout settled, interaction restored (animated
    /// shows only), state Visible.
    fn finish_show(&self) {
        let animated = {
            let inner = self.inner.borrow();
            if inner.state != WindowState::Showing {
                return;
            }
            inner.animated_show_in_flight
        };
        if !self.exists() {
            return;
        }

        self.emit(WindowEvent::LayoutSettled);
        if animated {
            self.enable_interactables();
        }
        {
            let mut inner = self.inner.borrow_mut();
            inner.state = WindowState::Visible;
            inner.animated_show_in_flight = false;
        }
        self.emit(WindowEvent::Shown);

        let pending_close = {
            let mut inner = self.inner.borrow_mut();
            std::mem::take(&mut inner.close_requested)
        };
        if pending_close {
            self.close_single();
        }
    }

    /// Close this window, or the whole parent chain when configured.
    pub fn close(&self) {
        let chain = self.inner.borrow().options.close_parent_chain;
        if chain {
            self.close_chain();
        } else {
            self.close_single();
        }
    }

    fn close_chain(&self) {
        self.close_single();
        if let Some(parent) = self.parent() {
            parent.close_chain();
        }
    }

    fn close_single(&self) {
        let (host, root, animated, show_time) = {
            let mut inner = self.inner.borrow_mut();
            match inner.state {
                WindowState::Hiding | WindowState::Hidden => return,
                WindowState::Showing => {
                    // Queue behind the in-flight show; the shown completion
                    // runs the close.
                    inner.close_requested = true;
                    return;
                }
                WindowState::None | WindowState::Visible => {}
            }
            inner.state = WindowState::Hiding;
            (
                inner.host.clone(),
                inner.root,
                inner.options.animated_close,
                inner.show_time,
            )
        };

        self.emit(WindowEvent::HideStarted);

        if animated {
            self.disable_interactables();
            let deferred = self.downgrade();
            let on_complete: Box<dyn FnOnce()> = Box::new(move || {
                if let Some(window) = deferred.upgrade() {
                    window.finish_hide();
                }
            });
            let from = host.scene.borrow().opacity(root);
            let mut inner = self.inner.borrow_mut();
            let WindowInner {
                ref mut animator, ..
            } = *inner;
            animator.hide(&host, root, from, NEAR_INVISIBLE, show_time, on_complete);
        } else {
            self.finish_hide();
        }
    }

    /// Hidden completion: destroy, or restore-and-deactivate for pooled
    /// instances, then de-initialize exactly once.
    fn finish_hide(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.state != WindowState::Hiding {
                return;
            }
            inner.state = WindowState::Hidden;
        }
        if !self.exists() {
            return;
        }

        self.emit(WindowEvent::Closed);

        let (host, root, destroy_on_close, restore) = {
            let inner = self.inner.borrow();
            (
                inner.host.clone(),
                inner.root,
                inner.options.destroy_on_close,
                inner.options.restore_hierarchy,
            )
        };

        if destroy_on_close {
            self.destroy(false);
        } else {
            if restore {
                let inner = self.inner.borrow();
                if let Some(snapshot) = inner.snapshot.as_ref() {
                    snapshot.restore(&mut *host.scene.borrow_mut());
                }
            }
            host.scene.borrow_mut().set_active(root, false);
        }

        self.run_deinit();
    }

    /// Tear the scene object down. Harmless once the object is gone.
    pub fn destroy(&self, immediate: bool) {
        let (host, root) = self.host_and_root();
        if !host.scene.borrow().exists(root) {
            return;
        }
        self.emit(WindowEvent::Destroyed { immediate });
        host.scene.borrow_mut().destroy(root);
        self.run_deinit();
    }

    /// Report a tap on the blocker overlay; closes the window when Visible
    /// and configured to close on background taps.
    pub fn background_tapped(&self) {
        let close = {
            let inner = self.inner.borrow();
            inner.state == WindowState::Visible && inner.options.close_on_background_tap
        };
        if close {
            self.close();
        }
    }

    /// Snapshot currently-interactable input groups (blocker excluded) and
    /// disable them. Replaces earlier bookkeeping.
    fn disable_interactables(&self) {
        let (host, root, background) = {
            let inner = self.inner.borrow();
            (inner.host.clone(), inner.root, inner.background)
        };
        let disabled = {
            let mut scene = host.scene.borrow_mut();
            let mut disabled = Vec::new();
            for group in scene.input_groups(root) {
                if background == Some(group) {
                    continue;
                }
                if scene.is_interactable(group) {
                    scene.set_interactable(group, false);
                    disabled.push(group);
                }
            }
            disabled
        };
        self.inner.borrow_mut().disabled_groups = disabled;
    }

    /// Re-enable exactly the remembered set and clear the bookkeeping.
    /// Groups that were already non-interactable before the snapshot are
    /// never touched.
    fn enable_interactables(&self) {
        let (host, groups) = {
            let mut inner = self.inner.borrow_mut();
            (inner.host.clone(), std::mem::take(&mut inner.disabled_groups))
        };
        let mut scene = host.scene.borrow_mut();
        for group in groups {
            if scene.exists(group) {
                scene.set_interactable(group, true);
            }
        }
    }

    fn run_deinit(&self) {
        let hook = {
            let mut inner = self.inner.borrow_mut();
            if inner.deinitialized {
                return;
            }
            inner.deinitialized = true;
            inner.on_deinit.take()
        };
        if let Some(hook) = hook {
            hook(self);
        }
    }

    fn emit(&self, event: WindowEvent) {
        let observers = self.observers();
        dispatch(&observers, self, &event);
    }

    fn observers(&self) -> WindowObservers {
        Rc::clone(&self.inner.borrow().observers)
    }

    fn host_and_root(&self) -> (HostServices, NodeId) {
        let inner = self.inner.borrow();
        (inner.host.clone(), inner.root)
    }
}
