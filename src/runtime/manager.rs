//! Process-wide window orchestration.
//!
//! The manager is an explicitly constructed service: it owns the pool
//! registry and the visible sequence, and it is wired to every window it
//! hands out so closes and teardowns flow back into pool bookkeeping.
//!
//! Invariant: the visible sequence holds exactly the windows whose state is
//! Showing or Visible, sorted by descending depth (front to back) with a
//! stable tie-break.

use std::cell::RefCell;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::config::EnvConfig;
use crate::core::events::{dispatch, Observers, ObserverId};
use crate::core::options::{TemplateKey, UniqueWindowId};
use crate::error::{SetupError, WindowError};
use crate::runtime::host::HostServices;
use crate::runtime::pool::WindowPool;
use crate::runtime::window::{Window, WindowEvent};
use crate::scene::NodeId;

/// Global notification about any managed window.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ManagerEvent {
    Created,
    Closed,
}

/// Manager-wide tunables.
#[derive(Clone, Copy, Debug)]
pub struct ManagerConfig {
    /// Default cross-fade duration for windows whose template does not
    /// override it.
    pub cross_fade: Duration,
    /// Re-raise caller setup failures instead of swallowing them.
    pub strict_setup: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            cross_fade: Duration::from_millis(200),
            strict_setup: cfg!(debug_assertions),
        }
    }
}

impl ManagerConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let env = EnvConfig::from_env();
        let mut config = Self::default();
        if let Some(strict) = env.strict_setup {
            config.strict_setup = strict;
        }
        if let Some(cross_fade_ms) = env.cross_fade_ms {
            config.cross_fade = Duration::from_millis(cross_fade_ms);
        }
        config
    }
}

type ManagerObservers = Rc<RefCell<Observers<Window, ManagerEvent>>>;

struct ManagerInner {
    host: HostServices,
    ui_root: NodeId,
    config: ManagerConfig,
    pools: BTreeMap<String, WindowPool>,
    visible: Vec<Window>,
    wired: HashMap<String, ObserverId>,
    observers: ManagerObservers,
}

impl ManagerInner {
    fn sort_visible(&mut self) {
        self.visible.sort_by_cached_key(|window| Reverse(window.depth()));
    }
}

/// Window manager service handle.
#[derive(Clone)]
pub struct WindowManager {
    inner: Rc<RefCell<ManagerInner>>,
}

impl WindowManager {
    pub fn new(host: HostServices, ui_root: NodeId, config: ManagerConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ManagerInner {
                host,
                ui_root,
                config,
                pools: BTreeMap::new(),
                visible: Vec::new(),
                wired: HashMap::new(),
                observers: Rc::new(RefCell::new(Observers::default())),
            })),
        }
    }

    pub fn ui_root(&self) -> NodeId {
        self.inner.borrow().ui_root
    }

    pub fn config(&self) -> ManagerConfig {
        self.inner.borrow().config
    }

    /// Create (or reuse) a window for `key`, run the caller's setup logic on
    /// it, and return it deactivated; call [`Window::show`] to present it.
    ///
    /// Returns `None` when the template cannot be loaded or instantiated.
    /// Setup failures are logged with full context; under
    /// [`ManagerConfig::strict_setup`] they are re-raised as a panic,
    /// otherwise the partially set-up window is still returned.
    pub fn create_window(
        &self,
        key: &TemplateKey,
        parent: Option<&Window>,
        setup: impl FnOnce(&Window) -> Result<(), SetupError>,
    ) -> Option<Window> {
        let identity = key.identity();

        let template = {
            let mut inner = self.inner.borrow_mut();
            match inner.pools.get(&identity) {
                Some(pool) => pool.template(),
                None => {
                    let loaded = inner.host.templates.borrow_mut().load(key);
                    match loaded {
                        Some(template) => {
                            inner
                                .pools
                                .insert(identity.clone(), WindowPool::new(key.clone(), template));
                            template
                        }
                        None => {
                            warn!(template = %identity, "window template not found");
                            return None;
                        }
                    }
                }
            }
        };

        if template.options.exclusive_visibility {
            self.refresh_visible();
            let already_visible = {
                let inner = self.inner.borrow();
                inner
                    .visible
                    .iter()
                    .find(|window| window.key().identity() == identity)
                    .cloned()
            };
            if let Some(window) = already_visible {
                window.close();
            }
        }

        let reusable = {
            let inner = self.inner.borrow();
            inner
                .pools
                .get(&identity)
                .and_then(WindowPool::first_reusable)
        };

        let window = match reusable {
            Some(window) => {
                window.reinitialize(template.options);
                let (host, root) = (self.host(), window.root());
                host.scene.borrow_mut().set_active(root, true);
                window
            }
            None => {
                let host = self.host();
                let show_time = template
                    .show_time
                    .unwrap_or_else(|| self.inner.borrow().config.cross_fade);
                let root = {
                    let ui_root = self.ui_root();
                    let mut scene = host.scene.borrow_mut();
                    scene.instantiate(template.template, ui_root)
                };
                let Some(root) = root else {
                    warn!(template = %identity, "window template failed to instantiate");
                    return None;
                };
                let window =
                    Window::new(host, key.clone(), template.options, show_time, root);
                // The exclusivity close above may have emptied and dropped
                // the pool; recreate it so the new instance stays reachable.
                let mut inner = self.inner.borrow_mut();
                inner
                    .pools
                    .entry(identity.clone())
                    .or_insert_with(|| WindowPool::new(key.clone(), template))
                    .add_window(window.clone());
                window
            }
        };

        if let Err(source) = setup(&window) {
            let unique_id = window.unique_id().to_string();
            error!(window = %unique_id, error = %source, "window setup failed");
            if self.inner.borrow().config.strict_setup {
                panic!("{}", WindowError::Setup { unique_id, source });
            }
        }
        window.set_parent(parent);
        window.init();

        {
            let (host, root) = (self.host(), window.root());
            host.scene.borrow_mut().set_active(root, false);
        }

        self.wire(&window);

        debug!(window = %window.unique_id(), "window created");
        self.emit(&window, ManagerEvent::Created);
        Some(window)
    }

    /// Lookup by template identity string and pool-local id.
    pub fn get_window(&self, identity: &str, id: u32) -> Option<Window> {
        let inner = self.inner.borrow();
        inner.pools.get(identity).and_then(|pool| pool.get_window(id))
    }

    /// Lookup by `"<identity>!<id>"`; malformed input is a plain not-found.
    pub fn get_window_by_unique_id(&self, unique_id: &str) -> Option<Window> {
        let parsed: UniqueWindowId = unique_id.parse().ok()?;
        self.get_window(&parsed.identity, parsed.id)
    }

    /// Windows of one template, or every template when `identity` is `None`
    /// (deduplicated across pools).
    pub fn get_all_windows(&self, identity: Option<&str>, only_active: bool) -> Vec<Window> {
        let inner = self.inner.borrow();
        match identity {
            Some(identity) => inner
                .pools
                .get(identity)
                .map(|pool| pool.windows(only_active))
                .unwrap_or_default(),
            None => {
                let mut all: Vec<Window> = Vec::new();
                for pool in inner.pools.values() {
                    for window in pool.windows(only_active) {
                        if !all.iter().any(|seen| seen.same(&window)) {
                            all.push(window);
                        }
                    }
                }
                all
            }
        }
    }

    /// Template identities with a loaded pool, in sorted order.
    pub fn loaded_identities(&self) -> Vec<String> {
        self.inner.borrow().pools.keys().cloned().collect()
    }

    /// Whether any window of the template is currently active.
    pub fn has_windows(&self, identity: &str) -> bool {
        let inner = self.inner.borrow();
        inner
            .pools
            .get(identity)
            .map(|pool| pool.has_windows(false))
            .unwrap_or(false)
    }

    /// Current visible sequence, front to back.
    pub fn visible_windows(&self) -> Vec<Window> {
        self.inner.borrow().visible.clone()
    }

    /// Rebuild the visible sequence from pool state.
    pub fn refresh_visible(&self) {
        let rebuilt: Vec<Window> = {
            let inner = self.inner.borrow();
            inner
                .pools
                .values()
                .flat_map(|pool| pool.windows(true))
                .filter(|window| window.state().is_on_screen())
                .collect()
        };
        let mut inner = self.inner.borrow_mut();
        inner.visible = rebuilt;
        inner.sort_visible();
    }

    /// Sweep every pool for entries whose scene object was destroyed behind
    /// the manager's back, dropping pools that end up empty.
    pub fn compact(&self) {
        let mut inner = self.inner.borrow_mut();
        let mut dropped = 0usize;
        for pool in inner.pools.values_mut() {
            dropped += pool.compact();
        }
        inner.pools.retain(|_, pool| !pool.is_empty());
        if dropped > 0 {
            debug!(dropped, "compacted dangling window entries");
        }
    }

    pub fn observe(&self, callback: Box<dyn FnMut(&Window, &ManagerEvent)>) -> ObserverId {
        let observers = self.observers();
        let mut observers = observers.borrow_mut();
        observers.subscribe(callback)
    }

    pub fn unobserve(&self, id: ObserverId) -> bool {
        let observers = self.observers();
        let mut observers = observers.borrow_mut();
        observers.unsubscribe(id)
    }

    /// Subscribe this manager to a window's lifecycle, detaching any wiring
    /// left over from a previous hand-out of the same instance.
    fn wire(&self, window: &Window) {
        let unique_id = window.unique_id().to_string();
        let previous = { self.inner.borrow_mut().wired.remove(&unique_id) };
        if let Some(previous) = previous {
            window.unobserve(previous);
        }

        let weak = Rc::downgrade(&self.inner);
        let observer = window.observe(Box::new(move |window, event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let manager = WindowManager { inner };
            match event {
                WindowEvent::ShowStarted | WindowEvent::DepthChanged => {
                    manager.on_depth_changed(window);
                }
                WindowEvent::HideStarted => manager.on_hide_started(window),
                WindowEvent::Closed => manager.on_window_closed(window),
                WindowEvent::Destroyed { .. } => manager.on_window_destroyed(window),
                WindowEvent::LayoutSettled | WindowEvent::Shown => {}
            }
        }));
        self.inner.borrow_mut().wired.insert(unique_id, observer);
    }

    fn on_depth_changed(&self, window: &Window) {
        if !window.state().is_on_screen() {
            return;
        }
        let mut inner = self.inner.borrow_mut();
        if !inner.visible.iter().any(|seen| seen.same(window)) {
            inner.visible.push(window.clone());
        }
        inner.sort_visible();
    }

    /// A hiding window is no longer on screen; drop it from the visible
    /// sequence as soon as the hide starts.
    fn on_hide_started(&self, window: &Window) {
        let mut inner = self.inner.borrow_mut();
        inner.visible.retain(|seen| !seen.same(window));
        inner.sort_visible();
    }

    fn closed_bookkeeping(&self, window: &Window) {
        if !window.options().destroy_on_close {
            window.set_reusable(true);
        }
        let mut inner = self.inner.borrow_mut();
        inner.visible.retain(|seen| !seen.same(window));
        inner.sort_visible();
    }

    fn on_window_closed(&self, window: &Window) {
        self.closed_bookkeeping(window);
        debug!(window = %window.unique_id(), "window closed");
        self.emit(window, ManagerEvent::Closed);
    }

    fn on_window_destroyed(&self, window: &Window) {
        self.closed_bookkeeping(window);

        let identity = window.key().identity();
        let mut inner = self.inner.borrow_mut();
        inner.wired.remove(&window.unique_id().to_string());
        let pool_emptied = match inner.pools.get_mut(&identity) {
            Some(pool) => {
                pool.remove(window);
                pool.is_empty()
            }
            None => false,
        };
        if pool_emptied {
            inner.pools.remove(&identity);
            debug!(template = %identity, "dropped empty window pool");
        }
    }

    fn emit(&self, window: &Window, event: ManagerEvent) {
        let observers = self.observers();
        dispatch(&observers, window, &event);
    }

    fn observers(&self) -> ManagerObservers {
        Rc::clone(&self.inner.borrow().observers)
    }

    fn host(&self) -> HostServices {
        self.inner.borrow().host.clone()
    }
}
