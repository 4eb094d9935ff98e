#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use window_stack::{
    FrameScheduler, FrameTransitions, HostServices, ManagerConfig, NodeId, SceneRef, SceneTree,
    TemplateKey, TemplateRegistry, Window, WindowManager, WindowOptions, WindowTemplate,
};

/// Frame time used by the harness host loop.
pub const FRAME: Duration = Duration::from_millis(50);

/// Options for windows that skip both transitions.
pub fn instant_options() -> WindowOptions {
    WindowOptions {
        animated_show: false,
        animated_close: false,
        ..WindowOptions::default()
    }
}

/// Cross-fade used by harness managers: four frames per transition.
pub const CROSS_FADE: Duration = Duration::from_millis(200);

/// Fake host: arena scene graph, frame-stepped scheduler and transitions,
/// in-memory template registry, and a manager wired over all of them.
pub struct Harness {
    pub scene: Rc<RefCell<SceneTree>>,
    pub scheduler: Rc<RefCell<FrameScheduler>>,
    pub transitions: Rc<RefCell<FrameTransitions>>,
    pub templates: Rc<RefCell<TemplateRegistry>>,
    pub manager: WindowManager,
    pub ui_root: NodeId,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(ManagerConfig {
            cross_fade: CROSS_FADE,
            strict_setup: true,
        })
    }

    pub fn with_config(config: ManagerConfig) -> Self {
        let scene = Rc::new(RefCell::new(SceneTree::new()));
        let ui_root = scene.borrow_mut().create_node("ui", None);
        let scene_ref: SceneRef = scene.clone();
        let scheduler = Rc::new(RefCell::new(FrameScheduler::new()));
        let transitions = Rc::new(RefCell::new(FrameTransitions::new(scene_ref.clone())));
        let templates = Rc::new(RefCell::new(TemplateRegistry::new("ui")));
        let host = HostServices::new(
            scene_ref,
            templates.clone(),
            transitions.clone(),
            scheduler.clone(),
        );
        let manager = WindowManager::new(host, ui_root, config);
        Self {
            scene,
            scheduler,
            transitions,
            templates,
            manager,
            ui_root,
        }
    }

    /// Register a dialog-shaped template: an input-group root holding an
    /// input-group body with one label.
    pub fn register_dialog(&self, group: &str, name: &str, options: WindowOptions) -> TemplateKey {
        let key = TemplateKey::new(group, name);
        let template = {
            let mut scene = self.scene.borrow_mut();
            let root = scene.create_node(name, None);
            scene.set_input_group(root, true);
            let body = scene.create_node("body", Some(root));
            scene.set_input_group(body, true);
            scene.create_node("label", Some(body));
            scene.register_template(root)
        };
        self.templates
            .borrow_mut()
            .register(&key, WindowTemplate::new(template, options));
        key
    }

    /// Create a window with a no-op setup, panicking on a not-found result.
    pub fn create(&self, key: &TemplateKey) -> Window {
        self.manager
            .create_window(key, None, |_| Ok(()))
            .unwrap_or_else(|| panic!("create_window({}) returned not-found", key.identity()))
    }

    /// One host frame: due deferred callbacks first, then transition time.
    pub fn tick(&self) {
        let due = self.scheduler.borrow_mut().advance();
        for callback in due {
            callback();
        }
        let done = self.transitions.borrow_mut().advance(FRAME);
        for callback in done {
            callback();
        }
    }

    /// Run frames until the scheduler and transitions drain.
    pub fn run_until_idle(&self) {
        for _ in 0..64 {
            if self.scheduler.borrow().is_idle() && self.transitions.borrow().is_idle() {
                return;
            }
            self.tick();
        }
        panic!("host loop failed to go idle within 64 frames");
    }

    /// Subscribe a recorder that logs every event of `window` by name.
    pub fn record_events(&self, window: &Window) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        window.observe(Box::new(move |_, event| {
            sink.borrow_mut().push(format!("{event:?}"));
        }));
        log
    }

    /// Front-to-back unique ids of the manager's visible sequence.
    pub fn visible_ids(&self) -> Vec<String> {
        self.manager
            .visible_windows()
            .iter()
            .map(|window| window.unique_id().to_string())
            .collect()
    }
}
