//! Shared handles to the host collaborators.

use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::hooks::{Scheduler, TransitionRunner};
use crate::runtime::template::TemplateSource;
use crate::scene::Scene;

pub type SceneRef = Rc<RefCell<dyn Scene>>;
pub type TemplateSourceRef = Rc<RefCell<dyn TemplateSource>>;
pub type TransitionRunnerRef = Rc<RefCell<dyn TransitionRunner>>;
pub type SchedulerRef = Rc<RefCell<dyn Scheduler>>;

/// Bundle of host collaborator handles injected into the windowing core.
///
/// Everything is single-threaded `Rc<RefCell<..>>` state; cloning the bundle
/// clones the handles, not the collaborators. Callbacks handed to the
/// scheduler and transition runner are invoked by the host outside of any
/// collaborator borrow, so they are free to call back into the core.
#[derive(Clone)]
pub struct HostServices {
    pub scene: SceneRef,
    pub templates: TemplateSourceRef,
    pub transitions: TransitionRunnerRef,
    pub scheduler: SchedulerRef,
}

impl HostServices {
    pub fn new(
        scene: SceneRef,
        templates: TemplateSourceRef,
        transitions: TransitionRunnerRef,
        scheduler: SchedulerRef,
    ) -> Self {
        Self {
            scene,
            templates,
            transitions,
            scheduler,
        }
    }
}
