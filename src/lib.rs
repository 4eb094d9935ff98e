//! Deterministic window/overlay lifecycle manager for single-threaded UI
//! hosts.
//!
//! Invariant: one logical thread owns everything. Scene mutations, pool
//! bookkeeping, and observer dispatch all happen synchronously on the host's
//! frame loop, and deferred work flows back in only through the
//! [`Scheduler`]/[`TransitionRunner`] hooks.
//!
//! # Public API Overview
//! - Construct a [`WindowManager`] over a [`HostServices`] bundle and create
//!   windows by [`TemplateKey`]; show, stack, and close them through the
//!   returned [`Window`] handles.
//! - Observe per-window lifecycle via [`WindowEvent`] and manager-wide
//!   creation/close via [`ManagerEvent`].
//! - Integrate a host scene graph by implementing [`Scene`], or use the
//!   bundled [`SceneTree`] arena.
//! - Drive time with the frame-stepped [`FrameScheduler`] and
//!   [`FrameTransitions`] reference hooks, or supply your own.

#![allow(clippy::question_mark, clippy::type_complexity)]

pub mod config;
pub mod error;

pub mod core;
pub mod runtime;
pub mod scene;

/// Environment configuration.
pub use crate::config::EnvConfig;

/// Crate error type and the caller-supplied setup error alias.
pub use crate::error::{SetupError, WindowError};

/// Lifecycle states, identities, and per-window flags.
pub use crate::core::options::{TemplateKey, UniqueWindowId, WindowOptions};
pub use crate::core::state::WindowState;

/// Observer subscription identifier.
pub use crate::core::events::ObserverId;

/// Hierarchy snapshot arena used by hidden-not-destroyed windows.
pub use crate::core::snapshot::HierarchySnapshot;

/// Scene-graph interface and reference implementation.
pub use crate::scene::tree::SceneTree;
pub use crate::scene::{NodeId, OverlayKind, Scene, TemplateId};

/// Windows, the manager, and their events.
pub use crate::runtime::manager::{ManagerConfig, ManagerEvent, WindowManager};
pub use crate::runtime::window::{Window, WindowEvent};

/// Host collaborator hooks and reference implementations.
pub use crate::runtime::animator::{CrossFade, WindowAnimator};
pub use crate::runtime::hooks::{FrameScheduler, FrameTransitions, Scheduler, TransitionRunner};
pub use crate::runtime::host::{
    HostServices, SceneRef, SchedulerRef, TemplateSourceRef, TransitionRunnerRef,
};
pub use crate::runtime::pool::WindowPool;
pub use crate::runtime::template::{TemplateRegistry, TemplateSource, WindowTemplate};
