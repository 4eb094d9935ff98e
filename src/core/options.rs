//! Template identity and per-window configuration flags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WindowError;

/// Identity of a window template: a group plus a name.
///
/// The identity string `"<group>_<name>"` keys the manager's pool registry;
/// the template path `"<root>/<group>/<name>"` addresses the backing template
/// in a [`TemplateRegistry`](crate::runtime::template::TemplateRegistry).
#[derive(Clone, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub struct TemplateKey {
    pub group: String,
    pub name: String,
}

impl TemplateKey {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }

    /// Identity string used as the pool registry key.
    pub fn identity(&self) -> String {
        format!("{}_{}", self.group, self.name)
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.group, self.name)
    }
}

/// Process-unique window address: template identity plus the pool-local id.
///
/// Formatted as `"<group>_<name>!<id>"`. Parsing splits on the last `'!'`
/// so the identity half is carried through verbatim.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UniqueWindowId {
    pub identity: String,
    pub id: u32,
}

impl UniqueWindowId {
    pub fn new(identity: impl Into<String>, id: u32) -> Self {
        Self {
            identity: identity.into(),
            id,
        }
    }
}

impl fmt::Display for UniqueWindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.identity, self.id)
    }
}

impl FromStr for UniqueWindowId {
    type Err = WindowError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        fn malformed(raw: &str) -> WindowError {
            WindowError::MalformedUniqueId {
                id: raw.to_string(),
            }
        }
        let (identity, id) = raw.rsplit_once('!').ok_or_else(|| malformed(raw))?;
        if identity.is_empty() {
            return Err(malformed(raw));
        }
        let id = id.parse::<u32>().map_err(|_| malformed(raw))?;
        Ok(Self {
            identity: identity.to_string(),
            id,
        })
    }
}

/// Per-window behavior flags.
///
/// Defaults match the common dialog case: animated cross-fades, input
/// blocking behind a visible background, closeable by background tap, torn
/// down on close. Templates carry their own flag set; callers may adjust a
/// created instance before showing it, and the flags are reset from the
/// template whenever a pooled instance is reused.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowOptions {
    /// Run the show transition instead of appearing at once.
    pub animated_show: bool,
    /// Run the hide transition instead of vanishing at once.
    pub animated_close: bool,
    /// Create a blocker overlay beneath the window at first init.
    pub input_block: bool,
    /// Use the visible background overlay rather than the plain blocker.
    pub show_background: bool,
    /// A tap on the background closes the window while it is Visible.
    pub close_on_background_tap: bool,
    /// Destroy the instance when closed instead of pooling it.
    pub destroy_on_close: bool,
    /// Closing this window also closes its parent chain.
    pub close_parent_chain: bool,
    /// At most one instance of the template may be visible at a time.
    pub exclusive_visibility: bool,
    /// Snapshot the scene subtree at first init and restore it on hide.
    pub restore_hierarchy: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            animated_show: true,
            animated_close: true,
            input_block: true,
            show_background: true,
            close_on_background_tap: true,
            destroy_on_close: true,
            close_parent_chain: false,
            exclusive_visibility: false,
            restore_hierarchy: true,
        }
    }
}
