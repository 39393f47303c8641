//! Node-local override flags.

use serde::{Deserialize, Serialize};

/// Per-node overrides supplied by the caller before resolution.
///
/// Created fresh for each node and consumed once by
/// [`resolve`](crate::resolver::resolve).
///
/// # Example
///
/// ```
/// use horizon_lattice_compliance::OverrideFlags;
///
/// let submit = OverrideFlags::named("Submit");
/// let decorative = OverrideFlags::disabled();
/// let fixed = OverrideFlags::exact("login_submit");
///
/// assert_eq!(submit.explicit_name.as_deref(), Some("Submit"));
/// assert!(decorative.force_disable);
/// assert!(fixed.has_name());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverrideFlags {
    /// Name to use instead of the inferred one. Still namespaced.
    pub explicit_name: Option<String>,
    /// Name used verbatim, bypassing namespace, breadcrumb and collision
    /// handling.
    pub exact_name: Option<String>,
    /// Suppress the identifier unless a name is also given.
    pub force_disable: bool,
    /// Generate an identifier even when globally disabled.
    pub force_enable: bool,
}

impl OverrideFlags {
    /// No overrides: the global configuration decides.
    pub fn none() -> Self {
        Self::default()
    }

    /// Request an explicit, namespaced name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            explicit_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Request an exact name used verbatim.
    pub fn exact(name: impl Into<String>) -> Self {
        Self {
            exact_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Suppress the identifier for this node.
    pub fn disabled() -> Self {
        Self {
            force_disable: true,
            ..Self::default()
        }
    }

    /// Generate an identifier for this node regardless of the global switch.
    pub fn enabled() -> Self {
        Self {
            force_enable: true,
            ..Self::default()
        }
    }

    /// Set the explicit name.
    pub fn with_explicit_name(mut self, name: impl Into<String>) -> Self {
        self.explicit_name = Some(name.into());
        self
    }

    /// Set the exact name.
    pub fn with_exact_name(mut self, name: impl Into<String>) -> Self {
        self.exact_name = Some(name.into());
        self
    }

    /// Set the force-disable flag.
    pub fn with_force_disable(mut self, disable: bool) -> Self {
        self.force_disable = disable;
        self
    }

    /// Set the force-enable flag.
    pub fn with_force_enable(mut self, enable: bool) -> Self {
        self.force_enable = enable;
        self
    }

    /// Returns `true` if an explicit or exact name is present.
    pub fn has_name(&self) -> bool {
        self.explicit_name.is_some() || self.exact_name.is_some()
    }

    /// Returns `true` if both force flags are set.
    pub fn is_contradictory(&self) -> bool {
        self.force_disable && self.force_enable
    }
}
