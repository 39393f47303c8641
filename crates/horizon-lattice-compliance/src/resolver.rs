//! Enablement resolution: should a node get an identifier, and under which
//! name?
//!
//! The rules, highest precedence first:
//!
//! | # | Condition                         | Outcome                               |
//! |---|-----------------------------------|---------------------------------------|
//! | 1 | `exact_name` set                  | `Generate(exact_name, exact = true)`  |
//! | 2 | `explicit_name` set               | `Generate(explicit_name)`             |
//! | 3 | `force_disable`                   | `Suppress`                            |
//! | 4 | `force_enable`                    | `Generate(inferred)`                  |
//! | 5 | `global_enable`                   | `Generate(inferred)`                  |
//! | 6 | otherwise                         | `Suppress`                            |
//!
//! Names beat every flag. A local `force_enable` beats a global disable, and
//! a local `force_disable` beats a local `force_enable`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ComplianceConfig;
use crate::overrides::OverrideFlags;

/// The outcome of resolution for one node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedName {
    /// Produce an identifier from `name`.
    Generate {
        name: String,
        /// Use `name` verbatim, without namespace, breadcrumb or suffix.
        exact: bool,
    },
    /// Produce no identifier.
    Suppress,
}

impl ResolvedName {
    /// Returns `true` for [`ResolvedName::Suppress`].
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppress)
    }

    /// The name to generate from, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Generate { name, .. } => Some(name),
            Self::Suppress => None,
        }
    }
}

/// The precedence rule that produced a [`ResolvedName`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecedenceRule {
    ExactName,
    ExplicitName,
    ForceDisable,
    ForceEnable,
    GlobalEnable,
    GlobalDisable,
}

impl PrecedenceRule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExactName => "exact_name",
            Self::ExplicitName => "explicit_name",
            Self::ForceDisable => "force_disable",
            Self::ForceEnable => "force_enable",
            Self::GlobalEnable => "global_enable",
            Self::GlobalDisable => "global_disable",
        }
    }
}

impl fmt::Display for PrecedenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A [`ResolvedName`] together with how it was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub name: ResolvedName,
    pub rule: PrecedenceRule,
    /// Both force flags were set. Resolution still succeeds; the flag exists
    /// so the conflict shows up in diagnostics.
    pub ambiguous: bool,
}

/// Decide whether and how to name a node.
///
/// `inferred_name` is used when neither an exact nor an explicit name is
/// given. Pure: the same arguments always give the same result.
pub fn resolve(
    overrides: &OverrideFlags,
    config: &ComplianceConfig,
    inferred_name: &str,
) -> ResolvedName {
    resolve_traced(overrides, config, inferred_name).name
}

/// Like [`resolve`], also reporting the rule that fired.
pub fn resolve_traced(
    overrides: &OverrideFlags,
    config: &ComplianceConfig,
    inferred_name: &str,
) -> Resolution {
    let ambiguous = overrides.is_contradictory();
    let generate = |name: &str, exact: bool| ResolvedName::Generate {
        name: name.to_string(),
        exact,
    };

    let (name, rule) = if let Some(exact) = &overrides.exact_name {
        (generate(exact, true), PrecedenceRule::ExactName)
    } else if let Some(explicit) = &overrides.explicit_name {
        (generate(explicit, false), PrecedenceRule::ExplicitName)
    } else if overrides.force_disable {
        (ResolvedName::Suppress, PrecedenceRule::ForceDisable)
    } else if overrides.force_enable {
        (generate(inferred_name, false), PrecedenceRule::ForceEnable)
    } else if config.global_enable {
        (generate(inferred_name, false), PrecedenceRule::GlobalEnable)
    } else {
        (ResolvedName::Suppress, PrecedenceRule::GlobalDisable)
    };

    Resolution {
        name,
        rule,
        ambiguous,
    }
}
