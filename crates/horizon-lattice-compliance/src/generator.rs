//! Identifier composition and collision avoidance.
//!
//! A namespaced identifier is `namespace.breadcrumb….name`, every segment
//! sanitized on its own. Within one [`CollisionTable`] the first use of a
//! composed base is returned unchanged and later uses get `_2`, `_3`, …
//!
//! Output depends only on the resolved name, the context content, the
//! configuration and the table's prior contents. Two passes over the same
//! tree therefore produce the same identifiers.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ComplianceConfig;
use crate::context::HierarchyContext;
use crate::resolver::ResolvedName;
use crate::sanitize::{sanitize, sanitize_path};

/// An identifier produced for one node in one render.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneratedIdentifier {
    /// The unsanitized inputs joined with `.`.
    pub raw: String,
    /// The final identifier, including any collision suffix.
    pub sanitized: String,
    /// The sanitized breadcrumb the node was generated under.
    pub breadcrumb: Vec<String>,
    /// Collision suffix appended to the base, if any.
    pub collision_suffix: Option<u32>,
}

impl GeneratedIdentifier {
    /// The final identifier.
    pub fn as_str(&self) -> &str {
        &self.sanitized
    }
}

impl fmt::Display for GeneratedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sanitized)
    }
}

impl AsRef<str> for GeneratedIdentifier {
    fn as_ref(&self) -> &str {
        &self.sanitized
    }
}

/// Per-pass record of issued identifiers.
///
/// Create one per independent tree build. Sharing a table across unrelated
/// screens produces spurious suffixes.
#[derive(Debug, Clone, Default)]
pub struct CollisionTable {
    /// Composed base -> number of times it was requested.
    counts: HashMap<String, u32>,
    issued: HashSet<String>,
}

impl CollisionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a unique identifier for `base`.
    ///
    /// Returns the identifier and the suffix that was appended, if any. A
    /// candidate already issued under another base (for example an explicit
    /// name of `Item_2`) is skipped.
    pub fn issue(&mut self, base: &str) -> (String, Option<u32>) {
        let count = self.counts.entry(base.to_string()).or_insert(0);

        loop {
            *count = count.saturating_add(1);
            let (candidate, suffix) = if *count == 1 {
                (base.to_string(), None)
            } else {
                (format!("{base}_{count}"), Some(*count))
            };

            if self.issued.insert(candidate.clone()) || *count == u32::MAX {
                return (candidate, suffix);
            }
        }
    }

    /// How many times `base` has been requested.
    pub fn requests(&self, base: &str) -> u32 {
        self.counts.get(base).copied().unwrap_or(0)
    }

    /// Returns `true` if `identifier` has been issued.
    pub fn contains(&self, identifier: &str) -> bool {
        self.issued.contains(identifier)
    }

    /// Number of identifiers issued.
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }

    /// Forget everything, as at the start of a new pass.
    pub fn clear(&mut self) {
        self.counts.clear();
        self.issued.clear();
    }
}

/// Produce the identifier for a resolved node.
///
/// Returns `None` for [`ResolvedName::Suppress`]. Exact names are sanitized
/// as dotted paths and bypass the namespace, the breadcrumb and `table`.
pub fn generate(
    resolved: &ResolvedName,
    context: &HierarchyContext,
    table: &mut CollisionTable,
    config: &ComplianceConfig,
) -> Option<GeneratedIdentifier> {
    let ResolvedName::Generate { name, exact } = resolved else {
        return None;
    };
    let max = config.max_segment_length;

    if *exact {
        return Some(GeneratedIdentifier {
            raw: name.clone(),
            sanitized: sanitize_path(name, max),
            breadcrumb: context.breadcrumb(),
            collision_suffix: None,
        });
    }

    let namespace = config.namespace.trim();
    let mut raw_parts: Vec<&str> = Vec::with_capacity(context.depth() + 2);
    let mut parts: Vec<String> = Vec::with_capacity(context.depth() + 2);

    if !namespace.is_empty() {
        raw_parts.push(namespace);
        parts.push(sanitize(namespace, max));
    }
    raw_parts.extend(context.raw_segments());
    parts.extend(context.breadcrumb());
    raw_parts.push(name.as_str());
    parts.push(sanitize(name, max));

    let (sanitized, collision_suffix) = table.issue(&parts.join("."));

    Some(GeneratedIdentifier {
        raw: raw_parts.join("."),
        sanitized,
        breadcrumb: context.breadcrumb(),
        collision_suffix,
    })
}
