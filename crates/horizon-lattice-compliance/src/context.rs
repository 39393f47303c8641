//! Breadcrumb context accumulated while a UI tree is built.
//!
//! A [`HierarchyContext`] records where in the tree a node sits: the ordered
//! list of named scopes (screen, region, nested component) entered on the way
//! down. Contexts are immutable values. [`HierarchyContext::push`] returns a
//! new context for the child scope and leaves the parent untouched, so two
//! sibling subtrees always start from the same parent but never share a
//! context.
//!
//! [`ContextStack`] is the mutable cursor a build pass uses to follow the
//! tree's push/pop callbacks.
//!
//! # Example
//!
//! ```
//! use horizon_lattice_compliance::HierarchyContext;
//!
//! let root = HierarchyContext::root();
//! let settings = root.push("Settings");
//! let account = settings.push("Account Details");
//!
//! assert_eq!(account.segments(), ["Settings", "Account_Details"]);
//! assert!(root.is_root());
//! ```

use std::fmt;

use crate::sanitize::{DEFAULT_MAX_LENGTH, sanitize};

/// One named scope: the caller's spelling and its sanitized token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Segment {
    raw: String,
    token: String,
}

/// An immutable breadcrumb of sanitized scope names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HierarchyContext {
    segments: Vec<Segment>,
    max_segment_length: usize,
}

impl HierarchyContext {
    /// The empty context at the top of a tree.
    pub fn root() -> Self {
        Self::with_max_segment_length(DEFAULT_MAX_LENGTH)
    }

    /// The empty context, bounding every pushed segment to `max_segment_length`.
    pub fn with_max_segment_length(max_segment_length: usize) -> Self {
        Self {
            segments: Vec::new(),
            max_segment_length,
        }
    }

    /// Build a context by pushing each segment in order.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        segments
            .into_iter()
            .fold(Self::root(), |ctx, segment| ctx.push(segment.as_ref()))
    }

    /// Return the context for a child scope named `segment`.
    pub fn push(&self, segment: &str) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(Segment {
            raw: segment.to_string(),
            token: sanitize(segment, self.max_segment_length),
        });
        Self {
            segments,
            max_segment_length: self.max_segment_length,
        }
    }

    /// The enclosing context, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
            max_segment_length: self.max_segment_length,
        })
    }

    /// Sanitized segments, outermost first.
    pub fn segments(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.token.as_str()).collect()
    }

    /// Segments as the caller spelled them, outermost first.
    pub fn raw_segments(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.raw.as_str()).collect()
    }

    /// Owned copy of the sanitized segments.
    pub fn breadcrumb(&self) -> Vec<String> {
        self.segments.iter().map(|s| s.token.clone()).collect()
    }

    /// The innermost segment.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(|s| s.token.as_str())
    }

    /// Number of scopes entered.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if no scope has been entered.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Bound applied to each pushed segment.
    pub fn max_segment_length(&self) -> usize {
        self.max_segment_length
    }
}

impl Default for HierarchyContext {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for HierarchyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment.token)?;
        }
        Ok(())
    }
}

/// The push/pop cursor a build pass keeps while walking the tree.
///
/// The bottom of the stack is the root context and is never popped.
#[derive(Debug, Clone)]
pub struct ContextStack {
    stack: Vec<HierarchyContext>,
}

impl ContextStack {
    /// Create a stack whose bottom is `root`.
    pub fn new(root: HierarchyContext) -> Self {
        Self { stack: vec![root] }
    }

    /// The context for the scope currently being built.
    pub fn current(&self) -> &HierarchyContext {
        // The root is never popped, so the stack is never empty.
        &self.stack[self.stack.len() - 1]
    }

    /// Enter a child scope.
    pub fn push(&mut self, segment: &str) -> &HierarchyContext {
        let next = self.current().push(segment);
        self.stack.push(next);
        self.current()
    }

    /// Leave the current scope.
    ///
    /// Returns the context that was left, or `None` (leaving the stack
    /// unchanged) when already at the root.
    pub fn pop(&mut self) -> Option<HierarchyContext> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    /// Number of scopes entered above the root.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }
}
