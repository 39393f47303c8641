//! Attaching identifiers, labels and visual compliance to nodes.
//!
//! [`ComplianceApplicator`] holds the long-lived collaborators: the shared
//! configuration, the diagnostic sink and the visual-compliance provider.
//! Each tree build runs inside a [`BuildPass`], which owns the breadcrumb
//! stack and the collision table for that build and reads one configuration
//! snapshot throughout.
//!
//! # Example
//!
//! ```
//! use horizon_lattice_compliance::{
//!     ComplianceApplicator, ComplianceConfig, ComplianceLevel, NodeContent, OverrideFlags,
//!     SharedConfig,
//! };
//!
//! let config = SharedConfig::new(ComplianceConfig::new("TestApp"));
//! let applicator = ComplianceApplicator::new(config);
//!
//! let mut pass = applicator.begin_pass();
//! let applied = pass.scope("main", |pass| {
//!     let mut button = NodeContent::new("Button").with_content("Save");
//!     pass.apply(&mut button, OverrideFlags::named("TestButton"), ComplianceLevel::Basic)
//! });
//!
//! assert_eq!(applied.identifier_str(), Some("TestApp.main.TestButton"));
//! assert_eq!(applied.label_text(), Some("Save"));
//! ```

use std::sync::Arc;
use std::thread::{self, ThreadId};

use serde::{Deserialize, Serialize};

use crate::config::{ComplianceConfig, SharedConfig};
use crate::context::{ContextStack, HierarchyContext};
use crate::generator::{CollisionTable, GeneratedIdentifier, generate};
use crate::label::{DerivedLabel, Locale, derive_label};
use crate::logging::{DiagnosticSink, NoopSink, ResolutionRecord, span_names, targets};
use crate::overrides::OverrideFlags;
use crate::resolver::{PrecedenceRule, resolve_traced};
use crate::visual::{PlatformGuidelines, VisualCompliance, VisualComplianceProvider};

/// How much instrumentation a node receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceLevel {
    /// Nothing.
    None,
    /// Identifier and label.
    #[default]
    Basic,
    /// Identifier, label and platform visual compliance.
    Full,
}

/// A UI node that can receive compliance results.
///
/// Implemented by the rendering layer's node type. Only
/// [`component_name`](Self::component_name) is required.
pub trait ComplianceNode {
    /// The node's kind, e.g. `"Button"`. Used as the identifier base when no
    /// explicit name is given.
    ///
    /// This should not be visible text: identifiers built from localized
    /// content would change with the language.
    fn component_name(&self) -> &str;

    /// Label supplied explicitly by the caller.
    fn accessible_label(&self) -> Option<String> {
        None
    }

    /// Visible text content.
    fn content_text(&self) -> Option<String> {
        None
    }

    /// Placeholder text, for inputs.
    fn placeholder_text(&self) -> Option<String> {
        None
    }

    /// Receive the result of [`BuildPass::apply`].
    fn attach_compliance(&mut self, _applied: &AppliedCompliance) {}
}

/// A plain [`ComplianceNode`] for callers without their own node type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeContent {
    pub component: String,
    pub label: Option<String>,
    pub content: Option<String>,
    pub placeholder: Option<String>,
    /// The last result attached.
    pub attached: Option<AppliedCompliance>,
}

impl NodeContent {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

impl ComplianceNode for NodeContent {
    fn component_name(&self) -> &str {
        &self.component
    }

    fn accessible_label(&self) -> Option<String> {
        self.label.clone()
    }

    fn content_text(&self) -> Option<String> {
        self.content.clone()
    }

    fn placeholder_text(&self) -> Option<String> {
        self.placeholder.clone()
    }

    fn attach_compliance(&mut self, applied: &AppliedCompliance) {
        self.attached = Some(applied.clone());
    }
}

/// What was attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedCompliance {
    pub level: ComplianceLevel,
    /// `None` when suppressed or at [`ComplianceLevel::None`].
    pub identifier: Option<GeneratedIdentifier>,
    /// `None` only at [`ComplianceLevel::None`].
    pub label: Option<DerivedLabel>,
    /// Present only at [`ComplianceLevel::Full`].
    pub visual: Option<VisualCompliance>,
}

impl AppliedCompliance {
    /// The result for [`ComplianceLevel::None`].
    pub fn empty() -> Self {
        Self {
            level: ComplianceLevel::None,
            identifier: None,
            label: None,
            visual: None,
        }
    }

    /// Returns `true` if nothing was attached.
    pub fn is_empty(&self) -> bool {
        self.identifier.is_none() && self.label.is_none() && self.visual.is_none()
    }

    /// The generated identifier, if any.
    pub fn identifier_str(&self) -> Option<&str> {
        self.identifier.as_ref().map(GeneratedIdentifier::as_str)
    }

    /// The derived label text, if any.
    pub fn label_text(&self) -> Option<&str> {
        self.label.as_ref().and_then(DerivedLabel::as_deref)
    }
}

/// Long-lived entry point that starts build passes.
pub struct ComplianceApplicator {
    config: SharedConfig,
    sink: Arc<dyn DiagnosticSink>,
    provider: Arc<dyn VisualComplianceProvider>,
    locale: Locale,
}

impl ComplianceApplicator {
    /// Create an applicator with a [`NoopSink`], [`PlatformGuidelines`] and an
    /// undetermined locale.
    pub fn new(config: SharedConfig) -> Self {
        Self {
            config,
            sink: Arc::new(NoopSink),
            provider: Arc::new(PlatformGuidelines),
            locale: Locale::undetermined(),
        }
    }

    /// Use `sink` for resolution diagnostics.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Use `provider` for visual-compliance values.
    pub fn with_provider(mut self, provider: Arc<dyn VisualComplianceProvider>) -> Self {
        self.provider = provider;
        self
    }

    /// Locale the node strings are supplied in.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// The shared configuration.
    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Start a tree build.
    ///
    /// The pass snapshots the configuration now and uses a fresh collision
    /// table, so every pass over the same tree yields the same identifiers.
    pub fn begin_pass(&self) -> BuildPass<'_> {
        let config = self.config.snapshot();
        let span = if config.debug_logging {
            tracing::span!(
                target: targets::PASS,
                tracing::Level::DEBUG,
                span_names::BUILD_PASS,
                namespace = %config.namespace
            )
        } else {
            tracing::Span::none()
        };
        let root = HierarchyContext::with_max_segment_length(config.max_segment_length);

        BuildPass {
            applicator: self,
            contexts: ContextStack::new(root),
            table: CollisionTable::new(),
            entries: Vec::new(),
            owner: thread::current().id(),
            span,
            config,
        }
    }
}

impl std::fmt::Debug for ComplianceApplicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComplianceApplicator")
            .field("config", &self.config)
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(ComplianceApplicator: Send, Sync);

/// One node as recorded by a build pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassEntry {
    pub breadcrumb: Vec<String>,
    pub component: String,
    /// The precedence rule that decided the identifier.
    pub rule: PrecedenceRule,
    pub applied: AppliedCompliance,
}

impl PassEntry {
    /// The identifier came from an exact name.
    pub fn is_exact(&self) -> bool {
        self.rule == PrecedenceRule::ExactName
    }

    /// The node asked for no identifier with `force_disable`.
    pub fn is_opted_out(&self) -> bool {
        self.rule == PrecedenceRule::ForceDisable
    }
}

/// Everything a finished build pass applied, in application order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PassReport {
    pub namespace: String,
    pub entries: Vec<PassEntry>,
}

impl PassReport {
    /// Identifiers in application order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| e.applied.identifier_str())
    }
}

/// State for one tree build.
///
/// Not shared between threads: the tree is built on one thread and the pass
/// debug-asserts it is used on the thread that began it.
///
/// With `debug_logging` off the pass emits no span and no debug events. Only
/// misuse (popping the root, finishing with open scopes) is logged.
pub struct BuildPass<'a> {
    applicator: &'a ComplianceApplicator,
    config: ComplianceConfig,
    contexts: ContextStack,
    table: CollisionTable,
    entries: Vec<PassEntry>,
    owner: ThreadId,
    span: tracing::Span,
}

impl<'a> BuildPass<'a> {
    /// The configuration snapshot this pass resolves against.
    pub fn config(&self) -> &ComplianceConfig {
        &self.config
    }

    /// The breadcrumb for the scope currently being built.
    pub fn context(&self) -> &HierarchyContext {
        self.contexts.current()
    }

    /// Enter a named container scope.
    pub fn push(&mut self, segment: &str) {
        self.debug_assert_owner();
        self.contexts.push(segment);
    }

    /// Leave the current scope. Returns `None` at the root.
    pub fn pop(&mut self) -> Option<HierarchyContext> {
        self.debug_assert_owner();
        let left = self.contexts.pop();
        if left.is_none() {
            tracing::warn!(target: targets::PASS, "pop at root scope ignored");
        }
        left
    }

    /// Run `build` inside a named scope, popping it afterwards.
    pub fn scope<R>(&mut self, segment: &str, build: impl FnOnce(&mut Self) -> R) -> R {
        self.push(segment);
        let result = build(self);
        self.pop();
        result
    }

    /// Resolve and attach an identifier, a label and (at
    /// [`ComplianceLevel::Full`]) visual compliance for `node`.
    ///
    /// Call once per node per render.
    pub fn apply<N>(
        &mut self,
        node: &mut N,
        overrides: OverrideFlags,
        level: ComplianceLevel,
    ) -> AppliedCompliance
    where
        N: ComplianceNode + ?Sized,
    {
        self.debug_assert_owner();
        if level == ComplianceLevel::None {
            return AppliedCompliance::empty();
        }
        let _entered = self.span.enter();

        let component = node.component_name().to_string();
        let resolution = resolve_traced(&overrides, &self.config, &component);
        let identifier = generate(
            &resolution.name,
            self.contexts.current(),
            &mut self.table,
            &self.config,
        );

        let label = derive_label(
            node.accessible_label().as_deref(),
            node.content_text().as_deref(),
            node.placeholder_text().as_deref(),
            &self.applicator.locale,
        );

        let visual = (level == ComplianceLevel::Full)
            .then(|| self.applicator.provider.visual_compliance(self.config.platform));

        let breadcrumb = self.contexts.current().breadcrumb();

        if self.config.debug_logging {
            self.applicator.sink.record(&ResolutionRecord {
                breadcrumb: breadcrumb.clone(),
                component: component.clone(),
                flags: overrides,
                level,
                rule: resolution.rule,
                ambiguous: resolution.ambiguous,
                decision: resolution.name,
                identifier: identifier.as_ref().map(|id| id.sanitized.clone()),
            });
        }

        let applied = AppliedCompliance {
            level,
            identifier,
            label: Some(label),
            visual,
        };
        node.attach_compliance(&applied);

        self.entries.push(PassEntry {
            breadcrumb,
            component,
            rule: resolution.rule,
            applied: applied.clone(),
        });

        applied
    }

    /// Number of nodes applied so far.
    pub fn applied_count(&self) -> usize {
        self.entries.len()
    }

    /// End the pass and return what it applied.
    pub fn finish(self) -> PassReport {
        if self.contexts.depth() > 0 {
            tracing::warn!(
                target: targets::PASS,
                depth = self.contexts.depth(),
                "build pass finished with unbalanced scopes"
            );
        }
        if self.config.debug_logging {
            tracing::debug!(
                target: targets::PASS,
                nodes = self.entries.len(),
                identifiers = self.table.len(),
                "build pass finished"
            );
        }

        PassReport {
            namespace: self.config.namespace,
            entries: self.entries,
        }
    }

    fn debug_assert_owner(&self) {
        debug_assert_eq!(
            thread::current().id(),
            self.owner,
            "BuildPass used from a different thread than the one that began it"
        );
    }
}
