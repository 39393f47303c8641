//! Deterministic test identifiers and accessibility labels for Horizon
//! Lattice UI trees.
//!
//! While a UI tree is built, each node can be given:
//!
//! - **An identifier**: `namespace.breadcrumb….name`, sanitized, unique
//!   within the build pass and identical on every re-render
//! - **A label**: the explicit label, else the visible text, else the
//!   placeholder
//! - **Visual compliance**: minimum target size, margins and focus indicator
//!   for the target platform
//!
//! Per-node [`OverrideFlags`] and a process-wide [`ComplianceConfig`] decide
//! whether an identifier is produced and under which name.
//!
//! # Example
//!
//! ```
//! use horizon_lattice_compliance::prelude::*;
//!
//! let config = SharedConfig::new(ComplianceConfig::new("TestApp"));
//! let applicator = ComplianceApplicator::new(config);
//! let mut pass = applicator.begin_pass();
//!
//! pass.scope("list", |pass| {
//!     for title in ["First", "Second"] {
//!         let mut row = NodeContent::new("Item").with_content(title);
//!         pass.apply(&mut row, OverrideFlags::none(), ComplianceLevel::Basic);
//!     }
//! });
//!
//! let report = pass.finish();
//! let ids: Vec<_> = report.identifiers().collect();
//! assert_eq!(ids, ["TestApp.list.Item", "TestApp.list.Item_2"]);
//! ```

pub mod applicator;
pub mod audit;
pub mod config;
pub mod context;
pub mod generator;
pub mod label;
pub mod logging;
pub mod overrides;
pub mod resolver;
pub mod sanitize;
pub mod visual;

mod error;

pub use applicator::{
    AppliedCompliance, BuildPass, ComplianceApplicator, ComplianceLevel, ComplianceNode,
    NodeContent, PassEntry, PassReport,
};
pub use audit::{AuditReport, LabelCatalog, audit};
pub use config::{ComplianceConfig, SharedConfig};
pub use context::{ContextStack, HierarchyContext};
pub use error::{ConfigError, Result};
pub use generator::{CollisionTable, GeneratedIdentifier, generate};
pub use label::{DerivedLabel, LabelSource, Locale, derive_label};
pub use logging::{DiagnosticSink, NoopSink, RecordingSink, ResolutionRecord, TracingSink};
pub use overrides::OverrideFlags;
pub use resolver::{PrecedenceRule, Resolution, ResolvedName, resolve, resolve_traced};
pub use sanitize::{sanitize, sanitize_path};
pub use visual::{Platform, PlatformGuidelines, VisualCompliance, VisualComplianceProvider};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::applicator::{
        AppliedCompliance, BuildPass, ComplianceApplicator, ComplianceLevel, ComplianceNode,
        NodeContent,
    };
    pub use crate::config::{ComplianceConfig, SharedConfig};
    pub use crate::context::HierarchyContext;
    pub use crate::label::Locale;
    pub use crate::overrides::OverrideFlags;
    pub use crate::visual::Platform;
}
