//! Completeness checks over a finished build pass.
//!
//! [`audit`] looks at a [`PassReport`] for gaps a UI test or a screen reader
//! user would hit: nodes with no label, nodes left without an identifier by
//! the global switch, exact names used more than once, and labels that are
//! still raw localization keys with no translation in the [`LabelCatalog`].
//!
//! Nodes that opted out with `force_disable` are counted but are not
//! findings.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::applicator::PassReport;
use crate::label::Locale;
use crate::logging::targets;

/// `<Prefix>.accessibility.<path>`, as used for accessibility label keys.
const KEY_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_]+\.accessibility\.[A-Za-z0-9_.]+$";

/// One `"key" = "value";` entry of a strings table.
const STRINGS_ENTRY_PATTERN: &str = r#""([^"]+)"\s*=\s*"[^"\\]*(?:\\.[^"\\]*)*"\s*;"#;

fn key_regex() -> &'static Regex {
    static KEY: OnceLock<Regex> = OnceLock::new();
    KEY.get_or_init(|| Regex::new(KEY_PATTERN).expect("localization key pattern is valid"))
}

fn strings_entry_regex() -> &'static Regex {
    static ENTRY: OnceLock<Regex> = OnceLock::new();
    ENTRY.get_or_init(|| {
        Regex::new(STRINGS_ENTRY_PATTERN).expect("strings entry pattern is valid")
    })
}

/// Returns `true` if `text` has the shape `<Prefix>.accessibility.<path>`.
///
/// The prefix starts with an ASCII letter and continues with at least one
/// ASCII alphanumeric or `_`. The path is non-empty and may contain `.`.
///
/// ```
/// use horizon_lattice_compliance::audit::looks_like_localization_key;
///
/// assert!(looks_like_localization_key("MyApp.accessibility.button.save"));
/// assert!(!looks_like_localization_key("Save"));
/// ```
pub fn looks_like_localization_key(text: &str) -> bool {
    key_regex().is_match(text)
}

/// Known localization keys per locale.
#[derive(Debug, Clone, Default)]
pub struct LabelCatalog {
    keys: HashMap<Locale, BTreeSet<String>>,
}

impl LabelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `key` is translated for `locale`.
    pub fn insert(&mut self, locale: Locale, key: impl Into<String>) {
        self.keys.entry(locale).or_default().insert(key.into());
    }

    /// Record every key in `keys` for `locale`.
    pub fn extend<I, S>(&mut self, locale: Locale, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = self.keys.entry(locale).or_default();
        set.extend(keys.into_iter().map(Into::into));
    }

    /// Load keys from a strings table of `"key" = "value";` entries.
    ///
    /// Anything that is not an entry (comments, blanks) is ignored. Returns
    /// the number of keys read.
    pub fn load_strings(&mut self, locale: Locale, text: &str) -> usize {
        let keys: Vec<String> = strings_entry_regex()
            .captures_iter(text)
            .map(|caps| caps[1].to_string())
            .collect();
        let count = keys.len();
        tracing::debug!(target: targets::AUDIT, locale = %locale, count, "loaded strings table");
        self.extend(locale, keys);
        count
    }

    /// Returns `true` if `key` is known for `locale` or for its primary
    /// language (`fr` covers `fr-CA`).
    pub fn contains(&self, locale: &Locale, key: &str) -> bool {
        let has = |locale: &Locale| self.keys.get(locale).is_some_and(|set| set.contains(key));
        has(locale) || has(&Locale::new(locale.language()))
    }

    /// Locales with at least one key.
    pub fn locales(&self) -> impl Iterator<Item = &Locale> {
        self.keys.keys()
    }
}

/// A node named in an audit finding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct NodeRef {
    pub breadcrumb: String,
    pub component: String,
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.breadcrumb.is_empty() {
            f.write_str(&self.component)
        } else {
            write!(f, "{} ({})", self.component, self.breadcrumb)
        }
    }
}

/// An exact name issued more than once in a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateExact {
    pub identifier: String,
    pub count: usize,
}

/// A localization key used as a label with no entry for its locale.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct MissingKey {
    pub locale: String,
    pub key: String,
}

/// Findings for one build pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub namespace: String,
    /// Nodes examined.
    pub nodes: usize,
    pub unlabeled: Vec<NodeRef>,
    /// Nodes with no identifier because identifiers were globally disabled.
    pub unidentified: Vec<NodeRef>,
    /// Nodes that opted out of an identifier with `force_disable`.
    pub opted_out: usize,
    pub duplicate_exact: Vec<DuplicateExact>,
    pub missing_keys: Vec<MissingKey>,
}

impl AuditReport {
    /// Returns `true` if there are no findings.
    pub fn is_clean(&self) -> bool {
        self.unlabeled.is_empty()
            && self.unidentified.is_empty()
            && self.duplicate_exact.is_empty()
            && self.missing_keys.is_empty()
    }

    /// Total number of findings.
    pub fn finding_count(&self) -> usize {
        self.unlabeled.len()
            + self.unidentified.len()
            + self.duplicate_exact.len()
            + self.missing_keys.len()
    }

    /// The report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Compliance audit for '{}': {} nodes, {} findings",
            self.namespace,
            self.nodes,
            self.finding_count()
        )?;

        if !self.unlabeled.is_empty() {
            writeln!(f, "\nUnlabeled ({}):", self.unlabeled.len())?;
            for node in &self.unlabeled {
                writeln!(f, "  {node}")?;
            }
        }
        if !self.unidentified.is_empty() {
            writeln!(f, "\nNo identifier ({}):", self.unidentified.len())?;
            for node in &self.unidentified {
                writeln!(f, "  {node}")?;
            }
        }
        if !self.duplicate_exact.is_empty() {
            writeln!(f, "\nDuplicate exact names ({}):", self.duplicate_exact.len())?;
            for dup in &self.duplicate_exact {
                writeln!(f, "  {} x{}", dup.identifier, dup.count)?;
            }
        }
        if !self.missing_keys.is_empty() {
            writeln!(f, "\nMissing localization keys ({}):", self.missing_keys.len())?;
            let mut by_locale: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
            for missing in &self.missing_keys {
                by_locale.entry(&missing.locale).or_default().push(&missing.key);
            }
            for (locale, keys) in by_locale {
                writeln!(f, "  [{locale}]")?;
                for key in keys {
                    writeln!(f, "    {key}")?;
                }
            }
        }
        Ok(())
    }
}

/// Check `report` for gaps.
///
/// Localization keys are only checked when a `catalog` is given.
pub fn audit(report: &PassReport, catalog: Option<&LabelCatalog>) -> AuditReport {
    let mut unlabeled = Vec::new();
    let mut unidentified = Vec::new();
    let mut opted_out = 0;
    let mut exact_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut missing = BTreeSet::new();

    for entry in &report.entries {
        let node = || NodeRef {
            breadcrumb: entry.breadcrumb.join("."),
            component: entry.component.clone(),
        };
        let applied = &entry.applied;

        match applied.label_text() {
            None => unlabeled.push(node()),
            Some(text) if looks_like_localization_key(text) => {
                if let (Some(catalog), Some(label)) = (catalog, &applied.label) {
                    if !catalog.contains(&label.locale, text) {
                        missing.insert(MissingKey {
                            locale: label.locale.to_string(),
                            key: text.to_string(),
                        });
                    }
                }
            }
            Some(_) => {}
        }

        match applied.identifier_str() {
            None if entry.is_opted_out() => opted_out += 1,
            None => unidentified.push(node()),
            Some(id) if entry.is_exact() => *exact_counts.entry(id).or_insert(0) += 1,
            Some(_) => {}
        }
    }

    let duplicate_exact = exact_counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(identifier, count)| DuplicateExact {
            identifier: identifier.to_string(),
            count,
        })
        .collect();

    let audit = AuditReport {
        namespace: report.namespace.clone(),
        nodes: report.entries.len(),
        unlabeled,
        unidentified,
        opted_out,
        duplicate_exact,
        missing_keys: missing.into_iter().collect(),
    };

    tracing::info!(
        target: targets::AUDIT,
        namespace = %audit.namespace,
        nodes = audit.nodes,
        findings = audit.finding_count(),
        opted_out = audit.opted_out,
        "audit complete"
    );
    audit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applicator::{BuildPass, ComplianceApplicator, ComplianceLevel, NodeContent};
    use crate::config::{ComplianceConfig, SharedConfig};
    use crate::overrides::OverrideFlags;

    fn run_with(
        config: ComplianceConfig,
        locale: &str,
        build: impl FnOnce(&mut BuildPass<'_>),
    ) -> PassReport {
        let applicator =
            ComplianceApplicator::new(SharedConfig::new(config)).with_locale(Locale::new(locale));
        let mut pass = applicator.begin_pass();
        build(&mut pass);
        pass.finish()
    }

    fn run(locale: &str, build: impl FnOnce(&mut BuildPass<'_>)) -> PassReport {
        run_with(ComplianceConfig::new("App"), locale, build)
    }

    #[test]
    fn test_key_shape() {
        assert!(looks_like_localization_key("App.accessibility.save"));
        assert!(looks_like_localization_key("My_App2.accessibility.form.field_1"));
        assert!(!looks_like_localization_key("A.accessibility.save"));
        assert!(!looks_like_localization_key("1App.accessibility.save"));
        assert!(!looks_like_localization_key("App.accessibility."));
        assert!(!looks_like_localization_key("App.accessibility.has space"));
        assert!(!looks_like_localization_key("accessibility.save"));
    }

    #[test]
    fn test_clean_pass() {
        let report = run("en", |pass| {
            pass.apply(
                &mut NodeContent::new("Button").with_content("Save"),
                OverrideFlags::none(),
                ComplianceLevel::Basic,
            );
        });
        let audit = audit(&report, None);
        assert!(audit.is_clean());
        assert_eq!(audit.nodes, 1);
    }

    #[test]
    fn test_unlabeled_and_unidentified() {
        let config = ComplianceConfig::new("App").with_global_enable(false);
        let report = run_with(config, "en", |pass| {
            pass.scope("toolbar", |pass| {
                let mut icon = NodeContent::new("Icon");
                pass.apply(&mut icon, OverrideFlags::none(), ComplianceLevel::Full);
            });
        });
        let audit = audit(&report, None);

        assert_eq!(audit.unlabeled.len(), 1);
        assert_eq!(audit.unidentified.len(), 1);
        assert_eq!(audit.unlabeled[0].to_string(), "Icon (toolbar)");
        assert_eq!(audit.finding_count(), 2);
    }

    #[test]
    fn test_opted_out_nodes_are_not_findings() {
        let report = run("en", |pass| {
            let mut divider = NodeContent::new("Divider").with_label("separator");
            pass.apply(&mut divider, OverrideFlags::disabled(), ComplianceLevel::Basic);
            let mut both = NodeContent::new("Badge").with_content("3");
            let flags = OverrideFlags::disabled().with_force_enable(true);
            pass.apply(&mut both, flags, ComplianceLevel::Full);
        });
        let audit = audit(&report, None);

        assert!(audit.is_clean(), "{audit}");
        assert!(audit.unidentified.is_empty());
        assert_eq!(audit.opted_out, 2);
    }

    #[test]
    fn test_duplicate_exact_names() {
        let report = run("en", |pass| {
            for _ in 0..2 {
                pass.apply(
                    &mut NodeContent::new("Button").with_content("Go"),
                    OverrideFlags::exact("submit"),
                    ComplianceLevel::Basic,
                );
            }
        });
        let audit = audit(&report, None);
        assert_eq!(
            audit.duplicate_exact,
            vec![DuplicateExact {
                identifier: "submit".into(),
                count: 2
            }]
        );
    }

    #[test]
    fn test_missing_keys_per_locale() {
        let key = "App.accessibility.button.save";
        let report = run("fr-CA", |pass| {
            pass.apply(
                &mut NodeContent::new("Button").with_label(key),
                OverrideFlags::none(),
                ComplianceLevel::Basic,
            );
        });

        let mut catalog = LabelCatalog::new();
        catalog.insert(Locale::new("en"), key);
        let audit_fr = audit(&report, Some(&catalog));
        assert_eq!(
            audit_fr.missing_keys,
            vec![MissingKey {
                locale: "fr-CA".into(),
                key: key.into()
            }]
        );

        catalog.insert(Locale::new("fr"), key);
        assert!(audit(&report, Some(&catalog)).is_clean());
    }

    #[test]
    fn test_keys_unchecked_without_catalog() {
        let report = run("de", |pass| {
            pass.apply(
                &mut NodeContent::new("Button").with_label("App.accessibility.close"),
                OverrideFlags::none(),
                ComplianceLevel::Basic,
            );
        });
        assert!(audit(&report, None).missing_keys.is_empty());
    }

    #[test]
    fn test_load_strings() {
        let text = r#"
/* Buttons */
"App.accessibility.button.save" = "Enregistrer";
"App.accessibility.button.cancel" = "Annuler";

not a pair
"#;
        let mut catalog = LabelCatalog::new();
        assert_eq!(catalog.load_strings(Locale::new("fr"), text), 2);
        assert!(catalog.contains(&Locale::new("fr"), "App.accessibility.button.cancel"));
        assert!(!catalog.contains(&Locale::new("en"), "App.accessibility.button.cancel"));
        assert_eq!(catalog.locales().collect::<Vec<_>>(), [&Locale::new("fr")]);
    }

    #[test]
    fn test_report_formats() {
        let report = run("en", |pass| {
            let mut spacer = NodeContent::new("Spacer");
            pass.apply(&mut spacer, OverrideFlags::none(), ComplianceLevel::Basic);
        });
        let audit = audit(&report, None);

        let text = audit.to_string();
        assert!(text.starts_with("Compliance audit for 'App': 1 nodes, 1 findings"));
        assert!(text.contains("Unlabeled (1):"));

        let json: serde_json::Value = serde_json::from_str(&audit.to_json().unwrap()).unwrap();
        assert_eq!(json["unlabeled"][0]["component"], "Spacer");
        assert_eq!(json["nodes"], 1);
    }
}
