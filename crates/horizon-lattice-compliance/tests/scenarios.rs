//! End-to-end tests driving a build pass the way a renderer would.

use std::sync::Arc;

use horizon_lattice_compliance::prelude::*;
use horizon_lattice_compliance::sanitize::PLACEHOLDER;
use horizon_lattice_compliance::{LabelSource, PassReport, PrecedenceRule, RecordingSink, audit};

/// A node type owned by the rendering layer.
#[derive(Default)]
struct Widget {
    kind: &'static str,
    text: Option<String>,
    identifier: Option<String>,
    label: Option<String>,
}

impl Widget {
    fn new(kind: &'static str, text: Option<&str>) -> Self {
        Self {
            kind,
            text: text.map(str::to_string),
            ..Self::default()
        }
    }
}

impl ComplianceNode for Widget {
    fn component_name(&self) -> &str {
        self.kind
    }

    fn content_text(&self) -> Option<String> {
        self.text.clone()
    }

    fn attach_compliance(&mut self, applied: &AppliedCompliance) {
        self.identifier = applied.identifier_str().map(str::to_string);
        self.label = applied.label_text().map(str::to_string);
    }
}

fn applicator(namespace: &str) -> ComplianceApplicator {
    ComplianceApplicator::new(SharedConfig::new(ComplianceConfig::new(namespace)))
}

#[test]
fn explicit_name_under_namespace_and_scope() {
    let applicator = applicator("TestApp");
    let mut pass = applicator.begin_pass();

    let mut button = Widget::new("Button", Some("Tap me"));
    pass.scope("main", |pass| {
        pass.apply(&mut button, OverrideFlags::named("TestButton"), ComplianceLevel::Basic);
    });

    assert_eq!(button.identifier.as_deref(), Some("TestApp.main.TestButton"));
    assert_eq!(button.label.as_deref(), Some("Tap me"));
}

#[test]
fn force_disable_without_name_produces_no_identifier() {
    let applicator = applicator("TestApp");
    let mut pass = applicator.begin_pass();

    let mut button = Widget::new("Button", Some("Tap me"));
    pass.scope("main", |pass| {
        pass.apply(&mut button, OverrideFlags::disabled(), ComplianceLevel::Basic);
    });

    assert_eq!(button.identifier, None);
    assert_eq!(button.label.as_deref(), Some("Tap me"));
}

#[test]
fn sibling_collisions_are_suffixed() {
    let applicator = applicator("TestApp");
    let mut pass = applicator.begin_pass();

    let mut rows = [Widget::new("Item", Some("A")), Widget::new("Item", Some("B"))];
    pass.scope("list", |pass| {
        for row in &mut rows {
            pass.apply(row, OverrideFlags::none(), ComplianceLevel::Basic);
        }
    });

    assert_eq!(rows[0].identifier.as_deref(), Some("TestApp.list.Item"));
    assert_eq!(rows[1].identifier.as_deref(), Some("TestApp.list.Item_2"));
}

#[test]
fn empty_explicit_name_becomes_placeholder() {
    let applicator = applicator("TestApp");
    let mut pass = applicator.begin_pass();

    let mut node = Widget::new("Button", None);
    pass.apply(&mut node, OverrideFlags::named(""), ComplianceLevel::Basic);

    let id = node.identifier.expect("identifier generated");
    assert!(!id.is_empty());
    assert_eq!(id, format!("TestApp.{PLACEHOLDER}"));
}

#[test]
fn exact_name_is_used_verbatim() {
    let applicator = applicator("TestApp");
    let mut pass = applicator.begin_pass();

    let mut node = Widget::new("Button", Some("Sign in"));
    pass.scope("main", |pass| {
        pass.scope("form", |pass| {
            pass.apply(&mut node, OverrideFlags::exact("login_submit"), ComplianceLevel::Basic);
        });
    });

    assert_eq!(node.identifier.as_deref(), Some("login_submit"));
}

fn render(applicator: &ComplianceApplicator, locale_text: [&str; 3]) -> PassReport {
    let mut pass = applicator.begin_pass();
    pass.scope("settings", |pass| {
        pass.apply(
            &mut Widget::new("Title", Some(locale_text[0])),
            OverrideFlags::none(),
            ComplianceLevel::Basic,
        );
        pass.scope("list", |pass| {
            for &text in &locale_text[1..] {
                pass.apply(
                    &mut Widget::new("Row", Some(text)),
                    OverrideFlags::none(),
                    ComplianceLevel::Full,
                );
            }
        });
        pass.apply(
            &mut Widget::new("Button", Some("OK")),
            OverrideFlags::exact("settings_done"),
            ComplianceLevel::Basic,
        );
    });
    pass.finish()
}

#[test]
fn rerender_yields_identical_identifiers() {
    let applicator = applicator("App");
    let first = render(&applicator, ["Settings", "Wi-Fi", "Bluetooth"]);
    let second = render(&applicator, ["Settings", "Wi-Fi", "Bluetooth"]);

    assert_eq!(first, second);
    assert_eq!(
        first.identifiers().collect::<Vec<_>>(),
        [
            "App.settings.Title",
            "App.settings.list.Row",
            "App.settings.list.Row_2",
            "settings_done"
        ]
    );
}

#[test]
fn identifiers_do_not_follow_localized_content() {
    let applicator = applicator("App");
    let english = render(&applicator, ["Settings", "Wi-Fi", "Bluetooth"]);
    let french = render(&applicator, ["Réglages", "Wi-Fi", "Bluetooth"]);

    assert!(english.identifiers().eq(french.identifiers()));
    assert_eq!(english.entries[0].applied.label_text(), Some("Settings"));
    assert_eq!(french.entries[0].applied.label_text(), Some("Réglages"));
}

#[test]
fn global_disable_with_local_force_enable() {
    let config = SharedConfig::new(ComplianceConfig::new("App").with_global_enable(false));
    let applicator = ComplianceApplicator::new(config);
    let mut pass = applicator.begin_pass();

    let mut plain = Widget::new("Label", Some("x"));
    let mut forced = Widget::new("Toggle", Some("y"));
    pass.apply(&mut plain, OverrideFlags::none(), ComplianceLevel::Basic);
    pass.apply(&mut forced, OverrideFlags::enabled(), ComplianceLevel::Basic);

    assert_eq!(plain.identifier, None);
    assert_eq!(forced.identifier.as_deref(), Some("App.Toggle"));
}

#[test]
fn debug_logging_records_every_outcome() {
    let sink = Arc::new(RecordingSink::new());
    let config = SharedConfig::new(ComplianceConfig::new("App").with_debug_logging(true));
    let applicator = ComplianceApplicator::new(config.clone()).with_sink(sink.clone());

    let mut pass = applicator.begin_pass();
    pass.scope("main", |pass| {
        pass.apply(&mut Widget::new("A", None), OverrideFlags::none(), ComplianceLevel::Basic);
        pass.apply(
            &mut Widget::new("B", None),
            OverrideFlags::disabled().with_force_enable(true),
            ComplianceLevel::Basic,
        );
        pass.apply(&mut Widget::new("C", None), OverrideFlags::none(), ComplianceLevel::None);
    });

    let records = sink.take();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].breadcrumb, ["main"]);
    assert_eq!(records[0].to_string(), "[main] A -> App.main.A via global_enable");
    assert!(records[1].ambiguous);
    assert_eq!(records[1].rule, PrecedenceRule::ForceDisable);
    assert_eq!(records[1].identifier, None);

    config.set_debug_logging(false);
    let mut pass = applicator.begin_pass();
    pass.apply(&mut Widget::new("A", None), OverrideFlags::none(), ComplianceLevel::Basic);
    assert!(sink.is_empty());
}

#[test]
fn tracing_sink_under_env_filter() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            "horizon_lattice_compliance=debug",
        ))
        .with_test_writer()
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let config = SharedConfig::new(ComplianceConfig::new("App").with_debug_logging(true));
        let applicator = ComplianceApplicator::new(config)
            .with_sink(Arc::new(horizon_lattice_compliance::TracingSink));
        let mut pass = applicator.begin_pass();
        let applied = pass.apply(
            &mut Widget::new("Button", Some("Go")),
            OverrideFlags::none(),
            ComplianceLevel::Full,
        );
        assert_eq!(applied.identifier_str(), Some("App.Button"));
        pass.finish();
    });
}

#[test]
fn full_level_on_every_platform() {
    for platform in [
        Platform::Ios,
        Platform::Macos,
        Platform::Android,
        Platform::Windows,
        Platform::Linux,
        Platform::Web,
    ] {
        let config = SharedConfig::new(ComplianceConfig::new("App").with_platform(platform));
        let applicator = ComplianceApplicator::new(config);
        let mut pass = applicator.begin_pass();
        let applied = pass.apply(
            &mut Widget::new("Button", None),
            OverrideFlags::none(),
            ComplianceLevel::Full,
        );

        let visual = applied.visual.expect("visual compliance at Full");
        assert_eq!(visual.platform, platform);
        assert!(visual.min_target.width > 0.0);
        assert!(visual.focus.width > 0.0);
    }
}

#[test]
fn label_sources_through_the_applicator() {
    let applicator = applicator("App").with_locale(Locale::new("en"));
    let mut pass = applicator.begin_pass();

    let mut field = NodeContent::new("TextField").with_placeholder("Email address");
    let applied = pass.apply(&mut field, OverrideFlags::none(), ComplianceLevel::Basic);
    let label = applied.label.expect("label derived at Basic");
    assert_eq!(label.source, LabelSource::Placeholder);
    assert_eq!(label.locale.as_str(), "en");

    let mut labelled = NodeContent::new("Icon")
        .with_label("Close")
        .with_content("×");
    let applied = pass.apply(&mut labelled, OverrideFlags::none(), ComplianceLevel::Basic);
    assert_eq!(applied.label_text(), Some("Close"));
}

#[test]
fn audit_after_pass() {
    let applicator = applicator("App");
    let mut pass = applicator.begin_pass();
    pass.apply(&mut Widget::new("Divider", None), OverrideFlags::none(), ComplianceLevel::Basic);
    for _ in 0..2 {
        let mut button = Widget::new("Button", Some("Go"));
        pass.apply(&mut button, OverrideFlags::exact("go"), ComplianceLevel::Basic);
    }

    let report = audit(&pass.finish(), None);
    assert_eq!(report.nodes, 3);
    assert_eq!(report.unlabeled.len(), 1);
    assert_eq!(report.duplicate_exact.len(), 1);
    assert!(!report.is_clean());
}
