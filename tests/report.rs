use std::fs;

use spacetime_curvature::config::{ReportConfig, Settings};
use spacetime_curvature::prelude::*;
use spacetime_curvature::report;

#[test]
fn writes_and_overwrites_the_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tensor_output.tex");
    fs::write(&path, "stale contents that must disappear").unwrap();

    let config = ReportConfig {
        output: path.clone(),
        metric: MetricDefinition::Preset {
            family: MetricFamily::Schwarzschild,
        },
        ..ReportConfig::default()
    };
    let report = report::run(&config).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, report.render());
    assert!(!written.contains("stale"));
    assert!(written.contains("\\section*{Non-zero Christoffel Symbols}"));
    assert!(written.contains("\\section*{Ricci Scalar}\n\\[ R = 0 \\]\n"));
}

#[test]
fn static_spherical_keeps_undefined_functions() {
    let g = MetricFamily::StaticSpherical.metric().unwrap();
    let report =
        generate_report(&LeviCivita, &g, IndexLabels::Numeric, VelocityConvention::Placeholder)
            .unwrap();
    let doc = report.render();
    assert!(doc.contains("\\frac{d}{d r} A{\\left(r \\right)}"));
    assert!(report.count(CurvatureReport::RICCI) > 0);
    assert_eq!(report.count(CurvatureReport::GEODESICS), 4);
}

#[test]
fn custom_metric_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("sphere.tex");
    let settings = Settings::from_toml_str(&format!(
        r#"
        [report]
        output = "{}"
        index_labels = "coordinate"

        [report.metric]
        coordinates = ["theta", "phi"]
        components = [["a^2", "0"], ["0", "a^2*sin(theta)^2"]]
        "#,
        out.display().to_string().replace('\\', "/")
    ))
    .unwrap();
    let report = report::run(&settings.report).unwrap();
    assert!(out.exists());
    let scalar = report.section(CurvatureReport::RICCI_SCALAR).unwrap();
    assert_eq!(scalar.equations()[0].latex, "\\frac{2}{a^{2}}");
    assert_eq!(report.count(CurvatureReport::GEODESICS), 2);
}

#[test]
fn incomplete_metric_is_rejected_before_derivation() {
    let settings = Settings::from_toml_str(
        r#"
        [report.metric]
        coordinates = ["t", "r", "theta", "phi"]
        components = [["-1", "0", "0", "0"], ["0", "1", "0", "0"], ["0", "0", "r^2", "0"]]
        "#,
    )
    .unwrap();
    assert!(matches!(
        report::run(&settings.report),
        Err(Error::IncompleteMetric { row: 3, col: 0 })
    ));
}

#[test]
fn proper_time_convention_changes_geodesic_labels() {
    let g = MetricFamily::Schwarzschild.metric().unwrap();
    let doc = generate_report(
        &LeviCivita,
        &g,
        IndexLabels::Numeric,
        VelocityConvention::ProperTime,
    )
    .unwrap()
    .render();
    assert!(doc.contains("\\frac{d^2 r}{d\\tau^2} &= "));
    assert!(!doc.contains("v_{0}"));
}
