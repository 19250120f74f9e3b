use std::collections::HashSet;

use chrono::NaiveDate;
use resval_core::{
    CompanyDirectory, CompanyId, DirectoryError, FindingKind, Report, Resolution, ResolutionId, ResolutionStatus,
    StaticDirectory,
};
use resval_validate::{
    ConsistencyValidator, IntegrityValidator, Orchestrator, RelationshipValidator, TemporalValidator, ValidateInput,
    Validator,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn without_timing(mut r: Report) -> Report {
    r.elapsed_seconds = 0.0;
    r
}

fn mixed_dataset() -> Vec<Resolution> {
    vec![
        Resolution::new("1").with_number("R-0001-2025").with_company("c1"),
        Resolution::new("2").with_number("").with_company("c1"),
        Resolution::new("3").with_number("R-0001-2025").with_company("c2").with_parent("4"),
        Resolution::new("4").with_number("R-0004-2025").with_company("c2").with_parent("3"),
        Resolution::new("5")
            .with_number("R-5-25")
            .with_company("ghost")
            .with_vigency(date("2024-01-01"), date("2024-06-30"))
            .with_status(ResolutionStatus::Active),
        Resolution::new("6").with_number("R-0006-2025").with_parent("nowhere"),
    ]
}

#[test]
fn scenario_missing_number() {
    let records = vec![Resolution::new("1").with_number("").with_company("c1")];
    let findings = IntegrityValidator.eval(&ValidateInput::new(&records, today())).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].id, "missing-number");
    assert_eq!(findings[0].kind, FindingKind::Error);
    assert_eq!(findings[0].affected_ids, vec![ResolutionId::from_str("1")]);

    let report = Orchestrator::new().pin_today(today()).run(&records, None).unwrap();
    assert!(report.critical_errors >= 1);
}

#[test]
fn scenario_self_parent() {
    let records = vec![Resolution::new("a").with_parent("a")];
    let findings = RelationshipValidator.eval(&ValidateInput::new(&records, today())).unwrap();
    let f = findings.iter().find(|f| f.id == "circular-references").unwrap();
    assert!(f.affected_ids.contains(&ResolutionId::from_str("a")));
}

#[test]
fn scenario_inverted_vigency() {
    let records = vec![Resolution::new("1").with_vigency(date("2025-06-01"), date("2025-01-01"))];
    let findings = TemporalValidator.eval(&ValidateInput::new(&records, today())).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].id, "invalid-vigency-range");
    assert_eq!(findings[0].kind, FindingKind::Error);
    assert_eq!(findings[0].affected_ids, vec![ResolutionId::from_str("1")]);
}

#[test]
fn scenario_duplicate_numbers() {
    let records = vec![
        Resolution::new("1").with_number("R-0001-2025"),
        Resolution::new("2").with_number("R-0001-2025"),
    ];
    let findings = ConsistencyValidator.eval(&ValidateInput::new(&records, today())).unwrap();
    assert_eq!(findings.len(), 1);
    let affected: HashSet<&str> = findings[0].affected_ids.iter().map(|i| i.as_str()).collect();
    assert_eq!(affected, HashSet::from(["1", "2"]));
}

#[test]
fn scenario_empty_dataset() {
    let report = Orchestrator::new().pin_today(today()).run(&[], None).unwrap();
    assert_eq!(report.total_records, 0);
    assert_eq!(report.success_score, 100);
    assert!(report.findings.is_empty());
}

#[test]
fn three_node_chain_is_reported_as_a_whole() {
    let records = vec![
        Resolution::new("A").with_parent("B"),
        Resolution::new("B").with_parent("C"),
        Resolution::new("C").with_parent("A"),
    ];
    let report = Orchestrator::new().pin_today(today()).run(&records, None).unwrap();
    let f = report.finding("circular-references").unwrap();
    let affected: HashSet<&str> = f.affected_ids.iter().map(|i| i.as_str()).collect();
    assert!(affected.is_superset(&HashSet::from(["A", "B", "C"])));
}

#[test]
fn findings_follow_validator_run_order() {
    let records = mixed_dataset();
    let dir = StaticDirectory::new(vec![CompanyId::from_str("c1"), CompanyId::from_str("c2")]);
    let report = Orchestrator::new().pin_today(today()).run(&records, Some(&dir)).unwrap();
    let ids: Vec<&str> = report.findings.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "missing-number",
            "invalid-number-format",
            "missing-company",
            "orphan-references",
            "circular-references",
            "expired-active",
            "missing-companies",
            "duplicate-numbers",
        ]
    );
    assert_eq!(report.total_records, 6);
    assert_eq!(report.critical_errors, 6);
    assert_eq!(report.warnings, 2);
    // (12 - (12 + 2)) / 12 < 0 -> clamped
    assert_eq!(report.success_score, 0);
    assert_eq!(report.validated_at, today());
}

#[test]
fn repeated_runs_are_identical_apart_from_timing() {
    let records = mixed_dataset();
    let dir = StaticDirectory::new(vec![CompanyId::from_str("c1")]);
    let orch = Orchestrator::new().pin_today(today());
    let a = without_timing(orch.run(&records, Some(&dir)).unwrap());
    let b = without_timing(orch.run(&records, Some(&dir)).unwrap());
    assert_eq!(a, b);
}

#[test]
fn clean_dataset_scores_100() {
    let records = vec![
        Resolution::new("1")
            .with_number("R-0001-2025")
            .with_company("c1")
            .with_vigency(date("2025-01-01"), date("2026-01-01"))
            .with_status(ResolutionStatus::Active),
        Resolution::new("2").with_number("R-0002-2025").with_company("c1").with_parent("1"),
    ];
    let report = Orchestrator::new().pin_today(today()).run(&records, None).unwrap();
    assert!(report.findings.is_empty());
    assert_eq!(report.success_score, 100);
}

struct Unreachable;

impl CompanyDirectory for Unreachable {
    fn exists(&self, _company_id: &CompanyId) -> Result<bool, DirectoryError> {
        Err(DirectoryError::Unavailable("connection refused".into()))
    }
}

#[test]
fn unreachable_directory_degrades_to_no_findings() {
    let records = vec![Resolution::new("1").with_number("R-0001-2025").with_company("c1")];
    let report = Orchestrator::new().pin_today(today()).run(&records, Some(&Unreachable)).unwrap();
    assert!(report.findings.is_empty());
}

#[test]
fn score_stays_within_bounds() {
    for n in 0..20usize {
        let records: Vec<Resolution> = (0..n).map(|i| Resolution::new(format!("r{i}")).with_parent("r0")).collect();
        let report = Orchestrator::new().pin_today(today()).run(&records, None).unwrap();
        assert!(report.success_score <= 100);
    }
}
