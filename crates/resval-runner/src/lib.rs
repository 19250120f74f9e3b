pub mod config;
pub mod doctor;
pub mod runner;
pub mod scenario;
pub mod util;

pub use config::*;
pub use doctor::*;
pub use runner::*;
pub use util::*;

#[cfg(test)]
mod scenario_tests {
    use super::scenario::*;
    use std::path::Path;

    fn run(dir: &str) -> ScenarioResult {
        let p = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/datasets").join(dir);
        let res = simulate(&p).unwrap();
        assert!(res.mismatches.is_empty(), "{dir}: {:#?}", res.mismatches);
        res
    }

    #[test]
    fn scenario_sc01_clean_dataset_scores_100() {
        let res = run("SC-01-clean");
        assert!(res.report.findings.is_empty());
    }

    #[test]
    fn scenario_sc02_missing_number() {
        let res = run("SC-02-missing-number");
        assert!(res.report.critical_errors >= 1);
    }

    #[test]
    fn scenario_sc03_self_parent() {
        run("SC-03-self-parent");
    }

    #[test]
    fn scenario_sc04_inverted_vigency() {
        run("SC-04-inverted-vigency");
    }

    #[test]
    fn scenario_sc05_duplicate_numbers() {
        run("SC-05-duplicate-numbers");
    }

    #[test]
    fn scenario_sc06_empty_dataset() {
        let res = run("SC-06-empty");
        assert_eq!(res.report.validators_run, 5);
    }

    #[test]
    fn scenario_sc07_mixed_yaml_bundle() {
        let res = run("SC-07-mixed-bundle");
        assert_eq!(res.report.critical_errors, 6);
        assert_eq!(res.report.warnings, 2);
    }

    #[test]
    fn every_fixture_has_expectations() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/datasets");
        for entry in std::fs::read_dir(&root).unwrap() {
            let dir = entry.unwrap().path();
            let exp = load_expected(&dir).unwrap();
            assert_eq!(dir.file_name().unwrap().to_str().unwrap(), exp.scenario_id);
        }
    }
}
