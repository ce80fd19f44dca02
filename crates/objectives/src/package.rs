//! Package version objective
//!
//! Checks that a package is deployed on the target at a version one of
//! the declared acceptance rules accepts.

use anyhow::Result;

use crate::context::ObjectiveContext;
use crate::objective::Objective;
use crate::types::PackageInfo;
use crate::version::AcceptanceRule;

/// A package that must be deployed at an acceptable version
#[derive(Debug, Clone)]
pub struct PackageObjective {
    name: String,
    rules: Vec<AcceptanceRule>,
}

/// Outcome of walking the rules for one installed version
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Indices of rules that matched but carry a rejecting verdict,
    /// in declaration order
    pub rejected: Vec<usize>,
    /// Index of the first accepting rule that matched, if any
    pub accepted: Option<usize>,
}

impl Evaluation {
    pub fn is_accepted(&self) -> bool {
        self.accepted.is_some()
    }

    /// Whether any rule matched at all
    pub fn has_match(&self) -> bool {
        self.accepted.is_some() || !self.rejected.is_empty()
    }
}

impl PackageObjective {
    pub fn new(name: impl Into<String>, rules: Vec<AcceptanceRule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[AcceptanceRule] {
        &self.rules
    }

    /// Walk the rules in order against an installed version
    ///
    /// Stops at the first accepting match. Rejecting matches seen before
    /// it are all collected.
    pub fn evaluate(&self, actual: Option<&str>) -> Evaluation {
        let mut evaluation = Evaluation::default();
        for (index, rule) in self.rules.iter().enumerate() {
            if !rule.matches(actual) {
                continue;
            }
            if rule.is_accepting() {
                evaluation.accepted = Some(index);
                break;
            }
            evaluation.rejected.push(index);
        }
        evaluation
    }

    /// Report the rules `evaluate` walked, one rule at a time
    fn report_evaluation(
        &self,
        ctx: &mut ObjectiveContext,
        info: &PackageInfo,
        evaluation: &Evaluation,
    ) {
        let version = info.display_version();
        let walked = evaluation.accepted.map_or(self.rules.len(), |i| i + 1);

        for (index, rule) in self.rules[..walked].iter().enumerate() {
            ctx.reporter.debug(&format!(
                "Checking {} against version {}",
                self.name,
                rule.pattern()
            ));

            let accepted = evaluation.accepted == Some(index);
            if !accepted && !evaluation.rejected.contains(&index) {
                continue;
            }
            ctx.reporter.info(&format!(
                "{} matches actual version {}",
                rule.pattern(),
                version
            ));
            if accepted {
                continue;
            }
            ctx.reporter.error(&format!(
                "Required package {} has version {} that tested {}",
                self.name,
                version,
                rule.verdict()
            ));
            for warning in rule.warnings() {
                ctx.reporter.warn(warning);
            }
        }

        if !evaluation.has_match() {
            ctx.reporter.error(&format!(
                "Required package {} has version {} that was not mentioned in the known versions",
                self.name, version
            ));
        }
    }
}

impl Objective for PackageObjective {
    fn id(&self) -> String {
        self.name.clone()
    }

    fn description(&self) -> String {
        format!(
            "Package {} deployed at an accepted version ({} rule(s))",
            self.name,
            self.rules.len()
        )
    }

    fn objective_type(&self) -> &'static str {
        "package"
    }

    fn check(&self, ctx: &mut ObjectiveContext) -> Result<bool> {
        let Some(info) = ctx.target.package_info(&self.name)? else {
            ctx.reporter.error(&format!(
                "Required package {} is not installed",
                self.name
            ));
            return Ok(false);
        };

        let evaluation = self.evaluate(info.full_version.as_deref());
        self.report_evaluation(ctx, &info, &evaluation);
        Ok(evaluation.is_accepted())
    }

    fn configure(&self, ctx: &mut ObjectiveContext) -> Result<()> {
        ctx.reporter.debug(&format!(
            "Not loading package {}: automatic loading is not supported",
            self.name
        ));
        Ok(())
    }

    fn remove(&self, ctx: &mut ObjectiveContext) -> Result<()> {
        ctx.reporter.debug(&format!(
            "Not unloading package {}: automatic unloading is not supported",
            self.name
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{MapTarget, RecordingReporter};

    fn rule(pattern: &str, verdict: &str, warnings: &[&str]) -> AcceptanceRule {
        AcceptanceRule::new(
            "esb",
            pattern,
            verdict,
            warnings.iter().map(|w| w.to_string()).collect(),
        )
        .unwrap()
    }

    fn check(objective: &PackageObjective, target: &MapTarget) -> (bool, RecordingReporter) {
        let mut reporter = RecordingReporter::new();
        let mut ctx = ObjectiveContext::new(target, &mut reporter);
        let result = objective.check(&mut ctx).unwrap();
        (result, reporter)
    }

    #[test]
    fn test_not_installed_reports_one_error() {
        let objective = PackageObjective::new("esb", vec![rule(".*", "OK", &[])]);
        let target = MapTarget::new("dev");

        let (result, reporter) = check(&objective, &target);
        assert!(!result);
        assert_eq!(reporter.errors().len(), 1);
        assert!(reporter.errors()[0].contains("esb"));
        assert!(reporter.errors()[0].contains("not installed"));
    }

    #[test]
    fn test_accepted_version() {
        let objective = PackageObjective::new("esb", vec![rule(r"1\.0", "OK", &[])]);
        let target = MapTarget::new("dev").with_package("esb", "1.0");

        let (result, reporter) = check(&objective, &target);
        assert!(result);
        assert!(reporter.errors().is_empty());
    }

    #[test]
    fn test_rejected_version_reports_warnings() {
        let objective = PackageObjective::new(
            "esb",
            vec![rule(r"1\.0", "BAD", &["regressed feature X"])],
        );
        let target = MapTarget::new("dev").with_package("esb", "1.0");

        let (result, reporter) = check(&objective, &target);
        assert!(!result);
        assert_eq!(reporter.warnings(), vec!["regressed feature X"]);
        assert_eq!(reporter.errors().len(), 1);
        assert!(reporter.errors()[0].contains("1.0"));
        assert!(reporter.errors()[0].contains("BAD"));
    }

    #[test]
    fn test_first_accepting_match_wins() {
        let objective = PackageObjective::new(
            "esb",
            vec![
                rule(r"1\..*", "BAD", &["too old"]),
                rule(r"1\.5", "OK", &[]),
            ],
        );
        let target = MapTarget::new("dev").with_package("esb", "1.5");

        let (result, reporter) = check(&objective, &target);
        assert!(result);
        // The rejecting match before the accepting one is still reported
        assert_eq!(reporter.warnings(), vec!["too old"]);
    }

    #[test]
    fn test_rules_after_accepting_match_are_not_evaluated() {
        let objective = PackageObjective::new(
            "esb",
            vec![
                rule(r"1\.5", "OK", &[]),
                rule(r"1\..*", "BAD", &["should not show"]),
            ],
        );
        let evaluation = objective.evaluate(Some("1.5"));
        assert_eq!(evaluation.accepted, Some(0));
        assert!(evaluation.rejected.is_empty());
    }

    #[test]
    fn test_every_rejecting_match_is_reported() {
        let objective = PackageObjective::new(
            "esb",
            vec![
                rule(r"2\..*", "BROKEN", &["first"]),
                rule(r"2\.1", "SLOW", &["second", "third"]),
                rule(r"3\..*", "OK", &[]),
            ],
        );
        let target = MapTarget::new("dev").with_package("esb", "2.1");

        let (result, reporter) = check(&objective, &target);
        assert!(!result);
        assert_eq!(reporter.errors().len(), 2);
        assert_eq!(reporter.warnings(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_report_trail_reads_rule_by_rule() {
        use crate::types::Severity::{Debug, Error, Info, Warn};

        let objective = PackageObjective::new(
            "esb",
            vec![
                rule(r"1\..*", "BAD", &["old"]),
                rule(r"2\..*", "OK", &[]),
                rule(r"1\.5", "SLOW", &[]),
            ],
        );
        let target = MapTarget::new("dev").with_package("esb", "1.5");

        let (result, reporter) = check(&objective, &target);
        assert!(!result);
        let severities: Vec<_> = reporter.entries.iter().map(|r| r.severity).collect();
        assert_eq!(
            severities,
            vec![Debug, Info, Error, Warn, Debug, Debug, Info, Error]
        );
        assert_eq!(
            reporter.entries[4].message,
            r"Checking esb against version 2\..*"
        );
    }

    #[test]
    fn test_unknown_version() {
        let objective = PackageObjective::new("esb", vec![rule(r"1\.0", "OK", &[])]);
        let target = MapTarget::new("dev").with_package("esb", "9.9");

        let (result, reporter) = check(&objective, &target);
        assert!(!result);
        assert_eq!(reporter.errors().len(), 1);
        assert!(reporter.errors()[0].contains("not mentioned in the known versions"));
        assert!(reporter.errors()[0].contains("9.9"));
    }

    #[test]
    fn test_empty_version_never_matches() {
        let objective = PackageObjective::new("esb", vec![rule(".*", "OK", &[])]);

        let target = MapTarget::new("dev").with_package("esb", "");
        let (result, reporter) = check(&objective, &target);
        assert!(!result);
        assert!(reporter.errors()[0].contains("not mentioned"));

        let target = MapTarget::new("dev").with_unversioned("esb");
        let (result, _) = check(&objective, &target);
        assert!(!result);
    }

    #[test]
    fn test_no_rules_means_unknown_version() {
        let objective = PackageObjective::new("esb", Vec::new());
        let target = MapTarget::new("dev").with_package("esb", "1.0");

        let (result, reporter) = check(&objective, &target);
        assert!(!result);
        assert!(reporter.errors()[0].contains("not mentioned"));
    }

    #[test]
    fn test_configure_and_remove_change_nothing() {
        let objective = PackageObjective::new("esb", vec![rule(".*", "OK", &[])]);
        let target = MapTarget::new("dev");
        let mut reporter = RecordingReporter::new();
        let mut ctx = ObjectiveContext::new(&target, &mut reporter);

        objective.configure(&mut ctx).unwrap();
        objective.remove(&mut ctx).unwrap();
        assert!(reporter.errors().is_empty());
        assert!(reporter.warnings().is_empty());
    }
}
