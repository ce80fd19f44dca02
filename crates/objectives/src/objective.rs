//! Objective trait for desired-state evaluation
//!
//! An Objective describes something a target system should look like,
//! can tell whether the system currently does, and may be able to make
//! it so (or undo it).

use crate::context::ObjectiveContext;
use anyhow::Result;
use std::fmt;

/// Core trait for declarative objectives
///
/// Every objective provides:
/// - Identity (id, description, type)
/// - A check of the desired state against the target
/// - Optional convergence (configure) and removal
///
/// A `check` that finds the desired state unmet returns `Ok(false)` and
/// explains why through `ctx.reporter`. `Err` is reserved for failures
/// to evaluate at all, such as a target lookup that could not be made.
///
/// # Example
///
/// ```
/// use objectives::{Objective, ObjectiveContext};
///
/// #[derive(Debug)]
/// struct Installed(String);
///
/// impl Objective for Installed {
///     fn id(&self) -> String {
///         self.0.clone()
///     }
///
///     fn description(&self) -> String {
///         format!("Package {} is installed", self.0)
///     }
///
///     fn objective_type(&self) -> &'static str {
///         "installed"
///     }
///
///     fn check(&self, ctx: &mut ObjectiveContext) -> anyhow::Result<bool> {
///         Ok(ctx.target.package_info(&self.0)?.is_some())
///     }
/// }
/// ```
pub trait Objective: fmt::Debug {
    /// Unique identifier for this objective within its type
    fn id(&self) -> String;

    /// Human-readable description of the desired state
    fn description(&self) -> String;

    /// Objective type category, used for grouping output
    fn objective_type(&self) -> &'static str;

    /// Check whether the target is in the desired state
    fn check(&self, ctx: &mut ObjectiveContext) -> Result<bool>;

    /// Bring the target into the desired state
    ///
    /// The default does nothing; objectives that cannot converge the
    /// target automatically keep it.
    fn configure(&self, ctx: &mut ObjectiveContext) -> Result<()> {
        ctx.reporter
            .debug(&format!("{} cannot be configured automatically", self.id()));
        Ok(())
    }

    /// Remove whatever `configure` would have put in place
    fn remove(&self, ctx: &mut ObjectiveContext) -> Result<()> {
        ctx.reporter
            .debug(&format!("{} cannot be removed automatically", self.id()));
        Ok(())
    }
}

/// A boxed objective for type-erased storage
pub type BoxedObjective = Box<dyn Objective>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{MapTarget, RecordingReporter};
    use crate::types::Severity;

    #[derive(Debug)]
    struct Present(&'static str);

    impl Objective for Present {
        fn id(&self) -> String {
            self.0.to_string()
        }

        fn description(&self) -> String {
            format!("{} is present", self.0)
        }

        fn objective_type(&self) -> &'static str {
            "present"
        }

        fn check(&self, ctx: &mut ObjectiveContext) -> Result<bool> {
            Ok(ctx.target.package_info(self.0)?.is_some())
        }
    }

    #[test]
    fn test_default_configure_and_remove_are_noops() {
        let target = MapTarget::new("dev").with_package("esb", "1.0");
        let mut reporter = RecordingReporter::new();
        let mut ctx = ObjectiveContext::new(&target, &mut reporter);

        let objective = Present("esb");
        assert!(objective.check(&mut ctx).unwrap());
        objective.configure(&mut ctx).unwrap();
        objective.remove(&mut ctx).unwrap();

        assert!(reporter.errors().is_empty());
        assert_eq!(reporter.messages(Severity::Debug).len(), 2);
    }

    #[test]
    fn test_dispatch_through_box() {
        let target = MapTarget::new("dev");
        let mut reporter = RecordingReporter::new();
        let mut ctx = ObjectiveContext::new(&target, &mut reporter);

        let objective: BoxedObjective = Box::new(Present("esb"));
        assert!(!objective.check(&mut ctx).unwrap());
        assert_eq!(objective.objective_type(), "present");
    }
}
