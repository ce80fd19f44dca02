//! Ordered collections of objectives evaluated as one

use anyhow::Result;

use crate::context::ObjectiveContext;
use crate::objective::{BoxedObjective, Objective};
use crate::types::CheckSummary;

/// An ordered set of objectives that is itself an objective
///
/// Checking a set checks every member, so every unmet objective gets
/// reported, not just the first one.
#[derive(Debug, Default)]
pub struct ObjectiveSet {
    name: String,
    objectives: Vec<BoxedObjective>,
}

impl ObjectiveSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objectives: Vec::new(),
        }
    }

    pub fn push(&mut self, objective: BoxedObjective) {
        self.objectives.push(objective);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
    }

    /// Check every member and summarize the outcomes
    pub fn check_all(&self, ctx: &mut ObjectiveContext) -> Result<CheckSummary> {
        let mut summary = CheckSummary::default();
        for objective in &self.objectives {
            let passed = objective.check(ctx)?;
            summary.add_result(&objective.id(), passed);
        }
        Ok(summary)
    }
}

impl Extend<BoxedObjective> for ObjectiveSet {
    fn extend<I: IntoIterator<Item = BoxedObjective>>(&mut self, iter: I) {
        self.objectives.extend(iter);
    }
}

impl Objective for ObjectiveSet {
    fn id(&self) -> String {
        self.name.clone()
    }

    fn description(&self) -> String {
        format!("{} ({} objective(s))", self.name, self.objectives.len())
    }

    fn objective_type(&self) -> &'static str {
        "set"
    }

    fn check(&self, ctx: &mut ObjectiveContext) -> Result<bool> {
        Ok(self.check_all(ctx)?.is_success())
    }

    fn configure(&self, ctx: &mut ObjectiveContext) -> Result<()> {
        for objective in &self.objectives {
            if ctx.dry_run {
                ctx.reporter
                    .info(&format!("Would configure {}", objective.description()));
                continue;
            }
            objective.configure(ctx)?;
        }
        Ok(())
    }

    fn remove(&self, ctx: &mut ObjectiveContext) -> Result<()> {
        for objective in self.objectives.iter().rev() {
            if ctx.dry_run {
                ctx.reporter
                    .info(&format!("Would remove {}", objective.description()));
                continue;
            }
            objective.remove(ctx)?;
        }
        Ok(())
    }
}
