//! Objective commands
//!
//! - `check` - Report whether the system meets the declared objectives
//! - `configure` - Bring the system in line with them
//! - `purge` - Undo them

use anyhow::{Context as AnyhowContext, Result, bail};
use objectives::{
    CheckSummary, Declaration, LogReporter, Objective, ObjectiveContext, ObjectiveSet,
    RecordingReporter, Report, Target,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::Context;
use crate::cli::{ApplyArgs, CheckArgs, TargetArgs};
use crate::config::StratumConfig;
use crate::target::InventoryTarget;
use crate::ui::{self, ConsoleReporter};

/// Extension of declaration files picked up from directories
const DECLARATION_EXT: &str = "toml";

/// A declaration file loaded as objectives
#[derive(Debug)]
struct Loaded {
    /// Organization the declaration applies to, if it names one
    organization: Option<String>,
    objectives: ObjectiveSet,
}

impl Loaded {
    fn title(&self) -> String {
        match &self.organization {
            Some(org) => format!("{} ({org})", self.objectives.name()),
            None => self.objectives.name().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    declaration: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    organization: Option<&'a str>,
    target: &'a str,
    #[serde(flatten)]
    summary: CheckSummary,
    reports: Vec<Report>,
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Configure,
    Remove,
}

pub fn check(ctx: &Context, args: CheckArgs) -> Result<()> {
    let config = StratumConfig::load()?;
    let target = open_target(&config, &args.target)?;
    let declarations = load_declarations(&args.target.paths)?;

    let total = if args.json {
        let (reports, total) = check_reports(&target, &declarations)?;
        println!("{}", serde_json::to_string_pretty(&reports)?);
        total
    } else if ctx.quiet {
        check_logged(&target, &declarations)?
    } else {
        check_console(ctx, &target, &declarations)?
    };

    if total.failed > 0 {
        bail!("{} objective(s) not met", total.failed);
    }
    Ok(())
}

fn check_console(
    ctx: &Context,
    target: &InventoryTarget,
    declarations: &[Loaded],
) -> Result<CheckSummary> {
    ui::header(&format!("Checking {}", target.name()));

    let mut reporter = ConsoleReporter::new(ctx.verbose > 0);
    let mut total = CheckSummary::default();

    for declaration in declarations {
        ui::section(&declaration.title());
        let mut octx = ObjectiveContext::new(target, &mut reporter);
        let summary = declaration.objectives.check_all(&mut octx)?;

        if summary.is_success() {
            ui::success(&format!("{} objective(s) met", summary.passed));
        } else {
            ui::error(&format!(
                "{} of {} objective(s) not met: {}",
                summary.failed,
                summary.total(),
                summary.failures.join(", ")
            ));
        }
        total.merge(&summary);
    }

    println!();
    ui::kv("Passed", &total.passed.to_string());
    ui::kv("Failed", &total.failed.to_string());
    if reporter.warnings() > 0 {
        ui::kv("Warnings", &reporter.warnings().to_string());
    }
    Ok(total)
}

/// Check without console output, sending the trail to the log
fn check_logged(target: &InventoryTarget, declarations: &[Loaded]) -> Result<CheckSummary> {
    let mut reporter = LogReporter;
    let mut total = CheckSummary::default();

    for declaration in declarations {
        let mut octx = ObjectiveContext::new(target, &mut reporter);
        let summary = declaration.objectives.check_all(&mut octx)?;
        log::info!(
            "{}: {} of {} objective(s) met",
            declaration.title(),
            summary.passed,
            summary.total()
        );
        total.merge(&summary);
    }
    Ok(total)
}

fn check_reports<'a>(
    target: &'a InventoryTarget,
    declarations: &'a [Loaded],
) -> Result<(Vec<CheckReport<'a>>, CheckSummary)> {
    let mut total = CheckSummary::default();
    let mut reports = Vec::with_capacity(declarations.len());

    for declaration in declarations {
        let mut reporter = RecordingReporter::new();
        let mut octx = ObjectiveContext::new(target, &mut reporter);
        let summary = declaration.objectives.check_all(&mut octx)?;
        total.merge(&summary);
        reports.push(CheckReport {
            declaration: declaration.objectives.name(),
            organization: declaration.organization.as_deref(),
            target: target.name(),
            summary,
            reports: reporter.entries,
        });
    }
    Ok((reports, total))
}

pub fn configure(ctx: &Context, args: ApplyArgs) -> Result<()> {
    apply(ctx, args, Action::Configure)
}

pub fn purge(ctx: &Context, args: ApplyArgs) -> Result<()> {
    apply(ctx, args, Action::Remove)
}

fn apply(ctx: &Context, args: ApplyArgs, action: Action) -> Result<()> {
    let config = StratumConfig::load()?;
    let target = open_target(&config, &args.target)?;
    let declarations = load_declarations(&args.target.paths)?;

    let verb = match action {
        Action::Configure => "Configuring",
        Action::Remove => "Purging",
    };
    ui::header(&format!("{verb} {}", target.name()));
    if args.dry_run {
        ui::info("Dry run - no changes will be made");
    }

    let mut reporter = ConsoleReporter::new(args.dry_run || (ctx.verbose > 0 && !ctx.quiet));

    // purge walks declarations in reverse, mirroring ObjectiveSet::remove
    let ordered: Vec<&Loaded> = match action {
        Action::Configure => declarations.iter().collect(),
        Action::Remove => declarations.iter().rev().collect(),
    };

    for declaration in ordered {
        ui::section(&declaration.title());
        let set = &declaration.objectives;
        let mut octx = if args.dry_run {
            ObjectiveContext::dry_run(&target, &mut reporter)
        } else {
            ObjectiveContext::new(&target, &mut reporter)
        };
        match action {
            Action::Configure => set.configure(&mut octx)?,
            Action::Remove => set.remove(&mut octx)?,
        }
    }

    println!();
    if reporter.errors() > 0 {
        bail!("{} error(s) reported", reporter.errors());
    }
    if !args.dry_run {
        ui::success(&format!("Processed {} declaration(s)", declarations.len()));
    }
    Ok(())
}

/// Open the inventory named on the command line or configured for the system
fn open_target(config: &StratumConfig, args: &TargetArgs) -> Result<InventoryTarget> {
    if let Some(path) = &args.inventory {
        return InventoryTarget::load(path);
    }

    let Some((name, system)) = config.system(args.system.as_deref())? else {
        bail!("No system selected. Pass --system, --inventory, or set default_system");
    };
    let Some(path) = config.inventory_path(system) else {
        bail!("System '{}' has no inventory configured. Pass --inventory", name);
    };
    InventoryTarget::load(&path)
}

fn load_declarations(paths: &[PathBuf]) -> Result<Vec<Loaded>> {
    let mut loaded = Vec::new();
    for file in collect_files(paths)? {
        log::debug!("Loading declaration {}", file.display());
        let declaration = Declaration::load(&file)?;
        loaded.push(Loaded {
            organization: declaration.organization().map(str::to_string),
            objectives: declaration.into_objectives(),
        });
    }
    Ok(loaded)
}

/// Expand directories to the declaration files directly inside them
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
            {
                let entry =
                    entry.with_context(|| format!("Could not list {}", path.display()))?;
                if entry.file_type().is_file() && is_declaration(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else {
            bail!("Unknown path: {}", path.display());
        }
    }

    if files.is_empty() {
        bail!("No declaration files found");
    }
    Ok(files)
}

fn is_declaration(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DECLARATION_EXT))
}
