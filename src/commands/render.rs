use anyhow::{Context as AnyhowContext, Result};
use renderkit::{Renderer, unresolved};
use std::collections::BTreeMap;
use std::fs;

use crate::Context;
use crate::cli::RenderArgs;
use crate::config::StratumConfig;
use crate::ui;

pub fn run(ctx: &Context, args: RenderArgs) -> Result<()> {
    let config = StratumConfig::load()?;
    let vars = variables(&config, &args)?;
    log::debug!("Rendering with {} variable(s)", vars.len());

    let renderer = Renderer::new().with_options(config.render.to_options());
    let output = renderer
        .render_file(&vars, &args.template)
        .with_context(|| format!("Could not render {}", args.template.display()))?;

    let missing = unresolved(&output, &vars);
    if !missing.is_empty() && !ctx.quiet {
        let names: Vec<&str> = missing.iter().map(String::as_str).collect();
        ui::warn(&format!("Unresolved placeholder(s): {}", names.join(", ")));
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("Could not write {}", path.display()))?;
            if !ctx.quiet {
                ui::success(&format!("Wrote {}", path.display()));
            }
        }
        None => print!("{output}"),
    }
    Ok(())
}

/// Configured variables with `--set` overrides applied last
fn variables(config: &StratumConfig, args: &RenderArgs) -> Result<BTreeMap<String, String>> {
    let mut vars = config.variables(args.system.as_deref(), args.organization.as_deref())?;
    vars.extend(args.set.iter().cloned());
    Ok(vars)
}
