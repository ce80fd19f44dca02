use anyhow::Result;

use crate::Context;
use crate::cli::ConfigCommand;
use crate::config::StratumConfig;
use crate::{paths, ui};

pub fn run(_ctx: &Context, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show(),
    }
}

fn show() -> Result<()> {
    ui::header("Configuration");

    let dir = paths::config_dir()?;
    let file = paths::config_file()?;
    println!();
    ui::kv("Config directory", &dir.display().to_string());
    if file.exists() {
        ui::kv("Config file", &file.display().to_string());
    } else {
        ui::kv("Config file", &format!("{} (not found)", file.display()));
    }

    let config = StratumConfig::load_from(&file)?;

    ui::section("Render");
    ui::kv(
        "Max include depth",
        &config.render.max_include_depth.to_string(),
    );
    ui::kv("Default folder pattern", &config.render.default_pattern);

    ui::section("Systems");
    if config.systems.is_empty() {
        ui::dim("No systems configured");
        return Ok(());
    }

    for (name, system) in &config.systems {
        let marker = if config.default_system.as_deref() == Some(name.as_str()) {
            " (default)"
        } else {
            ""
        };
        ui::info(&format!("{name}{marker}"));
        match config.inventory_path(system) {
            Some(path) => ui::kv("inventory", &path.display().to_string()),
            None => ui::kv("inventory", "-"),
        }
        if !system.properties.is_empty() {
            ui::kv("properties", &system.properties.join(", "));
        }
        if !system.variables.is_empty() {
            ui::kv("variables", &system.variables.len().to_string());
        }
        if !system.organizations.is_empty() {
            let orgs: Vec<&str> = system.organizations.keys().map(String::as_str).collect();
            ui::kv("organizations", &orgs.join(", "));
        }
    }

    Ok(())
}
