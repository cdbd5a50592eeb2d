use std::{env, fs};

use anyhow::{anyhow, Context, Result};
use abroadpath::workspace::{
    config_file_path, ensure_workspace_structure, load_or_default, save, AppConfig,
};

fn main() -> Result<()> {
    ensure_workspace_structure()?;
    let args = CliArgs::parse()?;
    let config_path = config_file_path()?;
    let mut config = load_or_default()?;
    let mut changed = config_missing_onboarding_section(&config_path);

    changed |= apply_overrides(&mut config, &args);

    if changed {
        save(&config)?;
        println!("Settings recorded at {}", config_path.display());
    } else {
        println!("Settings already configured.");
    }

    Ok(())
}

struct CliArgs {
    cooldowns: Vec<(String, u64)>,
    signup_path: Option<String>,
    no_persist: bool,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut cooldowns = Vec::new();
        let mut signup_path = None;
        let mut no_persist = false;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--cooldown" => {
                    let value = args
                        .next()
                        .context("Expected <action>=<seconds> after --cooldown")?;
                    cooldowns.push(parse_cooldown(&value)?);
                }
                "--signup-path" => {
                    let value = args
                        .next()
                        .context("Expected a route after --signup-path")?;
                    signup_path = Some(value);
                }
                "--no-persist" => no_persist = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => {
                    return Err(anyhow!(
                        "Unknown argument '{other}'. Run with --help for usage instructions."
                    ));
                }
            }
        }
        Ok(Self {
            cooldowns,
            signup_path,
            no_persist,
        })
    }
}

fn parse_cooldown(value: &str) -> Result<(String, u64)> {
    let (action, secs) = value
        .split_once('=')
        .with_context(|| format!("Cooldown '{value}' must look like <action>=<seconds>"))?;
    let action = action.trim();
    if action.is_empty() {
        return Err(anyhow!("Cooldown '{value}' is missing an action name"));
    }
    let secs = secs
        .trim()
        .parse::<u64>()
        .with_context(|| format!("Cooldown seconds in '{value}' must be a whole number"))?;
    Ok((action.to_string(), secs))
}

fn print_usage() {
    println!("AbroadPath setup");
    println!("Ensures onboarding and rate-limit settings are recorded in config.toml.");
    println!("Usage: cargo run --bin setup -- [options]");
    println!("Options:");
    println!("  --cooldown <action>=<secs>   Override the cooldown for an outbound action");
    println!("  --signup-path <route>        Route for anonymous handoff (default: /signup)");
    println!("  --no-persist                 Do not mirror wizard progress to local storage");
}

fn apply_overrides(config: &mut AppConfig, args: &CliArgs) -> bool {
    let mut changed = false;
    for (action, secs) in &args.cooldowns {
        if config.rate_limits.cooldowns.get(action) != Some(secs) {
            config.rate_limits.cooldowns.insert(action.clone(), *secs);
            changed = true;
        }
    }
    if let Some(path) = &args.signup_path {
        if &config.onboarding.signup_path != path {
            config.onboarding.signup_path = path.clone();
            changed = true;
        }
    }
    if args.no_persist && config.onboarding.persist_progress {
        config.onboarding.persist_progress = false;
        changed = true;
    }
    changed
}

fn config_missing_onboarding_section(path: &std::path::Path) -> bool {
    if !path.exists() {
        return true;
    }
    match fs::read_to_string(path) {
        Ok(contents) => !contents.contains("[onboarding]"),
        Err(_) => true,
    }
}
