//! CLI surface: flag parsing and mode dispatch (add/remove/list/run).

use crate::model::{Alias, Config};
use crate::pipeline::{self, OsSpawner, SystemPath};
use crate::{registry, storage};
use anyhow::{bail, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser, Clone)]
#[command(
    name = "aka",
    version,
    about = "Store command aliases and replay them, pipes included, without a shell",
    after_help = "\
Examples:
    aka --add gitinit git init          store an alias
    aka --add errs make '|grep' error   store a piped alias
    aka gitinit                         run it
    aka errs -j4                        extra args go to the first command
    aka                                 list aliases
    aka --remove gitinit                remove it

Aliases live in a JSON file named after this executable, looked up next to
the binary first and then under the user config directory. Copy the binary
under a new name to get an independent alias set."
)]
pub struct Cli {
    /// Add or replace an alias: --add NAME PROGRAM [ARG]...
    #[arg(long)]
    pub add: bool,

    /// Remove an alias: --remove NAME
    #[arg(long)]
    pub remove: bool,

    /// List aliases by name
    #[arg(long, visible_alias = "list-by-name")]
    pub list: bool,

    /// List aliases sorted by program and arguments
    #[arg(long = "list-by-path")]
    pub list_path: bool,

    /// Use an explicit config file instead of the discovered one
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Alias name, then extra arguments appended to the first pipeline segment
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Entry point after flag parsing. Returns the process exit code: the last
/// pipeline segment's code in run mode, 0 for the management modes.
pub fn run(args: Cli) -> Result<i32> {
    if args.add && args.remove {
        bail!("--add and --remove are mutually exclusive");
    }
    if args.add && args.args.len() < 2 {
        bail!("--add needs a name and a program: --add NAME PROGRAM [ARG]...");
    }
    if args.remove && args.args.is_empty() {
        bail!("--remove needs an alias name");
    }

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => storage::default_config_path()?,
    };
    let mut config = storage::load(&config_path)?;

    if args.list || args.list_path || args.args.is_empty() {
        print_listing(&config, &config_path, args.list_path);
        return Ok(0);
    }

    if args.add {
        registry::upsert(
            &mut config,
            Alias {
                name: args.args[0].clone(),
                program: args.args[1].clone(),
                args: args.args[2..].to_vec(),
            },
        );
        storage::save(&config_path, &config)?;
        return Ok(0);
    }

    if args.remove {
        let name = &args.args[0];
        if !registry::remove(&mut config, name) {
            bail!("no alias named `{name}`");
        }
        storage::save(&config_path, &config)?;
        return Ok(0);
    }

    run_alias(&config, &args.args)
}

/// Look the alias up, compile it with the trailing arguments and run the
/// resulting pipeline.
fn run_alias(config: &Config, words: &[String]) -> Result<i32> {
    let Some((name, trailing)) = words.split_first() else {
        bail!("missing alias name");
    };
    let Some(alias) = registry::lookup(config, name) else {
        bail!("no alias named `{name}`");
    };

    let segments = pipeline::compile(alias, trailing, &SystemPath);
    pipeline::run(&segments, &mut OsSpawner::new())
}

fn print_listing(config: &Config, config_path: &Path, by_path: bool) {
    let mut aliases: Vec<&Alias> = config.aliases.iter().collect();
    if by_path {
        aliases.sort_by(|a, b| (&a.program, &a.args).cmp(&(&b.program, &b.args)));
    }

    println!("aliases:");
    for alias in aliases {
        println!("\t{}\t{} {}", alias.name, alias.program, alias.args.join(" "));
    }
    println!();
    println!("config: {}", config_path.display());
}
