//! Alias registry: add/replace, remove and look up aliases by name.
//!
//! Operates on an already-decoded [`Config`]; persistence lives in `storage`.

use crate::model::{Alias, Config};

/// Exact, case-sensitive lookup. Returns `None` when the name is not stored.
pub fn lookup<'a>(config: &'a Config, name: &str) -> Option<&'a Alias> {
    config.aliases.iter().find(|a| a.name == name)
}

/// Add an alias, replacing any existing alias with the same name. The list
/// stays sorted by name so listings are stable.
pub fn upsert(config: &mut Config, alias: Alias) {
    match config.aliases.iter_mut().find(|a| a.name == alias.name) {
        Some(existing) => {
            existing.program = alias.program;
            existing.args = alias.args;
        }
        None => config.aliases.push(alias),
    }
    config.aliases.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Remove an alias by name. Returns `false` when no alias matched.
pub fn remove(config: &mut Config, name: &str) -> bool {
    let before = config.aliases.len();
    config.aliases.retain(|a| a.name != name);
    config.aliases.len() != before
}
