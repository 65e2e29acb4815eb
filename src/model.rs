use serde::{Deserialize, Serialize};

/// A stored shortcut: the program to launch plus the fixed arguments replayed
/// on every run. Elements of `args` starting with `|` split the launch into a
/// pipeline of processes (see `pipeline::compile`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// On-disk configuration: every stored alias, kept sorted by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub aliases: Vec<Alias>,
}
