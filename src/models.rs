use crate::error::{InitError, Result};
use crate::target::Target;
use serde::{Deserialize, Serialize};

/// Project name that selects the current directory as the target.
pub const SELF_SENTINEL: &str = ".";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
}

impl PackageManager {
    pub const ALL: [PackageManager; 2] = [PackageManager::Npm, PackageManager::Yarn];

    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
        }
    }

    /// Arguments that install `packages` as development dependencies.
    pub fn install_dev_args(&self, packages: &[String]) -> Vec<String> {
        let mut args: Vec<String> = match self {
            PackageManager::Npm => vec!["install".into(), "--save-dev".into()],
            PackageManager::Yarn => vec!["add".into(), "-D".into()],
        };
        args.extend(packages.iter().cloned());
        args
    }

    /// Launcher for binaries installed into the project's `node_modules`.
    pub fn exec_program(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npx",
            PackageManager::Yarn => "yarn",
        }
    }

    pub fn parse(value: &str) -> Option<PackageManager> {
        Self::ALL
            .into_iter()
            .find(|pm| pm.program().eq_ignore_ascii_case(value.trim()))
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program())
    }
}

/// Resolved choices for one invocation. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub project_name: String,
    pub author: String,
    pub package_manager: PackageManager,
    pub target: Target,
}

impl RunConfig {
    pub fn is_self_mode(&self) -> bool {
        self.target.is_self_mode()
    }

    pub fn package_name(&self) -> &str {
        &self.target.package_name
    }
}

/// Rejects empty values and values containing a space.
pub fn validate_field(label: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(InitError::validation(format!("{} must not be empty, exiting...", label)));
    }
    if value.contains(' ') {
        return Err(InitError::validation("No spaces allowed, exiting..."));
    }
    Ok(())
}
