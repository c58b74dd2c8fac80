use crate::models::PackageManager;
use anyhow::{Context, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_DEV_DEPENDENCIES: &[&str] = &[
    "@types/node",
    "husky",
    "eslint",
    "nodemon",
    "prettier",
    "ts-node",
    "typescript",
    "@typescript-eslint/eslint-plugin",
    "@typescript-eslint/parser",
];

/// User defaults read from `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub author: Option<String>,
    pub package_manager: PackageManager,
    pub template_dir: Option<PathBuf>,
    pub commit_message: String,
    pub manifest_version: String,
    pub ignore_entries: Vec<String>,
    pub ignore_files: Vec<String>,
    pub dev_dependencies: Vec<String>,
    pub formatter: String,
    pub hook_setup: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            author: None,
            package_manager: PackageManager::Yarn,
            template_dir: None,
            commit_message: "first commit".to_string(),
            manifest_version: "1.0.0".to_string(),
            ignore_entries: vec!["/node_modules".to_string(), "/dist".to_string()],
            ignore_files: vec![".gitignore".to_string(), ".dockerignore".to_string()],
            dev_dependencies: DEFAULT_DEV_DEPENDENCIES.iter().map(|s| s.to_string()).collect(),
            formatter: "prettier --write .".to_string(),
            hook_setup: "husky".to_string(),
        }
    }
}

impl Config {
    /// Loads `explicit` if given, otherwise the default location.
    ///
    /// An explicit path must exist; a missing default file means defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    log::debug!("no config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        let config = Self::parse(&content).with_context(|| format!("in {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.commit_message.trim().is_empty() {
            return Err(anyhow!("commit_message must not be empty"));
        }
        if let Some(author) = &config.author {
            crate::models::validate_field("author", author)?;
        }
        Ok(config)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("project-init").join("config.toml"))
}
