use crate::config::Config;
use crate::error::{InitError, Result};
use crate::models::{PackageManager, RunConfig, validate_field};
use crate::prompt::{self, LineReader, Question};
use crate::target;
use std::path::Path;

/// Values supplied on the command line; anything missing is prompted for.
#[derive(Debug, Clone, Default)]
pub struct Presets {
    pub name: Option<String>,
    pub author: Option<String>,
    pub package_manager: Option<PackageManager>,
}

/// Collects and validates name, author and package manager, then resolves the target.
///
/// Nothing on disk is touched here, so every validation failure aborts before any side effect.
pub fn collect(
    presets: &Presets,
    config: &Config,
    cwd: &Path,
    reader: &mut dyn LineReader,
) -> Result<RunConfig> {
    let project_name = match &presets.name {
        Some(name) => name.clone(),
        None => prompt::ask(reader, &Question::text("Project name"))?,
    };
    validate_field("Project name", &project_name)?;

    let author = match &presets.author {
        Some(author) => author.clone(),
        None => prompt::ask(
            reader,
            &Question::text("Author").with_default(config.author.clone()),
        )?,
    };
    validate_field("Author", &author)?;

    let package_manager = match presets.package_manager {
        Some(package_manager) => package_manager,
        None => {
            let question = Question::text("Package Manager")
                .with_options(PackageManager::ALL.iter().map(|pm| pm.program()))
                .with_default(Some(config.package_manager.program()));
            let answer = prompt::ask(reader, &question)?;
            PackageManager::parse(&answer).ok_or(InitError::InvalidOption(answer))?
        }
    };

    let target = target::resolve(&project_name, cwd)?;
    Ok(RunConfig {
        project_name,
        author,
        package_manager,
        target,
    })
}
