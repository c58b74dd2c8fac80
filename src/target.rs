use crate::error::{InitError, Result};
use crate::models::SELF_SENTINEL;
use crate::prompt::{self, LineReader};
use colored::Colorize;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetMode {
    /// Scaffold into the current directory.
    SelfDir,
    /// Scaffold into a subdirectory named after the project.
    Named,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub mode: TargetMode,
    pub path: PathBuf,
    /// Name written into the manifest.
    pub package_name: String,
}

impl Target {
    pub fn is_self_mode(&self) -> bool {
        self.mode == TargetMode::SelfDir
    }
}

/// Maps a validated project name to the directory it will occupy.
pub fn resolve(project_name: &str, cwd: &Path) -> Result<Target> {
    if project_name == SELF_SENTINEL {
        let package_name = cwd
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                InitError::validation(format!(
                    "Cannot derive a package name from {}",
                    cwd.display()
                ))
            })?;
        Ok(Target {
            mode: TargetMode::SelfDir,
            path: cwd.to_path_buf(),
            package_name,
        })
    } else {
        let mut components = Path::new(project_name).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(part)), None) if part == project_name
        );
        if !single_normal {
            return Err(InitError::validation(format!(
                "Project name '{}' must be a plain directory name, exiting...",
                project_name
            )));
        }
        Ok(Target {
            mode: TargetMode::Named,
            path: cwd.join(project_name),
            package_name: project_name.to_string(),
        })
    }
}

/// Probes for content that an overwrite would destroy. Probe errors count as absent.
pub fn has_existing_content(target: &Target) -> bool {
    match target.mode {
        TargetMode::SelfDir => match fs::read_dir(&target.path) {
            Ok(mut entries) => entries.next().is_some(),
            Err(err) => {
                log::debug!("could not read {}: {}", target.path.display(), err);
                false
            }
        },
        TargetMode::Named => match fs::symlink_metadata(&target.path) {
            Ok(_) => true,
            Err(err) => {
                log::debug!("{} not found: {}", target.path.display(), err);
                false
            }
        },
    }
}

/// Confirms and clears existing content, then makes sure the target directory exists.
pub fn prepare(target: &Target, reader: &mut dyn LineReader, assume_yes: bool) -> Result<()> {
    if target.is_self_mode() {
        println!(
            "{}",
            "Warning: You are creating a project in the current directory.".yellow()
        );
    }

    if has_existing_content(target) {
        let message = match target.mode {
            TargetMode::SelfDir => {
                "The current directory is not empty, do you want to continue? This will remove everything from it!"
            }
            TargetMode::Named => {
                "Project already exists. Would you like to overwrite it? This will remove everything from it!"
            }
        };
        let confirmed = assume_yes || prompt::confirm(reader, message)?;
        if !confirmed {
            return Err(InitError::Aborted);
        }
        clear(target)?;
    } else if target.mode == TargetMode::Named {
        println!("{}", "Project does not exist, continuing...".green());
    }

    fs::create_dir_all(&target.path)?;
    Ok(())
}

fn clear(target: &Target) -> io::Result<()> {
    log::info!("Removing existing content in {}", target.path.display());
    match target.mode {
        TargetMode::SelfDir => empty_dir(&target.path),
        TargetMode::Named => remove_path(&target.path),
    }
}

/// Removes every entry of `dir`, keeping `dir` itself.
fn empty_dir(dir: &Path) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        remove_path(&entry?.path())?;
    }
    Ok(())
}

fn remove_path(path: &Path) -> io::Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };
    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
