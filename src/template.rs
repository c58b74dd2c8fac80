use anyhow::{Context, anyhow};
use include_dir::{Dir, DirEntry, include_dir};
use std::fs;
use std::path::{Path, PathBuf};

static TEMPLATE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/template");

/// Where the starter files come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// The tree bundled into the binary at build time.
    Embedded,
    /// A template directory on disk.
    Directory(PathBuf),
}

impl TemplateSource {
    pub fn from_override(dir: Option<PathBuf>) -> Self {
        dir.map_or(TemplateSource::Embedded, TemplateSource::Directory)
    }
}

impl std::fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateSource::Embedded => write!(f, "bundled template"),
            TemplateSource::Directory(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Copies the template tree into `dest` byte for byte. Returns the number of files written.
pub fn materialize(source: &TemplateSource, dest: &Path) -> anyhow::Result<usize> {
    fs::create_dir_all(dest).with_context(|| format!("could not create {}", dest.display()))?;
    let count = match source {
        TemplateSource::Embedded => copy_embedded(&TEMPLATE_DIR, dest)?,
        TemplateSource::Directory(dir) => copy_directory(dir, dest)?,
    };
    log::debug!("copied {} template files into {}", count, dest.display());
    Ok(count)
}

fn copy_embedded(dir: &Dir<'_>, dest: &Path) -> anyhow::Result<usize> {
    let mut count = 0;
    for entry in dir.entries() {
        let target = dest.join(entry.path());
        match entry {
            DirEntry::Dir(sub) => {
                fs::create_dir_all(&target)
                    .with_context(|| format!("could not create {}", target.display()))?;
                count += copy_embedded(sub, dest)?;
            }
            DirEntry::File(file) => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&target, file.contents())
                    .with_context(|| format!("could not write {}", target.display()))?;
                count += 1;
            }
        }
    }
    Ok(count)
}

fn copy_directory(template_dir: &Path, dest: &Path) -> anyhow::Result<usize> {
    if !template_dir.is_dir() {
        return Err(anyhow!("template directory {} not found", template_dir.display()));
    }

    let mut count = 0;
    for entry in walkdir::WalkDir::new(template_dir).min_depth(1) {
        let entry = entry?;
        let path = entry.path();
        let relative_path = path.strip_prefix(template_dir)?;
        let target = dest.join(relative_path);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("could not create {}", target.display()))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &target).with_context(|| {
                format!("could not copy {} to {}", path.display(), target.display())
            })?;
            count += 1;
        }
    }

    Ok(count)
}
