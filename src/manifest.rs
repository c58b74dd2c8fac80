use anyhow::{Context, anyhow};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFields {
    pub name: String,
    pub version: String,
    pub author: String,
}

/// Assigns `name`, `version` and `author` in the target's `package.json`, keeping every other key.
pub fn set_fields(dir: &Path, fields: &ManifestFields) -> anyhow::Result<()> {
    let path = dir.join(MANIFEST_FILE);
    let mut manifest = if path.exists() {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("could not read {}", path.display()))?;
        serde_json::from_str::<Value>(&content)
            .with_context(|| format!("{} is not valid JSON", path.display()))?
    } else {
        Value::Object(Map::new())
    };

    let object = manifest
        .as_object_mut()
        .ok_or_else(|| anyhow!("{} must contain a JSON object", path.display()))?;
    object.insert("name".to_string(), Value::String(fields.name.clone()));
    object.insert("version".to_string(), Value::String(fields.version.clone()));
    object.insert("author".to_string(), Value::String(fields.author.clone()));

    let mut content = serde_json::to_string_pretty(&manifest)?;
    content.push('\n');
    fs::write(&path, content).with_context(|| format!("could not write {}", path.display()))?;
    Ok(())
}
