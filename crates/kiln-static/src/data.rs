//! Data files exposed to templates.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use walkdir::WalkDir;

use crate::builder::BuildError;

/// Load every `.json`, `.yaml` and `.yml` file under `dir`.
///
/// Each file is exposed under its file stem, so `data/site.json` becomes
/// `site` in template context. A missing directory yields no data.
pub fn load_data(dir: &Path) -> Result<Map<String, Value>, BuildError> {
    let mut data = Map::new();

    if !dir.exists() {
        tracing::debug!("No data directory at {}", dir.display());
        return Ok(data);
    }

    let mut paths: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();
    paths.sort();

    for path in paths {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !matches!(ext, "json" | "yaml" | "yml") {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let content = fs::read_to_string(&path)
            .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;

        let value: Value = if ext == "json" {
            serde_json::from_str(&content).map_err(|e| BuildError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        } else {
            serde_yaml::from_str(&content).map_err(|e| BuildError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        };

        if data.insert(stem.to_string(), value).is_some() {
            tracing::warn!("Data file {} shadows an earlier '{}'", path.display(), stem);
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_json_and_yaml() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("site.json"), r#"{"title": "Hello"}"#).unwrap();
        fs::write(temp.path().join("nav.yaml"), "- home\n- about\n").unwrap();
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let data = load_data(temp.path()).unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data["site"]["title"], "Hello");
        assert_eq!(data["nav"][1], "about");
    }

    #[test]
    fn missing_directory_is_empty() {
        let temp = tempdir().unwrap();

        let data = load_data(&temp.path().join("nope")).unwrap();

        assert!(data.is_empty());
    }

    #[test]
    fn reports_invalid_json() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("broken.json"), "{ nope").unwrap();

        let result = load_data(temp.path());

        assert!(matches!(result, Err(BuildError::ParseError { .. })));
    }
}
