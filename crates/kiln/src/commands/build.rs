//! Static site build command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kiln_ready::IndicatorConfig;
use kiln_static::{BuildConfig, StaticBuilder, Task};
use serde::Deserialize;

/// Configuration file structure (kiln.toml).
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    paths: PathsConfig,
    #[serde(default)]
    build: BuildSettings,
    #[serde(default)]
    indicator: IndicatorConfig,
}

#[derive(Debug, Deserialize)]
struct PathsConfig {
    #[serde(default = "default_assets")]
    assets: PathBuf,
    #[serde(default = "default_data")]
    data: PathBuf,
    #[serde(default = "default_content")]
    content: PathBuf,
    #[serde(default = "default_styles")]
    styles: PathBuf,
    #[serde(default = "default_scripts")]
    scripts: PathBuf,
    #[serde(default = "default_output")]
    output: PathBuf,
    #[serde(default = "default_styles_output")]
    styles_output: PathBuf,
    #[serde(default = "default_scripts_output")]
    scripts_output: PathBuf,
    #[serde(default = "default_entry_script")]
    entry_script: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            assets: default_assets(),
            data: default_data(),
            content: default_content(),
            styles: default_styles(),
            scripts: default_scripts(),
            output: default_output(),
            styles_output: default_styles_output(),
            scripts_output: default_scripts_output(),
            entry_script: default_entry_script(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BuildSettings {
    #[serde(default = "default_minify")]
    minify: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
        }
    }
}

fn default_assets() -> PathBuf {
    PathBuf::from("assets")
}
fn default_data() -> PathBuf {
    PathBuf::from("data")
}
fn default_content() -> PathBuf {
    PathBuf::from("src/hbs")
}
fn default_styles() -> PathBuf {
    PathBuf::from("src/styles")
}
fn default_scripts() -> PathBuf {
    PathBuf::from("src/scripts")
}
fn default_output() -> PathBuf {
    PathBuf::from("dist")
}
fn default_styles_output() -> PathBuf {
    PathBuf::from("assets/built/styles")
}
fn default_scripts_output() -> PathBuf {
    PathBuf::from("assets/built/scripts")
}
fn default_entry_script() -> PathBuf {
    PathBuf::from("main.js")
}
fn default_minify() -> bool {
    true
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    tracing::debug!("No config at {}, using defaults", path.display());
    Ok(ConfigFile::default())
}

/// Build a [`BuildConfig`] with source paths resolved against `root`.
fn resolve(file: ConfigFile, root: &Path) -> BuildConfig {
    let paths = file.paths;
    BuildConfig {
        assets_dir: root.join(paths.assets),
        data_dir: root.join(paths.data),
        content_dir: root.join(paths.content),
        styles_dir: root.join(paths.styles),
        scripts_dir: root.join(paths.scripts),
        output_dir: root.join(paths.output),
        styles_output: paths.styles_output,
        scripts_output: paths.scripts_output,
        entry_script: paths.entry_script,
        minify: file.build.minify,
        indicator: file.indicator,
    }
}

/// Run the build command.
pub fn run(
    config_path: &Path,
    tasks: &[Task],
    output: Option<PathBuf>,
    minify: Option<bool>,
) -> Result<()> {
    tracing::info!("Building site...");

    let file_config = load_config(config_path)?;
    let root = config_path.parent().unwrap_or(Path::new(""));

    let mut config = resolve(file_config, root);
    if let Some(output) = output {
        config.output_dir = output;
    }
    if let Some(minify) = minify {
        config.minify = minify;
    }

    let result = StaticBuilder::new(config).build(tasks)?;

    tracing::info!(
        "Built {} pages, {} stylesheets, {} scripts and {} assets in {}ms",
        result.pages,
        result.stylesheets,
        result.scripts,
        result.assets,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
