//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use kiln_ready::{BootstrapScript, IndicatorConfig};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::assets::{AssetPipeline, ScriptSource};
use crate::data::load_data;
use crate::task::Task;
use crate::templates::TemplateEngine;

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Static assets copied verbatim into the output directory
    pub assets_dir: PathBuf,

    /// JSON/YAML files exposed to templates
    pub data_dir: PathBuf,

    /// Page, layout and partial templates
    pub content_dir: PathBuf,

    /// Stylesheets
    pub styles_dir: PathBuf,

    /// Scripts
    pub scripts_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Built stylesheets location, relative to `output_dir`
    pub styles_output: PathBuf,

    /// Built scripts location, relative to `output_dir`
    pub scripts_output: PathBuf,

    /// Entry script, relative to `scripts_dir`
    pub entry_script: PathBuf,

    /// Minify CSS and JS output
    pub minify: bool,

    /// No-JS indicator the bootstrap flips
    pub indicator: IndicatorConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            data_dir: PathBuf::from("data"),
            content_dir: PathBuf::from("src/hbs"),
            styles_dir: PathBuf::from("src/styles"),
            scripts_dir: PathBuf::from("src/scripts"),
            output_dir: PathBuf::from("dist"),
            styles_output: PathBuf::from("assets/built/styles"),
            scripts_output: PathBuf::from("assets/built/scripts"),
            entry_script: PathBuf::from("main.js"),
            minify: true,
            indicator: IndicatorConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Output path of the script bundle, relative to `output_dir`.
    pub fn bundle_path(&self) -> PathBuf {
        let stem = self
            .entry_script
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("main");
        self.scripts_output.join(format!("{}.built.js", stem))
    }

    /// Output path of the page-ready bootstrap, relative to `output_dir`.
    ///
    /// The bootstrap is never bundled with user scripts, so a script that
    /// fails to parse cannot stop the indicator from flipping.
    pub fn bootstrap_path(&self) -> PathBuf {
        self.scripts_output.join("bootstrap.built.js")
    }
}

/// Result of a build operation.
#[derive(Debug, Default)]
pub struct BuildResult {
    /// Number of pages rendered
    pub pages: usize,

    /// Number of stylesheets written
    pub stylesheets: usize,

    /// Number of scripts bundled
    pub scripts: usize,

    /// Number of static assets copied
    pub assets: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read sources: {0}")]
    ReadError(String),

    #[error("Failed to parse: {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to process stylesheet: {path}: {message}")]
    StyleError { path: String, message: String },

    #[error("Failed to bundle scripts: {0}")]
    ScriptError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Run `tasks`. An empty list runs every task.
    ///
    /// `assets` runs first and on its own, since it copies into the root of
    /// `output_dir`. The remaining tasks then run concurrently, so a rendered
    /// page or built file overwrites an asset at the same path.
    pub fn build(&self, tasks: &[Task]) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let requested: &[Task] = if tasks.is_empty() { &Task::ALL } else { tasks };
        let mut selected: Vec<Task> = Vec::with_capacity(requested.len());
        for task in requested {
            if !selected.contains(task) {
                selected.push(*task);
            }
        }

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let mut outcomes = Vec::with_capacity(selected.len());
        if let Some(pos) = selected.iter().position(|t| *t == Task::Assets) {
            let task = selected.remove(pos);
            outcomes.push(self.run_task(task).map(|count| (task, count)));
        }
        outcomes.par_extend(
            selected
                .par_iter()
                .map(|&task| self.run_task(task).map(|count| (task, count))),
        );

        let mut result = BuildResult {
            output_dir: self.config.output_dir.clone(),
            ..Default::default()
        };

        for outcome in outcomes {
            let (task, count) = outcome?;
            match task {
                Task::Html => result.pages = count,
                Task::Css => result.stylesheets = count,
                Task::Js => result.scripts = count,
                Task::Assets => result.assets = count,
            }
        }

        result.duration_ms = start.elapsed().as_millis() as u64;
        Ok(result)
    }

    fn run_task(&self, task: Task) -> Result<usize, BuildError> {
        let start = Instant::now();
        let count = match task {
            Task::Html => self.build_content()?,
            Task::Css => self.build_styles()?,
            Task::Js => self.build_scripts()?,
            Task::Assets => self.build_assets()?,
        };
        tracing::info!(
            "Task '{}' finished: {} file(s) in {}ms",
            task,
            count,
            start.elapsed().as_millis()
        );
        Ok(count)
    }

    /// Render every page template with the data files as context.
    ///
    /// Output is not re-indented. Only trailing whitespace is trimmed, from
    /// each line and from the end of the page.
    fn build_content(&self) -> Result<usize, BuildError> {
        let engine = TemplateEngine::from_dir(&self.config.content_dir)?;
        let mut data = load_data(&self.config.data_dir)?;

        let kiln = serde_json::json!({
            "indicator": self.config.indicator.clone(),
            "bootstrap": url_path(&self.config.bootstrap_path()),
            "script": url_path(&self.config.bundle_path()),
            "styles": url_path(&self.config.styles_output),
        });
        if data.insert("kiln".to_string(), kiln).is_some() {
            tracing::warn!("Data file 'kiln' is shadowed by build information");
        }
        let context = serde_json::Value::Object(data);

        let results: Vec<Result<(), BuildError>> = engine
            .pages()
            .par_iter()
            .map(|page| {
                let html = engine
                    .render_page(&page.name, &context)
                    .map_err(|e| BuildError::TemplateError(format!("{}: {}", page.name, e)))?;
                write_output(&self.config.output_dir.join(&page.output), html)?;
                tracing::debug!("Rendered {} -> {}", page.name, page.output.display());
                Ok(())
            })
            .collect();

        for result in results {
            result?;
        }

        Ok(engine.pages().len())
    }

    /// Write `<stem>.built.css` for every non-partial stylesheet.
    fn build_styles(&self) -> Result<usize, BuildError> {
        let styles_dir = &self.config.styles_dir;
        if !styles_dir.exists() {
            tracing::warn!("Styles directory not found: {}", styles_dir.display());
            return Ok(0);
        }

        for path in uncompiled_styles(styles_dir) {
            tracing::warn!("Skipping {}: Sass is not compiled, use plain CSS", path.display());
        }

        let out_dir = self.config.output_dir.join(&self.config.styles_output);
        let mut count = 0;

        for path in files_with_extension(styles_dir, "css") {
            let file_name = path.file_name().and_then(|f| f.to_str()).unwrap_or("");
            if file_name.starts_with('_') {
                continue;
            }

            let css = fs::read_to_string(&path)
                .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;

            let css = if self.config.minify {
                match AssetPipeline::minify_css(&css) {
                    Ok(minified) => minified,
                    Err(message) => {
                        // Emitted unminified; the rest of the build carries on.
                        let err = BuildError::StyleError {
                            path: path.display().to_string(),
                            message,
                        };
                        tracing::warn!("{}", err);
                        css
                    }
                }
            } else {
                css
            };

            let relative = path.strip_prefix(styles_dir).unwrap_or(&path);
            let stem = relative.file_stem().and_then(|s| s.to_str()).unwrap_or("style");
            let target = out_dir
                .join(relative.parent().unwrap_or(Path::new("")))
                .join(format!("{}.built.css", stem));

            write_output(&target, css)?;
            tracing::debug!("Built {}", target.display());
            count += 1;
        }

        Ok(count)
    }

    /// Write the bootstrap, then bundle the entry script and its modules.
    fn build_scripts(&self) -> Result<usize, BuildError> {
        let bootstrap = self.finish_script(
            "bootstrap",
            BootstrapScript::render(&self.config.indicator),
        )?;
        let bootstrap_path = self.config.output_dir.join(self.config.bootstrap_path());
        write_output(&bootstrap_path, bootstrap)?;
        tracing::debug!("Built {}", bootstrap_path.display());

        let scripts_dir = &self.config.scripts_dir;
        let entry_path = scripts_dir.join(&self.config.entry_script);

        if !entry_path.is_file() {
            return Err(BuildError::ScriptError(format!(
                "Entry script not found: {}",
                entry_path.display()
            )));
        }

        let read = |path: &Path| -> Result<ScriptSource, BuildError> {
            let source = fs::read_to_string(path)
                .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;
            Ok(ScriptSource {
                name: url_path(path.strip_prefix(scripts_dir).unwrap_or(path)),
                source,
            })
        };

        let entry = read(&entry_path)?;
        let modules = files_with_extension(scripts_dir, "js")
            .into_iter()
            .filter(|p| *p != entry_path)
            .map(|p| read(&p))
            .collect::<Result<Vec<_>, _>>()?;

        for script in modules.iter().chain(std::iter::once(&entry)) {
            if let Some(line) = AssetPipeline::module_syntax_line(&script.source) {
                return Err(BuildError::ScriptError(format!(
                    "{}:{}: import/export is not supported, scripts are concatenated",
                    script.name, line
                )));
            }
        }

        let bundle = self.finish_script(
            &entry.name,
            AssetPipeline::bundle_scripts(&modules, &entry),
        )?;
        let bundle_path = self.config.output_dir.join(self.config.bundle_path());
        write_output(&bundle_path, bundle)?;
        tracing::debug!("Built {}", bundle_path.display());

        Ok(modules.len() + 1)
    }

    fn finish_script(&self, name: &str, js: String) -> Result<String, BuildError> {
        if !self.config.minify {
            return Ok(js);
        }
        AssetPipeline::minify_js(&js)
            .map_err(|e| BuildError::ScriptError(format!("{}: {}", name, e)))
    }

    /// Copy static assets into the output directory.
    fn build_assets(&self) -> Result<usize, BuildError> {
        if !self.config.assets_dir.exists() {
            tracing::warn!(
                "Assets directory not found: {}",
                self.config.assets_dir.display()
            );
            return Ok(0);
        }

        AssetPipeline::copy_tree(&self.config.assets_dir, &self.config.output_dir)
    }
}

/// Files under `dir` with extension `ext`, sorted by path.
fn files_with_extension(dir: &Path, ext: &str) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(ext))
        .collect()
}

/// Sass sources under `dir`, which the css task does not compile.
fn uncompiled_styles(dir: &Path) -> Vec<PathBuf> {
    let mut paths = files_with_extension(dir, "scss");
    paths.extend(files_with_extension(dir, "sass"));
    paths.sort();
    paths
}

/// `path` rendered with `/` separators.
fn url_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn write_output(path: &Path, contents: String) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }
    fs::write(path, contents)
        .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}
