//! Asset pipeline for CSS, JavaScript, and static files.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::builder::BuildError;

/// A script to include in a bundle.
#[derive(Debug, Clone)]
pub struct ScriptSource {
    /// Path relative to the scripts directory, used as the banner
    pub name: String,

    /// Script contents
    pub source: String,
}

const MODULE_PREFIXES: &[&str] = &[
    "import ", "import{", "import*", "import\"", "import'", "export ", "export{", "export*",
];

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }

    /// Minify JavaScript using minify-js.
    pub fn minify_js(js: &str) -> Result<String, String> {
        use minify_js::{minify, Session, TopLevelMode};

        let session = Session::new();
        let mut out = Vec::new();
        minify(&session, TopLevelMode::Global, js.as_bytes(), &mut out)
            .map_err(|e| format!("JS minify error: {:?}", e))?;

        String::from_utf8(out).map_err(|e| format!("JS minify error: {}", e))
    }

    /// Line number of the first top-level `import`/`export` statement.
    ///
    /// Concatenated scripts run as classic scripts, where module syntax is a
    /// syntax error that takes down the whole file.
    pub fn module_syntax_line(source: &str) -> Option<usize> {
        source
            .lines()
            .position(|line| {
                let line = line.trim_start();
                MODULE_PREFIXES.iter().any(|prefix| line.starts_with(prefix))
            })
            .map(|i| i + 1)
    }

    /// Concatenate scripts into one bundle.
    ///
    /// `modules` come first in the given order, then the entry script. Each is
    /// wrapped in its own function scope.
    pub fn bundle_scripts(modules: &[ScriptSource], entry: &ScriptSource) -> String {
        let mut bundle = String::new();
        for script in modules.iter().chain(std::iter::once(entry)) {
            if !bundle.is_empty() {
                bundle.push('\n');
            }
            bundle.push_str(&format!(
                "// {}\n(function () {{\n{}\n}})();\n",
                script.name,
                script.source.trim_end()
            ));
        }
        bundle
    }

    /// Copy every file under `src` (dotfiles included) into `dst`, keeping
    /// relative paths. Returns the number of files copied.
    pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize, BuildError> {
        let mut count = 0;

        for entry in WalkDir::new(src).follow_links(true) {
            let entry = entry.map_err(|e| BuildError::ReadError(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
            let target = dst.join(relative);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
            }
            fs::copy(entry.path(), &target).map_err(|e| {
                BuildError::WriteError(format!("{}: {}", target.display(), e))
            })?;

            tracing::debug!("Copied {}", relative.display());
            count += 1;
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn minifies_css() {
        let css = r#"
.button {
    background-color: blue;
    padding: 10px;
}
        "#;

        let minified = AssetPipeline::minify_css(css).unwrap();

        assert!(!minified.contains('\n'));
        assert!(minified.contains(".button"));
    }

    #[test]
    fn bundles_modules_before_entry() {
        let modules = vec![ScriptSource {
            name: "modules/noJS.js".to_string(),
            source: "var noJs = 1;\n".to_string(),
        }];
        let entry = ScriptSource {
            name: "main.js".to_string(),
            source: "main();".to_string(),
        };

        let bundle = AssetPipeline::bundle_scripts(&modules, &entry);

        assert_eq!(
            bundle,
            "// modules/noJS.js\n(function () {\nvar noJs = 1;\n})();\n\n// main.js\n(function () {\nmain();\n})();\n"
        );
    }

    #[test]
    fn minifies_js() {
        let js = "// banner\n(function () {\n  var answer = 40 + 2;\n  console.log(answer);\n})();\n";

        let minified = AssetPipeline::minify_js(js).unwrap();

        assert!(!minified.contains("banner"));
        assert!(minified.contains("console.log"));
        assert!(minified.len() < js.len());
    }

    #[test]
    fn finds_module_syntax() {
        let esm = "'use strict';\n\nimport * as NoJs from './modules/noJS';\n";

        assert_eq!(AssetPipeline::module_syntax_line(esm), Some(3));
        assert_eq!(
            AssetPipeline::module_syntax_line("  export const init = () => {};"),
            Some(1)
        );
        assert_eq!(AssetPipeline::module_syntax_line("import('./lazy.js');\nvar exported = 1;"), None);
    }

    #[test]
    fn copies_tree_with_dotfiles() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("assets");
        let dst = temp.path().join("dist");
        fs::create_dir_all(src.join("img")).unwrap();
        fs::write(src.join(".htaccess"), "Options -Indexes").unwrap();
        fs::write(src.join("img/logo.svg"), "<svg/>").unwrap();

        let count = AssetPipeline::copy_tree(&src, &dst).unwrap();

        assert_eq!(count, 2);
        assert_eq!(fs::read_to_string(dst.join(".htaccess")).unwrap(), "Options -Indexes");
        assert!(dst.join("img/logo.svg").exists());
    }
}
