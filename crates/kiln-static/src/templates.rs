//! Template engine for rendering content pages.
//!
//! Every `.html` and `.hbs` file under the content directory is registered by
//! its relative path, so any template can serve as a layout
//! (`{% extends "layouts/base.html" %}`) or a partial
//! (`{% include "partials/header.html" %}`). Only files whose name starts
//! with `index` are rendered as pages.

use std::fs;
use std::path::{Path, PathBuf};

use minijinja::Environment;
use walkdir::WalkDir;

use crate::builder::BuildError;

/// A template that renders to an output page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplate {
    /// Registered template name (relative path with `/` separators)
    pub name: String,

    /// Path of the output file relative to the output directory
    pub output: PathBuf,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
    pages: Vec<PageTemplate>,
}

impl TemplateEngine {
    /// Load every template under `content_dir`.
    pub fn from_dir(content_dir: &Path) -> Result<Self, BuildError> {
        if !content_dir.exists() {
            return Err(BuildError::ReadError(format!(
                "Content directory not found: {}",
                content_dir.display()
            )));
        }

        let mut env = Environment::new();
        // Block tags don't leave their own indentation and newlines behind.
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        let mut pages = Vec::new();

        for entry in WalkDir::new(content_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if ext != "html" && ext != "hbs" {
                continue;
            }

            let relative = path.strip_prefix(content_dir).unwrap_or(path);
            let name = template_name(relative);

            let source = fs::read_to_string(path)
                .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;

            env.add_template_owned(name.clone(), source)
                .map_err(|e| BuildError::ParseError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;

            let is_page = relative
                .file_name()
                .and_then(|f| f.to_str())
                .is_some_and(|f| f.starts_with("index"));

            if is_page {
                tracing::debug!("Found page template {}", name);
                pages.push(PageTemplate {
                    name,
                    output: relative.with_extension("html"),
                });
            }
        }

        Ok(Self { env, pages })
    }

    /// Templates that render to output pages, in path order.
    pub fn pages(&self) -> &[PageTemplate] {
        &self.pages
    }

    /// Render a template by name.
    ///
    /// Indentation is left as the templates produce it. Trailing whitespace
    /// is trimmed from each line and from the end of the output.
    pub fn render_page<S: serde::Serialize>(
        &self,
        template: &str,
        context: S,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;
        let html = tmpl.render(context)?;
        Ok(tidy_html(&html))
    }
}

/// Registered name for a template at `relative` path.
fn template_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Strip trailing whitespace from every line and the end of the document.
fn tidy_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    for line in html.lines() {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn renders_page_through_layout() {
        let temp = tempdir().unwrap();
        write(
            temp.path(),
            "layouts/base.html",
            "<html class=\"no-js\">\n<body>\n{% block content %}\n{% endblock %}\n</body>\n</html>\n",
        );
        write(
            temp.path(),
            "index.hbs",
            "{% extends \"layouts/base.html\" %}\n{% block content %}\n<h1>{{ site.title }}</h1>\n{% endblock %}\n",
        );

        let engine = TemplateEngine::from_dir(temp.path()).unwrap();
        let html = engine
            .render_page("index.hbs", json!({ "site": { "title": "Hello" } }))
            .unwrap();

        assert_eq!(
            html,
            "<html class=\"no-js\">\n<body>\n<h1>Hello</h1>\n</body>\n</html>"
        );
    }

    #[test]
    fn only_index_files_are_pages() {
        let temp = tempdir().unwrap();
        write(temp.path(), "index.html", "home");
        write(temp.path(), "index-about.hbs", "about");
        write(temp.path(), "blog/index.hbs", "blog");
        write(temp.path(), "partials/header.hbs", "header");
        write(temp.path(), "notes.txt", "ignored");

        let engine = TemplateEngine::from_dir(temp.path()).unwrap();
        let outputs: Vec<_> = engine.pages().iter().map(|p| p.output.clone()).collect();

        assert_eq!(
            outputs,
            vec![
                PathBuf::from("blog/index.html"),
                PathBuf::from("index-about.html"),
                PathBuf::from("index.html"),
            ]
        );
        assert_eq!(engine.pages()[0].name, "blog/index.hbs");
    }

    #[test]
    fn includes_partials() {
        let temp = tempdir().unwrap();
        write(temp.path(), "partials/header.hbs", "<header>{{ name }}</header>");
        write(temp.path(), "index.html", "{% include \"partials/header.hbs\" %}\n<main></main>");

        let engine = TemplateEngine::from_dir(temp.path()).unwrap();
        let html = engine.render_page("index.html", json!({ "name": "kiln" })).unwrap();

        assert_eq!(html, "<header>kiln</header><main></main>");
    }

    #[test]
    fn tidies_trailing_whitespace() {
        assert_eq!(tidy_html("<p>a</p>   \n\n<p>b</p>\t\n\n"), "<p>a</p>\n\n<p>b</p>");
    }

    #[test]
    fn keeps_indentation_as_written() {
        assert_eq!(
            tidy_html("<ul>\n<li>a</li>  \n      <li>b</li>\n</ul>\n"),
            "<ul>\n<li>a</li>\n      <li>b</li>\n</ul>"
        );
    }

    #[test]
    fn missing_content_directory_is_an_error() {
        let temp = tempdir().unwrap();

        let result = TemplateEngine::from_dir(&temp.path().join("missing"));

        assert!(matches!(result, Err(BuildError::ReadError(_))));
    }
}
