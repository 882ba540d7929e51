//! Scaffold a new site.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Files written by `kiln init`, relative to the site root.
const SCAFFOLD: &[(&str, &str)] = &[
    ("kiln.toml", DEFAULT_CONFIG),
    ("src/hbs/layouts/base.hbs", DEFAULT_LAYOUT),
    ("src/hbs/partials/header.hbs", DEFAULT_HEADER),
    ("src/hbs/index.hbs", DEFAULT_INDEX),
    ("src/styles/main.css", DEFAULT_CSS),
    ("src/scripts/main.js", DEFAULT_JS),
    ("data/site.json", DEFAULT_DATA),
    ("assets/.gitkeep", ""),
];

/// Run the init command.
pub fn run(root: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing kiln site...");

    if root.join("src").exists() && !yes {
        tracing::warn!("src/ directory already exists. Use --yes to overwrite.");
        return Ok(());
    }

    for (relative, content) in SCAFFOLD {
        let path = root.join(relative);
        if path.exists() && !yes {
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", relative))?;
        tracing::info!("Created {}", relative);
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'kiln build' to build the site into dist/.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Kiln Configuration

[paths]
# Static files copied as-is into the output directory
assets = "assets"

# JSON/YAML files exposed to templates by file name
data = "data"

# Templates; files named index* are rendered as pages
content = "src/hbs"

styles = "src/styles"
scripts = "src/scripts"
output = "dist"

[build]
# Enable CSS minification
minify = true

[indicator]
# Element whose class tells styles whether scripting is available
element = "html"
unavailable_class = "no-js"
available_class = "js"
"#;

const DEFAULT_LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en" class="{{ kiln.indicator.unavailable_class }}">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{% block title %}{{ site.title }}{% endblock %}</title>
    <link rel="stylesheet" href="/{{ kiln.styles }}/main.built.css">
    <script src="/{{ kiln.bootstrap }}"></script>
</head>
<body>
    {% include "partials/header.hbs" %}
    <main>
        {% block content %}
        {% endblock %}
    </main>
    <script src="/{{ kiln.script }}"></script>
</body>
</html>
"#;

const DEFAULT_HEADER: &str = r#"<header>
    <a href="/">{{ site.title }}</a>
</header>
"#;

const DEFAULT_INDEX: &str = r#"{% extends "layouts/base.hbs" %}

{% block content %}
<h1>{{ site.title }}</h1>
<p class="no-js-only">Scripting is disabled; showing the static version.</p>
<p class="js-only">Scripting is available.</p>
{% endblock %}
"#;

const DEFAULT_CSS: &str = r#"body {
  font-family: system-ui, -apple-system, sans-serif;
  line-height: 1.6;
  margin: 0 auto;
  max-width: 48rem;
  padding: 2rem;
}

.no-js .js-only {
  display: none;
}

.js .no-js-only {
  display: none;
}
"#;

const DEFAULT_JS: &str = r#"'use strict';

// Scripts are concatenated, not bundled: use plain scripts, not import/export.
// The page-ready bootstrap ships separately as bootstrap.built.js.
console.log('kiln site loaded');
"#;

const DEFAULT_DATA: &str = r#"{
  "title": "My Site"
}
"#;
