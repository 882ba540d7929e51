//! Browser rendition of the bootstrap, shipped as its own script file.

use crate::indicator::IndicatorConfig;

/// Renders the deployable bootstrap script.
pub struct BootstrapScript;

impl BootstrapScript {
    /// Render the script for `config`.
    ///
    /// The script behaves like [`crate::PageReadyBootstrap::attach`]: it checks
    /// `document.readyState` immediately and on every `readystatechange`, and
    /// swaps the indicator classes at most once. A missing element is ignored.
    pub fn render(config: &IndicatorConfig) -> String {
        format!(
            r#"// kiln page-ready bootstrap
(function () {{
  'use strict';
  var initialized = false;
  function init() {{
    if (initialized) return;
    initialized = true;
    var el = document.querySelector({element});
    if (!el) return;
    el.classList.remove({unavailable});
    el.classList.add({available});
  }}
  function onReadyStateChange() {{
    if (document.readyState === 'complete') init();
  }}
  document.addEventListener('readystatechange', onReadyStateChange);
  onReadyStateChange();
}})();
"#,
            element = js_string(&config.element),
            unavailable = js_string(&config.unavailable_class),
            available = js_string(&config.available_class),
        )
    }
}

/// Quote `s` as a JavaScript string literal.
fn js_string(s: &str) -> String {
    // JSON strings are valid JS string literals once the two line separators
    // JSON leaves raw are escaped.
    let quoted = serde_json::Value::from(s).to_string();
    quoted
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DEFAULT_SCRIPT: &str = r#"// kiln page-ready bootstrap
(function () {
  'use strict';
  var initialized = false;
  function init() {
    if (initialized) return;
    initialized = true;
    var el = document.querySelector("html");
    if (!el) return;
    el.classList.remove("no-js");
    el.classList.add("js");
  }
  function onReadyStateChange() {
    if (document.readyState === 'complete') init();
  }
  document.addEventListener('readystatechange', onReadyStateChange);
  onReadyStateChange();
})();
"#;

    #[test]
    fn renders_full_default_script() {
        assert_eq!(BootstrapScript::render(&IndicatorConfig::default()), DEFAULT_SCRIPT);
    }

    #[test]
    fn renders_default_classes() {
        let script = BootstrapScript::render(&IndicatorConfig::default());

        assert!(script.contains(r#"document.querySelector("html")"#));
        assert!(script.contains(r#"el.classList.remove("no-js")"#));
        assert!(script.contains(r#"el.classList.add("js")"#));
        assert!(script.contains("addEventListener('readystatechange'"));
        assert!(script.contains("document.readyState === 'complete'"));
    }

    #[test]
    fn checks_state_on_attach() {
        let script = BootstrapScript::render(&IndicatorConfig::default());

        assert!(script.trim_end().ends_with("onReadyStateChange();\n})();"));
    }

    #[test]
    fn escapes_config_values() {
        let config = IndicatorConfig {
            element: r#"[data-x="a"]"#.to_string(),
            unavailable_class: "no-js\u{2028}".to_string(),
            ..Default::default()
        };

        let script = BootstrapScript::render(&config);

        assert!(script.contains(r#"document.querySelector("[data-x=\"a\"]")"#));
        assert!(script.contains(r#"el.classList.remove("no-js\u2028")"#));
    }
}
