//! The no-JS indicator and its implementations.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Value of the no-JS indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorState {
    /// Scripting has not initialized; fallback content is shown.
    #[default]
    Unavailable,
    /// Scripting has initialized.
    Available,
}

/// Presentation flag that styles consult to show or hide no-script content.
pub trait Indicator {
    /// Flip the indicator to [`IndicatorState::Available`]. Must be idempotent.
    fn set_available(&mut self);

    /// Current value of the indicator.
    fn state(&self) -> IndicatorState;
}

impl<T: Indicator + ?Sized> Indicator for Rc<RefCell<T>> {
    fn set_available(&mut self) {
        self.borrow_mut().set_available();
    }

    fn state(&self) -> IndicatorState {
        self.borrow().state()
    }
}

impl<T: Indicator + ?Sized> Indicator for Box<T> {
    fn set_available(&mut self) {
        (**self).set_available();
    }

    fn state(&self) -> IndicatorState {
        (**self).state()
    }
}

/// Where the indicator lives in the page and which classes express it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// CSS selector for the element carrying the indicator class
    #[serde(default = "default_element")]
    pub element: String,

    /// Class present while scripting is unavailable
    #[serde(default = "default_unavailable_class")]
    pub unavailable_class: String,

    /// Class present once scripting has initialized
    #[serde(default = "default_available_class")]
    pub available_class: String,
}

fn default_element() -> String {
    "html".to_string()
}
fn default_unavailable_class() -> String {
    "no-js".to_string()
}
fn default_available_class() -> String {
    "js".to_string()
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            element: default_element(),
            unavailable_class: default_unavailable_class(),
            available_class: default_available_class(),
        }
    }
}

/// In-memory class list of the indicator element.
#[derive(Debug, Clone)]
pub struct ClassList {
    config: IndicatorConfig,
    classes: Vec<String>,
}

impl ClassList {
    /// A class list holding only the unavailable class, as served.
    pub fn new(config: IndicatorConfig) -> Self {
        let classes = vec![config.unavailable_class.clone()];
        Self { config, classes }
    }

    /// A class list parsed from a `class` attribute value.
    pub fn from_attribute(config: IndicatorConfig, attribute: &str) -> Self {
        let mut classes: Vec<String> = Vec::new();
        for class in attribute.split_whitespace() {
            if !classes.iter().any(|c| c == class) {
                classes.push(class.to_string());
            }
        }
        Self { config, classes }
    }

    /// Whether `class` is present.
    pub fn contains(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// The list rendered back into a `class` attribute value.
    pub fn to_attribute(&self) -> String {
        self.classes.join(" ")
    }
}

impl Indicator for ClassList {
    fn set_available(&mut self) {
        let unavailable = &self.config.unavailable_class;
        self.classes.retain(|c| c != unavailable);
        if !self.contains(&self.config.available_class) {
            self.classes.push(self.config.available_class.clone());
        }
    }

    fn state(&self) -> IndicatorState {
        if self.contains(&self.config.available_class)
            && !self.contains(&self.config.unavailable_class)
        {
            IndicatorState::Available
        } else {
            IndicatorState::Unavailable
        }
    }
}

/// Indicator for a page where the target element is absent.
///
/// Mutations are a silent no-op and the state stays unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl Indicator for Detached {
    fn set_available(&mut self) {
        tracing::debug!("indicator element absent, nothing to update");
    }

    fn state(&self) -> IndicatorState {
        IndicatorState::Unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_unavailable() {
        let list = ClassList::new(IndicatorConfig::default());

        assert_eq!(list.state(), IndicatorState::Unavailable);
        assert_eq!(list.to_attribute(), "no-js");
    }

    #[test]
    fn swaps_classes_and_keeps_others() {
        let mut list = ClassList::from_attribute(IndicatorConfig::default(), "theme-dark no-js");

        list.set_available();

        assert_eq!(list.state(), IndicatorState::Available);
        assert_eq!(list.to_attribute(), "theme-dark js");
    }

    #[test]
    fn set_available_is_idempotent() {
        let mut list = ClassList::new(IndicatorConfig::default());

        list.set_available();
        list.set_available();
        list.set_available();

        assert_eq!(list.state(), IndicatorState::Available);
        assert_eq!(list.to_attribute(), "js");
    }

    #[test]
    fn honors_custom_classes() {
        let config = IndicatorConfig {
            element: "body".to_string(),
            unavailable_class: "scripting-off".to_string(),
            available_class: "scripting-on".to_string(),
        };
        let mut list = ClassList::new(config);

        list.set_available();

        assert!(list.contains("scripting-on"));
        assert!(!list.contains("scripting-off"));
    }

    #[test]
    fn detached_is_a_silent_no_op() {
        let mut detached = Detached;

        detached.set_available();

        assert_eq!(detached.state(), IndicatorState::Unavailable);
    }

    #[test]
    fn config_fills_missing_fields() {
        let config: IndicatorConfig =
            serde_json::from_str(r#"{ "available_class": "has-js" }"#).unwrap();

        assert_eq!(config.element, "html");
        assert_eq!(config.unavailable_class, "no-js");
        assert_eq!(config.available_class, "has-js");
    }
}
