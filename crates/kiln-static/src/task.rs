//! Build tasks.

use std::fmt;
use std::str::FromStr;

/// One independently runnable step of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Render content pages from templates, trimming trailing whitespace
    /// without re-indenting
    Html,
    /// Process stylesheets
    Css,
    /// Bundle scripts
    Js,
    /// Copy static assets; runs before the other tasks, which overwrite it
    Assets,
}

impl Task {
    /// Every task, in the order the default build lists them.
    pub const ALL: [Task; 4] = [Task::Assets, Task::Html, Task::Css, Task::Js];

    /// The task's command-line name.
    pub fn name(self) -> &'static str {
        match self {
            Task::Html => "html",
            Task::Css => "css",
            Task::Js => "js",
            Task::Assets => "assets",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing a task name that does not exist.
#[derive(Debug, thiserror::Error)]
#[error("Unknown task '{0}' (expected one of: html, css, js, assets)")]
pub struct UnknownTask(pub String);

impl FromStr for Task {
    type Err = UnknownTask;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(Task::Html),
            "css" => Ok(Task::Css),
            "js" => Ok(Task::Js),
            "assets" => Ok(Task::Assets),
            other => Err(UnknownTask(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_task_names() {
        for task in Task::ALL {
            assert_eq!(task.name().parse::<Task>().unwrap(), task);
        }
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "watch".parse::<Task>().unwrap_err();

        assert!(err.to_string().contains("watch"));
    }
}
