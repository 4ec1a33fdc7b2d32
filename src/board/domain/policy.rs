//! Board policy: task text limits and default column layout.

use serde::{Deserialize, Serialize};

/// Length limits applied to task text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLimits {
    /// Maximum title length in characters.
    pub max_title_chars: usize,
    /// Maximum description length in characters.
    pub max_description_chars: usize,
}

impl Default for TaskLimits {
    fn default() -> Self {
        Self {
            max_title_chars: 50,
            max_description_chars: 300,
        }
    }
}

/// Policy applied when creating boards and validating tasks.
///
/// Every field has a default, so a configuration file only needs the keys
/// it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardPolicy {
    /// Maximum title length in characters.
    pub max_title_chars: usize,
    /// Maximum description length in characters.
    pub max_description_chars: usize,
    /// Name of the first column, where new tasks land.
    pub backlog_column: String,
    /// Name of the middle column.
    pub in_progress_column: String,
    /// Name of the terminal column.
    pub done_column: String,
}

impl Default for BoardPolicy {
    fn default() -> Self {
        let limits = TaskLimits::default();
        Self {
            max_title_chars: limits.max_title_chars,
            max_description_chars: limits.max_description_chars,
            backlog_column: "backlog".to_owned(),
            in_progress_column: "in progress".to_owned(),
            done_column: "done".to_owned(),
        }
    }
}

impl BoardPolicy {
    /// Returns the task text limits.
    #[must_use]
    pub const fn task_limits(&self) -> TaskLimits {
        TaskLimits {
            max_title_chars: self.max_title_chars,
            max_description_chars: self.max_description_chars,
        }
    }

    /// Returns the default column names in ordinal order.
    #[must_use]
    pub fn default_columns(&self) -> [&str; 3] {
        [
            self.backlog_column.as_str(),
            self.in_progress_column.as_str(),
            self.done_column.as_str(),
        ]
    }
}
