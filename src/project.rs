//! The project record and its editable fields.
//!
//! A `Project` is one catalog entry: where a project lives, how to launch it,
//! and how it is grouped in the table. The `Field` enum gives the five
//! editable fields a stable ordinal cycle used by the edit workflow.

use serde::{Deserialize, Serialize};

/// Placeholder group shown for projects without a category.
pub const UNCATEGORIZED: &str = "N/A";

/// One managed project entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Display name of the project.
    pub name: String,
    /// Directory the project lives in.
    pub path: String,
    /// Command used to launch it.
    pub command: String,
    /// Optional link (issue tracker, docs, deployment).
    #[serde(default)]
    pub link: String,
    /// Optional grouping category; empty displays as "N/A".
    #[serde(default)]
    pub category: String,
}

impl Project {
    /// The category as shown in the table; empty maps to "N/A".
    pub fn display_category(&self) -> &str {
        if self.category.is_empty() {
            UNCATEGORIZED
        } else {
            &self.category
        }
    }

    /// Placeholder record appended by the add key, edited in place afterwards.
    pub fn template() -> Self {
        Self {
            name: "New Project".to_string(),
            path: "/path/to/project".to_string(),
            command: "command".to_string(),
            link: String::new(),
            category: String::new(),
        }
    }
}

/// The editable fields, in edit-cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Path,
    Command,
    Link,
    Category,
}

impl Field {
    const ORDER: [Field; 5] = [
        Field::Name,
        Field::Path,
        Field::Command,
        Field::Link,
        Field::Category,
    ];

    pub const fn ordinal(self) -> usize {
        match self {
            Field::Name => 0,
            Field::Path => 1,
            Field::Command => 2,
            Field::Link => 3,
            Field::Category => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Path => "Path",
            Field::Command => "Command",
            Field::Link => "Link",
            Field::Category => "Category",
        }
    }

    /// The next field in the cycle, wrapping from Category back to Name.
    pub fn next(self) -> Self {
        Self::ORDER[(self.ordinal() + 1) % Self::ORDER.len()]
    }

    /// The previous field in the cycle, wrapping from Name back to Category.
    pub fn prev(self) -> Self {
        Self::ORDER[(self.ordinal() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn get(self, project: &Project) -> &str {
        match self {
            Field::Name => &project.name,
            Field::Path => &project.path,
            Field::Command => &project.command,
            Field::Link => &project.link,
            Field::Category => &project.category,
        }
    }

    pub fn set(self, project: &mut Project, value: String) {
        match self {
            Field::Name => project.name = value,
            Field::Path => project.path = value,
            Field::Command => project.command = value,
            Field::Link => project.link = value,
            Field::Category => project.category = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_cycle_wraps_both_directions() {
        assert_eq!(Field::Category.next(), Field::Name);
        assert_eq!(Field::Name.prev(), Field::Category);

        let mut field = Field::Name;
        for _ in 0..Field::ORDER.len() {
            field = field.next();
        }
        assert_eq!(field, Field::Name);
    }

    #[test]
    fn field_ordinals_are_stable() {
        for (expected, field) in Field::ORDER.iter().enumerate() {
            assert_eq!(field.ordinal(), expected);
        }
    }

    #[test]
    fn set_and_get_round_trip_every_field() {
        let mut project = Project::template();
        for field in Field::ORDER {
            field.set(&mut project, format!("value-{}", field.label()));
        }
        for field in Field::ORDER {
            assert_eq!(field.get(&project), format!("value-{}", field.label()));
        }
    }

    #[test]
    fn empty_category_displays_as_placeholder() {
        let mut project = Project::template();
        assert_eq!(project.display_category(), UNCATEGORIZED);
        project.category = "Web".to_string();
        assert_eq!(project.display_category(), "Web");
    }
}
