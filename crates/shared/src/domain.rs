use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

id_newtype!(TodoId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub name: String,
    pub completed: bool,
}

impl TodoItem {
    /// New active item with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TodoId::generate(),
            name: name.into(),
            completed: false,
        }
    }
}

/// Read-only projection of a [`TodoItem`] handed to views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoVm {
    pub id: TodoId,
    pub name: String,
    pub completed: bool,
}

impl From<&TodoItem> for TodoVm {
    fn from(item: &TodoItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            completed: item.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TodoFilter {
    pub fn matches(self, item: &TodoItem) -> bool {
        match self {
            Self::All => true,
            Self::Active => !item.completed,
            Self::Completed => item.completed,
        }
    }

    /// Projects the items selected by this filter, keeping their relative order.
    pub fn project<'a, I>(self, items: I) -> Vec<TodoVm>
    where
        I: IntoIterator<Item = &'a TodoItem>,
    {
        items
            .into_iter()
            .filter(|item| self.matches(item))
            .map(TodoVm::from)
            .collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TodoFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilter(pub String);

impl fmt::Display for UnknownFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown filter '{}', expected one of: all, active, completed",
            self.0
        )
    }
}

impl std::error::Error for UnknownFilter {}

impl FromStr for TodoFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownFilter(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TodoCounts {
    pub active: usize,
    pub completed: usize,
}

impl TodoCounts {
    pub fn of_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a TodoItem>,
    {
        Self::tally(items.into_iter().map(|item| item.completed))
    }

    pub fn of_view_models<'a, I>(todos: I) -> Self
    where
        I: IntoIterator<Item = &'a TodoVm>,
    {
        Self::tally(todos.into_iter().map(|todo| todo.completed))
    }

    fn tally(flags: impl Iterator<Item = bool>) -> Self {
        flags.fold(Self::default(), |mut counts, completed| {
            if completed {
                counts.completed += 1;
            } else {
                counts.active += 1;
            }
            counts
        })
    }

    pub fn total(&self) -> usize {
        self.active + self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, completed: bool) -> TodoItem {
        TodoItem {
            completed,
            ..TodoItem::new(name)
        }
    }

    #[test]
    fn projection_keeps_insertion_order() {
        let items = vec![item("a", false), item("b", true), item("c", false)];

        let active: Vec<_> = TodoFilter::Active
            .project(&items)
            .into_iter()
            .map(|todo| todo.name)
            .collect();

        assert_eq!(active, vec!["a", "c"]);
        assert_eq!(TodoFilter::Completed.project(&items).len(), 1);
        assert_eq!(TodoFilter::All.project(&items).len(), 3);
    }

    #[test]
    fn counts_split_active_and_completed() {
        let items = vec![item("a", false), item("b", true), item("c", true)];
        let counts = TodoCounts::of_items(&items);
        assert_eq!(counts, TodoCounts { active: 1, completed: 2 });
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn parses_filter_names_case_insensitively() {
        assert_eq!(" Active ".parse::<TodoFilter>(), Ok(TodoFilter::Active));
        assert_eq!("COMPLETED".parse::<TodoFilter>(), Ok(TodoFilter::Completed));
        assert!("done".parse::<TodoFilter>().is_err());
    }

    #[test]
    fn todo_id_round_trips_through_display() {
        let id = TodoId::generate();
        assert_eq!(id.to_string().parse::<TodoId>().expect("parse"), id);
    }
}
