//! The learning map: SOLID principles and Gang-of-Four patterns.
//!
//! Entries are static reading material. Only Chain of Responsibility has a
//! runnable implementation in this crate.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Principle,
    Creational,
    Structural,
    Behavioral,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Principle,
        Category::Creational,
        Category::Structural,
        Category::Behavioral,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Category::Principle => "SOLID Principles",
            Category::Creational => "Creational Patterns",
            Category::Structural => "Structural Patterns",
            Category::Behavioral => "Behavioral Patterns",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "principle" | "principles" | "solid" => Ok(Category::Principle),
            "creational" => Ok(Category::Creational),
            "structural" => Ok(Category::Structural),
            "behavioral" | "behavioural" => Ok(Category::Behavioral),
            other => Err(format!(
                "unknown category '{other}' (expected principle, creational, structural or behavioral)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub name: &'static str,
    pub category: Category,
    pub intent: &'static str,
    pub runnable: bool,
}

const fn topic(name: &'static str, category: Category, intent: &'static str) -> Topic {
    Topic {
        name,
        category,
        intent,
        runnable: false,
    }
}

static TOPICS: &[Topic] = &[
    topic(
        "Single Responsibility",
        Category::Principle,
        "A module should have one reason to change.",
    ),
    topic(
        "Open/Closed",
        Category::Principle,
        "Extend behavior by adding code, not by editing working code.",
    ),
    topic(
        "Liskov Substitution",
        Category::Principle,
        "Subtypes must be usable wherever their base type is expected.",
    ),
    topic(
        "Interface Segregation",
        Category::Principle,
        "Clients should not depend on methods they do not use.",
    ),
    topic(
        "Dependency Inversion",
        Category::Principle,
        "Depend on abstractions rather than concrete implementations.",
    ),
    topic(
        "Singleton",
        Category::Creational,
        "Ensure a type has exactly one shared instance.",
    ),
    topic(
        "Factory Method",
        Category::Creational,
        "Let a creator decide which concrete product to instantiate.",
    ),
    topic(
        "Abstract Factory",
        Category::Creational,
        "Create families of related objects without naming their concrete types.",
    ),
    topic(
        "Builder",
        Category::Creational,
        "Assemble a complex object step by step.",
    ),
    topic(
        "Prototype",
        Category::Creational,
        "Create new objects by copying an existing instance.",
    ),
    topic(
        "Adapter",
        Category::Structural,
        "Convert one interface into another that clients expect.",
    ),
    topic(
        "Bridge",
        Category::Structural,
        "Separate an abstraction from its implementation so both can vary.",
    ),
    topic(
        "Composite",
        Category::Structural,
        "Treat individual objects and trees of objects uniformly.",
    ),
    topic(
        "Decorator",
        Category::Structural,
        "Attach extra behavior to an object by wrapping it.",
    ),
    topic(
        "Facade",
        Category::Structural,
        "Offer one simple entry point to a complex subsystem.",
    ),
    topic(
        "Proxy",
        Category::Structural,
        "Stand in for another object to control access to it.",
    ),
    Topic {
        name: "Chain of Responsibility",
        category: Category::Behavioral,
        intent: "Pass a request along linked handlers until one accepts it.",
        runnable: true,
    },
    topic(
        "Observer",
        Category::Behavioral,
        "Notify dependents automatically when a subject changes.",
    ),
    topic(
        "Strategy",
        Category::Behavioral,
        "Swap interchangeable algorithms behind one interface.",
    ),
    topic(
        "Command",
        Category::Behavioral,
        "Turn a request into an object that can be queued or undone.",
    ),
    topic(
        "State",
        Category::Behavioral,
        "Change an object's behavior when its internal state changes.",
    ),
    topic(
        "Template Method",
        Category::Behavioral,
        "Fix an algorithm's skeleton and let subclasses fill in steps.",
    ),
];

pub fn topics() -> &'static [Topic] {
    TOPICS
}

pub fn by_category(category: Category) -> impl Iterator<Item = &'static Topic> {
    TOPICS.iter().filter(move |topic| topic.category == category)
}

/// Looks a topic up by name, ignoring case, spaces, dashes and slashes.
pub fn find(name: &str) -> Option<&'static Topic> {
    let wanted = normalize(name);
    TOPICS.iter().find(|topic| normalize(topic.name) == wanted)
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_is_populated() {
        assert_eq!(by_category(Category::Principle).count(), 5);
        assert_eq!(by_category(Category::Creational).count(), 5);
        assert_eq!(by_category(Category::Structural).count(), 6);
        assert_eq!(by_category(Category::Behavioral).count(), 6);
        assert_eq!(topics().len(), 22);
    }

    #[test]
    fn test_only_chain_of_responsibility_is_runnable() {
        let runnable: Vec<_> = topics().iter().filter(|t| t.runnable).collect();
        assert_eq!(runnable.len(), 1);
        assert_eq!(runnable[0].name, "Chain of Responsibility");
    }

    #[test]
    fn test_find_is_forgiving() {
        assert_eq!(find("chain-of-responsibility").unwrap().category, Category::Behavioral);
        assert_eq!(find("OPEN CLOSED").unwrap().name, "Open/Closed");
        assert_eq!(find("templatemethod").unwrap().name, "Template Method");
        assert!(find("Visitor").is_none());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Behavioural".parse::<Category>(), Ok(Category::Behavioral));
        assert_eq!("solid".parse::<Category>(), Ok(Category::Principle));
        assert!("functional".parse::<Category>().unwrap_err().contains("functional"));
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = topics().iter().map(|t| normalize(t.name)).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), topics().len());
    }

    #[test]
    fn test_topic_serializes_category_in_snake_case() {
        let json = serde_json::to_value(find("Proxy").unwrap()).unwrap();
        assert_eq!(json["category"], "structural");
        assert_eq!(json["runnable"], false);
    }
}
