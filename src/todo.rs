//! To-do items

use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The identifier of a [`Todo`]. It is opaque and never changes once the item is created
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// A fresh, random ID for a user-created item
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_hyphenated().to_string())
    }

    /// The deterministic ID of the plan item of a given day
    pub fn for_plan(date: NaiveDate) -> Self {
        Self(format!("ai-{}", date))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TodoId {
    fn from(s: String) -> Self { Self(s) }
}

impl From<&str> for TodoId {
    fn from(s: &str) -> Self { Self(s.to_string()) }
}

impl Display for TodoId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}


/// A task for a given day, either typed by the user or taken from the book plan
///
/// Field names are kept compatible with the stored format (`id`, `text`, `completed`, `isAiGenerated`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    id: TodoId,
    text: String,
    completed: bool,
    #[serde(rename = "isAiGenerated", default, skip_serializing_if = "Option::is_none")]
    is_ai_generated: Option<bool>,
}

impl Todo {
    /// Create a new, uncompleted user item with a random ID
    pub fn new(text: String) -> Self {
        Self {
            id: TodoId::random(),
            text,
            completed: false,
            is_ai_generated: None,
        }
    }

    /// Create the plan item for `date`, whose text is `[label] task`
    pub fn from_plan(date: NaiveDate, label: &str, task: &str) -> Self {
        Self {
            id: TodoId::for_plan(date),
            text: format!("[{}] {}", label, task),
            completed: false,
            is_ai_generated: Some(true),
        }
    }

    pub fn id(&self) -> &TodoId     { &self.id   }
    pub fn text(&self) -> &str      { &self.text }
    pub fn completed(&self) -> bool { self.completed }
    pub fn is_ai_generated(&self) -> bool { self.is_ai_generated.unwrap_or(false) }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_format() {
        let date: NaiveDate = "2026-01-10".parse().unwrap();
        let plan_item = Todo::from_plan(date, "Writing", "Outline part two");
        let json = serde_json::to_value(&plan_item).unwrap();
        assert_eq!(json, serde_json::json!({
            "id": "ai-2026-01-10",
            "text": "[Writing] Outline part two",
            "completed": false,
            "isAiGenerated": true,
        }));

        // `isAiGenerated` is omitted for user items, and may be missing from stored data
        let user_item = Todo::new("buy ink".to_string());
        let json = serde_json::to_value(&user_item).unwrap();
        assert!(json.get("isAiGenerated").is_none());

        let parsed: Todo = serde_json::from_str(r#"{"id":"1767225600000","text":"call editor","completed":true}"#).unwrap();
        assert_eq!(parsed.id().as_str(), "1767225600000");
        assert!(parsed.completed());
        assert!(!parsed.is_ai_generated());
    }

    #[test]
    fn random_ids_differ() {
        assert_ne!(Todo::new("a".into()).id(), Todo::new("a".into()).id());
    }
}
