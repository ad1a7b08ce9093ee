//! The to-do lists of every day of the month

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scoring::{self, Badge};
use crate::todo::{Todo, TodoId};

/// A map from each day to its ordered list of todos.
///
/// This is the in-memory data only, see [`CalendarStore`](crate::store::CalendarStore) for a version that persists itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarData {
    days: BTreeMap<NaiveDate, Vec<Todo>>,
}

impl CalendarData {
    pub fn new() -> Self {
        Self::default()
    }

    /// The todos of a day (empty if the day has never been used)
    pub fn todos(&self, date: NaiveDate) -> &[Todo] {
        self.days.get(&date).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Days that have an entry, even an empty one
    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.days.keys()
    }

    pub fn badge(&self, date: NaiveDate) -> Option<Badge> {
        scoring::score(self.todos(date))
    }

    /// Whether a day already holds its plan item
    pub fn has_plan_item(&self, date: NaiveDate) -> bool {
        self.todos(date).iter().any(|t| t.is_ai_generated())
    }

    /// Append a new todo at the end of the list of `date`.
    ///
    /// Returns `None` (and changes nothing) if `text` is blank
    pub fn add_todo(&mut self, date: NaiveDate, text: &str) -> Option<&Todo> {
        if text.trim().is_empty() {
            return None;
        }
        let list = self.days.entry(date).or_insert_with(Vec::new);
        list.push(Todo::new(text.to_string()));
        list.last()
    }

    /// Flip the completion status of a todo. Returns whether something has changed
    pub fn toggle_todo(&mut self, date: NaiveDate, id: &TodoId) -> bool {
        match self.days.get_mut(&date).and_then(|list| list.iter_mut().find(|t| t.id() == id)) {
            None => false,
            Some(todo) => {
                todo.toggle();
                true
            },
        }
    }

    /// Remove a todo. Returns whether something has changed.
    ///
    /// Plan items cannot be removed, this returns [`Error::ProtectedItem`] for them
    pub fn delete_todo(&mut self, date: NaiveDate, id: &TodoId) -> Result<bool> {
        let list = match self.days.get_mut(&date) {
            None => return Ok(false),
            Some(list) => list,
        };
        let position = match list.iter().position(|t| t.id() == id) {
            None => return Ok(false),
            Some(pos) => pos,
        };
        if list[position].is_ai_generated() {
            return Err(Error::ProtectedItem { date, id: id.to_string() });
        }
        list.remove(position);
        Ok(true)
    }

    /// Put a plan item at the top of the list of its day
    pub(crate) fn insert_plan_item(&mut self, date: NaiveDate, item: Todo) {
        self.days.entry(date).or_insert_with(Vec::new).insert(0, item);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn add_toggle_delete() {
        let day = date("2026-01-05");
        let mut data = CalendarData::new();

        let id = data.add_todo(day, "draft ch.1").unwrap().id().clone();
        assert_eq!(data.todos(day).len(), 1);
        assert_eq!(data.todos(day)[0].text(), "draft ch.1");
        assert!(!data.todos(day)[0].completed());

        assert!(data.toggle_todo(day, &id));
        assert!(data.todos(day)[0].completed());
        assert_eq!(data.badge(day), Some(Badge::Great));

        assert!(data.delete_todo(day, &id).unwrap());
        assert!(data.todos(day).is_empty());
        assert_eq!(data.badge(day), None);
    }

    #[test]
    fn blank_text_is_rejected() {
        let day = date("2026-01-05");
        let mut data = CalendarData::new();
        assert!(data.add_todo(day, "").is_none());
        assert!(data.add_todo(day, "   \t").is_none());
        assert_eq!(data, CalendarData::new());
    }

    #[test]
    fn unknown_items_are_ignored() {
        let day = date("2026-01-05");
        let mut data = CalendarData::new();
        let unknown = TodoId::from("nope");
        assert!(!data.toggle_todo(day, &unknown));
        assert!(!data.delete_todo(day, &unknown).unwrap());

        data.add_todo(day, "something");
        let before = data.clone();
        assert!(!data.toggle_todo(day, &unknown));
        assert!(!data.delete_todo(day, &unknown).unwrap());
        assert_eq!(data, before);
    }

    #[test]
    fn plan_items_cannot_be_deleted() {
        let day = date("2026-01-10");
        let mut data = CalendarData::new();
        data.insert_plan_item(day, Todo::from_plan(day, "Writing", "Revise chapter 3"));

        let id = TodoId::from("ai-2026-01-10");
        match data.delete_todo(day, &id) {
            Err(Error::ProtectedItem { date: d, id: i }) => {
                assert_eq!(d, day);
                assert_eq!(i, "ai-2026-01-10");
            },
            other => panic!("unexpected result {:?}", other),
        }
        assert_eq!(data.todos(day).len(), 1);

        // It can still be toggled
        assert!(data.toggle_todo(day, &id));
        assert!(data.todos(day)[0].completed());
    }

    #[test]
    fn serialized_as_date_keyed_object() {
        let day = date("2026-01-02");
        let mut data = CalendarData::new();
        data.add_todo(day, "plot");

        let json = serde_json::to_value(&data).unwrap();
        let list = json.get("2026-01-02").unwrap().as_array().unwrap();
        assert_eq!(list[0]["text"], "plot");

        let back: CalendarData = serde_json::from_value(json).unwrap();
        assert_eq!(back, data);
    }
}
