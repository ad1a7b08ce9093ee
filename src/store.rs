//! To-do lists that are written back to a [`KeyValueStore`] after every change

use chrono::NaiveDate;

use crate::calendar::CalendarData;
use crate::error::Result;
use crate::month::TargetMonth;
use crate::plan::{self, BookPlan};
use crate::scoring::Badge;
use crate::todo::{Todo, TodoId};
use crate::traits::KeyValueStore;

/// The calendar data of a month, kept in sync with a persistent store.
///
/// Every successful mutation rewrites the whole mapping under a single key. Mutations that change nothing do not write.
#[derive(Debug)]
pub struct CalendarStore<S: KeyValueStore> {
    store: S,
    key: String,
    month: TargetMonth,
    data: CalendarData,
}

impl<S: KeyValueStore> CalendarStore<S> {
    /// Load the calendar stored under `key`.
    ///
    /// Missing or unreadable data gives an empty calendar
    pub fn load(store: S, key: &str, month: TargetMonth) -> Self {
        let data = match store.get(key) {
            None => CalendarData::new(),
            Some(text) => match serde_json::from_str(&text) {
                Ok(data) => data,
                Err(err) => {
                    log::warn!("Unable to read the stored calendar ({}). Starting with an empty one", err);
                    CalendarData::new()
                },
            },
        };
        Self { store, key: key.to_string(), month, data }
    }

    pub fn data(&self) -> &CalendarData { &self.data }
    pub fn month(&self) -> &TargetMonth { &self.month }
    /// Returns the underlying store
    pub fn store(&self) -> &S { &self.store }
    /// Returns the underlying store, e.g. to write other keys to it
    pub fn store_mut(&mut self) -> &mut S { &mut self.store }

    pub fn todos(&self, date: NaiveDate) -> &[Todo] {
        self.data.todos(date)
    }

    pub fn badge(&self, date: NaiveDate) -> Option<Badge> {
        self.data.badge(date)
    }

    /// Append a todo to a day of the month and save.
    /// Returns the ID of the new item, or `None` if the text is blank (in which case nothing is saved)
    pub fn add(&mut self, date: NaiveDate, text: &str) -> Result<Option<TodoId>> {
        self.month.check(date)?;
        let mut data = self.data.clone();
        let id = match data.add_todo(date, text) {
            None => {
                log::debug!("Ignoring a blank todo for {}", date);
                return Ok(None);
            },
            Some(todo) => todo.id().clone(),
        };
        self.commit(data)?;
        Ok(Some(id))
    }

    /// Flip the completion status of a todo and save. Returns whether something has changed
    pub fn toggle(&mut self, date: NaiveDate, id: &TodoId) -> Result<bool> {
        let mut data = self.data.clone();
        if data.toggle_todo(date, id) == false {
            return Ok(false);
        }
        self.commit(data)?;
        Ok(true)
    }

    /// Remove a todo and save. Returns whether something has changed.
    ///
    /// Removing a plan item is refused with [`Error::ProtectedItem`](crate::error::Error::ProtectedItem)
    pub fn delete(&mut self, date: NaiveDate, id: &TodoId) -> Result<bool> {
        let mut data = self.data.clone();
        if data.delete_todo(date, id)? == false {
            return Ok(false);
        }
        self.commit(data)?;
        Ok(true)
    }

    /// Merge a book plan, then save the result with a single write.
    /// Plan dates outside of the month are skipped.
    /// Returns how many plan items have been inserted
    pub fn apply_plan(&mut self, book_plan: &BookPlan, label: &str) -> Result<usize> {
        let mut merged = self.data.clone();
        let inserted = plan::merge_plan(&mut merged, book_plan, label, &self.month);
        self.commit(merged)?;
        Ok(inserted)
    }

    /// Write `data` to the store, and only then make it the current data.
    /// In case the write fails, the in-memory data still matches what is stored
    fn commit(&mut self, data: CalendarData) -> Result<()> {
        let text = serde_json::to_string(&data)?;
        if let Err(err) = self.store.set(&self.key, text) {
            log::error!("Unable to save the calendar: {}", err);
            return Err(err);
        }
        self.data = data;
        Ok(())
    }
}
