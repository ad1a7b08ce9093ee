//! The month-long book plan, and how it is merged into the calendar

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarData;
use crate::error::{Error, Result};
use crate::month::TargetMonth;
use crate::todo::Todo;

/// One writing task per day, as suggested by the advice service
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookPlan {
    tasks: BTreeMap<NaiveDate, String>,
}

impl BookPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, task: String) {
        self.tasks.insert(date, task);
    }

    pub fn task(&self, date: NaiveDate) -> Option<&str> {
        self.tasks.get(&date).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &String)> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Validate a JSON document produced by the advice service.
    ///
    /// It must be a non-empty object whose keys are `YYYY-MM-DD` dates within `month`, and whose values are strings.
    /// Days that are missing from the document are only reported in the logs.
    pub fn from_json(text: &str, month: &TargetMonth) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|err| Error::MalformedPlanResponse(format!("invalid JSON ({})", err)))?;
        let object = value
            .as_object()
            .ok_or_else(|| Error::MalformedPlanResponse("expected a JSON object".to_string()))?;

        let mut plan = Self::new();
        for (key, task) in object {
            let date = NaiveDate::parse_from_str(key, "%Y-%m-%d")
                .map_err(|_| Error::MalformedPlanResponse(format!("{:?} is not a YYYY-MM-DD date", key)))?;
            if month.contains(date) == false {
                return Err(Error::MalformedPlanResponse(format!("{} is not part of {}", date, month)));
            }
            let task = task
                .as_str()
                .ok_or_else(|| Error::MalformedPlanResponse(format!("task for {} is not a string", date)))?;
            plan.insert(date, task.to_string());
        }

        if plan.is_empty() {
            return Err(Error::MalformedPlanResponse("the plan has no task".to_string()));
        }
        let missing = month.days().filter(|d| plan.task(*d).is_none()).count();
        if missing > 0 {
            log::warn!("The book plan has no task for {} day(s) of {}", missing, month);
        }
        Ok(plan)
    }
}


/// Insert the task of every day of `plan` at the top of this day's list in `calendar`.
///
/// A day that already has a plan item is left untouched, so that merging twice never duplicates items nor resets their completion status.
/// Days that are not part of `month` are skipped.
/// Returns how many items have been inserted.
pub fn merge_plan(calendar: &mut CalendarData, plan: &BookPlan, label: &str, month: &TargetMonth) -> usize {
    let mut inserted = 0;
    for (date, task) in plan.iter() {
        if month.contains(*date) == false {
            log::warn!("Ignoring the plan task for {}, which is not part of {}", date, month);
            continue;
        }
        if calendar.has_plan_item(*date) {
            log::debug!("{} already has a plan item, skipping it", date);
            continue;
        }
        calendar.insert_plan_item(*date, Todo::from_plan(*date, label, task));
        inserted += 1;
    }
    inserted
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::TodoId;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn sample_plan() -> BookPlan {
        let mut plan = BookPlan::new();
        plan.insert(date("2026-01-01"), "Choose the theme".to_string());
        plan.insert(date("2026-01-02"), "Draft the outline".to_string());
        plan
    }

    #[test]
    fn merge_puts_plan_items_first() {
        let mut calendar = CalendarData::new();
        calendar.add_todo(date("2026-01-02"), "buy coffee");

        assert_eq!(merge_plan(&mut calendar, &sample_plan(), "Writing", &TargetMonth::default()), 2);

        let first = &calendar.todos(date("2026-01-01"))[0];
        assert_eq!(first.id(), &TodoId::from("ai-2026-01-01"));
        assert_eq!(first.text(), "[Writing] Choose the theme");
        assert!(first.is_ai_generated());
        assert!(!first.completed());

        let second_day = calendar.todos(date("2026-01-02"));
        assert_eq!(second_day.len(), 2);
        assert_eq!(second_day[0].id().as_str(), "ai-2026-01-02");
        assert_eq!(second_day[1].text(), "buy coffee");
    }

    #[test]
    fn merge_is_idempotent() {
        let plan = sample_plan();
        let mut calendar = CalendarData::new();
        merge_plan(&mut calendar, &plan, "Writing", &TargetMonth::default());
        calendar.toggle_todo(date("2026-01-01"), &TodoId::from("ai-2026-01-01"));
        let merged_once = calendar.clone();

        assert_eq!(merge_plan(&mut calendar, &plan, "Writing", &TargetMonth::default()), 0);
        assert_eq!(calendar, merged_once);
        assert!(calendar.todos(date("2026-01-01"))[0].completed());
    }

    #[test]
    fn merge_stays_within_the_month() {
        let mut plan = sample_plan();
        plan.insert(date("2025-12-31"), "Read the reviews".to_string());
        plan.insert(date("2026-02-01"), "Celebrate".to_string());

        let mut calendar = CalendarData::new();
        assert_eq!(merge_plan(&mut calendar, &plan, "Writing", &TargetMonth::default()), 2);
        assert!(calendar.todos(date("2025-12-31")).is_empty());
        assert!(calendar.todos(date("2026-02-01")).is_empty());
        assert_eq!(calendar.dates().count(), 2);
    }

    #[test]
    fn parse_valid_plan() {
        let month = TargetMonth::default();
        let plan = BookPlan::from_json(r#"{"2026-01-01": "Theme", "2026-01-31": "Send to the publisher"}"#, &month).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.task(date("2026-01-31")), Some("Send to the publisher"));
    }

    #[test]
    fn parse_invalid_plans() {
        let month = TargetMonth::default();
        let invalid = [
            "not json",
            r#"["2026-01-01"]"#,
            r#"{}"#,
            r#"{"day one": "Theme"}"#,
            r#"{"2026-02-01": "Theme"}"#,
            r#"{"2026-01-01": 3}"#,
        ];
        for text in &invalid {
            match BookPlan::from_json(text, &month) {
                Err(Error::MalformedPlanResponse(_)) => {},
                other => panic!("{} should be malformed, got {:?}", text, other),
            }
        }
    }
}
