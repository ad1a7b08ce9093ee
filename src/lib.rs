//! This crate provides a one-month planning calendar for writing a book.
//!
//! Each day of the month holds a to-do list, stored in a [`KeyValueStore`](traits::KeyValueStore) (see the [`cache`] module).
//! On first run, a month-long writing plan is requested from an [`AdviceSource`](traits::AdviceSource) (usually the Gemini [`client`]),
//! and one plan item per day is merged at the top of the to-do lists. Every time a day is selected, the source is also asked for advice about that day.
//!
//! Days earn a [`Badge`](scoring::Badge) depending on how many of their todos are completed.
//!
//! All of this is driven by a [`Planner`](planner::Planner). The [`view`] module renders it as text.

pub mod error;
pub use error::{Error, Result};
pub mod traits;
pub mod config;
pub use config::Config;

pub mod month;
pub use month::TargetMonth;
pub mod todo;
pub use todo::{Todo, TodoId};
pub mod calendar;
pub use calendar::CalendarData;
pub mod scoring;
pub mod plan;
pub use plan::BookPlan;
pub mod advice;
pub use advice::Advice;

pub mod cache;
pub mod store;
pub mod client;
pub mod mock_behaviour;
pub mod planner;
pub use planner::Planner;

pub mod view;

/// A planner backed by a local file and the Gemini API
pub type GeminiPlanner = Planner<cache::FileStore, client::GeminiClient>;
