use async_trait::async_trait;
use chrono::NaiveDate;

use crate::advice::Advice;
use crate::error::Result;
use crate::plan::BookPlan;

/// A synchronous, string-keyed storage that survives restarts
pub trait KeyValueStore {
    /// Returns the value stored for `key`.
    /// Implementors should return `None` both when nothing is stored and when the stored data cannot be read
    fn get(&self, key: &str) -> Option<String>;
    /// Store `value` for `key`, replacing any previous value
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

/// A (usually remote) source of AI-generated advice.
///
/// Sources are shared with in-flight requests, hence the `Send + Sync` bounds
#[async_trait]
pub trait AdviceSource: Send + Sync {
    /// Returns the advice of the day.
    /// This may be a long process, and can fail (e.g. in case of a remote server)
    async fn fetch_daily_advice(&self, date: NaiveDate) -> Result<Advice>;

    /// Returns a writing plan for the whole month.
    /// This may be a long process, and can fail (e.g. in case of a remote server)
    async fn fetch_month_plan(&self) -> Result<BookPlan>;
}
