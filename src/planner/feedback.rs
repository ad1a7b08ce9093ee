//! Utilities to track the progression of advice requests

use std::fmt::{Display, Error, Formatter};

use chrono::NaiveDate;

/// An event that happens while advice is requested
#[derive(Clone, Debug, PartialEq)]
pub enum AdviceEvent {
    /// No advice has been requested yet
    NotStarted,
    /// Advice has been requested for this date, and has not arrived yet
    Loading { date: NaiveDate },
    /// Advice for this date is available
    Ready { date: NaiveDate },
    /// Advice for this date could not be fetched
    Failed { date: NaiveDate, details: String },
}

impl Display for AdviceEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            AdviceEvent::NotStarted => write!(f, "No advice requested"),
            AdviceEvent::Loading { date } => write!(f, "[{}] Consulting the strategist...", date),
            AdviceEvent::Ready { date } => write!(f, "[{}] Advice received", date),
            AdviceEvent::Failed { date, details } => write!(f, "[{}] No advice: {}", date, details),
        }
    }
}

impl Default for AdviceEvent {
    fn default() -> Self {
        Self::NotStarted
    }
}


/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<AdviceEvent>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<AdviceEvent>;

/// Create a feeback channel, that can be used to follow the state of advice requests (e.g. to display a loading indicator)
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(AdviceEvent::default())
}
