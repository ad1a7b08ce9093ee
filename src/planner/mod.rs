//! This module ties the calendar, the book plan and the advice source together
//!
//! A [`Planner`] is what a user interface drives: it loads everything on startup, fetches the book plan once,
//! tracks the selected day and its advice, and forwards todo changes to the persistent store.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::advice::Advice;
use crate::calendar::CalendarData;
use crate::config::Config;
use crate::error::Result;
use crate::month::TargetMonth;
use crate::plan::BookPlan;
use crate::scoring::Badge;
use crate::store::CalendarStore;
use crate::todo::{Todo, TodoId};
use crate::traits::{AdviceSource, KeyValueStore};

pub mod feedback;
use feedback::{AdviceEvent, FeedbackSender};


/// Identifies an advice request. Only the result of the latest request is ever applied
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdviceTicket {
    sequence: u64,
    date: NaiveDate,
}

impl AdviceTicket {
    pub fn sequence(&self) -> u64 { self.sequence }
    pub fn date(&self) -> NaiveDate { self.date }
}

/// A pending advice request. It owns everything it needs, so that the planner can still be used while it runs
pub type AdviceRequest = Pin<Box<dyn Future<Output = Result<Advice>> + Send>>;

fn request_advice<A: AdviceSource + 'static>(source: Arc<A>, date: NaiveDate) -> AdviceRequest {
    Box::pin(async move { source.fetch_daily_advice(date).await })
}

/// What [`Planner::ensure_book_plan`] has done
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanStatus {
    /// A plan was already stored, nothing has been fetched
    Cached,
    /// The plan has just been fetched and merged into the calendar
    Fetched { inserted: usize },
}


/// The state of a one-month planning calendar
pub struct Planner<S, A>
where
    S: KeyValueStore,
    A: AdviceSource,
{
    calendar: CalendarStore<S>,
    source: Arc<A>,

    plan_key: String,
    plan_label: String,
    book_plan: Option<BookPlan>,

    selected: Option<NaiveDate>,
    /// The last advice received, with the date it is about
    advice: Option<(NaiveDate, Advice)>,
    last_sequence: u64,
    pending: Option<AdviceTicket>,
    feedback: Option<FeedbackSender>,
}

impl<S, A> Planner<S, A>
where
    S: KeyValueStore,
    A: AdviceSource + 'static,
{
    /// Create a planner, loading the calendar and the cached book plan (if any) from `store`.
    ///
    /// Missing or unreadable stored data is treated as absent. No date is selected until [`Self::start`] or [`Self::select_date`] is called.
    pub fn new(config: &Config, store: S, source: A) -> Result<Self> {
        config.validate()?;
        let month = config.target_month()?;

        let book_plan = match store.get(&config.plan_key) {
            None => None,
            Some(text) => match serde_json::from_str::<BookPlan>(&text) {
                Ok(plan) => Some(plan),
                Err(err) => {
                    log::warn!("Unable to read the stored book plan ({}). It will be fetched again", err);
                    None
                },
            },
        };
        let calendar = CalendarStore::load(store, &config.calendar_key, month);

        Ok(Self {
            calendar,
            source: Arc::new(source),
            plan_key: config.plan_key.clone(),
            plan_label: config.plan_label.clone(),
            book_plan,
            selected: None,
            advice: None,
            last_sequence: 0,
            pending: None,
            feedback: None,
        })
    }

    /// Publish the state of advice requests to this channel
    pub fn with_feedback(mut self, sender: FeedbackSender) -> Self {
        self.feedback = Some(sender);
        self
    }

    pub fn month(&self) -> &TargetMonth { self.calendar.month() }
    pub fn calendar(&self) -> &CalendarData { self.calendar.data() }
    pub fn book_plan(&self) -> Option<&BookPlan> { self.book_plan.as_ref() }
    pub fn selected_date(&self) -> Option<NaiveDate> { self.selected }
    pub fn source(&self) -> &A { &self.source }
    pub fn store(&self) -> &S { self.calendar.store() }

    pub fn todos(&self, date: NaiveDate) -> &[Todo] {
        self.calendar.todos(date)
    }

    pub fn badge(&self, date: NaiveDate) -> Option<Badge> {
        self.calendar.badge(date)
    }

    /// The advice for the selected date, if it has arrived
    pub fn advice(&self) -> Option<&Advice> {
        match (&self.advice, self.selected) {
            (Some((date, advice)), Some(selected)) if *date == selected => Some(advice),
            _ => None,
        }
    }

    /// Whether the advice for the selected date is being fetched
    pub fn is_advice_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Startup sequence: make sure the book plan is there, then select the initial date and fetch its advice.
    ///
    /// The initial date is `today` if it belongs to the month, the first day of the month otherwise.
    /// Failures of the advice source are logged and otherwise ignored.
    pub async fn start(&mut self, today: NaiveDate) {
        // Errors have already been logged
        let _ = self.ensure_book_plan().await;

        let initial = self.month().initial_selection(today);
        let _ = self.select_date_and_fetch(initial).await;
    }

    /// Fetch the book plan and merge it into the calendar, unless a plan has already been stored.
    ///
    /// In case the advice source fails, the error is logged and returned, and neither the calendar nor the stored plan are changed.
    /// In case the calendar cannot be saved, the plan is not stored either, so that it is merged on the next call.
    /// Nothing is retried: the plan will be requested again the next time this function is called.
    pub async fn ensure_book_plan(&mut self) -> Result<PlanStatus> {
        if self.book_plan.is_some() {
            log::debug!("Using the stored book plan");
            return Ok(PlanStatus::Cached);
        }

        log::info!("No book plan yet, requesting one");
        let plan = match self.source.fetch_month_plan().await {
            Ok(plan) => plan,
            Err(err) => {
                log::error!("Failed to fetch the book plan: {}", err);
                return Err(err);
            },
        };

        // The calendar goes first: a plan that is stored but not merged would never be merged
        let serialized = serde_json::to_string(&plan)?;
        let inserted = self.calendar.apply_plan(&plan, &self.plan_label)?;
        if let Err(err) = self.calendar.store_mut().set(&self.plan_key, serialized) {
            log::error!("Unable to save the book plan: {}", err);
            return Err(err);
        }
        log::info!("Book plan received: {} task(s), {} added to the calendar", plan.len(), inserted);

        self.book_plan = Some(plan);
        Ok(PlanStatus::Fetched { inserted })
    }

    /// Change the selected date, and enter the "loading advice" state.
    ///
    /// The returned ticket should be used to [fetch](Self::fetch_advice) then [resolve](Self::resolve_advice) the advice of this date.
    /// Selecting another date before resolution makes this ticket stale.
    pub fn select_date(&mut self, date: NaiveDate) -> Result<AdviceTicket> {
        self.month().check(date)?;
        self.selected = Some(date);

        self.last_sequence += 1;
        let ticket = AdviceTicket { sequence: self.last_sequence, date };
        self.pending = Some(ticket);
        self.send_feedback(AdviceEvent::Loading { date });
        Ok(ticket)
    }

    /// Ask the advice source about the date of a ticket. This does not change the planner.
    ///
    /// The request does not borrow the planner: other dates can be selected while it runs, e.g. from another task.
    pub fn fetch_advice(&self, ticket: &AdviceTicket) -> AdviceRequest {
        request_advice(Arc::clone(&self.source), ticket.date)
    }

    /// Apply the outcome of an advice request.
    ///
    /// Results of stale tickets (i.e. the date has been selected again since) are discarded.
    /// A failure is logged, and keeps the previous advice.
    /// Returns whether the result has been applied.
    pub fn resolve_advice(&mut self, ticket: AdviceTicket, result: Result<Advice>) -> bool {
        if self.pending != Some(ticket) {
            log::debug!("Discarding the advice for {} (request #{} has been superseded)", ticket.date, ticket.sequence);
            return false;
        }
        self.pending = None;

        match result {
            Ok(advice) => {
                self.advice = Some((ticket.date, advice));
                self.send_feedback(AdviceEvent::Ready { date: ticket.date });
            },
            Err(err) => {
                log::error!("Failed to fetch the advice for {}: {}", ticket.date, err);
                self.send_feedback(AdviceEvent::Failed { date: ticket.date, details: err.to_string() });
            },
        }
        true
    }

    /// Select a date, then fetch and apply its advice
    pub async fn select_date_and_fetch(&mut self, date: NaiveDate) -> Result<()> {
        let ticket = self.select_date(date)?;
        let result = self.fetch_advice(&ticket).await;
        self.resolve_advice(ticket, result);
        Ok(())
    }

    /// Add a todo to the selected date.
    ///
    /// Returns `None` when nothing has been added, i.e. if no date is selected or `text` is blank
    pub fn add_todo(&mut self, text: &str) -> Result<Option<TodoId>> {
        match self.selected {
            None => {
                log::debug!("No date is selected, ignoring the new todo");
                Ok(None)
            },
            Some(date) => self.calendar.add(date, text),
        }
    }

    /// Flip the completion status of a todo. Returns whether something has changed
    pub fn toggle_todo(&mut self, date: NaiveDate, id: &TodoId) -> Result<bool> {
        self.calendar.toggle(date, id)
    }

    /// Remove a todo. Returns whether something has changed.
    ///
    /// Plan items are protected, see [`Error::ProtectedItem`](crate::error::Error::ProtectedItem)
    pub fn delete_todo(&mut self, date: NaiveDate, id: &TodoId) -> Result<bool> {
        self.calendar.delete(date, id)
    }

    fn send_feedback(&self, event: AdviceEvent) {
        if let Some(sender) = &self.feedback {
            // Nobody listening is fine
            let _ = sender.send(event);
        }
    }
}
