//! This module provides a mocked advice source, that can be tweaked to return errors on some tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Notify;

use crate::advice::Advice;
use crate::error::{Error, Result};
use crate::plan::BookPlan;
use crate::traits::AdviceSource;

/// This stores some behaviour tweaks, that describe how a mocked instance will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,

    pub daily_advice_behaviour: (u32, u32),
    pub month_plan_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All actions will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            daily_advice_behaviour: (0, n_fails),
            month_plan_behaviour: (0, n_fails),
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_fetch_daily_advice(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.daily_advice_behaviour, "fetch_daily_advice")
    }
    pub fn can_fetch_month_plan(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.month_plan_behaviour, "fetch_month_plan")
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<()> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 -= 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else if remaining_failures > 0 {
        value.1 -= 1;
        log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
        Err(Error::Mocked(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value)))
    } else {
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    }
}


/// An [`AdviceSource`] that answers from memory, and counts how many times it has been called
#[derive(Debug, Default)]
pub struct MockAdviceSource {
    plan: BookPlan,
    advice: HashMap<NaiveDate, Advice>,
    gates: HashMap<NaiveDate, Arc<Notify>>,
    behaviour: Mutex<MockBehaviour>,
    calls: Mutex<Calls>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Calls {
    daily_advice: usize,
    month_plan: usize,
}

impl MockAdviceSource {
    /// A source that will answer `plan` to every month plan request
    pub fn new(plan: BookPlan) -> Self {
        Self { plan, ..Self::default() }
    }

    pub fn with_behaviour(mut self, behaviour: MockBehaviour) -> Self {
        self.behaviour = Mutex::new(behaviour);
        self
    }

    /// Answer `advice` for `date` instead of the default advice
    pub fn with_advice(mut self, date: NaiveDate, advice: Advice) -> Self {
        self.advice.insert(date, advice);
        self
    }

    /// Hold the advice of `date` back until `gate` is notified
    pub fn with_gate(mut self, date: NaiveDate, gate: Arc<Notify>) -> Self {
        self.gates.insert(date, gate);
        self
    }

    /// The advice answered for dates that have no custom advice
    pub fn default_advice(date: NaiveDate) -> Advice {
        Advice {
            todo: format!("Write the pages planned for {}", date),
            caution: "Do not rewrite yesterday's pages".to_string(),
            motivation: "A long march is won one step at a time".to_string(),
        }
    }

    pub fn daily_advice_calls(&self) -> usize {
        self.lock_calls().daily_advice
    }

    pub fn month_plan_calls(&self) -> usize {
        self.lock_calls().month_plan
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Calls> {
        // A poisoned lock only means a test has already failed
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_behaviour(&self) -> std::sync::MutexGuard<'_, MockBehaviour> {
        self.behaviour.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl AdviceSource for MockAdviceSource {
    async fn fetch_daily_advice(&self, date: NaiveDate) -> Result<Advice> {
        self.lock_calls().daily_advice += 1;
        if let Some(gate) = self.gates.get(&date) {
            log::debug!("Mock source: holding the advice for {} back", date);
            gate.notified().await;
        }
        self.lock_behaviour().can_fetch_daily_advice()?;
        Ok(self.advice.get(&date).cloned().unwrap_or_else(|| Self::default_advice(date)))
    }

    async fn fetch_month_plan(&self) -> Result<BookPlan> {
        self.lock_calls().month_plan += 1;
        self.lock_behaviour().can_fetch_month_plan()?;
        Ok(self.plan.clone())
    }
}
