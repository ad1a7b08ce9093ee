//! This module provides a client for the Gemini `generateContent` API

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};
use url::Url;

use crate::advice::Advice;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::month::TargetMonth;
use crate::plan::BookPlan;
use crate::traits::AdviceSource;


/// An advice source backed by Google's generative language API
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
    advice_model: String,
    plan_model: String,
    month: TargetMonth,
    language: String,
}

impl GeminiClient {
    /// Create a client. This does not start a connection.
    ///
    /// A client without API key can be created, but all its requests will fail
    pub fn new(config: &Config) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            log::warn!("No API key has been provided, advice will not be available");
        }
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            advice_model: config.advice_model.clone(),
            plan_model: config.plan_model.clone(),
            month: config.target_month()?,
            language: config.language.clone(),
        })
    }

    fn model_url(&self, model: &str) -> Result<Url> {
        self.endpoint
            .join(&format!("v1beta/models/{}:generateContent", model))
            .map_err(|err| Error::Config(format!("invalid endpoint {}: {}", self.endpoint, err)))
    }

    /// Send a prompt and return the text of the first candidate, if any
    async fn generate(&self, model: &str, prompt: String, schema: Value) -> Result<Option<String>> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config("no API key has been provided".to_string()));
        }
        let url = self.model_url(model)?;
        log::debug!("Querying {}", url);

        let res = self.http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(prompt, schema))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(Error::Api { status, body });
        }

        let response: Value = res.json().await?;
        Ok(response_text(&response))
    }
}

#[async_trait]
impl AdviceSource for GeminiClient {
    async fn fetch_daily_advice(&self, date: NaiveDate) -> Result<Advice> {
        let prompt = daily_advice_prompt(date, &self.language);
        let text = self.generate(&self.advice_model, prompt, advice_schema()).await?
            .ok_or_else(|| Error::MalformedAdviceResponse("no text in the response".to_string()))?;
        Advice::from_json(strip_code_fences(&text))
    }

    async fn fetch_month_plan(&self) -> Result<BookPlan> {
        let prompt = month_plan_prompt(&self.month, &self.language);
        let text = self.generate(&self.plan_model, prompt, plan_schema()).await?
            .ok_or_else(|| Error::MalformedPlanResponse("no text in the response".to_string()))?;
        BookPlan::from_json(strip_code_fences(&text), &self.month)
    }
}


fn request_body(prompt: String, schema: Value) -> Value {
    json!({
        "contents": [
            { "role": "user", "parts": [ { "text": prompt } ] }
        ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": schema,
        }
    })
}

fn advice_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "todo": { "type": "STRING" },
            "caution": { "type": "STRING" },
            "motivation": { "type": "STRING" },
        },
        "required": ["todo", "caution", "motivation"],
    })
}

fn plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "additionalProperties": { "type": "STRING" },
    })
}

fn daily_advice_prompt(date: NaiveDate, language: &str) -> String {
    format!(
        "You are Zhuge Liang, the genius strategist. Today is {}. \
         Advise the protagonist, who is writing a book this month, with:\n\
         1. \"todo\": what to do today (a strategic recommendation)\n\
         2. \"caution\": what to be careful about today (a warning)\n\
         3. \"motivation\": a motivational line to help finish the book\n\n\
         Answer in {} only, in a dignified and wise tone.",
        date.format("%B %-d, %Y"),
        language,
    )
}

fn month_plan_prompt(month: &TargetMonth, language: &str) -> String {
    format!(
        "You are Zhuge Liang, the genius strategist. Draw up a detailed plan to completely finish writing a book \
         between {} and {}. Give exactly one core writing task per day.\n\
         Answer with a JSON object whose keys are the dates from \"{}\" to \"{}\" (YYYY-MM-DD) \
         and whose values are the writing task of that day, written in {}.",
        month.first_day().format("%B %-d, %Y"),
        month.last_day().format("%B %-d, %Y"),
        month.first_day(),
        month.last_day(),
        language,
    )
}

/// Concatenate the text parts of the first candidate
fn response_text(response: &Value) -> Option<String> {
    let parts = response["candidates"]
        .as_array()
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate["content"]["parts"].as_array())?;

    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Models sometimes wrap their JSON in markdown code fences
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
