// Copyright 2026 HealthBridge Contributors
// Licensed under the Apache License, Version 2.0

//! Blocking client for an OpenAI-compatible chat-completion endpoint.
//!
//! The two advisory operations never surface errors to callers: every
//! upstream failure (unreachable host, error status, empty completion)
//! collapses into a documented fallback string.

use anyhow::{Context, Result, anyhow, bail};
use healthbridge_app::{Advisor, InquiryDetails};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-001";

/// Environment variables consulted for the bearer credential, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["OPENROUTER_API_KEY", "OPENAI_API_KEY"];

pub const ADVICE_EMPTY_FALLBACK: &str =
    "I apologize, but I cannot provide a response at this time. Please try again later.";
pub const ADVICE_ERROR_FALLBACK: &str =
    "I apologize, but I cannot provide a response at this time. Please try again later or contact support.";
pub const ELIGIBILITY_EMPTY_FALLBACK: &str = "Unable to analyze eligibility at this time.";
pub const ELIGIBILITY_ERROR_FALLBACK: &str =
    "Unable to analyze eligibility at this time. Please try again later.";

const ADVICE_MAX_TOKENS: u32 = 500;
const ADVICE_TEMPERATURE: f32 = 0.7;
const ELIGIBILITY_MAX_TOKENS: u32 = 600;
const ELIGIBILITY_TEMPERATURE: f32 = 0.5;

const SYSTEM_PROMPT: &str = "You are a helpful healthcare navigation assistant for HealthBridge, designed to help low-income families access healthcare.

Your role is to:
- Provide clear, actionable advice about healthcare navigation
- Help users understand insurance benefits and eligibility
- Suggest appropriate next steps for medical care
- Use simple, accessible language
- Be empathetic and supportive
- Focus on practical solutions

Always prioritize user safety and recommend consulting healthcare professionals for medical advice.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Resolves the bearer credential from the process environment. A missing
/// credential is not an error; the upstream call will fail and the
/// fallback path applies.
pub fn api_key_from_env() -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    model: String,
    api_key: Option<String>,
    http: HttpClient,
}

impl Client {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        Url::parse(&base_url).with_context(|| format!("invalid llm.base_url {base_url:?}"))?;
        if model.trim().is_empty() {
            bail!("llm.model must not be empty");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            model: model.to_owned(),
            api_key,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Free-text healthcare navigation advice for a single user query.
    pub fn advice(&self, query: &str) -> String {
        let messages = [
            Message {
                role: Role::System,
                content: SYSTEM_PROMPT.to_owned(),
            },
            Message {
                role: Role::User,
                content: query.to_owned(),
            },
        ];
        match self.chat_complete(&messages, ADVICE_MAX_TOKENS, ADVICE_TEMPERATURE) {
            Ok(content) if !content.trim().is_empty() => content,
            Ok(_) => ADVICE_EMPTY_FALLBACK.to_owned(),
            Err(_) => ADVICE_ERROR_FALLBACK.to_owned(),
        }
    }

    /// Free-text narrative of assistance programs the household might
    /// qualify for.
    pub fn eligibility_analysis(&self, inquiry: &InquiryDetails) -> String {
        let messages = [Message {
            role: Role::User,
            content: build_eligibility_prompt(inquiry),
        }];
        match self.chat_complete(&messages, ELIGIBILITY_MAX_TOKENS, ELIGIBILITY_TEMPERATURE) {
            Ok(content) if !content.trim().is_empty() => content,
            Ok(_) => ELIGIBILITY_EMPTY_FALLBACK.to_owned(),
            Err(_) => ELIGIBILITY_ERROR_FALLBACK.to_owned(),
        }
    }

    fn chat_complete(&self, messages: &[Message], max_tokens: u32, temperature: f32) -> Result<String> {
        let request = ChatRequest::new(&self.model, messages, max_tokens, temperature);
        let mut builder = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let parsed: ChatCompletionResponse = response.json().context("decode chat response")?;
        let content = parsed
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow!("no choices in chat response"))?;
        Ok(content)
    }
}

impl Advisor for Client {
    fn advice(&mut self, query: &str) -> Result<String> {
        Ok(Client::advice(self, query))
    }

    fn eligibility_analysis(&mut self, inquiry: &InquiryDetails) -> Result<String> {
        Ok(Client::eligibility_analysis(self, inquiry))
    }
}

pub fn build_eligibility_prompt(inquiry: &InquiryDetails) -> String {
    let conditions = if inquiry.medical_conditions.is_empty() {
        "None specified".to_owned()
    } else {
        inquiry.medical_conditions.join(", ")
    };

    let mut out = String::new();
    out.push_str(
        "Based on the following information, suggest potential healthcare benefits and assistance programs:\n\n",
    );
    out.push_str(&format!("Household size: {}\n", inquiry.household_size));
    out.push_str(&format!("Annual income: ${}\n", inquiry.income));
    out.push_str(&format!("Current insurance: {}\n", inquiry.current_insurance));
    out.push_str(&format!("Location: {}\n", inquiry.location));
    out.push_str(&format!("Medical conditions: {conditions}\n"));
    out.push_str(
        "\nPlease provide specific, actionable recommendations for benefits they might qualify for.",
    );
    out
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!("cannot reach advisory service at {base_url} ({error})")
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.message.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), error.message);
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, messages: &'a [Message], max_tokens: u32, temperature: f32) -> Self {
        Self {
            model,
            messages: messages
                .iter()
                .map(|message| WireMessage {
                    role: message.role.as_str(),
                    content: &message.content,
                })
                .collect(),
            max_tokens,
            temperature,
        }
    }
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::{
        Client, Message, Role, SYSTEM_PROMPT, build_eligibility_prompt, clean_error_response,
    };
    use anyhow::Result;
    use healthbridge_app::InquiryDetails;
    use reqwest::StatusCode;
    use std::time::Duration;

    fn inquiry() -> InquiryDetails {
        InquiryDetails {
            household_size: 4,
            income: 25_000.0,
            current_insurance: "Medicaid".to_owned(),
            location: "60601".to_owned(),
            medical_conditions: vec!["asthma".to_owned(), "diabetes".to_owned()],
        }
    }

    #[test]
    fn eligibility_prompt_embeds_inquiry_fields() {
        let prompt = build_eligibility_prompt(&inquiry());
        assert!(prompt.contains("Household size: 4"));
        assert!(prompt.contains("Annual income: $25000"));
        assert!(prompt.contains("Current insurance: Medicaid"));
        assert!(prompt.contains("Location: 60601"));
        assert!(prompt.contains("Medical conditions: asthma, diabetes"));
        assert!(prompt.contains("actionable recommendations"));
    }

    #[test]
    fn eligibility_prompt_defaults_missing_conditions() {
        let mut details = inquiry();
        details.medical_conditions.clear();
        let prompt = build_eligibility_prompt(&details);
        assert!(prompt.contains("Medical conditions: None specified"));
    }

    #[test]
    fn system_prompt_keeps_safety_disclaimer() {
        assert!(SYSTEM_PROMPT.contains("healthcare navigation assistant"));
        assert!(SYSTEM_PROMPT.contains("consulting healthcare professionals"));
    }

    #[test]
    fn client_rejects_invalid_configuration() {
        assert!(Client::new("", "model", None, Duration::from_secs(1)).is_err());
        assert!(Client::new("not a url", "model", None, Duration::from_secs(1)).is_err());
        assert!(
            Client::new("https://openrouter.ai/api/v1", " ", None, Duration::from_secs(1)).is_err()
        );
    }

    #[test]
    fn client_accepts_missing_api_key() -> Result<()> {
        let client = Client::new(
            "https://openrouter.ai/api/v1/",
            "google/gemini-2.0-flash-001",
            None,
            Duration::from_secs(1),
        )?;
        assert_eq!(client.base_url(), "https://openrouter.ai/api/v1");
        assert_eq!(client.model(), "google/gemini-2.0-flash-001");
        Ok(())
    }

    #[test]
    fn chat_request_serializes_wire_shape() -> Result<()> {
        let messages = [
            Message {
                role: Role::System,
                content: "be helpful".to_owned(),
            },
            Message {
                role: Role::User,
                content: "hello".to_owned(),
            },
        ];
        let request = super::ChatRequest::new("google/gemini-2.0-flash-001", &messages, 500, 0.7);
        let encoded = serde_json::to_string(&request)?;
        assert!(encoded.contains("\"model\":\"google/gemini-2.0-flash-001\""));
        assert!(encoded.contains("\"role\":\"system\""));
        assert!(encoded.contains("\"role\":\"user\""));
        assert!(encoded.contains("\"max_tokens\":500"));
        assert!(encoded.contains("\"temperature\":0.7"));
        Ok(())
    }

    #[test]
    fn error_responses_condense_to_readable_messages() {
        let message = clean_error_response(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"missing bearer token"}}"#,
        )
        .to_string();
        assert!(message.contains("401"));
        assert!(message.contains("missing bearer token"));

        let plain = clean_error_response(StatusCode::BAD_GATEWAY, "upstream down").to_string();
        assert!(plain.contains("502"));
        assert!(plain.contains("upstream down"));

        let opaque = clean_error_response(StatusCode::INTERNAL_SERVER_ERROR, "{not json").to_string();
        assert!(opaque.contains("server returned 500"));
    }
}
