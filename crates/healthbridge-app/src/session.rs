// Copyright 2026 HealthBridge Contributors
// Licensed under the Apache License, Version 2.0

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::forms::{InquiryDetails, SearchFilters};
use crate::ids::ChatMessageId;
use crate::mock::{generate_benefits, generate_providers};
use crate::model::{Benefit, ChatMessage, NavigationStep, Provider, Role};

/// Reply appended to the transcript when the advisory boundary errs.
pub const CHAT_FAILURE_REPLY: &str = "I apologize, but I encountered an error. Please try again.";

/// Narrative stored when the benefit-check advisory call errs.
pub const ELIGIBILITY_FAILURE_NOTE: &str =
    "Unable to analyze eligibility at this time. Please try again later.";

/// Simulated directory latency; matches the original flow's 1.5 second
/// pause so the loading state is exercised.
pub const DEFAULT_SEARCH_LATENCY: Duration = Duration::from_millis(1500);

/// Boundary to the external chat-completion service. The production
/// implementation lives in the llm crate; tests substitute stubs.
pub trait Advisor {
    fn advice(&mut self, query: &str) -> Result<String>;
    fn eligibility_analysis(&mut self, inquiry: &InquiryDetails) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Navigate(NavigationStep),
    SubmitProviderSearch,
    SubmitBenefitCheck,
    SendChatMessage(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StepChanged(NavigationStep),
    BusyChanged(bool),
    ChatBusyChanged(bool),
    ProvidersLoaded(usize),
    BenefitsLoaded(usize),
    EligibilityNoteUpdated,
    MessageAppended(Role),
    StatusUpdated(String),
}

/// One user session. All mutation goes through `dispatch` and the field
/// setters; the view layer only reads the accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    step: NavigationStep,
    filters: SearchFilters,
    inquiry: InquiryDetails,
    providers: Vec<Provider>,
    benefits: Vec<Benefit>,
    transcript: Vec<ChatMessage>,
    busy: bool,
    chat_busy: bool,
    eligibility_note: Option<String>,
    status_line: Option<String>,
    next_message_id: i64,
    search_latency: Duration,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_latency(DEFAULT_SEARCH_LATENCY)
    }
}

impl Session {
    pub fn with_latency(search_latency: Duration) -> Self {
        Self {
            step: NavigationStep::Home,
            filters: SearchFilters::default(),
            inquiry: InquiryDetails::default(),
            providers: Vec::new(),
            benefits: Vec::new(),
            transcript: Vec::new(),
            busy: false,
            chat_busy: false,
            eligibility_note: None,
            status_line: None,
            next_message_id: 1,
            search_latency,
        }
    }

    pub fn step(&self) -> NavigationStep {
        self.step
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn inquiry(&self) -> &InquiryDetails {
        &self.inquiry
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn benefits(&self) -> &[Benefit] {
        &self.benefits
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    pub fn chat_busy(&self) -> bool {
        self.chat_busy
    }

    pub fn eligibility_note(&self) -> Option<&str> {
        self.eligibility_note.as_deref()
    }

    pub fn status_line(&self) -> Option<&str> {
        self.status_line.as_deref()
    }

    pub fn set_specialty(&mut self, value: &str) {
        self.filters.specialty = value.to_owned();
    }

    pub fn set_insurance_plan(&mut self, value: &str) {
        self.filters.insurance_plan = value.to_owned();
    }

    pub fn set_search_location(&mut self, value: &str) {
        self.filters.location = value.to_owned();
    }

    pub fn set_search_radius(&mut self, value: Option<f64>) {
        self.filters.radius = value;
    }

    pub fn set_household_size(&mut self, value: i64) {
        self.inquiry.household_size = value.max(1);
    }

    pub fn set_income(&mut self, value: f64) {
        self.inquiry.income = value.max(0.0);
    }

    pub fn set_current_insurance(&mut self, value: &str) {
        self.inquiry.current_insurance = value.to_owned();
    }

    pub fn set_inquiry_location(&mut self, value: &str) {
        self.inquiry.location = value.to_owned();
    }

    pub fn set_medical_conditions(&mut self, values: Vec<String>) {
        self.inquiry.medical_conditions = values;
    }

    pub fn dispatch(
        &mut self,
        command: SessionCommand,
        advisor: &mut dyn Advisor,
    ) -> Vec<SessionEvent> {
        match command {
            SessionCommand::Navigate(step) => self.navigate(step),
            SessionCommand::SubmitProviderSearch => self.submit_provider_search(),
            SessionCommand::SubmitBenefitCheck => self.submit_benefit_check(advisor),
            SessionCommand::SendChatMessage(text) => self.send_chat_message(&text, advisor),
        }
    }

    /// Unconditional screen switch. Prior results are intentionally kept;
    /// the Results screen shows its own fallback when both lists are empty.
    fn navigate(&mut self, step: NavigationStep) -> Vec<SessionEvent> {
        self.step = step;
        vec![SessionEvent::StepChanged(step)]
    }

    fn submit_provider_search(&mut self) -> Vec<SessionEvent> {
        if self.busy || !self.filters.is_search_ready() {
            return Vec::new();
        }

        let mut events = Vec::new();
        self.busy = true;
        events.push(SessionEvent::BusyChanged(true));
        self.step = NavigationStep::Results;
        events.push(SessionEvent::StepChanged(self.step));

        self.simulate_latency();
        self.providers = generate_providers(&self.filters.specialty, &self.filters.insurance_plan);
        events.push(SessionEvent::ProvidersLoaded(self.providers.len()));

        self.busy = false;
        events.push(SessionEvent::BusyChanged(false));
        events
    }

    fn submit_benefit_check(&mut self, advisor: &mut dyn Advisor) -> Vec<SessionEvent> {
        if self.busy || !self.inquiry.is_submittable() {
            return Vec::new();
        }

        let mut events = Vec::new();
        self.busy = true;
        events.push(SessionEvent::BusyChanged(true));
        self.step = NavigationStep::Results;
        events.push(SessionEvent::StepChanged(self.step));

        self.simulate_latency();
        self.benefits = generate_benefits(&self.inquiry);
        events.push(SessionEvent::BenefitsLoaded(self.benefits.len()));

        // Best-effort narrative; never affects whether benefits are shown.
        match advisor.eligibility_analysis(&self.inquiry) {
            Ok(note) => {
                self.eligibility_note = Some(note);
            }
            Err(error) => {
                self.eligibility_note = Some(ELIGIBILITY_FAILURE_NOTE.to_owned());
                events.push(self.set_status(&format!("eligibility analysis failed: {error:#}")));
            }
        }
        events.push(SessionEvent::EligibilityNoteUpdated);

        self.busy = false;
        events.push(SessionEvent::BusyChanged(false));
        events
    }

    fn send_chat_message(&mut self, text: &str, advisor: &mut dyn Advisor) -> Vec<SessionEvent> {
        if self.chat_busy || text.trim().is_empty() {
            return Vec::new();
        }

        let mut events = Vec::new();
        self.append_message(Role::User, text);
        events.push(SessionEvent::MessageAppended(Role::User));
        self.chat_busy = true;
        events.push(SessionEvent::ChatBusyChanged(true));

        let reply = match advisor.advice(text) {
            Ok(reply) => reply,
            Err(error) => {
                events.push(self.set_status(&format!("advisory request failed: {error:#}")));
                CHAT_FAILURE_REPLY.to_owned()
            }
        };
        self.append_message(Role::Assistant, &reply);
        events.push(SessionEvent::MessageAppended(Role::Assistant));

        self.chat_busy = false;
        events.push(SessionEvent::ChatBusyChanged(false));
        events
    }

    fn append_message(&mut self, role: Role, content: &str) {
        let id = ChatMessageId::new(self.next_message_id);
        self.next_message_id += 1;
        self.transcript.push(ChatMessage {
            id,
            role,
            content: content.to_owned(),
            timestamp: OffsetDateTime::now_utc(),
        });
    }

    fn set_status(&mut self, message: &str) -> SessionEvent {
        self.status_line = Some(message.to_owned());
        SessionEvent::StatusUpdated(message.to_owned())
    }

    fn simulate_latency(&self) {
        if !self.search_latency.is_zero() {
            std::thread::sleep(self.search_latency);
        }
    }
}
