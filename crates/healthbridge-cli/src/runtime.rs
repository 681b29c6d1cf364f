// Copyright 2026 HealthBridge Contributors
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use healthbridge_app::{InquiryDetails, session::Advisor};

/// Wires the session controller to the advisory backend. When the
/// backend is disabled or unconfigured every call errors, and the
/// controller substitutes its canned fallback text.
pub struct AdvisorRuntime {
    client: Option<healthbridge_llm::Client>,
}

impl AdvisorRuntime {
    pub fn new(client: Option<healthbridge_llm::Client>) -> Self {
        Self { client }
    }
}

impl Advisor for AdvisorRuntime {
    fn advice(&mut self, query: &str) -> Result<String> {
        match self.client.as_ref() {
            Some(client) => Ok(client.advice(query)),
            None => bail!("advisory backend is disabled; enable [llm] in the config"),
        }
    }

    fn eligibility_analysis(&mut self, inquiry: &InquiryDetails) -> Result<String> {
        match self.client.as_ref() {
            Some(client) => Ok(client.eligibility_analysis(inquiry)),
            None => bail!("advisory backend is disabled; enable [llm] in the config"),
        }
    }
}
