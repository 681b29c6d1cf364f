// Copyright 2026 HealthBridge Contributors
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationStep {
    Home,
    ProviderSearch,
    BenefitsCheck,
    AppointmentHelp,
    Results,
}

impl NavigationStep {
    pub const ALL: [Self; 5] = [
        Self::Home,
        Self::ProviderSearch,
        Self::BenefitsCheck,
        Self::AppointmentHelp,
        Self::Results,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::ProviderSearch => "provider-search",
            Self::BenefitsCheck => "benefits-check",
            Self::AppointmentHelp => "appointment-help",
            Self::Results => "results",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "home" => Some(Self::Home),
            "provider-search" => Some(Self::ProviderSearch),
            "benefits-check" => Some(Self::BenefitsCheck),
            "appointment-help" => Some(Self::AppointmentHelp),
            "results" => Some(Self::Results),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::ProviderSearch => "find providers",
            Self::BenefitsCheck => "check benefits",
            Self::AppointmentHelp => "appointment help",
            Self::Results => "results",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenefitCategory {
    Prescription,
    Dental,
    Vision,
    MentalHealth,
    Transportation,
    Other,
}

impl BenefitCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prescription => "prescription",
            Self::Dental => "dental",
            Self::Vision => "vision",
            Self::MentalHealth => "mental_health",
            Self::Transportation => "transportation",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "prescription" => Some(Self::Prescription),
            "dental" => Some(Self::Dental),
            "vision" => Some(Self::Vision),
            "mental_health" => Some(Self::MentalHealth),
            "transportation" => Some(Self::Transportation),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// Provider records are immutable once produced; identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,
    pub specialty: String,
    pub address: String,
    /// Raw digits; the view layer renders via `format_phone`.
    pub phone: String,
    pub accepted_insurance: Vec<String>,
    pub rating: f64,
    pub review_count: i64,
    pub distance_miles: Option<f64>,
    pub availability: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Benefit {
    pub id: BenefitId,
    pub name: String,
    pub description: String,
    pub eligibility_requirements: Vec<String>,
    pub application_process: String,
    pub estimated_savings: Option<i64>,
    pub category: BenefitCategory,
}

/// One entry of the append-only chat transcript. Never mutated after
/// creation; insertion order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: ChatMessageId,
    pub role: Role,
    pub content: String,
    pub timestamp: OffsetDateTime,
}

pub const INSURANCE_PLANS: [&str; 6] = [
    "Medicaid",
    "CHIP (Children's Health Insurance)",
    "Medicare",
    "Marketplace Plan",
    "Uninsured",
    "Other",
];

pub const SPECIALTIES: [&str; 14] = [
    "Primary Care",
    "Pediatrics",
    "Cardiology",
    "Dermatology",
    "Endocrinology",
    "Gastroenterology",
    "Neurology",
    "Obstetrics & Gynecology",
    "Orthopedics",
    "Psychiatry",
    "Pulmonology",
    "Rheumatology",
    "Urology",
    "Other",
];
