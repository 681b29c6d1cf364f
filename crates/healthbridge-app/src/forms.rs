// Copyright 2026 HealthBridge Contributors
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Provider-search form state. Fields persist across navigation; the
/// observed flow never resets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchFilters {
    pub specialty: String,
    pub insurance_plan: String,
    pub location: String,
    pub radius: Option<f64>,
}

impl SearchFilters {
    /// Search-ready iff specialty, insurance plan, and location are all
    /// non-empty after trimming.
    pub fn is_search_ready(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> Result<()> {
        if self.specialty.trim().is_empty() {
            bail!("specialty is required -- choose a specialty and retry");
        }
        if self.insurance_plan.trim().is_empty() {
            bail!("insurance plan is required -- choose a plan and retry");
        }
        if self.location.trim().is_empty() {
            bail!("location is required -- enter a ZIP code or city and retry");
        }
        if let Some(radius) = self.radius
            && radius <= 0.0
        {
            bail!("search radius must be positive");
        }
        Ok(())
    }
}

/// Benefits-check form state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InquiryDetails {
    pub household_size: i64,
    pub income: f64,
    pub current_insurance: String,
    pub location: String,
    pub medical_conditions: Vec<String>,
}

impl Default for InquiryDetails {
    fn default() -> Self {
        Self {
            household_size: 1,
            income: 0.0,
            current_insurance: String::new(),
            location: String::new(),
            medical_conditions: Vec::new(),
        }
    }
}

impl InquiryDetails {
    /// Submittable iff current insurance and location are non-empty and
    /// income is positive.
    pub fn is_submittable(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> Result<()> {
        if self.household_size < 1 {
            bail!("household size must be at least 1");
        }
        if self.income <= 0.0 {
            bail!("annual income is required -- enter a positive amount and retry");
        }
        if self.current_insurance.trim().is_empty() {
            bail!("current insurance is required -- choose a plan and retry");
        }
        if self.location.trim().is_empty() {
            bail!("location is required -- enter a ZIP code or city and retry");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{InquiryDetails, SearchFilters};

    fn ready_filters() -> SearchFilters {
        SearchFilters {
            specialty: "Cardiology".to_owned(),
            insurance_plan: "Medicaid".to_owned(),
            location: "60601".to_owned(),
            radius: None,
        }
    }

    #[test]
    fn filters_require_all_three_fields() {
        assert!(ready_filters().is_search_ready());

        for blank in ["specialty", "insurance_plan", "location"] {
            let mut filters = ready_filters();
            match blank {
                "specialty" => filters.specialty.clear(),
                "insurance_plan" => filters.insurance_plan.clear(),
                _ => filters.location.clear(),
            }
            assert!(!filters.is_search_ready(), "{blank} should be required");
        }
    }

    #[test]
    fn filters_reject_non_positive_radius() {
        let mut filters = ready_filters();
        filters.radius = Some(0.0);
        assert!(filters.validate().is_err());

        filters.radius = Some(10.0);
        assert!(filters.validate().is_ok());
    }

    #[test]
    fn inquiry_defaults_are_not_submittable() {
        assert!(!InquiryDetails::default().is_submittable());
    }

    #[test]
    fn inquiry_requires_income_insurance_and_location() {
        let inquiry = InquiryDetails {
            household_size: 4,
            income: 25_000.0,
            current_insurance: "Medicaid".to_owned(),
            location: "60601".to_owned(),
            medical_conditions: Vec::new(),
        };
        assert!(inquiry.is_submittable());

        let zero_income = InquiryDetails {
            income: 0.0,
            ..inquiry.clone()
        };
        assert!(!zero_income.is_submittable());

        let no_location = InquiryDetails {
            location: String::new(),
            ..inquiry
        };
        assert!(!no_location.is_submittable());
    }

    #[test]
    fn inquiry_rejects_empty_household() {
        let inquiry = InquiryDetails {
            household_size: 0,
            income: 18_000.0,
            current_insurance: "Uninsured".to_owned(),
            location: "Springfield".to_owned(),
            medical_conditions: Vec::new(),
        };
        assert!(inquiry.validate().is_err());
    }
}
