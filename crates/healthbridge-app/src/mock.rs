// Copyright 2026 HealthBridge Contributors
// Licensed under the Apache License, Version 2.0

//! Deterministic stand-ins for the provider directory and benefits
//! catalog. All data is fixed sample data; the same inputs always produce
//! the same records in the same order.

use crate::forms::InquiryDetails;
use crate::ids::{BenefitId, ProviderId};
use crate::model::{Benefit, BenefitCategory, Provider};

/// Returns three sample providers. The requested specialty is echoed into
/// every record and the requested insurance plan leads each record's
/// accepted-insurance list.
pub fn generate_providers(specialty: &str, insurance_plan: &str) -> Vec<Provider> {
    vec![
        Provider {
            id: ProviderId::new(1),
            name: "Dr. Sarah Johnson".to_owned(),
            specialty: specialty.to_owned(),
            address: "123 Main St, Anytown, ST 12345".to_owned(),
            phone: "5551234567".to_owned(),
            accepted_insurance: vec![
                insurance_plan.to_owned(),
                "Medicare".to_owned(),
                "Medicaid".to_owned(),
            ],
            rating: 4.8,
            review_count: 127,
            distance_miles: Some(0.8),
            availability: Some("Next available: Tomorrow".to_owned()),
        },
        Provider {
            id: ProviderId::new(2),
            name: "Dr. Michael Chen".to_owned(),
            specialty: specialty.to_owned(),
            address: "456 Oak Ave, Anytown, ST 12345".to_owned(),
            phone: "5552345678".to_owned(),
            accepted_insurance: vec![insurance_plan.to_owned(), "CHIP".to_owned()],
            rating: 4.6,
            review_count: 89,
            distance_miles: Some(1.2),
            availability: Some("Next available: Next week".to_owned()),
        },
        Provider {
            id: ProviderId::new(3),
            name: "Dr. Emily Rodriguez".to_owned(),
            specialty: specialty.to_owned(),
            address: "789 Pine Rd, Anytown, ST 12345".to_owned(),
            phone: "5553456789".to_owned(),
            accepted_insurance: vec![
                insurance_plan.to_owned(),
                "Medicaid".to_owned(),
                "Medicare".to_owned(),
            ],
            rating: 4.9,
            review_count: 203,
            distance_miles: Some(2.1),
            availability: Some("Next available: This week".to_owned()),
        },
    ]
}

/// Returns three sample assistance programs. The inquiry is accepted for
/// signature parity with a real benefits source; the catalog itself is
/// fixed.
pub fn generate_benefits(_inquiry: &InquiryDetails) -> Vec<Benefit> {
    vec![
        Benefit {
            id: BenefitId::new(1),
            name: "Prescription Assistance Program".to_owned(),
            description: "Reduced-cost medications for qualifying individuals".to_owned(),
            eligibility_requirements: vec![
                "Income below 200% of Federal Poverty Level".to_owned(),
                "No prescription coverage".to_owned(),
            ],
            application_process: "Apply online or call 1-800-XXX-XXXX".to_owned(),
            estimated_savings: Some(150),
            category: BenefitCategory::Prescription,
        },
        Benefit {
            id: BenefitId::new(2),
            name: "Transportation Vouchers".to_owned(),
            description: "Free or reduced-cost transportation to medical appointments".to_owned(),
            eligibility_requirements: vec![
                "Medicaid recipient".to_owned(),
                "No reliable transportation".to_owned(),
            ],
            application_process: "Contact your Medicaid case worker".to_owned(),
            estimated_savings: Some(50),
            category: BenefitCategory::Transportation,
        },
        Benefit {
            id: BenefitId::new(3),
            name: "Dental Care Program".to_owned(),
            description: "Low-cost dental services at community health centers".to_owned(),
            eligibility_requirements: vec![
                "Income below 150% of Federal Poverty Level".to_owned(),
            ],
            application_process: "Visit participating community health center".to_owned(),
            estimated_savings: Some(200),
            category: BenefitCategory::Dental,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::{generate_benefits, generate_providers};
    use crate::forms::InquiryDetails;
    use crate::model::BenefitCategory;

    #[test]
    fn providers_echo_specialty_and_insurance() {
        let providers = generate_providers("Cardiology", "Medicaid");
        assert_eq!(providers.len(), 3);
        for provider in &providers {
            assert_eq!(provider.specialty, "Cardiology");
            assert!(
                provider
                    .accepted_insurance
                    .iter()
                    .any(|plan| plan == "Medicaid")
            );
            assert!((0.0..=5.0).contains(&provider.rating));
            assert!(provider.review_count >= 0);
        }
    }

    #[test]
    fn providers_are_idempotent() {
        let first = generate_providers("Pediatrics", "Marketplace Plan");
        let second = generate_providers("Pediatrics", "Marketplace Plan");
        assert_eq!(first, second);
    }

    #[test]
    fn benefits_have_stable_categories() {
        let inquiry = InquiryDetails {
            household_size: 2,
            income: 18_000.0,
            current_insurance: "Uninsured".to_owned(),
            location: "62701".to_owned(),
            medical_conditions: Vec::new(),
        };
        let benefits = generate_benefits(&inquiry);
        assert_eq!(benefits.len(), 3);
        assert_eq!(
            benefits.iter().map(|benefit| benefit.category).collect::<Vec<_>>(),
            vec![
                BenefitCategory::Prescription,
                BenefitCategory::Transportation,
                BenefitCategory::Dental,
            ],
        );
    }

    #[test]
    fn benefits_are_idempotent() {
        let inquiry = InquiryDetails::default();
        assert_eq!(generate_benefits(&inquiry), generate_benefits(&inquiry));
    }
}
