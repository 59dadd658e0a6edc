use crate::infra::{InMemoryBusinessRepository, InMemoryVerificationNotifier};
use chrono::Utc;
use clap::Args;
use kapital_admin::businesses::{
    BusinessCompletionService, BusinessId, BusinessProfile, BusinessRecord, DocumentRecord,
    DocumentType, FieldValue, PersonalProfile,
};
use kapital_admin::error::AppError;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the per-field and per-document breakdown for each business.
    #[arg(long)]
    pub(crate) show_components: bool,
    /// Treat every sample applicant as having a verified email.
    #[arg(long)]
    pub(crate) verified: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        show_components,
        verified,
    } = args;

    println!("Business completion demo");
    let repository = Arc::new(InMemoryBusinessRepository::default());
    let notifier = Arc::new(InMemoryVerificationNotifier::default());
    let service = BusinessCompletionService::new(repository, notifier.clone());

    for business in demo_businesses(verified) {
        let entry = service.register(business)?;
        let report = service.score(&entry.id)?;
        let view = service.get(&entry.id)?.summary_view();

        println!(
            "- {} ({}) -> {}% complete | profile {}% | documents {}% [{}] | status {}",
            view.business_id,
            view.business_name.as_deref().unwrap_or("unnamed"),
            report.result.completion_percentage,
            report.profile_percent,
            report.document_percent,
            report.requirement_set.label(),
            view.status
        );

        if !report.missing_documents.is_empty() {
            let missing: Vec<&str> = report
                .missing_documents
                .iter()
                .map(DocumentType::as_str)
                .collect();
            println!("  Missing documents: {}", missing.join(", "));
        }

        if show_components {
            for component in &report.components {
                println!(
                    "    - {}/{} {}",
                    component.credited, component.weight, component.notes
                );
            }
        }
    }

    let queue = service.verification_queue(None)?;
    if queue.is_empty() {
        println!("\nVerification queue: empty");
    } else {
        println!("\nVerification queue");
        for entry in &queue {
            let view = entry.summary_view();
            println!(
                "  - {} {}%",
                view.business_id,
                view.completion_percentage.unwrap_or_default()
            );
        }
    }

    let reminders = notifier.events();
    if reminders.is_empty() {
        println!("Email reminders: none dispatched");
    } else {
        println!("Email reminders:");
        for reminder in reminders {
            println!("  - template={} -> {}", reminder.template, reminder.business_id);
        }
    }

    Ok(())
}

fn demo_businesses(verified: bool) -> Vec<BusinessRecord> {
    let personal_profile = Some(if verified {
        PersonalProfile::verified()
    } else {
        PersonalProfile::unverified()
    });

    let uploaded = |doc_type: DocumentType, name: &str| DocumentRecord {
        doc_type,
        name: Some(name.to_string()),
        url: None,
        uploaded_at: Some(Utc::now()),
    };

    let complete_profile = BusinessProfile {
        business_name: Some("Kilimo Fresh".into()),
        business_description: Some("Cold-chain distribution for smallholder farmers".into()),
        type_of_incorporation: Some("sole-proprietorship".into()),
        sector: Some("Agriculture".into()),
        country: Some("Kenya".into()),
        city: Some("Nairobi".into()),
        postal_code: Some("00100".into()),
        average_annual_turnover: Some(FieldValue::Number(2_400_000.0)),
        average_monthly_turnover: Some(FieldValue::Number(200_000.0)),
        year_of_registration: Some(2019u32.into()),
        street1: Some("Moi Avenue 14".into()),
        previous_loans: Some(false.into()),
    };

    vec![
        BusinessRecord {
            id: Some(BusinessId("demo-complete".to_string())),
            profile: complete_profile.clone(),
            documents: vec![
                uploaded(DocumentType::BusinessRegistration, "registration.pdf"),
                uploaded(DocumentType::TaxRegistrationDocument, "kra-pin.pdf"),
                uploaded(DocumentType::BusinessPermit, "permit.pdf"),
                uploaded(DocumentType::AnnualBankStatement, "statement-2024.pdf"),
                uploaded(DocumentType::PitchDeck, "pitch.pdf"),
            ],
            personal_profile: personal_profile.clone(),
        },
        BusinessRecord {
            id: Some(BusinessId("demo-undocumented".to_string())),
            profile: BusinessProfile {
                business_name: Some("Kilimo Fresh Branch".into()),
                ..complete_profile
            },
            documents: Vec::new(),
            personal_profile: personal_profile.clone(),
        },
        BusinessRecord {
            id: Some(BusinessId("demo-name-only".to_string())),
            profile: BusinessProfile {
                business_name: Some("Acme".into()),
                ..BusinessProfile::default()
            },
            documents: Vec::new(),
            personal_profile: personal_profile.clone(),
        },
        BusinessRecord {
            id: Some(BusinessId("demo-company".to_string())),
            profile: BusinessProfile {
                business_name: Some("Zuri Holdings".into()),
                type_of_incorporation: Some("private-limited-company".into()),
                ..BusinessProfile::default()
            },
            documents: vec![
                uploaded(DocumentType::CertificateOfIncorporation, "certificate.pdf"),
                uploaded(DocumentType::TaxRegistrationDocument, "tax.pdf"),
            ],
            personal_profile,
        },
    ]
}
