//! Shared harness for the integration tests.
//!
//! Everything runs over one `InMemoryStore` and a `FixedClock`, so expiry
//! can be driven explicitly.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use secrecy::Secret;

use portal_onboarding::adapters::{
    Argon2PasswordHasher, FixedClock, InMemoryStore, NotificationRelay, RecordingDispatcher,
};
use portal_onboarding::application::{
    CompleteVendorOnboardingCommand, CompleteVendorOnboardingHandler, DocumentUpload,
    IssueInvitationCommand, IssueInvitationHandler, RegisterEmployeeHandler,
};
use portal_onboarding::domain::account::{
    BankAccountType, BankingDetails, CompanyDetails, InsuranceDetails, LegalAcceptance,
    PrimaryContact,
};
use portal_onboarding::domain::compliance::{DocumentFile, DocumentType};
use portal_onboarding::domain::foundation::{AccountId, Actor, Role, Timestamp};
use portal_onboarding::domain::invitation::{InvitationCode, InvitationGate, InvitationPolicy};
use portal_onboarding::domain::notification::RenderContext;

pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<FixedClock>,
    pub dispatcher: Arc<RecordingDispatcher>,
}

impl Harness {
    pub fn new() -> Self {
        let clock = Arc::new(FixedClock::new(Timestamp::now()));
        Self {
            store: Arc::new(InMemoryStore::with_clock(clock.clone())),
            clock,
            dispatcher: Arc::new(RecordingDispatcher::new()),
        }
    }

    pub fn issuer(&self) -> IssueInvitationHandler {
        IssueInvitationHandler::new(
            self.store.clone(),
            self.store.clone(),
            self.clock.clone(),
            InvitationPolicy::default(),
        )
    }

    pub fn registrar(&self) -> RegisterEmployeeHandler {
        RegisterEmployeeHandler::new(
            self.store.clone(),
            self.store.clone(),
            Arc::new(Argon2PasswordHasher::new()),
            self.clock.clone(),
        )
    }

    pub fn vendor_onboarding(&self) -> CompleteVendorOnboardingHandler {
        CompleteVendorOnboardingHandler::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            Arc::new(Argon2PasswordHasher::new()),
            self.clock.clone(),
        )
    }

    pub fn relay(&self) -> NotificationRelay {
        NotificationRelay::new(
            self.store.clone(),
            self.dispatcher.clone(),
            RenderContext {
                company_name: "Williams Diversified".to_string(),
                portal_url: "https://portal.example.com".to_string(),
            },
        )
    }

    /// Issues a vendor invitation as an admin and returns its code.
    pub async fn invite_vendor(&self, email: &str, vendor_name: &str) -> InvitationCode {
        let result = self
            .issuer()
            .handle(IssueInvitationCommand {
                actor: admin(),
                email: email.to_string(),
                role: Role::Vendor,
                vendor_name: Some(vendor_name.to_string()),
                phone: None,
            })
            .await
            .expect("vendor invitation");
        result.invitation.code().clone()
    }
}

pub fn admin() -> Actor {
    Actor::new(AccountId::new(), Role::Admin, "Ada Admin")
}

pub fn manager() -> Actor {
    Actor::new(AccountId::new(), Role::Manager, "Max Manager")
}

pub fn upload(document_type: DocumentType, file_name: &str) -> DocumentUpload {
    DocumentUpload {
        document_type,
        file: DocumentFile {
            file_name: file_name.to_string(),
            content_type: "application/pdf".to_string(),
            storage_key: format!("uploads/{}", file_name),
            size_bytes: 48_000,
        },
    }
}

/// A complete, valid onboarding form.
pub fn vendor_form(
    code: &InvitationCode,
    documents: Vec<DocumentUpload>,
) -> CompleteVendorOnboardingCommand {
    CompleteVendorOnboardingCommand {
        code: code.as_str().to_string(),
        password: Secret::new("gravel-and-tar-2024".to_string()),
        company: CompanyDetails {
            name: "Acme Paving".to_string(),
            business_type: "LLC".to_string(),
            ein: "12-3456789".to_string(),
            phone: "555-0100".to_string(),
            email: "office@acme.test".to_string(),
            website: Some("https://acme.test".to_string()),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip: "62701".to_string(),
        },
        contact: PrimaryContact {
            first_name: "Jo".to_string(),
            last_name: "Smith".to_string(),
            title: "Owner".to_string(),
            email: "jo@acme.test".to_string(),
            phone: "555-0101".to_string(),
        },
        insurance: InsuranceDetails {
            provider: "Mutual Casualty".to_string(),
            policy_number: "GL-448812".to_string(),
            coverage_amount: 2_000_000,
            expiry_date: NaiveDate::from_ymd_opt(2099, 6, 30).expect("valid date"),
        },
        banking: BankingDetails {
            bank_name: "First Bank".to_string(),
            account_type: BankAccountType::Checking,
            routing_number: Secret::new("021000021".to_string()),
            account_number: Secret::new("1234567890".to_string()),
        },
        legal: LegalAcceptance {
            nda_accepted: true,
            terms_accepted: true,
            signature: "Jo Smith".to_string(),
        },
        documents,
    }
}
