//! CompleteVendorOnboardingHandler - Saga turning a vendor invitation into
//! an account, a company profile and pending compliance documents.
//!
//! Steps run in order: account, profile, documents, then the conditional
//! redemption of the invitation (which also enqueues the welcome email).
//! Any failure after the first write unwinds the completed steps in reverse.

use std::sync::Arc;

use secrecy::Secret;
use tracing::{error, info, warn};

use crate::application::handlers::invitation::consumed_or_error;
use crate::domain::account::{
    validate_password, Account, BankingDetails, CompanyDetails, InsuranceDetails,
    LegalAcceptance, NewAccount, PrimaryContact, VendorProfile,
};
use crate::domain::compliance::{ComplianceDocument, DocumentFile, DocumentType};
use crate::domain::foundation::{AccountId, DocumentId, Role, VendorProfileId};
use crate::domain::invitation::{InvitationCode, InvitationError, InvitationGate, VendorInvitation};
use crate::domain::notification::{NotificationIntent, NotificationKind};
use crate::ports::{
    AccountRepository, Clock, DocumentRepository, InvitationRepository, PasswordHasher,
    VendorProfileRepository,
};

/// One file uploaded on the onboarding form.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub document_type: DocumentType,
    pub file: DocumentFile,
}

/// Command to complete vendor onboarding.
#[derive(Debug, Clone)]
pub struct CompleteVendorOnboardingCommand {
    pub code: String,
    pub password: Secret<String>,
    pub company: CompanyDetails,
    pub contact: PrimaryContact,
    pub insurance: InsuranceDetails,
    pub banking: BankingDetails,
    pub legal: LegalAcceptance,
    pub documents: Vec<DocumentUpload>,
}

/// Result of successful onboarding.
#[derive(Debug, Clone)]
pub struct CompleteVendorOnboardingResult {
    pub account: Account,
    pub profile: VendorProfile,
    pub documents: Vec<ComplianceDocument>,
    pub invitation: VendorInvitation,
}

/// A completed write and how to undo it.
#[derive(Debug, Clone, Copy)]
enum Compensation {
    DeleteAccount(AccountId),
    DeleteProfile(VendorProfileId),
    DeleteDocument(DocumentId),
}

impl Compensation {
    fn step(&self) -> &'static str {
        match self {
            Compensation::DeleteAccount(_) => "delete_account",
            Compensation::DeleteProfile(_) => "delete_profile",
            Compensation::DeleteDocument(_) => "delete_document",
        }
    }
}

/// Handler for the vendor onboarding form.
pub struct CompleteVendorOnboardingHandler {
    invitations: Arc<dyn InvitationRepository>,
    accounts: Arc<dyn AccountRepository>,
    profiles: Arc<dyn VendorProfileRepository>,
    documents: Arc<dyn DocumentRepository>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl CompleteVendorOnboardingHandler {
    pub fn new(
        invitations: Arc<dyn InvitationRepository>,
        accounts: Arc<dyn AccountRepository>,
        profiles: Arc<dyn VendorProfileRepository>,
        documents: Arc<dyn DocumentRepository>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            invitations,
            accounts,
            profiles,
            documents,
            hasher,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: CompleteVendorOnboardingCommand,
    ) -> Result<CompleteVendorOnboardingResult, InvitationError> {
        // 1. Validate the whole form before any write
        let code = InvitationCode::try_new(&cmd.code)?;
        let now = self.clock.now();
        let today = now.as_datetime().date_naive();
        validate_password(&cmd.password)?;
        cmd.company.validate()?;
        cmd.contact.validate()?;
        cmd.insurance.validate(today)?;
        cmd.banking.validate()?;
        cmd.legal.validate()?;
        for upload in &cmd.documents {
            upload.file.validate()?;
        }

        // 2. Load and check the invitation
        let invitation = self
            .invitations
            .find_by_code(&code)
            .await?
            .ok_or_else(|| InvitationError::not_found(code.clone()))?
            .into_vendor()?;
        invitation.validate(now)?;

        let email = invitation.email().clone();
        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(InvitationError::user_already_exists(email.normalized()));
        }

        // 3. Build the records; the invited email doubles as the username
        let password_hash = self.hasher.hash(&cmd.password)?;
        let account = Account::create(
            NewAccount {
                username: email.as_str().to_string(),
                email: email.clone(),
                password_hash,
                role: Role::Vendor,
                first_name: cmd.contact.first_name.trim().to_string(),
                last_name: cmd.contact.last_name.trim().to_string(),
                onboarding_completed: true,
                invitation_code: code.clone(),
            },
            now,
        )?;
        let profile = VendorProfile {
            id: VendorProfileId::new(),
            account_id: account.id,
            invitation_code: code.clone(),
            company: cmd.company,
            contact: cmd.contact,
            insurance: cmd.insurance,
            banking: cmd.banking,
            legal: cmd.legal,
            created_at: now,
        };
        let documents = cmd
            .documents
            .into_iter()
            .map(|upload| {
                ComplianceDocument::submit(profile.id, upload.document_type, upload.file, now)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let welcome = NotificationIntent::new(
            email.clone(),
            profile.contact.full_name(),
            NotificationKind::VendorAccountCreated {
                company_name: profile.company_name().to_string(),
                contact_name: profile.contact.full_name(),
                username: account.username.clone(),
            },
            now,
        );

        // 4. Run the saga
        let mut completed: Vec<Compensation> = Vec::with_capacity(documents.len() + 2);
        let outcome = self
            .run_steps(&code, &account, &profile, &documents, &welcome, &mut completed)
            .await;

        let invitation = match outcome {
            Ok(invitation) => invitation,
            Err(cause) => {
                warn!(
                    invitation_code = %code,
                    account_id = %account.id,
                    completed_steps = completed.len(),
                    error = %cause,
                    "Vendor onboarding failed, rolling back"
                );
                self.compensate(account.id, completed).await?;
                return Err(cause);
            }
        };

        info!(
            invitation_code = %code,
            account_id = %account.id,
            vendor_id = %profile.id,
            documents = documents.len(),
            "Vendor onboarding completed"
        );

        Ok(CompleteVendorOnboardingResult {
            account,
            profile,
            documents,
            invitation,
        })
    }

    async fn run_steps(
        &self,
        code: &InvitationCode,
        account: &Account,
        profile: &VendorProfile,
        documents: &[ComplianceDocument],
        welcome: &NotificationIntent,
        completed: &mut Vec<Compensation>,
    ) -> Result<VendorInvitation, InvitationError> {
        self.accounts.insert(account).await?;
        completed.push(Compensation::DeleteAccount(account.id));

        self.profiles.insert(profile).await?;
        completed.push(Compensation::DeleteProfile(profile.id));

        for document in documents {
            self.documents.insert(document).await?;
            completed.push(Compensation::DeleteDocument(document.id));
        }

        let intents = std::slice::from_ref(welcome);
        let outcome = self
            .invitations
            .consume_if_pending(code, account.id, welcome.created_at, intents)
            .await?;
        consumed_or_error(code.clone(), outcome)?.into_vendor()
    }

    /// Undoes completed steps newest first. Stops at the first failure.
    async fn compensate(
        &self,
        account_id: AccountId,
        completed: Vec<Compensation>,
    ) -> Result<(), InvitationError> {
        for step in completed.into_iter().rev() {
            let result = match step {
                Compensation::DeleteDocument(id) => self.documents.delete(&id).await,
                Compensation::DeleteProfile(id) => self.profiles.delete(&id).await,
                Compensation::DeleteAccount(id) => self.accounts.delete(&id).await,
            };
            if let Err(e) = result {
                error!(
                    account_id = %account_id,
                    step = step.step(),
                    error = %e,
                    "Compensation failed; vendor left partially onboarded"
                );
                return Err(InvitationError::partially_onboarded(account_id, step.step()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FailPoint, FixedClock, InMemoryStore};
    use crate::domain::account::{BankAccountType, HashedPassword};
    use crate::domain::compliance::DocumentStatus;
    use crate::domain::foundation::{DomainError, EmailAddress, Timestamp};
    use crate::domain::invitation::{Invitation, InvitationLifecycle, InvitationState};
    use crate::ports::NotificationOutbox;
    use chrono::NaiveDate;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash(&self, _password: &Secret<String>) -> Result<HashedPassword, DomainError> {
            Ok(HashedPassword::new("plain$hash"))
        }

        fn verify(
            &self,
            _password: &Secret<String>,
            _hash: &HashedPassword,
        ) -> Result<bool, DomainError> {
            Ok(true)
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    async fn setup() -> (Arc<InMemoryStore>, Arc<FixedClock>, CompleteVendorOnboardingHandler) {
        let now = Timestamp::now();
        let store = Arc::new(InMemoryStore::new());
        let invitation = Invitation::Vendor(
            VendorInvitation::new(
                InvitationLifecycle::issue(
                    InvitationCode::try_new("Q7K2M9ZT").unwrap(),
                    EmailAddress::try_new("v@x.com").unwrap(),
                    AccountId::new(),
                    now,
                    now.add_days(30),
                ),
                "Acme Paving",
                None,
            )
            .unwrap(),
        );
        InvitationRepository::insert(store.as_ref(), &invitation, &[])
            .await
            .unwrap();
        let clock = Arc::new(FixedClock::new(now));
        let handler = CompleteVendorOnboardingHandler::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(PlainHasher),
            clock.clone(),
        );
        (store, clock, handler)
    }

    fn upload(document_type: DocumentType, name: &str) -> DocumentUpload {
        DocumentUpload {
            document_type,
            file: DocumentFile {
                file_name: name.to_string(),
                content_type: "application/pdf".to_string(),
                storage_key: format!("vendors/acme/{}", name),
                size_bytes: 2048,
            },
        }
    }

    fn command(documents: Vec<DocumentUpload>) -> CompleteVendorOnboardingCommand {
        CompleteVendorOnboardingCommand {
            code: "Q7K2M9ZT".to_string(),
            password: Secret::new("correct horse".to_string()),
            company: CompanyDetails {
                name: "Acme Paving".to_string(),
                business_type: "LLC".to_string(),
                ein: "12-3456789".to_string(),
                phone: "555-0100".to_string(),
                email: "office@acme.test".to_string(),
                website: None,
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
                provider: "Mutual".to_string(),
                policy_number: "PL-1".to_string(),
                coverage_amount: 1_000_000,
                expiry_date: NaiveDate::from_ymd_opt(2099, 12, 31).unwrap(),
            },
            banking: BankingDetails {
                bank_name: "First Bank".to_string(),
                account_type: BankAccountType::Checking,
                routing_number: Secret::new("123456789".to_string()),
                account_number: Secret::new("000123456789".to_string()),
            },
            legal: LegalAcceptance {
                nda_accepted: true,
                terms_accepted: true,
                signature: "Jo Smith".to_string(),
            },
            documents,
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn onboarding_creates_account_profile_and_pending_documents() {
        let (store, _, handler) = setup().await;

        let result = handler
            .handle(command(vec![
                upload(DocumentType::W9, "w9.pdf"),
                upload(DocumentType::Coi, "coi.pdf"),
            ]))
            .await
            .unwrap();

        assert_eq!(result.account.role, Role::Vendor);
        assert_eq!(result.account.username, "v@x.com");
        assert!(result.account.onboarding_completed);
        assert_eq!(result.profile.account_id, result.account.id);
        assert_eq!(result.documents.len(), 2);
        assert!(result
            .documents
            .iter()
            .all(|d| d.status == DocumentStatus::Pending && d.vendor_id == result.profile.id));
        assert_eq!(result.invitation.lifecycle.state, InvitationState::Consumed);
        assert_eq!(result.invitation.lifecycle.consumed_by, Some(result.account.id));
        assert_eq!(store.document_count(), 2);
    }

    #[tokio::test]
    async fn welcome_email_is_enqueued_with_the_redemption() {
        let (store, _, handler) = setup().await;

        handler.handle(command(vec![])).await.unwrap();

        let claimed = store.claim_pending(10).await.unwrap();
        assert_eq!(claimed.len(), 1);
        assert_eq!(claimed[0].intent.kind.name(), "vendor_account_created");
        assert_eq!(claimed[0].intent.recipient.as_str(), "v@x.com");
    }

    #[tokio::test]
    async fn invalid_form_writes_nothing() {
        let (store, _, handler) = setup().await;
        let mut cmd = command(vec![upload(DocumentType::W9, "w9.pdf")]);
        cmd.legal.nda_accepted = false;

        let err = handler.handle(cmd).await.unwrap_err();

        assert!(matches!(err, InvitationError::ValidationFailed { ref field, .. } if field == "nda_accepted"));
        assert_eq!(store.account_count(), 0);
        assert_eq!(store.profile_count(), 0);
        assert_eq!(store.document_count(), 0);
    }

    #[tokio::test]
    async fn lapsed_insurance_is_rejected() {
        let (_, _, handler) = setup().await;
        let mut cmd = command(vec![]);
        cmd.insurance.expiry_date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();

        let err = handler.handle(cmd).await.unwrap_err();

        assert!(matches!(err, InvitationError::ValidationFailed { ref field, .. } if field == "insurance_expiry"));
    }

    #[tokio::test]
    async fn submission_after_thirty_one_days_is_expired_and_stays_pending() {
        let (store, clock, handler) = setup().await;
        clock.advance_days(31);

        let err = handler.handle(command(vec![])).await.unwrap_err();

        assert!(matches!(err, InvitationError::Expired(_)));
        let stored = store
            .invitation(&InvitationCode::try_new("Q7K2M9ZT").unwrap())
            .unwrap();
        assert_eq!(
            match stored {
                Invitation::Vendor(v) => v.lifecycle.state,
                Invitation::Employee(e) => e.lifecycle.state,
            },
            InvitationState::Pending
        );
    }

    #[tokio::test]
    async fn document_failure_unwinds_every_prior_step() {
        let (store, _, handler) = setup().await;
        store.fail_on(FailPoint::InsertDocument);

        let err = handler
            .handle(command(vec![upload(DocumentType::W9, "w9.pdf")]))
            .await
            .unwrap_err();

        assert!(matches!(err, InvitationError::Infrastructure(_)));
        assert_eq!(store.account_count(), 0);
        assert_eq!(store.profile_count(), 0);
        assert_eq!(store.document_count(), 0);
    }

    #[tokio::test]
    async fn redemption_failure_unwinds_documents_too() {
        let (store, _, handler) = setup().await;
        store.fail_on(FailPoint::ConsumeInvitation);

        handler
            .handle(command(vec![upload(DocumentType::Coi, "coi.pdf")]))
            .await
            .unwrap_err();

        assert_eq!(store.account_count(), 0);
        assert_eq!(store.profile_count(), 0);
        assert_eq!(store.document_count(), 0);
    }

    #[tokio::test]
    async fn failed_compensation_reports_the_step() {
        let (store, _, handler) = setup().await;
        store.fail_on(FailPoint::InsertDocument);
        store.fail_on(FailPoint::DeleteProfile);

        let err = handler
            .handle(command(vec![upload(DocumentType::W9, "w9.pdf")]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InvitationError::PartiallyOnboarded { ref failed_step, .. } if failed_step == "delete_profile"
        ));
        assert_eq!(store.account_count(), 1);
    }

    #[tokio::test]
    async fn employee_code_is_refused() {
        let (store, _, handler) = setup().await;
        let now = Timestamp::now();
        let employee = Invitation::Employee(
            crate::domain::invitation::EmployeeInvitation::new(
                InvitationLifecycle::issue(
                    InvitationCode::try_new("EMPL2345").unwrap(),
                    EmailAddress::try_new("e@x.com").unwrap(),
                    AccountId::new(),
                    now,
                    now.add_days(7),
                ),
                Role::Employee,
            )
            .unwrap(),
        );
        InvitationRepository::insert(store.as_ref(), &employee, &[])
            .await
            .unwrap();
        let mut cmd = command(vec![]);
        cmd.code = "EMPL2345".to_string();

        let err = handler.handle(cmd).await.unwrap_err();

        assert!(matches!(err, InvitationError::WrongInvitationKind { .. }));
    }
}
