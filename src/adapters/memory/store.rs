//! In-memory implementation of every persistence port.
//!
//! All tables live behind one mutex, so each port call is atomic: the
//! compare-and-set in `consume_if_pending` and `record_review` holds for
//! concurrent callers, and intents are appended in the same critical
//! section as the state change they belong to.
//!
//! Used by the test suite and for local runs without PostgreSQL. Failure
//! injection (`fail_on`) lets tests break a single operation to exercise
//! compensation paths.
//!
//! Outbox timestamps and the retention cutoff come from the injected
//! `Clock` (system time by default, see `with_clock`).

use async_trait::async_trait;
use chrono::Duration;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::warn;
use uuid::Uuid;

use crate::domain::account::{Account, VendorProfile};
use crate::domain::assignment::{AssigneeSet, WorkItemSummary};
use crate::domain::compliance::{ComplianceDocument, DocumentStatus};
use crate::domain::foundation::{
    AccountId, DocumentId, DomainError, EmailAddress, ErrorCode, Timestamp, VendorProfileId,
    WorkItemId,
};
use crate::domain::invitation::{Invitation, InvitationCode, InvitationGate, InvitationState};
use crate::domain::notification::NotificationIntent;
use crate::adapters::clock::SystemClock;
use crate::ports::{
    AccountRepository, Clock, ConsumeOutcome, DocumentRepository, InsertOutcome,
    InvitationRepository, NotificationOutbox, OutboxCleanup, OutboxEntry, OutboxStatus,
    ReviewOutcome, VendorProfileRepository, WorkItemStore, ABANDONED_CLAIM_ERROR,
};

/// Operations that can be made to fail on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    InsertInvitation,
    ConsumeInvitation,
    InsertAccount,
    DeleteAccount,
    InsertProfile,
    DeleteProfile,
    InsertDocument,
    DeleteDocument,
    RecordReview,
    ReplaceAssignees,
    Enqueue,
    ClaimPending,
}

#[derive(Default)]
struct StoreState {
    invitations: HashMap<InvitationCode, Invitation>,
    accounts: HashMap<AccountId, Account>,
    profiles: HashMap<VendorProfileId, VendorProfile>,
    documents: HashMap<DocumentId, ComplianceDocument>,
    work_items: HashMap<WorkItemId, (WorkItemSummary, AssigneeSet)>,
    outbox: Vec<OutboxEntry>,
}

impl StoreState {
    fn append_intents(&mut self, intents: &[NotificationIntent]) {
        self.outbox
            .extend(intents.iter().cloned().map(OutboxEntry::new));
    }
}

/// Single-lock in-memory store.
pub struct InMemoryStore {
    state: Mutex<StoreState>,
    failures: Mutex<HashSet<FailPoint>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `clock` for outbox stamps and the retention cutoff.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            failures: Mutex::new(HashSet::new()),
            clock,
        }
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self, point: FailPoint) -> Result<(), DomainError> {
        let failures = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        if failures.contains(&point) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Injected failure at {:?}", point),
            ));
        }
        Ok(())
    }

    // === Test Helpers ===

    /// Makes every call of `point` fail until cleared.
    pub fn fail_on(&self, point: FailPoint) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(point);
    }

    pub fn clear_failures(&self) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Seeds a work item owned by the surrounding CRUD backend.
    pub fn insert_work_item(&self, summary: WorkItemSummary, assignees: AssigneeSet) {
        self.state().work_items.insert(summary.id, (summary, assignees));
    }

    /// Seeds an account directly, bypassing onboarding.
    pub fn insert_account_unchecked(&self, account: Account) {
        self.state().accounts.insert(account.id, account);
    }

    /// Seeds a vendor profile directly, bypassing onboarding.
    pub fn insert_profile_unchecked(&self, profile: VendorProfile) {
        self.state().profiles.insert(profile.id, profile);
    }

    pub fn invitation(&self, code: &InvitationCode) -> Option<Invitation> {
        self.state().invitations.get(code).cloned()
    }

    pub fn assignees(&self, id: &WorkItemId) -> Option<AssigneeSet> {
        self.state().work_items.get(id).map(|(_, a)| a.clone())
    }

    pub fn account_count(&self) -> usize {
        self.state().accounts.len()
    }

    pub fn profile_count(&self) -> usize {
        self.state().profiles.len()
    }

    pub fn document_count(&self) -> usize {
        self.state().documents.len()
    }

    pub fn outbox_entries(&self) -> Vec<OutboxEntry> {
        self.state().outbox.clone()
    }

    pub fn pending_intents(&self) -> Vec<NotificationIntent> {
        self.state()
            .outbox
            .iter()
            .filter(|e| e.status == OutboxStatus::Pending)
            .map(|e| e.intent.clone())
            .collect()
    }
}

#[async_trait]
impl InvitationRepository for InMemoryStore {
    async fn insert(
        &self,
        invitation: &Invitation,
        intents: &[NotificationIntent],
    ) -> Result<InsertOutcome, DomainError> {
        self.check(FailPoint::InsertInvitation)?;
        let mut state = self.state();

        if state.invitations.contains_key(invitation.code()) {
            return Ok(InsertOutcome::CodeCollision);
        }

        let issued_at = invitation.lifecycle().created_at;
        let active_exists = state
            .invitations
            .values()
            .any(|i| i.email().matches(invitation.email()) && i.lifecycle().is_active_at(issued_at));
        if active_exists {
            return Ok(InsertOutcome::ActiveInvitationExists);
        }

        state
            .invitations
            .insert(invitation.code().clone(), invitation.clone());
        state.append_intents(intents);
        Ok(InsertOutcome::Inserted)
    }

    async fn find_by_code(&self, code: &InvitationCode) -> Result<Option<Invitation>, DomainError> {
        Ok(self.state().invitations.get(code).cloned())
    }

    async fn find_active_for_email(
        &self,
        email: &EmailAddress,
        now: Timestamp,
    ) -> Result<Option<Invitation>, DomainError> {
        Ok(self
            .state()
            .invitations
            .values()
            .find(|i| i.email().matches(email) && i.lifecycle().is_active_at(now))
            .cloned())
    }

    async fn has_consumed_for_email(&self, email: &EmailAddress) -> Result<bool, DomainError> {
        Ok(self
            .state()
            .invitations
            .values()
            .any(|i| i.email().matches(email) && i.lifecycle().state == InvitationState::Consumed))
    }

    async fn consume_if_pending(
        &self,
        code: &InvitationCode,
        account_id: AccountId,
        now: Timestamp,
        intents: &[NotificationIntent],
    ) -> Result<ConsumeOutcome, DomainError> {
        self.check(FailPoint::ConsumeInvitation)?;
        let mut state = self.state();

        let invitation = match state.invitations.get_mut(code) {
            Some(invitation) => invitation,
            None => return Ok(ConsumeOutcome::NotFound),
        };
        if invitation.lifecycle().is_expired_at(now) {
            return Ok(ConsumeOutcome::Expired);
        }
        if invitation.lifecycle().state != InvitationState::Pending {
            return Ok(ConsumeOutcome::AlreadyConsumed);
        }

        invitation
            .lifecycle_mut()
            .consume(account_id, now)
            .map_err(DomainError::from)?;
        let consumed = invitation.clone();
        state.append_intents(intents);
        Ok(ConsumeOutcome::Consumed(consumed))
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn insert(&self, account: &Account) -> Result<(), DomainError> {
        self.check(FailPoint::InsertAccount)?;
        let mut state = self.state();

        let taken = state.accounts.values().any(|a| {
            a.email.matches(&account.email) || a.username.eq_ignore_ascii_case(&account.username)
        });
        if taken {
            return Err(DomainError::new(
                ErrorCode::UserAlreadyExists,
                "An account with this email or username already exists",
            )
            .with_detail("email", account.email.normalized()));
        }

        state.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        Ok(self.state().accounts.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, DomainError> {
        Ok(self
            .state()
            .accounts
            .values()
            .find(|a| a.email.matches(email))
            .cloned())
    }

    async fn delete(&self, id: &AccountId) -> Result<(), DomainError> {
        self.check(FailPoint::DeleteAccount)?;
        self.state().accounts.remove(id);
        Ok(())
    }
}

#[async_trait]
impl VendorProfileRepository for InMemoryStore {
    async fn insert(&self, profile: &VendorProfile) -> Result<(), DomainError> {
        self.check(FailPoint::InsertProfile)?;
        self.state().profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &VendorProfileId) -> Result<Option<VendorProfile>, DomainError> {
        Ok(self.state().profiles.get(id).cloned())
    }

    async fn find_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<VendorProfile>, DomainError> {
        Ok(self
            .state()
            .profiles
            .values()
            .find(|p| p.account_id == *account_id)
            .cloned())
    }

    async fn delete(&self, id: &VendorProfileId) -> Result<(), DomainError> {
        self.check(FailPoint::DeleteProfile)?;
        self.state().profiles.remove(id);
        Ok(())
    }
}

#[async_trait]
impl DocumentRepository for InMemoryStore {
    async fn insert(&self, document: &ComplianceDocument) -> Result<(), DomainError> {
        self.check(FailPoint::InsertDocument)?;
        self.state().documents.insert(document.id, document.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<ComplianceDocument>, DomainError> {
        Ok(self.state().documents.get(id).cloned())
    }

    async fn list_by_vendor(
        &self,
        vendor_id: &VendorProfileId,
    ) -> Result<Vec<ComplianceDocument>, DomainError> {
        let mut documents: Vec<ComplianceDocument> = self
            .state()
            .documents
            .values()
            .filter(|d| d.vendor_id == *vendor_id)
            .cloned()
            .collect();
        documents.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(documents)
    }

    async fn record_review(
        &self,
        document: &ComplianceDocument,
        intents: &[NotificationIntent],
    ) -> Result<ReviewOutcome, DomainError> {
        self.check(FailPoint::RecordReview)?;
        let mut state = self.state();

        let stored = match state.documents.get_mut(&document.id) {
            Some(stored) => stored,
            None => return Ok(ReviewOutcome::NotFound),
        };
        if stored.status != DocumentStatus::Pending {
            return Ok(ReviewOutcome::AlreadyReviewed(stored.status));
        }

        *stored = document.clone();
        state.append_intents(intents);
        Ok(ReviewOutcome::Recorded)
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), DomainError> {
        self.check(FailPoint::DeleteDocument)?;
        self.state().documents.remove(id);
        Ok(())
    }
}

#[async_trait]
impl WorkItemStore for InMemoryStore {
    async fn find_summary(&self, id: &WorkItemId) -> Result<Option<WorkItemSummary>, DomainError> {
        Ok(self.state().work_items.get(id).map(|(s, _)| s.clone()))
    }

    async fn replace_assignees(
        &self,
        id: &WorkItemId,
        assignees: &AssigneeSet,
    ) -> Result<Option<AssigneeSet>, DomainError> {
        self.check(FailPoint::ReplaceAssignees)?;
        Ok(self
            .state()
            .work_items
            .get_mut(id)
            .map(|(_, current)| std::mem::replace(current, assignees.clone())))
    }
}

#[async_trait]
impl NotificationOutbox for InMemoryStore {
    async fn enqueue(&self, intents: &[NotificationIntent]) -> Result<(), DomainError> {
        self.check(FailPoint::Enqueue)?;
        self.state().append_intents(intents);
        Ok(())
    }

    async fn claim_pending(&self, limit: u32) -> Result<Vec<OutboxEntry>, DomainError> {
        self.check(FailPoint::ClaimPending)?;
        let now = *self.clock.now().as_datetime();
        let mut state = self.state();

        let mut pending: Vec<&mut OutboxEntry> = state
            .outbox
            .iter_mut()
            .filter(|e| e.status == OutboxStatus::Pending)
            .collect();
        pending.sort_by_key(|e| e.created_at);

        Ok(pending
            .into_iter()
            .take(limit as usize)
            .map(|entry| {
                entry.mark_claimed(now);
                entry.clone()
            })
            .collect())
    }

    async fn mark_sent(&self, id: Uuid) -> Result<(), DomainError> {
        let now = *self.clock.now().as_datetime();
        let mut state = self.state();
        let entry = state
            .outbox
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| outbox_entry_not_found(id))?;
        entry.mark_sent(now);
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), DomainError> {
        let now = *self.clock.now().as_datetime();
        let mut state = self.state();
        let entry = state
            .outbox
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| outbox_entry_not_found(id))?;
        entry.mark_failed(error, now);
        Ok(())
    }

    async fn cleanup_old(&self, older_than_hours: u32) -> Result<OutboxCleanup, DomainError> {
        let now = *self.clock.now().as_datetime();
        let cutoff = now - Duration::hours(i64::from(older_than_hours));
        let mut state = self.state();

        let before = state.outbox.len();
        state.outbox.retain(|e| !e.is_expired_record(cutoff));
        let removed = (before - state.outbox.len()) as u64;

        let mut abandoned = 0;
        for entry in state
            .outbox
            .iter_mut()
            .filter(|e| e.is_abandoned_claim(cutoff))
        {
            warn!(
                outbox_id = %entry.id,
                kind = entry.intent.kind.name(),
                "Finalizing abandoned outbox claim"
            );
            entry.mark_failed(ABANDONED_CLAIM_ERROR, now);
            abandoned += 1;
        }

        Ok(OutboxCleanup { abandoned, removed })
    }
}

fn outbox_entry_not_found(id: Uuid) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, "Outbox entry not found")
        .with_detail("outbox_id", id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::domain::foundation::Role;
    use crate::domain::invitation::{EmployeeInvitation, InvitationLifecycle};
    use crate::domain::notification::NotificationKind;
    use std::sync::Arc;

    fn invitation(code: &str, email: &str, now: Timestamp) -> Invitation {
        let lifecycle = InvitationLifecycle::issue(
            InvitationCode::try_new(code).unwrap(),
            EmailAddress::try_new(email).unwrap(),
            AccountId::new(),
            now,
            now.add_days(7),
        );
        Invitation::Employee(EmployeeInvitation::new(lifecycle, Role::Employee).unwrap())
    }

    fn intent(now: Timestamp) -> NotificationIntent {
        NotificationIntent::new(
            EmailAddress::try_new("a@b.io").unwrap(),
            "A",
            NotificationKind::VendorAccountCreated {
                company_name: "Acme".to_string(),
                contact_name: "A".to_string(),
                username: "a".to_string(),
            },
            now,
        )
    }

    #[tokio::test]
    async fn insert_detects_code_collision() {
        let store = InMemoryStore::new();
        let now = Timestamp::now();

        let first = InvitationRepository::insert(&store, &invitation("AAAA1111", "a@b.io", now), &[])
            .await
            .unwrap();
        let second = InvitationRepository::insert(&store, &invitation("AAAA1111", "c@d.io", now), &[])
            .await
            .unwrap();

        assert_eq!(first, InsertOutcome::Inserted);
        assert_eq!(second, InsertOutcome::CodeCollision);
    }

    #[tokio::test]
    async fn insert_rechecks_active_invitation_for_email() {
        let store = InMemoryStore::new();
        let now = Timestamp::now();

        InvitationRepository::insert(&store, &invitation("AAAA1111", "a@b.io", now), &[])
            .await
            .unwrap();
        let outcome = InvitationRepository::insert(&store, &invitation("BBBB2222", "A@B.IO", now), &[])
            .await
            .unwrap();

        assert_eq!(outcome, InsertOutcome::ActiveInvitationExists);
    }

    #[tokio::test]
    async fn intents_are_written_with_the_invitation() {
        let store = InMemoryStore::new();
        let now = Timestamp::now();

        InvitationRepository::insert(&store, &invitation("AAAA1111", "a@b.io", now), &[intent(now)])
            .await
            .unwrap();

        assert_eq!(store.pending_intents().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_consume_has_exactly_one_winner() {
        let store = Arc::new(InMemoryStore::new());
        let now = Timestamp::now();
        let code = InvitationCode::try_new("AAAA1111").unwrap();
        InvitationRepository::insert(store.as_ref(), &invitation("AAAA1111", "a@b.io", now), &[])
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let code = code.clone();
            handles.push(tokio::spawn(async move {
                store
                    .consume_if_pending(&code, AccountId::new(), now, &[])
                    .await
                    .unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            match handle.await.unwrap() {
                ConsumeOutcome::Consumed(_) => winners += 1,
                ConsumeOutcome::AlreadyConsumed => {}
                other => panic!("unexpected outcome {:?}", other),
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn consume_after_expiry_reports_expired_and_leaves_state() {
        let store = InMemoryStore::new();
        let now = Timestamp::now();
        let code = InvitationCode::try_new("AAAA1111").unwrap();
        InvitationRepository::insert(&store, &invitation("AAAA1111", "a@b.io", now), &[])
            .await
            .unwrap();

        let outcome = store
            .consume_if_pending(&code, AccountId::new(), now.add_days(8), &[])
            .await
            .unwrap();

        assert_eq!(outcome, ConsumeOutcome::Expired);
        assert_eq!(
            store.invitation(&code).unwrap().lifecycle().state,
            InvitationState::Pending
        );
    }

    #[tokio::test]
    async fn claim_pending_hands_out_each_entry_once() {
        let store = InMemoryStore::new();
        let now = Timestamp::now();
        store.enqueue(&[intent(now), intent(now)]).await.unwrap();

        let first = store.claim_pending(10).await.unwrap();
        let second = store.claim_pending(10).await.unwrap();

        assert_eq!(first.len(), 2);
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn cleanup_removes_only_old_processed_entries() {
        let clock = Arc::new(FixedClock::new(Timestamp::now()));
        let store = InMemoryStore::with_clock(clock.clone());
        let now = clock.now();
        store.enqueue(&[intent(now), intent(now)]).await.unwrap();
        let claimed = store.claim_pending(1).await.unwrap();
        store.mark_sent(claimed[0].id).await.unwrap();

        clock.advance_hours(1);
        assert_eq!(store.cleanup_old(2).await.unwrap(), OutboxCleanup::default());

        clock.advance_hours(2);
        let swept = store.cleanup_old(2).await.unwrap();

        assert_eq!(swept, OutboxCleanup { abandoned: 0, removed: 1 });
        let remaining = store.outbox_entries();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].status, OutboxStatus::Pending);
    }

    #[tokio::test]
    async fn stale_claim_is_failed_then_purged_by_later_sweep() {
        let clock = Arc::new(FixedClock::new(Timestamp::now()));
        let store = InMemoryStore::with_clock(clock.clone());
        store.enqueue(&[intent(clock.now())]).await.unwrap();
        let claimed = store.claim_pending(10).await.unwrap();
        assert_eq!(claimed[0].claimed_at, Some(*clock.now().as_datetime()));

        // Claim younger than the retention window is left alone.
        assert_eq!(store.cleanup_old(1).await.unwrap(), OutboxCleanup::default());
        assert_eq!(store.outbox_entries()[0].status, OutboxStatus::Claimed);

        clock.advance_hours(2);
        let swept = store.cleanup_old(1).await.unwrap();

        assert_eq!(swept, OutboxCleanup { abandoned: 1, removed: 0 });
        let entry = &store.outbox_entries()[0];
        assert_eq!(entry.status, OutboxStatus::Failed);
        assert_eq!(entry.last_error.as_deref(), Some(ABANDONED_CLAIM_ERROR));
        assert!(store.claim_pending(10).await.unwrap().is_empty());

        clock.advance_hours(2);
        let swept = store.cleanup_old(1).await.unwrap();

        assert_eq!(swept, OutboxCleanup { abandoned: 0, removed: 1 });
        assert!(store.outbox_entries().is_empty());
    }

    #[tokio::test]
    async fn injected_failure_surfaces_as_database_error() {
        let store = InMemoryStore::new();
        store.fail_on(FailPoint::Enqueue);

        let err = store.enqueue(&[]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);

        store.clear_failures();
        assert!(store.enqueue(&[]).await.is_ok());
    }
}
