//! AssignmentDiffNotifier - Emails accounts newly added to a work item.
//!
//! Edge-triggered: only `current - previous` is notified. Nothing is
//! remembered between calls, so an account removed and later re-added is
//! notified again. Recipient lookups run concurrently; a failed lookup
//! skips that recipient only.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::assignment::{AssigneeSet, WorkItemSummary};
use crate::domain::foundation::{AccountId, Actor, Timestamp};
use crate::domain::notification::{NotificationIntent, NotificationKind};
use crate::ports::{AccountRepository, NotificationOutbox};

/// Outcome of one diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentNotificationReport {
    /// Accounts an email was queued for.
    pub notified: Vec<AccountId>,
    /// New assignees whose address could not be resolved.
    pub skipped: Vec<AccountId>,
    /// False when the outbox write failed; the assignment still stands.
    pub enqueued: bool,
}

pub struct AssignmentDiffNotifier {
    accounts: Arc<dyn AccountRepository>,
    outbox: Arc<dyn NotificationOutbox>,
}

impl AssignmentDiffNotifier {
    pub fn new(accounts: Arc<dyn AccountRepository>, outbox: Arc<dyn NotificationOutbox>) -> Self {
        Self { accounts, outbox }
    }

    /// Queues one email per newly assigned account. Never fails.
    pub async fn notify(
        &self,
        item: &WorkItemSummary,
        previous: &AssigneeSet,
        current: &AssigneeSet,
        actor: &Actor,
        now: Timestamp,
    ) -> AssignmentNotificationReport {
        let added = current.newly_assigned(previous);
        if added.is_empty() {
            return AssignmentNotificationReport {
                enqueued: true,
                ..Default::default()
            };
        }

        let lookups = added.iter().map(|id| async move {
            let result = self.accounts.find_by_id(id).await;
            (*id, result)
        });

        let mut report = AssignmentNotificationReport::default();
        let mut intents = Vec::with_capacity(added.len());
        for (id, result) in join_all(lookups).await {
            match result {
                Ok(Some(account)) => {
                    intents.push(NotificationIntent::new(
                        account.email.clone(),
                        account.display_name(),
                        NotificationKind::Assigned {
                            item: item.clone(),
                            recipient_role: account.role,
                            assigned_by: actor.display_name.clone(),
                        },
                        now,
                    ));
                    report.notified.push(id);
                }
                Ok(None) => {
                    warn!(
                        account_id = %id,
                        work_item_id = %item.id,
                        "Assignee not found, skipping"
                    );
                    report.skipped.push(id);
                }
                Err(e) => {
                    warn!(
                        account_id = %id,
                        work_item_id = %item.id,
                        error = %e,
                        "Assignee lookup failed, skipping"
                    );
                    report.skipped.push(id);
                }
            }
        }

        report.enqueued = match self.outbox.enqueue(&intents).await {
            Ok(()) => {
                debug!(work_item_id = %item.id, count = intents.len(), "Assignment emails queued");
                true
            }
            Err(e) => {
                warn!(work_item_id = %item.id, error = %e, "Failed to queue assignment emails");
                false
            }
        };
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FailPoint, InMemoryStore};
    use crate::domain::account::{Account, HashedPassword, NewAccount};
    use crate::domain::assignment::WorkItemKind;
    use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode, Role, WorkItemId};
    use crate::domain::invitation::InvitationCode;
    use async_trait::async_trait;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    /// Reads through to the store but errors on lookups of `broken`.
    struct FlakyAccounts {
        store: Arc<InMemoryStore>,
        broken: AccountId,
    }

    #[async_trait]
    impl AccountRepository for FlakyAccounts {
        async fn insert(&self, account: &Account) -> Result<(), DomainError> {
            AccountRepository::insert(self.store.as_ref(), account).await
        }

        async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
            if *id == self.broken {
                return Err(DomainError::new(ErrorCode::DatabaseError, "connection reset"));
            }
            AccountRepository::find_by_id(self.store.as_ref(), id).await
        }

        async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, DomainError> {
            AccountRepository::find_by_email(self.store.as_ref(), email).await
        }

        async fn delete(&self, id: &AccountId) -> Result<(), DomainError> {
            AccountRepository::delete(self.store.as_ref(), id).await
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    fn seed_account(store: &InMemoryStore, email: &str) -> AccountId {
        let account = Account::create(
            NewAccount {
                username: email.to_string(),
                email: EmailAddress::try_new(email).unwrap(),
                password_hash: HashedPassword::new("plain$hash"),
                role: Role::Employee,
                first_name: "Sam".to_string(),
                last_name: "Crew".to_string(),
                onboarding_completed: true,
                invitation_code: InvitationCode::try_new("ABCDEF12").unwrap(),
            },
            Timestamp::now(),
        )
        .unwrap();
        let id = account.id;
        store.insert_account_unchecked(account);
        id
    }

    fn item() -> WorkItemSummary {
        WorkItemSummary::new(WorkItemId::new(), WorkItemKind::Task, "Pour slab")
    }

    fn actor() -> Actor {
        Actor::new(AccountId::new(), Role::Manager, "Max Manager")
    }

    #[tokio::test]
    async fn only_added_assignees_are_notified() {
        let store = Arc::new(InMemoryStore::new());
        let a = seed_account(&store, "a@x.com");
        let b = seed_account(&store, "b@x.com");
        let c = seed_account(&store, "c@x.com");
        let notifier = AssignmentDiffNotifier::new(store.clone(), store.clone());

        let previous: AssigneeSet = [a, b].into_iter().collect();
        let current: AssigneeSet = [a, b, c].into_iter().collect();
        let report = notifier
            .notify(&item(), &previous, &current, &actor(), Timestamp::now())
            .await;

        assert_eq!(report.notified, vec![c]);
        assert!(report.enqueued);
        let intents = store.pending_intents();
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].recipient.as_str(), "c@x.com");
    }

    #[tokio::test]
    async fn unchanged_set_queues_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let a = seed_account(&store, "a@x.com");
        let notifier = AssignmentDiffNotifier::new(store.clone(), store.clone());
        let set: AssigneeSet = [a].into_iter().collect();

        let report = notifier
            .notify(&item(), &set, &set, &actor(), Timestamp::now())
            .await;

        assert!(report.notified.is_empty());
        assert!(store.outbox_entries().is_empty());
    }

    #[tokio::test]
    async fn unknown_account_is_skipped_without_aborting() {
        let store = Arc::new(InMemoryStore::new());
        let known = seed_account(&store, "known@x.com");
        let ghost = AccountId::new();
        let notifier = AssignmentDiffNotifier::new(store.clone(), store.clone());

        let current: AssigneeSet = [known, ghost].into_iter().collect();
        let report = notifier
            .notify(&item(), &AssigneeSet::new(), &current, &actor(), Timestamp::now())
            .await;

        assert_eq!(report.notified, vec![known]);
        assert_eq!(report.skipped, vec![ghost]);
    }

    #[tokio::test]
    async fn failed_lookup_skips_that_assignee_and_queues_the_rest() {
        let store = Arc::new(InMemoryStore::new());
        let a = seed_account(&store, "a@x.com");
        let b = seed_account(&store, "b@x.com");
        let broken = seed_account(&store, "broken@x.com");
        let accounts = Arc::new(FlakyAccounts {
            store: store.clone(),
            broken,
        });
        let notifier = AssignmentDiffNotifier::new(accounts, store.clone());

        let current: AssigneeSet = [a, b, broken].into_iter().collect();
        let report = notifier
            .notify(&item(), &AssigneeSet::new(), &current, &actor(), Timestamp::now())
            .await;

        assert!(report.enqueued);
        assert_eq!(report.skipped, vec![broken]);
        assert_eq!(report.notified.len(), 2);
        assert!(report.notified.contains(&a));
        assert!(report.notified.contains(&b));
        let mut recipients: Vec<String> = store
            .pending_intents()
            .iter()
            .map(|i| i.recipient.as_str().to_string())
            .collect();
        recipients.sort();
        assert_eq!(recipients, vec!["a@x.com", "b@x.com"]);
    }

    #[tokio::test]
    async fn outbox_failure_is_reported_not_raised() {
        let store = Arc::new(InMemoryStore::new());
        let a = seed_account(&store, "a@x.com");
        store.fail_on(FailPoint::Enqueue);
        let notifier = AssignmentDiffNotifier::new(store.clone(), store.clone());

        let current: AssigneeSet = [a].into_iter().collect();
        let report = notifier
            .notify(&item(), &AssigneeSet::new(), &current, &actor(), Timestamp::now())
            .await;

        assert!(!report.enqueued);
        assert_eq!(report.notified, vec![a]);
    }
}
