//! Vendor profile repository port.

use async_trait::async_trait;

use crate::domain::account::VendorProfile;
use crate::domain::foundation::{AccountId, DomainError, VendorProfileId};

#[async_trait]
pub trait VendorProfileRepository: Send + Sync {
    async fn insert(&self, profile: &VendorProfile) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &VendorProfileId) -> Result<Option<VendorProfile>, DomainError>;

    async fn find_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<VendorProfile>, DomainError>;

    /// Removes a profile. Used only to compensate a failed onboarding.
    async fn delete(&self, id: &VendorProfileId) -> Result<(), DomainError>;
}
