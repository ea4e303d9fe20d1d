//! PostgreSQL implementation of VendorProfileRepository.
//!
//! Company, contact, insurance, banking and legal sections are flattened
//! into one row per vendor.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use secrecy::{ExposeSecret, Secret};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::account::{
    BankAccountType, BankingDetails, CompanyDetails, InsuranceDetails, LegalAcceptance,
    PrimaryContact, VendorProfile,
};
use crate::domain::foundation::{AccountId, DomainError, ErrorCode, Timestamp, VendorProfileId};
use crate::domain::invitation::InvitationCode;
use crate::ports::VendorProfileRepository;

const PROFILE_COLUMNS: &str = "id, account_id, invitation_code, \
     company_name, business_type, ein, company_phone, company_email, website, \
     address, city, state, zip, \
     contact_first_name, contact_last_name, contact_title, contact_email, contact_phone, \
     insurance_provider, policy_number, coverage_amount, insurance_expiry, \
     bank_name, bank_account_type, routing_number, account_number, \
     nda_accepted, terms_accepted, signature, created_at";

/// PostgreSQL implementation of the VendorProfileRepository port.
#[derive(Clone)]
pub struct PostgresVendorProfileRepository {
    pool: PgPool,
}

impl PostgresVendorProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct VendorProfileRow {
    id: Uuid,
    account_id: Uuid,
    invitation_code: String,
    company_name: String,
    business_type: String,
    ein: String,
    company_phone: String,
    company_email: String,
    website: Option<String>,
    address: String,
    city: String,
    state: String,
    zip: String,
    contact_first_name: String,
    contact_last_name: String,
    contact_title: String,
    contact_email: String,
    contact_phone: String,
    insurance_provider: String,
    policy_number: String,
    coverage_amount: i64,
    insurance_expiry: NaiveDate,
    bank_name: String,
    bank_account_type: String,
    routing_number: String,
    account_number: String,
    nda_accepted: bool,
    terms_accepted: bool,
    signature: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<VendorProfileRow> for VendorProfile {
    type Error = DomainError;

    fn try_from(row: VendorProfileRow) -> Result<Self, Self::Error> {
        let invitation_code = InvitationCode::try_new(&row.invitation_code).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid invitation_code: {}", e))
        })?;
        let account_type = row.bank_account_type.parse::<BankAccountType>().map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid bank_account_type: {}", e))
        })?;
        let coverage_amount = u64::try_from(row.coverage_amount).map_err(|_| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid coverage_amount: {}", row.coverage_amount),
            )
        })?;

        Ok(VendorProfile {
            id: VendorProfileId::from_uuid(row.id),
            account_id: AccountId::from_uuid(row.account_id),
            invitation_code,
            company: CompanyDetails {
                name: row.company_name,
                business_type: row.business_type,
                ein: row.ein,
                phone: row.company_phone,
                email: row.company_email,
                website: row.website,
                address: row.address,
                city: row.city,
                state: row.state,
                zip: row.zip,
            },
            contact: PrimaryContact {
                first_name: row.contact_first_name,
                last_name: row.contact_last_name,
                title: row.contact_title,
                email: row.contact_email,
                phone: row.contact_phone,
            },
            insurance: InsuranceDetails {
                provider: row.insurance_provider,
                policy_number: row.policy_number,
                coverage_amount,
                expiry_date: row.insurance_expiry,
            },
            banking: BankingDetails {
                bank_name: row.bank_name,
                account_type,
                routing_number: Secret::new(row.routing_number),
                account_number: Secret::new(row.account_number),
            },
            legal: LegalAcceptance {
                nda_accepted: row.nda_accepted,
                terms_accepted: row.terms_accepted,
                signature: row.signature,
            },
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl VendorProfileRepository for PostgresVendorProfileRepository {
    async fn insert(&self, profile: &VendorProfile) -> Result<(), DomainError> {
        let coverage_amount = i64::try_from(profile.insurance.coverage_amount).map_err(|_| {
            DomainError::new(ErrorCode::ValidationFailed, "Coverage amount is too large")
                .with_detail("field", "insurance_amount")
        })?;

        sqlx::query(&format!(
            "INSERT INTO vendor_profiles ({}) VALUES (\
             $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
             $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30)",
            PROFILE_COLUMNS
        ))
        .bind(profile.id.as_uuid())
        .bind(profile.account_id.as_uuid())
        .bind(profile.invitation_code.as_str())
        .bind(&profile.company.name)
        .bind(&profile.company.business_type)
        .bind(&profile.company.ein)
        .bind(&profile.company.phone)
        .bind(&profile.company.email)
        .bind(&profile.company.website)
        .bind(&profile.company.address)
        .bind(&profile.company.city)
        .bind(&profile.company.state)
        .bind(&profile.company.zip)
        .bind(&profile.contact.first_name)
        .bind(&profile.contact.last_name)
        .bind(&profile.contact.title)
        .bind(&profile.contact.email)
        .bind(&profile.contact.phone)
        .bind(&profile.insurance.provider)
        .bind(&profile.insurance.policy_number)
        .bind(coverage_amount)
        .bind(profile.insurance.expiry_date)
        .bind(&profile.banking.bank_name)
        .bind(profile.banking.account_type.as_str())
        .bind(profile.banking.routing_number.expose_secret())
        .bind(profile.banking.account_number.expose_secret())
        .bind(profile.legal.nda_accepted)
        .bind(profile.legal.terms_accepted)
        .bind(&profile.legal.signature)
        .bind(profile.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert vendor profile: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &VendorProfileId) -> Result<Option<VendorProfile>, DomainError> {
        let row: Option<VendorProfileRow> = sqlx::query_as(&format!(
            "SELECT {} FROM vendor_profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(DomainError::database)?;

        row.map(VendorProfile::try_from).transpose()
    }

    async fn find_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<VendorProfile>, DomainError> {
        let row: Option<VendorProfileRow> = sqlx::query_as(&format!(
            "SELECT {} FROM vendor_profiles WHERE account_id = $1",
            PROFILE_COLUMNS
        ))
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(DomainError::database)?;

        row.map(VendorProfile::try_from).transpose()
    }

    async fn delete(&self, id: &VendorProfileId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM vendor_profiles WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::database(format!("Failed to delete vendor profile: {}", e))
            })?;

        Ok(())
    }
}
