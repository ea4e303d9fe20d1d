//! Vendor profile captured during onboarding.
//!
//! Holds company, contact, insurance, banking and legal details submitted
//! on the onboarding form. Banking numbers are wrapped in `Secret` so they
//! never end up in `Debug` output or logs.

use chrono::NaiveDate;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::foundation::{
    AccountId, EmailAddress, Timestamp, ValidationError, VendorProfileId,
};
use crate::domain::invitation::InvitationCode;

fn required(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(())
}

fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Company information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyDetails {
    pub name: String,
    pub business_type: String,
    /// Employer identification number, `12-3456789` or nine digits.
    pub ein: String,
    pub phone: String,
    pub email: String,
    pub website: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl CompanyDetails {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required("company_name", &self.name)?;
        required("business_type", &self.business_type)?;
        required("phone", &self.phone)?;
        required("address", &self.address)?;
        required("city", &self.city)?;
        required("state", &self.state)?;
        EmailAddress::try_new(&self.email)?;

        let ein = self.ein.trim();
        let valid_ein = (ein.len() == 9 && ein.chars().all(|c| c.is_ascii_digit()))
            || (ein.len() == 10 && ein.as_bytes()[2] == b'-' && digits(ein).len() == 9);
        if !valid_ein {
            return Err(ValidationError::invalid_format(
                "ein",
                "expected nine digits, optionally as XX-XXXXXXX",
            ));
        }

        let zip_digits = digits(&self.zip);
        if !matches!(zip_digits.len(), 5 | 9) || self.zip.trim().len() > 10 {
            return Err(ValidationError::invalid_format(
                "zip",
                "expected a 5 or 9 digit ZIP code",
            ));
        }
        Ok(())
    }
}

/// Primary point of contact at the vendor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryContact {
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
}

impl PrimaryContact {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required("contact_first_name", &self.first_name)?;
        required("contact_last_name", &self.last_name)?;
        required("contact_phone", &self.phone)?;
        EmailAddress::try_new(&self.email).map_err(|e| match e {
            ValidationError::EmptyField { .. } => ValidationError::empty_field("contact_email"),
            _ => ValidationError::invalid_format("contact_email", e.to_string()),
        })?;
        Ok(())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// Liability insurance on file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsuranceDetails {
    pub provider: String,
    pub policy_number: String,
    /// Coverage in whole US dollars.
    pub coverage_amount: u64,
    pub expiry_date: NaiveDate,
}

impl InsuranceDetails {
    /// Coverage must be positive and the policy must not already be lapsed.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        required("insurance_provider", &self.provider)?;
        required("policy_number", &self.policy_number)?;
        if self.coverage_amount == 0 {
            return Err(ValidationError::invalid_format(
                "insurance_amount",
                "coverage must be greater than zero",
            ));
        }
        if self.expiry_date < today {
            return Err(ValidationError::invalid_format(
                "insurance_expiry",
                format!("policy expired on {}", self.expiry_date),
            ));
        }
        Ok(())
    }
}

/// Type of the bank account used for payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankAccountType {
    Checking,
    Savings,
}

impl BankAccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BankAccountType::Checking => "checking",
            BankAccountType::Savings => "savings",
        }
    }
}

impl FromStr for BankAccountType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "checking" => Ok(BankAccountType::Checking),
            "savings" => Ok(BankAccountType::Savings),
            other => Err(ValidationError::invalid_format(
                "account_type",
                format!("unknown account type '{}'", other),
            )),
        }
    }
}

/// Payment details. Numbers stay secret outside of persistence.
#[derive(Debug, Clone)]
pub struct BankingDetails {
    pub bank_name: String,
    pub account_type: BankAccountType,
    pub routing_number: Secret<String>,
    pub account_number: Secret<String>,
}

impl BankingDetails {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required("bank_name", &self.bank_name)?;

        let routing = self.routing_number.expose_secret().trim();
        if routing.len() != 9 || !routing.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                "routing_number",
                "must be exactly 9 digits",
            ));
        }

        let account = self.account_number.expose_secret().trim();
        if !(4..=17).contains(&account.len()) || !account.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                "account_number",
                "must be 4 to 17 digits",
            ));
        }
        Ok(())
    }

    /// Last four digits of the account number, for display.
    pub fn account_last4(&self) -> String {
        let account = self.account_number.expose_secret().trim();
        let skip = account.len().saturating_sub(4);
        account.chars().skip(skip).collect()
    }
}

/// Agreements accepted on the legal step of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalAcceptance {
    pub nda_accepted: bool,
    pub terms_accepted: bool,
    /// Typed signature.
    pub signature: String,
}

impl LegalAcceptance {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.nda_accepted {
            return Err(ValidationError::invalid_format(
                "nda_accepted",
                "the non-disclosure agreement must be accepted",
            ));
        }
        if !self.terms_accepted {
            return Err(ValidationError::invalid_format(
                "terms_accepted",
                "the terms and conditions must be accepted",
            ));
        }
        required("signature", &self.signature)
    }
}

/// A vendor company linked to its portal account.
#[derive(Debug, Clone)]
pub struct VendorProfile {
    pub id: VendorProfileId,
    pub account_id: AccountId,
    pub invitation_code: InvitationCode,
    pub company: CompanyDetails,
    pub contact: PrimaryContact,
    pub insurance: InsuranceDetails,
    pub banking: BankingDetails,
    pub legal: LegalAcceptance,
    pub created_at: Timestamp,
}

impl VendorProfile {
    pub fn company_name(&self) -> &str {
        self.company.name.trim()
    }
}
