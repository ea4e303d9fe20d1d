//! Account domain - Portal logins and vendor company profiles.

mod account;
mod password;
mod vendor_profile;

pub use account::{Account, NewAccount};
pub use password::{validate_password, HashedPassword, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
pub use vendor_profile::{
    BankAccountType, BankingDetails, CompanyDetails, InsuranceDetails, LegalAcceptance,
    PrimaryContact, VendorProfile,
};
