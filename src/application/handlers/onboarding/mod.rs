//! Onboarding handlers - Redeem an invitation into a portal account.

mod complete_vendor_onboarding;
mod register_employee;

pub use complete_vendor_onboarding::{
    CompleteVendorOnboardingCommand, CompleteVendorOnboardingHandler,
    CompleteVendorOnboardingResult, DocumentUpload,
};
pub use register_employee::{
    RegisterEmployeeCommand, RegisterEmployeeHandler, RegisterEmployeeResult,
};
