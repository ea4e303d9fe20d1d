//! Portal Onboarding - Invitation-gated onboarding and document approval.
//!
//! Admins and managers invite employees and vendors by email. Invitees
//! redeem a single-use code to create their account; vendors also submit a
//! company profile and compliance documents that admins approve or reject.
//! Notifications go through a transactional outbox and are delivered by a
//! separate relay.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
