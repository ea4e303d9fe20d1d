//! Domain layer - Pure business logic with no infrastructure dependencies.

pub mod account;
pub mod assignment;
pub mod compliance;
pub mod foundation;
pub mod invitation;
pub mod notification;
