//! Sea-ORM entities for endpoints, dynamic triggers and their registrations.

pub mod dynamic_triggers;
pub mod endpoints;
pub mod trigger_registrations;
