//! Sea-ORM entities for the tenancy tables.

pub mod org_members;
pub mod organizations;
pub mod runtime_environments;
