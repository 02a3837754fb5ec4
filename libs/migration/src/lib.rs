pub use sea_orm_migration::prelude::*;

mod m20260901_000000_bootstrap;
mod m20260901_000001_create_environments;
mod m20260901_000002_create_event_records;
mod m20260901_000003_create_trigger_registrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260901_000000_bootstrap::Migration),
            Box::new(m20260901_000001_create_environments::Migration),
            Box::new(m20260901_000002_create_event_records::Migration),
            Box::new(m20260901_000003_create_trigger_registrations::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 4);
    }
}
