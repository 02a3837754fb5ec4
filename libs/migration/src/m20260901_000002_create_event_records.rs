use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventRecords::Table)
                    .if_not_exists()
                    .col(pk_uuid(EventRecords::Id))
                    .col(string(EventRecords::EventId))
                    .col(string(EventRecords::Name))
                    .col(json_binary(EventRecords::Payload))
                    .col(json_binary_null(EventRecords::Context))
                    .col(string(EventRecords::Source).default("api"))
                    .col(timestamp_with_time_zone(EventRecords::Timestamp))
                    .col(timestamp_with_time_zone(EventRecords::DeliverAt))
                    .col(timestamp_with_time_zone_null(EventRecords::DeliveredAt))
                    .col(timestamp_with_time_zone_null(EventRecords::CancelledAt))
                    .col(string_null(EventRecords::ExternalAccountId))
                    .col(uuid(EventRecords::EnvironmentId))
                    .col(uuid(EventRecords::OrganizationId))
                    .col(
                        timestamp_with_time_zone(EventRecords::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_records_environment")
                            .from(EventRecords::Table, EventRecords::EnvironmentId)
                            .to(RuntimeEnvironments::Table, RuntimeEnvironments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Idempotency key: a caller-supplied event id is accepted once per environment
        manager
            .create_index(
                Index::create()
                    .name("uq_event_records_event_environment")
                    .table(EventRecords::Table)
                    .col(EventRecords::EventId)
                    .col(EventRecords::EnvironmentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_records_pending_delivery")
                    .table(EventRecords::Table)
                    .col(EventRecords::DeliverAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EventRecords {
    Table,
    Id,
    EventId,
    Name,
    Payload,
    Context,
    Source,
    Timestamp,
    DeliverAt,
    DeliveredAt,
    CancelledAt,
    ExternalAccountId,
    EnvironmentId,
    OrganizationId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RuntimeEnvironments {
    Table,
    Id,
}
