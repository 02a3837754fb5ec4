use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Endpoints::Table)
                    .if_not_exists()
                    .col(pk_uuid(Endpoints::Id))
                    .col(string(Endpoints::Slug))
                    .col(string(Endpoints::Url))
                    .col(uuid(Endpoints::EnvironmentId))
                    .col(
                        timestamp_with_time_zone(Endpoints::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Endpoints::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_endpoints_environment")
                            .from(Endpoints::Table, Endpoints::EnvironmentId)
                            .to(RuntimeEnvironments::Table, RuntimeEnvironments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_endpoints_environment_slug")
                    .table(Endpoints::Table)
                    .col(Endpoints::EnvironmentId)
                    .col(Endpoints::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DynamicTriggers::Table)
                    .if_not_exists()
                    .col(pk_uuid(DynamicTriggers::Id))
                    .col(string(DynamicTriggers::Slug))
                    .col(uuid(DynamicTriggers::EndpointId))
                    .col(
                        timestamp_with_time_zone(DynamicTriggers::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dynamic_triggers_endpoint")
                            .from(DynamicTriggers::Table, DynamicTriggers::EndpointId)
                            .to(Endpoints::Table, Endpoints::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_dynamic_triggers_endpoint_slug")
                    .table(DynamicTriggers::Table)
                    .col(DynamicTriggers::EndpointId)
                    .col(DynamicTriggers::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TriggerRegistrations::Table)
                    .if_not_exists()
                    .col(pk_uuid(TriggerRegistrations::Id))
                    .col(uuid(TriggerRegistrations::EnvironmentId))
                    .col(uuid(TriggerRegistrations::EndpointId))
                    .col(uuid(TriggerRegistrations::DynamicTriggerId))
                    .col(string(TriggerRegistrations::Key))
                    .col(json_binary(TriggerRegistrations::Params))
                    .col(string_null(TriggerRegistrations::AccountId))
                    .col(json_binary_null(TriggerRegistrations::Metadata))
                    .col(boolean(TriggerRegistrations::Active).default(true))
                    .col(
                        timestamp_with_time_zone(TriggerRegistrations::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(TriggerRegistrations::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trigger_registrations_environment")
                            .from(TriggerRegistrations::Table, TriggerRegistrations::EnvironmentId)
                            .to(RuntimeEnvironments::Table, RuntimeEnvironments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trigger_registrations_endpoint")
                            .from(TriggerRegistrations::Table, TriggerRegistrations::EndpointId)
                            .to(Endpoints::Table, Endpoints::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trigger_registrations_dynamic_trigger")
                            .from(
                                TriggerRegistrations::Table,
                                TriggerRegistrations::DynamicTriggerId,
                            )
                            .to(DynamicTriggers::Table, DynamicTriggers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Upsert target for create-or-update
        manager
            .create_index(
                Index::create()
                    .name("uq_trigger_registrations_scope")
                    .table(TriggerRegistrations::Table)
                    .col(TriggerRegistrations::EnvironmentId)
                    .col(TriggerRegistrations::EndpointId)
                    .col(TriggerRegistrations::DynamicTriggerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_trigger_registrations_endpoint_key")
                    .table(TriggerRegistrations::Table)
                    .col(TriggerRegistrations::EndpointId)
                    .col(TriggerRegistrations::Key)
                    .unique()
                    .to_owned(),
            )
            .await?;

        let db = manager.get_connection();
        for table in ["endpoints", "trigger_registrations"] {
            db.execute_unprepared(&format!(
                "CREATE TRIGGER {table}_touch_updated_at \
                 BEFORE UPDATE ON {table} \
                 FOR EACH ROW EXECUTE FUNCTION util.touch_updated_at()"
            ))
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TriggerRegistrations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DynamicTriggers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Endpoints::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Endpoints {
    Table,
    Id,
    Slug,
    Url,
    EnvironmentId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DynamicTriggers {
    Table,
    Id,
    Slug,
    EndpointId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TriggerRegistrations {
    Table,
    Id,
    EnvironmentId,
    EndpointId,
    DynamicTriggerId,
    Key,
    Params,
    AccountId,
    Metadata,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RuntimeEnvironments {
    Table,
    Id,
}
