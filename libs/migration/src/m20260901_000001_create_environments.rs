use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(RuntimeEnvironmentType::Enum)
                    .values(RuntimeEnvironmentType::values())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Organizations::Table)
                    .if_not_exists()
                    .col(pk_uuid(Organizations::Id))
                    .col(string_uniq(Organizations::Slug))
                    .col(string(Organizations::Title))
                    .col(
                        timestamp_with_time_zone(Organizations::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Organizations::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrgMembers::Table)
                    .if_not_exists()
                    .col(pk_uuid(OrgMembers::Id))
                    .col(uuid(OrgMembers::OrganizationId))
                    .col(uuid(OrgMembers::UserId))
                    .col(
                        timestamp_with_time_zone(OrgMembers::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_members_organization")
                            .from(OrgMembers::Table, OrgMembers::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RuntimeEnvironments::Table)
                    .if_not_exists()
                    .col(pk_uuid(RuntimeEnvironments::Id))
                    .col(string(RuntimeEnvironments::Slug))
                    // Credential lookup is a point query on this index
                    .col(string_uniq(RuntimeEnvironments::ApiKey))
                    .col(
                        ColumnDef::new(RuntimeEnvironments::Type)
                            .enumeration(
                                RuntimeEnvironmentType::Enum,
                                RuntimeEnvironmentType::values(),
                            )
                            .not_null()
                            .default("DEVELOPMENT"),
                    )
                    .col(uuid(RuntimeEnvironments::OrganizationId))
                    .col(uuid(RuntimeEnvironments::ProjectId))
                    .col(uuid_null(RuntimeEnvironments::OrgMemberId))
                    .col(
                        timestamp_with_time_zone(RuntimeEnvironments::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(RuntimeEnvironments::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_runtime_environments_organization")
                            .from(RuntimeEnvironments::Table, RuntimeEnvironments::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_runtime_environments_org_member")
                            .from(RuntimeEnvironments::Table, RuntimeEnvironments::OrgMemberId)
                            .to(OrgMembers::Table, OrgMembers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_runtime_environments_project_slug")
                    .table(RuntimeEnvironments::Table)
                    .col(RuntimeEnvironments::ProjectId)
                    .col(RuntimeEnvironments::Slug)
                    .col(RuntimeEnvironments::OrgMemberId)
                    .to_owned(),
            )
            .await?;

        let db = manager.get_connection();
        for table in ["organizations", "runtime_environments"] {
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
            .drop_table(Table::drop().table(RuntimeEnvironments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrgMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Organizations::Table).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(RuntimeEnvironmentType::Enum).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Organizations {
    Table,
    Id,
    Slug,
    Title,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OrgMembers {
    Table,
    Id,
    OrganizationId,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RuntimeEnvironments {
    Table,
    Id,
    Slug,
    ApiKey,
    Type,
    OrganizationId,
    ProjectId,
    OrgMemberId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum RuntimeEnvironmentType {
    #[sea_orm(iden = "runtime_environment_type")]
    Enum,
    #[sea_orm(iden = "PRODUCTION")]
    Production,
    #[sea_orm(iden = "STAGING")]
    Staging,
    #[sea_orm(iden = "DEVELOPMENT")]
    Development,
    #[sea_orm(iden = "PREVIEW")]
    Preview,
}

impl RuntimeEnvironmentType {
    fn values() -> [Self; 4] {
        [Self::Production, Self::Staging, Self::Development, Self::Preview]
    }
}
