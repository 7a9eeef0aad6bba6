use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BrandProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BrandProfiles::OrganizationId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BrandProfiles::CompanyName).string().null())
                    .col(ColumnDef::new(BrandProfiles::Description).text().null())
                    .col(ColumnDef::new(BrandProfiles::Audience).text().null())
                    .col(ColumnDef::new(BrandProfiles::Tone).string().null())
                    .col(ColumnDef::new(BrandProfiles::Goals).text().null())
                    .col(ColumnDef::new(BrandProfiles::Themes).text().null())
                    .col(ColumnDef::new(BrandProfiles::Channels).string().null())
                    .col(
                        ColumnDef::new(BrandProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Posts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Posts::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Posts::Text).text().not_null())
                    .col(
                        ColumnDef::new(Posts::Hashtags)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(Posts::ImagePrompt).text().null())
                    .col(ColumnDef::new(Posts::ImageUrl).string().null())
                    .col(
                        ColumnDef::new(Posts::Status)
                            .string_len(16)
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Posts::ScheduledAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Posts::Flagged)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Posts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Posts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(Posts::Status).is_in(["draft", "scheduled", "published"]))
                    .to_owned(),
            )
            .await?;

        // Serves the per-organization listing and the due-post sweep.
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_org_status_scheduled_at")
                    .table(Posts::Table)
                    .col(Posts::OrganizationId)
                    .col(Posts::Status)
                    .col(Posts::ScheduledAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_status_scheduled_at")
                    .table(Posts::Table)
                    .col(Posts::Status)
                    .col(Posts::ScheduledAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UsageRecords::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UsageRecords::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(UsageRecords::Month).date().not_null())
                    .col(
                        ColumnDef::new(UsageRecords::TokensUsed)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UsageRecords::ImagesGenerated)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UsageRecords::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(UsageRecords::OrganizationId)
                            .col(UsageRecords::Month),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UsageRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BrandProfiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BrandProfiles {
    Table,
    OrganizationId,
    CompanyName,
    Description,
    Audience,
    Tone,
    Goals,
    Themes,
    Channels,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    OrganizationId,
    Text,
    Hashtags,
    ImagePrompt,
    ImageUrl,
    Status,
    ScheduledAt,
    Flagged,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UsageRecords {
    Table,
    OrganizationId,
    Month,
    TokensUsed,
    ImagesGenerated,
    UpdatedAt,
}
