use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sites::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sites::Url).string().not_null().unique_key())
                    .col(ColumnDef::new(Sites::Title).string().not_null())
                    .col(
                        ColumnDef::new(Sites::Tags)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Sites::Content).text().not_null())
                    .col(ColumnDef::new(Sites::SavedPath).string().not_null())
                    .col(ColumnDef::new(Sites::CreatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Search results are always read newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_sites_created_at")
                    .table(Sites::Table)
                    .col(Sites::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sites::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Sites {
    Table,
    Id,
    Url,
    Title,
    Tags,
    Content,
    SavedPath,
    CreatedAt,
}
