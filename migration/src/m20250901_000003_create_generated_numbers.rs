use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

/// 用户/引擎保存的号码组
#[derive(DeriveIden)]
enum GeneratedNumbers {
    Table,
    Id,
    Numbers,
    DrawRound,
    Status,
    MatchedNumbers,
    IsBonusMatched,
    WinningRank,
    WinningAmount,
    CreatedAt,
    CheckedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("generated_number_status"))
                    .values(vec![Alias::new("pending"), Alias::new("checked")])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GeneratedNumbers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GeneratedNumbers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GeneratedNumbers::Numbers)
                            .array(ColumnType::Integer)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedNumbers::DrawRound)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedNumbers::Status)
                            .custom(Alias::new("generated_number_status"))
                            .not_null()
                            .default(Expr::cust("'pending'")),
                    )
                    // 以下字段仅在对奖后填充
                    .col(ColumnDef::new(GeneratedNumbers::MatchedNumbers).array(ColumnType::Integer))
                    .col(ColumnDef::new(GeneratedNumbers::IsBonusMatched).boolean())
                    .col(ColumnDef::new(GeneratedNumbers::WinningRank).integer())
                    .col(
                        ColumnDef::new(GeneratedNumbers::WinningAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GeneratedNumbers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(ColumnDef::new(GeneratedNumbers::CheckedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_generated_numbers_round_status")
                    .table(GeneratedNumbers::Table)
                    .col(GeneratedNumbers::DrawRound)
                    .col(GeneratedNumbers::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(GeneratedNumbers::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_type(
                Type::drop()
                    .if_exists()
                    .name(Alias::new("generated_number_status"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
