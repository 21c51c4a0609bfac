use sea_orm_migration::prelude::*;

/// 每期推荐记录 (一期一条)
#[derive(DeriveIden)]
enum RecommendationHistory {
    Table,
    Id,
    Round,
    DrawDate,
    RecommendedPair,
    ExcludedNumbers,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RecommendationHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecommendationHistory::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RecommendationHistory::Round)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecommendationHistory::DrawDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecommendationHistory::RecommendedPair)
                            .array(ColumnType::Integer)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecommendationHistory::ExcludedNumbers)
                            .array(ColumnType::Integer)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecommendationHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(RecommendationHistory::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // round 唯一: 同一期最多一条推荐, 并发写入由数据库裁决
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_recommendation_history_round_unique")
                    .table(RecommendationHistory::Table)
                    .col(RecommendationHistory::Round)
                    .unique()
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
                    .table(RecommendationHistory::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
