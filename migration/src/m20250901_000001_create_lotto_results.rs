use sea_orm_migration::prelude::*;

/// 官方开奖结果表 (由抓取端写入, 本服务只读/补录)
#[derive(DeriveIden)]
enum LottoResults {
    Table,
    Round,
    DrawDate,
    Numbers,
    Bonus,
    FirstPrizeAmount,
    SecondPrizeAmount,
    ThirdPrizeAmount,
    FourthPrizeAmount,
    FifthPrizeAmount,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// numbers 以逗号分隔字符串保存 (例如 "3,11,22,28,35,41"),
/// 与抓取端写入格式保持一致, 读取时在仓储层统一解析。
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LottoResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LottoResults::Round)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LottoResults::DrawDate).date().not_null())
                    .col(ColumnDef::new(LottoResults::Numbers).string_len(32).not_null())
                    .col(ColumnDef::new(LottoResults::Bonus).integer().not_null())
                    .col(
                        ColumnDef::new(LottoResults::FirstPrizeAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LottoResults::SecondPrizeAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LottoResults::ThirdPrizeAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LottoResults::FourthPrizeAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LottoResults::FifthPrizeAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LottoResults::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lotto_results_draw_date")
                    .table(LottoResults::Table)
                    .col(LottoResults::DrawDate)
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
                    .table(LottoResults::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
