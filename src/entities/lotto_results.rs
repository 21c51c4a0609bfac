use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 官方开奖结果实体
/// 说明:
/// - numbers 为抓取端写入的逗号分隔字符串, 读取时由仓储层解析为 DrawRecord
/// - *_prize_amount 为各奖级公布的单注奖金, 未知为 0
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "lotto_results")]
pub struct Model {
    /// 期号
    #[sea_orm(primary_key, auto_increment = false)]
    pub round: i32,
    pub draw_date: NaiveDate,
    pub numbers: String,
    pub bonus: i32,
    pub first_prize_amount: i64,
    pub second_prize_amount: i64,
    pub third_prize_amount: i64,
    pub fourth_prize_amount: i64,
    pub fifth_prize_amount: i64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
