use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 号码组对奖状态, pending -> checked 单向流转
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "generated_number_status"
)]
#[serde(rename_all = "snake_case")]
pub enum GeneratedNumberStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "checked")]
    Checked,
}

impl std::fmt::Display for GeneratedNumberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratedNumberStatus::Pending => write!(f, "pending"),
            GeneratedNumberStatus::Checked => write!(f, "checked"),
        }
    }
}

/// 已保存号码组实体
/// - matched_numbers / is_bonus_matched / winning_rank 仅在 checked 后有值
/// - winning_amount 未中奖为 0
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "generated_numbers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub numbers: Vec<i32>,
    pub draw_round: i32,
    pub status: GeneratedNumberStatus,
    pub matched_numbers: Option<Vec<i32>>,
    pub is_bonus_matched: Option<bool>,
    pub winning_rank: Option<i32>,
    pub winning_amount: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub checked_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
