use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{GeneratedNumberStatus, generated_number_entity as generated_entity};

/// 已保存的号码组
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct GeneratedNumberSet {
    pub id: i64,
    pub numbers: Vec<i32>,
    pub draw_round: i32,
    pub status: GeneratedNumberStatus,
    /// 与开奖主号码的交集, 对奖后才有值
    pub matched_numbers: Option<Vec<i32>>,
    pub is_bonus_matched: Option<bool>,
    /// 1-5, 未中奖为 None
    pub winning_rank: Option<i32>,
    pub winning_amount: i64,
    pub created_at: DateTime<Utc>,
    pub checked_at: Option<DateTime<Utc>>,
}

impl From<generated_entity::Model> for GeneratedNumberSet {
    fn from(m: generated_entity::Model) -> Self {
        GeneratedNumberSet {
            id: m.id,
            numbers: m.numbers,
            draw_round: m.draw_round,
            status: m.status,
            matched_numbers: m.matched_numbers,
            is_bonus_matched: m.is_bonus_matched,
            winning_rank: m.winning_rank,
            winning_amount: m.winning_amount,
            created_at: m.created_at.unwrap_or_else(Utc::now),
            checked_at: m.checked_at,
        }
    }
}

/// 保存号码组请求
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SaveGeneratedNumbersRequest {
    pub numbers: Vec<i32>,
    pub draw_round: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GeneratedNumbersQuery {
    /// 返回条数 (默认取配置)
    pub limit: Option<u64>,
}

/// 对奖请求
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckWinningRequest {
    pub draw_round: Option<i32>,
}

/// 单条号码组失败信息
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemError {
    pub id: i64,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckWinningResponse {
    pub draw_round: i32,
    /// 本次由 pending 转为 checked 的条数
    pub checked_count: usize,
    pub errors: Vec<ItemError>,
}

/// 批量对奖 (所有已开奖且有 pending 号码的期)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReconcileResponse {
    pub checked_count: usize,
    pub rounds_checked: Vec<i32>,
    /// 有 pending 号码但尚未开奖的期
    pub rounds_waiting: Vec<i32>,
    pub errors: Vec<ItemError>,
}
