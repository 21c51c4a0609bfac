use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::recommendation_history_entity as history_entity;

/// 持久化的一期推荐
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecommendationRecord {
    pub id: i64,
    pub round: i32,
    pub date: NaiveDate,
    pub recommended_pair: Vec<i32>,
    pub excluded_numbers: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<history_entity::Model> for RecommendationRecord {
    fn from(m: history_entity::Model) -> Self {
        let created_at = m.created_at.unwrap_or_else(Utc::now);
        RecommendationRecord {
            id: m.id,
            round: m.round,
            date: m.draw_date,
            recommended_pair: m.recommended_pair,
            excluded_numbers: m.excluded_numbers,
            created_at,
            updated_at: m.updated_at.unwrap_or(created_at),
        }
    }
}

/// 待写入的推荐内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationDraft {
    pub round: i32,
    pub date: NaiveDate,
    pub recommended_pair: Vec<i32>,
    pub excluded_numbers: Vec<i32>,
}

/// 下一期推荐响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecommendationResponse {
    /// 共现次数最高的号码对
    pub recommended_pair: Vec<i32>,
    /// 排除号码 (冷号 + 近期热号, 最多 6 个)
    pub excluded_numbers: Vec<i32>,
    /// 补全后的 6 个候选号码
    pub final_numbers: Vec<i32>,
    /// 推荐所针对的期号 (最新期号 + 1)
    pub next_draw_round: i32,
}

/// 历史回填查询参数
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BackfillQuery {
    /// 回填最近多少期 (默认取配置)
    pub window_size: Option<usize>,
}

/// 单期失败信息
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoundError {
    pub round: i32,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BackfillResponse {
    /// 本次写入的期号 (按处理顺序, 新 -> 旧)
    pub processed_rounds: Vec<i32>,
    /// 已有记录而跳过的期数
    pub skipped_count: usize,
    pub errors: Vec<RoundError>,
}

/// 手动修正某期推荐
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRecommendationRequest {
    pub recommended_pair: Option<Vec<i32>>,
    pub excluded_numbers: Option<Vec<i32>>,
}

/// 推荐历史查询参数
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecommendationHistoryQuery {
    /// 返回条数 (默认取配置)
    pub limit: Option<u64>,
}

/// 推荐历史 + 命中统计
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecommendationHistoryEntry {
    pub round: i32,
    pub date: NaiveDate,
    pub recommended_pair: Vec<i32>,
    pub excluded_numbers: Vec<i32>,
    /// 当期主号码, 尚未开奖时为空
    pub winning_numbers: Vec<i32>,
    pub bonus_number: Option<i32>,
    /// 推荐号码命中个数 (含奖号)
    pub recommend_hits: usize,
    /// 排除号码却开出的个数 (含奖号)
    pub exclude_failures: usize,
    /// 是否为无历史数据时生成的示例行
    pub synthetic: bool,
}

impl RecommendationHistoryEntry {
    /// 无开奖数据时的空统计
    pub fn without_result(record: &RecommendationRecord) -> Self {
        Self {
            round: record.round,
            date: record.date,
            recommended_pair: record.recommended_pair.clone(),
            excluded_numbers: record.excluded_numbers.clone(),
            winning_numbers: Vec::new(),
            bonus_number: None,
            recommend_hits: 0,
            exclude_failures: 0,
            synthetic: false,
        }
    }
}
