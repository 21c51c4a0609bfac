use chrono::Local;

use crate::engine::{analyze_history, synthetic_history};
use crate::error::AppResult;
use crate::models::RecommendationHistoryEntry;
use crate::repository::SharedRepository;

/// 单次查询的最大条数
pub const MAX_HISTORY_LIMIT: u64 = 500;

#[derive(Clone)]
pub struct HistoryService {
    repo: SharedRepository,
    default_limit: u64,
}

impl HistoryService {
    pub fn new(repo: SharedRepository, default_limit: u64) -> Self {
        Self {
            repo,
            default_limit,
        }
    }

    /// 推荐历史 + 命中统计。
    ///
    /// 推荐记录为空或无法读取时返回示例数据, 不向调用方报错;
    /// 开奖结果无法读取时各行统计为 0。示例数据最多 `default_limit` 行。
    pub async fn get_history(&self, limit: Option<u64>) -> AppResult<Vec<RecommendationHistoryEntry>> {
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(self.default_limit)
            .min(MAX_HISTORY_LIMIT);

        let records = match self.repo.list_recommendations(limit).await {
            Ok(records) if !records.is_empty() => records,
            Ok(_) => {
                log::warn!("Recommendation history is empty, serving synthetic rows");
                return Ok(self.synthetic(limit));
            }
            Err(e) => {
                log::warn!("Recommendation history unavailable ({}), serving synthetic rows", e);
                return Ok(self.synthetic(limit));
            }
        };

        let rounds: Vec<i32> = records.iter().map(|r| r.round).collect();
        match self.repo.find_draws(&rounds).await {
            Ok(results) => Ok(analyze_history(&records, &results)),
            Err(e) => {
                log::warn!("Draw results unavailable for history ({}), hits left empty", e);
                Ok(records
                    .iter()
                    .map(RecommendationHistoryEntry::without_result)
                    .collect())
            }
        }
    }

    fn synthetic(&self, limit: u64) -> Vec<RecommendationHistoryEntry> {
        let rows = limit.min(self.default_limit) as usize;
        let mut rng = rand::thread_rng();
        synthetic_history(Local::now().date_naive(), rows, &mut rng)
    }
}
