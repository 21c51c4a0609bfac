use crate::engine::RecommendationEngine;
use crate::error::AppResult;
use crate::models::{BackfillResponse, DrawRecord, RoundError};
use crate::repository::SharedRepository;
use crate::services::RecommendationStore;

/// 历史推荐回填: 对最近 N 期逐期重放推荐引擎, 只使用该期之前的开奖数据
#[derive(Clone)]
pub struct BackfillService {
    repo: SharedRepository,
    store: RecommendationStore,
    engine: RecommendationEngine,
    default_window: usize,
}

impl BackfillService {
    pub fn new(repo: SharedRepository, engine: RecommendationEngine, default_window: usize) -> Self {
        let store = RecommendationStore::new(repo.clone());
        Self {
            repo,
            store,
            engine,
            default_window,
        }
    }

    pub async fn backfill(&self, window_size: Option<usize>) -> AppResult<BackfillResponse> {
        let window = window_size.unwrap_or(self.default_window);
        let draws = self.repo.list_draws().await?;
        let existing = self.repo.recommendation_rounds().await?;

        let start = draws.len().saturating_sub(window);
        let mut processed_rounds = Vec::new();
        let mut skipped_count = 0;
        let mut errors = Vec::new();

        // 从最新一期向前处理
        for index in (start..draws.len()).rev() {
            let target = &draws[index];
            if existing.contains(&target.round) {
                skipped_count += 1;
                log::debug!("Round {} already has a recommendation, skipped", target.round);
                continue;
            }

            match self.backfill_round(&draws[..index], target).await {
                Ok(true) => processed_rounds.push(target.round),
                Ok(false) => {
                    skipped_count += 1;
                    log::debug!("Round {} was recorded concurrently, skipped", target.round);
                }
                Err(e) => {
                    log::error!("Backfill failed for round {}: {}", target.round, e);
                    errors.push(RoundError {
                        round: target.round,
                        error: e.to_string(),
                    });
                }
            }
        }

        log::info!(
            "Backfill finished: window {}, processed {}, skipped {}, failed {}",
            window,
            processed_rounds.len(),
            skipped_count,
            errors.len()
        );

        Ok(BackfillResponse {
            processed_rounds,
            skipped_count,
            errors,
        })
    }

    /// 返回是否写入了新记录
    async fn backfill_round(&self, past: &[DrawRecord], target: &DrawRecord) -> AppResult<bool> {
        let recommendation = {
            let mut rng = rand::thread_rng();
            self.engine.recommend(past, target.date, &mut rng)
        };
        let outcome = self
            .store
            .insert_if_absent(
                target.round,
                target.date,
                &recommendation.recommended_pair,
                &recommendation.excluded_numbers,
            )
            .await?;
        Ok(outcome.wrote())
    }
}
