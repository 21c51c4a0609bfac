use chrono::{Local, NaiveDate};

use crate::engine::{Recommendation, RecommendationEngine};
use crate::error::AppResult;
use crate::models::{RecommendationRecord, RecommendationResponse, UpdateRecommendationRequest};
use crate::repository::SharedRepository;
use crate::services::RecommendationStore;

#[derive(Clone)]
pub struct RecommendationService {
    repo: SharedRepository,
    store: RecommendationStore,
    engine: RecommendationEngine,
}

impl RecommendationService {
    pub fn new(repo: SharedRepository, engine: RecommendationEngine) -> Self {
        let store = RecommendationStore::new(repo.clone());
        Self {
            repo,
            store,
            engine,
        }
    }

    /// 生成下一期推荐并按期号幂等保存
    pub async fn get_recommendation(&self) -> AppResult<RecommendationResponse> {
        self.recommend_at(Local::now().date_naive()).await
    }

    pub async fn recommend_at(&self, today: NaiveDate) -> AppResult<RecommendationResponse> {
        let draws = self.repo.list_draws().await?;

        let recommendation: Recommendation = {
            let mut rng = rand::thread_rng();
            self.engine.recommend(&draws, today, &mut rng)
        };

        let outcome = self
            .store
            .upsert(
                recommendation.next_draw_round,
                today,
                &recommendation.recommended_pair,
                &recommendation.excluded_numbers,
            )
            .await?;
        log::info!(
            "Recommendation for round {} served (stored: {})",
            recommendation.next_draw_round,
            outcome.wrote()
        );

        Ok(RecommendationResponse {
            recommended_pair: recommendation.recommended_pair.to_vec(),
            excluded_numbers: recommendation.excluded_numbers,
            final_numbers: recommendation.final_numbers,
            next_draw_round: recommendation.next_draw_round,
        })
    }

    pub async fn update_recommendation(
        &self,
        round: i32,
        req: &UpdateRecommendationRequest,
    ) -> AppResult<RecommendationRecord> {
        self.store.overwrite(round, req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DrawRecord;
    use crate::repository::{InMemoryRepository, LottoRepository};
    use chrono::Duration;
    use std::sync::Arc;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekly_draws(count: i32) -> Vec<DrawRecord> {
        (1..=count)
            .map(|round| {
                let base = (round * 7) % 39;
                let numbers = (0..6).map(|k| base + 1 + k).collect();
                DrawRecord::new(
                    round,
                    ymd(2022, 1, 1) + Duration::weeks(round as i64),
                    numbers,
                    base + 7,
                )
                .unwrap()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_recommendation_is_stored_for_next_round() {
        let repo = Arc::new(InMemoryRepository::with_draws(weekly_draws(100)));
        let service = RecommendationService::new(repo.clone(), RecommendationEngine::default());
        let today = ymd(2023, 12, 20);

        let response = service.recommend_at(today).await.unwrap();
        assert_eq!(response.next_draw_round, 101);
        assert_eq!(response.final_numbers.len(), 6);
        assert_eq!(response.recommended_pair.len(), 2);

        let stored = repo.find_recommendation(101).await.unwrap().unwrap();
        assert_eq!(stored.recommended_pair, response.recommended_pair);
        assert_eq!(stored.excluded_numbers, response.excluded_numbers);
        assert_eq!(stored.date, today);
    }

    #[tokio::test]
    async fn test_repeated_calls_do_not_rewrite_unchanged_content() {
        let repo = Arc::new(InMemoryRepository::with_draws(weekly_draws(100)));
        let service = RecommendationService::new(repo.clone(), RecommendationEngine::default());
        let today = ymd(2023, 12, 20);

        service.recommend_at(today).await.unwrap();
        service.recommend_at(today).await.unwrap();
        // 推荐对与排除号码来自确定性统计, 第二次调用不会写入
        assert_eq!(repo.recommendation_writes().await, 1);
        assert_eq!(repo.recommendation_rounds().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_history() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = RecommendationService::new(repo.clone(), RecommendationEngine::default());

        let response = service.get_recommendation().await.unwrap();
        assert_eq!(response.next_draw_round, 1);
        assert_eq!(response.final_numbers.len(), 6);
        assert!(repo.find_recommendation(1).await.unwrap().is_some());
    }
}
