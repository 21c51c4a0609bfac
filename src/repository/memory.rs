use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::Mutex;

use super::LottoRepository;
use crate::engine::MatchOutcome;
use crate::entities::GeneratedNumberStatus;
use crate::error::{AppError, AppResult};
use crate::models::{DrawRecord, GeneratedNumberSet, RecommendationDraft, RecommendationRecord};

#[derive(Debug, Default)]
struct MemoryState {
    draws: BTreeMap<i32, DrawRecord>,
    recommendations: BTreeMap<i32, RecommendationRecord>,
    generated: BTreeMap<i64, GeneratedNumberSet>,
    next_recommendation_id: i64,
    next_generated_id: i64,
    recommendation_writes: usize,
}

/// 进程内仓储, 用于 `memory://` 运行与测试。
/// 单把互斥锁保证每次读改写的原子性, 语义与数据库实现一致。
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_draws(draws: impl IntoIterator<Item = DrawRecord>) -> Self {
        let state = MemoryState {
            draws: draws.into_iter().map(|d| (d.round, d)).collect(),
            ..Default::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    /// 推荐记录累计写入次数 (insert + update)
    pub async fn recommendation_writes(&self) -> usize {
        self.state.lock().await.recommendation_writes
    }
}

#[async_trait]
impl LottoRepository for InMemoryRepository {
    async fn list_draws(&self) -> AppResult<Vec<DrawRecord>> {
        Ok(self.state.lock().await.draws.values().cloned().collect())
    }

    async fn find_draw(&self, round: i32) -> AppResult<Option<DrawRecord>> {
        Ok(self.state.lock().await.draws.get(&round).cloned())
    }

    async fn find_draws(&self, rounds: &[i32]) -> AppResult<Vec<DrawRecord>> {
        let state = self.state.lock().await;
        let wanted: BTreeSet<i32> = rounds.iter().copied().collect();
        Ok(wanted
            .iter()
            .filter_map(|r| state.draws.get(r).cloned())
            .collect())
    }

    async fn latest_draw(&self) -> AppResult<Option<DrawRecord>> {
        Ok(self
            .state
            .lock()
            .await
            .draws
            .last_key_value()
            .map(|(_, d)| d.clone()))
    }

    async fn insert_draw(&self, draw: &DrawRecord) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        if state.draws.contains_key(&draw.round) {
            return Ok(false);
        }
        state.draws.insert(draw.round, draw.clone());
        Ok(true)
    }

    async fn find_recommendation(&self, round: i32) -> AppResult<Option<RecommendationRecord>> {
        Ok(self.state.lock().await.recommendations.get(&round).cloned())
    }

    async fn insert_recommendation(
        &self,
        draft: &RecommendationDraft,
    ) -> AppResult<Option<RecommendationRecord>> {
        let mut state = self.state.lock().await;
        if state.recommendations.contains_key(&draft.round) {
            return Ok(None);
        }
        state.next_recommendation_id += 1;
        let now = Utc::now();
        let record = RecommendationRecord {
            id: state.next_recommendation_id,
            round: draft.round,
            date: draft.date,
            recommended_pair: draft.recommended_pair.clone(),
            excluded_numbers: draft.excluded_numbers.clone(),
            created_at: now,
            updated_at: now,
        };
        state.recommendations.insert(draft.round, record.clone());
        state.recommendation_writes += 1;
        Ok(Some(record))
    }

    async fn update_recommendation(
        &self,
        draft: &RecommendationDraft,
    ) -> AppResult<RecommendationRecord> {
        let mut state = self.state.lock().await;
        let record = state
            .recommendations
            .get_mut(&draft.round)
            .ok_or_else(|| {
                AppError::NotFound(format!("Recommendation for round {}", draft.round))
            })?;
        record.date = draft.date;
        record.recommended_pair = draft.recommended_pair.clone();
        record.excluded_numbers = draft.excluded_numbers.clone();
        record.updated_at = Utc::now();
        let updated = record.clone();
        state.recommendation_writes += 1;
        Ok(updated)
    }

    async fn recommendation_rounds(&self) -> AppResult<BTreeSet<i32>> {
        Ok(self
            .state
            .lock()
            .await
            .recommendations
            .keys()
            .copied()
            .collect())
    }

    async fn list_recommendations(&self, limit: u64) -> AppResult<Vec<RecommendationRecord>> {
        Ok(self
            .state
            .lock()
            .await
            .recommendations
            .values()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn insert_generated(
        &self,
        numbers: &[i32],
        draw_round: i32,
    ) -> AppResult<GeneratedNumberSet> {
        let mut state = self.state.lock().await;
        state.next_generated_id += 1;
        let set = GeneratedNumberSet {
            id: state.next_generated_id,
            numbers: numbers.to_vec(),
            draw_round,
            status: GeneratedNumberStatus::Pending,
            matched_numbers: None,
            is_bonus_matched: None,
            winning_rank: None,
            winning_amount: 0,
            created_at: Utc::now(),
            checked_at: None,
        };
        state.generated.insert(set.id, set.clone());
        Ok(set)
    }

    async fn list_generated(&self, limit: u64) -> AppResult<Vec<GeneratedNumberSet>> {
        // id 单调递增, 倒序即为新 -> 旧
        Ok(self
            .state
            .lock()
            .await
            .generated
            .values()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn pending_generated(&self, draw_round: i32) -> AppResult<Vec<GeneratedNumberSet>> {
        Ok(self
            .state
            .lock()
            .await
            .generated
            .values()
            .filter(|g| g.draw_round == draw_round && g.status == GeneratedNumberStatus::Pending)
            .cloned()
            .collect())
    }

    async fn pending_rounds(&self) -> AppResult<Vec<i32>> {
        let rounds: BTreeSet<i32> = self
            .state
            .lock()
            .await
            .generated
            .values()
            .filter(|g| g.status == GeneratedNumberStatus::Pending)
            .map(|g| g.draw_round)
            .collect();
        Ok(rounds.into_iter().collect())
    }

    async fn mark_checked(&self, id: i64, outcome: &MatchOutcome) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let Some(set) = state.generated.get_mut(&id) else {
            return Err(AppError::NotFound(format!("Generated number set {id}")));
        };
        if set.status != GeneratedNumberStatus::Pending {
            return Ok(false);
        }
        set.status = GeneratedNumberStatus::Checked;
        set.matched_numbers = Some(outcome.matched_numbers.clone());
        set.is_bonus_matched = Some(outcome.is_bonus_matched);
        set.winning_rank = outcome.winning_rank;
        set.winning_amount = outcome.winning_amount;
        set.checked_at = Some(Utc::now());
        Ok(true)
    }
}
