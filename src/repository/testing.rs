//! 测试用仓储: 包装内存仓储, 对指定期号/号码组注入读写失败, 或模拟并发写入前的旧读。

use async_trait::async_trait;
use std::collections::BTreeSet;
use tokio::sync::Mutex;

use super::{InMemoryRepository, LottoRepository};
use crate::engine::MatchOutcome;
use crate::error::{AppError, AppResult};
use crate::models::{DrawRecord, GeneratedNumberSet, RecommendationDraft, RecommendationRecord};

pub struct FlakyRepository {
    pub inner: InMemoryRepository,
    pub failing_rounds: BTreeSet<i32>,
    pub failing_ids: BTreeSet<i64>,
    pub history_unavailable: bool,
    pub draws_unavailable: bool,
    /// 这些期号的下一次 find_recommendation 返回 None, 之后恢复正常
    pub stale_reads: Mutex<BTreeSet<i32>>,
}

impl FlakyRepository {
    pub fn new(inner: InMemoryRepository) -> Self {
        Self {
            inner,
            failing_rounds: BTreeSet::new(),
            failing_ids: BTreeSet::new(),
            history_unavailable: false,
            draws_unavailable: false,
            stale_reads: Mutex::new(BTreeSet::new()),
        }
    }

    fn unavailable(what: impl std::fmt::Display) -> AppError {
        AppError::DependencyUnavailable(format!("injected failure: {what}"))
    }
}

#[async_trait]
impl LottoRepository for FlakyRepository {
    async fn list_draws(&self) -> AppResult<Vec<DrawRecord>> {
        self.inner.list_draws().await
    }

    async fn find_draw(&self, round: i32) -> AppResult<Option<DrawRecord>> {
        if self.draws_unavailable {
            return Err(Self::unavailable("lotto_results"));
        }
        self.inner.find_draw(round).await
    }

    async fn find_draws(&self, rounds: &[i32]) -> AppResult<Vec<DrawRecord>> {
        if self.draws_unavailable {
            return Err(Self::unavailable("lotto_results"));
        }
        self.inner.find_draws(rounds).await
    }

    async fn latest_draw(&self) -> AppResult<Option<DrawRecord>> {
        self.inner.latest_draw().await
    }

    async fn insert_draw(&self, draw: &DrawRecord) -> AppResult<bool> {
        self.inner.insert_draw(draw).await
    }

    async fn find_recommendation(&self, round: i32) -> AppResult<Option<RecommendationRecord>> {
        if self.stale_reads.lock().await.remove(&round) {
            return Ok(None);
        }
        self.inner.find_recommendation(round).await
    }

    async fn insert_recommendation(
        &self,
        draft: &RecommendationDraft,
    ) -> AppResult<Option<RecommendationRecord>> {
        if self.failing_rounds.contains(&draft.round) {
            return Err(Self::unavailable(format!("round {}", draft.round)));
        }
        self.inner.insert_recommendation(draft).await
    }

    async fn update_recommendation(
        &self,
        draft: &RecommendationDraft,
    ) -> AppResult<RecommendationRecord> {
        if self.failing_rounds.contains(&draft.round) {
            return Err(Self::unavailable(format!("round {}", draft.round)));
        }
        self.inner.update_recommendation(draft).await
    }

    async fn recommendation_rounds(&self) -> AppResult<BTreeSet<i32>> {
        let stale = self.stale_reads.lock().await.clone();
        let rounds = self.inner.recommendation_rounds().await?;
        Ok(rounds.difference(&stale).copied().collect())
    }

    async fn list_recommendations(&self, limit: u64) -> AppResult<Vec<RecommendationRecord>> {
        if self.history_unavailable {
            return Err(Self::unavailable("recommendation_history"));
        }
        self.inner.list_recommendations(limit).await
    }

    async fn insert_generated(
        &self,
        numbers: &[i32],
        draw_round: i32,
    ) -> AppResult<GeneratedNumberSet> {
        self.inner.insert_generated(numbers, draw_round).await
    }

    async fn list_generated(&self, limit: u64) -> AppResult<Vec<GeneratedNumberSet>> {
        self.inner.list_generated(limit).await
    }

    async fn pending_generated(&self, draw_round: i32) -> AppResult<Vec<GeneratedNumberSet>> {
        self.inner.pending_generated(draw_round).await
    }

    async fn pending_rounds(&self) -> AppResult<Vec<i32>> {
        self.inner.pending_rounds().await
    }

    async fn mark_checked(&self, id: i64, outcome: &MatchOutcome) -> AppResult<bool> {
        if self.failing_ids.contains(&id) {
            return Err(Self::unavailable(format!("generated set {id}")));
        }
        self.inner.mark_checked(id, outcome).await
    }
}
