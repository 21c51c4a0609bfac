//! 存储契约。开奖数据、推荐记录、已保存号码组的读写都经由 `LottoRepository`,
//! 服务层只持有显式传入的句柄, 不依赖全局连接。

pub mod db;
pub mod memory;
#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::engine::MatchOutcome;
use crate::error::AppResult;
use crate::models::{DrawRecord, GeneratedNumberSet, RecommendationDraft, RecommendationRecord};

pub use db::SeaOrmRepository;
pub use memory::InMemoryRepository;

pub type SharedRepository = Arc<dyn LottoRepository>;

#[async_trait]
pub trait LottoRepository: Send + Sync {
    /// 全部开奖结果, 按期号升序
    async fn list_draws(&self) -> AppResult<Vec<DrawRecord>>;

    async fn find_draw(&self, round: i32) -> AppResult<Option<DrawRecord>>;

    /// 按期号批量查询, 不存在的期号直接忽略
    async fn find_draws(&self, rounds: &[i32]) -> AppResult<Vec<DrawRecord>>;

    async fn latest_draw(&self) -> AppResult<Option<DrawRecord>>;

    /// 不存在时插入并返回 true, 已存在返回 false 且不做修改
    async fn insert_draw(&self, draw: &DrawRecord) -> AppResult<bool>;

    async fn find_recommendation(&self, round: i32) -> AppResult<Option<RecommendationRecord>>;

    /// 该期尚无记录时插入; 已存在 (含并发写入) 时返回 None 且不做修改
    async fn insert_recommendation(
        &self,
        draft: &RecommendationDraft,
    ) -> AppResult<Option<RecommendationRecord>>;

    /// 覆盖已有记录的日期与号码并刷新 updated_at; 记录不存在时返回 NotFound
    async fn update_recommendation(
        &self,
        draft: &RecommendationDraft,
    ) -> AppResult<RecommendationRecord>;

    async fn recommendation_rounds(&self) -> AppResult<BTreeSet<i32>>;

    /// 最近 `limit` 条推荐, 期号降序
    async fn list_recommendations(&self, limit: u64) -> AppResult<Vec<RecommendationRecord>>;

    async fn insert_generated(
        &self,
        numbers: &[i32],
        draw_round: i32,
    ) -> AppResult<GeneratedNumberSet>;

    /// 最近保存的号码组, 新 -> 旧
    async fn list_generated(&self, limit: u64) -> AppResult<Vec<GeneratedNumberSet>>;

    async fn pending_generated(&self, draw_round: i32) -> AppResult<Vec<GeneratedNumberSet>>;

    /// 存在 pending 号码组的期号, 升序
    async fn pending_rounds(&self) -> AppResult<Vec<i32>>;

    /// 仅当记录仍为 pending 时写入对奖结果并置为 checked。
    /// 返回是否发生了状态流转。
    async fn mark_checked(&self, id: i64, outcome: &MatchOutcome) -> AppResult<bool>;
}
