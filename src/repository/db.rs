use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::BTreeSet;

use super::LottoRepository;
use crate::engine::MatchOutcome;
use crate::entities::{
    GeneratedNumberStatus, generated_number_entity as generated, lotto_result_entity as results,
    recommendation_history_entity as history,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    DrawRecord, GeneratedNumberSet, PrizeTable, RecommendationDraft, RecommendationRecord,
    format_number_list, parse_number_list,
};

/// 基于 sea-orm 的仓储实现 (Postgres)
#[derive(Clone)]
pub struct SeaOrmRepository {
    pool: DatabaseConnection,
}

impl SeaOrmRepository {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }
}

/// 存储行 -> DrawRecord, 号码串无法解析或不合法时视为存储侧故障
impl TryFrom<results::Model> for DrawRecord {
    type Error = AppError;

    fn try_from(m: results::Model) -> Result<Self, Self::Error> {
        let numbers = parse_number_list(&m.numbers).ok_or_else(|| {
            AppError::DependencyUnavailable(format!(
                "Malformed numbers '{}' for round {}",
                m.numbers, m.round
            ))
        })?;
        let draw = DrawRecord::new(m.round, m.draw_date, numbers, m.bonus).map_err(|e| {
            AppError::DependencyUnavailable(format!("Invalid draw row {}: {e}", m.round))
        })?;
        Ok(draw.with_prizes(PrizeTable {
            first: m.first_prize_amount,
            second: m.second_prize_amount,
            third: m.third_prize_amount,
            fourth: m.fourth_prize_amount,
            fifth: m.fifth_prize_amount,
        }))
    }
}

fn to_draws(rows: Vec<results::Model>) -> AppResult<Vec<DrawRecord>> {
    rows.into_iter().map(DrawRecord::try_from).collect()
}

#[async_trait]
impl LottoRepository for SeaOrmRepository {
    async fn list_draws(&self) -> AppResult<Vec<DrawRecord>> {
        let rows = results::Entity::find()
            .order_by_asc(results::Column::Round)
            .all(&self.pool)
            .await?;
        to_draws(rows)
    }

    async fn find_draw(&self, round: i32) -> AppResult<Option<DrawRecord>> {
        results::Entity::find_by_id(round)
            .one(&self.pool)
            .await?
            .map(DrawRecord::try_from)
            .transpose()
    }

    async fn find_draws(&self, rounds: &[i32]) -> AppResult<Vec<DrawRecord>> {
        if rounds.is_empty() {
            return Ok(Vec::new());
        }
        let rows = results::Entity::find()
            .filter(results::Column::Round.is_in(rounds.iter().copied()))
            .order_by_asc(results::Column::Round)
            .all(&self.pool)
            .await?;
        to_draws(rows)
    }

    async fn latest_draw(&self) -> AppResult<Option<DrawRecord>> {
        results::Entity::find()
            .order_by_desc(results::Column::Round)
            .one(&self.pool)
            .await?
            .map(DrawRecord::try_from)
            .transpose()
    }

    async fn insert_draw(&self, draw: &DrawRecord) -> AppResult<bool> {
        let am = results::ActiveModel {
            round: Set(draw.round),
            draw_date: Set(draw.date),
            numbers: Set(format_number_list(&draw.numbers)),
            bonus: Set(draw.bonus),
            first_prize_amount: Set(draw.prizes.first),
            second_prize_amount: Set(draw.prizes.second),
            third_prize_amount: Set(draw.prizes.third),
            fourth_prize_amount: Set(draw.prizes.fourth),
            fifth_prize_amount: Set(draw.prizes.fifth),
            created_at: Set(Some(Utc::now())),
        };

        // 已存在的开奖结果不可修改: ON CONFLICT DO NOTHING
        let result = results::Entity::insert(am)
            .on_conflict(
                OnConflict::column(results::Column::Round)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(DbErr::RecordNotInserted) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_recommendation(&self, round: i32) -> AppResult<Option<RecommendationRecord>> {
        Ok(history::Entity::find()
            .filter(history::Column::Round.eq(round))
            .one(&self.pool)
            .await?
            .map(Into::into))
    }

    async fn insert_recommendation(
        &self,
        draft: &RecommendationDraft,
    ) -> AppResult<Option<RecommendationRecord>> {
        let now = Utc::now();
        let am = history::ActiveModel {
            round: Set(draft.round),
            draw_date: Set(draft.date),
            recommended_pair: Set(draft.recommended_pair.clone()),
            excluded_numbers: Set(draft.excluded_numbers.clone()),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };

        // 并发写入同一期时由唯一索引裁决, 落败方不报错
        let result = history::Entity::insert(am)
            .on_conflict(
                OnConflict::column(history::Column::Round)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.pool)
            .await;

        let id = match result {
            Ok(res) => res.last_insert_id,
            Err(DbErr::RecordNotInserted) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(history::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .map(Into::into))
    }

    async fn update_recommendation(
        &self,
        draft: &RecommendationDraft,
    ) -> AppResult<RecommendationRecord> {
        let existing = history::Entity::find()
            .filter(history::Column::Round.eq(draft.round))
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Recommendation for round {}", draft.round))
            })?;

        let mut am = existing.into_active_model();
        am.draw_date = Set(draft.date);
        am.recommended_pair = Set(draft.recommended_pair.clone());
        am.excluded_numbers = Set(draft.excluded_numbers.clone());
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;
        Ok(updated.into())
    }

    async fn recommendation_rounds(&self) -> AppResult<BTreeSet<i32>> {
        let rounds: Vec<i32> = history::Entity::find()
            .select_only()
            .column(history::Column::Round)
            .into_tuple()
            .all(&self.pool)
            .await?;
        Ok(rounds.into_iter().collect())
    }

    async fn list_recommendations(&self, limit: u64) -> AppResult<Vec<RecommendationRecord>> {
        let rows = history::Entity::find()
            .order_by_desc(history::Column::Round)
            .limit(limit)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_generated(
        &self,
        numbers: &[i32],
        draw_round: i32,
    ) -> AppResult<GeneratedNumberSet> {
        let model = generated::ActiveModel {
            numbers: Set(numbers.to_vec()),
            draw_round: Set(draw_round),
            status: Set(GeneratedNumberStatus::Pending),
            winning_amount: Set(0),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(model.into())
    }

    async fn list_generated(&self, limit: u64) -> AppResult<Vec<GeneratedNumberSet>> {
        let rows = generated::Entity::find()
            .order_by_desc(generated::Column::CreatedAt)
            .order_by_desc(generated::Column::Id)
            .limit(limit)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn pending_generated(&self, draw_round: i32) -> AppResult<Vec<GeneratedNumberSet>> {
        let rows = generated::Entity::find()
            .filter(generated::Column::DrawRound.eq(draw_round))
            .filter(generated::Column::Status.eq(GeneratedNumberStatus::Pending))
            .order_by_asc(generated::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn pending_rounds(&self) -> AppResult<Vec<i32>> {
        let rounds: Vec<i32> = generated::Entity::find()
            .select_only()
            .column(generated::Column::DrawRound)
            .filter(generated::Column::Status.eq(GeneratedNumberStatus::Pending))
            .distinct()
            .order_by_asc(generated::Column::DrawRound)
            .into_tuple()
            .all(&self.pool)
            .await?;
        Ok(rounds)
    }

    async fn mark_checked(&self, id: i64, outcome: &MatchOutcome) -> AppResult<bool> {
        // 条件更新 (where status = pending) 保证 pending -> checked 只发生一次
        let result = generated::Entity::update_many()
            .set(generated::ActiveModel {
                status: Set(GeneratedNumberStatus::Checked),
                matched_numbers: Set(Some(outcome.matched_numbers.clone())),
                is_bonus_matched: Set(Some(outcome.is_bonus_matched)),
                winning_rank: Set(outcome.winning_rank),
                winning_amount: Set(outcome.winning_amount),
                checked_at: Set(Some(Utc::now())),
                ..Default::default()
            })
            .filter(generated::Column::Id.eq(id))
            .filter(generated::Column::Status.eq(GeneratedNumberStatus::Pending))
            .exec(&self.pool)
            .await?;

        Ok(result.rows_affected == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(numbers: &str, bonus: i32) -> results::Model {
        results::Model {
            round: 1100,
            draw_date: NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
            numbers: numbers.to_string(),
            bonus,
            first_prize_amount: 2_000_000_000,
            second_prize_amount: 0,
            third_prize_amount: 0,
            fourth_prize_amount: 50_000,
            fifth_prize_amount: 5_000,
            created_at: None,
        }
    }

    #[test]
    fn test_row_normalization() {
        let draw = DrawRecord::try_from(row("41,3,28,11,35,22", 9)).unwrap();
        assert_eq!(draw.numbers, vec![3, 11, 22, 28, 35, 41]);
        assert_eq!(draw.bonus, 9);
        assert_eq!(draw.prizes.amount_for(1), 2_000_000_000);
        assert_eq!(draw.prizes.amount_for(5), 5_000);
    }

    #[test]
    fn test_malformed_rows_are_rejected() {
        let err = DrawRecord::try_from(row("3,11,x,28,35,41", 9)).unwrap_err();
        assert!(matches!(err, AppError::DependencyUnavailable(_)));

        let err = DrawRecord::try_from(row("3,11,22,28,35", 9)).unwrap_err();
        assert!(matches!(err, AppError::DependencyUnavailable(_)));
    }
}
