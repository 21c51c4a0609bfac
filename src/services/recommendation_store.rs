use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::error::{AppError, AppResult};
use crate::models::{
    RecommendationDraft, RecommendationRecord, UpdateRecommendationRequest,
    validate_distinct_in_range, validate_number_set,
};
use crate::repository::SharedRepository;

/// 推荐对个数
const PAIR_SIZE: usize = 2;
/// 排除号码上限
const MAX_EXCLUDED: usize = 6;

/// upsert 的实际效果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted(RecommendationRecord),
    Updated(RecommendationRecord),
    /// 内容 (按集合比较) 未变化, 未写入
    Unchanged(RecommendationRecord),
}

impl UpsertOutcome {
    pub fn record(&self) -> &RecommendationRecord {
        match self {
            UpsertOutcome::Inserted(r) | UpsertOutcome::Updated(r) | UpsertOutcome::Unchanged(r) => r,
        }
    }

    pub fn wrote(&self) -> bool {
        !matches!(self, UpsertOutcome::Unchanged(_))
    }
}

/// 按期号幂等保存推荐: 每期一条, 仅在内容变化时写入
#[derive(Clone)]
pub struct RecommendationStore {
    repo: SharedRepository,
}

fn same_set(a: &[i32], b: &[i32]) -> bool {
    a.iter().collect::<BTreeSet<_>>() == b.iter().collect::<BTreeSet<_>>()
}

/// 推荐对: 2 个互不相同的号码; 排除号码: 最多 6 个, 与推荐对不相交
pub fn validate_recommendation(pair: &[i32], excluded: &[i32]) -> AppResult<()> {
    validate_number_set(pair, PAIR_SIZE)?;
    if excluded.len() > MAX_EXCLUDED {
        return Err(AppError::ValidationError(format!(
            "At most {MAX_EXCLUDED} excluded numbers allowed, got {}",
            excluded.len()
        )));
    }
    validate_distinct_in_range(excluded)?;
    if let Some(n) = excluded.iter().find(|n| pair.contains(*n)) {
        return Err(AppError::ValidationError(format!(
            "Number {n} cannot be both recommended and excluded"
        )));
    }
    Ok(())
}

impl RecommendationStore {
    pub fn new(repo: SharedRepository) -> Self {
        Self { repo }
    }

    /// 不存在则插入; 存在且推荐对或排除号码 (按集合) 有差异则更新日期与内容; 否则不写。
    /// 插入时若该期已被并发写入, 按已存在的记录继续比较。
    pub async fn upsert(
        &self,
        round: i32,
        date: NaiveDate,
        recommended_pair: &[i32],
        excluded_numbers: &[i32],
    ) -> AppResult<UpsertOutcome> {
        let draft = draft(round, date, recommended_pair, excluded_numbers);

        let existing = match self.repo.find_recommendation(round).await? {
            Some(existing) => existing,
            None => match self.insert_or_fetch(&draft).await? {
                UpsertOutcome::Unchanged(existing) => existing,
                written => return Ok(written),
            },
        };

        if same_set(&existing.recommended_pair, &draft.recommended_pair)
            && same_set(&existing.excluded_numbers, &draft.excluded_numbers)
        {
            log::debug!("Recommendation for round {round} unchanged, skipping write");
            return Ok(UpsertOutcome::Unchanged(existing));
        }

        let record = self.repo.update_recommendation(&draft).await?;
        log::debug!("Recommendation for round {round} updated");
        Ok(UpsertOutcome::Updated(record))
    }

    /// 仅在该期没有记录时写入, 已有记录 (含并发写入) 原样返回
    pub async fn insert_if_absent(
        &self,
        round: i32,
        date: NaiveDate,
        recommended_pair: &[i32],
        excluded_numbers: &[i32],
    ) -> AppResult<UpsertOutcome> {
        match self.repo.find_recommendation(round).await? {
            Some(existing) => Ok(UpsertOutcome::Unchanged(existing)),
            None => {
                self.insert_or_fetch(&draft(round, date, recommended_pair, excluded_numbers))
                    .await
            }
        }
    }

    async fn insert_or_fetch(&self, draft: &RecommendationDraft) -> AppResult<UpsertOutcome> {
        if let Some(record) = self.repo.insert_recommendation(draft).await? {
            log::debug!("Recommendation for round {} inserted", draft.round);
            return Ok(UpsertOutcome::Inserted(record));
        }

        log::debug!(
            "Recommendation for round {} was written concurrently, using stored row",
            draft.round
        );
        let existing = self
            .repo
            .find_recommendation(draft.round)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "Recommendation for round {} conflicted but could not be read back",
                    draft.round
                ))
            })?;
        Ok(UpsertOutcome::Unchanged(existing))
    }

    /// 手动修正已有记录; 未提供的字段保持原值
    pub async fn overwrite(
        &self,
        round: i32,
        req: &UpdateRecommendationRequest,
    ) -> AppResult<RecommendationRecord> {
        if req.recommended_pair.is_none() && req.excluded_numbers.is_none() {
            return Err(AppError::ValidationError(
                "Nothing to update: provide recommended_pair and/or excluded_numbers".into(),
            ));
        }

        let existing = self
            .repo
            .find_recommendation(round)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Recommendation for round {round}")))?;

        let pair = req
            .recommended_pair
            .as_deref()
            .unwrap_or(&existing.recommended_pair);
        let excluded = req
            .excluded_numbers
            .as_deref()
            .unwrap_or(&existing.excluded_numbers);
        validate_recommendation(pair, excluded)?;

        let draft = RecommendationDraft {
            round,
            date: existing.date,
            recommended_pair: sorted(pair),
            excluded_numbers: sorted(excluded),
        };
        let record = self.repo.update_recommendation(&draft).await?;
        log::info!("Recommendation for round {round} manually updated");
        Ok(record)
    }
}

fn draft(round: i32, date: NaiveDate, pair: &[i32], excluded: &[i32]) -> RecommendationDraft {
    RecommendationDraft {
        round,
        date,
        recommended_pair: sorted(pair),
        excluded_numbers: sorted(excluded),
    }
}

fn sorted(numbers: &[i32]) -> Vec<i32> {
    let mut v = numbers.to_vec();
    v.sort_unstable();
    v
}
