use crate::engine::evaluate_match;
use crate::error::{AppError, AppResult};
use crate::models::{CheckWinningResponse, DrawRecord, ItemError, ReconcileResponse};
use crate::repository::SharedRepository;

/// 对奖: 用官方开奖结果结算 pending 状态的号码组
#[derive(Clone)]
pub struct WinningService {
    repo: SharedRepository,
}

impl WinningService {
    pub fn new(repo: SharedRepository) -> Self {
        Self { repo }
    }

    /// 结算指定期号。该期尚未开奖时返回 NotFound, 不做任何修改。
    pub async fn check_winning(&self, draw_round: i32) -> AppResult<CheckWinningResponse> {
        let draw = self
            .repo
            .find_draw(draw_round)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No official result for round {draw_round}")))?;

        let (checked_count, errors) = self.settle_round(&draw).await?;
        log::info!(
            "Round {} checked: {} sets settled, {} failed",
            draw_round,
            checked_count,
            errors.len()
        );

        Ok(CheckWinningResponse {
            draw_round,
            checked_count,
            errors,
        })
    }

    /// 结算所有已开奖且仍有 pending 号码组的期号
    pub async fn reconcile_pending(&self) -> AppResult<ReconcileResponse> {
        let rounds = self.repo.pending_rounds().await?;

        let mut response = ReconcileResponse {
            checked_count: 0,
            rounds_checked: Vec::new(),
            rounds_waiting: Vec::new(),
            errors: Vec::new(),
        };

        for round in rounds {
            let draw = match self.repo.find_draw(round).await {
                Ok(Some(draw)) => draw,
                Ok(None) => {
                    log::debug!("Round {} has no result yet, waiting", round);
                    response.rounds_waiting.push(round);
                    continue;
                }
                Err(e) => {
                    log::error!("Failed to load result for round {}: {}", round, e);
                    response.rounds_waiting.push(round);
                    continue;
                }
            };

            match self.settle_round(&draw).await {
                Ok((count, errors)) => {
                    response.checked_count += count;
                    response.rounds_checked.push(round);
                    response.errors.extend(errors);
                }
                Err(e) => {
                    log::error!("Failed to list pending sets for round {}: {}", round, e);
                    response.rounds_waiting.push(round);
                }
            }
        }

        log::info!(
            "Reconciliation finished: {} sets settled across {} rounds, {} rounds waiting, {} failed",
            response.checked_count,
            response.rounds_checked.len(),
            response.rounds_waiting.len(),
            response.errors.len()
        );
        Ok(response)
    }

    async fn settle_round(&self, draw: &DrawRecord) -> AppResult<(usize, Vec<ItemError>)> {
        let pending = self.repo.pending_generated(draw.round).await?;

        let mut checked_count = 0;
        let mut errors = Vec::new();
        for set in pending {
            let outcome = evaluate_match(&set.numbers, draw);
            match self.repo.mark_checked(set.id, &outcome).await {
                Ok(true) => checked_count += 1,
                // 并发结算时已被其他请求处理
                Ok(false) => log::debug!("Generated set {} was already checked", set.id),
                Err(e) => {
                    log::error!("Failed to settle generated set {}: {}", set.id, e);
                    errors.push(ItemError {
                        id: set.id,
                        error: e.to_string(),
                    });
                }
            }
        }
        Ok((checked_count, errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::GeneratedNumberStatus;
    use crate::models::PrizeTable;
    use crate::repository::testing::FlakyRepository;
    use crate::repository::{InMemoryRepository, LottoRepository};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn official(round: i32) -> DrawRecord {
        DrawRecord::new(
            round,
            NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
            vec![3, 11, 22, 28, 35, 41],
            9,
        )
        .unwrap()
        .with_prizes(PrizeTable {
            first: 2_000_000_000,
            second: 50_000_000,
            third: 1_500_000,
            fourth: 50_000,
            fifth: 5_000,
        })
    }

    #[tokio::test]
    async fn test_check_winning_settles_pending_sets() {
        let repo = Arc::new(InMemoryRepository::with_draws(vec![official(1100)]));
        let miss = repo.insert_generated(&[3, 11, 5, 6, 7, 8], 1100).await.unwrap();
        let fourth = repo.insert_generated(&[3, 11, 22, 28, 1, 2], 1100).await.unwrap();
        let other_round = repo.insert_generated(&[3, 11, 22, 28, 35, 41], 1101).await.unwrap();

        let service = WinningService::new(repo.clone());
        let response = service.check_winning(1100).await.unwrap();
        assert_eq!(response.checked_count, 2);
        assert!(response.errors.is_empty());

        let sets = repo.list_generated(10).await.unwrap();
        let find = |id: i64| sets.iter().find(|s| s.id == id).unwrap().clone();

        let miss = find(miss.id);
        assert_eq!(miss.status, GeneratedNumberStatus::Checked);
        assert_eq!(miss.matched_numbers, Some(vec![3, 11]));
        assert_eq!(miss.is_bonus_matched, Some(false));
        assert_eq!(miss.winning_rank, None);
        assert_eq!(miss.winning_amount, 0);

        let fourth = find(fourth.id);
        assert_eq!(fourth.winning_rank, Some(4));
        assert_eq!(fourth.winning_amount, 50_000);

        assert_eq!(find(other_round.id).status, GeneratedNumberStatus::Pending);
    }

    #[tokio::test]
    async fn test_check_winning_is_one_way() {
        let repo = Arc::new(InMemoryRepository::with_draws(vec![official(1100)]));
        repo.insert_generated(&[1, 2, 3, 4, 5, 6], 1100).await.unwrap();
        let service = WinningService::new(repo.clone());

        assert_eq!(service.check_winning(1100).await.unwrap().checked_count, 1);
        assert_eq!(service.check_winning(1100).await.unwrap().checked_count, 0);
    }

    #[tokio::test]
    async fn test_check_winning_without_result() {
        let repo = Arc::new(InMemoryRepository::new());
        let set = repo.insert_generated(&[1, 2, 3, 4, 5, 6], 1200).await.unwrap();
        let service = WinningService::new(repo.clone());

        let err = service.check_winning(1200).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(repo.pending_generated(1200).await.unwrap()[0].id, set.id);
    }

    #[tokio::test]
    async fn test_failed_set_does_not_block_siblings() {
        let inner = InMemoryRepository::with_draws(vec![official(1100)]);
        let first = inner.insert_generated(&[1, 2, 3, 4, 5, 6], 1100).await.unwrap();
        inner.insert_generated(&[7, 8, 9, 10, 12, 13], 1100).await.unwrap();
        let mut flaky = FlakyRepository::new(inner);
        flaky.failing_ids.insert(first.id);

        let service = WinningService::new(Arc::new(flaky));
        let response = service.check_winning(1100).await.unwrap();
        assert_eq!(response.checked_count, 1);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].id, first.id);
    }

    #[tokio::test]
    async fn test_reconcile_skips_rounds_without_result() {
        let repo = Arc::new(InMemoryRepository::with_draws(vec![official(1100), official(1101)]));
        repo.insert_generated(&[1, 2, 3, 4, 5, 6], 1100).await.unwrap();
        repo.insert_generated(&[1, 2, 3, 4, 5, 6], 1101).await.unwrap();
        repo.insert_generated(&[1, 2, 3, 4, 5, 6], 1101).await.unwrap();
        repo.insert_generated(&[1, 2, 3, 4, 5, 6], 1102).await.unwrap();

        let service = WinningService::new(repo.clone());
        let response = service.reconcile_pending().await.unwrap();
        assert_eq!(response.checked_count, 3);
        assert_eq!(response.rounds_checked, vec![1100, 1101]);
        assert_eq!(response.rounds_waiting, vec![1102]);
        assert_eq!(repo.pending_rounds().await.unwrap(), vec![1102]);
    }

    #[tokio::test]
    async fn test_reconcile_waits_when_results_unreadable() {
        let inner = InMemoryRepository::with_draws(vec![official(1100)]);
        inner.insert_generated(&[1, 2, 3, 4, 5, 6], 1100).await.unwrap();
        let mut flaky = FlakyRepository::new(inner);
        flaky.draws_unavailable = true;
        let repo = Arc::new(flaky);

        let service = WinningService::new(repo.clone());
        let response = service.reconcile_pending().await.unwrap();
        assert_eq!(response.checked_count, 0);
        assert!(response.rounds_checked.is_empty());
        assert_eq!(response.rounds_waiting, vec![1100]);
        assert_eq!(repo.pending_rounds().await.unwrap(), vec![1100]);

        assert!(matches!(
            service.check_winning(1100).await.unwrap_err(),
            AppError::DependencyUnavailable(_)
        ));
    }
}
