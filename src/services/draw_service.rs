use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};
use crate::models::{DrawRecord, IngestDrawRequest, IngestDrawResponse};
use crate::repository::SharedRepository;

/// 最近开奖默认期数
const DEFAULT_RECENT_COUNT: usize = 4;
/// 最近开奖最大期数
const MAX_RECENT_COUNT: usize = 52;

#[derive(Clone)]
pub struct DrawService {
    repo: SharedRepository,
}

impl DrawService {
    pub fn new(repo: SharedRepository) -> Self {
        Self { repo }
    }

    pub async fn latest_draw(&self) -> AppResult<DrawRecord> {
        self.repo
            .latest_draw()
            .await?
            .ok_or_else(|| AppError::NotFound("No draw results recorded yet".to_string()))
    }

    /// 期号 -> 主号码 (不含奖号)。未开奖的期号不出现在结果中。
    pub async fn winning_numbers_by_rounds(
        &self,
        rounds: &[i32],
    ) -> AppResult<BTreeMap<i32, Vec<i32>>> {
        if rounds.is_empty() {
            return Err(AppError::ValidationError(
                "At least one round is required".to_string(),
            ));
        }
        let draws = self.repo.find_draws(rounds).await?;
        Ok(draws.into_iter().map(|d| (d.round, d.numbers)).collect())
    }

    /// `before_round` 之前的 `count` 期开奖, 新 -> 旧; 缺失的期号跳过
    pub async fn recent_draws(
        &self,
        before_round: Option<i32>,
        count: Option<usize>,
    ) -> AppResult<Vec<DrawRecord>> {
        let count = count
            .filter(|c| *c > 0)
            .unwrap_or(DEFAULT_RECENT_COUNT)
            .min(MAX_RECENT_COUNT);

        let before = match before_round {
            Some(round) if round > 0 => round,
            Some(round) => {
                return Err(AppError::ValidationError(format!(
                    "Round must be positive, got {round}"
                )));
            }
            None => match self.repo.latest_draw().await? {
                Some(latest) => latest.round + 1,
                None => return Ok(Vec::new()),
            },
        };

        let rounds: Vec<i32> = (1..=count as i32)
            .map(|back| before - back)
            .filter(|round| *round > 0)
            .collect();
        if rounds.is_empty() {
            return Ok(Vec::new());
        }

        let mut draws = self.repo.find_draws(&rounds).await?;
        draws.sort_by(|a, b| b.round.cmp(&a.round));
        Ok(draws)
    }

    /// 录入开奖结果; 已存在的期号保持不变
    pub async fn ingest_draw(&self, req: IngestDrawRequest) -> AppResult<IngestDrawResponse> {
        let mut draw = DrawRecord::new(req.round, req.date, req.numbers, req.bonus)?;
        if let Some(prizes) = req.prizes {
            if [prizes.first, prizes.second, prizes.third, prizes.fourth, prizes.fifth]
                .iter()
                .any(|amount| *amount < 0)
            {
                return Err(AppError::ValidationError(
                    "Prize amounts must not be negative".to_string(),
                ));
            }
            draw = draw.with_prizes(prizes);
        }

        let created = self.repo.insert_draw(&draw).await?;
        if created {
            log::info!("Draw {} recorded", draw.round);
        } else {
            log::debug!("Draw {} already exists, left untouched", draw.round);
        }

        Ok(IngestDrawResponse {
            round: draw.round,
            created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrizeTable;
    use crate::repository::{InMemoryRepository, LottoRepository};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn request(round: i32, numbers: Vec<i32>, bonus: i32) -> IngestDrawRequest {
        IngestDrawRequest {
            round,
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            numbers,
            bonus,
            prizes: None,
        }
    }

    #[tokio::test]
    async fn test_ingest_and_read_back() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = DrawService::new(repo.clone());

        let created = service
            .ingest_draw(request(1110, vec![41, 3, 22, 11, 35, 28], 9))
            .await
            .unwrap();
        assert!(created.created);

        let latest = service.latest_draw().await.unwrap();
        assert_eq!(latest.round, 1110);
        assert_eq!(latest.numbers, vec![3, 11, 22, 28, 35, 41]);

        let numbers = service.winning_numbers_by_rounds(&[1110, 1111]).await.unwrap();
        assert_eq!(numbers.len(), 1);
        assert_eq!(numbers[&1110], vec![3, 11, 22, 28, 35, 41]);
    }

    #[tokio::test]
    async fn test_ingest_never_overwrites() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = DrawService::new(repo.clone());

        service
            .ingest_draw(request(1110, vec![1, 2, 3, 4, 5, 6], 7))
            .await
            .unwrap();
        let mut again = request(1110, vec![10, 20, 30, 40, 41, 42], 7);
        again.prizes = Some(PrizeTable {
            first: 1,
            ..Default::default()
        });
        let response = service.ingest_draw(again).await.unwrap();
        assert!(!response.created);

        let stored = repo.find_draw(1110).await.unwrap().unwrap();
        assert_eq!(stored.numbers, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(stored.prizes, PrizeTable::default());
    }

    #[tokio::test]
    async fn test_ingest_rejects_invalid_draws() {
        let service = DrawService::new(Arc::new(InMemoryRepository::new()));

        for req in [
            request(0, vec![1, 2, 3, 4, 5, 6], 7),
            request(1, vec![1, 2, 3, 4, 5], 7),
            request(1, vec![1, 2, 3, 4, 5, 46], 7),
            request(1, vec![1, 2, 3, 4, 5, 6], 6),
        ] {
            let err = service.ingest_draw(req).await.unwrap_err();
            assert!(matches!(err, AppError::ValidationError(_)));
        }
    }

    #[tokio::test]
    async fn test_recent_draws() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = DrawService::new(repo.clone());
        assert!(service.recent_draws(None, None).await.unwrap().is_empty());

        for round in [1, 2, 3, 5, 6] {
            service
                .ingest_draw(request(round, vec![1, 2, 3, 4, 5, 6], 7))
                .await
                .unwrap();
        }

        let rounds = |draws: Vec<DrawRecord>| draws.iter().map(|d| d.round).collect::<Vec<_>>();
        assert_eq!(rounds(service.recent_draws(None, None).await.unwrap()), vec![6, 5, 3]);
        assert_eq!(rounds(service.recent_draws(Some(6), Some(2)).await.unwrap()), vec![5]);
        assert_eq!(rounds(service.recent_draws(Some(3), Some(10)).await.unwrap()), vec![2, 1]);
        assert_eq!(
            rounds(service.recent_draws(None, Some(usize::MAX)).await.unwrap()),
            vec![6, 5, 3, 2, 1]
        );
        assert!(matches!(
            service.recent_draws(Some(0), None).await.unwrap_err(),
            AppError::ValidationError(_)
        ));
    }

    #[tokio::test]
    async fn test_latest_draw_when_empty() {
        let service = DrawService::new(Arc::new(InMemoryRepository::new()));
        assert!(matches!(
            service.latest_draw().await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            service.winning_numbers_by_rounds(&[]).await.unwrap_err(),
            AppError::ValidationError(_)
        ));
    }
}
