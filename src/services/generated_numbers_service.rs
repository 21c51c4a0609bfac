use crate::error::{AppError, AppResult};
use crate::models::{
    GeneratedNumberSet, NUMBERS_PER_DRAW, SaveGeneratedNumbersRequest, validate_number_set,
};
use crate::repository::SharedRepository;

#[derive(Clone)]
pub struct GeneratedNumbersService {
    repo: SharedRepository,
    default_limit: u64,
}

impl GeneratedNumbersService {
    pub fn new(repo: SharedRepository, default_limit: u64) -> Self {
        Self {
            repo,
            default_limit,
        }
    }

    /// 保存一组号码, 状态为 pending, 等待该期开奖后结算
    pub async fn save(&self, req: SaveGeneratedNumbersRequest) -> AppResult<GeneratedNumberSet> {
        let draw_round = match req.draw_round {
            Some(round) if round > 0 => round,
            Some(round) => {
                return Err(AppError::ValidationError(format!(
                    "Draw round must be positive, got {round}"
                )));
            }
            None => {
                return Err(AppError::ValidationError(
                    "Draw round is required".to_string(),
                ));
            }
        };
        validate_number_set(&req.numbers, NUMBERS_PER_DRAW)?;

        let mut numbers = req.numbers;
        numbers.sort_unstable();
        let set = self.repo.insert_generated(&numbers, draw_round).await?;
        log::info!("Generated set {} saved for round {}", set.id, draw_round);
        Ok(set)
    }

    /// 最近保存的号码组, 新的在前
    pub async fn list(&self, limit: Option<u64>) -> AppResult<Vec<GeneratedNumberSet>> {
        let limit = limit.filter(|l| *l > 0).unwrap_or(self.default_limit);
        self.repo.list_generated(limit).await
    }
}
