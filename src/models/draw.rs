use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// 号码范围下限
pub const MIN_NUMBER: i32 = 1;
/// 号码范围上限
pub const MAX_NUMBER: i32 = 45;
/// 每期主号码个数
pub const NUMBERS_PER_DRAW: usize = 6;

/// 各奖级公布的单注奖金 (rank 1..=5), 未知时为 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PrizeTable {
    pub first: i64,
    pub second: i64,
    pub third: i64,
    pub fourth: i64,
    pub fifth: i64,
}

impl PrizeTable {
    pub fn amount_for(&self, rank: i32) -> i64 {
        match rank {
            1 => self.first,
            2 => self.second,
            3 => self.third,
            4 => self.fourth,
            5 => self.fifth,
            _ => 0,
        }
    }
}

/// 一期官方开奖结果 (规范化后的唯一形态)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DrawRecord {
    /// 期号
    pub round: i32,
    /// 开奖日期
    pub date: NaiveDate,
    /// 6 个主号码 (升序)
    pub numbers: Vec<i32>,
    /// 奖号
    pub bonus: i32,
    #[serde(default)]
    pub prizes: PrizeTable,
}

impl DrawRecord {
    /// 构造并校验, 主号码会被排序
    pub fn new(round: i32, date: NaiveDate, mut numbers: Vec<i32>, bonus: i32) -> AppResult<Self> {
        numbers.sort_unstable();
        let draw = Self {
            round,
            date,
            numbers,
            bonus,
            prizes: PrizeTable::default(),
        };
        draw.validate()?;
        Ok(draw)
    }

    pub fn with_prizes(mut self, prizes: PrizeTable) -> Self {
        self.prizes = prizes;
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.round <= 0 {
            return Err(AppError::ValidationError(format!(
                "Round must be positive, got {}",
                self.round
            )));
        }
        validate_number_set(&self.numbers, NUMBERS_PER_DRAW)?;
        if !is_valid_number(self.bonus) {
            return Err(AppError::ValidationError(format!(
                "Bonus number {} is out of range",
                self.bonus
            )));
        }
        if self.numbers.contains(&self.bonus) {
            return Err(AppError::ValidationError(format!(
                "Bonus number {} duplicates a main number",
                self.bonus
            )));
        }
        Ok(())
    }

    /// 主号码 + 奖号
    pub fn all_numbers(&self) -> impl Iterator<Item = i32> + '_ {
        self.numbers
            .iter()
            .copied()
            .chain(std::iter::once(self.bonus))
    }
}

pub fn is_valid_number(n: i32) -> bool {
    (MIN_NUMBER..=MAX_NUMBER).contains(&n)
}

/// 校验号码组: 恰好 `expected` 个、互不相同、均在 [1,45]
pub fn validate_number_set(numbers: &[i32], expected: usize) -> AppResult<()> {
    if numbers.len() != expected {
        return Err(AppError::ValidationError(format!(
            "Expected {expected} numbers, got {}",
            numbers.len()
        )));
    }
    validate_distinct_in_range(numbers)
}

/// 校验号码互不相同且在范围内 (不限个数)
pub fn validate_distinct_in_range(numbers: &[i32]) -> AppResult<()> {
    let mut seen = HashSet::with_capacity(numbers.len());
    for &n in numbers {
        if !is_valid_number(n) {
            return Err(AppError::ValidationError(format!(
                "Number {n} is out of range {MIN_NUMBER}-{MAX_NUMBER}"
            )));
        }
        if !seen.insert(n) {
            return Err(AppError::ValidationError(format!("Duplicate number {n}")));
        }
    }
    Ok(())
}

/// 解析逗号分隔的号码串, 例如 "3,11,22,28,35,41"
pub fn parse_number_list(raw: &str) -> Option<Vec<i32>> {
    raw.split(',')
        .map(|part| part.trim().parse::<i32>().ok())
        .collect()
}

pub fn format_number_list(numbers: &[i32]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// 开奖数据补录请求
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IngestDrawRequest {
    pub round: i32,
    pub date: NaiveDate,
    pub numbers: Vec<i32>,
    pub bonus: i32,
    #[serde(default)]
    pub prizes: Option<PrizeTable>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngestDrawResponse {
    pub round: i32,
    /// false 表示该期已存在, 未做任何修改
    pub created: bool,
}

/// 按期号查询开奖号码
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct WinningNumbersQuery {
    /// 逗号分隔的期号, 例如 "1166,1165,1164"
    pub rounds: Option<String>,
}

/// 最近若干期开奖查询
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecentDrawsQuery {
    /// 基准期号 (不含), 缺省为最新一期之后
    pub before_round: Option<i32>,
    /// 期数, 默认 4
    pub count: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
    }

    #[test]
    fn test_new_sorts_numbers() {
        let draw = DrawRecord::new(1, date(), vec![41, 3, 28, 11, 35, 22], 9).unwrap();
        assert_eq!(draw.numbers, vec![3, 11, 22, 28, 35, 41]);
        assert_eq!(draw.all_numbers().count(), 7);
    }

    #[test]
    fn test_rejects_bonus_in_numbers() {
        let err = DrawRecord::new(1, date(), vec![1, 2, 3, 4, 5, 6], 6).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_rejects_bad_round_and_range() {
        assert!(DrawRecord::new(0, date(), vec![1, 2, 3, 4, 5, 6], 7).is_err());
        assert!(DrawRecord::new(1, date(), vec![1, 2, 3, 4, 5, 46], 7).is_err());
        assert!(DrawRecord::new(1, date(), vec![1, 2, 3, 4, 5, 6], 0).is_err());
    }

    #[test]
    fn test_validate_number_set() {
        assert!(validate_number_set(&[1, 2, 3, 4, 5, 45], 6).is_ok());
        assert!(validate_number_set(&[1, 2, 3, 4, 5], 6).is_err());
        assert!(validate_number_set(&[1, 1, 3, 4, 5, 6], 6).is_err());
    }

    #[test]
    fn test_parse_number_list() {
        assert_eq!(
            parse_number_list("3, 11,22,28,35,41"),
            Some(vec![3, 11, 22, 28, 35, 41])
        );
        assert_eq!(parse_number_list("3,x,22"), None);
        assert_eq!(format_number_list(&[3, 11, 22]), "3,11,22");
    }

    #[test]
    fn test_prize_table_lookup() {
        let prizes = PrizeTable {
            first: 2_000_000_000,
            second: 50_000_000,
            third: 1_500_000,
            fourth: 50_000,
            fifth: 5_000,
        };
        assert_eq!(prizes.amount_for(2), 50_000_000);
        assert_eq!(prizes.amount_for(5), 5_000);
        assert_eq!(prizes.amount_for(6), 0);
    }
}
