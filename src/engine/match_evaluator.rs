use crate::models::DrawRecord;

/// 单个号码组的对奖结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// 命中的主号码 (升序)
    pub matched_numbers: Vec<i32>,
    pub is_bonus_matched: bool,
    pub winning_rank: Option<i32>,
    pub winning_amount: i64,
}

/// 奖级判定, 按顺序首个满足者生效:
/// 6 中 -> 1 等; 5 中 + 奖号 -> 2 等; 5 中 -> 3 等; 4 中 -> 4 等; 3 中 -> 5 等
pub fn prize_rank(matched: usize, bonus_matched: bool) -> Option<i32> {
    match (matched, bonus_matched) {
        (6, _) => Some(1),
        (5, true) => Some(2),
        (5, false) => Some(3),
        (4, _) => Some(4),
        (3, _) => Some(5),
        _ => None,
    }
}

pub fn evaluate(numbers: &[i32], draw: &DrawRecord) -> MatchOutcome {
    let mut matched_numbers: Vec<i32> = numbers
        .iter()
        .copied()
        .filter(|n| draw.numbers.contains(n))
        .collect();
    matched_numbers.sort_unstable();
    let is_bonus_matched = numbers.contains(&draw.bonus);
    let winning_rank = prize_rank(matched_numbers.len(), is_bonus_matched);
    let winning_amount = winning_rank
        .map(|rank| draw.prizes.amount_for(rank))
        .unwrap_or(0);

    MatchOutcome {
        matched_numbers,
        is_bonus_matched,
        winning_rank,
        winning_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrizeTable;
    use chrono::NaiveDate;

    fn result_draw() -> DrawRecord {
        DrawRecord::new(
            1100,
            NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
            vec![3, 11, 22, 28, 35, 41],
            9,
        )
        .unwrap()
        .with_prizes(PrizeTable {
            first: 2_500_000_000,
            second: 60_000_000,
            third: 1_400_000,
            fourth: 50_000,
            fifth: 5_000,
        })
    }

    #[test]
    fn test_two_matches_no_prize() {
        let outcome = evaluate(&[3, 11, 5, 6, 7, 8], &result_draw());
        assert_eq!(outcome.matched_numbers, vec![3, 11]);
        assert!(!outcome.is_bonus_matched);
        assert_eq!(outcome.winning_rank, None);
        assert_eq!(outcome.winning_amount, 0);
    }

    #[test]
    fn test_second_versus_third_prize() {
        let second = evaluate(&[3, 11, 22, 28, 35, 9], &result_draw());
        assert_eq!(second.winning_rank, Some(2));
        assert!(second.is_bonus_matched);
        assert_eq!(second.winning_amount, 60_000_000);

        let third = evaluate(&[3, 11, 22, 28, 35, 10], &result_draw());
        assert_eq!(third.winning_rank, Some(3));
        assert!(!third.is_bonus_matched);
        assert_eq!(third.winning_amount, 1_400_000);
    }

    #[test]
    fn test_rank_table() {
        assert_eq!(prize_rank(6, false), Some(1));
        assert_eq!(prize_rank(6, true), Some(1));
        assert_eq!(prize_rank(4, true), Some(4));
        assert_eq!(prize_rank(3, false), Some(5));
        assert_eq!(prize_rank(2, true), None);
        assert_eq!(prize_rank(0, false), None);
    }

    #[test]
    fn test_jackpot_and_unknown_prize_amount() {
        let outcome = evaluate(&[41, 35, 28, 22, 11, 3], &result_draw());
        assert_eq!(outcome.winning_rank, Some(1));
        assert_eq!(outcome.matched_numbers, vec![3, 11, 22, 28, 35, 41]);
        assert_eq!(outcome.winning_amount, 2_500_000_000);

        let mut draw = result_draw();
        draw.prizes = PrizeTable::default();
        let outcome = evaluate(&[3, 11, 22, 1, 2, 4], &draw);
        assert_eq!(outcome.winning_rank, Some(5));
        assert_eq!(outcome.winning_amount, 0);
    }
}
