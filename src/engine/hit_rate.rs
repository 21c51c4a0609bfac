use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand::seq::IteratorRandom;
use std::collections::HashMap;

use crate::models::{
    DrawRecord, MAX_NUMBER, MIN_NUMBER, NUMBERS_PER_DRAW, RecommendationHistoryEntry,
    RecommendationRecord,
};

/// 示例数据起始期号
pub const SYNTHETIC_BASE_ROUND: i32 = 1070;

/// 统计单条推荐的命中情况。奖号与主号码一样计入命中/失误。
pub fn analyze_record(
    record: &RecommendationRecord,
    result: Option<&DrawRecord>,
) -> RecommendationHistoryEntry {
    let Some(draw) = result else {
        return RecommendationHistoryEntry::without_result(record);
    };

    let hits = |candidates: &[i32]| {
        candidates
            .iter()
            .filter(|n| draw.all_numbers().any(|w| w == **n))
            .count()
    };

    RecommendationHistoryEntry {
        recommend_hits: hits(&record.recommended_pair),
        exclude_failures: hits(&record.excluded_numbers),
        winning_numbers: draw.numbers.clone(),
        bonus_number: Some(draw.bonus),
        ..RecommendationHistoryEntry::without_result(record)
    }
}

/// 按期号匹配开奖结果; 缺失开奖的记录原样返回, 统计为 0
pub fn analyze_history(
    records: &[RecommendationRecord],
    results: &[DrawRecord],
) -> Vec<RecommendationHistoryEntry> {
    let by_round: HashMap<i32, &DrawRecord> = results.iter().map(|d| (d.round, d)).collect();
    records
        .iter()
        .map(|r| analyze_record(r, by_round.get(&r.round).copied()))
        .collect()
}

/// 无真实历史时的示例行: 从 `today` 起每周一期倒推, 号码随机, 统计自洽。
/// 期号从 `SYNTHETIC_BASE_ROUND` 递减到 1 为止, 行数不超过该值。
pub fn synthetic_history<R: Rng + ?Sized>(
    today: NaiveDate,
    rows: usize,
    rng: &mut R,
) -> Vec<RecommendationHistoryEntry> {
    let rows = rows.min(SYNTHETIC_BASE_ROUND as usize);
    (0..rows)
        .map(|i| {
            let mut picks = (MIN_NUMBER..=MAX_NUMBER).choose_multiple(rng, 8);
            let mut recommended_pair = picks.split_off(6);
            let mut excluded_numbers = picks;
            recommended_pair.sort_unstable();
            excluded_numbers.sort_unstable();

            let mut winning_numbers =
                (MIN_NUMBER..=MAX_NUMBER).choose_multiple(rng, NUMBERS_PER_DRAW);
            winning_numbers.sort_unstable();

            let count_in = |candidates: &[i32]| {
                candidates
                    .iter()
                    .filter(|n| winning_numbers.contains(*n))
                    .count()
            };
            let recommend_hits = count_in(&recommended_pair);
            let exclude_failures = count_in(&excluded_numbers);

            RecommendationHistoryEntry {
                round: SYNTHETIC_BASE_ROUND - i as i32,
                date: today - Duration::weeks(i as i64),
                recommended_pair,
                excluded_numbers,
                winning_numbers,
                bonus_number: None,
                recommend_hits,
                exclude_failures,
                synthetic: true,
            }
        })
        .collect()
}
