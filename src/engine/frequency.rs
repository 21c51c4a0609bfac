use std::collections::{BTreeMap, BTreeSet};

use crate::models::DrawRecord;

/// 号码出现次数与号码对共现次数
///
/// 使用 BTreeMap 保证遍历顺序固定 (号码升序), 平局时的取舍因此可复现。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyStats {
    /// 号码 -> 出现次数 (主号码 + 奖号)
    pub number_counts: BTreeMap<i32, u32>,
    /// (小, 大) -> 同期出现次数 (仅主号码)
    pub pair_counts: BTreeMap<(i32, i32), u32>,
}

pub fn analyze<'a, I>(draws: I) -> FrequencyStats
where
    I: IntoIterator<Item = &'a DrawRecord>,
{
    let mut stats = FrequencyStats::default();
    for draw in draws {
        for n in draw.all_numbers() {
            *stats.number_counts.entry(n).or_insert(0) += 1;
        }
        for (i, &a) in draw.numbers.iter().enumerate() {
            for &b in &draw.numbers[i + 1..] {
                *stats.pair_counts.entry(pair_key(a, b)).or_insert(0) += 1;
            }
        }
    }
    stats
}

/// 仅统计号码出现次数
pub fn number_counts<'a, I>(draws: I) -> BTreeMap<i32, u32>
where
    I: IntoIterator<Item = &'a DrawRecord>,
{
    let mut counts = BTreeMap::new();
    for draw in draws {
        for n in draw.all_numbers() {
            *counts.entry(n).or_insert(0) += 1;
        }
    }
    counts
}

pub fn pair_key(a: i32, b: i32) -> (i32, i32) {
    if a <= b { (a, b) } else { (b, a) }
}

impl FrequencyStats {
    /// 共现次数严格最高且两个号码都不在 `blocked` 中的号码对。
    /// 平局取遍历中最先出现的一对。
    pub fn top_pair(&self, blocked: &BTreeSet<i32>) -> Option<(i32, i32)> {
        let mut best: Option<((i32, i32), u32)> = None;
        for (&(a, b), &count) in &self.pair_counts {
            if blocked.contains(&a) || blocked.contains(&b) {
                continue;
            }
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some(((a, b), count)),
            }
        }
        best.map(|(pair, _)| pair)
    }
}

/// 出现次数最少的 `n` 个号码, 平局按号码升序
pub fn least_common(counts: &BTreeMap<i32, u32>, n: usize) -> Vec<i32> {
    let mut entries: Vec<(i32, u32)> = counts.iter().map(|(&k, &v)| (k, v)).collect();
    entries.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
    entries.into_iter().take(n).map(|(k, _)| k).collect()
}

/// 出现次数最多的 `n` 个号码, 平局按号码升序
pub fn most_common(counts: &BTreeMap<i32, u32>, n: usize) -> Vec<i32> {
    let mut entries: Vec<(i32, u32)> = counts.iter().map(|(&k, &v)| (k, v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    entries.into_iter().take(n).map(|(k, _)| k).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draw(round: i32, numbers: [i32; 6], bonus: i32) -> DrawRecord {
        DrawRecord::new(
            round,
            NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
            numbers.to_vec(),
            bonus,
        )
        .unwrap()
    }

    #[test]
    fn test_counts_include_bonus_but_pairs_do_not() {
        let draws = vec![
            draw(1, [1, 2, 3, 4, 5, 6], 7),
            draw(2, [1, 2, 10, 11, 12, 13], 3),
        ];
        let stats = analyze(&draws);

        assert_eq!(stats.number_counts[&1], 2);
        assert_eq!(stats.number_counts[&3], 2);
        assert_eq!(stats.number_counts[&7], 1);
        assert_eq!(stats.pair_counts[&(1, 2)], 2);
        assert_eq!(stats.pair_counts[&(1, 3)], 1);
        // 奖号不参与号码对
        assert!(!stats.pair_counts.contains_key(&(1, 7)));
        // 每期 C(6,2) = 15 对
        assert_eq!(stats.pair_counts.values().sum::<u32>(), 30);
    }

    #[test]
    fn test_pair_keys_are_canonical() {
        let stats = analyze(&[draw(1, [40, 2, 33, 4, 15, 6], 7)]);
        assert!(stats.pair_counts.keys().all(|(a, b)| a < b));
        assert_eq!(pair_key(9, 3), (3, 9));
    }

    #[test]
    fn test_top_pair_skips_blocked_numbers() {
        let draws = vec![
            draw(1, [1, 2, 3, 4, 5, 6], 45),
            draw(2, [1, 2, 3, 20, 21, 22], 44),
            draw(3, [1, 2, 30, 31, 32, 33], 43),
        ];
        let stats = analyze(&draws);

        assert_eq!(stats.top_pair(&BTreeSet::new()), Some((1, 2)));

        let blocked: BTreeSet<i32> = [1].into_iter().collect();
        // (2,3) 出现 2 次, 为剩余中最高
        assert_eq!(stats.top_pair(&blocked), Some((2, 3)));
    }

    #[test]
    fn test_top_pair_tie_takes_first_in_order() {
        let stats = analyze(&[draw(1, [5, 9, 12, 20, 30, 40], 1)]);
        assert_eq!(stats.top_pair(&BTreeSet::new()), Some((5, 9)));
    }

    #[test]
    fn test_top_pair_empty() {
        let none: Vec<DrawRecord> = Vec::new();
        let stats = analyze(&none);
        assert_eq!(stats.top_pair(&BTreeSet::new()), None);
    }

    #[test]
    fn test_least_and_most_common_tie_break() {
        let counts: BTreeMap<i32, u32> = [(10, 1), (3, 1), (7, 5), (1, 2), (44, 5), (2, 1)]
            .into_iter()
            .collect();
        assert_eq!(least_common(&counts, 4), vec![2, 3, 10, 1]);
        assert_eq!(most_common(&counts, 2), vec![7, 44]);
    }
}
