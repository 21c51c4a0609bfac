use chrono::NaiveDate;
use rand::Rng;
use rand::seq::IteratorRandom;
use std::collections::BTreeSet;

use super::frequency::{self, least_common, most_common};
use super::seasonal::SeasonalSampler;
use crate::config::RecommendationConfig;
use crate::models::{DrawRecord, MAX_NUMBER, MIN_NUMBER, NUMBERS_PER_DRAW};

/// 冷号个数
const LEAST_COMMON_COUNT: usize = 4;
/// 近期热号个数
const RECENT_HOT_COUNT: usize = 2;
/// 排除号码上限
const MAX_EXCLUDED: usize = 6;
/// 随机补全的最大抽取次数, 超过后按号码顺序确定性补全
const MAX_COMPLETION_ATTEMPTS: usize = 1_000;

/// 一次推荐的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub recommended_pair: [i32; 2],
    pub excluded_numbers: Vec<i32>,
    pub final_numbers: Vec<i32>,
    pub next_draw_round: i32,
}

#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    sampler: SeasonalSampler,
    recent_window: usize,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::from_config(&RecommendationConfig::default())
    }
}

impl RecommendationEngine {
    pub fn new(sampler: SeasonalSampler, recent_window: usize) -> Self {
        Self {
            sampler,
            recent_window,
        }
    }

    pub fn from_config(config: &RecommendationConfig) -> Self {
        Self::new(
            SeasonalSampler::new(config.seasonal_period_months),
            config.recent_window,
        )
    }

    /// 基于 `history` (按期号升序) 生成推荐, `today` 作为季节抽样的基准日。
    ///
    /// 流程:
    /// 1. 季节抽样得到统计样本与当月受保护号码
    /// 2. 样本中共现次数最高且不含受保护号码的号码对作为推荐对, 无则随机
    /// 3. 样本冷号 4 个 + 最近 N 期热号 2 个, 去重并剔除推荐对后取前 6 个作为排除号码
    /// 4. 从推荐对出发随机补全到 6 个号码, 避开排除号码与受保护号码
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        history: &[DrawRecord],
        today: NaiveDate,
        rng: &mut R,
    ) -> Recommendation {
        let sample = self.sampler.sample(today, history);
        let stats = frequency::analyze(sample.historical_draws.iter().copied());
        let protected = &sample.protected_numbers;

        let recommended_pair = match stats.top_pair(protected) {
            Some((a, b)) => [a, b],
            None => random_pair(protected, rng),
        };

        let cold = if stats.number_counts.is_empty() {
            random_distinct(LEAST_COMMON_COUNT, &recommended_pair, rng)
        } else {
            least_common(&stats.number_counts, LEAST_COMMON_COUNT)
        };

        let recent_start = history.len().saturating_sub(self.recent_window);
        let recent_counts = frequency::number_counts(&history[recent_start..]);
        let hot = if recent_counts.is_empty() {
            random_distinct(RECENT_HOT_COUNT, &[], rng)
        } else {
            most_common(&recent_counts, RECENT_HOT_COUNT)
        };

        let excluded_numbers = build_exclusion(&cold, &hot, &recommended_pair);

        let mut blocked: BTreeSet<i32> = excluded_numbers.iter().copied().collect();
        blocked.extend(protected.iter().copied());
        let final_numbers = complete_numbers(&recommended_pair, &blocked, rng);

        let next_draw_round = history.iter().map(|d| d.round).max().unwrap_or(0) + 1;

        Recommendation {
            recommended_pair,
            excluded_numbers,
            final_numbers,
            next_draw_round,
        }
    }
}

/// 冷号与热号合并去重, 剔除推荐对, 最多 6 个, 升序
fn build_exclusion(cold: &[i32], hot: &[i32], pair: &[i32; 2]) -> Vec<i32> {
    let mut seen = BTreeSet::new();
    let mut excluded: Vec<i32> = cold
        .iter()
        .chain(hot)
        .copied()
        .filter(|n| !pair.contains(n) && seen.insert(*n))
        .take(MAX_EXCLUDED)
        .collect();
    excluded.sort_unstable();
    excluded
}

fn random_pair<R: Rng + ?Sized>(protected: &BTreeSet<i32>, rng: &mut R) -> [i32; 2] {
    let mut available: Vec<i32> = (MIN_NUMBER..=MAX_NUMBER)
        .filter(|n| !protected.contains(n))
        .choose_multiple(rng, 2);
    if available.len() < 2 {
        available = (MIN_NUMBER..=MAX_NUMBER).choose_multiple(rng, 2);
    }
    available.sort_unstable();
    [available[0], available[1]]
}

fn random_distinct<R: Rng + ?Sized>(count: usize, avoid: &[i32], rng: &mut R) -> Vec<i32> {
    (MIN_NUMBER..=MAX_NUMBER)
        .filter(|n| !avoid.contains(n))
        .choose_multiple(rng, count)
}

/// 以推荐对为起点补全至 6 个号码 (升序)。
/// 随机抽取有次数上限, 未凑满时按号码顺序补入未被屏蔽的号码,
/// 仍不足则放开屏蔽。
fn complete_numbers<R: Rng + ?Sized>(
    pair: &[i32; 2],
    blocked: &BTreeSet<i32>,
    rng: &mut R,
) -> Vec<i32> {
    let mut picked: BTreeSet<i32> = pair.iter().copied().collect();

    let mut attempts = 0;
    while picked.len() < NUMBERS_PER_DRAW && attempts < MAX_COMPLETION_ATTEMPTS {
        attempts += 1;
        let n = rng.gen_range(MIN_NUMBER..=MAX_NUMBER);
        if !blocked.contains(&n) {
            picked.insert(n);
        }
    }

    if picked.len() < NUMBERS_PER_DRAW {
        log::warn!(
            "Random completion exhausted after {attempts} attempts, filling deterministically"
        );
        for n in (MIN_NUMBER..=MAX_NUMBER).filter(|n| !blocked.contains(n)) {
            if picked.len() == NUMBERS_PER_DRAW {
                break;
            }
            picked.insert(n);
        }
        for n in MIN_NUMBER..=MAX_NUMBER {
            if picked.len() == NUMBERS_PER_DRAW {
                break;
            }
            picked.insert(n);
        }
    }

    picked.into_iter().collect()
}
