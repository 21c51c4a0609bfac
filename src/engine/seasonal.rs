use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

use crate::models::DrawRecord;

/// 季节抽样结果
#[derive(Debug, Clone, Default)]
pub struct SeasonalSample<'a> {
    /// 参与频率统计的历史期 (不含当月)
    pub historical_draws: Vec<&'a DrawRecord>,
    /// 当月已开出的号码 (含奖号), 不得进入推荐
    pub protected_numbers: BTreeSet<i32>,
}

/// 按月份距离做周期抽样:
/// 与 `now` 相隔整数倍周期 (默认 6 个月) 的月份才计入统计,
/// 与 `now` 同年同月的期只贡献受保护号码。
#[derive(Debug, Clone, Copy)]
pub struct SeasonalSampler {
    period_months: i32,
}

impl Default for SeasonalSampler {
    fn default() -> Self {
        Self { period_months: 6 }
    }
}

/// 有符号月份距离: `now` 晚于 `date` 时为正
pub fn month_distance(now: NaiveDate, date: NaiveDate) -> i32 {
    (now.year() - date.year()) * 12 + (now.month() as i32 - date.month() as i32)
}

impl SeasonalSampler {
    pub fn new(period_months: i32) -> Self {
        Self {
            period_months: period_months.max(1),
        }
    }

    pub fn period_months(&self) -> i32 {
        self.period_months
    }

    pub fn includes(&self, now: NaiveDate, date: NaiveDate) -> bool {
        month_distance(now, date).rem_euclid(self.period_months) == 0
    }

    pub fn sample<'a>(&self, now: NaiveDate, draws: &'a [DrawRecord]) -> SeasonalSample<'a> {
        let mut sample = SeasonalSample::default();
        for draw in draws.iter().filter(|d| self.includes(now, d.date)) {
            if draw.date.year() == now.year() && draw.date.month() == now.month() {
                sample.protected_numbers.extend(draw.all_numbers());
            } else {
                sample.historical_draws.push(draw);
            }
        }
        sample
    }
}
