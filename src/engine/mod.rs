//! 推荐与对奖的纯计算部分, 不做任何 I/O。
//! 随机数由调用方传入, 服务层使用 `rand::thread_rng()`, 测试使用固定种子。

pub mod frequency;
pub mod hit_rate;
pub mod match_evaluator;
pub mod recommender;
pub mod seasonal;

pub use frequency::{FrequencyStats, analyze as analyze_frequency};
pub use hit_rate::{analyze_history, analyze_record, synthetic_history};
pub use match_evaluator::{MatchOutcome, evaluate as evaluate_match, prize_rank};
pub use recommender::{Recommendation, RecommendationEngine};
pub use seasonal::{SeasonalSample, SeasonalSampler, month_distance};
