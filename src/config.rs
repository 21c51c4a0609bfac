use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{AppError, AppResult};

/// 内存仓储的连接串标记
pub const MEMORY_DATABASE_URL: &str = "memory://";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub recommendation: RecommendationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn is_memory(&self) -> bool {
        self.url == MEMORY_DATABASE_URL
    }
}

/// 推荐引擎参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// "最近热号" 统计所用的最近期数
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
    /// 季节抽样周期 (月)
    #[serde(default = "default_seasonal_period_months")]
    pub seasonal_period_months: i32,
    /// 历史回填默认覆盖的期数
    #[serde(default = "default_backfill_window")]
    pub backfill_window: usize,
    /// 推荐历史默认返回条数
    #[serde(default = "default_history_limit")]
    pub history_limit: u64,
    /// 已保存号码列表默认返回条数
    #[serde(default = "default_generated_list_limit")]
    pub generated_list_limit: u64,
}

fn default_recent_window() -> usize {
    6
}

fn default_seasonal_period_months() -> i32 {
    6
}

fn default_backfill_window() -> usize {
    60
}

fn default_history_limit() -> u64 {
    10
}

fn default_generated_list_limit() -> u64 {
    50
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            recent_window: default_recent_window(),
            seasonal_period_months: default_seasonal_period_months(),
            backfill_window: default_backfill_window(),
            history_limit: default_history_limit(),
            generated_list_limit: default_generated_list_limit(),
        }
    }
}

impl Config {
    pub fn from_toml() -> AppResult<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 无配置文件且未提供 DATABASE_URL 时退回内存仓储
                let database_url =
                    get_env("DATABASE_URL").unwrap_or_else(|| MEMORY_DATABASE_URL.to_string());

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    recommendation: RecommendationConfig::default(),
                }
            }
            Err(e) => {
                return Err(AppError::ConfigError(format!(
                    "无法读取配置文件 {config_path}: {e}"
                )));
            }
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn parse(raw: &str) -> AppResult<Self> {
        toml::from_str(raw).map_err(|e| AppError::ConfigError(format!("解析配置文件失败: {e}")))
    }

    /// 环境变量覆盖（即便文件存在时也覆盖）
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("RECOMMEND_RECENT_WINDOW")
            && let Ok(n) = v.parse()
        {
            self.recommendation.recent_window = n;
        }
        if let Ok(v) = env::var("RECOMMEND_SEASONAL_PERIOD_MONTHS")
            && let Ok(n) = v.parse()
        {
            self.recommendation.seasonal_period_months = n;
        }
        if let Ok(v) = env::var("RECOMMEND_BACKFILL_WINDOW")
            && let Ok(n) = v.parse()
        {
            self.recommendation.backfill_window = n;
        }
        if let Ok(v) = env::var("RECOMMEND_HISTORY_LIMIT")
            && let Ok(n) = v.parse()
        {
            self.recommendation.history_limit = n;
        }
        if let Ok(v) = env::var("GENERATED_LIST_LIMIT")
            && let Ok(n) = v.parse()
        {
            self.recommendation.generated_list_limit = n;
        }
    }

    fn validate(&self) -> AppResult<()> {
        if self.recommendation.seasonal_period_months <= 0 {
            return Err(AppError::ConfigError(
                "recommendation.seasonal_period_months 必须为正数".to_string(),
            ));
        }
        Ok(())
    }
}
