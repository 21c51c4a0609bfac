use actix_web::{App, HttpServer, middleware::Logger, web};
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use chrono::Local;  // timestamp in log lines
use std::sync::Arc;

use lotto_recommender::{
    config::{Config, DatabaseConfig},
    database::{create_pool, run_migrations},
    engine::RecommendationEngine,
    handlers,
    middlewares::create_cors,
    repository::{InMemoryRepository, SeaOrmRepository, SharedRepository},
    services::*,
    swagger::swagger_config,
    AppResult,
};

/// memory:// 使用进程内仓储, 其余地址连接数据库并执行迁移
async fn build_repository(config: &DatabaseConfig) -> AppResult<SharedRepository> {
    if config.is_memory() {
        log::warn!("Using in-memory repository, data is lost on restart");
        return Ok(Arc::new(InMemoryRepository::new()));
    }

    let pool = create_pool(config).await?;
    run_migrations(&pool).await?;
    Ok(Arc::new(SeaOrmRepository::new(pool)))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建仓储
    let repo = build_repository(&config.database)
        .await
        .expect("Failed to initialise repository");

    // 创建服务
    let engine = RecommendationEngine::from_config(&config.recommendation);
    let recommendation_service = RecommendationService::new(repo.clone(), engine.clone());
    let backfill_service = BackfillService::new(
        repo.clone(),
        engine,
        config.recommendation.backfill_window,
    );
    let history_service = HistoryService::new(repo.clone(), config.recommendation.history_limit);
    let winning_service = WinningService::new(repo.clone());
    let draw_service = DrawService::new(repo.clone());
    let generated_numbers_service = GeneratedNumbersService::new(
        repo.clone(),
        config.recommendation.generated_list_limit,
    );

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(recommendation_service.clone()))
            .app_data(web::Data::new(backfill_service.clone()))
            .app_data(web::Data::new(history_service.clone()))
            .app_data(web::Data::new(winning_service.clone()))
            .app_data(web::Data::new(draw_service.clone()))
            .app_data(web::Data::new(generated_numbers_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::recommendation_config)
                    .configure(handlers::winning_config)
                    .configure(handlers::draws_config)
                    .configure(handlers::generated_numbers_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
