use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::*;
use crate::services::{HistoryService, RecommendationService};

#[utoipa::path(
    get,
    path = "/recommendations/next",
    tag = "recommendation",
    responses(
        (status = 200, description = "生成下一期推荐成功", body = RecommendationResponse),
        (status = 500, description = "存储失败")
    )
)]
pub async fn next_recommendation(
    recommendation_service: web::Data<RecommendationService>,
) -> Result<HttpResponse> {
    match recommendation_service.get_recommendation().await {
        Ok(recommendation) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": recommendation
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/recommendations/history",
    tag = "recommendation",
    params(
        ("limit" = Option<u64>, Query, description = "返回条数, 默认 10")
    ),
    responses(
        (status = 200, description = "获取推荐历史成功", body = Vec<RecommendationHistoryEntry>)
    )
)]
pub async fn recommendation_history(
    history_service: web::Data<HistoryService>,
    query: web::Query<RecommendationHistoryQuery>,
) -> Result<HttpResponse> {
    match history_service.get_history(query.limit).await {
        Ok(history) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": history
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn recommendation_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/recommendations")
            .route("/next", web::get().to(next_recommendation))
            .route("/history", web::get().to(recommendation_history))
    );
}
