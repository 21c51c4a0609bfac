use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::*;
use crate::services::{BackfillService, DrawService, RecommendationService, WinningService};

#[utoipa::path(
    post,
    path = "/admin/recommendations/backfill",
    tag = "admin",
    params(
        ("window_size" = Option<usize>, Query, description = "回填最近多少期, 默认 60")
    ),
    responses(
        (status = 200, description = "回填完成", body = BackfillResponse),
        (status = 500, description = "读取开奖数据失败")
    )
)]
pub async fn backfill_recommendations(
    backfill_service: web::Data<BackfillService>,
    query: web::Query<BackfillQuery>,
) -> Result<HttpResponse> {
    match backfill_service.backfill(query.window_size).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result,
            "message": "推荐历史回填完成"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/recommendations/{round}",
    tag = "admin",
    request_body = UpdateRecommendationRequest,
    params(
        ("round" = i32, Path, description = "期号")
    ),
    responses(
        (status = 200, description = "修改推荐成功", body = RecommendationRecord),
        (status = 400, description = "请求参数错误"),
        (status = 404, description = "该期推荐不存在")
    )
)]
pub async fn update_recommendation(
    recommendation_service: web::Data<RecommendationService>,
    path: web::Path<i32>,
    request: web::Json<UpdateRecommendationRequest>,
) -> Result<HttpResponse> {
    match recommendation_service
        .update_recommendation(path.into_inner(), &request)
        .await
    {
        Ok(record) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": record
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/winning/reconcile",
    tag = "admin",
    responses(
        (status = 200, description = "结算完成", body = ReconcileResponse),
        (status = 500, description = "读取待结算号码失败")
    )
)]
pub async fn reconcile_pending(
    winning_service: web::Data<WinningService>,
) -> Result<HttpResponse> {
    match winning_service.reconcile_pending().await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result,
            "message": "待结算号码处理完成"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/draws",
    tag = "admin",
    request_body = IngestDrawRequest,
    responses(
        (status = 200, description = "录入开奖结果成功", body = IngestDrawResponse),
        (status = 400, description = "开奖数据不合法")
    )
)]
pub async fn ingest_draw(
    draw_service: web::Data<DrawService>,
    request: web::Json<IngestDrawRequest>,
) -> Result<HttpResponse> {
    match draw_service.ingest_draw(request.into_inner()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/recommendations/backfill", web::post().to(backfill_recommendations))
            .route("/recommendations/{round}", web::put().to(update_recommendation))
            .route("/winning/reconcile", web::post().to(reconcile_pending))
            .route("/draws", web::post().to(ingest_draw))
    );
}
