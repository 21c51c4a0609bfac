use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::*;
use crate::services::GeneratedNumbersService;

#[utoipa::path(
    post,
    path = "/generated-numbers",
    tag = "generated_numbers",
    request_body = SaveGeneratedNumbersRequest,
    responses(
        (status = 200, description = "保存号码组成功", body = GeneratedNumberSet),
        (status = 400, description = "号码或期号不合法")
    )
)]
pub async fn save_generated_numbers(
    generated_numbers_service: web::Data<GeneratedNumbersService>,
    request: web::Json<SaveGeneratedNumbersRequest>,
) -> Result<HttpResponse> {
    match generated_numbers_service.save(request.into_inner()).await {
        Ok(set) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": set
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/generated-numbers",
    tag = "generated_numbers",
    params(
        ("limit" = Option<u64>, Query, description = "返回条数, 默认 50")
    ),
    responses(
        (status = 200, description = "获取号码组成功", body = Vec<GeneratedNumberSet>)
    )
)]
pub async fn list_generated_numbers(
    generated_numbers_service: web::Data<GeneratedNumbersService>,
    query: web::Query<GeneratedNumbersQuery>,
) -> Result<HttpResponse> {
    match generated_numbers_service.list(query.limit).await {
        Ok(sets) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": sets
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn generated_numbers_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/generated-numbers")
            .route(web::post().to(save_generated_numbers))
            .route(web::get().to(list_generated_numbers))
    );
}
