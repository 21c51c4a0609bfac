use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::error::AppError;
use crate::models::*;
use crate::services::WinningService;

#[utoipa::path(
    post,
    path = "/winning/check",
    tag = "winning",
    request_body = CheckWinningRequest,
    responses(
        (status = 200, description = "对奖完成", body = CheckWinningResponse),
        (status = 400, description = "缺少期号"),
        (status = 404, description = "该期尚未开奖")
    )
)]
pub async fn check_winning(
    winning_service: web::Data<WinningService>,
    request: web::Json<CheckWinningRequest>,
) -> Result<HttpResponse> {
    let Some(draw_round) = request.draw_round else {
        return Ok(AppError::ValidationError("draw_round is required".to_string()).error_response());
    };

    match winning_service.check_winning(draw_round).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn winning_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/winning")
            .route("/check", web::post().to(check_winning))
    );
}
