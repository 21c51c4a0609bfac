use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::DrawService;

/// 解析 "1166,1165" 形式的期号列表
fn parse_rounds(raw: Option<&str>) -> AppResult<Vec<i32>> {
    let raw = raw.unwrap_or_default();
    let rounds = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i32>()
                .map_err(|_| AppError::ValidationError(format!("Invalid round: {s}")))
        })
        .collect::<AppResult<Vec<i32>>>()?;

    if rounds.is_empty() {
        return Err(AppError::ValidationError("rounds is required".to_string()));
    }
    Ok(rounds)
}

#[utoipa::path(
    get,
    path = "/draws/latest",
    tag = "draws",
    responses(
        (status = 200, description = "获取最新开奖成功", body = DrawRecord),
        (status = 404, description = "暂无开奖数据")
    )
)]
pub async fn latest_draw(
    draw_service: web::Data<DrawService>,
) -> Result<HttpResponse> {
    match draw_service.latest_draw().await {
        Ok(draw) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": draw
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/draws/winning-numbers",
    tag = "draws",
    params(
        ("rounds" = String, Query, description = "逗号分隔的期号, 例如 1166,1165")
    ),
    responses(
        (status = 200, description = "期号 -> 主号码 (不含奖号)"),
        (status = 400, description = "期号格式错误")
    )
)]
pub async fn winning_numbers(
    draw_service: web::Data<DrawService>,
    query: web::Query<WinningNumbersQuery>,
) -> Result<HttpResponse> {
    let rounds = match parse_rounds(query.rounds.as_deref()) {
        Ok(rounds) => rounds,
        Err(e) => return Ok(e.error_response()),
    };

    match draw_service.winning_numbers_by_rounds(&rounds).await {
        Ok(numbers) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": numbers
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/draws/recent",
    tag = "draws",
    params(
        ("before_round" = Option<i32>, Query, description = "基准期号 (不含), 默认最新一期之后"),
        ("count" = Option<usize>, Query, description = "期数, 默认 4")
    ),
    responses(
        (status = 200, description = "最近开奖结果 (新 -> 旧)", body = Vec<DrawRecord>),
        (status = 400, description = "期号不合法")
    )
)]
pub async fn recent_draws(
    draw_service: web::Data<DrawService>,
    query: web::Query<RecentDrawsQuery>,
) -> Result<HttpResponse> {
    match draw_service.recent_draws(query.before_round, query.count).await {
        Ok(draws) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": draws
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn draws_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/draws")
            .route("/latest", web::get().to(latest_draw))
            .route("/recent", web::get().to(recent_draws))
            .route("/winning-numbers", web::get().to(winning_numbers))
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rounds() {
        assert_eq!(parse_rounds(Some("1166, 1165,1164")).unwrap(), vec![1166, 1165, 1164]);
        assert_eq!(parse_rounds(Some("1166,")).unwrap(), vec![1166]);
        assert!(parse_rounds(Some("1166,abc")).is_err());
        assert!(parse_rounds(Some("")).is_err());
        assert!(parse_rounds(None).is_err());
    }
}
