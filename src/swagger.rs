use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::GeneratedNumberStatus;
use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::recommendation::next_recommendation,
        handlers::recommendation::recommendation_history,
        handlers::winning::check_winning,
        handlers::draws::latest_draw,
        handlers::draws::recent_draws,
        handlers::draws::winning_numbers,
        handlers::generated_numbers::save_generated_numbers,
        handlers::generated_numbers::list_generated_numbers,
        handlers::admin::backfill_recommendations,
        handlers::admin::update_recommendation,
        handlers::admin::reconcile_pending,
        handlers::admin::ingest_draw,
    ),
    components(
        schemas(
            DrawRecord,
            PrizeTable,
            IngestDrawRequest,
            IngestDrawResponse,
            WinningNumbersQuery,
            RecentDrawsQuery,
            RecommendationRecord,
            RecommendationResponse,
            RecommendationHistoryEntry,
            RecommendationHistoryQuery,
            UpdateRecommendationRequest,
            BackfillQuery,
            BackfillResponse,
            RoundError,
            GeneratedNumberSet,
            GeneratedNumberStatus,
            SaveGeneratedNumbersRequest,
            GeneratedNumbersQuery,
            CheckWinningRequest,
            CheckWinningResponse,
            ReconcileResponse,
            ItemError,
            ApiError,
        )
    ),
    tags(
        (name = "recommendation", description = "Recommendation API"),
        (name = "winning", description = "Winning check API"),
        (name = "draws", description = "Draw results API"),
        (name = "generated_numbers", description = "Saved number sets API"),
        (name = "admin", description = "Administration API"),
    ),
    info(
        title = "Lotto Recommender API",
        version = "1.0.0",
        description = "Lottery recommendation and reconciliation REST API documentation",
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
