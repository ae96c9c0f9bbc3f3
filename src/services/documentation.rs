use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the game catalog.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::games::list_games,
        crate::routes::games::create_game,
        crate::routes::games::get_game,
        crate::routes::games::update_game,
        crate::routes::games::delete_game,
        crate::routes::reports::top_rated,
        crate::routes::reports::worst_rated,
        crate::routes::reports::filter_games,
        crate::routes::reports::developer_stats,
        crate::routes::reports::publisher_stats,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::game::NewGameRequest,
            crate::dto::game::GamePatchRequest,
            crate::dto::game::GameResponse,
            crate::dto::report::GroupStatsResponse,
            crate::dto::common::MessageResponse,
            crate::dto::common::ErrorResponse,
            crate::dao::models::ReleaseYear,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "games", description = "Create, read, update and delete catalog entries"),
        (name = "reports", description = "Rankings, ad-hoc filtering and per-company statistics"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_catalog_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/healthcheck",
            "/api/games",
            "/api/games/{id}",
            "/api/top-rated",
            "/api/top-worst",
            "/api/filter",
            "/api/stats/developers",
            "/api/stats/publishers",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
