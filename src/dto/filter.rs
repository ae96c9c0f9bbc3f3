use serde::Deserialize;
use utoipa::IntoParams;

/// Raw query string of `GET /api/filter`.
///
/// Every parameter is optional and kept as text here; typing and validation happen when the
/// query is parsed into a [`GameFilter`](crate::services::filter::GameFilter).
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilterQuery {
    /// Exact title.
    pub game_title: Option<String>,
    /// Comma-separated genres; a game must carry all of them.
    pub genres: Option<String>,
    /// Exact release year.
    pub release_year: Option<String>,
    /// Exact developer.
    pub developer: Option<String>,
    /// Exact publisher.
    pub publisher: Option<String>,
    /// Exact rating.
    pub metacritic_rating: Option<String>,
    /// Inclusive lower rating bound.
    #[serde(rename = "minRate")]
    pub min_rate: Option<String>,
    /// Inclusive upper rating bound.
    #[serde(rename = "maxRate")]
    pub max_rate: Option<String>,
    /// `term[,genre...]`: case-insensitive substring over title, developer, publisher and
    /// release year, plus genres of which a game must carry at least one.
    pub search: Option<String>,
}
