/// TVMaze catalog implementation.
use super::tvmaze_types::{TvMazeEpisode, TvMazeSearchHit, TvMazeShow};
use super::{CatalogError, Episode, Show, ShowCatalog, ShowId};
use crate::config::CatalogConfig;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// Show catalog backed by the TVMaze API.
///
/// Searches go to `<base>/search/shows?q=<query>` and episode lists to
/// `<base>/shows/<id>/episodes`. Every call issues exactly one GET request.
pub struct TvMazeCatalog {
    client: reqwest::Client,
    base_url: Url,
    missing_image_url: String,
}

impl TvMazeCatalog {
    /// Creates a new TVMaze catalog from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot hold path segments or the
    /// HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| CatalogError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidUrl(config.base_url.clone()));
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            missing_image_url: config.missing_image_url.clone(),
        })
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a GET request and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        debug!(%url, "requesting catalog");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::RequestFailed(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| CatalogError::ParseError(e.to_string()))
    }

    /// Converts a TVMaze show to our Show record, substituting the
    /// placeholder when there is no poster.
    fn convert_show(&self, tvmaze_show: TvMazeShow) -> Show {
        Show {
            id: tvmaze_show.id,
            name: tvmaze_show.name,
            summary: tvmaze_show.summary,
            image: tvmaze_show
                .image
                .map(|image| image.original)
                .unwrap_or_else(|| self.missing_image_url.clone()),
        }
    }

    fn convert_episode(tvmaze_episode: TvMazeEpisode) -> Episode {
        Episode {
            id: tvmaze_episode.id,
            name: tvmaze_episode.name,
            season: tvmaze_episode.season,
            number: tvmaze_episode.number,
        }
    }
}

impl ShowCatalog for TvMazeCatalog {
    async fn search_shows(&self, query: &str) -> Result<Vec<Show>, CatalogError> {
        let mut url = self.endpoint(&["search", "shows"])?;
        url.query_pairs_mut().append_pair("q", query);

        let hits: Vec<TvMazeSearchHit> = self.get_json(url).await?;
        let shows: Vec<Show> = hits
            .into_iter()
            .map(|hit| self.convert_show(hit.show))
            .collect();

        info!(query, count = shows.len(), "show search completed");
        Ok(shows)
    }

    async fn get_episodes(&self, show_id: &ShowId) -> Result<Vec<Episode>, CatalogError> {
        let url = self.endpoint(&["shows", show_id.as_str(), "episodes"])?;

        let episodes: Vec<TvMazeEpisode> = self.get_json(url).await?;
        let episodes: Vec<Episode> = episodes.into_iter().map(Self::convert_episode).collect();

        info!(%show_id, count = episodes.len(), "episode list fetched");
        Ok(episodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EpisodeId;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn catalog_for(server: &MockServer) -> TvMazeCatalog {
        let config = CatalogConfig {
            base_url: server.uri(),
            ..CatalogConfig::default()
        };
        TvMazeCatalog::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_search_maps_shows_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/shows"))
            .and(query_param("q", "joker"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "score": 0.9,
                    "show": {
                        "id": 1139,
                        "name": "Joker",
                        "summary": "<p>desc</p>",
                        "image": { "medium": "http://img/1m.jpg", "original": "http://img/1.jpg" },
                        "language": "English"
                    }
                },
                {
                    "score": 0.5,
                    "show": { "id": 7, "name": "Joker Game", "summary": null, "image": null }
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let shows = catalog_for(&server).search_shows("joker").await.unwrap();

        assert_eq!(shows.len(), 2);
        assert_eq!(shows[0].id, ShowId::from(1139));
        assert_eq!(shows[0].name, "Joker");
        assert_eq!(shows[0].summary.as_deref(), Some("<p>desc</p>"));
        assert_eq!(shows[0].image, "http://img/1.jpg");
        assert_eq!(shows[1].id, ShowId::from(7));
        assert_eq!(shows[1].summary, None);
        assert_eq!(shows[1].image, "https://tinyurl.com/tv-missing");
    }

    #[tokio::test]
    async fn test_search_uses_configured_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/shows"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "show": { "id": 1, "name": "No Poster", "summary": "", "image": null } }
            ])))
            .mount(&server)
            .await;

        let config = CatalogConfig {
            base_url: server.uri(),
            missing_image_url: "http://placeholder/none.png".to_string(),
            ..CatalogConfig::default()
        };
        let shows = TvMazeCatalog::new(&config)
            .unwrap()
            .search_shows("anything")
            .await
            .unwrap();

        assert_eq!(shows[0].image, "http://placeholder/none.png");
    }

    #[tokio::test]
    async fn test_search_without_matches_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/shows"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let shows = catalog_for(&server)
            .search_shows("zzzxqqq")
            .await
            .unwrap();
        assert!(shows.is_empty());
    }

    #[tokio::test]
    async fn test_search_query_is_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/shows"))
            .and(query_param("q", "law & order"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        catalog_for(&server)
            .search_shows("law & order")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_search_propagates_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/shows"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let error = catalog_for(&server).search_shows("joker").await.unwrap_err();
        assert!(matches!(error, CatalogError::HttpStatus { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_search_rejects_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/shows"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "name": "flat" }])))
            .mount(&server)
            .await;

        let error = catalog_for(&server).search_shows("joker").await.unwrap_err();
        assert!(matches!(error, CatalogError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_get_episodes_maps_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shows/1139/episodes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 10, "name": "Pilot", "season": 1, "number": 1, "airdate": "2019-01-01" },
                { "id": 11, "name": "Christmas Special", "season": 1, "number": null }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let episodes = catalog_for(&server)
            .get_episodes(&ShowId::from(1139))
            .await
            .unwrap();

        assert_eq!(
            episodes,
            vec![
                Episode {
                    id: EpisodeId::from(10),
                    name: Some("Pilot".to_string()),
                    season: 1,
                    number: Some(1),
                },
                Episode {
                    id: EpisodeId::from(11),
                    name: Some("Christmas Special".to_string()),
                    season: 1,
                    number: None,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_get_episodes_accepts_null_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shows/1139/episodes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 10, "name": "Pilot", "season": 1, "number": 1 },
                { "id": 11, "name": null, "season": 1, "number": 2 }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let episodes = catalog_for(&server)
            .get_episodes(&ShowId::from(1139))
            .await
            .unwrap();

        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].name.as_deref(), Some("Pilot"));
        assert_eq!(episodes[1].id, EpisodeId::from(11));
        assert_eq!(episodes[1].name, None);
        assert_eq!(episodes[1].number, Some(2));
    }

    #[tokio::test]
    async fn test_get_episodes_propagates_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shows/99/episodes"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let error = catalog_for(&server)
            .get_episodes(&ShowId::from(99))
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "HTTP 404 Not Found");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_failure() {
        let config = CatalogConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
            ..CatalogConfig::default()
        };
        let error = TvMazeCatalog::new(&config)
            .unwrap()
            .search_shows("joker")
            .await
            .unwrap_err();
        assert!(matches!(error, CatalogError::RequestFailed(_)));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let config = CatalogConfig {
            base_url: "http://proxy.local/tvmaze/".to_string(),
            ..CatalogConfig::default()
        };
        let catalog = TvMazeCatalog::new(&config).unwrap();
        let url = catalog.endpoint(&["shows", "5", "episodes"]).unwrap();
        assert_eq!(url.as_str(), "http://proxy.local/tvmaze/shows/5/episodes");
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        let config = CatalogConfig {
            base_url: "mailto:someone@example.com".to_string(),
            ..CatalogConfig::default()
        };
        assert!(matches!(
            TvMazeCatalog::new(&config),
            Err(CatalogError::InvalidUrl(_))
        ));
    }
}
