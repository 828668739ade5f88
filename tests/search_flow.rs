use serde_json::json;
use show_finder::{
    AppConfig, CatalogConfig, DispatchOutcome, EpisodesOutcome, PageEvent, SHOW_ID_ATTR,
    SearchOutcome, page_controller,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        catalog: CatalogConfig {
            base_url: server.uri(),
            ..CatalogConfig::default()
        },
        ..AppConfig::default()
    }
}

#[tokio::test]
async fn joker_search_then_episodes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/shows"))
        .and(query_param("q", "joker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "show": {
                    "id": 1139,
                    "name": "Joker",
                    "summary": "<p>desc</p>",
                    "image": { "original": "http://img/1.jpg" }
                }
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shows/1139/episodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Pilot", "season": 1, "number": 1 },
            { "id": 2, "name": "The Punchline", "season": 1, "number": 2 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let controller = page_controller(&config_for(&server)).unwrap();
    controller.with_view_mut(|page| page.set_query("joker"));

    let searched = controller.dispatch(PageEvent::Submit).await.unwrap();
    assert_eq!(
        searched,
        DispatchOutcome::Search(SearchOutcome::Rendered { shows: 1 })
    );

    let button = controller.with_view(|page| {
        let cards = page.show_cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(page.attr(cards[0], SHOW_ID_ATTR), Some("1139"));

        let image = page.find_descendant(cards[0], "card-img-top").unwrap();
        assert_eq!(page.attr(image, "src"), Some("http://img/1.jpg"));
        let title = page.find_descendant(cards[0], "card-title").unwrap();
        assert_eq!(page.text_content(title), "Joker");
        let body = page.find_descendant(cards[0], "card-text").unwrap();
        assert_eq!(page.text_content(body), "<p>desc</p>");

        assert!(!page.episodes_visible());
        page.episode_buttons()[0]
    });

    let clicked = controller.dispatch(PageEvent::Click(button)).await.unwrap();
    assert_eq!(
        clicked,
        DispatchOutcome::Episodes(EpisodesOutcome::Rendered { episodes: 2 })
    );

    let page = controller.into_view();
    assert!(page.episodes_visible());
    assert_eq!(
        page.episode_lines(),
        vec![
            "Pilot (season 1, number 1)",
            "The Punchline (season 1, number 2)"
        ]
    );
    assert!(
        page.to_html()
            .contains("<ul id=\"episodes-list\"><li>Pilot (season 1, number 1)</li>")
    );
}

#[tokio::test]
async fn empty_submit_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let controller = page_controller(&config_for(&server)).unwrap();
    let outcome = controller.dispatch(PageEvent::Submit).await.unwrap();

    assert_eq!(outcome, DispatchOutcome::Search(SearchOutcome::Skipped));
    let html_before = show_finder::Page::new().to_html();
    assert_eq!(controller.with_view(|page| page.to_html()), html_before);
}

#[tokio::test]
async fn upstream_failure_reaches_caller() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/shows"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let controller = page_controller(&config_for(&server)).unwrap();
    let error = controller.handle_search("joker").await.unwrap_err();

    assert_eq!(error.to_string(), "Catalog error: HTTP 502 Bad Gateway");
    controller.with_view(|page| assert!(page.show_cards().is_empty()));
}
