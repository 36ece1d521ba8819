//! Test fixtures and factory functions for creating test data.

use axum_test::TestServer;
use serde_json::json;

use super::TestContext;

/// Create a learner register request body.
pub fn register_request(name: Option<&str>) -> serde_json::Value {
    match name {
        Some(n) => json!({ "name": n }),
        None => json!({}),
    }
}

/// Create a flashcard batch request body with `count` numbered cards.
pub fn create_flashcards_request(subject: Option<&str>, count: usize) -> serde_json::Value {
    let cards: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            json!({
                "front": format!("Question {}?", i + 1),
                "back": format!("Answer {}.", i + 1),
            })
        })
        .collect();

    json!({ "subject": subject, "cards": cards })
}

/// Create a review request body.
pub fn review_request(card_id: &str, quality: f64) -> serde_json::Value {
    json!({ "cardId": card_id, "qualityRating": quality })
}

/// Create `count` cards through the API and return their IDs.
pub async fn create_cards(
    server: &TestServer,
    token: &str,
    subject: Option<&str>,
    count: usize,
) -> Vec<String> {
    let response = server
        .post("/api/flashcards")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(token),
        )
        .json(&create_flashcards_request(subject, count))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    body["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect()
}

/// Submit a review through the API and return the response body.
pub async fn review(
    server: &TestServer,
    token: &str,
    card_id: &str,
    quality: f64,
) -> serde_json::Value {
    let response = server
        .post("/api/flashcards/review")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(token),
        )
        .json(&review_request(card_id, quality))
        .await;

    response.assert_status_ok();
    response.json()
}
