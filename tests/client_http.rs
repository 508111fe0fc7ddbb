use std::time::Duration;

use content_planner::client::{ApiError, ContentClient};
use content_planner::model::{ContentDraft, NewContentPiece};
use reqwest::Url;
use serde_json::json;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn client_for(server: &MockServer) -> ContentClient {
    let base = Url::parse(&server.uri()).unwrap();
    ContentClient::new(base, Duration::from_secs(5)).unwrap()
}

fn piece_json(id: i64, title: &str, format: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "contentPillar": "Education",
        "format": format,
        "status": status,
        "performance": ""
    })
}

#[tokio::test]
async fn list_hits_collection_with_json_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/content"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "title": "Test", "format": "Reel", "status": "Ideation", "contentPillar": "", "performance": "" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let pieces = client_for(&server).list().await.unwrap();
    assert_eq!(pieces.len(), 1);
    assert_eq!(pieces[0].id, 1);
    assert_eq!(pieces[0].title, "Test");
    assert_eq!(pieces[0].format, "Reel");
}

#[tokio::test]
async fn list_error_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/content"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server).list().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "HTTP error! status: 500");
}

#[tokio::test]
async fn create_posts_fields_without_id() {
    let server = MockServer::start().await;
    let new_piece = NewContentPiece {
        title: "New Video".into(),
        format: "Reel".into(),
        status: "Ideation".into(),
        ..Default::default()
    };
    Mock::given(method("POST"))
        .and(path("/api/content"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({
            "title": "New Video",
            "contentPillar": "",
            "format": "Reel",
            "status": "Ideation",
            "performance": ""
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(piece_json(1, "New Video", "Reel", "Ideation")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server).create(&new_piece).await.unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.title, "New Video");
}

#[tokio::test]
async fn create_server_error_is_http_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/content"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create(&NewContentPiece {
            title: "x".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 500, message: None }));
}

#[tokio::test]
async fn update_puts_normalized_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/content/1"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({
            "id": 1,
            "title": "Updated Video",
            "contentPillar": "Education",
            "format": "Story",
            "status": "Scripting",
            "performance": "",
            "notes": null,
            "uploadDate": null,
            "link": null,
            "script": null,
            "shotlist": null,
            "hook": null,
            "caption": null
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(piece_json(1, "Updated Video", "Story", "Scripting")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let draft = ContentDraft {
        title: Some("Updated Video".into()),
        content_pillar: Some("Education".into()),
        format: Some("Story".into()),
        status: Some("Scripting".into()),
        ..Default::default()
    };
    let updated = client_for(&server).update(1, &draft).await.unwrap();
    assert_eq!(updated.format, "Story");
    assert_eq!(updated.status, "Scripting");
}

#[tokio::test]
async fn update_error_keeps_body_text() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/content/9"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Content piece 9 not found"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .update(9, &ContentDraft::default())
        .await
        .unwrap_err();
    match err {
        ApiError::Http { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message.as_deref(), Some("Content piece 9 not found"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn update_error_with_empty_body_has_no_message() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/content/9"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .update(9, &ContentDraft::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 400, message: None }));
}

#[tokio::test]
async fn patch_status_targets_sub_resource() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/content/4/status"))
        .and(body_json(json!({ "status": "Scripting" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(piece_json(4, "Clip", "Reel", "Scripting")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let piece = client_for(&server)
        .patch_status(4, "Scripting")
        .await
        .unwrap();
    assert_eq!(piece.status, "Scripting");
    assert_eq!(piece.title, "Clip");
}

#[tokio::test]
async fn patch_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/content/4/status"))
        .respond_with(ResponseTemplate::new(409).set_body_string("conflict"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .patch_status(4, "Posted")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 409, message: None }));
}

#[tokio::test]
async fn get_by_id_fetches_item() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/content/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2,
            "title": "Business Video 1",
            "contentPillar": "Business",
            "format": "List Video",
            "status": "Needs Scripting",
            "performance": "Medium",
            "notes": "Notes",
            "uploadDate": "2024-03-01T12:30:00",
            "link": null
        })))
        .mount(&server)
        .await;

    let piece = client_for(&server).get_by_id(2).await.unwrap();
    assert_eq!(piece.performance, "Medium");
    assert_eq!(piece.notes.as_deref(), Some("Notes"));
    assert!(piece.link.is_none());
}

#[tokio::test]
async fn get_by_id_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/content/77"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).get_by_id(77).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn remove_sends_delete_and_ignores_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/content/123"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).remove(123).await.unwrap();
}

#[tokio::test]
async fn remove_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/content/123"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).remove(123).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn malformed_json_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/content"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).list().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let base = Url::parse("http://127.0.0.1:1").unwrap();
    let client = ContentClient::new(base, Duration::from_secs(2)).unwrap();
    let err = client.list().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/backend/api/content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let base = Url::parse(&format!("{}/backend", server.uri())).unwrap();
    let client = ContentClient::new(base, Duration::from_secs(5)).unwrap();
    assert!(client.list().await.unwrap().is_empty());
}
