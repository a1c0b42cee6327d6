use axum::http::StatusCode;
use secret_reconstruction::GetHealthcheckResponse;

mod common;

#[tokio::test]
async fn test_healthcheck() {
    let test_state = common::setup_instance(common::default_test_config())
        .await
        .unwrap();

    let response = reqwest::get(format!("{}/health", &test_state.server_url))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.json::<GetHealthcheckResponse>().await.unwrap().ok);
}

#[tokio::test]
async fn test_unknown_route() {
    let test_state = common::setup_instance(common::default_test_config())
        .await
        .unwrap();

    let response = reqwest::get(format!("{}/unknown", &test_state.server_url))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
