use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn signing_returns_a_url_and_key_with_the_inferred_extension() {
    let app = TestApp::spawn().await;

    let res = app
        .post(
            routes::UPLOAD_SIGN,
            &json!({"contentType": "image/png", "fileName": "holiday.bin"}),
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    let key = res.data()["key"].as_str().unwrap();
    assert!(key.starts_with("image-"), "unexpected key: {key}");
    assert!(key.ends_with(".png"), "unexpected key: {key}");

    let url = res.data()["url"].as_str().unwrap();
    assert!(url.contains(key), "url should embed the key: {url}");
}

#[tokio::test]
async fn signing_falls_back_to_the_filename_extension() {
    let app = TestApp::spawn().await;

    let res = app
        .post(
            routes::UPLOAD_SIGN,
            &json!({"contentType": "application/x-unknown", "fileName": "clip.MOV"}),
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    let key = res.data()["key"].as_str().unwrap();
    assert!(key.ends_with(".mov"), "unexpected key: {key}");
}

#[tokio::test]
async fn signing_without_a_content_type_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .post(routes::UPLOAD_SIGN, &json!({"contentType": "  "}))
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["error"], "VALIDATION_ERROR");
}
