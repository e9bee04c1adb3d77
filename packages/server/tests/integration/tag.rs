use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn lists_all_tags_sorted_by_name_with_usage_counts() {
    let app = TestApp::spawn().await;
    app.create_blog(&json!({"title": "One", "tags": ["zebra", "apple"]}))
        .await;
    app.create_blog(&json!({"title": "Two", "tags": ["apple"]}))
        .await;

    let res = app.get(routes::TAGS).await;
    assert_eq!(res.status, 200, "{}", res.text);

    let tags = res.data()["tags"].as_array().unwrap();
    let names: Vec<&str> = tags.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["apple", "zebra"]);
    assert_eq!(tags[0]["blogCount"], 2);
    assert_eq!(tags[1]["blogCount"], 1);
}

#[tokio::test]
async fn orphaned_tags_stay_listed_with_zero_usage() {
    let app = TestApp::spawn().await;
    let id = app
        .create_blog(&json!({"title": "Transient", "tags": ["fleeting"]}))
        .await;

    let res = app
        .delete_with_body(&routes::blog_tags(&id), &json!({"tags": ["fleeting"]}))
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let tags = app.get(routes::TAGS).await;
    let entries = tags.data()["tags"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "fleeting");
    assert_eq!(entries[0]["blogCount"], 0);
}
