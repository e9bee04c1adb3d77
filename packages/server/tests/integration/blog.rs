use serde_json::json;

use crate::common::{TestApp, routes};

/// A create payload with content blocks and media deliberately out of order.
fn rich_blog_payload(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "coverImage": "image-100.png",
        "metaTitle": "Meta title",
        "metaDescription": "Meta description",
        "readTime": 7,
        "content": [
            {
                "type": "VIDEOS",
                "order": 2,
                "title": "Clips",
                "videos": [
                    {"url": "clip-b.mp4", "order": 1, "duration": 90},
                    {"url": "clip-a.mp4", "order": 0, "thumbnailUrl": "thumb-a.png"}
                ]
            },
            {
                "type": "TEXT",
                "order": 0,
                "title": "Intro",
                "description": "Opening paragraph"
            },
            {
                "type": "IMAGES",
                "order": 1,
                "images": [
                    {"url": "pic-2.png", "order": 2, "altText": "second"},
                    {"url": "pic-0.png", "order": 0},
                    {"url": "pic-1.png", "order": 1, "caption": "middle"}
                ]
            }
        ],
        "tags": ["Rust", "web"]
    })
}

fn content_orders(data: &serde_json::Value) -> Vec<i64> {
    data["content"]
        .as_array()
        .expect("content should be an array")
        .iter()
        .map(|c| c["order"].as_i64().unwrap())
        .collect()
}

mod blog_creation {
    use super::*;

    #[tokio::test]
    async fn returns_the_full_aggregate_with_ordered_content_and_media() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::BLOGS, &rich_blog_payload("Ordered")).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["success"], true);
        let data = res.data();
        assert_eq!(data["title"], "Ordered");
        assert_eq!(data["viewCount"], 0);
        assert_eq!(content_orders(data), vec![0, 1, 2]);

        // The IMAGES block comes back with its media sorted ascending.
        let images = data["content"][1]["images"].as_array().unwrap();
        let image_urls: Vec<&str> = images.iter().map(|i| i["url"].as_str().unwrap()).collect();
        assert_eq!(image_urls, vec!["pic-0.png", "pic-1.png", "pic-2.png"]);

        let videos = data["content"][2]["videos"].as_array().unwrap();
        let video_urls: Vec<&str> = videos.iter().map(|v| v["url"].as_str().unwrap()).collect();
        assert_eq!(video_urls, vec!["clip-a.mp4", "clip-b.mp4"]);

        assert_eq!(data["tags"], json!(["rust", "web"]));
    }

    #[tokio::test]
    async fn create_then_get_round_trips_the_identical_structure() {
        let app = TestApp::spawn().await;

        let created = app.post(routes::BLOGS, &rich_blog_payload("Round trip")).await;
        assert_eq!(created.status, 201, "{}", created.text);
        let id = created.id();

        let fetched = app.get(&routes::blog(&id)).await;
        assert_eq!(fetched.status, 200, "{}", fetched.text);
        assert_eq!(created.data(), fetched.data());
    }

    #[tokio::test]
    async fn duplicate_and_differently_cased_tags_collapse_to_one() {
        use blog_server::entity::{blog_tag, tag};
        use sea_orm::{EntityTrait, PaginatorTrait};

        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::BLOGS,
                &json!({"title": "Tagged", "tags": ["a", "A", "a"]}),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.data()["tags"], json!(["a"]));

        let tag_rows = tag::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(tag_rows, 1);
        let associations = blog_tag::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(associations, 1);
    }

    #[tokio::test]
    async fn missing_title_is_rejected_before_any_row_is_written() {
        use blog_server::entity::blog;
        use sea_orm::{EntityTrait, PaginatorTrait};

        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::BLOGS,
                &json!({"content": [{"type": "TEXT", "order": 0}], "tags": ["a"]}),
            )
            .await;
        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["error"], "VALIDATION_ERROR");

        let blank = app.post(routes::BLOGS, &json!({"title": "   "})).await;
        assert_eq!(blank.status, 400);
        assert_eq!(blank.body["error"], "VALIDATION_ERROR");

        let rows = blog::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(rows, 0);
    }
}

mod blog_listing {
    use super::*;

    fn ids(res: &crate::common::TestResponse) -> Vec<String> {
        res.data()["blogs"]
            .as_array()
            .expect("blogs should be an array")
            .iter()
            .map(|b| b["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn page_parameter_is_equivalent_to_the_matching_offset() {
        let app = TestApp::spawn().await;
        for i in 0..15 {
            app.create_simple_blog(&format!("Post {i:02}")).await;
        }

        let by_page = app.get(&format!("{}?page=2&limit=10", routes::BLOGS)).await;
        let by_offset = app
            .get(&format!("{}?offset=10&limit=10", routes::BLOGS))
            .await;

        assert_eq!(by_page.status, 200, "{}", by_page.text);
        assert_eq!(ids(&by_page), ids(&by_offset));
        assert_eq!(by_page.data()["page"], 2);
        assert_eq!(by_page.data()["total"], 15);
        assert_eq!(by_page.data()["totalPages"], 2);
        assert_eq!(ids(&by_page).len(), 5);
    }

    #[tokio::test]
    async fn default_page_size_is_ten() {
        let app = TestApp::spawn().await;
        for i in 0..12 {
            app.create_simple_blog(&format!("Post {i:02}")).await;
        }

        let res = app.get(routes::BLOGS).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(ids(&res).len(), 10);
        assert_eq!(res.data()["total"], 12);
        assert_eq!(res.data()["page"], 1);
        assert_eq!(res.data()["totalPages"], 2);
    }

    #[tokio::test]
    async fn search_matches_meta_description_case_insensitively() {
        let app = TestApp::spawn().await;
        let hit = app
            .create_blog(&json!({
                "title": "Plain title",
                "metaDescription": "this mentions FOO somewhere"
            }))
            .await;
        app.create_simple_blog("Unrelated").await;

        let res = app.get(&format!("{}?search=foo", routes::BLOGS)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(ids(&res), vec![hit]);
        assert_eq!(res.data()["total"], 1);
    }

    #[tokio::test]
    async fn search_also_matches_title_and_meta_title() {
        let app = TestApp::spawn().await;
        let by_title = app.create_simple_blog("Learning Rust by example").await;
        let by_meta = app
            .create_blog(&json!({"title": "Other", "metaTitle": "rust tips"}))
            .await;
        app.create_simple_blog("Nothing relevant").await;

        let res = app.get(&format!("{}?search=RUST", routes::BLOGS)).await;
        assert_eq!(res.status, 200);
        let mut found = ids(&res);
        found.sort();
        let mut expected = vec![by_title, by_meta];
        expected.sort();
        assert_eq!(found, expected);
    }

    #[tokio::test]
    async fn tag_filter_matches_blogs_with_any_requested_tag() {
        let app = TestApp::spawn().await;
        app.create_blog(&json!({"title": "Rust only", "tags": ["rust"]}))
            .await;
        app.create_blog(&json!({"title": "Go only", "tags": ["go"]}))
            .await;
        app.create_blog(&json!({"title": "Both", "tags": ["rust", "go"]}))
            .await;
        app.create_simple_blog("Untagged").await;

        let both = app
            .get(&format!("{}?tags=rust&tags=go", routes::BLOGS))
            .await;
        assert_eq!(both.data()["total"], 3);

        let go_only = app.get(&format!("{}?tags=go", routes::BLOGS)).await;
        assert_eq!(go_only.data()["total"], 2);

        // Filter names are normalized like stored ones.
        let cased = app.get(&format!("{}?tags=RUST", routes::BLOGS)).await;
        assert_eq!(cased.data()["total"], 2);
    }

    #[tokio::test]
    async fn tag_and_search_filters_combine_with_and() {
        let app = TestApp::spawn().await;
        let hit = app
            .create_blog(&json!({"title": "Rust async guide", "tags": ["rust"]}))
            .await;
        app.create_blog(&json!({"title": "Rust sync guide", "tags": ["go"]}))
            .await;
        app.create_blog(&json!({"title": "Cooking", "tags": ["rust"]}))
            .await;

        let res = app
            .get(&format!("{}?tags=rust&search=async", routes::BLOGS))
            .await;
        assert_eq!(ids(&res), vec![hit]);
    }

    #[tokio::test]
    async fn unknown_sort_parameters_fall_back_to_created_at_desc() {
        let app = TestApp::spawn().await;
        app.create_simple_blog("First").await;
        let newest = app.create_simple_blog("Second").await;

        let res = app
            .get(&format!(
                "{}?sortBy=nonsense&sortOrder=sideways",
                routes::BLOGS
            ))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(ids(&res)[0], newest);
    }

    #[tokio::test]
    async fn sorts_by_title_ascending_on_request() {
        let app = TestApp::spawn().await;
        app.create_simple_blog("Banana").await;
        app.create_simple_blog("Apple").await;
        app.create_simple_blog("Cherry").await;

        let res = app
            .get(&format!("{}?sortBy=title&sortOrder=asc", routes::BLOGS))
            .await;
        let titles: Vec<&str> = res.data()["blogs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Apple", "Banana", "Cherry"]);
    }

    #[tokio::test]
    async fn sorts_by_view_count_on_request() {
        let app = TestApp::spawn().await;
        app.create_simple_blog("Quiet").await;
        let popular = app.create_simple_blog("Popular").await;
        for _ in 0..3 {
            let res = app.post(&routes::blog_view(&popular), &json!({})).await;
            assert_eq!(res.status, 200);
        }

        let res = app
            .get(&format!("{}?sortBy=viewCount&sortOrder=desc", routes::BLOGS))
            .await;
        assert_eq!(ids(&res)[0], popular);
    }
}

mod blog_get_update_delete {
    use super::*;

    #[tokio::test]
    async fn getting_an_unknown_blog_returns_404() {
        let app = TestApp::spawn().await;
        let res = app
            .get(&routes::blog(&uuid::Uuid::new_v4().to_string()))
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["error"], "NOT_FOUND");
        assert_eq!(res.body["success"], false);
    }

    #[tokio::test]
    async fn update_touches_only_the_supplied_scalar_fields() {
        let app = TestApp::spawn().await;
        let id = app.create_blog(&rich_blog_payload("Before")).await;

        let res = app
            .patch(&routes::blog(&id), &json!({"title": "After"}))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let data = res.data();
        assert_eq!(data["title"], "After");
        // Untouched scalars, content and tags survive.
        assert_eq!(data["metaTitle"], "Meta title");
        assert_eq!(data["readTime"], 7);
        assert_eq!(data["content"].as_array().unwrap().len(), 3);
        assert_eq!(data["tags"], json!(["rust", "web"]));
    }

    #[tokio::test]
    async fn update_can_null_out_a_nullable_field() {
        let app = TestApp::spawn().await;
        let id = app.create_blog(&rich_blog_payload("Nullable")).await;

        let res = app
            .patch(&routes::blog(&id), &json!({"metaTitle": null}))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.data()["metaTitle"].is_null());
    }

    #[tokio::test]
    async fn updating_an_unknown_blog_returns_404() {
        let app = TestApp::spawn().await;
        let res = app
            .patch(
                &routes::blog(&uuid::Uuid::new_v4().to_string()),
                &json!({"title": "Ghost"}),
            )
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn delete_cascades_to_children_but_preserves_shared_tags() {
        use blog_server::entity::{blog_tag, content, content_image, content_video, tag};
        use sea_orm::{EntityTrait, PaginatorTrait};

        let app = TestApp::spawn().await;
        let doomed = app.create_blog(&rich_blog_payload("Doomed")).await;
        let survivor = app
            .create_blog(&json!({"title": "Survivor", "tags": ["rust"]}))
            .await;

        let res = app.delete(&routes::blog(&doomed)).await;
        assert_eq!(res.status, 200, "{}", res.text);

        assert_eq!(app.get(&routes::blog(&doomed)).await.status, 404);

        // All owned rows are gone...
        assert_eq!(content::Entity::find().count(&app.db).await.unwrap(), 0);
        assert_eq!(
            content_image::Entity::find().count(&app.db).await.unwrap(),
            0
        );
        assert_eq!(
            content_video::Entity::find().count(&app.db).await.unwrap(),
            0
        );
        assert_eq!(blog_tag::Entity::find().count(&app.db).await.unwrap(), 1);

        // ...while the shared vocabulary stays intact.
        assert_eq!(tag::Entity::find().count(&app.db).await.unwrap(), 2);
        let other = app.get(&routes::blog(&survivor)).await;
        assert_eq!(other.data()["tags"], json!(["rust"]));
    }

    #[tokio::test]
    async fn deleting_an_unknown_blog_returns_404() {
        let app = TestApp::spawn().await;
        let res = app
            .delete(&routes::blog(&uuid::Uuid::new_v4().to_string()))
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["error"], "NOT_FOUND");
    }
}

mod view_count {
    use super::*;

    #[tokio::test]
    async fn concurrent_increments_lose_no_updates() {
        let app = TestApp::spawn().await;
        let id = app.create_simple_blog("Counted").await;

        let mut handles = Vec::new();
        for _ in 0..20 {
            let client = app.client.clone();
            let url = app.url(&routes::blog_view(&id));
            handles.push(tokio::spawn(async move {
                client.post(url).send().await.unwrap().status().as_u16()
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), 200);
        }

        let res = app.get(&routes::blog(&id)).await;
        assert_eq!(res.data()["viewCount"], 20);
    }

    #[tokio::test]
    async fn incrementing_an_unknown_blog_returns_404() {
        let app = TestApp::spawn().await;
        let res = app
            .post(
                &routes::blog_view(&uuid::Uuid::new_v4().to_string()),
                &serde_json::json!({}),
            )
            .await;
        assert_eq!(res.status, 404);
    }
}

mod tag_maintenance {
    use super::*;

    #[tokio::test]
    async fn adding_tags_is_idempotent() {
        let app = TestApp::spawn().await;
        let id = app
            .create_blog(&json!({"title": "Tagged", "tags": ["a"]}))
            .await;

        let first = app
            .post(&routes::blog_tags(&id), &json!({"tags": ["a", "B"]}))
            .await;
        assert_eq!(first.status, 200, "{}", first.text);
        assert_eq!(first.data()["tags"], json!(["a", "b"]));

        // Repeating the exact call neither fails nor duplicates.
        let second = app
            .post(&routes::blog_tags(&id), &json!({"tags": ["a", "B"]}))
            .await;
        assert_eq!(second.status, 200, "{}", second.text);
        assert_eq!(second.data()["tags"], json!(["a", "b"]));
    }

    #[tokio::test]
    async fn removing_tags_drops_only_the_requested_pairs() {
        use blog_server::entity::tag;
        use sea_orm::{EntityTrait, PaginatorTrait};

        let app = TestApp::spawn().await;
        let id = app
            .create_blog(&json!({"title": "Tagged", "tags": ["a", "b"]}))
            .await;

        let res = app
            .delete_with_body(&routes::blog_tags(&id), &json!({"tags": ["a"]}))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.data()["tags"], json!(["b"]));

        // Removal never shrinks the vocabulary itself.
        assert_eq!(tag::Entity::find().count(&app.db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn tagging_an_unknown_blog_returns_404() {
        let app = TestApp::spawn().await;
        let res = app
            .post(
                &routes::blog_tags(&uuid::Uuid::new_v4().to_string()),
                &json!({"tags": ["a"]}),
            )
            .await;
        assert_eq!(res.status, 404);
    }
}
