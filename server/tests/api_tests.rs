mod common;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{
            header::{AUTHORIZATION, CONTENT_TYPE, COOKIE},
            Request, StatusCode,
        },
    };
    use fixtures::media_host::{router as media_host, MediaHostState};
    use serde_json::{json, Value};

    use crate::common::*;

    const NO_MEDIA_HOST: &str = "http://127.0.0.1:1";

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn writes_require_authentication() {
        let response = send(
            test_state(NO_MEDIA_HOST),
            json_request("POST", "/api/products", None, json!({ "name": "Mug" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Authentication required." })
        );
    }

    #[tokio::test]
    async fn expired_tokens_are_rejected() {
        let token = fixtures::auth::mint_session_token(ADMIN_ID, None, -3600);
        let response = send(
            test_state(NO_MEDIA_HOST),
            json_request("DELETE", "/api/contact", Some(&token), json!({})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn writes_require_an_admin() {
        let response = send(
            test_state(NO_MEDIA_HOST),
            json_request(
                "POST",
                "/api/about",
                Some(&shopper_token()),
                json!({ "paragraph": "Hello" }),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Admin access required." })
        );
    }

    #[tokio::test]
    async fn malformed_product_ids_are_bad_requests() {
        let response = send(
            test_state(NO_MEDIA_HOST),
            Request::builder()
                .uri("/api/products/64f1c2a9e4b0a1b2c3d4e5f6")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Invalid product ID." })
        );

        let response = send(
            test_state(NO_MEDIA_HOST),
            json_request(
                "PATCH",
                "/api/products/not-an-id",
                Some(&admin_token()),
                json!({ "price": 3.5 }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn product_create_validates_before_saving() {
        let response = send(
            test_state(NO_MEDIA_HOST),
            json_request(
                "POST",
                "/api/products",
                Some(&admin_token()),
                json!({ "price": 12.0, "description": "A mug", "category": "Kitchen" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({ "error": "Name is required." }));

        let response = send(
            test_state(NO_MEDIA_HOST),
            json_request(
                "POST",
                "/api/products",
                Some(&admin_token()),
                json!({
                    "name": "Mug",
                    "price": -1.0,
                    "description": "A mug",
                    "category": "Kitchen",
                }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Price cannot be negative." })
        );
    }

    #[tokio::test]
    async fn malformed_json_renders_an_error_body() {
        let response = send(
            test_state(NO_MEDIA_HOST),
            Request::builder()
                .method("POST")
                .uri("/api/products")
                .header(CONTENT_TYPE, "application/json")
                .header(AUTHORIZATION, format!("Bearer {}", admin_token()))
                .body(Body::from("{\"name\": "))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Malformed JSON body." })
        );
    }

    #[tokio::test]
    async fn wrong_typed_product_fields_are_bad_requests() {
        let cases = [
            (json!({ "price": "twelve" }), "Price must be a number."),
            (json!({ "price": 12, "stock": 2.5 }), "Stock must be a number."),
            (json!({ "name": 5, "price": 12 }), "Invalid request body."),
        ];

        for (fields, message) in cases {
            let mut body = json!({
                "name": "Mug",
                "description": "A mug",
                "category": "Kitchen",
            });
            for (key, value) in fields.as_object().unwrap() {
                body[key] = value.clone();
            }

            let response = send(
                test_state(NO_MEDIA_HOST),
                json_request("POST", "/api/products", Some(&admin_token()), body),
            )
            .await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(json_body(response).await, json!({ "error": message }));
        }
    }

    #[tokio::test]
    async fn about_paragraph_is_required() {
        let response = send(
            test_state(NO_MEDIA_HOST),
            json_request(
                "POST",
                "/api/about",
                Some(&admin_token()),
                json!({ "paragraph": "   " }),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Paragraph is required." })
        );
    }

    #[tokio::test]
    async fn about_ids_are_validated() {
        let response = send(
            test_state(NO_MEDIA_HOST),
            json_request("DELETE", "/api/about/nope", Some(&admin_token()), json!({})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({ "error": "Invalid ID." }));
    }

    #[tokio::test]
    async fn contact_email_is_validated() {
        let response = send(
            test_state(NO_MEDIA_HOST),
            json_request(
                "POST",
                "/api/contact",
                Some(&admin_token()),
                json!({ "name": "Shop", "address": "1 Main St", "email": "shop-at-example" }),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Please use a valid email address" })
        );
    }

    #[tokio::test]
    async fn session_cookie_authenticates_like_a_bearer_token() {
        let response = send(
            test_state(NO_MEDIA_HOST),
            Request::builder()
                .method("POST")
                .uri("/api/about")
                .header(CONTENT_TYPE, "application/json")
                .header(COOKIE, format!("__session={}", admin_token()))
                .body(Body::from(json!({ "paragraph": "" }).to_string()))
                .unwrap(),
        )
        .await;

        // Past authentication and into validation
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_requires_a_file() {
        let boundary = "storefront-boundary";
        let response = send(
            test_state(NO_MEDIA_HOST),
            Request::builder()
                .method("POST")
                .uri("/api/uploads")
                .header(
                    CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .header(AUTHORIZATION, format!("Bearer {}", admin_token()))
                .body(multipart(boundary, &[("note", None, None, &b"hello"[..])]))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Image file is required." })
        );
    }

    #[tokio::test]
    async fn upload_rejects_non_images() {
        let boundary = "storefront-boundary";
        let response = send(
            test_state(NO_MEDIA_HOST),
            Request::builder()
                .method("POST")
                .uri("/api/uploads")
                .header(
                    CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .header(AUTHORIZATION, format!("Bearer {}", admin_token()))
                .body(multipart(
                    boundary,
                    &[("file", Some("notes.txt"), Some("text/plain"), &b"hello"[..])],
                ))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_goes_through_the_media_host() {
        let host = MediaHostState::new(CLOUD_NAME, API_KEY, API_SECRET);
        let addr = fixtures::spawn(media_host(host.clone())).await.unwrap();

        let boundary = "storefront-boundary";
        let response = send(
            test_state(&format!("http://{addr}")),
            Request::builder()
                .method("POST")
                .uri("/api/uploads")
                .header(
                    CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .header(AUTHORIZATION, format!("Bearer {}", admin_token()))
                .body(multipart(
                    boundary,
                    &[("file", Some("mug.png"), Some("image/png"), &b"\x89PNG fake"[..])],
                ))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["imagePublicId"], "storefront/mug_1");
        assert_eq!(
            body["imageUrl"],
            format!(
                "https://res.fixture.test/{CLOUD_NAME}/image/upload/w_800,c_fit,f_auto/v1712000000/storefront/mug_1.png"
            )
        );
        assert_eq!(host.uploads(), vec!["storefront/mug_1".to_string()]);
    }

    #[tokio::test]
    async fn upload_failures_are_bad_gateway() {
        let host = MediaHostState::new(CLOUD_NAME, API_KEY, "some-other-secret");
        let addr = fixtures::spawn(media_host(host)).await.unwrap();

        let boundary = "storefront-boundary";
        let response = send(
            test_state(&format!("http://{addr}")),
            Request::builder()
                .method("POST")
                .uri("/api/uploads")
                .header(
                    CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .header(AUTHORIZATION, format!("Bearer {}", admin_token()))
                .body(multipart(
                    boundary,
                    &[("file", Some("mug.png"), Some("image/png"), &b"\x89PNG fake"[..])],
                ))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Image upload failed." })
        );
    }

    #[tokio::test]
    async fn health_reports_version() {
        let response = send(
            test_state(NO_MEDIA_HOST),
            Request::builder()
                .uri("/_health")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert!(body["version"].is_string());
    }
}
