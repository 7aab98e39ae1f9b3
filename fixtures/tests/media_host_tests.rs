#[cfg(test)]
mod tests {
    use fixtures::media_host::{router, MediaHostState};
    use serde_json::Value;
    use sha1::{Digest, Sha1};

    fn signature(payload: &str) -> String {
        format!("{:x}", Sha1::digest(payload.as_bytes()))
    }

    #[tokio::test]
    async fn destroy_checks_the_signature() {
        let state = MediaHostState::new("demo", "key", "secret").with_image("shop/mug");
        let addr = fixtures::spawn(router(state.clone())).await.unwrap();
        let client = reqwest::Client::new();
        let url = format!("http://{addr}/v1_1/demo/image/destroy");

        let forged = client
            .post(&url)
            .form(&[
                ("public_id", "shop/mug"),
                ("api_key", "key"),
                ("timestamp", "1712000000"),
                ("signature", "not-a-signature"),
            ])
            .send()
            .await
            .unwrap();
        assert_eq!(forged.status(), reqwest::StatusCode::UNAUTHORIZED);
        assert!(state.contains("shop/mug"));

        let signed = signature("public_id=shop/mug&timestamp=1712000000secret");
        let response: Value = client
            .post(&url)
            .form(&[
                ("public_id", "shop/mug"),
                ("api_key", "key"),
                ("timestamp", "1712000000"),
                ("signature", signed.as_str()),
            ])
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(response["result"], "ok");
        assert!(!state.contains("shop/mug"));
    }

    #[tokio::test]
    async fn unknown_cloud_is_not_found() {
        let state = MediaHostState::new("demo", "key", "secret");
        let addr = fixtures::spawn(router(state)).await.unwrap();

        let response = reqwest::Client::new()
            .post(format!("http://{addr}/v1_1/elsewhere/image/destroy"))
            .form(&[
                ("public_id", "shop/mug"),
                ("api_key", "key"),
                ("timestamp", "1712000000"),
                ("signature", "x"),
            ])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn upload_requires_a_file() {
        let state = MediaHostState::new("demo", "key", "secret");
        let addr = fixtures::spawn(router(state)).await.unwrap();

        let form = reqwest::multipart::Form::new()
            .text("api_key", "key")
            .text("timestamp", "1712000000")
            .text("folder", "shop");
        let response = reqwest::Client::new()
            .post(format!("http://{addr}/v1_1/demo/image/upload"))
            .multipart(form)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    }
}
