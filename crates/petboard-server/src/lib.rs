//! HTTP server for petboard.
//!
//! Serves the listing page and the four form endpoints. Every mutation is a
//! read-modify-write of the whole persisted document followed by a redirect
//! to `/`; outcomes reach the user as flash notices on the next page.

pub mod config;
pub mod error;
pub mod flash;
pub mod form;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;
pub mod view;

pub use config::{ServerConfig, SECRET_KEY_ENV};
pub use error::{ServerError, ServerResult};
pub use flash::{Flash, FlashCategory, FlashKey};
pub use server::PetboardServer;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use axum::Router;
    use petboard_store::{InMemoryRecordStore, JsonFileStore, RecordStore};
    use petboard_types::{PetDraft, PetRecord};
    use petboard_upload::InMemoryUploader;
    use tower::util::ServiceExt;

    const BOUNDARY: &str = "petboard-test-boundary";

    struct Harness {
        app: Router,
        store: Arc<InMemoryRecordStore>,
        uploader: Arc<InMemoryUploader>,
    }

    fn harness_with(records: Vec<PetRecord>, uploader: InMemoryUploader) -> Harness {
        let store = Arc::new(InMemoryRecordStore::with_records(records));
        let uploader = Arc::new(uploader);
        let state = AppState::new(store.clone(), uploader.clone(), FlashKey::new("test-secret"));
        Harness {
            app: router::build_router(state),
            store,
            uploader,
        }
    }

    fn harness(records: Vec<PetRecord>) -> Harness {
        harness_with(records, InMemoryUploader::new())
    }

    fn rex() -> PetRecord {
        PetDraft::new("Rex", "Lab", "3").into_record("https://x/y.png")
    }

    fn multipart(fields: &[(&str, &str)], photo: Option<(&str, &str)>) -> Request<Body> {
        multipart_with_data(fields, photo, "PHOTO-BYTES")
    }

    fn multipart_with_data(
        fields: &[(&str, &str)],
        photo: Option<(&str, &str)>,
        data: &str,
    ) -> Request<Body> {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        if let Some((filename, content_type)) = photo {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"{filename}\"\r\n\
                 Content-Type: {content_type}\r\n\r\n{data}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn assert_redirect(response: &Response) {
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/");
    }

    /// `name=value` part of the response's Set-Cookie header.
    fn cookie_pair(response: &Response) -> Option<String> {
        response
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }

    // -----------------------------------------------------------------------
    // Listing
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn health_endpoint() {
        let h = harness(vec![]);
        let response = h.app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), 200);
        assert!(body_text(response).await.contains("\"status\":\"ok\""));
    }

    #[tokio::test]
    async fn listing_shows_both_groups() {
        let mut adopted = PetDraft::new("Tom", "Tabby", "2").into_record("https://x/t.gif");
        adopted.adopted = true;
        let h = harness(vec![rex(), adopted]);

        let response = h.app.oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), 200);
        assert!(response.headers().get(SET_COOKIE).is_none());
        let html = body_text(response).await;
        assert!(html.contains("<strong>Rex</strong>"));
        assert!(html.contains("<strong>Tom</strong>"));
    }

    #[tokio::test]
    async fn unreadable_store_renders_empty_listing() {
        let store = Arc::new(InMemoryRecordStore::failing());
        let state = AppState::new(
            store,
            Arc::new(InMemoryUploader::new()),
            FlashKey::new("test-secret"),
        );
        let app = router::build_router(state);

        let response = app.oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), 200);
        assert!(body_text(response).await.contains("No pets available right now."));
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn create_appends_unadopted_pet() {
        let h = harness(vec![rex()]);
        let request = multipart(
            &[("name", " Bella "), ("breed", "Beagle"), ("age", "1")],
            Some(("bella.JPG", "image/jpeg")),
        );

        let response = h.app.oneshot(request).await.unwrap();
        assert_redirect(&response);
        assert!(cookie_pair(&response).unwrap().starts_with("petboard_flash="));

        let pets = h.store.snapshot();
        assert_eq!(pets.len(), 2);
        let bella = &pets[1];
        assert_eq!(bella.name, "Bella");
        assert!(!bella.adopted);
        assert!(bella
            .image_url
            .starts_with("https://pet-adoption-uploads.s3.us-east-2.amazonaws.com/img/"));
        assert!(bella.image_url.ends_with(".jpg"));

        assert_eq!(h.uploader.upload_count(), 1);
        let key = &h.uploader.keys()[0];
        assert_eq!(h.uploader.get(key).unwrap().data.as_ref(), b"PHOTO-BYTES");
    }

    #[tokio::test]
    async fn create_missing_field_skips_upload() {
        let h = harness(vec![rex()]);
        let request = multipart(
            &[("name", "Bella"), ("breed", ""), ("age", "1")],
            Some(("bella.png", "image/png")),
        );

        let response = h.app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), 200);
        let html = body_text(response).await;
        assert!(html.contains(form::MISSING_FIELDS));
        // Current listing is still shown next to the error.
        assert!(html.contains("<strong>Rex</strong>"));

        assert_eq!(h.uploader.upload_count(), 0);
        assert_eq!(h.store.len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_disallowed_extension_before_upload() {
        let h = harness(vec![]);
        let request = multipart(
            &[("name", "Bella"), ("breed", "Beagle"), ("age", "1")],
            Some(("bella.txt", "text/plain")),
        );

        let response = h.app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), 200);
        assert!(body_text(response).await.contains(form::UNSUPPORTED_TYPE));
        assert_eq!(h.uploader.upload_count(), 0);
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn create_reports_all_errors() {
        let h = harness(vec![]);
        let request = multipart(&[("name", "Bella")], None);

        let html = body_text(h.app.oneshot(request).await.unwrap()).await;
        assert!(html.contains(form::MISSING_FIELDS));
        assert!(html.contains(form::MISSING_PHOTO));
    }

    #[tokio::test]
    async fn create_with_empty_filename_needs_photo() {
        let h = harness(vec![]);
        let request = multipart(
            &[("name", "Bella"), ("breed", "Beagle"), ("age", "1")],
            Some(("", "application/octet-stream")),
        );

        let html = body_text(h.app.oneshot(request).await.unwrap()).await;
        assert!(html.contains(form::MISSING_PHOTO));
        assert_eq!(h.uploader.upload_count(), 0);
    }

    #[tokio::test]
    async fn create_upload_failure_creates_nothing() {
        let h = harness_with(vec![rex()], InMemoryUploader::failing("bucket unavailable"));
        let request = multipart(
            &[("name", "Bella"), ("breed", "Beagle"), ("age", "1")],
            Some(("bella.png", "image/png")),
        );

        let response = h.app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), 200);
        let html = body_text(response).await;
        assert!(html.contains("Failed to upload image to S3: "));
        assert!(html.contains("bucket unavailable"));
        assert_eq!(h.store.len(), 1);
    }

    #[tokio::test]
    async fn create_without_multipart_is_validation_failure() {
        let h = harness(vec![]);
        let response = h
            .app
            .oneshot(form_post("/", "name=Bella&breed=Beagle&age=1"))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert!(body_text(response).await.contains(form::MISSING_PHOTO));
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn create_oversized_photo_reports_size() {
        let store = Arc::new(InMemoryRecordStore::new());
        let uploader = Arc::new(InMemoryUploader::new());
        let state = AppState::new(store.clone(), uploader.clone(), FlashKey::new("test-secret"))
            .with_upload_limit(1024);
        let app = router::build_router(state);

        let photo = "x".repeat(4096);
        let request = multipart_with_data(
            &[("name", "Rex"), ("breed", "Lab"), ("age", "3")],
            Some(("rex.png", "image/png")),
            &photo,
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), 200);
        let html = body_text(response).await;
        assert!(html.contains(form::FILE_TOO_LARGE));
        assert!(!html.contains(form::MISSING_FIELDS));
        assert!(!html.contains(form::MISSING_PHOTO));
        assert_eq!(uploader.upload_count(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn create_truncated_body_reports_unreadable_form() {
        let h = harness(vec![]);
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nRex\r\n\
             --{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"rex.png\"\r\n\
             Content-Type: image/png\r\n\r\nPART"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap();

        let html = body_text(h.app.oneshot(request).await.unwrap()).await;
        assert!(html.contains(form::UNREADABLE_FORM));
        assert!(!html.contains(form::MISSING_PHOTO));
        assert_eq!(h.uploader.upload_count(), 0);
        assert!(h.store.is_empty());
    }

    // -----------------------------------------------------------------------
    // Adopt / delete / edit
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn adopt_twice_stays_adopted() {
        let h = harness(vec![rex()]);

        let first = h.app.clone().oneshot(form_post("/adopt", "pet_index=0")).await.unwrap();
        assert_redirect(&first);
        assert!(cookie_pair(&first).is_some());

        let second = h.app.oneshot(form_post("/adopt", "pet_index=0")).await.unwrap();
        assert_redirect(&second);

        assert!(h.store.snapshot()[0].adopted);
    }

    #[tokio::test]
    async fn delete_only_record() {
        let h = harness(vec![rex()]);
        let response = h.app.oneshot(form_post("/delete", "pet_index=0")).await.unwrap();
        assert_redirect(&response);
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn delete_by_stable_id() {
        let other = PetDraft::new("Tom", "Tabby", "2").into_record("https://x/t.gif");
        let id = other.id;
        let h = harness(vec![rex(), other]);

        // A stale index points at Rex; the id still targets Tom.
        let body = format!("pet_id={id}&pet_index=0");
        let response = h.app.oneshot(form_post("/delete", &body)).await.unwrap();
        assert_redirect(&response);

        let pets = h.store.snapshot();
        assert_eq!(pets.len(), 1);
        assert_eq!(pets[0].name, "Rex");
    }

    #[tokio::test]
    async fn record_added_without_id_is_addressable_by_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pets.json");
        let store = Arc::new(JsonFileStore::open(&path).unwrap());
        let app = router::build_router(AppState::new(
            store.clone(),
            Arc::new(InMemoryUploader::new()),
            FlashKey::new("test-secret"),
        ));

        // Another writer appends a record in the five-field format.
        std::fs::write(
            &path,
            r#"[{"name":"Rex","breed":"Lab","age":"3","image_url":"https://x/y.png","adopted":false}]"#,
        )
        .unwrap();

        let html = body_text(app.clone().oneshot(get("/")).await.unwrap()).await;
        let marker = "name=\"pet_id\" value=\"";
        let start = html.find(marker).unwrap() + marker.len();
        let rendered_id = &html[start..start + html[start..].find('"').unwrap()];

        let body = format!("pet_id={rendered_id}&pet_index=0");
        let response = app.oneshot(form_post("/adopt", &body)).await.unwrap();
        assert_redirect(&response);
        assert!(cookie_pair(&response).is_some());
        assert!(store.load().unwrap()[0].adopted);
    }

    #[tokio::test]
    async fn edit_name_only() {
        let h = harness(vec![rex()]);
        let before = h.store.snapshot()[0].clone();

        let response = h
            .app
            .oneshot(form_post("/edit", "pet_index=0&edit_name=Max"))
            .await
            .unwrap();
        assert_redirect(&response);

        let after = h.store.snapshot()[0].clone();
        assert_eq!(after.name, "Max");
        assert_eq!(after.breed, before.breed);
        assert_eq!(after.age, before.age);
        assert_eq!(after.image_url, before.image_url);
        assert_eq!(after.adopted, before.adopted);
    }

    #[tokio::test]
    async fn edit_all_fields() {
        let h = harness(vec![rex()]);
        let response = h
            .app
            .oneshot(form_post(
                "/edit",
                "pet_index=0&edit_name=Max&edit_breed=Poodle&edit_age=4",
            ))
            .await
            .unwrap();
        assert_redirect(&response);

        let pet = &h.store.snapshot()[0];
        assert_eq!((pet.name.as_str(), pet.breed.as_str(), pet.age.as_str()), ("Max", "Poodle", "4"));
    }

    #[tokio::test]
    async fn out_of_range_and_malformed_references_are_noops() {
        for uri in ["/adopt", "/delete", "/edit"] {
            for body in ["pet_index=-1", "pet_index=1", "pet_index=abc", "", "pet_id=junk"] {
                let h = harness(vec![rex()]);
                let before = h.store.snapshot();
                let body = format!("{body}&edit_name=Max");

                let response = h.app.oneshot(form_post(uri, &body)).await.unwrap();
                assert_redirect(&response);
                assert!(cookie_pair(&response).is_none(), "{uri} {body}");
                assert_eq!(h.store.snapshot(), before, "{uri} {body}");
            }
        }
    }

    #[tokio::test]
    async fn mutation_without_form_body_redirects() {
        let h = harness(vec![rex()]);
        let request = Request::builder()
            .method("POST")
            .uri("/adopt")
            .body(Body::empty())
            .unwrap();
        let response = h.app.oneshot(request).await.unwrap();
        assert_redirect(&response);
        assert!(!h.store.snapshot()[0].adopted);
    }

    #[tokio::test]
    async fn mutation_on_unreadable_store_does_not_write() {
        let store = Arc::new(InMemoryRecordStore::failing());
        let state = AppState::new(
            store.clone(),
            Arc::new(InMemoryUploader::new()),
            FlashKey::new("test-secret"),
        );
        let app = router::build_router(state);

        let response = app.oneshot(form_post("/delete", "pet_index=0")).await.unwrap();
        assert_redirect(&response);
        assert!(cookie_pair(&response).is_none());
        assert!(store.snapshot().is_empty());
    }

    // -----------------------------------------------------------------------
    // Flash notices
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn notice_is_shown_once() {
        let h = harness(vec![rex()]);

        let response = h.app.clone().oneshot(form_post("/delete", "pet_index=0")).await.unwrap();
        let cookie = cookie_pair(&response).unwrap();

        let request = Request::builder()
            .uri("/")
            .header(COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        let page = h.app.oneshot(request).await.unwrap();
        let cleared = page.headers()[SET_COOKIE].to_str().unwrap().to_string();
        assert!(cleared.contains("Max-Age=0"));
        assert!(body_text(page).await.contains(handler::PET_DELETED));
    }

    #[tokio::test]
    async fn forged_notice_is_not_shown() {
        let h = harness(vec![]);
        let forged = FlashKey::new("other-secret").encode(&[Flash::success("forged!")]);
        let request = Request::builder()
            .uri("/")
            .header(COOKIE, format!("petboard_flash={forged}"))
            .body(Body::empty())
            .unwrap();
        let html = body_text(h.app.oneshot(request).await.unwrap()).await;
        assert!(!html.contains("forged!"));
    }

    // -----------------------------------------------------------------------
    // File-backed end to end
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn file_backed_create_then_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pets.json");
        let store = Arc::new(JsonFileStore::open(&path).unwrap());
        let state = AppState::new(
            store.clone(),
            Arc::new(InMemoryUploader::new()),
            FlashKey::new("test-secret"),
        );
        let app = router::build_router(state);

        let request = multipart(
            &[("name", "Bella"), ("breed", "Beagle"), ("age", "1")],
            Some(("bella.gif", "image/gif")),
        );
        assert_redirect(&app.clone().oneshot(request).await.unwrap());

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains("\"name\": \"Bella\""));
        assert!(on_disk.contains("\"adopted\": false"));
        assert_eq!(store.load().unwrap().len(), 1);

        let html = body_text(app.oneshot(get("/")).await.unwrap()).await;
        assert!(html.contains("<strong>Bella</strong>"));
    }
}
