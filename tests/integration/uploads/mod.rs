//! Upload endpoint integration tests
//!
//! POST /v1/uploads/{course-image,course-attachment,chapter-video}. Uploads
//! never touch the database, so these run against a lazy pool.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};

use crate::common::{error_code, parse_body, TestApp, TestUser};

const BOUNDARY: &str = "coursecraft-test-boundary";

/// One multipart part: (field name, file name, content type, bytes)
type Part<'a> = (&'a str, Option<&'a str>, Option<&'a str>, &'a [u8]);

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, file_name, content_type, bytes) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", field);
        if let Some(file_name) = file_name {
            disposition.push_str(&format!("; filename=\"{}\"", file_name));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(content_type) = content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(route: &str, user: &TestUser, parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(format!("/v1/uploads/{}", route))
        .header("authorization", format!("Bearer {}", user.jwt))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

#[tokio::test]
async fn test_course_image_upload_is_stored() {
    let app = TestApp::lazy();
    let user = app.new_user();
    let png = b"\x89PNG\r\n\x1a\nfake image bytes";

    let resp = app
        .send(upload_request(
            "course-image",
            &user,
            &[("file", Some("cover photo.png"), Some("image/png"), &png[..])],
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = parse_body(resp).await;
    let key = body["key"].as_str().unwrap();
    assert!(key.starts_with(&format!("course-image/{}/", user.user_id)));
    assert!(key.ends_with("-cover_photo.png"));
    assert_eq!(body["name"], "cover photo.png");
    assert_eq!(body["kind"], "image");
    assert_eq!(body["size_bytes"], png.len());
    assert_eq!(body["uploaded_by"], user.user_id.as_str());
    assert!(body["url"].as_str().unwrap().ends_with(key));

    let stored = app.storage.get(key).unwrap();
    assert_eq!(stored.content_type, "image/png");
    assert_eq!(stored.body, png.to_vec());
}

#[tokio::test]
async fn test_attachment_route_accepts_pdf_and_ignores_extra_fields() {
    let app = TestApp::lazy();
    let user = app.new_user();

    let resp = app
        .send(upload_request(
            "course-attachment",
            &user,
            &[
                ("course_id", None, None, &b"not used"[..]),
                ("file", Some("syllabus.pdf"), Some("application/pdf"), &b"%PDF-1.7"[..]),
            ],
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(parse_body(resp).await["kind"], "pdf");
    assert_eq!(app.storage.keys().len(), 1);
}

#[tokio::test]
async fn test_course_image_rejects_video() {
    let app = TestApp::lazy();
    let user = app.new_user();

    let resp = app
        .send(upload_request(
            "course-image",
            &user,
            &[("file", Some("clip.mp4"), Some("video/mp4"), &b"...."[..])],
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(resp).await, "VALIDATION_ERROR");
    assert!(app.storage.keys().is_empty());
}

#[tokio::test]
async fn test_attachment_over_cap_is_rejected() {
    let app = TestApp::lazy();
    let user = app.new_user();
    let too_big = vec![b'a'; 4 * 1024 * 1024 + 1];

    let resp = app
        .send(upload_request(
            "course-attachment",
            &user,
            &[("file", Some("notes.txt"), Some("text/plain"), too_big.as_slice())],
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(resp).await;
    assert!(body["error"]["message"].as_str().unwrap().contains("4MB"));
    assert!(app.storage.keys().is_empty());
}

#[tokio::test]
async fn test_large_video_attachment_is_streamed_in_parts() {
    let app = TestApp::lazy();
    let user = app.new_user();
    let video: Vec<u8> = (0..12 * 1024 * 1024).map(|i| (i % 251) as u8).collect();

    let resp = app
        .send(upload_request(
            "course-attachment",
            &user,
            &[("file", Some("walkthrough.mp4"), Some("video/mp4"), video.as_slice())],
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = parse_body(resp).await;
    assert_eq!(body["size_bytes"], video.len());

    let stored = app.storage.get(body["key"].as_str().unwrap()).unwrap();
    assert_eq!(stored.parts, 2);
    assert_eq!(stored.body, video);
    assert!(app.storage.open_uploads().is_empty());
}

#[tokio::test]
async fn test_streamed_upload_over_cap_is_aborted() {
    let app = TestApp::lazy();
    let user = app.new_user();
    let too_big = vec![0u8; 16 * 1024 * 1024 + 1];

    let resp = app
        .send(upload_request(
            "course-attachment",
            &user,
            &[("file", Some("long.mp4"), Some("video/mp4"), too_big.as_slice())],
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(app.storage.keys().is_empty());
    assert!(app.storage.open_uploads().is_empty());
}

#[tokio::test]
async fn test_second_file_after_streamed_file_aborts_upload() {
    let app = TestApp::lazy();
    let user = app.new_user();
    let video = vec![7u8; 9 * 1024 * 1024];

    let resp = app
        .send(upload_request(
            "course-attachment",
            &user,
            &[
                ("file", Some("a.mp4"), Some("video/mp4"), video.as_slice()),
                ("file", Some("b.png"), Some("image/png"), &b"b"[..]),
            ],
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(app.storage.keys().is_empty());
    assert!(app.storage.open_uploads().is_empty());
}

#[tokio::test]
async fn test_upload_requires_exactly_one_file() {
    let app = TestApp::lazy();
    let user = app.new_user();

    let resp = app
        .send(upload_request(
            "course-image",
            &user,
            &[("title", None, None, &b"no file here"[..])],
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .send(upload_request(
            "course-image",
            &user,
            &[
                ("file", Some("a.png"), Some("image/png"), &b"a"[..]),
                ("file", Some("b.png"), Some("image/png"), &b"b"[..]),
            ],
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(app.storage.keys().is_empty());
}

#[tokio::test]
async fn test_empty_file_is_rejected() {
    let app = TestApp::lazy();
    let user = app.new_user();

    let resp = app
        .send(upload_request(
            "chapter-video",
            &user,
            &[("file", Some("lesson.mp4"), Some("video/mp4"), &b""[..])],
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::lazy();
    let user = app.new_user();

    let resp = app
        .send(upload_request(
            "avatar",
            &user,
            &[("file", Some("me.png"), Some("image/png"), &b"a"[..])],
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_requires_auth_and_multipart() {
    let app = TestApp::lazy();
    let user = app.new_user();

    let resp = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/v1/uploads/course-image")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/v1/uploads/course-image")
                .header("authorization", format!("Bearer {}", user.jwt))
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
