use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use nutthings_storefront::{
    mail::RecordingMailer, routes::build_app, services::auth_service::issue_token,
    state::AppState,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

// None of these requests reach the database; the pool connects lazily.
fn app() -> anyhow::Result<Router> {
    let state = AppState::for_tests("postgres://localhost/none", Arc::new(RecordingMailer::new()))?;
    Ok(build_app(state))
}

async fn send(request: Request<Body>) -> anyhow::Result<(StatusCode, axum::http::HeaderMap, Value)> {
    let response = app()?.oneshot(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, headers, body))
}

fn post_json(uri: &str, body: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))?)
}

#[tokio::test]
async fn unknown_paths_return_404_with_path() -> anyhow::Result<()> {
    let (status, _, body) = send(Request::get("/nope/here").body(Body::empty())?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["path"], "/nope/here");
    Ok(())
}

#[tokio::test]
async fn revalidate_requires_the_secret() -> anyhow::Result<()> {
    let (status, _, body) = send(Request::post("/api/revalidate").body(Body::empty())?).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["ok"], false);

    let (status, _, _) = send(
        Request::post("/api/revalidate")
            .header("x-revalidate-secret", "wrong")
            .body(Body::empty())?,
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn revalidate_defaults_to_root() -> anyhow::Result<()> {
    let (status, _, body) = send(
        Request::post("/api/revalidate?path=/products")
            .header("x-revalidate-secret", "test-revalidate")
            .body(Body::empty())?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["revalidated"], "/products");

    let (_, _, body) = send(
        Request::post("/api/revalidate")
            .header("x-revalidate-secret", "test-revalidate")
            .body(Body::empty())?,
    )
    .await?;
    assert_eq!(body["ok"], true);
    assert_eq!(body["revalidated"], "/");
    Ok(())
}

#[tokio::test]
async fn locale_sets_the_language_cookie() -> anyhow::Result<()> {
    let (status, headers, body) = send(post_json("/api/locale", r#"{"locale":"tr"}"#)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["locale"], "tr");
    let cookie = headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(cookie.starts_with("lang=tr;"));
    assert!(cookie.contains("Max-Age=31536000"));

    let (status, _, body) = send(post_json("/api/locale", r#"{"locale":"fr"}"#)?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_LOCALE");
    Ok(())
}

#[tokio::test]
async fn messages_follow_the_language_cookie() -> anyhow::Result<()> {
    let (status, _, body) = send(
        Request::get("/api/i18n")
            .header(header::COOKIE, "theme=dark; lang=en")
            .body(Body::empty())?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "en");
    assert_eq!(body["data"]["common"]["sort"], "Sort");

    let (_, _, body) = send(Request::get("/api/i18n").body(Body::empty())?).await?;
    assert_eq!(body["message"], "de");
    Ok(())
}

#[tokio::test]
async fn second_testimonial_of_the_day_is_rejected() -> anyhow::Result<()> {
    let request = Request::post("/api/testimonials")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, "tmnls_today=1")
        .body(Body::from(r#"{"name":"Ayla","rating":5,"message":"Lecker"}"#))?;
    let (status, _, body) = send(request).await?;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "rate_limited");
    Ok(())
}

#[tokio::test]
async fn testimonial_without_message_is_rejected_first() -> anyhow::Result<()> {
    let request = Request::post("/api/testimonials")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, "tmnls_today=1")
        .body(Body::from(r#"{"name":"Ayla","message":"   "}"#))?;
    let (status, _, body) = send(request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing fields");
    Ok(())
}

#[tokio::test]
async fn orders_without_items_are_invalid() -> anyhow::Result<()> {
    for body in [
        r#"{"items":[]}"#,
        r#"{}"#,
        r#"{"items":"nope"}"#,
        r#"not json"#,
    ] {
        let (status, _, resp) = send(post_json("/api/orders", body)?).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(resp["error"], "INVALID_ITEMS");
    }

    let zero = format!(r#"{{"items":[{{"product_id":"{}","quantity":0}}]}}"#, Uuid::new_v4());
    let (status, _, resp) = send(post_json("/api/orders", &zero)?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "INVALID_ITEMS");
    Ok(())
}

#[tokio::test]
async fn subscribe_rejects_bad_addresses() -> anyhow::Result<()> {
    for body in [r#"{"email":"not-an-email"}"#, r#"{}"#, r#"{"email":42}"#] {
        let (status, _, resp) = send(post_json("/api/newsletter/subscribe", body)?).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(resp["error"], "invalid_email");
    }
    Ok(())
}

#[tokio::test]
async fn admin_routes_need_an_admin_token() -> anyhow::Result<()> {
    let (status, _, _) = send(Request::get("/api/admin/settings").body(Body::empty())?).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let user_token = issue_token("test-secret", &Uuid::new_v4().to_string(), "user")?;
    let (status, _, _) = send(
        Request::get("/api/admin/settings")
            .header(header::AUTHORIZATION, format!("Bearer {user_token}"))
            .body(Body::empty())?,
    )
    .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let forged = issue_token("other-secret", &Uuid::new_v4().to_string(), "admin")?;
    let (status, _, _) = send(
        Request::get("/api/admin/settings")
            .header(header::AUTHORIZATION, format!("Bearer {forged}"))
            .body(Body::empty())?,
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn admin_reads_current_settings() -> anyhow::Result<()> {
    let token = issue_token("test-secret", &Uuid::new_v4().to_string(), "admin")?;
    let (status, _, body) = send(
        Request::get("/api/admin/settings")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_object());
    Ok(())
}

#[tokio::test]
async fn unknown_product_id_in_path_is_rejected() -> anyhow::Result<()> {
    let (status, _, body) = send(Request::get("/product/not-a-uuid").body(Body::empty())?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ID");
    Ok(())
}

#[tokio::test]
async fn campaign_needs_products() -> anyhow::Result<()> {
    let token = issue_token("test-secret", &Uuid::new_v4().to_string(), "admin")?;
    for body in [r#"{"productIds":[]}"#, r#"{"subject":"Neu"}"#] {
        let request = Request::post("/api/admin/newsletter/campaign")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body))?;
        let (status, _, resp) = send(request).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(resp["error"], "EMPTY_PRODUCT_IDS");
    }
    Ok(())
}

#[tokio::test]
async fn contact_form_validates_before_storing() -> anyhow::Result<()> {
    for body in [
        r#"{"email":"a@b.de","message":"Hallo"}"#,
        r#"{"name":"Ayşe","email":"a@b.de","message":"   "}"#,
        r#"{"name":"Ayşe","message":"Hallo"}"#,
        r#"not json"#,
    ] {
        let (status, _, resp) = send(post_json("/api/contact", body)?).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(resp["error"], "Missing fields");
    }

    let body = r#"{"name":"Ayşe","email":"nope","message":"Hallo"}"#;
    let (status, _, resp) = send(post_json("/api/contact", body)?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "invalid_email");
    Ok(())
}

#[tokio::test]
async fn contact_messages_are_admin_only() -> anyhow::Result<()> {
    let (status, _, _) = send(Request::get("/api/admin/contact-messages").body(Body::empty())?).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}
