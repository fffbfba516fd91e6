use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use configs::{AppConfig, LocalAccount};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

async fn app() -> anyhow::Result<Router> {
    let root = std::env::temp_dir().join(format!("servigraf_auth_{}", Uuid::new_v4().simple()));
    let mut cfg = AppConfig::default();
    cfg.server.data_dir = root.join("data").to_string_lossy().into_owned();
    cfg.server.frontend_dir = root.join("frontend").to_string_lossy().into_owned();
    cfg.backend.accounts = vec![LocalAccount {
        email: "caja@grafos.ec".into(),
        name: "Caja".into(),
        password: "tinta-negra".into(),
    }];
    server::startup::build_app(&cfg).await
}

async fn body_json(res: axum::response::Response) -> anyhow::Result<Value> {
    let bytes = to_bytes(res.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn login_token(app: &Router) -> anyhow::Result<String> {
    let res = app
        .clone()
        .oneshot(json_request("POST", "/auth/login", json!({"email": "caja@grafos.ec", "password": "tinta-negra"})))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await?;
    Ok(body["token"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn wrong_password_is_generic_401() -> anyhow::Result<()> {
    let app = app().await?;
    let res = app
        .oneshot(json_request("POST", "/auth/login", json!({"email": "caja@grafos.ec", "password": "nope"})))
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().get(header::SET_COOKIE).is_none());
    let body = body_json(res).await?;
    assert_eq!(body["error"], "unauthorized");
    assert_eq!(body["detail"], "login failed");
    Ok(())
}

#[tokio::test]
async fn malformed_login_is_400() -> anyhow::Result<()> {
    let app = app().await?;
    let res = app.clone().oneshot(json_request("POST", "/auth/login", json!({"email": "caja"}))).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .oneshot(json_request("POST", "/auth/login", json!({"email": "caja", "password": "x"})))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await?["error"], "validation");
    Ok(())
}

#[tokio::test]
async fn bearer_token_opens_api() -> anyhow::Result<()> {
    let app = app().await?;
    let token = login_token(&app).await?;
    assert_eq!(token.len(), 64);

    let req = Request::builder()
        .uri("/api/inks")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())?;
    let res = app.clone().oneshot(req).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let page = body_json(res).await?;
    assert_eq!(page["total"], 0);
    assert_eq!(page["totalPages"], 1);

    let req = Request::builder()
        .uri("/auth/me")
        .header(header::COOKIE, format!("session={token}"))
        .body(Body::empty())?;
    let res = app.oneshot(req).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await?["name"], "Caja");
    Ok(())
}

#[tokio::test]
async fn non_bearer_authorization_is_rejected() -> anyhow::Result<()> {
    let app = app().await?;
    let token = login_token(&app).await?;
    let req = Request::builder()
        .uri("/api/products")
        .header(header::AUTHORIZATION, format!("Basic {token}"))
        .header(header::COOKIE, format!("session={token}"))
        .body(Body::empty())?;
    let res = app.oneshot(req).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn validation_and_missing_records_map_to_json_errors() -> anyhow::Result<()> {
    let app = app().await?;
    let token = login_token(&app).await?;
    let auth = format!("Bearer {token}");

    let mut req = json_request("POST", "/api/payroll", json!({
        "companyId": "c1", "employeeName": "Luis", "period": "2024-13", "baseSalary": 460.0
    }));
    req.headers_mut().insert(header::AUTHORIZATION, auth.parse()?);
    let res = app.clone().oneshot(req).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await?;
    assert_eq!(body["error"], "validation");
    assert!(body["detail"].as_str().unwrap_or_default().contains("period"));

    let req = Request::builder()
        .method("DELETE")
        .uri("/api/suppliers/nope")
        .header(header::AUTHORIZATION, &auth)
        .body(Body::empty())?;
    let res = app.oneshot(req).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(res).await?["error"], "not_found");
    Ok(())
}

#[tokio::test]
async fn schema_lists_every_resource() -> anyhow::Result<()> {
    let app = app().await?;
    let res = app.oneshot(Request::builder().uri("/meta/schema").body(Body::empty())?).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await?;
    let slugs: Vec<&str> = body["resources"]
        .as_array()
        .map(|a| a.iter().filter_map(|r| r["slug"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(slugs, ["companies", "clients", "products", "inks", "payroll", "suppliers", "orders", "invoices"]);
    assert_eq!(body["resources"][6]["choices"]["status"][0], "pending");
    Ok(())
}

#[tokio::test]
async fn uploads_above_two_mib_are_accepted() -> anyhow::Result<()> {
    let app = app().await?;
    let token = login_token(&app).await?;
    let artwork = vec![b'x'; 3 * 1024 * 1024];
    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/files")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/pdf")
                .header("x-file-name", "arte-final.pdf")
                .body(Body::from(artwork))?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(body_json(res).await?["sizeOriginal"], 3 * 1024 * 1024);
    Ok(())
}

#[tokio::test]
async fn oversized_upload_is_json_413() -> anyhow::Result<()> {
    let root = std::env::temp_dir().join(format!("servigraf_auth_{}", Uuid::new_v4().simple()));
    let mut cfg = AppConfig::default();
    cfg.server.data_dir = root.join("data").to_string_lossy().into_owned();
    cfg.server.frontend_dir = root.join("frontend").to_string_lossy().into_owned();
    cfg.server.max_upload_bytes = 1024;
    cfg.backend.accounts =
        vec![LocalAccount { email: "caja@grafos.ec".into(), name: "Caja".into(), password: "tinta-negra".into() }];
    let app = server::startup::build_app(&cfg).await?;
    let token = login_token(&app).await?;

    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/files")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header("x-file-name", "big.bin")
                .body(Body::from(vec![0u8; 4096]))?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(res.headers()[header::CONTENT_TYPE].to_str()?.starts_with("application/json"));
    assert_eq!(body_json(res).await?["error"], "payload_too_large");
    Ok(())
}

#[tokio::test]
async fn unknown_api_path_is_json_404_behind_session() -> anyhow::Result<()> {
    let app = app().await?;
    let res = app.clone().oneshot(Request::builder().uri("/api/nope").body(Body::empty())?).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(res).await?["error"], "unauthorized");

    let token = login_token(&app).await?;
    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/nope/deeper")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(res).await?["error"], "not_found");
    Ok(())
}

#[tokio::test]
async fn stale_session_logout_clears_cookie() -> anyhow::Result<()> {
    let app = app().await?;
    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .header(header::COOKIE, "session=forgotten-by-backend")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let cookie = res.headers()[header::SET_COOKIE].to_str()?.to_string();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("Max-Age=0"));
    assert_eq!(body_json(res).await?["error"], "unauthorized");
    Ok(())
}
