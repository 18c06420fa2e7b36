mod common;

use anyhow::Result;
use reqwest::StatusCode;

fn authed(req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    req.header("x-auth-user-id", "u-1").header("x-auth-role", "viewer")
}

#[tokio::test]
async fn viewing_a_tenant_returns_its_data() -> Result<()> {
    let _guard = common::SERIAL.lock().await;
    let ctx = common::ensure_context().await?;
    let client = reqwest::Client::new();

    let res = authed(client.get(format!(
        "{}/api/tenants/{}",
        ctx.gateway.base_url,
        common::KNOWN_TENANT
    )))
    .send()
    .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);

    let view = &body["data"];
    assert_eq!(view["tenant"]["id"], common::KNOWN_TENANT);
    assert_eq!(view["tenant"]["name"], "acme-support");
    assert_eq!(view["is_loading"], false);
    assert!(view["error"].is_null());
    Ok(())
}

#[tokio::test]
async fn unknown_tenant_surfaces_normalized_error() -> Result<()> {
    let _guard = common::SERIAL.lock().await;
    let ctx = common::ensure_context().await?;
    let client = reqwest::Client::new();

    let res = authed(client.get(format!(
        "{}/api/tenants/{}",
        ctx.gateway.base_url,
        common::UNKNOWN_TENANT
    )))
    .send()
    .await?;

    // Fetch failures are state, not HTTP errors; the view still renders
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["error"], "FETCH_FAILED");
    assert_eq!(body["data"]["is_loading"], false);
    Ok(())
}

#[tokio::test]
async fn closing_the_view_discards_the_tenant() -> Result<()> {
    let _guard = common::SERIAL.lock().await;
    let ctx = common::ensure_context().await?;
    let client = reqwest::Client::new();

    let res = authed(client.delete(format!("{}/api/tenants/view", ctx.gateway.base_url)))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["data"]["tenant"].is_null());
    assert_eq!(body["data"]["is_loading"], false);
    assert!(body["data"]["error"].is_null());
    Ok(())
}

#[tokio::test]
async fn refresh_refetches_the_bound_tenant() -> Result<()> {
    let _guard = common::SERIAL.lock().await;
    let ctx = common::ensure_context().await?;
    let client = reqwest::Client::new();

    authed(client.get(format!(
        "{}/api/tenants/{}",
        ctx.gateway.base_url,
        common::KNOWN_TENANT
    )))
    .send()
    .await?;

    let before = ctx.mock.tenant_hits.load(std::sync::atomic::Ordering::SeqCst);

    let res = authed(client.post(format!(
        "{}/api/tenants/view/refresh",
        ctx.gateway.base_url
    )))
    .send()
    .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let after = ctx.mock.tenant_hits.load(std::sync::atomic::Ordering::SeqCst);
    assert!(after > before, "refresh did not reach the backend");
    Ok(())
}
