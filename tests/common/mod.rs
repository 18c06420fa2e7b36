use std::collections::HashMap;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use reqwest::StatusCode as RespStatus;
use serde_json::json;
use tokio::sync::OnceCell;

static CTX: OnceCell<TestContext> = OnceCell::const_new();

/// Serializes tests that observe shared gateway state (the bound tenant
/// view, the notification feed, mock hit counters).
pub static SERIAL: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

/// Tenant id the mock backend answers 404 for
pub const UNKNOWN_TENANT: &str = "00000000-0000-0000-0000-000000000000";
/// Tenant id the mock backend answers normally for
pub const KNOWN_TENANT: &str = "6dbb52a6-51b3-4f94-a031-a781bb0b9f82";

/// Shared counters for asserting whether the gateway reached the backend
pub struct MockState {
    pub reindex_hits: AtomicUsize,
    pub tenant_hits: AtomicUsize,
}

pub struct TestContext {
    pub gateway: GatewayProc,
    pub mock: Arc<MockState>,
    pub mock_url: String,
}

pub struct GatewayProc {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl GatewayProc {
    /// Spawn the already-built gateway binary pointed at `backend_url`.
    /// Assumes debug profile; adjust if you run tests with --release.
    pub fn spawn(backend_url: &str) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new("target/debug/console-gateway");
        cmd.env("CONSOLE_PORT", port.to_string())
            .env("CONSOLE_ENV", "development")
            .env("CONSOLE_DEPLOYMENT", "local")
            .env("CONSOLE_BACKEND_LOCAL_URL", backend_url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = cmd.spawn().context("failed to spawn gateway binary")?;

        Ok(Self { port, base_url, child })
    }

    pub async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline { break; }
            let url = format!("{}/health", self.base_url);
            match client.get(&url).send().await {
                Ok(resp) => {
                    // Ready on OK (backend reachable) or degraded (it is not)
                    if resp.status() == RespStatus::OK || resp.status() == RespStatus::SERVICE_UNAVAILABLE {
                        return Ok(());
                    }
                }
                Err(_) => {}
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("gateway did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for GatewayProc {
    fn drop(&mut self) {
        let _ = self.child.kill();
    }
}

async fn reindex_endpoint(
    State(mock): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    mock.reindex_hits.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

    let tenant_id = query.get("tenant_id").cloned().unwrap_or_default();
    if tenant_id == UNKNOWN_TENANT {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "not found" }))).into_response();
    }

    // Echo the forwarded credential so tests can assert the pass-through
    let api_key = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    Json(json!({
        "status": "queued",
        "tenant_id": tenant_id,
        "api_key": api_key
    }))
    .into_response()
}

async fn tenant_endpoint(
    State(mock): State<Arc<MockState>>,
    Path(id): Path<String>,
) -> Response {
    mock.tenant_hits.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

    if id == UNKNOWN_TENANT {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "tenant not found" }))).into_response();
    }

    Json(json!({
        "id": id,
        "name": "acme-support",
        "plan": "scale",
        "is_active": true,
        "document_count": 42
    }))
    .into_response()
}

async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn spawn_mock_backend() -> Result<(Arc<MockState>, String)> {
    let mock = Arc::new(MockState {
        reindex_hits: AtomicUsize::new(0),
        tenant_hits: AtomicUsize::new(0),
    });
    let app_state = mock.clone();

    // Run the mock backend on a dedicated thread with its own runtime so it
    // outlives any single #[tokio::test]'s runtime (tests each create and tear
    // down their own runtime; a backend spawned onto the first one would die
    // as soon as that test finished, leaving the shared gateway unreachable).
    let (tx, rx) = std::sync::mpsc::channel::<String>();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("mock backend runtime");
        rt.block_on(async move {
            let app = Router::new()
                .route("/admin/reindex-all", post(reindex_endpoint))
                .route("/admin/tenants/:id", get(tenant_endpoint))
                .route("/health", get(health_endpoint))
                .with_state(app_state);

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("failed to bind mock backend");
            let addr = listener.local_addr().expect("mock backend local addr");
            tx.send(format!("http://{}", addr)).expect("send mock addr");
            axum::serve(listener, app).await.expect("mock backend");
        });
    });

    let mock_url = rx.recv().context("mock backend failed to start")?;
    Ok((mock, mock_url))
}

pub async fn ensure_context() -> Result<&'static TestContext> {
    let ctx = CTX
        .get_or_try_init(|| async {
            let (mock, mock_url) = spawn_mock_backend()?;
            let gateway = GatewayProc::spawn(&mock_url)?;
            Ok::<_, anyhow::Error>(TestContext { gateway, mock, mock_url })
        })
        .await?;
    ctx.gateway.wait_ready(Duration::from_secs(10)).await?;
    Ok(ctx)
}

/// Client that surfaces gate redirects instead of following them
pub fn no_redirect_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("client")
}
