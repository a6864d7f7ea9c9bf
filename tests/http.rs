use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct AuditResponse {
    outcome: Value,
    view: Value,
}

#[derive(Debug, Deserialize)]
struct ThemeResponse {
    theme: String,
    saved: Option<String>,
    toggle_label: String,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::Once;
    use std::sync::atomic::{AtomicI32, Ordering};

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("biznes_audit_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/healthz")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_biznes_audit"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .env_remove("AUDIT_SAFE_UP_TO")
        .env_remove("AUDIT_CRITICAL_FROM")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn post_audit(client: &Client, base_url: &str, body: Value) -> AuditResponse {
    let response = client
        .post(format!("{base_url}/api/audit"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

#[tokio::test]
async fn http_audit_without_gaps_is_safe() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let audit = post_audit(
        &client,
        &server.base_url,
        json!({
            "income_goal": "5000",
            "avg_check": 100,
            "conversion_rate": "10",
            "crm": "yes",
            "sales": "yes",
            "smm": "yes"
        }),
    )
    .await;

    assert_eq!(audit.outcome["status"], "complete");
    assert_eq!(audit.outcome["risk_tier"], "SAFE");
    assert_eq!(audit.outcome["penalty_ratio"], 0.0);
    assert_eq!(audit.outcome["recommendation_keys"], json!(["budget_test"]));
    assert_eq!(audit.view["min_budget"], "$400");
    assert_eq!(audit.view["max_budget"], "$750");
    assert_eq!(audit.view["leads_needed"], "500");
    assert!(audit.view["alert"].is_null());
}

#[tokio::test]
async fn http_audit_with_every_gap_is_critical() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let audit = post_audit(
        &client,
        &server.base_url,
        json!({
            "income_goal": 5000,
            "avg_check": 100,
            "conversion_rate": 10,
            "crm": "no",
            "sales": false
        }),
    )
    .await;

    assert_eq!(audit.outcome["risk_tier"], "CRITICAL");
    assert_eq!(
        audit.outcome["recommendation_keys"],
        json!(["crm", "sales", "smm", "budget_test"])
    );
    assert_eq!(audit.view["min_budget"], "$600");
    assert_eq!(audit.view["max_budget"], "$1,125");
    assert_eq!(audit.view["penalty_percent"], 50);
}

#[tokio::test]
async fn http_blank_or_zero_input_is_incomplete() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let audit = post_audit(
        &client,
        &server.base_url,
        json!({ "income_goal": "", "avg_check": 0, "conversion_rate": "10" }),
    )
    .await;
    assert_eq!(audit.outcome["status"], "incomplete");
    assert_eq!(audit.view["complete"], false);
    assert_eq!(audit.view["clients_needed"], "—");

    let query: AuditResponse = client
        .get(format!(
            "{}/api/audit?income_goal=5000&avg_check=100&conversion_rate=10&crm=no&sales=yes&smm=yes",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(query.outcome["risk_tier"], "MEDIUM");
    assert_eq!(query.view["min_budget"], "$480");
}

#[tokio::test]
async fn http_audit_coerces_odd_json_shapes() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let audit = post_audit(
        &client,
        &server.base_url,
        json!({ "income_goal": [1], "avg_check": {}, "conversion_rate": 10, "crm": 7 }),
    )
    .await;
    assert_eq!(audit.outcome["status"], "incomplete");
    assert_eq!(audit.view["status_rows"][0]["good"], false);
}

#[tokio::test]
async fn http_index_renders_prefilled_page() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let page = client
        .get(format!(
            "{}/?income_goal=5000&avg_check=100&conversion_rate=10&crm=yes&sales=yes&smm=yes",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("$750"));
    assert!(page.contains("Test the ad budget"));
}

#[tokio::test]
async fn http_theme_override_persists_and_blocks_system_sync() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let cleared: ThemeResponse = client
        .put(format!("{}/api/theme", server.base_url))
        .json(&json!({ "theme": null, "prefers_dark": true }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cleared.theme, "dark");
    assert!(cleared.saved.is_none());

    let followed: ThemeResponse = client
        .post(format!("{}/api/theme/system", server.base_url))
        .json(&json!({ "prefers_dark": false }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(followed.theme, "light");

    let toggled: ThemeResponse = client
        .post(format!("{}/api/theme/toggle", server.base_url))
        .json(&json!({ "current": "light" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(toggled.theme, "dark");
    assert_eq!(toggled.saved.as_deref(), Some("dark"));
    assert_eq!(toggled.toggle_label, "Switch to light mode");

    let ignored: ThemeResponse = client
        .post(format!("{}/api/theme/system", server.base_url))
        .json(&json!({ "prefers_dark": false }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ignored.theme, "dark");

    let fetched: ThemeResponse = client
        .get(format!("{}/api/theme?prefers_dark=false", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched.theme, "dark");
}

#[tokio::test]
async fn http_unknown_theme_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .put(format!("{}/api/theme", server.base_url))
        .json(&json!({ "theme": "sepia" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap_or_default().contains("sepia"));
}
