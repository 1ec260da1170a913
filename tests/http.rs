use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct StateView {
    current_count: u64,
    current_phrase: String,
    target_count: u64,
    total_count: u64,
    points: u64,
    level: u64,
    sound_enabled: bool,
    daily_goal: i64,
    weekly_goal: i64,
}

#[derive(Debug, Deserialize)]
struct DayView {
    date: String,
    total_count: u64,
    sessions: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TodayView {
    date: String,
    stats: Option<DayView>,
}

#[derive(Debug, Deserialize)]
struct SaveView {
    saved: bool,
    current_count: u64,
    today: Option<DayView>,
}

#[derive(Debug, Deserialize)]
struct ToggleView {
    enabled: bool,
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
    path.push(format!("tally_app_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/state")).send().await {
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
    let child = Command::new(env!("CARGO_BIN_EXE_tally_app"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
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

async fn get_state(client: &Client, base_url: &str) -> StateView {
    client
        .get(format!("{base_url}/api/state"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn get_today(client: &Client, base_url: &str) -> TodayView {
    client
        .get(format!("{base_url}/api/today"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_increment_advances_counter_and_today() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_state(&client, &server.base_url).await;
    let today_before = get_today(&client, &server.base_url)
        .await
        .stats
        .map_or(0, |day| day.total_count);

    let response = client
        .post(format!("{}/api/increment", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let after = get_state(&client, &server.base_url).await;
    assert_eq!(after.current_count, before.current_count + 1);
    assert_eq!(after.total_count, before.total_count + 1);
    assert_eq!(after.points, before.points + 1);
    assert_eq!(after.level, after.points / 1000 + 1);

    let today = get_today(&client, &server.base_url).await;
    let stats = today.stats.expect("bucket exists after increment");
    assert_eq!(stats.total_count, today_before + 1);
    assert_eq!(stats.date, today.date);
}

#[tokio::test]
async fn http_save_session_adds_the_batch_on_top() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    client
        .post(format!("{}/api/reset", server.base_url))
        .send()
        .await
        .unwrap();
    let before = get_today(&client, &server.base_url).await;
    let (total_before, sessions_before) = before
        .stats
        .map_or((0, 0), |day| (day.total_count, day.sessions.len()));

    client
        .post(format!("{}/api/increment", server.base_url))
        .send()
        .await
        .unwrap();

    let saved: SaveView = client
        .post(format!("{}/api/session/save", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(saved.saved);
    assert_eq!(saved.current_count, 0);
    let today = saved.today.expect("bucket after save");
    // one from the live increment plus the whole session re-added
    assert_eq!(today.total_count, total_before + 2);
    assert_eq!(today.sessions.len(), sessions_before + 1);
}

#[tokio::test]
async fn http_save_session_with_nothing_counted_is_a_noop() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    client
        .post(format!("{}/api/reset", server.base_url))
        .send()
        .await
        .unwrap();

    let saved: SaveView = client
        .post(format!("{}/api/session/save", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(!saved.saved);
}

#[tokio::test]
async fn http_blank_phrase_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_state(&client, &server.base_url).await;

    let response = client
        .post(format!("{}/api/phrase", server.base_url))
        .json(&serde_json::json!({ "phrase": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let after = get_state(&client, &server.base_url).await;
    assert_eq!(after.current_phrase, before.current_phrase);
    assert_eq!(after.current_count, before.current_count);
}

#[tokio::test]
async fn http_zero_target_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/target", server.base_url))
        .json(&serde_json::json!({ "target": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_switching_phrase_resets_the_live_count() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    client
        .post(format!("{}/api/increment", server.base_url))
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/api/phrase", server.base_url))
        .json(&serde_json::json!({ "phrase": "Patience" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let state = get_state(&client, &server.base_url).await;
    assert_eq!(state.current_phrase, "Patience");
    assert_eq!(state.current_count, 0);
}

#[tokio::test]
async fn http_toggle_sound_flips_and_persists_the_flag() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_state(&client, &server.base_url).await;

    let toggled: ToggleView = client
        .post(format!("{}/api/settings/sound", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(toggled.enabled, !before.sound_enabled);

    let after = get_state(&client, &server.base_url).await;
    assert_eq!(after.sound_enabled, !before.sound_enabled);

    // flip back so the suite leaves the flag as it found it
    client
        .post(format!("{}/api/settings/sound", server.base_url))
        .send()
        .await
        .unwrap();
}

#[tokio::test]
async fn http_goals_accept_any_integer() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/goals", server.base_url))
        .json(&serde_json::json!({ "daily": -10, "weekly": 0 }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let state = get_state(&client, &server.base_url).await;
    assert_eq!(state.daily_goal, -10);
    assert_eq!(state.weekly_goal, 0);
}

#[tokio::test]
async fn http_export_import_round_trips_the_snapshot() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    for _ in 0..3 {
        client
            .post(format!("{}/api/increment", server.base_url))
            .send()
            .await
            .unwrap();
    }

    let snapshot: serde_json::Value = client
        .get(format!("{}/api/export", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let exported_total = snapshot["total_count"].as_u64().unwrap();
    let exported_points = snapshot["points"].as_u64().unwrap();

    // drift the live state, then restore the snapshot
    for _ in 0..2 {
        client
            .post(format!("{}/api/increment", server.base_url))
            .send()
            .await
            .unwrap();
    }

    let response = client
        .post(format!("{}/api/import", server.base_url))
        .json(&snapshot)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let state = get_state(&client, &server.base_url).await;
    assert_eq!(state.total_count, exported_total);
    assert_eq!(state.points, exported_points);

    let restored: serde_json::Value = client
        .get(format!("{}/api/export", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(restored, snapshot);
}

#[tokio::test]
async fn http_import_rejects_a_future_schema_version() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let mut snapshot: serde_json::Value = client
        .get(format!("{}/api/export", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    snapshot["version"] = serde_json::json!(99);

    let response = client
        .post(format!("{}/api/import", server.base_url))
        .json(&snapshot)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_wipe_returns_everything_to_defaults() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    client
        .post(format!("{}/api/increment", server.base_url))
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/api/wipe", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let state = get_state(&client, &server.base_url).await;
    assert_eq!(state.current_count, 0);
    assert_eq!(state.total_count, 0);
    assert_eq!(state.points, 0);
    assert_eq!(state.level, 1);
    assert_eq!(state.target_count, 33);
    assert_eq!(state.daily_goal, 300);
    assert_eq!(state.weekly_goal, 2000);

    let today = get_today(&client, &server.base_url).await;
    assert!(today.stats.is_none());
}
