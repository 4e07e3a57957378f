use reqwest::{Client, StatusCode};
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tokio::time::sleep;

const PINNED_TODAY: &str = "2024-03-15";

struct TestServer {
    base_url: String,
    db_path: PathBuf,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_file(&self.db_path);
    }
}

#[cfg(unix)]
mod cleanup {
    use once_cell::sync::Lazy;
    use std::sync::{Mutex, Once};

    static REGISTER: Once = Once::new();
    static PIDS: Lazy<Mutex<Vec<i32>>> = Lazy::new(|| Mutex::new(Vec::new()));

    pub fn register(pid: u32) {
        if let Ok(mut pids) = PIDS.lock() {
            pids.push(pid as i32);
        }
        REGISTER.call_once(|| unsafe {
            libc::atexit(on_exit);
        });
    }

    extern "C" fn on_exit() {
        if let Ok(pids) = PIDS.lock() {
            for &pid in pids.iter() {
                unsafe {
                    libc::kill(pid, libc::SIGTERM);
                }
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

fn unique_db_path() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "challenge_calendar_http_{}_{}.sqlite",
        std::process::id(),
        nanos
    ));
    path
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/")).send().await {
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

/// Starts a server on a fresh database with the clock pinned to March 2024.
async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let db_path = unique_db_path();
    let child = Command::new(env!("CARGO_BIN_EXE_challenge_calendar"))
        .env("PORT", port.to_string())
        .env("CHALLENGE_DB_PATH", &db_path)
        .env("CHALLENGE_TODAY", PINNED_TODAY)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        db_path,
        child,
    }
}

async fn get_index(client: &Client, server: &TestServer) -> String {
    let resp = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.text().await.unwrap()
}

async fn post_toggle(client: &Client, server: &TestServer, path: &str) -> reqwest::Response {
    client
        .post(format!("{}/toggle/{path}", server.base_url))
        .send()
        .await
        .unwrap()
}

fn cell<'a>(page: &'a str, day: u32) -> &'a str {
    let start = page
        .find(&format!("<button id=\"day-{day}\""))
        .unwrap_or_else(|| panic!("cell for day {day} missing"));
    let end = page[start..].find("</button>").unwrap() + start;
    &page[start..end]
}

#[tokio::test]
async fn http_index_renders_seeded_month() {
    let server = spawn_server().await;
    let client = Client::new();

    let page = get_index(&client, &server).await;
    assert!(page.contains("March 2024"));
    assert_eq!(page.matches("<button id=\"day-").count(), 31);
    assert_eq!(page.matches("class=\"day todo\"").count(), 31);
    assert_eq!(page.matches("class=\"day done\"").count(), 0);
    // 1 March 2024 is a Friday: four blanks on a Monday-first grid.
    assert_eq!(page.matches("class=\"day blank\"").count(), 4);

    // A reload does not seed again.
    let again = get_index(&client, &server).await;
    assert_eq!(again.matches("<button id=\"day-").count(), 31);
}

#[tokio::test]
async fn http_toggle_returns_fragment_for_the_day() {
    let server = spawn_server().await;
    let client = Client::new();
    get_index(&client, &server).await;

    let resp = post_toggle(&client, &server, "15").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["hx-retarget"], "#day-15");
    assert_eq!(resp.headers()["hx-reswap"], "outerHTML");

    let fragment = resp.text().await.unwrap();
    assert!(fragment.starts_with("<button id=\"day-15\""));
    assert!(fragment.contains("class=\"day done\""));
    assert!(!fragment.contains("<html"));

    let page = get_index(&client, &server).await;
    assert!(cell(&page, 15).contains("class=\"day done\""));
    assert_eq!(page.matches("class=\"day done\"").count(), 1);
    assert!(cell(&page, 14).contains("class=\"day todo\""));
}

#[tokio::test]
async fn http_toggle_twice_restores_day() {
    let server = spawn_server().await;
    let client = Client::new();
    get_index(&client, &server).await;

    let first = post_toggle(&client, &server, "15?year=2024&month=3").await;
    assert_eq!(first.status(), StatusCode::OK);
    let second = post_toggle(&client, &server, "15?year=2024&month=3").await;
    assert_eq!(second.status(), StatusCode::OK);
    let fragment = second.text().await.unwrap();
    assert!(fragment.contains("class=\"day todo\""));

    let page = get_index(&client, &server).await;
    assert_eq!(page.matches("class=\"day done\"").count(), 0);
}

#[tokio::test]
async fn http_toggle_unknown_day_is_not_found() {
    let server = spawn_server().await;
    let client = Client::new();
    get_index(&client, &server).await;

    let resp = post_toggle(&client, &server, "32").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let other_month = post_toggle(&client, &server, "15?year=2024&month=4").await;
    assert_eq!(other_month.status(), StatusCode::NOT_FOUND);

    let bad_month = post_toggle(&client, &server, "15?year=2024&month=13").await;
    assert_eq!(bad_month.status(), StatusCode::BAD_REQUEST);

    let not_a_number = post_toggle(&client, &server, "abc").await;
    assert_eq!(not_a_number.status(), StatusCode::BAD_REQUEST);
}
