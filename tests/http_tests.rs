use reqwest::header::LOCATION;
use reqwest::{Client, StatusCode, redirect};
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command};
use std::time::Duration;

struct TodoTestServer {
    process: Child,
    database_path: PathBuf,
    base_url: String,
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .map(|addr| addr.port())
        .expect("Could not find a free port")
}

impl TodoTestServer {
    async fn spawn() -> Self {
        let todo_executable = env!("CARGO_BIN_EXE_tododo");
        let port = free_port();
        let database_path =
            std::env::temp_dir().join(format!("tododo-test-{}-{}.sqlite3", std::process::id(), port));
        let _ = std::fs::remove_file(&database_path);
        let server = TodoTestServer {
            process: Command::new(todo_executable)
                .args(["--port", &port.to_string()])
                .arg("--database-path")
                .arg(&database_path)
                .spawn()
                .expect("Could not start tododo"),
            database_path,
            base_url: format!("http://127.0.0.1:{port}"),
        };
        let client = client();
        while client.get(&server.base_url).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        server
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TodoTestServer {
    fn drop(&mut self) {
        self.process.kill().expect("Failed to send kill signal to tododo");
        self.process.wait().expect("tododo failed to stop");
        let _ = std::fs::remove_file(&self.database_path);
    }
}

fn client() -> Client {
    Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .expect("Could not build client")
}

#[tokio::test]
async fn can_start_and_stop_server() {
    TodoTestServer::spawn().await;
}

#[tokio::test]
async fn first_visit_seeds_default_list() {
    let server = TodoTestServer::spawn().await;
    let client = client();

    // The readiness probe in spawn may already have seeded the list.
    let res = client.get(server.url("/")).send().await.unwrap();
    let res = if res.status() == StatusCode::FOUND {
        assert_eq!(res.headers()[LOCATION], "/");
        client.get(server.url("/")).send().await.unwrap()
    } else {
        res
    };
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();
    assert_eq!(body.matches(r#"name="checkbox""#).count(), 3);
}

#[tokio::test]
async fn named_list_round_trip() {
    let server = TodoTestServer::spawn().await;
    let client = client();

    let res = client.get(server.url("/errands")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()[LOCATION], "/Errands");

    let res = client
        .post(server.url("/"))
        .form(&[("newItem", "post letter"), ("list", "Errands")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()[LOCATION], "/Errands");

    let body = client
        .get(server.url("/Errands"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("post letter"));
    assert_eq!(body.matches(r#"name="checkbox""#).count(), 4);
}

#[tokio::test]
async fn posting_to_unknown_list_is_not_found() {
    let server = TodoTestServer::spawn().await;
    let res = client()
        .post(server.url("/"))
        .form(&[("newItem", "x"), ("list", "Nowhere")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
