use numguess::Config;
use numguess::run_listener;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

pub fn create_test_config(port: u16) -> Arc<Config> {
    Arc::new(Config {
        listen_addr: format!("127.0.0.1:{port}").parse().unwrap(),
        cookie_max_age_secs: 3600,
        concurrency_limit: 64,
        client_max_body_size: 1024,
        log_format: "pretty".to_string(),
    })
}

pub async fn spawn_server() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    tokio::spawn(run_listener(create_test_config(port)));
    tokio::time::sleep(Duration::from_millis(200)).await;

    port
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
