use sector_lens::network::client::HttpFetcher;
use sector_lens::network::errors::FetchError;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

// * Answers every connection with the same raw HTTP response
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "{}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
        }
    });

    format!("http://{}/", addr)
}

#[tokio::test]
async fn test_client_initialization() {
    let client = HttpFetcher::new(Duration::from_secs(5));
    assert!(client.is_ok());
}

#[tokio::test]
async fn test_connection_refused_is_http_error() {
    let client = HttpFetcher::new(Duration::from_secs(5)).unwrap();
    let result = client.fetch("http://127.0.0.1:1/").await;
    assert!(matches!(result, Err(FetchError::Http(_))));
}

#[tokio::test]
async fn test_ok_body_is_returned() {
    let url = serve_once("HTTP/1.1 200 OK", "<html><title>Screener</title><table></table></html>").await;
    let client = HttpFetcher::new(Duration::from_secs(5)).unwrap();
    let body = client.fetch(&url).await.unwrap();
    assert!(body.contains("<table>"));
}

#[tokio::test]
async fn test_non_200_fails_without_retry() {
    let url = serve_once("HTTP/1.1 503 Service Unavailable", "busy").await;
    let client = HttpFetcher::new(Duration::from_secs(5)).unwrap();
    match client.fetch(&url).await {
        Err(FetchError::Status(code)) => assert_eq!(code, 503),
        other => panic!("Expected status error, got {:?}", other.map(|b| b.len())),
    }
}

#[tokio::test]
async fn test_challenge_page_is_blocked() {
    let url = serve_once("HTTP/1.1 200 OK", "<html><head><title>Just a moment...</title></head></html>").await;
    let client = HttpFetcher::new(Duration::from_secs(5)).unwrap();
    assert!(matches!(client.fetch(&url).await, Err(FetchError::Blocked(_))));
}
