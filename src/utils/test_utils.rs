//! App builders and loopback HTTP fixtures shared by the unit tests.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::api::models::ProbeResult;
use crate::core::app::App;
use crate::core::config::Settings;

/// An app that has not heard back from the server yet.
pub fn create_test_app() -> App {
    let mut settings = Settings::default();
    settings.server_url = "http://127.0.0.1:9".to_string();
    App::new(&settings)
}

/// An app whose last probe succeeded and listed `models`.
pub fn create_ready_app(models: &[&str]) -> App {
    let mut app = create_test_app();
    app.session.last_probe = Some(ProbeResult {
        available: true,
        model_names: models.iter().map(|name| name.to_string()).collect(),
        failure: None,
    });
    app
}

/// Type `text` into the prompt line as if pasted.
pub fn type_text(app: &mut App, text: &str) {
    app.ui.input.insert_str(text);
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn json_body(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }
}

pub type CapturedRequestHandle = JoinHandle<Result<CapturedRequest, String>>;

async fn read_http_request(stream: &mut TcpStream) -> Result<CapturedRequest, String> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        if let Some(pos) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos;
        }
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("connection closed before headers completed".to_string());
        }
        buffer.extend_from_slice(&chunk[..read]);
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut head_lines = head.lines();
    let request_line = head_lines.next().unwrap_or_default().to_string();
    let content_length = head_lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buffer[header_end + 4..].to_vec();
    while body.len() < content_length {
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("connection closed before body completed".to_string());
        }
        body.extend_from_slice(&chunk[..read]);
    }
    body.truncate(content_length);

    Ok(CapturedRequest { request_line, body })
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Serve a single response with a fixed body and hand back the captured request.
pub async fn serve_once(
    status: u16,
    content_type: &str,
    body: String,
) -> (String, CapturedRequestHandle) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    let content_type = content_type.to_string();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.map_err(|err| err.to_string())?;
        let request = read_http_request(&mut stream).await?;
        let response = format!(
            "HTTP/1.1 {status} {}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            status_text(status),
            body.len()
        );
        stream
            .write_all(response.as_bytes())
            .await
            .map_err(|err| err.to_string())?;
        let _ = stream.shutdown().await;
        Ok(request)
    });

    (format!("http://{addr}"), handle)
}

/// Serve a 200 response whose body is written piece by piece and closed
/// afterwards, the way a streaming `/api/chat` reply arrives.
pub async fn serve_stream(pieces: Vec<String>) -> (String, CapturedRequestHandle) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.map_err(|err| err.to_string())?;
        let request = read_http_request(&mut stream).await?;
        stream
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: application/x-ndjson\r\nConnection: close\r\n\r\n",
            )
            .await
            .map_err(|err| err.to_string())?;
        for piece in pieces {
            stream
                .write_all(piece.as_bytes())
                .await
                .map_err(|err| err.to_string())?;
            stream.flush().await.map_err(|err| err.to_string())?;
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        let _ = stream.shutdown().await;
        Ok(request)
    });

    (format!("http://{addr}"), handle)
}

/// Start a chunked 200 response, send one chunk, then drop the connection
/// without the terminating chunk.
pub async fn serve_truncated_chunked(first_chunk: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.map_err(|err| err.to_string())?;
        read_http_request(&mut stream).await?;
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/x-ndjson\r\nTransfer-Encoding: chunked\r\n\r\n{:x}\r\n{first_chunk}\r\n",
            first_chunk.len()
        );
        stream
            .write_all(response.as_bytes())
            .await
            .map_err(|err| err.to_string())?;
        stream.flush().await.map_err(|err| err.to_string())?;
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(stream);
        Ok::<(), String>(())
    });

    format!("http://{addr}")
}

/// Accept a connection and never answer it.
pub async fn serve_silently() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");

    tokio::spawn(async move {
        if let Ok((stream, _)) = listener.accept().await {
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(stream);
        }
    });

    format!("http://{addr}")
}

/// A loopback URL with nothing listening behind it.
pub async fn unused_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    drop(listener);
    format!("http://{addr}")
}
