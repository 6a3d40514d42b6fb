//! Minimal HTTP/1.1 JSON-RPC server for integration tests.
//!
//! Accepts POSTs, records each request body, and answers with whatever the
//! handler returns for that body.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub type Handler = dyn Fn(&serde_json::Value) -> (u16, String) + Send + Sync;

pub struct RpcServer {
    pub url: String,
    requests: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl RpcServer {
    /// Request bodies received so far, parsed as JSON.
    pub fn requests(&self) -> Vec<serde_json::Value> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. Runs until the process exits.
pub fn start<F>(handler: F) -> RpcServer
where
    F: Fn(&serde_json::Value) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let handler: Arc<Handler> = Arc::new(handler);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let handler = Arc::clone(&handler);
            let recorded = Arc::clone(&recorded);
            thread::spawn(move || handle(stream, handler.as_ref(), &recorded));
        }
    });
    RpcServer {
        url: format!("http://127.0.0.1:{}/", port),
        requests,
    }
}

/// Answers every call with `{"result": result}`.
pub fn start_with_result(result: serde_json::Value) -> RpcServer {
    start(move |req| {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": req.get("id").cloned().unwrap_or(serde_json::Value::Null),
            "result": result,
        });
        (200, body.to_string())
    })
}

fn handle(
    mut stream: TcpStream,
    handler: &Handler,
    recorded: &Mutex<Vec<serde_json::Value>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    let body = loop {
        let n = match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        raw.extend_from_slice(&buf[..n]);
        if let Some(body) = complete_body(&raw) {
            break body;
        }
    };

    let parsed: serde_json::Value =
        serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    recorded.lock().unwrap().push(parsed.clone());

    let (status, payload) = handler(&parsed);
    let response = format!(
        "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        payload.len(),
        payload
    );
    let _ = stream.write_all(response.as_bytes());
}

/// Returns the body once headers and `Content-Length` bytes have arrived.
fn complete_body(raw: &[u8]) -> Option<Vec<u8>> {
    let header_end = raw.windows(4).position(|w| w == b"\r\n\r\n")? + 4;
    let headers = std::str::from_utf8(&raw[..header_end]).ok()?;
    let length = headers
        .lines()
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    let body = &raw[header_end..];
    (body.len() >= length).then(|| body[..length].to_vec())
}
