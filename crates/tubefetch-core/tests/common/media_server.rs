//! Minimal HTTP/1.1 server that serves one media body for integration tests.
//!
//! Responds to HEAD with Content-Length and to GET with the full body. When a
//! signature is required, requests whose target lacks `signature=<value>` get
//! 403 Forbidden.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Default)]
pub struct MediaServerOptions {
    /// Signature value the request target must carry.
    pub require_signature: Option<String>,
}

/// Handle to a running server.
pub struct MediaServer {
    /// Base URL of the media resource, e.g. "http://127.0.0.1:12345/videoplayback?id=1".
    pub url: String,
    gets: Arc<AtomicUsize>,
}

impl MediaServer {
    /// Number of GET requests served so far.
    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread serving `body`. The server runs
/// until the process exits.
pub fn start(body: Vec<u8>) -> MediaServer {
    start_with_options(body, MediaServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: MediaServerOptions) -> MediaServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let gets = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&gets);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let counter = Arc::clone(&counter);
            let opts = opts.clone();
            thread::spawn(move || handle(stream, &body, &opts, &counter));
        }
    });
    MediaServer {
        url: format!("http://127.0.0.1:{}/videoplayback?id=1", port),
        gets,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    body: &[u8],
    opts: &MediaServerOptions,
    gets: &AtomicUsize,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("");

    if let Some(sig) = &opts.require_signature {
        if !target.contains(&format!("signature={}", sig)) {
            let _ = stream.write_all(b"HTTP/1.1 403 Forbidden\r\nContent-Length: 0\r\n\r\n");
            return;
        }
    }

    let head = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: video/mp4\r\n\r\n",
        body.len()
    );
    if method.eq_ignore_ascii_case("HEAD") {
        let _ = stream.write_all(head.as_bytes());
        return;
    }
    if method.eq_ignore_ascii_case("GET") {
        gets.fetch_add(1, Ordering::SeqCst);
        let _ = stream.write_all(head.as_bytes());
        let _ = stream.write_all(body);
        return;
    }
    let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\n\r\n");
}
