//! Minimal HTTP/1.0 static file server demonstrating the worker pool's
//! external integration contract: one `Task` enqueued per accepted
//! connection, dispatched round-robin across a fixed set of workers.
//!
//! Usage:
//!
//!     wpool-httpd-demo [--port 8081] [--docroot .] [--workers 4] [--variant polling]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use wpool::{plog, plog_error, plog_info, Pool, PoolConfig, Task, Variant};

const DEFAULT_PORT: u16 = 8081;
const RECV_BUF_SIZE: usize = 8192;

struct Args {
    port: u16,
    docroot: PathBuf,
    workers: usize,
    queue_size: usize,
    variant: Variant,
}

impl Args {
    fn parse() -> Self {
        let mut port = DEFAULT_PORT;
        let mut docroot = PathBuf::from(".");
        let mut workers = 4usize;
        let mut queue_size = 256usize;
        let mut variant = Variant::default();

        let args: Vec<String> = std::env::args().collect();
        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--port" | "-p" => {
                    i += 1;
                    if let Some(v) = args.get(i).and_then(|s| s.parse().ok()) {
                        port = v;
                    }
                }
                "--docroot" | "-d" => {
                    i += 1;
                    if let Some(v) = args.get(i) {
                        docroot = PathBuf::from(v);
                    }
                }
                "--workers" | "-w" => {
                    i += 1;
                    if let Some(v) = args.get(i).and_then(|s| s.parse().ok()) {
                        workers = v;
                    }
                }
                "--queue-size" | "-q" => {
                    i += 1;
                    if let Some(v) = args.get(i).and_then(|s| s.parse().ok()) {
                        queue_size = v;
                    }
                }
                "--variant" => {
                    i += 1;
                    if let Some(v) = args.get(i) {
                        variant = match v.to_lowercase().as_str() {
                            "mutex" | "mutex-condvar" => Variant::MutexCondvar,
                            "signal" | "signal-wakeup" => Variant::SignalWakeup,
                            _ => Variant::Polling,
                        };
                    }
                }
                _ => {}
            }
            i += 1;
        }

        Args {
            port,
            docroot,
            workers,
            queue_size,
            variant,
        }
    }
}

fn install_sigpipe_ignore() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_IGN);
    }
}

fn status_line(code: u16) -> &'static str {
    match code {
        200 => "200 OK",
        403 => "403 Forbidden",
        404 => "404 Not Found",
        _ => "500 Internal Server Error",
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

fn build_response(code: u16, content_type: &str, body: &[u8]) -> Vec<u8> {
    let header = format!(
        "HTTP/1.0 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status_line(code),
        content_type,
        body.len()
    );
    let mut out = header.into_bytes();
    out.extend_from_slice(body);
    out
}

/// Parse the request line and resolve it against `docroot`, refusing any
/// path that would escape it via `..`.
fn resolve_request_path(docroot: &Path, request_line: &str) -> Option<PathBuf> {
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?;
    if method != "GET" {
        return None;
    }
    let raw_path = parts.next()?;
    let trimmed = raw_path.trim_start_matches('/');
    let requested = if trimmed.is_empty() {
        "index.html"
    } else {
        trimmed
    };

    if requested.split('/').any(|seg| seg == "..") {
        return None;
    }

    Some(docroot.join(requested))
}

fn handle_connection(mut stream: TcpStream, docroot: Arc<PathBuf>) {
    let mut buf = [0u8; RECV_BUF_SIZE];
    let n = match stream.read(&mut buf) {
        Ok(n) if n > 0 => n,
        _ => return,
    };

    let request = String::from_utf8_lossy(&buf[..n]);
    let request_line = match request.lines().next() {
        Some(line) => line,
        None => return,
    };

    let response = match resolve_request_path(&docroot, request_line) {
        None => build_response(403, "text/plain", b"Forbidden\n"),
        Some(path) => match std::fs::read(&path) {
            Ok(body) => build_response(200, content_type_for(&path), &body),
            Err(_) => build_response(404, "text/plain", b"Not Found\n"),
        },
    };

    if let Err(e) = stream.write_all(&response) {
        plog_error!("failed writing response: {}", e);
    }
}

fn accept_loop(listener: TcpListener, pool: Arc<Pool>, docroot: Arc<PathBuf>) {
    for incoming in listener.incoming() {
        let stream = match incoming {
            Ok(s) => s,
            Err(e) => {
                plog_error!("accept error: {}", e);
                continue;
            }
        };

        let docroot = Arc::clone(&docroot);
        match pool.enqueue(Task::new(move || handle_connection(stream, docroot))) {
            Ok(()) => {}
            Err(e) => plog_error!("dropping connection, dispatch failed: {}", e),
        }
    }
}

fn main() {
    plog::init();
    install_sigpipe_ignore();

    let args = Args::parse();
    let config = PoolConfig::new()
        .thread_count(args.workers)
        .queue_size(args.queue_size)
        .variant(args.variant);

    let pool = Arc::new(Pool::create(config).expect("pool creation failed"));
    let docroot = Arc::new(args.docroot);

    let listener = TcpListener::bind(("0.0.0.0", args.port)).expect("failed to bind listener");
    plog_info!(
        "wpool-httpd-demo listening on 0.0.0.0:{} (workers={}, variant={:?})",
        args.port,
        args.workers,
        pool.variant()
    );

    accept_loop(listener, pool, docroot);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_rejects_parent_traversal() {
        let docroot = PathBuf::from("/srv/www");
        assert!(resolve_request_path(&docroot, "GET /../etc/passwd HTTP/1.1").is_none());
        assert!(resolve_request_path(&docroot, "GET /a/../../etc/passwd HTTP/1.1").is_none());
    }

    #[test]
    fn test_resolve_maps_root_to_index() {
        let docroot = PathBuf::from("/srv/www");
        let resolved = resolve_request_path(&docroot, "GET / HTTP/1.1").unwrap();
        assert_eq!(resolved, docroot.join("index.html"));
    }

    #[test]
    fn test_resolve_rejects_non_get() {
        let docroot = PathBuf::from("/srv/www");
        assert!(resolve_request_path(&docroot, "POST /upload HTTP/1.1").is_none());
    }

    #[test]
    fn test_resolve_joins_plain_path() {
        let docroot = PathBuf::from("/srv/www");
        let resolved = resolve_request_path(&docroot, "GET /styles/app.css HTTP/1.1").unwrap();
        assert_eq!(resolved, docroot.join("styles/app.css"));
    }

    #[test]
    fn test_content_type_by_extension() {
        assert_eq!(content_type_for(Path::new("a.html")), "text/html");
        assert_eq!(content_type_for(Path::new("a.css")), "text/css");
        assert_eq!(content_type_for(Path::new("a.bin")), "application/octet-stream");
    }

    #[test]
    fn test_build_response_has_correct_content_length() {
        let body = b"hello";
        let response = build_response(200, "text/plain", body);
        let text = String::from_utf8_lossy(&response);
        assert!(text.starts_with("HTTP/1.0 200 OK\r\n"));
        assert!(text.contains("Content-Length: 5\r\n"));
        assert!(text.ends_with("hello"));
    }
}
