//! Scripted local HTTP server for adapter behaviour tests.
//!
//! The server answers one queued response per connection, closes the
//! connection and records what the client sent.

use std::collections::VecDeque;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

/// Directory containing the JSON fixtures.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Read `name` from the fixtures directory.
pub fn fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    fs::read_to_string(&path).unwrap_or_else(|err| {
        panic!("failed to read fixture {path:?}: {err}");
    })
}

/// A canned answer for one connection.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Respond with `status` and a JSON `body`.
    Json {
        /// HTTP status code.
        status: u16,
        /// JSON response body.
        body: String,
    },
    /// Hold the connection open without answering for the given time.
    Stall(Duration),
}

impl Reply {
    /// A `200 OK` JSON response.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::Json {
            status: 200,
            body: body.into(),
        }
    }

    /// A `200 OK` response with the contents of fixture `name`.
    pub fn fixture(name: &str) -> Self {
        Self::ok(fixture(name))
    }
}

/// A request as the server saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    /// Request line, e.g. `GET /search?q=Busan HTTP/1.1`.
    pub request_line: String,
    /// Lower-cased header lines.
    pub headers: Vec<String>,
    /// Raw body.
    pub body: String,
}

impl Recorded {
    /// The request target, e.g. `/search?q=Busan`.
    pub fn target(&self) -> &str {
        self.request_line.split(' ').nth(1).unwrap_or_default()
    }
}

/// A running scripted server.
pub struct ScriptedServer {
    base_url: String,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

impl ScriptedServer {
    /// Start serving `replies` in order on an ephemeral port.
    pub fn start(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap_or_else(|err| {
            panic!("failed to bind test listener: {err}");
        });
        let port = listener
            .local_addr()
            .unwrap_or_else(|err| panic!("listener has no address: {err}"))
            .port();
        let recorded = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&recorded);
        let mut queue = VecDeque::from(replies);
        thread::spawn(move || {
            while let Some(reply) = queue.pop_front() {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                serve(stream, &reply, &sink);
            }
        });
        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            recorded,
        }
    }

    /// Root URL of the server, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<Recorded> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Record the request before answering so clients never observe a reply
/// ahead of its record.
fn serve(stream: TcpStream, reply: &Reply, sink: &Mutex<Vec<Recorded>>) -> Option<()> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);
    let request = read_request(&mut reader)?;
    sink.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(request);
    let mut writer = stream;
    match reply {
        Reply::Json { status, body } => {
            let response = format!(
                "HTTP/1.1 {status} {}\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{body}",
                reason(*status),
                body.len()
            );
            writer.write_all(response.as_bytes()).ok()?;
            writer.flush().ok()?;
        }
        Reply::Stall(wait) => thread::sleep(*wait),
    }
    Some(())
}

fn read_request(reader: &mut BufReader<TcpStream>) -> Option<Recorded> {
    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut headers = Vec::new();
    let mut content_length = 0_usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let header = line.trim_end().to_lowercase();
        if header.is_empty() {
            break;
        }
        if let Some(value) = header.strip_prefix("content-length:") {
            content_length = value.trim().parse().ok()?;
        }
        headers.push(header);
    }
    let mut body = vec![0_u8; content_length];
    reader.read_exact(&mut body).ok()?;
    Some(Recorded {
        request_line: request_line.trim_end().to_owned(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        _ => "Internal Server Error",
    }
}
