//! Helpers shared by the adapter integration tests.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A local HTTP server that answers exactly one request.
pub struct OneShotServer {
    port: u16,
    handle: JoinHandle<String>,
}

impl OneShotServer {
    /// Answer with `status` and a JSON `body`.
    pub fn respond(status: u16, body: &str) -> Self {
        let body = body.to_owned();
        Self::spawn(move |stream| {
            let response = format!(
                "HTTP/1.1 {status} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                reason(status),
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .unwrap_or_else(|err| panic!("failed to write response: {err}"));
        })
    }

    /// Accept the request and stay silent for `delay`.
    pub fn stall(delay: Duration) -> Self {
        Self::spawn(move |_| thread::sleep(delay))
    }

    fn spawn(answer: impl FnOnce(&mut TcpStream) + Send + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .unwrap_or_else(|err| panic!("failed to bind test server: {err}"));
        let port = listener
            .local_addr()
            .unwrap_or_else(|err| panic!("failed to read local address: {err}"))
            .port();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener
                .accept()
                .unwrap_or_else(|err| panic!("failed to accept connection: {err}"));
            let request = read_request(&mut stream);
            answer(&mut stream);
            request
        });
        Self { port, handle }
    }

    /// Base URL of the server with `path` appended.
    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }

    /// Wait for the server thread and return the raw request it received.
    pub fn request(self) -> String {
        self.handle
            .join()
            .unwrap_or_else(|_| panic!("test server thread panicked"))
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut reader = BufReader::new(stream);
    let mut head = String::new();
    let mut content_length = 0_usize;
    loop {
        let mut line = String::new();
        let read = reader
            .read_line(&mut line)
            .unwrap_or_else(|err| panic!("failed to read request: {err}"));
        if read == 0 || line == "\r\n" {
            break;
        }
        if let Some((name, value)) = line.split_once(':')
            && name.eq_ignore_ascii_case("content-length")
        {
            content_length = value.trim().parse().unwrap_or(0);
        }
        head.push_str(&line);
    }
    let mut body = vec![0_u8; content_length];
    reader
        .read_exact(&mut body)
        .unwrap_or_else(|err| panic!("failed to read request body: {err}"));
    head.push_str("\r\n");
    head.push_str(&String::from_utf8_lossy(&body));
    head
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
