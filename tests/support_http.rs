use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

/// Delay used by the `/slow` route.
pub const SLOW_ROUTE_DELAY: Duration = Duration::from_secs(3);

pub const TODO_BODY: &str = r#"{"userId":1,"id":1,"title":"x","completed":false}"#;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ServerHandle {
    /// Every request the server has fully read so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// The most recent request whose target starts with `path`.
    #[must_use]
    pub fn last_request_to(&self, path: &str) -> Option<RecordedRequest> {
        self.requests()
            .into_iter()
            .rev()
            .find(|request| request.target.starts_with(path))
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a small routing HTTP server for tests.
///
/// Routes:
/// - `GET /todos/1` returns a fixed todo object.
/// - `/login` returns `{"ok":true}` with two `Set-Cookie` headers.
/// - `/text` returns a plain-text body.
/// - `/bad-todo` returns a todo with wrong field types.
/// - `/slow` answers after [`SLOW_ROUTE_DELAY`].
/// - `/drop` closes the connection without answering.
/// - anything else echoes the request body (or `{}`) as JSON.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_http_server() -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    let recorded = Arc::clone(&recorded);
                    thread::spawn(move || handle_client(stream, &recorded));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
            requests,
        },
    ))
}

fn handle_client(mut stream: TcpStream, recorded: &Mutex<Vec<RecordedRequest>>) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let Some(request) = read_request(&mut stream) else {
        return;
    };
    if let Ok(mut requests) = recorded.lock() {
        requests.push(request.clone());
    }

    let path = request
        .target
        .split('?')
        .next()
        .unwrap_or_default()
        .to_owned();
    let response = match path.as_str() {
        "/todos/1" => json_response(TODO_BODY, &[]),
        "/login" => json_response(
            r#"{"ok":true}"#,
            &["Set-Cookie: sid=abc; Path=/", "Set-Cookie: theme=dark; HttpOnly"],
        ),
        "/text" => plain_response("hello world"),
        "/bad-todo" => json_response(r#"{"userId":"1","id":1,"completed":"no"}"#, &[]),
        "/slow" => {
            thread::sleep(SLOW_ROUTE_DELAY);
            json_response("{}", &[])
        }
        "/drop" => {
            drop(stream.shutdown(Shutdown::Both));
            return;
        }
        _ => {
            let body = if request.body.is_empty() {
                "{}".to_owned()
            } else {
                String::from_utf8_lossy(&request.body).into_owned()
            };
            json_response(&body, &[])
        }
    };

    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let read = stream.read(&mut chunk).ok()?;
        if read == 0 {
            return None;
        }
        buffer.extend_from_slice(chunk.get(..read)?);
        if let Some(position) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            break position;
        }
    };

    let head = String::from_utf8_lossy(buffer.get(..header_end)?).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_owned();
    let target = request_line.next()?.to_owned();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_owned(), value.trim().to_owned()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = buffer.get(header_end.saturating_add(4)..)?.to_vec();
    while body.len() < content_length {
        let read = stream.read(&mut chunk).ok()?;
        if read == 0 {
            break;
        }
        body.extend_from_slice(chunk.get(..read)?);
    }

    Some(RecordedRequest {
        method,
        target,
        headers,
        body,
    })
}

fn json_response(body: &str, extra_headers: &[&str]) -> String {
    build_response("application/json", body, extra_headers)
}

fn plain_response(body: &str) -> String {
    build_response("text/plain", body, &[])
}

fn build_response(content_type: &str, body: &str, extra_headers: &[&str]) -> String {
    let mut response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        content_type,
        body.len()
    );
    for header in extra_headers {
        response.push_str(header);
        response.push_str("\r\n");
    }
    response.push_str("\r\n");
    response.push_str(body);
    response
}
