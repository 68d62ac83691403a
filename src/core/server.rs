//! HTTP listener.
//!
//! Accepts TCP connections, parses one HTTP/1.x request per connection,
//! hands it to the game router, and writes the response back. Requests
//! with chunked bodies are not supported; every response closes the
//! connection.

use crate::config::{Config, GameError, Result};
use crate::core::router::{GameRouter, response_for};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

const READ_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_DRAIN: usize = 64 * 1024;

/// One parsed request, reduced to what the game handlers need.
#[derive(Debug, Clone)]
pub struct ParsedRequest {
    pub method: String,
    /// Request path with any query string stripped.
    pub path: String,
    /// Raw `Cookie` header, when present.
    pub cookie: Option<String>,
    pub body: Vec<u8>,
}

/// Runs the HTTP listener until the process exits.
///
/// # Panics
///
/// Panics if the TCP listener fails to bind to the configured address
/// (fatal startup error).
pub async fn run_listener(config: Arc<Config>) {
    let listener = TcpListener::bind(config.listen_addr)
        .await
        .unwrap_or_else(|e| {
            panic!(
                "FATAL: Failed to bind listener to {}: {}",
                config.listen_addr, e
            )
        });

    info!(listen_addr = %config.listen_addr, "Game listener started");

    let router = Arc::new(GameRouter::new(config.clone()));
    let connection_limit = Arc::new(tokio::sync::Semaphore::new(config.concurrency_limit));

    loop {
        let Ok(permit) = connection_limit.clone().acquire_owned().await else {
            break;
        };

        match listener.accept().await {
            Ok((mut client, peer_addr)) => {
                let router = router.clone();
                let config = config.clone();
                tokio::spawn(async move {
                    let _permit = permit;
                    if let Err(e) = handle_connection(&mut client, &router, &config).await {
                        debug!(peer_addr = %peer_addr, error = %e, "Connection error");
                    }
                });
            }
            Err(e) => {
                error!(error = %e, "Accept error");
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
    }
}

fn configure_tcp_stream(stream: &TcpStream) {
    let sock = socket2::SockRef::from(&stream);

    let _ = stream.set_nodelay(true);

    let mut ka = socket2::TcpKeepalive::new()
        .with_time(Duration::from_secs(60))
        .with_interval(Duration::from_secs(10));

    #[cfg(not(target_os = "openbsd"))]
    {
        ka = ka.with_retries(3);
    }

    let _ = sock.set_tcp_keepalive(&ka);
}

async fn handle_connection(
    client: &mut TcpStream,
    router: &GameRouter,
    config: &Config,
) -> std::io::Result<()> {
    configure_tcp_stream(client);

    let request = match read_request(client, config).await {
        Ok(Some(request)) => request,
        Ok(None) => return Ok(()),
        Err(GameError::Io(e)) => return Err(e),
        Err(e) => {
            let response = response_for(&e);
            client.write_all(&response.to_bytes()).await?;
            return client.flush().await;
        }
    };

    let response = router.handle_request(&request);
    client.write_all(&response.to_bytes()).await?;
    client.flush().await
}

fn validate_headers(req: &httparse::Request<'_, '_>) -> Result<(usize, Option<String>)> {
    let mut content_length: Option<usize> = None;
    let mut cookie = None;

    for header in req.headers.iter() {
        if header.name.eq_ignore_ascii_case("content-length") {
            if content_length.is_some() {
                warn!("Duplicate Content-Length headers detected");
                return Err(GameError::BadRequest("无法解析请求".to_string()));
            }
            let value = std::str::from_utf8(header.value)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .ok_or_else(|| GameError::BadRequest("无法解析请求".to_string()))?;
            content_length = Some(value);
        } else if header.name.eq_ignore_ascii_case("transfer-encoding") {
            warn!("Chunked Transfer-Encoding not supported");
            return Err(GameError::BadRequest("不支持分块传输".to_string()));
        } else if header.name.eq_ignore_ascii_case("cookie") && cookie.is_none() {
            cookie = std::str::from_utf8(header.value).ok().map(str::to_string);
        }
    }

    Ok((content_length.unwrap_or(0), cookie))
}

/// Reads and discards up to `remaining` body bytes so the client sees
/// the rejection response instead of a reset connection.
async fn drain_body(client: &mut TcpStream, remaining: usize) {
    let mut to_drain = remaining.min(MAX_DRAIN);
    let mut scratch = [0u8; 4096];
    while to_drain > 0 {
        match tokio::time::timeout(READ_TIMEOUT, client.read(&mut scratch)).await {
            Ok(Ok(n)) if n > 0 => to_drain = to_drain.saturating_sub(n),
            _ => break,
        }
    }
}

/// Reads and parses one request from the connection.
///
/// Returns `Ok(None)` when the peer goes away (EOF or read timeout)
/// before a full request arrives; those connections are dropped without
/// a response.
///
/// # Errors
///
/// `BadRequest`/`PayloadTooLarge` for protocol violations the caller
/// answers with an error page; `Io` for transport failures.
async fn read_request(client: &mut TcpStream, config: &Config) -> Result<Option<ParsedRequest>> {
    let mut buf = [0u8; 8192];
    let mut pos = 0;

    loop {
        let bytes_read =
            match tokio::time::timeout(READ_TIMEOUT, client.read(&mut buf[pos..])).await {
                Ok(result) => result?,
                Err(_) => {
                    warn!("Request header read timed out");
                    return Ok(None);
                }
            };

        if bytes_read == 0 {
            return Ok(None);
        }
        pos += bytes_read;

        let mut headers = [httparse::EMPTY_HEADER; 64];
        let mut req = httparse::Request::new(&mut headers);

        match req.parse(&buf[..pos]) {
            Ok(httparse::Status::Complete(header_len)) => {
                let (Some(method), Some(raw_path)) = (req.method, req.path) else {
                    return Err(GameError::BadRequest("无法解析请求".to_string()));
                };
                let method = method.to_string();
                let path = raw_path.split('?').next().unwrap_or("/").to_string();

                let (content_length, cookie) = validate_headers(&req)?;

                if content_length > config.client_max_body_size {
                    warn!(
                        content_length,
                        limit = config.client_max_body_size,
                        "Request body too large"
                    );
                    drain_body(client, content_length.saturating_sub(pos - header_len)).await;
                    return Err(GameError::PayloadTooLarge);
                }

                let mut body = buf[header_len..pos].to_vec();
                if content_length > body.len() {
                    let mut rest = vec![0u8; content_length - body.len()];
                    match tokio::time::timeout(READ_TIMEOUT, client.read_exact(&mut rest)).await {
                        Ok(result) => {
                            result?;
                            body.extend_from_slice(&rest);
                        }
                        Err(_) => {
                            warn!("Request body read timed out");
                            return Ok(None);
                        }
                    }
                } else {
                    body.truncate(content_length);
                }

                return Ok(Some(ParsedRequest {
                    method,
                    path,
                    cookie,
                    body,
                }));
            }
            Ok(httparse::Status::Partial) => {
                if pos >= buf.len() {
                    warn!("Request headers too large");
                    return Err(GameError::BadRequest("请求头过大".to_string()));
                }
            }
            Err(e) => {
                warn!(error = ?e, "Invalid HTTP request");
                return Err(GameError::BadRequest("无法解析请求".to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_config;

    async fn socket_pair(client_bytes: &'static [u8]) -> TcpStream {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(client_bytes).await.unwrap();
        });

        let (stream, _) = listener.accept().await.unwrap();
        stream
    }

    #[tokio::test]
    async fn test_read_request_simple_get() {
        let config = create_test_config();
        let mut stream = socket_pair(b"GET /?from=link HTTP/1.1\r\nHost: x\r\n\r\n").await;

        let request = read_request(&mut stream, &config).await.unwrap().unwrap();
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/");
        assert!(request.cookie.is_none());
        assert!(request.body.is_empty());
    }

    #[tokio::test]
    async fn test_read_request_with_body_and_cookie() {
        let config = create_test_config();
        let mut stream = socket_pair(
            b"POST /guess HTTP/1.1\r\nHost: x\r\nCookie: target=42\r\nContent-Length: 9\r\n\r\nnumber=50",
        )
        .await;

        let request = read_request(&mut stream, &config).await.unwrap().unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/guess");
        assert_eq!(request.cookie.as_deref(), Some("target=42"));
        assert_eq!(request.body, b"number=50");
    }

    #[tokio::test]
    async fn test_read_request_rejects_chunked() {
        let config = create_test_config();
        let mut stream = socket_pair(
            b"POST /guess HTTP/1.1\r\nHost: x\r\nTransfer-Encoding: chunked\r\n\r\n0\r\n\r\n",
        )
        .await;

        let err = read_request(&mut stream, &config).await.unwrap_err();
        assert!(matches!(err, GameError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_read_request_rejects_duplicate_content_length() {
        let config = create_test_config();
        let mut stream = socket_pair(
            b"POST /guess HTTP/1.1\r\nHost: x\r\nContent-Length: 5\r\nContent-Length: 5\r\n\r\nHello",
        )
        .await;

        let err = read_request(&mut stream, &config).await.unwrap_err();
        assert!(matches!(err, GameError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_read_request_rejects_oversized_body() {
        let config = create_test_config();
        let declared = config.client_max_body_size + 1;
        let head = format!("POST /guess HTTP/1.1\r\nHost: x\r\nContent-Length: {declared}\r\n\r\n");

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(head.as_bytes()).await.unwrap();
        });
        let (mut stream, _) = listener.accept().await.unwrap();

        let err = read_request(&mut stream, &config).await.unwrap_err();
        assert!(matches!(err, GameError::PayloadTooLarge));
    }

    #[tokio::test]
    async fn test_read_request_rejects_garbage() {
        let config = create_test_config();
        let mut stream = socket_pair(b"\xff\xfe not http at all\r\n\r\n").await;

        let err = read_request(&mut stream, &config).await.unwrap_err();
        assert!(matches!(err, GameError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_read_request_eof_is_silent() {
        let config = create_test_config();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let stream = TcpStream::connect(addr).await.unwrap();
            drop(stream);
        });

        let (mut stream, _) = listener.accept().await.unwrap();
        let result = read_request(&mut stream, &config).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_socket_configuration() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let _server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            configure_tcp_stream(&socket);
            assert!(socket.nodelay().unwrap());
        });

        let client = TcpStream::connect(addr).await.unwrap();
        configure_tcp_stream(&client);
        assert!(client.nodelay().unwrap());
    }
}
