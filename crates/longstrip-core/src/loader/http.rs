//! Minimal HTTP/1.1 GET client for remote chapters.
//!
//! Plain HTTP over `std::net::TcpStream` only; chapters served over
//! HTTPS need a fronting proxy or a local copy.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use longstrip_types::error::{LongstripError, Result};

use super::ResourceFetcher;

/// Maximum response body size (32 MB -- full-width page slices are big).
const MAX_BODY_SIZE: usize = 32 * 1024 * 1024;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: u8 = 5;

/// TCP connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// TCP read timeout.
const READ_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches resources with single-shot HTTP GETs.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher;

impl HttpFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl ResourceFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let mut current = HttpUrl::parse(url)?;
        for _ in 0..MAX_REDIRECTS {
            let resp = do_request(&current)?;

            if is_redirect(resp.status_code) {
                let location = find_header(&resp.headers, "location").ok_or_else(|| {
                    LongstripError::Fetch(format!(
                        "redirect without Location from {current}"
                    ))
                })?;
                current = current.resolve(location)?;
                continue;
            }

            if !(200..300).contains(&resp.status_code) {
                return Err(LongstripError::Fetch(format!(
                    "HTTP {} for {current}",
                    resp.status_code,
                )));
            }
            return Ok(resp.body);
        }
        Err(LongstripError::Fetch(format!("too many redirects for {url}")))
    }
}

// -------------------------------------------------------------------
// URLs
// -------------------------------------------------------------------

/// The pieces of an `http://` URL this client understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpUrl {
    pub host: String,
    pub port: u16,
    /// Path plus query, always starting with `/`.
    pub path: String,
}

impl HttpUrl {
    pub fn parse(url: &str) -> Result<Self> {
        let rest = url.strip_prefix("http://").ok_or_else(|| {
            LongstripError::Fetch(format!("unsupported URL (plain http:// only): {url}"))
        })?;
        let (authority, path) = match rest.find('/') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, "/"),
        };
        if authority.is_empty() {
            return Err(LongstripError::Fetch(format!("no host in URL: {url}")));
        }
        let (host, port) = match authority.rsplit_once(':') {
            Some((h, p)) => {
                let port = p
                    .parse()
                    .map_err(|_| LongstripError::Fetch(format!("bad port in URL: {url}")))?;
                (h, port)
            },
            None => (authority, 80),
        };
        Ok(Self {
            host: host.to_string(),
            port,
            path: path.to_string(),
        })
    }

    /// Resolve a redirect Location against this URL. Absolute
    /// `http://` URLs and absolute paths are supported.
    fn resolve(&self, location: &str) -> Result<Self> {
        if location.starts_with("http://") {
            Self::parse(location)
        } else if let Some(path) = location.strip_prefix('/') {
            Ok(Self {
                host: self.host.clone(),
                port: self.port,
                path: format!("/{path}"),
            })
        } else {
            Err(LongstripError::Fetch(format!(
                "unsupported redirect Location: {location}"
            )))
        }
    }
}

impl std::fmt::Display for HttpUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.port == 80 {
            write!(f, "http://{}{}", self.host, self.path)
        } else {
            write!(f, "http://{}:{}{}", self.host, self.port, self.path)
        }
    }
}

// -------------------------------------------------------------------
// Internals
// -------------------------------------------------------------------

/// A raw parsed HTTP response.
#[derive(Debug)]
struct HttpResponse {
    status_code: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

/// Connect, send GET, read and parse.
fn do_request(url: &HttpUrl) -> Result<HttpResponse> {
    let mut stream = tcp_connect(&url.host, url.port)?;
    send_request(&mut stream, url)?;
    let raw = read_response(&mut stream)?;
    parse_response(&raw)
}

/// Open a TCP connection with a connect timeout.
fn tcp_connect(host: &str, port: u16) -> Result<TcpStream> {
    use std::net::ToSocketAddrs;

    let addr = format!("{host}:{port}")
        .to_socket_addrs()
        .map_err(|e| LongstripError::Fetch(format!("DNS resolution failed: {e}")))?
        .next()
        .ok_or_else(|| LongstripError::Fetch(format!("no addresses for {host}:{port}")))?;

    let stream = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT)
        .map_err(|e| LongstripError::Fetch(format!("TCP connect failed: {e}")))?;

    stream
        .set_read_timeout(Some(READ_TIMEOUT))
        .map_err(|e| LongstripError::Fetch(format!("set read timeout: {e}")))?;

    Ok(stream)
}

/// Send an HTTP/1.1 GET request.
fn send_request(stream: &mut impl Write, url: &HttpUrl) -> Result<()> {
    let host_header = if url.port == 80 {
        url.host.clone()
    } else {
        format!("{}:{}", url.host, url.port)
    };

    let request = format!(
        "GET {} HTTP/1.1\r\n\
         Host: {host_header}\r\n\
         User-Agent: longstrip/0.1\r\n\
         Accept: */*\r\n\
         Connection: close\r\n\
         \r\n",
        url.path,
    );

    stream
        .write_all(request.as_bytes())
        .map_err(|e| LongstripError::Fetch(format!("send request: {e}")))?;

    Ok(())
}

/// Read the entire response until EOF or until the read timeout fires.
fn read_response(stream: &mut impl Read) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(8192);
    let mut chunk = [0u8; 8192];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                if buf.len() + n > MAX_BODY_SIZE + 4096 {
                    return Err(LongstripError::Fetch("response too large".to_string()));
                }
                buf.extend_from_slice(&chunk[..n]);
            },
            Err(e)
                if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::TimedOut =>
            {
                break;
            },
            Err(e) => {
                return Err(LongstripError::Fetch(format!("read response: {e}")));
            },
        }
    }
    Ok(buf)
}

/// Parse raw bytes into status code, headers, and body.
fn parse_response(data: &[u8]) -> Result<HttpResponse> {
    let header_end = find_subsequence(data, b"\r\n\r\n").ok_or_else(|| {
        LongstripError::Fetch("malformed HTTP response: no header terminator".to_string())
    })?;

    let header_bytes = &data[..header_end];
    let body_start = header_end + 4;

    let header_str = std::str::from_utf8(header_bytes)
        .map_err(|_| LongstripError::Fetch("non-UTF-8 headers".to_string()))?;

    let mut lines = header_str.split("\r\n");

    let status_line = lines
        .next()
        .ok_or_else(|| LongstripError::Fetch("empty response".to_string()))?;
    let status_code = parse_status_line(status_line)?;

    let mut headers = Vec::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_lowercase(), value.trim().to_string()));
        }
    }

    let raw_body = &data[body_start..];
    let body = if find_header(&headers, "transfer-encoding").is_some_and(|v| v.contains("chunked"))
    {
        decode_chunked(raw_body)?
    } else if let Some(cl) = find_header(&headers, "content-length") {
        let len: usize = cl
            .parse()
            .map_err(|_| LongstripError::Fetch("bad Content-Length".to_string()))?;
        if len > MAX_BODY_SIZE {
            return Err(LongstripError::Fetch(
                "response body exceeds 32 MB limit".to_string(),
            ));
        }
        raw_body[..raw_body.len().min(len)].to_vec()
    } else {
        raw_body.to_vec()
    };

    if body.len() > MAX_BODY_SIZE {
        return Err(LongstripError::Fetch(
            "response body exceeds 32 MB limit".to_string(),
        ));
    }

    Ok(HttpResponse {
        status_code,
        headers,
        body,
    })
}

/// Parse the HTTP status code from the status line.
fn parse_status_line(line: &str) -> Result<u16> {
    // Expected: "HTTP/1.x NNN ..."
    let parts: Vec<&str> = line.splitn(3, ' ').collect();
    if parts.len() < 2 {
        return Err(LongstripError::Fetch(format!("bad status line: {line}")));
    }
    parts[1]
        .parse()
        .map_err(|_| LongstripError::Fetch(format!("bad status code in: {line}")))
}

/// Case-insensitive header lookup.
fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    let name_lower = name.to_lowercase();
    headers
        .iter()
        .find(|(k, _)| k == &name_lower)
        .map(|(_, v)| v.as_str())
}

/// Decode a chunked transfer-encoded body.
fn decode_chunked(data: &[u8]) -> Result<Vec<u8>> {
    let mut result = Vec::new();
    let mut pos = 0;

    while let Some(i) = find_subsequence(&data[pos..], b"\r\n") {
        let line_end = pos + i;

        let size_str = std::str::from_utf8(&data[pos..line_end])
            .map_err(|_| LongstripError::Fetch("bad chunk size".to_string()))?
            .trim();

        // Strip optional chunk extensions (after `;`).
        let size_str = size_str.split(';').next().unwrap_or("").trim();

        let chunk_size = usize::from_str_radix(size_str, 16)
            .map_err(|_| LongstripError::Fetch("bad chunk size".to_string()))?;

        if chunk_size == 0 {
            break;
        }

        let chunk_start = line_end + 2;
        let chunk_end = chunk_start + chunk_size;

        if chunk_end > data.len() {
            // Partial chunk -- take what we have.
            result.extend_from_slice(&data[chunk_start..]);
            break;
        }

        if result.len() + chunk_size > MAX_BODY_SIZE {
            return Err(LongstripError::Fetch(
                "chunked body exceeds 32 MB limit".to_string(),
            ));
        }

        result.extend_from_slice(&data[chunk_start..chunk_end]);
        // Skip past chunk data and trailing \r\n.
        pos = chunk_end + 2;
    }

    Ok(result)
}

/// Whether a status code is a redirect we should follow.
fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 307 | 308)
}

/// Find the position of a byte subsequence in a slice.
fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
