//! In-process HTTP/1.1 stub standing in for an upstream CEP service.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use buscacep_client::{SourceClient, SourceSpec};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const CEP: &str = "01153000";

pub const BRASIL_API_BODY: &str = r#"{
    "cep": "01153000",
    "state": "SP",
    "city": "São Paulo",
    "neighborhood": "Barra Funda",
    "street": "Rua Vitorino Carmilo",
    "service": "open-cep"
}"#;

pub const VIA_CEP_BODY: &str = r#"{
    "cep": "01153-000",
    "logradouro": "Rua Vitorino Carmilo",
    "complemento": "",
    "bairro": "Barra Funda",
    "localidade": "São Paulo",
    "uf": "SP",
    "ibge": "3550308",
    "gia": "1004",
    "ddd": "11",
    "siafi": "7107"
}"#;

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
    /// `Content-Length` to announce; defaults to the real body length.
    pub declared_length: Option<usize>,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            delay: Duration::ZERO,
            declared_length: None,
        }
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Announce `declared` bytes but close the connection after the body.
    pub fn truncated(mut self, declared: usize) -> Self {
        self.declared_length = Some(declared);
        self
    }

    fn to_http(&self) -> String {
        let length = self.declared_length.unwrap_or(self.body.len());
        format!(
            "HTTP/1.1 {} {}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {length}\r\n\
             Connection: close\r\n\
             \r\n\
             {}",
            self.status,
            reason_phrase(self.status),
            self.body
        )
    }
}

pub struct StubUpstream {
    base_url: String,
    paths: Arc<Mutex<Vec<String>>>,
}

impl StubUpstream {
    /// Serve `reply` to every request until the test runtime shuts down.
    pub async fn start(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().expect("stub address");
        let paths = Arc::new(Mutex::new(Vec::new()));

        let log = paths.clone();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let reply = reply.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let head = read_head(&mut stream).await;
                    if let Some(path) = head.split_whitespace().nth(1) {
                        log.lock().unwrap().push(path.to_string());
                    }
                    tokio::time::sleep(reply.delay).await;
                    let _ = stream.write_all(reply.to_http().as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            paths,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request paths received so far.
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

async fn read_head(stream: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Base URL of a local port nothing is listening on.
pub async fn refused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);
    format!("http://{addr}")
}

/// HTTP client that never routes loopback traffic through a proxy.
pub fn http() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("build test HTTP client")
}

pub fn brasil_api_at(endpoint_root: &str) -> SourceClient {
    let spec =
        SourceSpec::brasil_api().with_endpoint(format!("{endpoint_root}/api/cep/v1/{{cep}}"));
    SourceClient::new(http(), spec)
}

pub fn via_cep_at(endpoint_root: &str) -> SourceClient {
    let spec = SourceSpec::via_cep().with_endpoint(format!("{endpoint_root}/ws/{{cep}}/json"));
    SourceClient::new(http(), spec)
}
