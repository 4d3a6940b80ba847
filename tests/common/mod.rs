//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::Path;

use frontgate::config::schema::ServerConfig;
use frontgate::{CanonicalRequest, CanonicalResponse, ExecuteError, Executor, FrontServer};
use serde_json::json;

/// A running server over a throwaway asset tree.
pub struct TestServer {
    pub addr: SocketAddr,
    /// Keeps the asset tree alive for the duration of the test.
    pub assets: tempfile::TempDir,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    #[allow(dead_code)]
    pub fn asset_root(&self) -> &Path {
        self.assets.path()
    }
}

/// Boot a real server on an ephemeral port.
///
/// The base config points at a fresh temp directory; `mutate` adjusts it
/// before the server is built.
pub async fn start(mutate: impl FnOnce(&mut ServerConfig), executor: impl Executor) -> TestServer {
    let assets = tempfile::tempdir().unwrap();

    let mut config = ServerConfig::default();
    config.assets.asset_root = assets.path().to_str().unwrap().to_string();
    config.session.secret = "integration-test-secret".to_string();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    mutate(&mut config);

    let server = FrontServer::new(config, executor).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    TestServer { addr, assets }
}

/// Write one file under the asset tree.
#[allow(dead_code)]
pub fn write_asset(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel.trim_start_matches('/'));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Executor that reports everything it was handed, so tests can assert
/// on the normalized request from the outside.
#[allow(dead_code)]
pub fn echo_executor() -> impl Executor {
    |request: CanonicalRequest| async move {
        let files: serde_json::Map<String, serde_json::Value> = request
            .files
            .iter()
            .map(|(name, file)| {
                (
                    name.clone(),
                    json!({
                        "filename": file.filename,
                        "content_type": file.content_type,
                        "size": file.data.len(),
                    }),
                )
            })
            .collect();
        let body = json!({
            "executed": true,
            "method": request.method.as_str(),
            "path": request.path,
            "data": request.data,
            "files": files,
        });
        Ok::<_, ExecuteError>(CanonicalResponse::json(axum::http::StatusCode::OK, &body))
    }
}
