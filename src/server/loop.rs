// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;

use super::connection::handle_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop; must run inside a `LocalSet`
///
/// Accept errors are logged and the loop keeps going. Returns once
/// `shutdown` completes; connections already spawned are not awaited.
pub async fn start_server_loop<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => handle_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = &mut shutdown => {
                logger::log_shutdown();
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::document::{DocumentBundle, DocumentRegistry, ExportOptions};
    use crate::handler::static_files::StaticAssetCache;
    use crate::server::create_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn raw_get(addr: std::net::SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("swagger-ui.css"), "body {}").unwrap();

        let mut config = Config::defaults().unwrap();
        config.logging.access_log = false;
        let doc = serde_json::json!({"openapi": "3.0.0", "info": {"title": "Loop", "version": "1"}});
        let bundle = DocumentBundle::build("", None, doc, ExportOptions::default()).unwrap();
        let state = Arc::new(AppState::new(
            config,
            DocumentRegistry::from(bundle),
            StaticAssetCache::new(dir.path()),
        ));

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async move {
                let server = tokio::task::spawn_local(start_server_loop(listener, state, async {
                    let _ = stop_rx.await;
                }));

                let json = raw_get(addr, "/json").await;
                assert!(json.starts_with("HTTP/1.1 200 OK"));
                assert!(json.contains("swagger.json"));
                assert!(json.contains(r#""title":"Loop""#));

                let css = raw_get(addr, "/swagger-ui.css").await;
                assert!(css.starts_with("HTTP/1.1 200 OK"));
                assert!(css.ends_with("body {}"));

                let missing = raw_get(addr, "/missing.js").await;
                assert!(missing.starts_with("HTTP/1.1 404 Not Found"));

                stop_tx.send(()).unwrap();
                server.await.unwrap();
            })
            .await;
    }
}
