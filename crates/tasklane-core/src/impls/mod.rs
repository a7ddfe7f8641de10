//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **HttpEventSink**: event broker への配送（本番用）
//! - **MemoryEventSink**: 記録するだけの sink（テスト・ローカル用）
//! - **LocalResourceFetcher**: ローカルファイルシステム
//! - **ConfigurationServiceFetcher**: configuration service からの取得

pub mod config_service;
pub mod http_sink;
pub mod local_fetcher;
pub mod memory_sink;

pub use self::config_service::ConfigurationServiceFetcher;
pub use self::http_sink::HttpEventSink;
pub use self::local_fetcher::LocalResourceFetcher;
pub use self::memory_sink::MemoryEventSink;

#[cfg(test)]
pub(crate) mod test_server {
    use tokio::net::TcpListener;

    /// Serves `app` on an ephemeral local port and returns its base URL.
    pub async fn spawn(app: axum::Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}
