use anyhow::{Context, Result};
use serde_json::json;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use super::DocumentSink;

/// Ships each document as one newline-delimited JSON envelope over a fresh
/// TCP connection. Connection-per-append keeps the sink stateless; the
/// delivery adapter owns what happens when a connection cannot be made.
#[derive(Clone)]
pub struct TcpSink {
    addr: String,
}

impl TcpSink {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }
}

impl DocumentSink for TcpSink {
    async fn append(&self, collection: &str, document: &serde_json::Value) -> Result<()> {
        let stream = TcpStream::connect(&self.addr)
            .await
            .with_context(|| format!("cannot connect to log store at {}", self.addr))?;
        let (_, mut writer) = stream.into_split();

        let envelope = json!({
            "collection": collection,
            "document": document,
        });
        let mut line = serde_json::to_string(&envelope)?;
        line.push('\n');

        writer
            .write_all(line.as_bytes())
            .await
            .context("failed to write document")?;
        writer.shutdown().await.context("failed to flush document")?;

        Ok(())
    }
}
