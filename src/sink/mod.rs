mod tcp;

pub use tcp::TcpSink;

use anyhow::Result;
use log::error;
use serde::Serialize;

/// Append-only remote document store. The agent only ever appends; it never
/// reads back.
#[allow(async_fn_in_trait)]
pub trait DocumentSink {
    async fn append(&self, collection: &str, document: &serde_json::Value) -> Result<()>;
}

/// Best-effort delivery: serialize, append, and on any failure log and move
/// on. The caller's state is never rolled back — a lost record stays lost
/// while accumulation continues forward.
pub async fn deliver<S: DocumentSink, T: Serialize>(sink: &S, collection: &str, document: &T) {
    let value = match serde_json::to_value(document) {
        Ok(value) => value,
        Err(err) => {
            error!("failed to serialize document for {collection}: {err}");
            return;
        }
    };

    if let Err(err) = sink.append(collection, &value).await {
        error!("failed to append document to {collection}: {err:#}");
    }
}
