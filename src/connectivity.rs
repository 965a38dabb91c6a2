use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Decides whether the loop may attempt delivery this interval.
///
/// Implementations must be side-effect free; retry cadence is owned by the
/// caller.
#[allow(async_fn_in_trait)]
pub trait Connectivity {
    async fn is_connected(&self) -> bool;
}

/// Reach-check against a well-known address. Any transport failure or
/// timeout reads as "offline".
pub struct NetGate {
    probe_addr: String,
    probe_timeout: Duration,
}

impl NetGate {
    pub fn new(probe_addr: impl Into<String>, probe_timeout: Duration) -> Self {
        Self {
            probe_addr: probe_addr.into(),
            probe_timeout,
        }
    }
}

impl Connectivity for NetGate {
    async fn is_connected(&self) -> bool {
        matches!(
            timeout(self.probe_timeout, TcpStream::connect(&self.probe_addr)).await,
            Ok(Ok(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn reachable_listener_reads_as_connected() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        let gate = NetGate::new(addr.to_string(), Duration::from_secs(1));
        assert!(gate.is_connected().await);
    }

    #[tokio::test]
    async fn refused_connection_reads_as_offline() {
        // Bind then drop so the port is closed when the gate probes it.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind ephemeral port");
            listener.local_addr().expect("local addr")
        };

        let gate = NetGate::new(addr.to_string(), Duration::from_secs(1));
        assert!(!gate.is_connected().await);
    }
}
