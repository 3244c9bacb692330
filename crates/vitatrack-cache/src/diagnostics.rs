//! Backend round-trip probe.
//!
//! Writes a random marker under the diagnostic key and reads it back,
//! reporting the round-trip latency. Operational tooling calls this to
//! distinguish "cache down" from "cache slow" without touching any real
//! entry.

use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

use crate::backend::DynCacheBackend;
use crate::keys;

/// Marker lifetime; long enough to observe, short enough to not linger.
const PROBE_TTL: Duration = Duration::from_secs(60);

/// Measures one write-then-read round trip against the backend.
///
/// Returns `None` when the backend dropped either half: the write was
/// rejected, the read missed, or another probe overwrote the marker in
/// between.
pub async fn probe(backend: &DynCacheBackend) -> Option<Duration> {
    let marker = Uuid::new_v4().simple().to_string();
    let started = Instant::now();

    if !backend
        .set(keys::PERF_PROBE_KEY, &marker, Some(PROBE_TTL))
        .await
    {
        return None;
    }
    let read = backend.get(keys::PERF_PROBE_KEY).await?;
    if read != marker {
        return None;
    }

    let elapsed = started.elapsed();
    debug!(elapsed_micros = elapsed.as_micros() as u64, "cache probe round trip");
    Some(elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use std::sync::Arc;
    use tokio_test::block_on;

    #[test]
    fn test_probe_round_trip() {
        let backend: DynCacheBackend = Arc::new(MemoryBackend::new());
        assert!(block_on(probe(&backend)).is_some());
    }

    #[test]
    fn test_probe_reports_down_backend() {
        let memory = Arc::new(MemoryBackend::new());
        memory.set_connected(false);
        let backend: DynCacheBackend = memory;
        assert_eq!(block_on(probe(&backend)), None);
    }

    #[test]
    fn test_probe_against_disabled_backend() {
        let backend: DynCacheBackend = Arc::new(crate::backend::DisabledBackend);
        assert_eq!(block_on(probe(&backend)), None);
    }
}
