// ── Reactive device feed ──
//
// A view layer holds a `DeviceStream` and re-renders whenever the store
// publishes a new device collection.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::Device;

/// One published device collection, in store order.
pub type DeviceSnapshot = Arc<Vec<Arc<Device>>>;

/// A subscription to the device collection.
///
/// Offers the snapshot captured at subscription time, the latest one, and
/// change notification via [`changed`](Self::changed) or a `Stream`.
pub struct DeviceStream {
    current: DeviceSnapshot,
    receiver: watch::Receiver<DeviceSnapshot>,
}

impl DeviceStream {
    pub(crate) fn new(mut receiver: watch::Receiver<DeviceSnapshot>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// The snapshot seen most recently by this subscriber.
    pub fn current(&self) -> &DeviceSnapshot {
        &self.current
    }

    /// The latest published snapshot, without marking it seen.
    pub fn latest(&self) -> DeviceSnapshot {
        self.receiver.borrow().clone()
    }

    /// Whether a snapshot newer than [`current`](Self::current) exists.
    /// `false` once the store is gone.
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Wait for the next publish and return it.
    /// Returns `None` if the store has been dropped.
    pub async fn changed(&mut self) -> Option<DeviceSnapshot> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = Arc::clone(&snap);
        Some(snap)
    }

    /// Convert into a `Stream`. The first item is the latest snapshot.
    pub fn into_stream(self) -> DeviceWatchStream {
        DeviceWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter yielding a snapshot per store publish.
pub struct DeviceWatchStream {
    inner: WatchStream<DeviceSnapshot>,
}

impl Stream for DeviceWatchStream {
    type Item = DeviceSnapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::future::poll_fn;

    use super::*;
    use crate::model::DeviceId;
    use crate::patch::ConfigPatch;
    use crate::store::{DeviceStore, MemorySlot};

    fn store() -> DeviceStore<MemorySlot> {
        DeviceStore::load(MemorySlot::new()).unwrap()
    }

    #[test]
    fn starts_with_current_snapshot() {
        let store = store();
        let stream = store.subscribe();
        assert_eq!(stream.current().len(), 4);
        assert!(!stream.has_changed());
    }

    #[test]
    fn sees_replacements() {
        let mut store = store();
        let mut stream = store.subscribe();

        let device = store.device(&DeviceId::from("switch-004")).unwrap();
        let patch = ConfigPatch {
            mtu: Some(Some(9000)),
            ..ConfigPatch::default()
        };
        let ports = device.ports.iter().map(|p| patch.apply_shared(p)).collect();
        assert!(store.replace(device.with_ports(ports)).unwrap());

        assert!(stream.has_changed());
        let snap = tokio_test::block_on(stream.changed()).unwrap();
        assert_eq!(snap[3].ports[0].mtu, Some(9000));
        assert!(Arc::ptr_eq(stream.current(), &snap));
        assert!(!stream.has_changed());
    }

    #[test]
    fn changed_returns_none_after_store_drop() {
        let store = store();
        let mut stream = store.subscribe();
        drop(store);
        assert!(tokio_test::block_on(stream.changed()).is_none());
    }

    #[test]
    fn stream_yields_latest_first() {
        let store = store();
        let mut stream = store.subscribe().into_stream();
        let first = tokio_test::block_on(poll_fn(|cx| Pin::new(&mut stream).poll_next(cx)));
        assert_eq!(first.unwrap().len(), 4);
    }
}
