use super::{AccessoryAsset, AssetStore, ImageFetcher, LoadRequest};
use crate::{Error, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use image::RgbaImage;
use log::{debug, info, warn};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Result of one attempt, sent back to the frame thread
struct LoadOutcome {
    asset_id: String,
    attempt: usize,
    result: Result<RgbaImage>,
}

/// Fire-and-forget asset loading on a background thread
///
/// Requests go out over one channel and outcomes come back over another.
/// Asset state is only touched by [`poll`](Self::poll) and
/// [`settle`](Self::settle), which the caller runs on the frame thread.
pub struct AssetLoader {
    request_sender: Option<Sender<LoadRequest>>,
    outcome_receiver: Receiver<LoadOutcome>,
    thread_handle: Option<JoinHandle<()>>,
}

impl AssetLoader {
    /// Spawn the worker thread
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Result<Self> {
        let (request_sender, request_receiver) = crossbeam_channel::unbounded::<LoadRequest>();
        let (outcome_sender, outcome_receiver) = crossbeam_channel::unbounded::<LoadOutcome>();

        let thread_handle = std::thread::Builder::new()
            .name("asset-loader".to_string())
            .spawn(move || Self::worker(&request_receiver, &outcome_sender, fetcher.as_ref()))
            .map_err(|e| Error::AssetError(format!("Failed to spawn loader thread: {e}")))?;

        Ok(Self {
            request_sender: Some(request_sender),
            outcome_receiver,
            thread_handle: Some(thread_handle),
        })
    }

    fn worker(requests: &Receiver<LoadRequest>, outcomes: &Sender<LoadOutcome>, fetcher: &dyn ImageFetcher) {
        debug!("Asset loader thread started");
        while let Ok(request) = requests.recv() {
            let result = fetcher
                .fetch(&request)
                .and_then(|bytes| Ok(image::load_from_memory(&bytes)?.to_rgba8()));
            let outcome = LoadOutcome {
                asset_id: request.asset_id,
                attempt: request.attempt,
                result,
            };
            if outcomes.send(outcome).is_err() {
                break;
            }
        }
        debug!("Asset loader thread stopped");
    }

    fn submit(&self, request: LoadRequest) {
        debug!(
            "Loading {} (attempt {}, cors={}, no_referrer={})",
            request.asset_id,
            request.attempt + 1,
            request.strategy.cross_origin,
            request.strategy.no_referrer
        );
        let Some(sender) = &self.request_sender else {
            return;
        };
        if sender.send(request).is_err() {
            warn!("Asset loader thread is gone; request dropped");
        }
    }

    /// Start loading one asset; no-op unless it is idle
    pub fn load(&self, asset: &mut AccessoryAsset) {
        if let Some(request) = asset.begin() {
            self.submit(request);
        }
    }

    /// Start loading every idle asset in the store
    pub fn load_all(&self, store: &mut AssetStore) {
        for asset in store.iter_mut() {
            self.load(asset);
        }
    }

    /// Apply all finished attempts without blocking
    ///
    /// Returns the number of outcomes applied.
    pub fn poll(&self, store: &mut AssetStore) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.outcome_receiver.try_recv() {
            self.apply(store, outcome);
            applied += 1;
        }
        applied
    }

    /// Block until no asset is loading or `timeout` passes
    ///
    /// Returns `true` if every requested asset reached a terminal state.
    pub fn settle(&self, store: &mut AssetStore, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        self.poll(store);
        while store.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.outcome_receiver.recv_timeout(remaining) {
                Ok(outcome) => self.apply(store, outcome),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        !store.is_loading()
    }

    fn apply(&self, store: &mut AssetStore, outcome: LoadOutcome) {
        let Some(asset) = store.get_mut(&outcome.asset_id) else {
            warn!("Load result for unknown asset {}", outcome.asset_id);
            return;
        };

        match outcome.result {
            Ok(image) => {
                let (width, height) = image.dimensions();
                if asset.on_success(outcome.attempt, image) {
                    info!("Loaded {} image {} ({width}x{height})", asset.mode.item_name(), asset.id);
                }
            }
            Err(e) => {
                warn!(
                    "Attempt {} for {} image {} failed: {e}",
                    outcome.attempt + 1,
                    asset.mode.item_name(),
                    asset.id
                );
                let was_current = asset.attempt_number() == Some(outcome.attempt + 1);
                match asset.on_failure(outcome.attempt) {
                    Some(next) => self.submit(next),
                    None if was_current => {
                        warn!("All {} load strategies failed for {}", asset.strategies.len(), asset.id);
                    }
                    None => {}
                }
            }
        }
    }
}

impl Drop for AssetLoader {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop
        self.request_sender.take();
        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                warn!("Asset loader thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::LoadState;
    use crate::resolvers::Mode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Failing {
        calls: AtomicUsize,
    }

    impl ImageFetcher for Failing {
        fn fetch(&self, request: &LoadRequest) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::Http(format!("unreachable: {}", request.url)))
        }
    }

    #[test]
    fn test_undecodable_bytes_count_as_failure() {
        struct Garbage;
        impl ImageFetcher for Garbage {
            fn fetch(&self, _: &LoadRequest) -> Result<Vec<u8>> {
                Ok(b"not an image".to_vec())
            }
        }

        let loader = AssetLoader::new(Arc::new(Garbage)).unwrap();
        let mut store = AssetStore::new();
        store.insert(AccessoryAsset::new("n", Mode::Necklace, "https://a/n.png", None));
        loader.load_all(&mut store);

        assert!(loader.settle(&mut store, Duration::from_secs(5)));
        assert_eq!(store.get("n").unwrap().state(), LoadState::Exhausted);
    }

    #[test]
    fn test_fallback_rung_is_tried_last() {
        let fetcher = Arc::new(Failing {
            calls: AtomicUsize::new(0),
        });
        let loader = AssetLoader::new(fetcher.clone()).unwrap();
        let mut store = AssetStore::new();
        store.insert(AccessoryAsset::new("e", Mode::Earrings, "https://a/e.png", Some("https://b/e.png")));
        loader.load_all(&mut store);

        assert!(loader.settle(&mut store, Duration::from_secs(5)));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 4);
        assert_eq!(store.get("e").unwrap().state(), LoadState::Exhausted);
    }
}
