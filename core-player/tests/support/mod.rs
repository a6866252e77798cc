//! Shared test double for the media engine: records every command and lets
//! tests gate or fail individual enqueue calls to control completion order.

#![allow(dead_code)]

use media_bridge::{BridgeError, EngineEvent, EnqueueRequest, MediaEngine};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, Notify};

pub struct MockEngine {
    events: broadcast::Sender<EngineEvent>,
    init_calls: AtomicUsize,
    play_calls: AtomicUsize,
    pause_calls: AtomicUsize,
    reset_calls: AtomicUsize,
    enqueued: Mutex<Vec<EnqueueRequest>>,
    seeks: Mutex<Vec<f64>>,
    volumes: Mutex<Vec<f32>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    failing: Mutex<HashSet<String>>,
}

impl MockEngine {
    pub fn new() -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            events,
            init_calls: AtomicUsize::new(0),
            play_calls: AtomicUsize::new(0),
            pause_calls: AtomicUsize::new(0),
            reset_calls: AtomicUsize::new(0),
            enqueued: Mutex::new(Vec::new()),
            seeks: Mutex::new(Vec::new()),
            volumes: Mutex::new(Vec::new()),
            gates: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
        })
    }

    /// Make `reset_and_enqueue` for `url` wait until the returned gate is
    /// notified.
    pub fn hold(&self, url: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(url.to_string(), gate.clone());
        gate
    }

    /// Make `reset_and_enqueue` for `url` fail.
    pub fn fail_enqueue(&self, url: &str) {
        self.failing.lock().unwrap().insert(url.to_string());
    }

    pub fn clear_failures(&self) {
        self.failing.lock().unwrap().clear();
    }

    /// Emit an event as the engine would.
    pub fn emit(&self, event: EngineEvent) {
        let _ = self.events.send(event);
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn play_calls(&self) -> usize {
        self.play_calls.load(Ordering::SeqCst)
    }

    pub fn pause_calls(&self) -> usize {
        self.pause_calls.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) -> usize {
        self.reset_calls.load(Ordering::SeqCst)
    }

    pub fn enqueued(&self) -> Vec<EnqueueRequest> {
        self.enqueued.lock().unwrap().clone()
    }

    pub fn seeks(&self) -> Vec<f64> {
        self.seeks.lock().unwrap().clone()
    }

    pub fn volumes(&self) -> Vec<f32> {
        self.volumes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MediaEngine for MockEngine {
    async fn initialize(&self) -> media_bridge::Result<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn reset_and_enqueue(&self, track: EnqueueRequest) -> media_bridge::Result<()> {
        let gate = self.gates.lock().unwrap().get(&track.url).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.failing.lock().unwrap().contains(&track.url) {
            return Err(BridgeError::OperationFailed(format!(
                "enqueue rejected for {}",
                track.url
            )));
        }
        self.enqueued.lock().unwrap().push(track);
        Ok(())
    }

    async fn play(&self) -> media_bridge::Result<()> {
        self.play_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn pause(&self) -> media_bridge::Result<()> {
        self.pause_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn seek_to(&self, position: f64) -> media_bridge::Result<()> {
        self.seeks.lock().unwrap().push(position);
        Ok(())
    }

    async fn set_volume(&self, volume: f32) -> media_bridge::Result<()> {
        self.volumes.lock().unwrap().push(volume);
        Ok(())
    }

    async fn reset(&self) -> media_bridge::Result<()> {
        self.reset_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }
}

/// Let spawned tasks run to their next suspension point on the
/// current-thread test runtime.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
