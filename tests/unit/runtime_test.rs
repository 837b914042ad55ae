//! Tests for runtime adapters and snapshots

use std::sync::Arc;
use std::time::Duration;

use prometheus_ticker::core::{FrameSource, Ticker, TickerCallback, UpdatePriority};
use prometheus_ticker::runtime::{TickerSnapshot, TokioFrameSource};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_source_fires_request() {
    let source = TokioFrameSource::current(100.0).expect("tokio source");
    assert!((source.interval().as_secs_f64() - 0.01).abs() < 1e-6);

    let (tx, rx) = tokio::sync::oneshot::channel();
    let tx = parking_lot::Mutex::new(Some(tx));
    let requested = source.request_frame(Arc::new(move |id, time| {
        if let Some(tx) = tx.lock().take() {
            let _ = tx.send((id, time));
        }
    }));

    let (fired, time) = rx.await.expect("frame result");
    assert_eq!(fired, requested);
    assert!(time >= 0.0);
    assert_eq!(source.pending(), 0);
}

#[tokio::test]
async fn test_tokio_source_cancel() {
    let source = TokioFrameSource::current(50.0).expect("tokio source");
    let id = source.request_frame(Arc::new(|_, _| panic!("cancelled frame fired")));
    assert_eq!(source.pending(), 1);
    source.cancel_frame(id);
    assert_eq!(source.pending(), 0);
    tokio::time::sleep(Duration::from_millis(40)).await;
}

#[test]
fn test_tokio_source_requires_runtime() {
    assert!(TokioFrameSource::current(60.0).is_err());
}

#[test]
fn test_tokio_source_rejects_bad_fps() {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    assert!(TokioFrameSource::new(rt.handle().clone(), 0.0).is_err());
    assert!(TokioFrameSource::new(rt.handle().clone(), f64::INFINITY).is_err());
}

#[test]
fn test_snapshot_serializes() {
    let ticker = Ticker::new();
    let listener = TickerCallback::new(|_| {});
    ticker.add(&listener, None, UpdatePriority::Normal);
    ticker.update(16.0);

    let snap = ticker.snapshot();
    let json = serde_json::to_string(&snap).unwrap();
    let back: TickerSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.id, ticker.id());
    assert_eq!(back.count, 1);
    assert!(back.started);
    assert!(!back.protected);
}
