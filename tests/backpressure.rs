//! Request cap: at most `max_concurrent_requests` handlers execute at
//! once; excess submissions queue on the semaphore and still complete.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde_json::{json, Value};
use taskbridge::{
    Config, HandlerFn, RequestBridge, Runtime, ServiceRegistry, TaskContext, TaskError,
};

#[test]
fn request_cap_bounds_concurrency() {
    let cfg = Config {
        max_concurrent_requests: 2,
        ..Config::default()
    };
    let runtime = Runtime::start(cfg, ServiceRegistry::builder().build(), Vec::new())
        .expect("start");

    let executing = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let bridge = {
        let executing = executing.clone();
        let peak = peak.clone();
        RequestBridge::builder(runtime.handle())
            .operation(HandlerFn::arc(
                "slow",
                move |_ctx: TaskContext, args: Value| {
                    let executing = executing.clone();
                    let peak = peak.clone();
                    async move {
                        let now = executing.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        executing.fetch_sub(1, Ordering::SeqCst);
                        Ok::<_, TaskError>(args)
                    }
                },
            ))
            .build()
    };

    // Twice as many callers as the cap allows to run at once.
    let callers: Vec<_> = (0..4)
        .map(|i| {
            let bridge = bridge.clone();
            thread::spawn(move || bridge.handle("slow", json!(i)).unwrap())
        })
        .collect();
    for caller in callers {
        assert!(caller.join().unwrap().is_number());
    }

    assert_eq!(
        peak.load(Ordering::SeqCst),
        2,
        "cap bounds concurrent handlers"
    );
    assert_eq!(executing.load(Ordering::SeqCst), 0);
}
