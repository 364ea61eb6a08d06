//! Daemon scheduling and drain coverage.
//!
//! One process-level scenario: fixed-delay invocation counts, the stop
//! failure policy, sequential (from-end) scheduling, the freeze after
//! cancellation, and the terminal event ordering.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use taskbridge::{
    Config, DaemonFn, DaemonRef, DaemonSpec, Event, EventKind, FailurePolicy, Runtime, Schedule,
    ServiceRegistry, ShutdownController, Subscriber, Supervisor, TaskContext, TaskError,
};

struct Recorder(Mutex<Vec<Event>>);

#[async_trait]
impl Subscriber for Recorder {
    async fn on_event(&self, event: &Event) {
        self.0.lock().unwrap().push(event.clone());
    }
}

fn counting_daemon(
    name: &'static str,
    counter: Arc<AtomicUsize>,
    work: Duration,
) -> DaemonRef {
    DaemonFn::arc(name, move |_ctx: TaskContext| {
        let counter = counter.clone();
        async move {
            if work > Duration::ZERO {
                tokio::time::sleep(work).await;
            }
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, TaskError>(())
        }
    })
}

#[test]
fn daemon_schedules_and_drains() {
    let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
    let runtime = Runtime::start(
        Config::default(),
        ServiceRegistry::builder().build(),
        vec![recorder.clone() as Arc<dyn Subscriber>],
    )
    .expect("start");
    let supervisor = Supervisor::new(runtime.handle());

    // Fixed delay from start, 50ms period, observed over 220ms.
    let fast = Arc::new(AtomicUsize::new(0));
    supervisor
        .run_daemon(DaemonSpec::new(
            counting_daemon("fast", fast.clone(), Duration::ZERO),
            Schedule::every(Duration::from_millis(50)),
        ))
        .expect("scheduled");

    // Sequential ticks: 30ms of work, 50ms delay measured from tick end,
    // so starts are ~80ms apart.
    let slow = Arc::new(AtomicUsize::new(0));
    supervisor
        .run_daemon(DaemonSpec::new(
            counting_daemon("slow", slow.clone(), Duration::from_millis(30)),
            Schedule::every(Duration::from_millis(50)).from_end(),
        ))
        .expect("scheduled");

    // Overlapping ticks: 80ms of work on a 30ms period, so invocations are
    // still in flight when the drain fires.
    let overlap = Arc::new(AtomicUsize::new(0));
    supervisor
        .run_daemon(DaemonSpec::new(
            counting_daemon("overlap", overlap.clone(), Duration::from_millis(80)),
            Schedule::every(Duration::from_millis(30)),
        ))
        .expect("scheduled");

    // First failure stops this one.
    let failures = Arc::new(AtomicUsize::new(0));
    let flaky = {
        let failures = failures.clone();
        DaemonFn::arc("flaky", move |_ctx: TaskContext| {
            let failures = failures.clone();
            async move {
                failures.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TaskError::fail("boom"))
            }
        })
    };
    supervisor
        .run_daemon(
            DaemonSpec::new(flaky, Schedule::every(Duration::from_millis(30)))
                .with_failure_policy(FailurePolicy::Stop),
        )
        .expect("scheduled");

    thread::sleep(Duration::from_millis(220));

    let fast_ticks = fast.load(Ordering::SeqCst);
    assert!(
        (3..=5).contains(&fast_ticks),
        "expected 3..=5 fast ticks in 220ms, got {fast_ticks}"
    );
    let slow_ticks = slow.load(Ordering::SeqCst);
    assert!(
        (2..=4).contains(&slow_ticks),
        "expected 2..=4 sequential ticks in 220ms, got {slow_ticks}"
    );
    assert_eq!(failures.load(Ordering::SeqCst), 1, "stop policy lets one tick run");

    // Drain: schedules stop strictly after cancellation plus the current
    // invocation.
    let controller = ShutdownController::new(runtime.handle());
    controller.trigger().expect("drains within grace");

    let frozen = fast.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(120));
    assert_eq!(fast.load(Ordering::SeqCst), frozen, "no tick after drain");

    // New daemons are rejected once shutdown fired.
    let late = DaemonFn::arc("late", |_ctx: TaskContext| async move {
        Ok::<_, TaskError>(())
    });
    let err = supervisor
        .run_daemon(DaemonSpec::new(
            late,
            Schedule::every(Duration::from_millis(10)),
        ))
        .unwrap_err();
    assert!(err.is_shutdown());

    // Let the listener deliver the tail of the event stream.
    thread::sleep(Duration::from_millis(50));
    let events = recorder.0.lock().unwrap();

    // Stopped is terminal: it comes after every in-flight invocation,
    // including the ones overlapping the drain.
    let stopped = events
        .iter()
        .find(|e| e.kind == EventKind::DaemonStopped && e.task.as_deref() == Some("overlap"))
        .expect("overlap reached its terminal state");
    let last_tick = events
        .iter()
        .filter(|e| e.kind == EventKind::DaemonTickCompleted && e.task.as_deref() == Some("overlap"))
        .map(|e| e.seq)
        .max()
        .expect("overlap completed at least one tick");
    assert!(
        stopped.seq > last_tick,
        "stopped (seq {}) must follow the last completed tick (seq {last_tick})",
        stopped.seq
    );

    // The late daemon's rejection is observable, like a rejected request.
    assert!(events
        .iter()
        .any(|e| e.kind == EventKind::DaemonRejected && e.task.as_deref() == Some("late")));
}
