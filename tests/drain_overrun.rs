//! Degraded shutdown: daemons that ignore their token outlive the grace
//! period, and the drain reports instead of hanging.

use std::thread;
use std::time::Duration;

use taskbridge::{
    Config, DaemonFn, DaemonSpec, Runtime, RuntimeError, Schedule, ServiceRegistry,
    ShutdownController, Supervisor, TaskContext, TaskError,
};

#[test]
fn drain_reports_grace_exceeded() {
    let cfg = Config {
        grace: Duration::from_millis(100),
        ..Config::default()
    };
    let runtime = Runtime::start(cfg, ServiceRegistry::builder().build(), Vec::new())
        .expect("start");
    let supervisor = Supervisor::new(runtime.handle());

    // Two daemons that never check their token; sequential mode keeps each
    // actor pinned inside its invocation.
    for name in ["stuck-a", "stuck-b"] {
        let daemon = DaemonFn::arc(name, |_ctx: TaskContext| async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<_, TaskError>(())
        });
        supervisor
            .run_daemon(DaemonSpec::new(
                daemon,
                Schedule::every(Duration::from_millis(10)).from_end(),
            ))
            .expect("scheduled");
    }

    // Let both invocations start before pulling the plug.
    thread::sleep(Duration::from_millis(50));

    let controller = ShutdownController::new(runtime.handle());
    let err = controller.trigger().expect_err("tasks outlive the grace");
    assert_eq!(err.as_label(), "runtime_grace_exceeded");
    match err {
        RuntimeError::GraceExceeded { grace, active } => {
            assert_eq!(grace, Duration::from_millis(100));
            assert_eq!(active, 2, "both stuck actors still tracked");
        }
        other => panic!("expected GraceExceeded, got {other:?}"),
    }

    // Degraded, not broken: later submissions still get the shutdown
    // condition rather than a hang.
    assert!(runtime.handle().is_shutting_down());
}
