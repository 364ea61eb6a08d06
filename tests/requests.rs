//! Request-path end-to-end coverage.
//!
//! The start guard is process-wide, so everything that needs the shared
//! runtime runs inside one test function: bootstrap, concurrent calls,
//! failure isolation, and the shutdown rejection path.

use std::thread;

use serde_json::{json, Value};
use taskbridge::{
    Config, HandlerFn, RequestBridge, Runtime, RuntimeError, ServiceRegistry, ShutdownController,
    TaskContext, TaskError,
};

struct Echo;

impl Echo {
    fn echo(&self, v: Value) -> Value {
        v
    }
}

fn build_bridge(runtime: &Runtime) -> RequestBridge {
    RequestBridge::builder(runtime.handle())
        .operation(HandlerFn::arc(
            "echo",
            |ctx: TaskContext, args: Value| async move {
                let echo = ctx.resolve::<Echo>("echo")?;
                Ok::<_, TaskError>(echo.echo(args))
            },
        ))
        .operation(HandlerFn::arc(
            "needs-missing-service",
            |ctx: TaskContext, _args: Value| async move {
                let _ = ctx.resolve::<Echo>("never-registered")?;
                Ok::<_, TaskError>(Value::Null)
            },
        ))
        .operation(HandlerFn::arc(
            "explodes",
            |_ctx: TaskContext, args: Value| async move {
                if args.is_null() {
                    panic!("handler exploded");
                }
                Ok::<_, TaskError>(Value::Null)
            },
        ))
        .build()
}

#[test]
fn request_path_end_to_end() {
    let registry = ServiceRegistry::builder().register("echo", Echo).build();
    let runtime = Runtime::start(Config::default(), registry, Vec::new()).expect("first start");

    // Exactly one runtime per process; the first stays usable.
    let second = Runtime::start(
        Config::default(),
        ServiceRegistry::builder().build(),
        Vec::new(),
    );
    assert!(matches!(second, Err(RuntimeError::AlreadyStarted)));

    let bridge = build_bridge(&runtime);
    assert_eq!(
        bridge.operations(),
        vec!["echo", "explodes", "needs-missing-service"]
    );

    // Echo end-to-end.
    assert_eq!(bridge.handle("echo", json!("abc")).unwrap(), json!("abc"));

    // Unknown operation name.
    let err = bridge.handle("no-such-op", json!(null)).unwrap_err();
    assert!(matches!(err, TaskError::HandlerNotFound { .. }));

    // An unregistered service fails the offending task only.
    let err = bridge.handle("needs-missing-service", json!(null)).unwrap_err();
    assert_eq!(err.as_label(), "service_not_found");
    assert_eq!(bridge.handle("echo", json!(1)).unwrap(), json!(1));

    // A panicking handler becomes a structured fatal error, never an
    // unwinding fault across the boundary.
    let err = bridge.handle("explodes", json!(null)).unwrap_err();
    assert_eq!(err.as_label(), "task_fatal");
    assert_eq!(bridge.handle("echo", json!(2)).unwrap(), json!(2));

    // N concurrent callers get exactly N terminal responses.
    let callers: Vec<_> = (0..16)
        .map(|i| {
            let bridge = bridge.clone();
            thread::spawn(move || bridge.handle("echo", json!(i)).unwrap())
        })
        .collect();
    let mut got: Vec<i64> = callers
        .into_iter()
        .map(|c| c.join().unwrap().as_i64().unwrap())
        .collect();
    got.sort_unstable();
    assert_eq!(got, (0..16).collect::<Vec<i64>>());

    // Transport shape: always one well-formed response.
    assert_eq!(
        bridge.handle_json("echo", json!("x")),
        json!({ "ok": true, "value": "x" })
    );
    let resp = bridge.handle_json("no-such-op", json!(null));
    assert_eq!(resp["ok"], json!(false));
    assert_eq!(resp["error"], json!("handler_not_found"));

    // Shutdown: later submissions are rejected immediately, with a
    // condition distinct from "failed while running".
    let controller = ShutdownController::new(runtime.handle());
    controller.trigger().expect("drains within grace");
    let err = bridge.handle("echo", json!("abc")).unwrap_err();
    assert!(err.is_shutdown());
    let resp = bridge.handle_json("echo", json!(null));
    assert_eq!(resp["error"], json!("shutting_down"));

    // Second trigger is a no-op.
    controller.trigger().expect("idempotent");
}
