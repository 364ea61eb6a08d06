//! The full host scenario: one shared runtime with a random-data service,
//! a daemon sampling it once a second, and transport threads answering
//! synchronous calls through the bridge.
//!
//! Run with: `cargo run --example random_service --features logging`

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::RngCore;
use serde_json::{json, Value};
use taskbridge::{
    Config, DaemonFn, DaemonSpec, HandlerFn, LogWriter, RequestBridge, Runtime, Schedule,
    ServiceRegistry, ShutdownController, Supervisor, TaskContext, TaskError,
};

struct RandomData;

impl RandomData {
    fn hex_bytes(&self, len: usize) -> String {
        let mut buf = vec![0u8; len];
        rand::thread_rng().fill_bytes(&mut buf);
        buf.iter().map(|b| format!("{b:02x}")).collect()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = ServiceRegistry::builder()
        .register("random", RandomData)
        .build();
    let runtime = Runtime::start(Config::default(), registry, vec![Arc::new(LogWriter)])?;

    // Background sampling for the life of the process.
    let supervisor = Supervisor::new(runtime.handle());
    let sampler = DaemonFn::arc("random-sampler", |ctx: TaskContext| async move {
        let random = ctx.resolve::<RandomData>("random")?;
        println!("random data: {}", random.hex_bytes(16));
        Ok::<_, TaskError>(())
    });
    supervisor.run_daemon(DaemonSpec::new(
        sampler,
        Schedule::every(Duration::from_secs(1)),
    ))?;

    // The operation an external transport would invoke per call.
    let bridge = RequestBridge::builder(runtime.handle())
        .operation(HandlerFn::arc(
            "get-random-data",
            |ctx: TaskContext, args: Value| async move {
                let len = args.get("length").and_then(Value::as_u64).unwrap_or(16) as usize;
                if len > 1024 {
                    return Err(TaskError::fail("length too large"));
                }
                let random = ctx.resolve::<RandomData>("random")?;
                Ok(json!(random.hex_bytes(len)))
            },
        ))
        .build();

    // Transport threads standing in for external callers.
    let callers: Vec<_> = (0..4)
        .map(|i| {
            let bridge = bridge.clone();
            thread::spawn(move || {
                for _ in 0..3 {
                    let resp = bridge.handle_json("get-random-data", json!({ "length": 8 + i }));
                    println!("caller {i}: {resp}");
                    thread::sleep(Duration::from_millis(400));
                }
            })
        })
        .collect();
    for caller in callers {
        let _ = caller.join();
    }

    // Host decided to exit.
    let controller = ShutdownController::new(runtime.handle());
    controller.trigger()?;
    Ok(())
}
