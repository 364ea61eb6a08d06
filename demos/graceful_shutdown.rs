//! Signal-driven shutdown: a ticking daemon runs until Ctrl-C, then the
//! controller drains within the grace period.
//!
//! Run with: `cargo run --example graceful_shutdown --features logging`

use std::sync::Arc;
use std::time::Duration;

use taskbridge::{
    Config, DaemonFn, DaemonSpec, LogWriter, Runtime, Schedule, ServiceRegistry,
    ShutdownController, Supervisor, TaskContext, TaskError,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config {
        grace: Duration::from_secs(3),
        ..Config::default()
    };
    let runtime = Runtime::start(
        cfg,
        ServiceRegistry::builder().build(),
        vec![Arc::new(LogWriter)],
    )?;

    let supervisor = Supervisor::new(runtime.handle());
    let ticker = DaemonFn::arc("ticker", |ctx: TaskContext| async move {
        if ctx.is_cancelled() {
            return Ok(());
        }
        println!("tick");
        Ok::<_, TaskError>(())
    });
    supervisor.run_daemon(DaemonSpec::new(
        ticker,
        Schedule::every(Duration::from_millis(500)).from_end(),
    ))?;

    println!("running; press Ctrl-C to stop");
    let controller = ShutdownController::new(runtime.handle());
    runtime.block_on(controller.run_until_signal())?;
    Ok(())
}
