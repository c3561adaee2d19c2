mod blackboard; // shared run state
mod bus; // broadcast topics and the executor observer
mod render; // terminal arena view
mod settings; // layered configuration

use anyhow::Context;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{self, EnvFilter};

use gridrover_navigation::{AbortReason, CollisionChecker, MotionExecutor, RunStatus, ScanAndAvoid};

use blackboard::{raise_fault, snapshot};
use bus::{BusObserver, Event, Topic};
use render::Renderer;

// Large enough to hold a whole run, so a slow renderer never lags.
const EVENT_CAPACITY: usize = 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("gridrover starting. Loading configuration...");
    let settings = settings::load().context("failed to load configuration")?;

    let bounds = settings.bounds()?;
    let transform = settings.transform()?;
    let obstacles = settings.obstacles();
    let hints = settings.hints()?;
    let manual = settings.manual_commands()?;
    let start = settings.start();

    let bb = blackboard::new_blackboard(start);
    let events: Topic<Event> = Topic::new(EVENT_CAPACITY);

    let renderer = Renderer::new(bounds, obstacles.iter().map(|o| o.cell(&transform)).collect());
    let render_thread = render::spawn(renderer, events.subscribe(), Duration::from_millis(settings.run.step_delay_ms))
        .context("failed to spawn render thread")?;

    let executor = MotionExecutor::new(start, bounds, CollisionChecker::new(transform), BusObserver::new(events.clone(), bb.clone()))?
        .with_policy(settings.run.collision_policy);
    let mut interpreter = ScanAndAvoid::new(executor, obstacles, hints);

    let guard = interpreter.guard();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C received, cancelling run.");
            guard.cancel();
        }
    });

    let report = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
        for primitive in manual {
            if let Err(reason) = interpreter.step(primitive)? {
                warn!(%primitive, %reason, "Manual command rejected");
            }
        }
        Ok(interpreter.run()?)
    })
    .await
    .context("run task panicked")??;

    blackboard::finish(&bb, &report);
    match report.status {
        RunStatus::Done => info!("Run completed."),
        RunStatus::Aborted { reason, phase } => {
            let fault = match reason {
                AbortReason::Cancelled => "run cancelled",
                AbortReason::Boundary => "reached arena edge while scanning",
            };
            raise_fault(&bb, fault);
            error!(?phase, "Run aborted: {}", fault);
        }
    }
    events.publish(Event::Finished(report));
    drop(events);

    if render_thread.join().is_err() {
        error!("Render thread panicked.");
    }

    let state = snapshot(&bb);
    info!(pose = %state.pose, status = ?state.status, committed = state.committed, rejected = state.rejected, faults = ?state.faults, "gridrover finished.");
    Ok(())
}
