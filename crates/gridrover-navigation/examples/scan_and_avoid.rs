use gridrover_kinematics::{Cell, GridBounds, GridPosition, Heading};
use gridrover_navigation::{CollisionChecker, GridTransform, MotionExecutor, Obstacle, RunStatus, ScanAndAvoid, Side, Trajectory};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    // A long, narrow course with two blocks on the centre line.
    let bounds = GridBounds::new(40, 20)?;
    let transform = GridTransform::bottom_left(bounds, 10)?;
    let obstacles = vec![
        Obstacle::at_cell(1, Cell::new(31, 10), Heading::South, &transform),
        Obstacle::at_cell(2, Cell::new(16, 10), Heading::South, &transform),
    ];
    for o in &obstacles {
        println!(
            "Obstacle {} at world ({}, {}) -> cell {}, approach from {}",
            o.id,
            o.position.x,
            o.position.y,
            o.cell(&transform),
            o.approach_target(&transform, 3)
        );
    }

    let start = GridPosition::new(37, 10, Heading::North);
    let executor = MotionExecutor::new(start, bounds, CollisionChecker::new(transform), Trajectory::new())?;
    let mut sa = ScanAndAvoid::new(executor, obstacles, [Side::Left, Side::Right]);

    let report = sa.run()?;
    println!("\nCommitted poses:");
    for step in sa.executor().observer().steps() {
        println!("  {:>3}  {} [{}] -> {}", step.index, step.primitive, step.primitive.command_code(), step.to);
    }

    match report.status {
        RunStatus::Done => println!("\nDone at {} with credit {}", report.final_position, report.final_credit),
        RunStatus::Aborted { reason, phase } => println!("\nAborted during {:?}: {:?}", phase, reason),
    }
    println!("Cells scanned: {:?}, skipped sub-steps: {}", report.cells_scanned, report.rejected_substeps);
    Ok(())
}
