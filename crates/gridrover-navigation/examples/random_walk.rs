use gridrover_kinematics::{Cell, GridBounds, GridPosition, Heading, MotionPrimitive};
use gridrover_navigation::{CollisionChecker, CollisionPolicy, FnObserver, GridTransform, MotionExecutor, Obstacle, Rejected};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .init();

    let mut rng = rand::rng();
    let bounds = GridBounds::new(20, 20)?;
    let transform = GridTransform::bottom_left(bounds, 10)?;

    // Scatter 12 obstacles, each facing a random heading.
    let obstacles: Vec<Obstacle> = (0..12)
        .map(|id| {
            let cell = Cell::new(rng.random_range(0..bounds.rows()), rng.random_range(0..bounds.cols()));
            let facing = *Heading::ALL.choose(&mut rng).unwrap_or(&Heading::North);
            Obstacle::at_cell(id, cell, facing, &transform)
        })
        .collect();

    let mut visited = 0usize;
    let observer = FnObserver(|_: &gridrover_navigation::CommittedStep| visited += 1);
    let start = GridPosition::new(10, 10, Heading::North);
    let mut exec = MotionExecutor::new(start, bounds, CollisionChecker::new(transform), observer)?
        .with_policy(CollisionPolicy::AllPrimitives);

    let (mut blocked, mut outside) = (0, 0);
    for _ in 0..500 {
        let primitive = *MotionPrimitive::ALL.choose(&mut rng).unwrap_or(&MotionPrimitive::Forward);
        match exec.apply(primitive, &obstacles) {
            Ok(_) => {}
            Err(Rejected::Blocked) => blocked += 1,
            Err(Rejected::OutOfBounds) => outside += 1,
        }
        assert!(bounds.contains_position(&exec.position()));
    }

    let final_pose = exec.position();
    drop(exec);
    println!("Random walk over {} arena with {} obstacles", bounds, obstacles.len());
    println!("  Committed: {}", visited);
    println!("  Blocked:   {}", blocked);
    println!("  Outside:   {}", outside);
    println!("  Final:     {}", final_pose);
    Ok(())
}
