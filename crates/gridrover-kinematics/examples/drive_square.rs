use gridrover_kinematics::*;

fn main() {
    let rows = 20;
    let cols = 20;
    let bounds_result = GridBounds::new(rows, cols);

    let mut current = GridPosition::new(15, 5, Heading::North);
    let script = [
        MotionPrimitive::Forward,
        MotionPrimitive::Forward,
        MotionPrimitive::TurnRight,
        MotionPrimitive::Forward,
        MotionPrimitive::TurnRight,
        MotionPrimitive::Forward,
        MotionPrimitive::TurnRight,
        MotionPrimitive::Forward,
        MotionPrimitive::TurnRight,
    ];

    match bounds_result {
        Ok(bounds) => {
            println!("Initializing grid drive...");
            println!("  Arena:         {}", bounds);
            println!("  Initial Pose:  {}", current);
            println!("  Script Length: {}", script.len());
            println!("\nDriving...");

            for (i, primitive) in script.iter().enumerate() {
                let candidate = current.stepped(*primitive);
                if bounds.contains_position(&candidate) {
                    current = candidate;
                    println!("Step {:>2}: {} [{}] Pose: {}", i + 1, primitive, primitive.command_code(), current);
                } else {
                    eprintln!("Step {:>2}: {} would leave the arena at {}", i + 1, primitive, candidate);
                    break;
                }
            }

            println!("\nDrive complete.");
            println!("Final Pose: {:?}", current);
        }
        Err(e) => {
            eprintln!("Failed to create arena bounds: {}", e);
            eprintln!("Please ensure rows ({}) and cols ({}) are positive.", rows, cols);
        }
    }
}
