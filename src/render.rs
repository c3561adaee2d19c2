use spin_sleep::SpinSleeper;
use std::{sync::Arc, thread::JoinHandle, time::Duration};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use gridrover_kinematics::{Cell, GridBounds, GridPosition, Heading};
use gridrover_navigation::RunStatus;

use crate::bus::Event;

const EMPTY: char = '.';
const BODY: char = '#';
const OBSTACLE: char = 'X';

fn nose(heading: Heading) -> char {
    match heading {
        Heading::North => '^',
        Heading::East => '>',
        Heading::South => 'v',
        Heading::West => '<',
    }
}

/// Terminal view of the arena. Row 0 is printed first.
#[derive(Debug, Clone)]
pub struct Renderer {
    bounds: GridBounds,
    obstacles: Vec<Cell>,
}

impl Renderer {
    pub fn new(bounds: GridBounds, obstacles: Vec<Cell>) -> Self {
        Self { bounds, obstacles }
    }

    pub fn frame(&self, pose: &GridPosition) -> String {
        let footprint = pose.footprint();
        let mut out = String::with_capacity(((self.bounds.cols() + 1) * self.bounds.rows()) as usize);
        for row in 0..self.bounds.rows() {
            for col in 0..self.bounds.cols() {
                let cell = Cell::new(row, col);
                let c = if self.obstacles.contains(&cell) {
                    OBSTACLE
                } else if cell == pose.cell() {
                    nose(pose.heading)
                } else if footprint.contains(&cell) {
                    BODY
                } else {
                    EMPTY
                };
                out.push(c);
            }
            out.push('\n');
        }
        out
    }

    fn show(&self, event: &Event) {
        match event {
            Event::Step(step) => {
                println!(
                    "#{:<3} {} [{}] -> {}\n{}",
                    step.index,
                    step.primitive,
                    step.primitive.command_code(),
                    step.to,
                    self.frame(&step.to)
                );
            }
            Event::Rejected { at, primitive, reason } => {
                println!("     {primitive} from {at}: {reason}");
            }
            Event::Finished(report) => {
                let status = match report.status {
                    RunStatus::Done => "done".to_string(),
                    RunStatus::Aborted { reason, phase } => format!("aborted ({reason:?} during {phase:?})"),
                };
                println!(
                    "Run {status}: final pose {}, scanned {:?} cells, {} steps, {} skipped, credit {}",
                    report.final_position, report.cells_scanned, report.committed_steps, report.rejected_substeps, report.final_credit
                );
            }
        }
    }
}

/// Draws events on a dedicated thread until the topic closes, waiting
/// `step_delay` after each committed step.
pub fn spawn(renderer: Renderer, mut rx: broadcast::Receiver<Arc<Event>>, step_delay: Duration) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new().name("render".into()).spawn(move || {
        info!("Render thread started.");
        let sleeper = SpinSleeper::default();
        loop {
            match rx.blocking_recv() {
                Ok(event) => {
                    renderer.show(&event);
                    if matches!(*event, Event::Step(_)) && !step_delay.is_zero() {
                        sleeper.sleep(step_delay);
                    }
                }
                Err(RecvError::Lagged(n)) => warn!("Render receiver lagged by {} events.", n),
                Err(RecvError::Closed) => break,
            }
        }
        info!("Render thread finished.");
    })
}
