use parking_lot::RwLock;
use std::sync::Arc;

use gridrover_kinematics::GridPosition;
use gridrover_navigation::{CommittedStep, RunReport, RunStatus};

#[derive(Debug, Clone)]
pub struct State {
    pub pose: GridPosition,
    pub committed: u64,
    pub rejected: u64,
    pub status: Option<RunStatus>,
    pub faults: Vec<String>,
}

impl State {
    pub fn new(pose: GridPosition) -> Self {
        State {
            pose,
            committed: 0,
            rejected: 0,
            status: None,
            faults: Vec::new(),
        }
    }
}

pub type Blackboard = Arc<RwLock<State>>;

pub fn new_blackboard(pose: GridPosition) -> Blackboard {
    Arc::new(RwLock::new(State::new(pose)))
}

pub fn snapshot(bb: &Blackboard) -> State {
    (*bb.read()).clone()
}

pub fn record_step(bb: &Blackboard, step: &CommittedStep) {
    let mut g = bb.write();
    g.pose = step.to;
    g.committed += 1;
}

pub fn record_rejection(bb: &Blackboard) {
    bb.write().rejected += 1;
}

pub fn finish(bb: &Blackboard, report: &RunReport) {
    let mut g = bb.write();
    g.pose = report.final_position;
    g.status = Some(report.status);
}

pub fn raise_fault(bb: &Blackboard, msg: &str) {
    let mut g = bb.write();
    if !g.faults.iter().any(|s| s == msg) {
        g.faults.push(msg.to_string());
    }
}
