use std::sync::Arc;
use tokio::sync::broadcast;

use gridrover_kinematics::{GridPosition, MotionPrimitive};
use gridrover_navigation::{CommittedStep, MotionObserver, Rejected, RunReport};

use crate::blackboard::{self, Blackboard};

/// Broadcast topic with bounded capacity.
/// `T` must be `Send + Sync` because we hop across threads.
#[derive(Debug, Clone)]
pub struct Topic<T> {
    tx: broadcast::Sender<Arc<T>>,
}

impl<T: Send + Sync + 'static> Topic<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, msg: T) {
        let _ = self.tx.send(Arc::new(msg));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<T>> {
        self.tx.subscribe()
    }
}

/// What the run reports to its subscribers.
#[derive(Debug, Clone)]
pub enum Event {
    Step(CommittedStep),
    Rejected {
        at: GridPosition,
        primitive: MotionPrimitive,
        reason: Rejected,
    },
    Finished(RunReport),
}

/// Publishes every executor notification on the event topic and mirrors it
/// into the blackboard.
pub struct BusObserver {
    events: Topic<Event>,
    bb: Blackboard,
}

impl BusObserver {
    pub fn new(events: Topic<Event>, bb: Blackboard) -> Self {
        Self { events, bb }
    }
}

impl MotionObserver for BusObserver {
    fn on_commit(&mut self, step: &CommittedStep) {
        blackboard::record_step(&self.bb, step);
        self.events.publish(Event::Step(*step));
    }

    fn on_reject(&mut self, position: &GridPosition, primitive: MotionPrimitive, reason: Rejected) {
        blackboard::record_rejection(&self.bb);
        self.events.publish(Event::Rejected {
            at: *position,
            primitive,
            reason,
        });
    }
}
