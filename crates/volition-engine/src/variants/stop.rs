//! [`Stop`] – drop everything and settle into a safe posture.
//!
//! The only variant whose priority is not the default; submitting one
//! outranks and preempts any default-priority desire.  By the time its plan
//! runs, the supervisor's preemption path has already cancelled whatever was
//! in flight, so the plan itself only narrates and resets.

use volition_agent::Agent;
use volition_types::{Outcome, Point, Priority, Situation, VolitionError};

use crate::desire::{Desire, DesireBase};
use crate::supervisor::ExecutionContext;

pub struct Stop {
    base: DesireBase,
}

impl Stop {
    pub fn new(situation: &Situation, agent: &Agent) -> Result<Self, VolitionError> {
        let base = DesireBase::resolve(situation, agent)?;
        Ok(Self { base })
    }
}

impl Desire for Stop {
    fn base(&self) -> &DesireBase {
        &self.base
    }

    fn name(&self) -> &'static str {
        "stop"
    }

    fn priority(&self) -> Priority {
        Priority::STOP
    }

    fn plan(&self, _cx: &ExecutionContext) -> Outcome {
        let caps = &self.base.agent.capabilities;
        caps.say("Alright, I stop");
        caps.manipulation_pose();
        caps.look_at(&Point::in_base(1.0, 0.0, 0.7).into());
        Outcome::Completed
    }
}
