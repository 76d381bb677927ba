//! [`Look`] – orient the gaze toward a named target.

use tracing::info;
use volition_agent::knowledge::relations;
use volition_agent::Agent;
use volition_types::{Outcome, Situation, Target, TaskFailure, VolitionError};

use crate::desire::{Desire, DesireBase};
use crate::supervisor::ExecutionContext;

pub struct Look {
    base: DesireBase,
    target: Option<String>,
}

impl Look {
    pub fn new(situation: &Situation, agent: &Agent) -> Result<Self, VolitionError> {
        let base = DesireBase::resolve(situation, agent)?;
        let target = base.first_related(relations::HAS_GOAL);
        Ok(Self { base, target })
    }
}

impl Desire for Look {
    fn base(&self) -> &DesireBase {
        &self.base
    }

    fn name(&self) -> &'static str {
        "look"
    }

    fn plan(&self, _cx: &ExecutionContext) -> Outcome {
        let caps = &self.base.agent.capabilities;

        let Some(target) = self.target.as_deref() else {
            return Outcome::Failed(TaskFailure::MissingParticipant {
                relation: relations::HAS_GOAL.to_string(),
            });
        };
        info!(target, "looking");

        // An unresolvable target gets a verbal fallback, not a failure.
        if !caps.look_at(&Target::Entity(target.to_string())).ok {
            caps.say("I do not know this object!");
        }
        Outcome::Completed
    }
}
