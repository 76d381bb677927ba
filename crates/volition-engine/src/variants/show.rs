//! [`Show`] – present an object to a recipient and leave it within reach.

use std::time::Duration;

use tracing::info;
use volition_agent::knowledge::relations;
use volition_agent::Agent;
use volition_types::{Outcome, Situation, TaskFailure, VolitionError};

use crate::desire::{Desire, DesireBase};
use crate::supervisor::ExecutionContext;

pub struct Show {
    base: DesireBase,
    objects: Vec<String>,
    to: Option<String>,
}

impl Show {
    pub fn new(situation: &Situation, agent: &Agent) -> Result<Self, VolitionError> {
        let base = DesireBase::resolve(situation, agent)?;
        let objects = base.related(relations::ACTS_ON_OBJECT);
        let to = base.first_related(relations::RECEIVED_BY);
        Ok(Self { base, objects, to })
    }
}

impl Desire for Show {
    fn base(&self) -> &DesireBase {
        &self.base
    }

    fn name(&self) -> &'static str {
        "show"
    }

    fn plan(&self, cx: &ExecutionContext) -> Outcome {
        let caps = &self.base.agent.capabilities;

        let Some(object) = self.objects.first() else {
            return Outcome::Failed(TaskFailure::MissingParticipant {
                relation: relations::ACTS_ON_OBJECT.to_string(),
            });
        };
        let Some(to) = self.to.as_deref() else {
            return Outcome::Failed(TaskFailure::MissingParticipant {
                relation: relations::RECEIVED_BY.to_string(),
            });
        };
        info!(object, to, "showing");

        caps.show(&self.base.performer, object, to);
        caps.say("Here your object");
        caps.wait(Duration::from_secs(2));
        if cx.invalidated() {
            return Outcome::Preempted;
        }
        caps.put_accessible(&self.base.performer, object, to);
        caps.extract_pose();
        caps.manipulation_pose();
        Outcome::Completed
    }
}
