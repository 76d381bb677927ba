//! [`Hide`] – conceal an object from a recipient.

use tracing::info;
use volition_agent::knowledge::relations;
use volition_agent::Agent;
use volition_types::{Outcome, Situation, TaskFailure, VolitionError};

use crate::desire::{Desire, DesireBase};
use crate::supervisor::ExecutionContext;

pub struct Hide {
    base: DesireBase,
    objects: Vec<String>,
    to: Option<String>,
}

impl Hide {
    pub fn new(situation: &Situation, agent: &Agent) -> Result<Self, VolitionError> {
        let base = DesireBase::resolve(situation, agent)?;
        let objects = base.related(relations::ACTS_ON_OBJECT);
        let to = base.first_related(relations::RECEIVED_BY);
        Ok(Self { base, objects, to })
    }
}

impl Desire for Hide {
    fn base(&self) -> &DesireBase {
        &self.base
    }

    fn name(&self) -> &'static str {
        "hide"
    }

    fn plan(&self, _cx: &ExecutionContext) -> Outcome {
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
        info!(object, from = to, "hiding");

        caps.hide(&self.base.performer, object, to);
        Outcome::Completed
    }
}
