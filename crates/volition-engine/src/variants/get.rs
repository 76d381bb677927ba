//! [`Get`] – receive an object from a human's hand.

use tracing::info;
use volition_agent::knowledge::relations;
use volition_agent::Agent;
use volition_types::{Outcome, Situation, TaskFailure, VolitionError};

use crate::desire::{Desire, DesireBase};
use crate::supervisor::ExecutionContext;
use crate::variants::{await_human, HumanCheck};

pub struct Get {
    base: DesireBase,
    objects: Vec<String>,
    /// The human to take from: the explicit recipient, else the issuer.
    to: String,
}

impl Get {
    pub fn new(situation: &Situation, agent: &Agent) -> Result<Self, VolitionError> {
        let base = DesireBase::resolve(situation, agent)?;
        let objects = base.related(relations::ACTS_ON_OBJECT);
        let to = base.recipient();
        Ok(Self { base, objects, to })
    }
}

impl Desire for Get {
    fn base(&self) -> &DesireBase {
        &self.base
    }

    fn name(&self) -> &'static str {
        "get"
    }

    fn plan(&self, cx: &ExecutionContext) -> Outcome {
        let caps = &self.base.agent.capabilities;
        info!(objects = ?self.objects, from = self.to, "getting an object");

        let Some(object) = self.objects.first() else {
            return Outcome::Failed(TaskFailure::MissingParticipant {
                relation: relations::ACTS_ON_OBJECT.to_string(),
            });
        };

        // Hand-to-hand transfer of a second object is not implemented.
        if caps.has_picked_something().ok {
            caps.say("My hands are full, I cannot take anything more.");
            return Outcome::Completed;
        }

        if cx.invalidated() {
            return Outcome::Preempted;
        }
        match await_human(&self.base.agent, cx, &self.to) {
            HumanCheck::Visible => {}
            HumanCheck::Absent => {
                return Outcome::Failed(TaskFailure::RecipientNotVisible {
                    recipient: self.to.clone(),
                });
            }
            HumanCheck::Preempted => return Outcome::Preempted,
        }

        if cx.invalidated() {
            return Outcome::Preempted;
        }
        let result = caps.take(&self.to, object);
        caps.manipulation_pose();
        if result.ok {
            Outcome::Completed
        } else {
            Outcome::Failed(TaskFailure::GraspFailed {
                object: object.clone(),
                detail: result.detail,
            })
        }
    }
}
