//! [`Give`] – hand an object to a recipient and release it.

use tracing::info;
use volition_agent::knowledge::relations;
use volition_agent::Agent;
use volition_types::{Outcome, Situation, TaskFailure, VolitionError};

use crate::desire::{Desire, DesireBase};
use crate::supervisor::ExecutionContext;

pub struct Give {
    base: DesireBase,
    objects: Vec<String>,
    to: Option<String>,
}

impl Give {
    pub fn new(situation: &Situation, agent: &Agent) -> Result<Self, VolitionError> {
        let base = DesireBase::resolve(situation, agent)?;
        let objects = base.related(relations::ACTS_ON_OBJECT);
        let to = base.first_related(relations::RECEIVED_BY);
        Ok(Self { base, objects, to })
    }
}

impl Desire for Give {
    fn base(&self) -> &DesireBase {
        &self.base
    }

    fn name(&self) -> &'static str {
        "give"
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
        info!(object, to, "giving");

        caps.say(&format!("Let's give {object} to {to}"));
        if cx.invalidated() {
            return Outcome::Preempted;
        }
        let result = caps.give(object, to);
        if !result.ok {
            return Outcome::Failed(TaskFailure::GraspFailed {
                object: object.clone(),
                detail: result.detail,
            });
        }
        caps.attach_object(object, false);
        Outcome::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::testutil::world_builder;
    use volition_agent::CapabilityCall;

    #[test]
    fn gives_then_detaches() {
        let (agent, caps, _know) = world_builder("sit_1")
            .fact("sit_1", relations::ACTS_ON_OBJECT, "GREY_TAPE")
            .fact("sit_1", relations::RECEIVED_BY, "HERAKLES")
            .build();
        let desire = Give::new(&Situation::new("sit_1"), &agent).unwrap();
        let cx = ExecutionContext::detached(EngineConfig::default());
        assert_eq!(desire.plan(&cx), Outcome::Completed);

        let calls = caps.calls();
        let give_at = calls
            .iter()
            .position(|c| matches!(c, CapabilityCall::Give { .. }))
            .unwrap();
        let detach_at = calls
            .iter()
            .position(|c| matches!(c, CapabilityCall::AttachObject { attach: false, .. }))
            .unwrap();
        assert!(give_at < detach_at);
        assert_eq!(
            caps.utterances(),
            vec!["Let's give GREY_TAPE to HERAKLES".to_string()]
        );
    }

    #[test]
    fn first_of_several_recipients_is_served() {
        let (agent, caps, _know) = world_builder("sit_1")
            .fact("sit_1", relations::ACTS_ON_OBJECT, "GREY_TAPE")
            .fact("sit_1", relations::RECEIVED_BY, "HERAKLES")
            .fact("sit_1", relations::RECEIVED_BY, "ACHILLES")
            .build();
        let desire = Give::new(&Situation::new("sit_1"), &agent).unwrap();
        let cx = ExecutionContext::detached(EngineConfig::default());
        desire.plan(&cx);
        assert!(caps.calls().contains(&CapabilityCall::Give {
            object: "GREY_TAPE".to_string(),
            recipient: "HERAKLES".to_string(),
        }));
    }
}
