//! [`Display`] – render a named interface surface.

use tracing::info;
use volition_agent::knowledge::relations;
use volition_agent::Agent;
use volition_types::{Outcome, Situation, TaskFailure, VolitionError};

use crate::desire::{Desire, DesireBase};
use crate::supervisor::ExecutionContext;

pub struct Display {
    base: DesireBase,
    window: Option<String>,
}

impl Display {
    pub fn new(situation: &Situation, agent: &Agent) -> Result<Self, VolitionError> {
        let base = DesireBase::resolve(situation, agent)?;
        let window = base.first_related(relations::INVOLVES);
        Ok(Self { base, window })
    }
}

impl Desire for Display {
    fn base(&self) -> &DesireBase {
        &self.base
    }

    fn name(&self) -> &'static str {
        "display"
    }

    fn plan(&self, _cx: &ExecutionContext) -> Outcome {
        let Some(window) = self.window.as_deref() else {
            return Outcome::Failed(TaskFailure::MissingParticipant {
                relation: relations::INVOLVES.to_string(),
            });
        };
        info!(window, "displaying");
        self.base.agent.capabilities.display(window);
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
    fn renders_the_involved_surface() {
        let (agent, caps, _know) = world_builder("sit_1")
            .fact("sit_1", relations::INVOLVES, "VIDEO_FEED")
            .build();
        let desire = Display::new(&Situation::new("sit_1"), &agent).unwrap();
        let cx = ExecutionContext::detached(EngineConfig::default());
        assert_eq!(desire.plan(&cx), Outcome::Completed);
        assert_eq!(
            caps.calls(),
            vec![CapabilityCall::Display("VIDEO_FEED".to_string())]
        );
    }

    #[test]
    fn missing_surface_fails_cleanly() {
        let (agent, _caps, _know) = world_builder("sit_1").build();
        let desire = Display::new(&Situation::new("sit_1"), &agent).unwrap();
        let cx = ExecutionContext::detached(EngineConfig::default());
        assert!(matches!(
            desire.plan(&cx),
            Outcome::Failed(TaskFailure::MissingParticipant { .. })
        ));
    }
}
