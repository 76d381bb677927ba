//! [`Test`] – a fixed diagnostic sequence, kept as a smoke-test hook.

use tracing::info;
use volition_agent::Agent;
use volition_types::{Outcome, Situation, VolitionError};

use crate::desire::{Desire, DesireBase};
use crate::supervisor::ExecutionContext;

pub struct Test {
    base: DesireBase,
}

impl Test {
    pub fn new(situation: &Situation, agent: &Agent) -> Result<Self, VolitionError> {
        let base = DesireBase::resolve(situation, agent)?;
        Ok(Self { base })
    }
}

impl Desire for Test {
    fn base(&self) -> &DesireBase {
        &self.base
    }

    fn name(&self) -> &'static str {
        "test"
    }

    fn plan(&self, _cx: &ExecutionContext) -> Outcome {
        info!("running the diagnostic sequence");
        self.base
            .agent
            .capabilities
            .put("GREY_TAPE", "LOW_TABLE_LARGE");
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
    fn runs_the_fixed_place_sequence() {
        let (agent, caps, _know) = world_builder("sit_1").build();
        let desire = Test::new(&Situation::new("sit_1"), &agent).unwrap();
        let cx = ExecutionContext::detached(EngineConfig::default());
        assert_eq!(desire.plan(&cx), Outcome::Completed);
        assert_eq!(
            caps.calls(),
            vec![CapabilityCall::Put {
                object: "GREY_TAPE".to_string(),
                destination: "LOW_TABLE_LARGE".to_string(),
            }]
        );
    }
}
