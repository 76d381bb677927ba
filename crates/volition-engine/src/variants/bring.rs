//! [`Bring`] – pick an object, then carry and hand it over to a human.

use std::time::Duration;

use tracing::{debug, info};
use volition_agent::knowledge::relations;
use volition_agent::Agent;
use volition_types::{
    HandoverOptions, Outcome, Situation, Target, TaskFailure, VolitionError,
};

use crate::desire::{Desire, DesireBase};
use crate::supervisor::ExecutionContext;
use crate::variants::pick::{Pick, PickPhase};
use crate::variants::{await_human, HumanCheck};

pub struct Bring {
    base: DesireBase,
    pick: Pick,
    objects: Vec<String>,
    to: String,
}

impl Bring {
    pub fn new(situation: &Situation, agent: &Agent) -> Result<Self, VolitionError> {
        let base = DesireBase::resolve(situation, agent)?;
        let pick = Pick::new(situation, agent)?;
        let objects = base.related(relations::ACTS_ON_OBJECT);
        let to = base.recipient();
        Ok(Self {
            base,
            pick,
            objects,
            to,
        })
    }
}

impl Desire for Bring {
    fn base(&self) -> &DesireBase {
        &self.base
    }

    fn name(&self) -> &'static str {
        "bring"
    }

    fn plan(&self, cx: &ExecutionContext) -> Outcome {
        let caps = &self.base.agent.capabilities;

        // The speech pipeline swallows the first utterance after a long
        // silence; this one is disposable.
        caps.say("Bring bring bring");

        let Some(object) = self.objects.first().cloned() else {
            return Outcome::Failed(TaskFailure::MissingParticipant {
                relation: relations::ACTS_ON_OBJECT.to_string(),
            });
        };
        info!(object, to = self.to, "bringing");

        match self.pick.pick_phase(cx) {
            PickPhase::AlreadyHolding | PickPhase::Picked => {}
            PickPhase::Failed(failure) => return Outcome::Failed(failure),
            PickPhase::Preempted => return Outcome::Preempted,
        }

        caps.manipulation_pose();
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

        // While still near the pickup point the arm is extended; once far
        // enough along the trajectory, tuck it back into the safe carrying
        // posture.
        let threshold = cx.config().handover_posture_threshold;
        let mut in_safe_pose = false;
        caps.handover(&self.to, HandoverOptions::default(), &mut |progress| {
            debug!(
                percent = progress.percent_covered,
                to_go = progress.distance_to_go,
                "hand-over progress"
            );
            if !in_safe_pose && progress.distance_covered > threshold {
                caps.manipulation_pose();
                in_safe_pose = true;
            }
        });
        caps.wait(Duration::from_secs(2));

        if caps.has_picked_something().ok {
            caps.say("You do not want your object? Fine.");
        } else {
            caps.attach_object(&object, false);
        }

        caps.manipulation_pose();
        caps.goto(&Target::Entity(cx.config().home_location.clone()));
        Outcome::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::testutil::{world_builder, WorldBuilder};
    use volition_agent::CapabilityCall;

    fn bring_world() -> WorldBuilder {
        world_builder("sit_1")
            .fact("sit_1", relations::ACTS_ON_OBJECT, "GREY_TAPE")
            .fact("GREY_TAPE", relations::IS_AT, "LOW_TABLE")
            .pose("LOW_TABLE", 2.0, 0.0, 0.4)
            .pose("GREY_TAPE", 2.0, 0.1, 0.5)
            .sighting("GREY_TAPE")
    }

    #[test]
    fn accepted_handover_detaches_and_returns_home() {
        let (agent, caps, _know) = bring_world().visible_human("HERAKLES").build();
        let desire = Bring::new(&Situation::new("sit_1"), &agent).unwrap();
        let cx = ExecutionContext::detached(EngineConfig::default());
        assert_eq!(desire.plan(&cx), Outcome::Completed);

        let calls = caps.calls();
        assert!(calls.contains(&CapabilityCall::Handover("HERAKLES".to_string())));
        assert!(calls.contains(&CapabilityCall::AttachObject {
            object: "GREY_TAPE".to_string(),
            attach: false,
        }));
        assert!(calls.contains(&CapabilityCall::Goto(Target::Entity("BASE".to_string()))));
        assert!(caps.attached_objects().is_empty());
    }

    #[test]
    fn declined_handover_narrates_and_keeps_the_object_attached() {
        let (agent, caps, _know) = bring_world()
            .visible_human("HERAKLES")
            .recipient_declining()
            .build();
        let desire = Bring::new(&Situation::new("sit_1"), &agent).unwrap();
        let cx = ExecutionContext::detached(EngineConfig::default());
        assert_eq!(desire.plan(&cx), Outcome::Completed);

        assert!(caps
            .utterances()
            .contains(&"You do not want your object? Fine.".to_string()));
        // Picked up and never detached.
        assert_eq!(caps.attached_objects(), vec!["GREY_TAPE".to_string()]);
        assert!(!caps.calls().contains(&CapabilityCall::AttachObject {
            object: "GREY_TAPE".to_string(),
            attach: false,
        }));
        assert!(caps.is_holding());
    }

    #[test]
    fn carrying_posture_resumes_past_the_distance_threshold() {
        let (agent, caps, _know) = bring_world().visible_human("HERAKLES").build();
        let desire = Bring::new(&Situation::new("sit_1"), &agent).unwrap();
        let cx = ExecutionContext::detached(EngineConfig::default());
        desire.plan(&cx);

        // The default progress script crosses 0.5 m on its second sample;
        // exactly one posture change happens between hand-over start and the
        // post-hand-over wait.
        let calls = caps.calls();
        let handover_at = calls
            .iter()
            .position(|c| matches!(c, CapabilityCall::Handover(_)))
            .unwrap();
        let wait_after = calls[handover_at..]
            .iter()
            .position(|c| matches!(c, CapabilityCall::Wait(_)))
            .unwrap();
        let mid_flight = &calls[handover_at..handover_at + wait_after];
        let postures = mid_flight
            .iter()
            .filter(|c| matches!(c, CapabilityCall::ManipulationPose))
            .count();
        assert_eq!(postures, 1);
    }

    #[test]
    fn pick_failure_aborts_before_any_handover() {
        let (agent, caps, _know) = world_builder("sit_1")
            .fact("sit_1", relations::ACTS_ON_OBJECT, "GREY_TAPE")
            .visible_human("HERAKLES")
            .build();
        let desire = Bring::new(&Situation::new("sit_1"), &agent).unwrap();
        let cx = ExecutionContext::detached(EngineConfig::default());
        assert!(matches!(
            desire.plan(&cx),
            Outcome::Failed(TaskFailure::NoKnownLocation { .. })
        ));
        assert!(!caps.calls().iter().any(|c| matches!(c, CapabilityCall::Handover(_))));
    }

    #[test]
    fn absent_recipient_aborts_to_home_with_the_object_still_held() {
        let (agent, caps, _know) = bring_world().build();
        let desire = Bring::new(&Situation::new("sit_1"), &agent).unwrap();
        let cx = ExecutionContext::detached(EngineConfig::default());
        assert_eq!(
            desire.plan(&cx),
            Outcome::Failed(TaskFailure::RecipientNotVisible {
                recipient: "HERAKLES".to_string(),
            })
        );
        assert!(!caps.calls().iter().any(|c| matches!(c, CapabilityCall::Handover(_))));
        assert!(caps.calls().contains(&CapabilityCall::Goto(Target::Entity("BASE".to_string()))));
        assert!(caps.is_holding());
    }

    #[test]
    fn hands_already_full_skips_straight_to_delivery() {
        let (agent, caps, _know) = world_builder("sit_1")
            .fact("sit_1", relations::ACTS_ON_OBJECT, "GREY_TAPE")
            .visible_human("HERAKLES")
            .object_in_hand()
            .build();
        let desire = Bring::new(&Situation::new("sit_1"), &agent).unwrap();
        let cx = ExecutionContext::detached(EngineConfig::default());
        assert_eq!(desire.plan(&cx), Outcome::Completed);
        let calls = caps.calls();
        assert!(!calls.iter().any(|c| matches!(c, CapabilityCall::Pick(_))));
        assert!(calls.iter().any(|c| matches!(c, CapabilityCall::Handover(_))));
    }
}
