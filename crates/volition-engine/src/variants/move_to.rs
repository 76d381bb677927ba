//! [`Move`] – travel to a named target.
//!
//! Objects and humans are approached, stopping short; locations are moved
//! onto.  The distinction comes from the ontology, with a short list of
//! surfaces that classify as tangible but behave as locations.

use tracing::{info, warn};
use volition_agent::knowledge::relations;
use volition_agent::Agent;
use volition_types::{Fact, Outcome, Point, Situation, Target, TaskFailure, VolitionError};

use crate::desire::{Desire, DesireBase};
use crate::supervisor::ExecutionContext;

/// Tangible entities that are nevertheless moved onto, not approached.
const SURFACE_EXCEPTIONS: &[&str] = &["CTL_TABLE"];

pub struct Move {
    base: DesireBase,
    /// The goal when stated, otherwise the acted-on object.
    to: Option<String>,
    target_is_object: bool,
}

impl Move {
    pub fn new(situation: &Situation, agent: &Agent) -> Result<Self, VolitionError> {
        let base = DesireBase::resolve(situation, agent)?;
        let to = base
            .first_related(relations::HAS_GOAL)
            .or_else(|| base.first_related(relations::ACTS_ON_OBJECT));
        let target_is_object = to.as_deref().is_some_and(|t| {
            !SURFACE_EXCEPTIONS.contains(&t)
                && agent
                    .knowledge
                    .contains(&Fact::new(t, relations::RDF_TYPE, "cyc:PartiallyTangible"))
        });
        Ok(Self {
            base,
            to,
            target_is_object,
        })
    }
}

impl Desire for Move {
    fn base(&self) -> &DesireBase {
        &self.base
    }

    fn name(&self) -> &'static str {
        "move"
    }

    fn plan(&self, cx: &ExecutionContext) -> Outcome {
        let caps = &self.base.agent.capabilities;

        let Some(to) = self.to.as_deref() else {
            warn!(situation = %self.base.situation, "move desire without a goal");
            return Outcome::Failed(TaskFailure::MissingParticipant {
                relation: relations::HAS_GOAL.to_string(),
            });
        };
        info!(target = to, object = self.target_is_object, "moving");

        let mut target = match caps.pose_of(to) {
            Ok(pose) => pose,
            Err(_) => {
                caps.say("I don't know such an object...");
                return Outcome::Failed(TaskFailure::UnresolvedPose {
                    entity: to.to_string(),
                });
            }
        };
        target.z = 0.0;

        let already_at_destination = self.target_is_object
            && caps.distance_to(&target) < cx.config().object_stop_distance;

        if !already_at_destination {
            caps.extract_pose();
            caps.track(&Target::Entity(to.to_string()));
            caps.manipulation_pose();
            if cx.invalidated() {
                caps.cancel_track();
                return Outcome::Preempted;
            }
            if self.target_is_object {
                caps.approach(&target);
            } else {
                caps.goto(&Target::Entity(to.to_string()));
            }
            caps.cancel_track();
        }

        if cx.invalidated() {
            return Outcome::Preempted;
        }
        if self.target_is_object {
            caps.look_at(&Target::Entity(to.to_string()));
        } else {
            caps.look_at(&Point::in_base(1.0, 0.0, 1.0).into());
        }
        Outcome::Completed
    }
}
