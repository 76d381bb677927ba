//! [`Put`] – place the held object on a destination support.

use tracing::info;
use volition_agent::knowledge::relations;
use volition_agent::Agent;
use volition_types::{Outcome, Point, Situation, Target, TaskFailure, VolitionError};

use crate::desire::{Desire, DesireBase};
use crate::supervisor::ExecutionContext;
use crate::variants::dock_or_nudge;

pub struct Put {
    base: DesireBase,
    objects: Vec<String>,
    to: Option<String>,
}

impl Put {
    pub fn new(situation: &Situation, agent: &Agent) -> Result<Self, VolitionError> {
        let base = DesireBase::resolve(situation, agent)?;
        let objects = base.related(relations::ACTS_ON_OBJECT);
        let to = base.first_related(relations::RECEIVED_BY);
        Ok(Self { base, objects, to })
    }
}

impl Desire for Put {
    fn base(&self) -> &DesireBase {
        &self.base
    }

    fn name(&self) -> &'static str {
        "put"
    }

    fn plan(&self, cx: &ExecutionContext) -> Outcome {
        let caps = &self.base.agent.capabilities;

        let Some(object) = self.objects.first().cloned() else {
            return Outcome::Failed(TaskFailure::MissingParticipant {
                relation: relations::ACTS_ON_OBJECT.to_string(),
            });
        };
        let Some(to) = self.to.as_deref() else {
            return Outcome::Failed(TaskFailure::MissingParticipant {
                relation: relations::RECEIVED_BY.to_string(),
            });
        };
        info!(object, destination = to, "putting");
        if self.objects.len() > 1 {
            info!(object, "several objects named, placing the first");
        }

        if !caps.has_picked_something().ok {
            caps.manipulation_pose();
            caps.say("My hands are empty!");
            return Outcome::Failed(TaskFailure::HandsEmpty);
        }

        let mut track_point = match caps.pose_of(to) {
            Ok(pose) => pose,
            Err(_) => {
                caps.say("I don't know such a place...");
                return Outcome::Failed(TaskFailure::UnresolvedPose {
                    entity: to.to_string(),
                });
            }
        };
        track_point.z += 1.0;

        if cx.invalidated() {
            return Outcome::Preempted;
        }
        caps.track(&Target::Point(track_point));
        caps.goto(&Target::Entity(to.to_string()));
        caps.cancel_track();
        caps.look_at(&Point::in_base(1.0, 0.0, 0.5).into());

        if cx.invalidated() {
            return Outcome::Preempted;
        }
        caps.extract_pose();
        dock_or_nudge(&self.base.agent, cx);
        caps.say("Ok. Now, let's put it.");

        caps.attach_object(&object, false);
        caps.put(&object, to);
        caps.extract_pose();
        caps.translate(cx.config().undock_translation);
        Outcome::Completed
    }
}
