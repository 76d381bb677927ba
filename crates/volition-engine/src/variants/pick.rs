//! [`Pick`] – locate and grasp an object, with a bounded visual search.
//!
//! The pick phase is also the first half of [`Bring`][crate::variants::Bring],
//! which is why it reports through the richer [`PickPhase`] verdict instead
//! of an [`Outcome`] directly.

use chrono::Utc;
use tracing::{info, warn};
use volition_agent::knowledge::{relations, Pattern};
use volition_agent::Agent;
use volition_types::{Outcome, Point, Situation, StereoMode, Target, TaskFailure, VolitionError};

use crate::desire::{Desire, DesireBase};
use crate::supervisor::ExecutionContext;
use crate::variants::dock_or_nudge;

/// Verdict of the pick phase, consumed by `Bring`.
pub(crate) enum PickPhase {
    /// The gripper was already occupied; treated as partial success so a
    /// caller can proceed straight to delivery.
    AlreadyHolding,
    Picked,
    Failed(TaskFailure),
    Preempted,
}

/// Verdict of one bounded visual search.
enum SearchResult {
    Found,
    NotFound,
    Preempted,
}

pub struct Pick {
    base: DesireBase,
    objects: Vec<String>,
    /// Whoever asked; the agent orients toward them when giving up.
    requester: String,
}

impl Pick {
    pub fn new(situation: &Situation, agent: &Agent) -> Result<Self, VolitionError> {
        let base = DesireBase::resolve(situation, agent)?;
        let objects = base.related(relations::ACTS_ON_OBJECT);
        let requester = base.recipient();
        Ok(Self {
            base,
            objects,
            requester,
        })
    }

    /// `true` when the perception feed reported `object` within the
    /// freshness window.
    fn seen_recently(&self, cx: &ExecutionContext, object: &str) -> bool {
        self.base
            .agent
            .capabilities
            .last_seen(object)
            .is_some_and(|at| {
                (Utc::now() - at)
                    .to_std()
                    .is_ok_and(|age| age < cx.config().sighting_freshness)
            })
    }

    /// Sweep the gaze left and right across fixed offsets, up to
    /// `max_attempts` cycles, checking the perception feed after each move.
    /// A failed wide-pair sweep recurses once with the narrow pair before
    /// giving up.
    fn find_object(
        &self,
        cx: &ExecutionContext,
        object: &str,
        max_attempts: u32,
        mode: StereoMode,
    ) -> SearchResult {
        let caps = &self.base.agent.capabilities;
        let gaze = cx.config().search_gaze_wait;

        caps.switch_stereo_pair(mode);
        caps.look_at(&Point::in_base(1.0, 0.0, 0.5).into());
        caps.wait(gaze);

        let mut attempts = 1;
        while !self.seen_recently(cx, object) && attempts <= max_attempts {
            if cx.invalidated() {
                return SearchResult::Preempted;
            }
            // Once left, once right.
            let side = if attempts % 2 == 1 { 1.0 } else { -1.0 };
            caps.look_at(&Point::in_base(1.0, 0.3 * side, 0.5).into());
            caps.wait(gaze);
            if self.seen_recently(cx, object) {
                break;
            }
            caps.look_at(&Point::in_base(1.0, 0.6 * side, 0.5).into());
            caps.wait(gaze);
            if self.seen_recently(cx, object) {
                break;
            }
            caps.look_at(&Point::in_base(1.0, 0.0, 0.5).into());
            caps.wait(cx.config().search_recenter_wait);
            attempts += 1;
        }

        if attempts <= max_attempts {
            caps.look_at(&Target::Entity(object.to_string()));
            if mode == StereoMode::Wide {
                // Refocus with the narrow pair for an accurate position.
                caps.switch_stereo_pair(StereoMode::Narrow);
                caps.wait(gaze);
            }
            caps.switch_stereo_pair(StereoMode::Wide);
            SearchResult::Found
        } else if mode == StereoMode::Wide {
            self.find_object(cx, object, max_attempts, StereoMode::Narrow)
        } else {
            caps.look_at(&Point::in_base(1.0, 0.0, 1.0).into());
            caps.switch_stereo_pair(StereoMode::Wide);
            SearchResult::NotFound
        }
    }

    /// Un-dock, reset posture, orient toward whoever asked.
    fn give_up(&self, cx: &ExecutionContext) {
        let caps = &self.base.agent.capabilities;
        caps.look_at(&Point::in_base(1.0, 0.0, 0.5).into());
        caps.translate(cx.config().giveup_translation);
        caps.manipulation_pose();
        // The requester may be out of sight; a failed glance is fine.
        caps.look_at(&Target::Entity(self.requester.clone()));
    }

    /// The full pick ladder: navigate, dock, search, grasp with one retry.
    pub(crate) fn pick_phase(&self, cx: &ExecutionContext) -> PickPhase {
        let caps = &self.base.agent.capabilities;

        let Some(object) = self.objects.first().cloned() else {
            return PickPhase::Failed(TaskFailure::MissingParticipant {
                relation: relations::ACTS_ON_OBJECT.to_string(),
            });
        };
        info!(object, "picking");

        if caps.has_picked_something().ok {
            info!("gripper already occupied");
            caps.say("My hands are full, I first bring that to you.");
            return PickPhase::AlreadyHolding;
        }

        caps.set_posture("TUCK_LARM");
        caps.manipulation_pose();
        if self.objects.len() > 1 {
            info!(object, "several objects named, taking the first");
        }
        caps.say("Let's take it");

        let Some(location) = self
            .base
            .agent
            .knowledge
            .query(&Pattern::objects_of(&object, relations::IS_AT))
            .into_iter()
            .next()
        else {
            warn!(object, "no known location");
            caps.say("Humm. I do not know where is the object...");
            return PickPhase::Failed(TaskFailure::NoKnownLocation { object });
        };

        if cx.invalidated() {
            return PickPhase::Preempted;
        }

        let mut track_point = match caps.pose_of(&location) {
            Ok(pose) => pose,
            Err(_) => {
                caps.say("I don't know such a place...");
                return PickPhase::Failed(TaskFailure::UnresolvedPose { entity: location });
            }
        };
        track_point.z += 1.0;
        caps.track(&Target::Point(track_point));
        caps.goto(&Target::Entity(location.clone()));
        caps.cancel_track();
        caps.look_at(&Point::in_base(1.0, 0.0, 0.5).into());

        if cx.invalidated() {
            return PickPhase::Preempted;
        }

        caps.extract_pose();
        dock_or_nudge(&self.base.agent, cx);
        caps.say("Ok. Now, where is my object?");

        match self.find_object(cx, &object, 1, StereoMode::Wide) {
            SearchResult::Found => {}
            SearchResult::Preempted => return PickPhase::Preempted,
            SearchResult::NotFound => {
                warn!(object, "first visual search failed");
                caps.say("I did not see your object... Let's try again.");
                match self.find_object(cx, &object, 2, StereoMode::Wide) {
                    SearchResult::Found => {}
                    SearchResult::Preempted => return PickPhase::Preempted,
                    SearchResult::NotFound => {
                        warn!(object, "second visual search failed, giving up");
                        caps.look_at(&Target::Entity(self.requester.clone()));
                        caps.say("I give up!");
                        self.give_up(cx);
                        return PickPhase::Failed(TaskFailure::ObjectNotSeen { object });
                    }
                }
            }
        }

        if cx.invalidated() {
            return PickPhase::Preempted;
        }

        caps.say("Ok, I see the object. Let's try to pick it.");
        let first = caps.pick(&object);
        if !first.ok {
            warn!(object, detail = first.detail, "grasp failed, retrying once");
            caps.say("I think I missed the object... Let's try one more time.");
            caps.extract_pose();
            if let SearchResult::Preempted = self.find_object(cx, &object, 3, StereoMode::Wide) {
                return PickPhase::Preempted;
            }
            let second = caps.pick(&object);
            if !second.ok {
                warn!(object, detail = second.detail, "second grasp failed");
                caps.look_at(&Target::Entity(self.requester.clone()));
                caps.say("I give up!");
                self.give_up(cx);
                return PickPhase::Failed(TaskFailure::GraspFailed {
                    object,
                    detail: second.detail,
                });
            }
        }

        caps.attach_object(&object, true);
        caps.extract_pose();
        caps.translate(cx.config().undock_translation);
        PickPhase::Picked
    }
}

impl Desire for Pick {
    fn base(&self) -> &DesireBase {
        &self.base
    }

    fn name(&self) -> &'static str {
        "pick"
    }

    fn plan(&self, cx: &ExecutionContext) -> Outcome {
        match self.pick_phase(cx) {
            PickPhase::AlreadyHolding | PickPhase::Picked => Outcome::Completed,
            PickPhase::Failed(failure) => Outcome::Failed(failure),
            PickPhase::Preempted => Outcome::Preempted,
        }
    }
}
