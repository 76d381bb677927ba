use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Opaque identifier naming one instance of a goal in the knowledge store.
///
/// Situations are minted and owned by the external knowledge service; the
/// engine never fabricates or mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Situation(pub String);

impl Situation {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Situation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Situation {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Desire urgency. Lower values are more urgent; 0 is the highest priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority(pub u8);

impl Priority {
    /// Priority assigned to every desire that does not override it.
    pub const DEFAULT: Priority = Priority(10);
    /// Priority of the `Stop` desire; outranks every default-priority desire.
    pub const STOP: Priority = Priority(1);

    /// `true` when `self` outranks `other` (strictly lower value).
    pub fn is_more_urgent_than(&self, other: Priority) -> bool {
        self.0 < other.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Final verdict of one desire execution.
///
/// Task-level trouble (lost object, failed grasp, missing human) is absorbed
/// inside the desire and reported here as [`Outcome::Failed`]; it never
/// surfaces as a [`VolitionError`]. Preemption is a distinct verdict, not a
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The plan ran to its end.
    Completed,
    /// The plan gave up after exhausting its retry ladder.
    Failed(TaskFailure),
    /// The plan observed the invalidation flag and unwound cleanly.
    Preempted,
}

impl Outcome {
    pub fn is_preempted(&self) -> bool {
        matches!(self, Outcome::Preempted)
    }
}

/// Expected, recoverable reasons a desire's plan can give up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskFailure {
    /// The target entity has no resolvable pose.
    UnresolvedPose { entity: String },
    /// The knowledge store has no known location for the object.
    NoKnownLocation { object: String },
    /// The bounded visual search exhausted its attempts.
    ObjectNotSeen { object: String },
    /// Both grasp attempts failed.
    GraspFailed { object: String, detail: String },
    /// The destinary human never became visible.
    RecipientNotVisible { recipient: String },
    /// A participant the plan needs has no binding in the knowledge store.
    MissingParticipant { relation: String },
    /// A pick was requested while the gripper is occupied.
    HandsFull,
    /// A place was requested with nothing in hand.
    HandsEmpty,
}

/// A point in space, expressed in a named reference frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub frame: String,
}

impl Point {
    pub fn new(x: f32, y: f32, z: f32, frame: impl Into<String>) -> Self {
        Self {
            x,
            y,
            z,
            frame: frame.into(),
        }
    }

    /// A point in the robot's own base frame.
    pub fn in_base(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z, "base_link")
    }
}

/// What a gaze or tracking capability should aim at: either a named entity
/// resolved by the capability layer, or an explicit point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Target {
    Entity(String),
    Point(Point),
}

impl From<&str> for Target {
    fn from(entity: &str) -> Self {
        Target::Entity(entity.to_string())
    }
}

impl From<Point> for Target {
    fn from(p: Point) -> Self {
        Target::Point(p)
    }
}

/// Success flag plus diagnostic payload returned by every capability call.
///
/// Ordinary task failure is reported through `ok == false`; capability calls
/// only return a [`VolitionError`] for programmer-error misuse such as a
/// malformed target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub ok: bool,
    pub detail: String,
}

impl ActionResult {
    pub fn succeeded() -> Self {
        Self {
            ok: true,
            detail: String::new(),
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            ok: false,
            detail: detail.into(),
        }
    }
}

/// Progress feedback delivered while a guided hand-over is under way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandoverProgress {
    /// Fraction of the planned trajectory already covered, in `[0, 100]`.
    pub percent_covered: f32,
    /// Remaining distance to the recipient, in metres.
    pub distance_to_go: f32,
    /// Cumulative distance travelled since the hand-over started, in metres.
    pub distance_covered: f32,
}

/// Tuning knobs for a guided hand-over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandoverOptions {
    /// How much the recipient is expected to move toward the robot, in
    /// `[0, 1]`. `0.0` means the robot covers the whole distance.
    pub mobility: f32,
}

impl Default for HandoverOptions {
    fn default() -> Self {
        Self { mobility: 0.2 }
    }
}

/// Which stereo pair the perception stack should use.
///
/// The wide pair covers more of the scene; the narrow pair gives an accurate
/// position fix on an already-sighted object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StereoMode {
    Wide,
    Narrow,
}

/// A subject–predicate–object statement, the unit of knowledge exchange.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fact {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Fact {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// Which memory bank an asserted fact lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryScope {
    /// Append-only record of what happened; never queried by the engine.
    Episodic,
    /// Durable world knowledge.
    LongTerm,
}

/// Global error type spanning desire construction, scheduling invariants, and
/// capability misuse.
///
/// Task-level failures are deliberately absent: they are [`Outcome::Failed`]
/// values, handled inside the desire that produced them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VolitionError {
    #[error("nobody desires situation {0}")]
    NoOwner(Situation),

    #[error("nobody is resolvable to perform situation {0}")]
    NoPerformer(Situation),

    #[error("situation {situation} does not classify to exactly one desire class, got {classes:?}")]
    AmbiguousDesireType {
        situation: Situation,
        classes: Vec<String>,
    },

    #[error("no desire implementation registered for class {class:?}")]
    UnknownDesireType { class: String },

    #[error("a desire is already performing; scheduling bug upstream")]
    AlreadyPerforming,

    #[error("unknown frame or entity {0:?}")]
    UnknownFrame(String),
}
