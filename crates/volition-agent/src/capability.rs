//! [`CapabilitySurface`] – the primitives the agent can perform.
//!
//! Every method is a blocking remote-procedure call from the worker's point
//! of view: the call does not return until the underlying action has
//! finished (or failed).  Ordinary task failure is reported through the
//! [`ActionResult`] success flag; a [`VolitionError`] is reserved for
//! programmer-error misuse such as resolving the pose of an entity that has
//! no frame.
//!
//! The physical surface is an exclusively-owned resource: only the currently
//! active desire may invoke actuation.  The two `cancel_all_*` methods are
//! the exception – they exist precisely so a preempting caller on another
//! thread can tear down in-flight background actions before raising the
//! invalidation flag.

use std::time::Duration;

use chrono::{DateTime, Utc};
use volition_types::{
    ActionResult, HandoverOptions, HandoverProgress, Point, StereoMode, Target, VolitionError,
};

/// The consumed robot capability surface.
pub trait CapabilitySurface: Send + Sync {
    // ── Speech & idling ─────────────────────────────────────────────────────

    /// Speak `text` aloud.
    fn say(&self, text: &str);

    /// Block for `duration` (perception settling, politeness pauses).
    fn wait(&self, duration: Duration);

    // ── Locomotion ──────────────────────────────────────────────────────────

    /// Travel onto `target` (a named location or an explicit pose).
    fn goto(&self, target: &Target) -> ActionResult;

    /// Travel toward `target` but stop short of it, at a safe distance for
    /// an object or human.
    fn approach(&self, target: &Point) -> ActionResult;

    /// Translate in place by `meters` (negative values back away).
    fn translate(&self, meters: f32) -> ActionResult;

    /// Dock against the nearest support surface.  Fails when no obstacle is
    /// detected within docking range.
    fn dock(&self) -> ActionResult;

    // ── Gaze & tracking ─────────────────────────────────────────────────────

    /// Keep the gaze on `target` while other actions run, until
    /// [`cancel_track`][CapabilitySurface::cancel_track].
    fn track(&self, target: &Target);

    /// Stop the current visual tracking, if any.
    fn cancel_track(&self);

    /// Orient the gaze toward `target`.  An unknown entity is an ordinary
    /// failure, not an error.
    fn look_at(&self, target: &Target) -> ActionResult;

    /// Select which stereo pair the perception stack uses.
    fn switch_stereo_pair(&self, mode: StereoMode);

    // ── Posture ─────────────────────────────────────────────────────────────

    /// Assume the manipulation/transit posture.
    fn manipulation_pose(&self);

    /// Extend the arm clear of the torso, ready to act on a support.
    fn extract_pose(&self);

    /// Assume a named stored posture (e.g. a tucked arm for transit).
    fn set_posture(&self, name: &str);

    // ── Manipulation ────────────────────────────────────────────────────────

    /// Grasp `object` from its current support.
    fn pick(&self, object: &str) -> ActionResult;

    /// Place `object` onto `destination`.
    fn put(&self, object: &str, destination: &str) -> ActionResult;

    /// Take `object` directly from `recipient`'s hands (or hand it over the
    /// short way) – the close-range exchange used when both parties are
    /// already face to face.
    fn take(&self, recipient: &str, object: &str) -> ActionResult;

    /// Guided hand-over to `recipient`.  `progress` is invoked with
    /// cumulative trajectory feedback while the exchange is under way.
    fn handover(
        &self,
        recipient: &str,
        options: HandoverOptions,
        progress: &mut dyn FnMut(HandoverProgress),
    ) -> ActionResult;

    /// Present `object` to `recipient` without releasing it.
    fn show(&self, performer: &str, object: &str, recipient: &str) -> ActionResult;

    /// Place `object` where `recipient` can reach it.
    fn put_accessible(&self, performer: &str, object: &str, recipient: &str) -> ActionResult;

    /// Extend `object` toward `recipient` for them to take.
    fn give(&self, object: &str, recipient: &str) -> ActionResult;

    /// Move `object` out of `recipient`'s view.
    fn hide(&self, performer: &str, object: &str, recipient: &str) -> ActionResult;

    /// Mark `object` as rigidly attached to (or detached from) the agent's
    /// kinematic chain.
    fn attach_object(&self, object: &str, attach: bool);

    /// `ok` is `true` when the gripper currently holds something.
    fn has_picked_something(&self) -> ActionResult;

    // ── Interface surfaces ──────────────────────────────────────────────────

    /// Render the named interface surface (a tablet window, a projection).
    fn display(&self, surface: &str) -> ActionResult;

    // ── Pose & perception queries ───────────────────────────────────────────

    /// Resolve the pose of a named entity.
    ///
    /// # Errors
    ///
    /// [`VolitionError::UnknownFrame`] when the entity has no known frame.
    fn pose_of(&self, entity: &str) -> Result<Point, VolitionError>;

    /// Current pose of a tracked human, or `None` while they are not
    /// visible.  Humans move; this is the one query desires re-poll.
    fn human_pose(&self, person: &str) -> Option<Point>;

    /// Distance from the agent's current pose to `target`, in metres.
    fn distance_to(&self, target: &Point) -> f32;

    /// Timestamp of the most recent perception sighting of `object`, or
    /// `None` if it has never been seen.
    fn last_seen(&self, object: &str) -> Option<DateTime<Utc>>;

    // ── Cancellation ────────────────────────────────────────────────────────

    /// Cancel every in-flight background action (tracking, gaze servoing).
    /// Callable from any thread.
    fn cancel_all_background_actions(&self);

    /// Cancel every in-flight remote action on the middleware.  Callable
    /// from any thread.
    fn cancel_all_remote_actions(&self);
}
