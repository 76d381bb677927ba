//! In-process world simulation for CI testing without physical hardware.
//!
//! [`InMemoryKnowledge`] is an insertion-ordered triple store and
//! [`SimCapabilities`] a capability surface whose every call is recorded and
//! whose outcomes (grasp success, docking, human visibility, perception
//! sightings) are scripted at construction time.  Together they let the full
//! desire-execution engine run in headless tests.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use volition_agent::{Agent, sim::{InMemoryKnowledge, SimCapabilities}};
//!
//! let knowledge = Arc::new(
//!     InMemoryKnowledge::new().with_fact("HERAKLES", "desires", "sit_1"),
//! );
//! let caps = Arc::new(SimCapabilities::new().with_pose("KITCHEN", 3.0, 1.0, 0.0));
//! let agent = Agent::new(knowledge, caps.clone());
//!
//! agent.capabilities.say("hello");
//! assert_eq!(caps.utterances(), vec!["hello".to_string()]);
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::trace;
use volition_types::{
    ActionResult, Fact, HandoverOptions, HandoverProgress, MemoryScope, Point, StereoMode, Target,
    VolitionError,
};

use crate::capability::CapabilitySurface;
use crate::knowledge::{KnowledgeStore, Pattern};

// ────────────────────────────────────────────────────────────────────────────
// InMemoryKnowledge
// ────────────────────────────────────────────────────────────────────────────

/// An insertion-ordered triple store with direct classification.
///
/// Query bindings come back in the order their facts were inserted, which
/// makes the engine's "first binding wins" policy deterministic in tests.
#[derive(Default)]
pub struct InMemoryKnowledge {
    triples: Mutex<Vec<Fact>>,
    classes: Mutex<HashMap<String, Vec<String>>>,
    episodic: Mutex<Vec<Fact>>,
}

impl InMemoryKnowledge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a long-term fact.
    pub fn with_fact(
        self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        self.triples
            .lock()
            .expect("triples poisoned")
            .push(Fact::new(subject, predicate, object));
        self
    }

    /// Seed a direct classification for `entity`.
    pub fn with_class(self, entity: impl Into<String>, class: impl Into<String>) -> Self {
        self.classes
            .lock()
            .expect("classes poisoned")
            .entry(entity.into())
            .or_default()
            .push(class.into());
        self
    }

    /// Everything asserted to the episodic bank so far, oldest first.
    pub fn episodic_log(&self) -> Vec<Fact> {
        self.episodic.lock().expect("episodic poisoned").clone()
    }
}

impl KnowledgeStore for InMemoryKnowledge {
    fn query(&self, pattern: &Pattern) -> Vec<String> {
        let triples = self.triples.lock().expect("triples poisoned");
        let mut bindings: Vec<String> = Vec::new();
        for fact in triples.iter() {
            if let Some(binding) = pattern.binding(fact) {
                if !bindings.iter().any(|b| b == binding) {
                    bindings.push(binding.to_string());
                }
            }
        }
        bindings
    }

    fn direct_classes_of(&self, entity: &str) -> Vec<String> {
        self.classes
            .lock()
            .expect("classes poisoned")
            .get(entity)
            .cloned()
            .unwrap_or_default()
    }

    fn contains(&self, fact: &Fact) -> bool {
        self.triples
            .lock()
            .expect("triples poisoned")
            .iter()
            .any(|f| f == fact)
    }

    fn assert_fact(&self, fact: Fact, scope: MemoryScope) {
        match scope {
            MemoryScope::Episodic => self.episodic.lock().expect("episodic poisoned").push(fact),
            MemoryScope::LongTerm => self.triples.lock().expect("triples poisoned").push(fact),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Call log
// ────────────────────────────────────────────────────────────────────────────

/// One recorded capability invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityCall {
    Say(String),
    Wait(Duration),
    Goto(Target),
    Approach(Point),
    Translate(f32),
    Dock,
    Track(Target),
    CancelTrack,
    LookAt(Target),
    SwitchStereoPair(StereoMode),
    ManipulationPose,
    ExtractPose,
    SetPosture(String),
    Pick(String),
    Put { object: String, destination: String },
    Take { recipient: String, object: String },
    Handover(String),
    Show { object: String, recipient: String },
    PutAccessible { object: String, recipient: String },
    Give { object: String, recipient: String },
    Hide { object: String, recipient: String },
    AttachObject { object: String, attach: bool },
    HasPickedSomething,
    Display(String),
    CancelBackgroundActions,
    CancelRemoteActions,
}

// ────────────────────────────────────────────────────────────────────────────
// SimCapabilities
// ────────────────────────────────────────────────────────────────────────────

struct HumanScript {
    /// Number of visibility queries still to answer "not visible".
    absent_for: usize,
    pose: Point,
}

/// A capability surface that records every call and returns scripted
/// outcomes.  Always thread-safe; an optional per-call delay simulates
/// actuation latency so preemption can land mid-plan in tests.
pub struct SimCapabilities {
    call_delay: Duration,
    dock_ok: bool,
    pick_default: bool,
    handover_releases: bool,
    handover_progress: Vec<HandoverProgress>,
    target_distance: f32,
    poses: HashMap<String, Point>,
    log: Mutex<Vec<CapabilityCall>>,
    pick_script: Mutex<VecDeque<bool>>,
    holding: Mutex<bool>,
    attached: Mutex<HashSet<String>>,
    sightings: Mutex<HashMap<String, DateTime<Utc>>>,
    humans: Mutex<HashMap<String, HumanScript>>,
}

impl Default for SimCapabilities {
    fn default() -> Self {
        Self {
            call_delay: Duration::ZERO,
            dock_ok: true,
            pick_default: true,
            handover_releases: true,
            handover_progress: vec![
                HandoverProgress {
                    percent_covered: 10.0,
                    distance_to_go: 1.8,
                    distance_covered: 0.2,
                },
                HandoverProgress {
                    percent_covered: 45.0,
                    distance_to_go: 1.1,
                    distance_covered: 0.9,
                },
                HandoverProgress {
                    percent_covered: 95.0,
                    distance_to_go: 0.1,
                    distance_covered: 1.9,
                },
            ],
            target_distance: 10.0,
            poses: HashMap::new(),
            log: Mutex::new(Vec::new()),
            pick_script: Mutex::new(VecDeque::new()),
            holding: Mutex::new(false),
            attached: Mutex::new(HashSet::new()),
            sightings: Mutex::new(HashMap::new()),
            humans: Mutex::new(HashMap::new()),
        }
    }
}

impl SimCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Builders ────────────────────────────────────────────────────────────

    /// Give every entity in `poses` a resolvable frame.
    pub fn with_pose(mut self, entity: impl Into<String>, x: f32, y: f32, z: f32) -> Self {
        self.poses.insert(entity.into(), Point::new(x, y, z, "map"));
        self
    }

    /// Sleep this long inside every capability call.
    pub fn with_call_delay(mut self, delay: Duration) -> Self {
        self.call_delay = delay;
        self
    }

    /// Report the agent as already this close to any queried target.
    pub fn with_target_distance(mut self, meters: f32) -> Self {
        self.target_distance = meters;
        self
    }

    /// Docking reports failure (no obstacle within range).
    pub fn with_dock_failure(mut self) -> Self {
        self.dock_ok = false;
        self
    }

    /// The gripper starts out occupied.
    pub fn with_object_in_hand(self) -> Self {
        *self.holding.lock().expect("holding poisoned") = true;
        self
    }

    /// The next `n` grasp attempts fail before the default outcome resumes.
    pub fn with_pick_failures(self, n: usize) -> Self {
        {
            let mut script = self.pick_script.lock().expect("pick script poisoned");
            for _ in 0..n {
                script.push_back(false);
            }
        }
        self
    }

    /// Every grasp attempt fails.
    pub fn with_pick_always_failing(mut self) -> Self {
        self.pick_default = false;
        self
    }

    /// The hand-over leaves the object in the gripper (recipient declines).
    pub fn with_recipient_declining(mut self) -> Self {
        self.handover_releases = false;
        self
    }

    /// `person` is visible from the first query on.
    pub fn with_visible_human(self, person: impl Into<String>) -> Self {
        self.with_human_appearing_after(person, 0)
    }

    /// `person` answers "not visible" to the first `absent_queries` pose
    /// queries, then becomes visible.
    pub fn with_human_appearing_after(self, person: impl Into<String>, absent_queries: usize) -> Self {
        self.humans.lock().expect("humans poisoned").insert(
            person.into(),
            HumanScript {
                absent_for: absent_queries,
                pose: Point::new(2.0, 0.0, 0.0, "map"),
            },
        );
        self
    }

    /// `object` was sighted just now.
    pub fn with_sighting(self, object: impl Into<String>) -> Self {
        self.with_sighting_at(object, Utc::now())
    }

    /// `object` was last sighted at `at` (use a past timestamp to script a
    /// stale sighting).
    pub fn with_sighting_at(self, object: impl Into<String>, at: DateTime<Utc>) -> Self {
        self.sightings
            .lock()
            .expect("sightings poisoned")
            .insert(object.into(), at);
        self
    }

    // ── Inspection ──────────────────────────────────────────────────────────

    /// Every capability call so far, in invocation order.
    pub fn calls(&self) -> Vec<CapabilityCall> {
        self.log.lock().expect("log poisoned").clone()
    }

    /// Everything spoken so far, in order.
    pub fn utterances(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                CapabilityCall::Say(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    /// `true` while the gripper holds something.
    pub fn is_holding(&self) -> bool {
        *self.holding.lock().expect("holding poisoned")
    }

    /// Objects currently attached to the kinematic chain.
    pub fn attached_objects(&self) -> Vec<String> {
        let mut objects: Vec<String> = self
            .attached
            .lock()
            .expect("attached poisoned")
            .iter()
            .cloned()
            .collect();
        objects.sort();
        objects
    }

    // ── Internals ───────────────────────────────────────────────────────────

    fn record(&self, call: CapabilityCall) {
        trace!(?call, "sim capability call");
        if !self.call_delay.is_zero() {
            std::thread::sleep(self.call_delay);
        }
        self.log.lock().expect("log poisoned").push(call);
    }
}

impl CapabilitySurface for SimCapabilities {
    fn say(&self, text: &str) {
        self.record(CapabilityCall::Say(text.to_string()));
    }

    fn wait(&self, duration: Duration) {
        // Waits are recorded, never slept: sim time is free.
        self.record(CapabilityCall::Wait(duration));
    }

    fn goto(&self, target: &Target) -> ActionResult {
        self.record(CapabilityCall::Goto(target.clone()));
        ActionResult::succeeded()
    }

    fn approach(&self, target: &Point) -> ActionResult {
        self.record(CapabilityCall::Approach(target.clone()));
        ActionResult::succeeded()
    }

    fn translate(&self, meters: f32) -> ActionResult {
        self.record(CapabilityCall::Translate(meters));
        ActionResult::succeeded()
    }

    fn dock(&self) -> ActionResult {
        self.record(CapabilityCall::Dock);
        if self.dock_ok {
            ActionResult::succeeded()
        } else {
            ActionResult::failed("no obstacle within docking range")
        }
    }

    fn track(&self, target: &Target) {
        self.record(CapabilityCall::Track(target.clone()));
    }

    fn cancel_track(&self) {
        self.record(CapabilityCall::CancelTrack);
    }

    fn look_at(&self, target: &Target) -> ActionResult {
        self.record(CapabilityCall::LookAt(target.clone()));
        match target {
            Target::Entity(entity) if !self.poses.contains_key(entity) => {
                ActionResult::failed(format!("no frame for {entity}"))
            }
            _ => ActionResult::succeeded(),
        }
    }

    fn switch_stereo_pair(&self, mode: StereoMode) {
        self.record(CapabilityCall::SwitchStereoPair(mode));
    }

    fn manipulation_pose(&self) {
        self.record(CapabilityCall::ManipulationPose);
    }

    fn extract_pose(&self) {
        self.record(CapabilityCall::ExtractPose);
    }

    fn set_posture(&self, name: &str) {
        self.record(CapabilityCall::SetPosture(name.to_string()));
    }

    fn pick(&self, object: &str) -> ActionResult {
        self.record(CapabilityCall::Pick(object.to_string()));
        let scripted = self
            .pick_script
            .lock()
            .expect("pick script poisoned")
            .pop_front();
        let ok = scripted.unwrap_or(self.pick_default);
        if ok {
            *self.holding.lock().expect("holding poisoned") = true;
            ActionResult::succeeded()
        } else {
            ActionResult::failed("grasp missed the object")
        }
    }

    fn put(&self, object: &str, destination: &str) -> ActionResult {
        self.record(CapabilityCall::Put {
            object: object.to_string(),
            destination: destination.to_string(),
        });
        *self.holding.lock().expect("holding poisoned") = false;
        ActionResult::succeeded()
    }

    fn take(&self, recipient: &str, object: &str) -> ActionResult {
        self.record(CapabilityCall::Take {
            recipient: recipient.to_string(),
            object: object.to_string(),
        });
        *self.holding.lock().expect("holding poisoned") = true;
        ActionResult::succeeded()
    }

    fn handover(
        &self,
        recipient: &str,
        _options: HandoverOptions,
        progress: &mut dyn FnMut(HandoverProgress),
    ) -> ActionResult {
        self.record(CapabilityCall::Handover(recipient.to_string()));
        for sample in &self.handover_progress {
            progress(*sample);
        }
        if self.handover_releases {
            *self.holding.lock().expect("holding poisoned") = false;
        }
        ActionResult::succeeded()
    }

    fn show(&self, _performer: &str, object: &str, recipient: &str) -> ActionResult {
        self.record(CapabilityCall::Show {
            object: object.to_string(),
            recipient: recipient.to_string(),
        });
        ActionResult::succeeded()
    }

    fn put_accessible(&self, _performer: &str, object: &str, recipient: &str) -> ActionResult {
        self.record(CapabilityCall::PutAccessible {
            object: object.to_string(),
            recipient: recipient.to_string(),
        });
        ActionResult::succeeded()
    }

    fn give(&self, object: &str, recipient: &str) -> ActionResult {
        self.record(CapabilityCall::Give {
            object: object.to_string(),
            recipient: recipient.to_string(),
        });
        ActionResult::succeeded()
    }

    fn hide(&self, _performer: &str, object: &str, recipient: &str) -> ActionResult {
        self.record(CapabilityCall::Hide {
            object: object.to_string(),
            recipient: recipient.to_string(),
        });
        ActionResult::succeeded()
    }

    fn attach_object(&self, object: &str, attach: bool) {
        self.record(CapabilityCall::AttachObject {
            object: object.to_string(),
            attach,
        });
        let mut attached = self.attached.lock().expect("attached poisoned");
        if attach {
            attached.insert(object.to_string());
        } else {
            attached.remove(object);
        }
    }

    fn has_picked_something(&self) -> ActionResult {
        self.record(CapabilityCall::HasPickedSomething);
        if self.is_holding() {
            ActionResult::succeeded()
        } else {
            ActionResult::failed("gripper is empty")
        }
    }

    fn display(&self, surface: &str) -> ActionResult {
        self.record(CapabilityCall::Display(surface.to_string()));
        ActionResult::succeeded()
    }

    fn pose_of(&self, entity: &str) -> Result<Point, VolitionError> {
        self.poses
            .get(entity)
            .cloned()
            .ok_or_else(|| VolitionError::UnknownFrame(entity.to_string()))
    }

    fn human_pose(&self, person: &str) -> Option<Point> {
        let mut humans = self.humans.lock().expect("humans poisoned");
        let script = humans.get_mut(person)?;
        if script.absent_for > 0 {
            script.absent_for -= 1;
            None
        } else {
            Some(script.pose.clone())
        }
    }

    fn distance_to(&self, _target: &Point) -> f32 {
        self.target_distance
    }

    fn last_seen(&self, object: &str) -> Option<DateTime<Utc>> {
        self.sightings
            .lock()
            .expect("sightings poisoned")
            .get(object)
            .copied()
    }

    fn cancel_all_background_actions(&self) {
        self.record(CapabilityCall::CancelBackgroundActions);
    }

    fn cancel_all_remote_actions(&self) {
        self.record(CapabilityCall::CancelRemoteActions);
    }
}
