//! Shared fixtures for engine tests: a scripted world builder and a
//! closure-backed desire.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use volition_agent::knowledge::relations;
use volition_agent::sim::{InMemoryKnowledge, SimCapabilities};
use volition_agent::Agent;
use volition_types::{Outcome, Priority, Situation};

use crate::desire::{Desire, DesireBase};
use crate::supervisor::ExecutionContext;

/// Fluent builder over the sim knowledge store and capability surface.
pub(crate) struct WorldBuilder {
    knowledge: InMemoryKnowledge,
    caps: SimCapabilities,
}

/// A world where `situation` is desired by `HERAKLES` and performed by
/// `myself`.
pub(crate) fn world_builder(situation: &str) -> WorldBuilder {
    WorldBuilder {
        knowledge: InMemoryKnowledge::new(),
        caps: SimCapabilities::new(),
    }
    .situation(situation)
}

pub(crate) fn seeded_world(situation: &str) -> (Agent, Arc<SimCapabilities>, Arc<InMemoryKnowledge>) {
    world_builder(situation).build()
}

impl WorldBuilder {
    /// Register another situation with the conventional owner and performer.
    pub fn situation(mut self, s: &str) -> Self {
        self.knowledge = self
            .knowledge
            .with_fact("HERAKLES", relations::DESIRES, s)
            .with_fact(s, relations::PERFORMED_BY, "myself");
        self
    }

    pub fn fact(mut self, subject: &str, predicate: &str, object: &str) -> Self {
        self.knowledge = self.knowledge.with_fact(subject, predicate, object);
        self
    }

    pub fn classify(mut self, entity: &str, class: &str) -> Self {
        self.knowledge = self.knowledge.with_class(entity, class);
        self
    }

    pub fn pose(mut self, entity: &str, x: f32, y: f32, z: f32) -> Self {
        self.caps = self.caps.with_pose(entity, x, y, z);
        self
    }

    pub fn call_delay(mut self, delay: Duration) -> Self {
        self.caps = self.caps.with_call_delay(delay);
        self
    }

    pub fn target_distance(mut self, meters: f32) -> Self {
        self.caps = self.caps.with_target_distance(meters);
        self
    }

    pub fn dock_failure(mut self) -> Self {
        self.caps = self.caps.with_dock_failure();
        self
    }

    pub fn object_in_hand(mut self) -> Self {
        self.caps = self.caps.with_object_in_hand();
        self
    }

    pub fn pick_failures(mut self, n: usize) -> Self {
        self.caps = self.caps.with_pick_failures(n);
        self
    }

    pub fn pick_always_failing(mut self) -> Self {
        self.caps = self.caps.with_pick_always_failing();
        self
    }

    pub fn recipient_declining(mut self) -> Self {
        self.caps = self.caps.with_recipient_declining();
        self
    }

    pub fn visible_human(mut self, person: &str) -> Self {
        self.caps = self.caps.with_visible_human(person);
        self
    }

    pub fn human_appearing_after(mut self, person: &str, absent_queries: usize) -> Self {
        self.caps = self.caps.with_human_appearing_after(person, absent_queries);
        self
    }

    pub fn sighting(mut self, object: &str) -> Self {
        self.caps = self.caps.with_sighting(object);
        self
    }

    pub fn sighting_at(mut self, object: &str, at: DateTime<Utc>) -> Self {
        self.caps = self.caps.with_sighting_at(object, at);
        self
    }

    pub fn build(self) -> (Agent, Arc<SimCapabilities>, Arc<InMemoryKnowledge>) {
        let knowledge = Arc::new(self.knowledge);
        let caps = Arc::new(self.caps);
        let agent = Agent::new(knowledge.clone(), caps.clone());
        (agent, caps, knowledge)
    }
}

/// A desire whose plan is a closure, for exercising the supervisor without
/// dragging a full variant in.
pub(crate) struct FnDesire<F>
where
    F: Fn(&ExecutionContext) -> Outcome + Send + Sync,
{
    base: DesireBase,
    priority: Priority,
    body: F,
}

impl<F> FnDesire<F>
where
    F: Fn(&ExecutionContext) -> Outcome + Send + Sync,
{
    pub fn new(agent: &Agent, situation: &str, priority: Priority, body: F) -> Self {
        let base = DesireBase::resolve(&Situation::new(situation), agent)
            .expect("fixture situation must resolve");
        Self {
            base,
            priority,
            body,
        }
    }
}

impl<F> Desire for FnDesire<F>
where
    F: Fn(&ExecutionContext) -> Outcome + Send + Sync,
{
    fn base(&self) -> &DesireBase {
        &self.base
    }

    fn name(&self) -> &'static str {
        "probe"
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn plan(&self, cx: &ExecutionContext) -> Outcome {
        (self.body)(cx)
    }
}
