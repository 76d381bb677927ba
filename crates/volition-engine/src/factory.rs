//! [`DesireRegistry`] – classify a situation and build the matching desire.
//!
//! The knowledge store classifies each situation into ontology classes; the
//! registry maps each actionable class name to a constructor.  Non-actionable
//! marker classes the ontology attaches to every active situation are
//! filtered out before the match.

use std::collections::HashMap;

use tracing::debug;
use volition_agent::Agent;
use volition_types::{Situation, VolitionError};

use crate::desire::Desire;
use crate::variants::{
    Bring, Display, Get, Give, Hide, Look, Move, Pick, Put, Show, Stop, Test,
};

/// Constructor shape every desire kind exposes to the registry.
pub type DesireConstructor = fn(&Situation, &Agent) -> Result<Box<dyn Desire>, VolitionError>;

/// Ontology classes that carry no behaviour of their own.
const MARKER_CLASSES: &[&str] = &["ActiveConcept"];

/// Maps ontology class names to desire constructors.
pub struct DesireRegistry {
    constructors: HashMap<String, DesireConstructor>,
}

impl DesireRegistry {
    /// An empty registry; variants must be registered by hand.
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// A registry with every built-in desire kind.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("Move", |s, a| Ok(Box::new(Move::new(s, a)?)));
        registry.register("Get", |s, a| Ok(Box::new(Get::new(s, a)?)));
        registry.register("Pick", |s, a| Ok(Box::new(Pick::new(s, a)?)));
        registry.register("Bring", |s, a| Ok(Box::new(Bring::new(s, a)?)));
        registry.register("Put", |s, a| Ok(Box::new(Put::new(s, a)?)));
        registry.register("Show", |s, a| Ok(Box::new(Show::new(s, a)?)));
        registry.register("Give", |s, a| Ok(Box::new(Give::new(s, a)?)));
        registry.register("Hide", |s, a| Ok(Box::new(Hide::new(s, a)?)));
        registry.register("Look", |s, a| Ok(Box::new(Look::new(s, a)?)));
        registry.register("Display", |s, a| Ok(Box::new(Display::new(s, a)?)));
        registry.register("Stop", |s, a| Ok(Box::new(Stop::new(s, a)?)));
        registry.register("Test", |s, a| Ok(Box::new(Test::new(s, a)?)));
        registry
    }

    /// Bind `class` to `constructor`, replacing any previous binding.
    pub fn register(&mut self, class: impl Into<String>, constructor: DesireConstructor) {
        self.constructors.insert(class.into(), constructor);
    }

    /// Classify `situation` and build the matching desire.
    ///
    /// # Errors
    ///
    /// [`VolitionError::AmbiguousDesireType`] unless exactly one actionable
    /// class remains after marker filtering;
    /// [`VolitionError::UnknownDesireType`] when that class has no registered
    /// constructor; plus whatever the constructor itself returns.
    pub fn resolve(
        &self,
        situation: &Situation,
        agent: &Agent,
    ) -> Result<Box<dyn Desire>, VolitionError> {
        let mut classes = agent.knowledge.direct_classes_of(situation.as_str());
        classes.retain(|c| !MARKER_CLASSES.contains(&c.as_str()));

        if classes.len() != 1 {
            return Err(VolitionError::AmbiguousDesireType {
                situation: situation.clone(),
                classes,
            });
        }
        let class = classes.pop().unwrap_or_default();
        debug!(%situation, class, "resolved desire class");

        let constructor = self
            .constructors
            .get(&class)
            .ok_or(VolitionError::UnknownDesireType { class })?;
        constructor(situation, agent)
    }
}

impl Default for DesireRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
