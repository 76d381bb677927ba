//! [`Agent`] – the handle a desire executes against.
//!
//! Bundles the two consumed services with the agent's own identifier in the
//! knowledge store.  Clones are cheap (two `Arc`s and a string); every desire
//! holds its own clone so the supervisor and the worker never contend over a
//! shared borrow.

use std::sync::Arc;

use crate::capability::CapabilitySurface;
use crate::knowledge::KnowledgeStore;

/// The embodied agent: knowledge, capabilities, and a name for itself.
#[derive(Clone)]
pub struct Agent {
    pub knowledge: Arc<dyn KnowledgeStore>,
    pub capabilities: Arc<dyn CapabilitySurface>,
    /// The identifier other entities use to refer to this agent in the
    /// knowledge store.
    self_id: String,
}

impl Agent {
    /// Build an agent with the conventional self identifier `"myself"`.
    pub fn new(
        knowledge: Arc<dyn KnowledgeStore>,
        capabilities: Arc<dyn CapabilitySurface>,
    ) -> Self {
        Self {
            knowledge,
            capabilities,
            self_id: "myself".to_string(),
        }
    }

    /// Override the self identifier (multi-robot knowledge stores name each
    /// agent explicitly).
    pub fn with_self_id(mut self, self_id: impl Into<String>) -> Self {
        self.self_id = self_id.into();
        self
    }

    pub fn self_id(&self) -> &str {
        &self.self_id
    }

    /// `true` when `entity` refers to this agent.  Knowledge stores may
    /// return namespaced identifiers, so containment is the match rule.
    pub fn is_self(&self, entity: &str) -> bool {
        entity.contains(&self.self_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{InMemoryKnowledge, SimCapabilities};

    fn agent() -> Agent {
        Agent::new(
            Arc::new(InMemoryKnowledge::new()),
            Arc::new(SimCapabilities::new()),
        )
    }

    #[test]
    fn default_self_id_is_myself() {
        assert_eq!(agent().self_id(), "myself");
    }

    #[test]
    fn namespaced_identifier_still_matches_self() {
        let a = agent();
        assert!(a.is_self("oro:myself"));
        assert!(!a.is_self("HERAKLES"));
    }

    #[test]
    fn self_id_can_be_overridden() {
        let a = agent().with_self_id("pr2");
        assert!(a.is_self("pr2"));
        assert!(!a.is_self("myself"));
    }
}
