//! [`KnowledgeStore`] – pattern-based relation lookup.
//!
//! The knowledge service holds subject–predicate–object statements about the
//! world ("`sit_42 performedBy myself`", "`GREY_TAPE isAt LOW_TABLE`").  The
//! engine queries it with a [`Pattern`]: a relation with exactly one position
//! left open.  Bindings come back in store order, and callers that need a
//! single value take the first one returned – that tie-break is explicit
//! policy, not an accident of iteration order.
//!
//! The store is read-mostly; the single write the engine performs is the
//! append-only episodic record that the agent currently performs a situation.

use volition_types::{Fact, MemoryScope};

/// Relation names the engine resolves desires through.
pub mod relations {
    /// `<owner> desires <situation>`
    pub const DESIRES: &str = "desires";
    /// `<situation> performedBy <entity>`
    pub const PERFORMED_BY: &str = "performedBy";
    /// `<situation> hasGoal <entity>`
    pub const HAS_GOAL: &str = "hasGoal";
    /// `<situation> actsOnObject <object>`
    pub const ACTS_ON_OBJECT: &str = "actsOnObject";
    /// `<situation> receivedBy <entity>`
    pub const RECEIVED_BY: &str = "receivedBy";
    /// `<object> isAt <location>`
    pub const IS_AT: &str = "isAt";
    /// `<situation> involves <entity>`
    pub const INVOLVES: &str = "involves";
    /// `<agent> currentlyPerforms <situation>` – the episodic write.
    pub const CURRENTLY_PERFORMS: &str = "currentlyPerforms";
    /// `<entity> rdf:type <class>`
    pub const RDF_TYPE: &str = "rdf:type";
}

/// A partially specified relation with exactly one open position.
///
/// Constructed through [`Pattern::subjects_of`] or [`Pattern::objects_of`],
/// which is what keeps the one-wildcard invariant – there is no way to build
/// a pattern with zero or two open slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    subject: Option<String>,
    predicate: String,
    object: Option<String>,
}

impl Pattern {
    /// All subjects `X` such that `X <predicate> <object>` holds.
    pub fn subjects_of(predicate: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            subject: None,
            predicate: predicate.into(),
            object: Some(object.into()),
        }
    }

    /// All objects `X` such that `<subject> <predicate> X` holds.
    pub fn objects_of(subject: impl Into<String>, predicate: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            predicate: predicate.into(),
            object: None,
        }
    }

    /// `Some(binding)` when `fact` matches this pattern, where `binding` is
    /// the value filling the open position.
    pub fn binding<'a>(&self, fact: &'a Fact) -> Option<&'a str> {
        if fact.predicate != self.predicate {
            return None;
        }
        match (&self.subject, &self.object) {
            (None, Some(object)) if fact.object == *object => Some(&fact.subject),
            (Some(subject), None) if fact.subject == *subject => Some(&fact.object),
            _ => None,
        }
    }
}

/// The consumed knowledge/ontology service.
///
/// Lookups are idempotent and safe to share across threads; the store may be
/// queried from the worker while a preempting caller inspects scheduler
/// state.
pub trait KnowledgeStore: Send + Sync {
    /// Resolve `pattern` to the ordered set of bindings for its open
    /// position.  Empty when nothing matches.
    fn query(&self, pattern: &Pattern) -> Vec<String>;

    /// Direct classifications of `entity` (its asserted classes, not the
    /// transitive closure).
    fn direct_classes_of(&self, entity: &str) -> Vec<String>;

    /// `true` when the store holds `fact`.
    fn contains(&self, fact: &Fact) -> bool;

    /// Record `fact` in the given memory bank.  Append-only; the engine
    /// never reads back what it asserted.
    fn assert_fact(&self, fact: Fact, scope: MemoryScope);
}
