//! The [`Desire`] trait and the shared [`DesireBase`] resolution logic.
//!
//! A desire is a transient wish attributed to some agent in the knowledge
//! store.  Constructing one resolves the relational fields every kind shares
//! (who owns the wish, who is expected to perform it); executing one runs its
//! plan against the capability surface.  Resolution failures are errors at
//! construction time, while failures during the plan itself are ordinary
//! [`Outcome::Failed`] verdicts.

use tracing::info;
use volition_agent::knowledge::{Pattern, relations};
use volition_agent::Agent;
use volition_types::{Fact, MemoryScope, Outcome, Priority, Situation, VolitionError};

use crate::supervisor::ExecutionContext;

/// A runnable desire.
///
/// Implementors provide [`plan`][Desire::plan]; the default
/// [`execute`][Desire::execute] announces the performance first, so every
/// kind leaves the same episodic trace without repeating it.
pub trait Desire: Send {
    /// The shared relational fields resolved at construction.
    fn base(&self) -> &DesireBase;

    /// Human-readable kind, used in logs and spoken announcements.
    fn name(&self) -> &'static str;

    /// Urgency of this desire.  Lower is more urgent.
    fn priority(&self) -> Priority {
        Priority::DEFAULT
    }

    /// The kind-specific state machine.
    fn plan(&self, cx: &ExecutionContext) -> Outcome;

    fn situation(&self) -> &Situation {
        &self.base().situation
    }

    /// Announce the performance, then run the plan.
    fn execute(&self, cx: &ExecutionContext) -> Outcome {
        self.base().announce(self.name());
        self.plan(cx)
    }
}

/// Fields common to every desire, resolved from the knowledge store when the
/// desire is built.
pub struct DesireBase {
    pub situation: Situation,
    pub agent: Agent,
    /// Agents the store says desire this situation.  Never empty.
    pub owners: Vec<String>,
    /// The agent expected to perform it.
    pub performer: String,
}

impl DesireBase {
    /// Resolve the owners and performer of `situation`.
    ///
    /// # Errors
    ///
    /// [`VolitionError::NoOwner`] when nobody desires the situation,
    /// [`VolitionError::NoPerformer`] when no performer is attributed.
    pub fn resolve(situation: &Situation, agent: &Agent) -> Result<Self, VolitionError> {
        let owners = agent
            .knowledge
            .query(&Pattern::subjects_of(relations::DESIRES, situation.as_str()));
        if owners.is_empty() {
            return Err(VolitionError::NoOwner(situation.clone()));
        }
        let performer = agent
            .knowledge
            .query(&Pattern::objects_of(situation.as_str(), relations::PERFORMED_BY))
            .into_iter()
            .next()
            .ok_or_else(|| VolitionError::NoPerformer(situation.clone()))?;
        Ok(Self {
            situation: situation.clone(),
            agent: agent.clone(),
            owners,
            performer,
        })
    }

    /// The agent whose wish this is.  When several agents share the wish,
    /// the first recorded one speaks for them.
    pub fn issuer(&self) -> &str {
        &self.owners[0]
    }

    /// Objects the situation relates to through `predicate`, in store order.
    pub(crate) fn related(&self, predicate: &str) -> Vec<String> {
        self.agent
            .knowledge
            .query(&Pattern::objects_of(self.situation.as_str(), predicate))
    }

    /// First binding of `predicate`, if any.
    pub(crate) fn first_related(&self, predicate: &str) -> Option<String> {
        self.related(predicate).into_iter().next()
    }

    /// The entity to deliver to: the explicit recipient when stated,
    /// otherwise the issuer of the desire.
    pub(crate) fn recipient(&self) -> String {
        self.first_related(relations::RECEIVED_BY)
            .unwrap_or_else(|| self.issuer().to_string())
    }

    /// Record in episodic memory that this agent is performing the
    /// situation, when it is indeed the attributed performer.
    pub(crate) fn announce(&self, name: &str) {
        if self.agent.is_self(&self.performer) {
            info!(desire = name, situation = %self.situation, "starting performance");
            self.agent.knowledge.assert_fact(
                Fact::new(
                    self.agent.self_id(),
                    relations::CURRENTLY_PERFORMS,
                    self.situation.as_str(),
                ),
                MemoryScope::Episodic,
            );
        }
    }
}
