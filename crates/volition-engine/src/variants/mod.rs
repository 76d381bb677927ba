//! The built-in desire kinds.
//!
//! Each variant is a linear-with-branches plan over the capability surface,
//! sharing the same failure ladder: attempt, retry once with a corrective
//! step, then give up verbally and retreat with a failure outcome.  Plans
//! consult the invalidation flag between capability calls and unwind with a
//! preempted verdict when it is raised.

pub mod bring;
pub mod diagnostic;
pub mod display;
pub mod get;
pub mod give;
pub mod hide;
pub mod look;
pub mod move_to;
pub mod pick;
pub mod put;
pub mod show;
pub mod stop;

pub use bring::Bring;
pub use diagnostic::Test;
pub use display::Display;
pub use get::Get;
pub use give::Give;
pub use hide::Hide;
pub use look::Look;
pub use move_to::Move;
pub use pick::Pick;
pub use put::Put;
pub use show::Show;
pub use stop::Stop;

use volition_agent::Agent;
use volition_types::Target;

use crate::supervisor::ExecutionContext;

/// Verdict of the shared wait-once visibility check.
pub(crate) enum HumanCheck {
    Visible,
    /// Still not visible after the single wait; the agent has already
    /// retreated home.
    Absent,
    Preempted,
}

/// Confirm `person` is visible, waiting once if not.  On the second miss the
/// agent excuses itself and retreats to the home location.
pub(crate) fn await_human(agent: &Agent, cx: &ExecutionContext, person: &str) -> HumanCheck {
    let caps = &agent.capabilities;
    if caps.human_pose(person).is_some() {
        return HumanCheck::Visible;
    }
    caps.say("Where are you?");
    caps.wait(cx.config().human_wait);
    if cx.invalidated() {
        return HumanCheck::Preempted;
    }
    if caps.human_pose(person).is_some() {
        return HumanCheck::Visible;
    }
    caps.say("When you are ready, ask me again.");
    caps.manipulation_pose();
    caps.goto(&Target::Entity(cx.config().home_location.clone()));
    HumanCheck::Absent
}

/// Dock against the support, or nudge forward when nothing dockable is
/// within range.
pub(crate) fn dock_or_nudge(agent: &Agent, cx: &ExecutionContext) {
    if !agent.capabilities.dock().ok {
        agent
            .capabilities
            .translate(cx.config().dock_fallback_translation);
    }
}
