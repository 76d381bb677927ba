//! [`Supervisor`] – serialises desire execution and arbitrates preemption.
//!
//! The supervisor owns the "exactly one active desire" invariant.  Three
//! shared fields – `is_performing`, `current_priority`, `context_invalidated`
//! – live behind a single mutex/condition pair and are never touched by any
//! other component.
//!
//! # Protocol
//!
//! Two logical threads of control matter: the **worker** that calls
//! [`Supervisor::perform`] and blocks inside the desire's plan, and arbitrary
//! **callers** that invoke [`Supervisor::try_preempt`] or
//! [`Supervisor::wait_for_idle`].  A preempting caller cancels the agent's
//! in-flight background actions, raises the invalidation flag, and then
//! blocks on the condition until the running `perform` completes and
//! notifies.  Because the flag check and the wait happen under the same lock
//! as the notifying side, a preemptor can never miss the wake-up or return
//! while the old desire is still touching the capability surface.
//!
//! Preemption is cooperative: the running desire stops issuing *new*
//! capability calls at its next checkpoint, but a synchronous call already in
//! flight must return on its own.
//!
//! `try_preempt` never starts the new desire.  Callers follow up with a
//! separate `perform` – collapsing the two steps would change the priority
//! arbitration semantics.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use tracing::{debug, info};
use volition_agent::Agent;
use volition_types::{Outcome, Priority, VolitionError};

use crate::config::EngineConfig;
use crate::desire::Desire;

// ─────────────────────────────────────────────────────────────────────────────
// Shared scheduler state
// ─────────────────────────────────────────────────────────────────────────────

struct SchedulerState {
    is_performing: bool,
    /// Valid only while `is_performing` is true.
    current_priority: Priority,
    context_invalidated: bool,
}

pub(crate) struct Shared {
    state: Mutex<SchedulerState>,
    done: Condvar,
}

impl Shared {
    fn new() -> Self {
        Self {
            state: Mutex::new(SchedulerState {
                is_performing: false,
                current_priority: Priority::DEFAULT,
                context_invalidated: false,
            }),
            done: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().expect("scheduler state poisoned")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ExecutionContext
// ─────────────────────────────────────────────────────────────────────────────

/// What a running desire sees of the supervisor: the invalidation flag and
/// the engine tunables.
///
/// Plans consult [`ExecutionContext::invalidated`] at safe checkpoints –
/// between capability calls, never mid-call – and unwind with
/// [`Outcome::Preempted`] when it is set.
pub struct ExecutionContext {
    shared: Arc<Shared>,
    config: EngineConfig,
}

impl ExecutionContext {
    fn new(shared: Arc<Shared>, config: EngineConfig) -> Self {
        Self { shared, config }
    }

    /// A context owned by no supervisor, for running a desire directly.
    pub fn detached(config: EngineConfig) -> Self {
        Self::new(Arc::new(Shared::new()), config)
    }

    /// `true` once a preemptor has invalidated the running desire's context.
    pub fn invalidated(&self) -> bool {
        self.shared.lock().context_invalidated
    }

    /// Raise the invalidation flag.  On a detached context this is the only
    /// way the flag can be set.
    pub fn invalidate(&self) {
        self.shared.lock().context_invalidated = true;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Supervisor
// ─────────────────────────────────────────────────────────────────────────────

/// Serialises desire execution: at most one desire runs, and only a strictly
/// more urgent candidate can interrupt it.
pub struct Supervisor {
    shared: Arc<Shared>,
    agent: Agent,
    config: EngineConfig,
}

impl Supervisor {
    pub fn new(agent: Agent, config: EngineConfig) -> Self {
        Self {
            shared: Arc::new(Shared::new()),
            agent,
            config,
        }
    }

    /// Run `desire` to completion, failure, or preemption.
    ///
    /// Blocks for as long as the desire's plan does.  On return – whatever
    /// the verdict – `is_performing` is cleared, the invalidation flag is
    /// reset, and every blocked preemptor or idle-waiter is woken.
    ///
    /// # Errors
    ///
    /// [`VolitionError::AlreadyPerforming`] when a desire is still running.
    /// Only one caller thread is expected to drive `perform`, so this
    /// signals a scheduling bug upstream, not a recoverable race.
    pub fn perform(&self, desire: &dyn Desire) -> Result<Outcome, VolitionError> {
        {
            let mut state = self.shared.lock();
            if state.is_performing {
                return Err(VolitionError::AlreadyPerforming);
            }
            state.is_performing = true;
            state.current_priority = desire.priority();
            state.context_invalidated = false;
        }

        info!(
            desire = desire.name(),
            situation = %desire.situation(),
            priority = desire.priority().0,
            "performing desire"
        );

        // The only suspension point of the worker side: the plan may block
        // arbitrarily long inside capability calls.
        let cx = ExecutionContext::new(Arc::clone(&self.shared), self.config.clone());
        let outcome = desire.execute(&cx);

        debug!(desire = desire.name(), ?outcome, "desire returned");

        let mut state = self.shared.lock();
        state.is_performing = false;
        state.context_invalidated = false;
        self.shared.done.notify_all();
        Ok(outcome)
    }

    /// Interrupt the running desire if `candidate` is strictly more urgent.
    ///
    /// When it is, the agent's in-flight background and remote actions are
    /// cancelled, the running desire's context is invalidated, and this call
    /// blocks until that desire has genuinely stopped – only then may the
    /// caller `perform` the candidate.  When nothing is running, or the
    /// candidate does not outrank the running desire, this is a no-op and
    /// the caller is expected to retry later.
    pub fn try_preempt(&self, candidate: &dyn Desire) {
        let mut state = self.shared.lock();
        if !state.is_performing {
            return;
        }
        if !candidate.priority().is_more_urgent_than(state.current_priority) {
            return;
        }

        info!(
            candidate = candidate.name(),
            candidate_priority = candidate.priority().0,
            running_priority = state.current_priority.0,
            "preempting running desire"
        );

        self.agent.capabilities.cancel_all_background_actions();
        self.agent.capabilities.cancel_all_remote_actions();
        state.context_invalidated = true;

        while state.is_performing {
            state = self
                .shared
                .done
                .wait(state)
                .expect("scheduler state poisoned");
        }
    }

    /// Block until no desire is performing.  Returns immediately when idle.
    pub fn wait_for_idle(&self) {
        let mut state = self.shared.lock();
        while state.is_performing {
            state = self
                .shared
                .done
                .wait(state)
                .expect("scheduler state poisoned");
        }
    }

    /// `true` while a desire's plan is running.
    pub fn is_performing(&self) -> bool {
        self.shared.lock().is_performing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FnDesire, seeded_world};
    use crate::variants::{move_to::Move, stop::Stop};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;
    use volition_agent::CapabilityCall;
    use volition_types::Situation;

    #[test]
    fn perform_returns_the_plan_outcome() {
        let (agent, _caps, _know) = seeded_world("sit_1");
        let supervisor = Supervisor::new(agent.clone(), EngineConfig::default());
        let desire = FnDesire::new(&agent, "sit_1", Priority::DEFAULT, |_| Outcome::Completed);
        assert_eq!(supervisor.perform(&desire).unwrap(), Outcome::Completed);
        assert!(!supervisor.is_performing());
    }

    #[test]
    fn perform_records_the_episodic_fact() {
        let (agent, _caps, know) = seeded_world("sit_1");
        let supervisor = Supervisor::new(agent.clone(), EngineConfig::default());
        let desire = FnDesire::new(&agent, "sit_1", Priority::DEFAULT, |_| Outcome::Completed);
        supervisor.perform(&desire).unwrap();
        let log = know.episodic_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].predicate, "currentlyPerforms");
        assert_eq!(log[0].object, "sit_1");
    }

    #[test]
    fn second_perform_while_busy_is_a_concurrency_violation() {
        let (agent, _caps, _know) = seeded_world("sit_1");
        let supervisor = Arc::new(Supervisor::new(agent.clone(), EngineConfig::default()));

        let release = Arc::new(AtomicBool::new(false));
        let release_worker = Arc::clone(&release);
        let worker_desire = FnDesire::new(&agent, "sit_1", Priority::DEFAULT, move |_| {
            while !release_worker.load(Ordering::Acquire) {
                thread::sleep(Duration::from_millis(1));
            }
            Outcome::Completed
        });

        let sup_worker = Arc::clone(&supervisor);
        let worker = thread::spawn(move || sup_worker.perform(&worker_desire).unwrap());

        while !supervisor.is_performing() {
            thread::yield_now();
        }

        let intruder = FnDesire::new(&agent, "sit_1", Priority::DEFAULT, |_| Outcome::Completed);
        assert_eq!(
            supervisor.perform(&intruder),
            Err(VolitionError::AlreadyPerforming)
        );

        release.store(true, Ordering::Release);
        assert_eq!(worker.join().unwrap(), Outcome::Completed);
    }

    #[test]
    fn try_preempt_when_idle_is_a_noop() {
        let (agent, caps, _know) = seeded_world("sit_1");
        let supervisor = Supervisor::new(agent.clone(), EngineConfig::default());
        let stop = FnDesire::new(&agent, "sit_1", Priority::STOP, |_| Outcome::Completed);
        supervisor.try_preempt(&stop);
        // No cancellation was issued.
        assert!(caps.calls().is_empty());
    }

    #[test]
    fn more_urgent_candidate_invalidates_and_blocks_until_exit() {
        let (agent, caps, _know) = seeded_world("sit_1");
        let supervisor = Arc::new(Supervisor::new(agent.clone(), EngineConfig::default()));

        let worker_desire = FnDesire::new(&agent, "sit_1", Priority::DEFAULT, |cx| {
            // Cooperative plan: poll the invalidation flag at checkpoints.
            for _ in 0..1_000 {
                if cx.invalidated() {
                    return Outcome::Preempted;
                }
                thread::sleep(Duration::from_millis(1));
            }
            Outcome::Completed
        });

        let sup_worker = Arc::clone(&supervisor);
        let worker = thread::spawn(move || sup_worker.perform(&worker_desire).unwrap());

        while !supervisor.is_performing() {
            thread::yield_now();
        }

        let stop = FnDesire::new(&agent, "sit_1", Priority::STOP, |_| Outcome::Completed);
        supervisor.try_preempt(&stop);

        // try_preempt returned, so the old desire must have fully unwound.
        assert!(!supervisor.is_performing());
        assert_eq!(worker.join().unwrap(), Outcome::Preempted);

        // Background/remote cancellation happened before the flag was raised.
        let calls = caps.calls();
        assert!(calls.contains(&CapabilityCall::CancelBackgroundActions));
        assert!(calls.contains(&CapabilityCall::CancelRemoteActions));
    }

    #[test]
    fn non_more_urgent_candidate_leaves_the_running_desire_alone() {
        let (agent, caps, _know) = seeded_world("sit_1");
        let supervisor = Arc::new(Supervisor::new(agent.clone(), EngineConfig::default()));

        let saw_invalidation = Arc::new(AtomicBool::new(false));
        let saw = Arc::clone(&saw_invalidation);
        let release = Arc::new(AtomicBool::new(false));
        let release_worker = Arc::clone(&release);
        let worker_desire = FnDesire::new(&agent, "sit_1", Priority::DEFAULT, move |cx| {
            while !release_worker.load(Ordering::Acquire) {
                if cx.invalidated() {
                    saw.store(true, Ordering::Release);
                }
                thread::sleep(Duration::from_millis(1));
            }
            Outcome::Completed
        });

        let sup_worker = Arc::clone(&supervisor);
        let worker = thread::spawn(move || sup_worker.perform(&worker_desire).unwrap());

        while !supervisor.is_performing() {
            thread::yield_now();
        }

        // Equal priority: must not block and must not invalidate.
        let peer = FnDesire::new(&agent, "sit_1", Priority::DEFAULT, |_| Outcome::Completed);
        supervisor.try_preempt(&peer);
        assert!(supervisor.is_performing());

        release.store(true, Ordering::Release);
        assert_eq!(worker.join().unwrap(), Outcome::Completed);
        assert!(!saw_invalidation.load(Ordering::Acquire));
        assert!(!caps.calls().contains(&CapabilityCall::CancelBackgroundActions));
    }

    #[test]
    fn perform_resets_the_invalidation_flag_at_entry() {
        let (agent, _caps, _know) = seeded_world("sit_1");
        let supervisor = Arc::new(Supervisor::new(agent.clone(), EngineConfig::default()));

        // First desire gets preempted, leaving the flag raised mid-flight.
        let victim = FnDesire::new(&agent, "sit_1", Priority::DEFAULT, |cx| {
            for _ in 0..1_000 {
                if cx.invalidated() {
                    return Outcome::Preempted;
                }
                thread::sleep(Duration::from_millis(1));
            }
            Outcome::Completed
        });
        let sup_worker = Arc::clone(&supervisor);
        let worker = thread::spawn(move || sup_worker.perform(&victim).unwrap());
        while !supervisor.is_performing() {
            thread::yield_now();
        }
        let stop = FnDesire::new(&agent, "sit_1", Priority::STOP, |_| Outcome::Completed);
        supervisor.try_preempt(&stop);
        worker.join().unwrap();

        // The next perform must start with a clean context.
        let probe = FnDesire::new(&agent, "sit_1", Priority::DEFAULT, |cx| {
            assert!(!cx.invalidated());
            Outcome::Completed
        });
        assert_eq!(supervisor.perform(&probe).unwrap(), Outcome::Completed);
    }

    #[test]
    fn is_performing_clears_even_when_the_plan_fails() {
        let (agent, _caps, _know) = seeded_world("sit_1");
        let supervisor = Supervisor::new(agent.clone(), EngineConfig::default());
        let failing = FnDesire::new(&agent, "sit_1", Priority::DEFAULT, |_| {
            Outcome::Failed(volition_types::TaskFailure::HandsEmpty)
        });
        let outcome = supervisor.perform(&failing).unwrap();
        assert!(matches!(outcome, Outcome::Failed(_)));
        assert!(!supervisor.is_performing());
    }

    #[test]
    fn wait_for_idle_returns_immediately_when_idle() {
        let (agent, _caps, _know) = seeded_world("sit_1");
        let supervisor = Supervisor::new(agent, EngineConfig::default());
        supervisor.wait_for_idle();
    }

    #[test]
    fn wait_for_idle_blocks_until_the_worker_unwinds() {
        let (agent, _caps, _know) = seeded_world("sit_1");
        let supervisor = Arc::new(Supervisor::new(agent.clone(), EngineConfig::default()));

        let desire = FnDesire::new(&agent, "sit_1", Priority::DEFAULT, |_| {
            thread::sleep(Duration::from_millis(30));
            Outcome::Completed
        });
        let sup_worker = Arc::clone(&supervisor);
        let worker = thread::spawn(move || sup_worker.perform(&desire).unwrap());
        while !supervisor.is_performing() {
            thread::yield_now();
        }

        supervisor.wait_for_idle();
        assert!(!supervisor.is_performing());
        worker.join().unwrap();
    }

    /// Full priority-arbitration scenario: a Stop desire submitted while a
    /// default-priority Move runs preempts it, the Move unwinds with a
    /// preempted verdict, and the Stop then runs to completion.
    #[test]
    fn stop_preempts_a_running_move() {
        let (agent, caps, _know) = crate::testutil::world_builder("sit_move")
            .fact("sit_move", "hasGoal", "KITCHEN")
            .classify("sit_move", "Move")
            .situation("sit_stop")
            .classify("sit_stop", "Stop")
            .pose("KITCHEN", 3.0, 1.0, 0.0)
            .call_delay(Duration::from_millis(15))
            .build();

        let supervisor = Arc::new(Supervisor::new(agent.clone(), EngineConfig::default()));

        let move_desire = Move::new(&Situation::new("sit_move"), &agent).unwrap();
        let sup_worker = Arc::clone(&supervisor);
        let worker = thread::spawn(move || sup_worker.perform(&move_desire).unwrap());

        while !supervisor.is_performing() {
            thread::yield_now();
        }
        // Let the Move get a couple of capability calls deep.
        thread::sleep(Duration::from_millis(20));

        let stop = Stop::new(&Situation::new("sit_stop"), &agent).unwrap();
        supervisor.try_preempt(&stop);
        assert_eq!(worker.join().unwrap(), Outcome::Preempted);

        // Two-step contract: the preemptor performs the candidate itself.
        assert_eq!(supervisor.perform(&stop).unwrap(), Outcome::Completed);
        assert!(caps.utterances().contains(&"Alright, I stop".to_string()));
    }
}
