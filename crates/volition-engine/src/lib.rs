//! The desire-execution engine: turns declarative goals into sequences of
//! capability calls, one desire at a time.
//!
//! # Modules
//!
//! - [`supervisor`]: serialises execution and arbitrates priority preemption.
//! - [`desire`]: the desire contract and shared resolution logic.
//! - [`factory`]: classify a situation, build the matching desire.
//! - [`variants`]: the built-in desire state machines.
//! - [`config`]: engine tunables.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use volition_agent::{Agent, sim::{InMemoryKnowledge, SimCapabilities}};
//! use volition_engine::{DesireRegistry, EngineConfig, Supervisor};
//! use volition_types::Situation;
//!
//! let knowledge = Arc::new(
//!     InMemoryKnowledge::new()
//!         .with_fact("HERAKLES", "desires", "sit_1")
//!         .with_fact("sit_1", "performedBy", "myself")
//!         .with_class("sit_1", "Stop"),
//! );
//! let agent = Agent::new(knowledge, Arc::new(SimCapabilities::new()));
//!
//! let registry = DesireRegistry::with_builtins();
//! let desire = registry.resolve(&Situation::new("sit_1"), &agent).unwrap();
//!
//! let supervisor = Supervisor::new(agent, EngineConfig::default());
//! let outcome = supervisor.perform(desire.as_ref()).unwrap();
//! assert!(!outcome.is_preempted());
//! ```

pub mod config;
pub mod desire;
pub mod factory;
pub mod supervisor;
pub mod variants;

#[cfg(test)]
mod testutil;

pub use config::EngineConfig;
pub use desire::{Desire, DesireBase};
pub use factory::{DesireConstructor, DesireRegistry};
pub use supervisor::{ExecutionContext, Supervisor};
pub use variants::{Bring, Display, Get, Give, Hide, Look, Move, Pick, Put, Show, Stop, Test};
