//! `volition-agent` – the agent's window on the world.
//!
//! The desire-execution engine never talks to a robot or an ontology server
//! directly; it consumes the two trait seams defined here.
//!
//! # Modules
//!
//! - [`knowledge`] – [`KnowledgeStore`][knowledge::KnowledgeStore]:
//!   pattern-based relation lookup, direct classification, and the one
//!   append-only episodic write the engine performs.
//! - [`capability`] – [`CapabilitySurface`][capability::CapabilitySurface]:
//!   every primitive the robot can perform (locomotion, manipulation,
//!   perception, speech), each a blocking call returning a success flag plus
//!   diagnostic payload.
//! - [`agent`] – [`Agent`][agent::Agent]: a cheaply clonable bundle of the
//!   two handles plus the agent's own identifier in the knowledge store.
//! - [`sim`] – [`InMemoryKnowledge`][sim::InMemoryKnowledge] and
//!   [`SimCapabilities`][sim::SimCapabilities]: in-process substitutes that
//!   record every call and return scriptable outcomes, so the full engine
//!   runs in headless tests and CI pipelines without hardware.

pub mod agent;
pub mod capability;
pub mod knowledge;
pub mod sim;

pub use agent::Agent;
pub use capability::CapabilitySurface;
pub use knowledge::{KnowledgeStore, Pattern, relations};
pub use sim::{CapabilityCall, InMemoryKnowledge, SimCapabilities};
