//! [`EngineConfig`] – tunables for the desire state machines.
//!
//! Plain data with sensible defaults; an outer control process can
//! deserialize it from its own configuration file and hand it to
//! [`Supervisor::new`][crate::supervisor::Supervisor::new].

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables shared by every desire plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How close to stop from a target that is an object or a human, in
    /// metres.  Locations are moved onto, not up to.
    pub object_stop_distance: f32,
    /// How long to give an expected human to show up before aborting to the
    /// home location.
    pub human_wait: Duration,
    /// Maximum age of a perception sighting for the object to count as
    /// currently seen.
    pub sighting_freshness: Duration,
    /// Perception settling time after each gaze move during a visual search.
    pub search_gaze_wait: Duration,
    /// Shorter settle after recentering the gaze between sweep cycles.
    pub search_recenter_wait: Duration,
    /// Cumulative hand-over distance after which the transit posture is
    /// safe to assume again.
    pub handover_posture_threshold: f32,
    /// Forward nudge to substitute when docking fails, in metres.
    pub dock_fallback_translation: f32,
    /// Reverse translation that undocks after a successful manipulation.
    pub undock_translation: f32,
    /// Larger reverse translation used when giving up mid-approach.
    pub giveup_translation: f32,
    /// Named location the agent retreats to when a plan aborts.
    pub home_location: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            object_stop_distance: 1.0,
            human_wait: Duration::from_secs(5),
            sighting_freshness: Duration::from_secs(2),
            search_gaze_wait: Duration::from_secs(2),
            search_recenter_wait: Duration::from_secs(1),
            handover_posture_threshold: 0.5,
            dock_fallback_translation: 0.3,
            undock_translation: -0.2,
            giveup_translation: -0.3,
            home_location: "BASE".to_string(),
        }
    }
}
