//! Enemy perception.
//!
//! Each tick a non-stunned enemy looks at the nearest living player. If
//! that player is within vision range and the sight line is clear, the
//! enemy chases it directly and refreshes its memory. Otherwise it heads
//! for a remembered sighting while the memory is fresh, and idles once it
//! has expired.

use glam::Vec2;
use walkmap::{line_of_sight, Walkability};

use crate::config::EnemySpec;
use crate::entity::{ActorView, EnemyBrain, EnemyState, Sighting};
use crate::geom::within_radius;
use crate::Millis;

/// What an enemy decided this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perception {
    /// New perception state
    pub state: EnemyState,
    /// Point to steer toward, if any
    pub goal: Option<Vec2>,
    /// The player in sight, when chasing visibly
    pub sighted: Option<ActorView>,
}

impl Perception {
    /// The brain after applying this decision at `now`.
    #[must_use]
    pub fn apply(&self, brain: &EnemyBrain, now: Millis) -> EnemyBrain {
        let mut next = *brain;
        next.state = self.state;
        if let Some(target) = self.sighted {
            next.last_known = Some(Sighting {
                position: target.center(),
                seen_at: now,
            });
        }
        next
    }
}

/// Nearest living player by squared distance; the first one wins ties.
#[must_use]
pub fn nearest_player(from: Vec2, players: &[ActorView]) -> Option<ActorView> {
    players
        .iter()
        .filter(|p| p.alive && p.side.is_some())
        .min_by(|a, b| {
            from.distance_squared(a.center())
                .total_cmp(&from.distance_squared(b.center()))
        })
        .copied()
}

/// Decides an enemy's state and goal for this tick.
///
/// # Arguments
///
/// * `surface` - Walkability surface for the sight trace
/// * `brain` - The enemy's state before this tick
/// * `center` - The enemy's centre
/// * `players` - Snapshot of the players
/// * `spec` - Enemy tuning (vision range, memory)
/// * `now` - Tick timestamp
#[must_use]
pub fn perceive<S: Walkability + ?Sized>(
    surface: &S,
    brain: &EnemyBrain,
    center: Vec2,
    players: &[ActorView],
    spec: &EnemySpec,
    now: Millis,
) -> Perception {
    if let Some(target) = nearest_player(center, players) {
        let visible = within_radius(center, target.center(), spec.vision_range)
            && line_of_sight(surface, center, target.center());
        if visible {
            return Perception {
                state: EnemyState::ChasingVisible,
                goal: Some(target.center()),
                sighted: Some(target),
            };
        }
    }

    match brain.memory(now, spec.memory_ms) {
        Some(position) => Perception {
            state: EnemyState::ChasingMemory,
            goal: Some(position),
            sighted: None,
        },
        None => Perception {
            state: EnemyState::Idle,
            goal: None,
            sighted: None,
        },
    }
}
