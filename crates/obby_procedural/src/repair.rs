//! # Reachability Repair
//!
//! Always-applied safety pass over a finished section. It walks the jump
//! path in the same order the validator does and drops a relay platform
//! at the midpoint of any pair that is too far apart or too high, until
//! every segment fits the movement model with a small margin.

use obby_core::movement::{allowed_gap, edge_gap, vertical_delta, MAX_JUMP_HEIGHT, SAFE_GAP_SPRINT};
use obby_core::{traversal_order, Primitive, SemanticFlags, Vec3};
use tracing::{debug, warn};

/// Slack kept below the allowed gap.
pub const GAP_MARGIN: f64 = 0.25;

/// Slack kept below the highest clearable rise.
pub const RISE_MARGIN: f64 = 1.0;

/// Relays one section may receive before the pass gives up.
pub const MAX_RELAYS: usize = 128;

/// Side length of a relay platform.
pub const RELAY_SIZE: f64 = 4.0;

/// Result of one repair pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RepairOutcome {
    /// Relays inserted.
    pub relays: usize,
    /// The relay cap was hit with violations left.
    pub exhausted: bool,
}

/// Returns true if `b` cannot be reached from `a` within the margins.
#[must_use]
pub fn needs_relay(a: &Primitive, b: &Primitive) -> bool {
    let dy = vertical_delta(a, b);
    edge_gap(a, b) > allowed_gap(SAFE_GAP_SPRINT, dy) - GAP_MARGIN || dy > MAX_JUMP_HEIGHT - RISE_MARGIN
}

fn first_violation(parts: &[Primitive]) -> Option<(usize, usize)> {
    traversal_order(parts.iter().enumerate())
        .windows(2)
        .map(|w| (w[0], w[1]))
        .find(|&(a, b)| needs_relay(&parts[a], &parts[b]))
}

fn relay_between(a: &Primitive, b: &Primitive, section: usize, serial: usize) -> Primitive {
    let stage = b.stage.or(a.stage);
    let name = match stage {
        Some(n) => format!("Stage{n}_Relay{serial}"),
        None => format!("Section{section}_Relay{serial}"),
    };
    Primitive::block(name, a.position.midpoint(b.position), Vec3::new(RELAY_SIZE, 1.0, RELAY_SIZE))
        .colored(b.color)
        .with_material(b.material)
        .flagged(SemanticFlags::BRIDGE)
        .owned_by(section, stage)
}

/// Inserts relays into `parts` until the jump path is reachable.
///
/// `parts` must hold one section's primitives. A relay is inserted just
/// before the far part of the offending pair, so ties on Z still order
/// it between the two.
pub fn enforce_reachability(parts: &mut Vec<Primitive>, section: usize) -> RepairOutcome {
    let mut outcome = RepairOutcome::default();
    while outcome.relays < MAX_RELAYS {
        let Some((a, b)) = first_violation(parts) else {
            return outcome;
        };
        let relay = relay_between(&parts[a], &parts[b], section, outcome.relays);
        debug!(
            section,
            from = %parts[a].name,
            to = %parts[b].name,
            "inserting relay platform"
        );
        parts.insert(b, relay);
        outcome.relays += 1;
    }
    if first_violation(parts).is_some() {
        outcome.exhausted = true;
        warn!(section, relays = outcome.relays, "relay cap reached with unreachable segments left");
    }
    outcome
}
