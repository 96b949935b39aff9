use super::types::{Phase, SurfaceTag};

/// Terminal game consequence of a single contact pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContactOutcome {
    FatalHit,
    GoalReached,
}

/// Classify one started contact pair by surface tag. Only head contacts
/// carry an outcome; pair order does not matter.
pub(crate) fn classify_pair(a: SurfaceTag, b: SurfaceTag) -> Option<ContactOutcome> {
    let other = match (a, b) {
        (SurfaceTag::Head, other) => other,
        (other, SurfaceTag::Head) => other,
        _ => return None,
    };
    match other {
        SurfaceTag::Spike => Some(ContactOutcome::FatalHit),
        SurfaceTag::Goal => Some(ContactOutcome::GoalReached),
        SurfaceTag::Head | SurfaceTag::Limb | SurfaceTag::Terrain => None,
    }
}

/// Fold an outcome into the phase. The first terminal outcome wins; later
/// ones are ignored.
pub(crate) fn apply_outcome(phase: Phase, outcome: ContactOutcome) -> Phase {
    if phase.is_terminal() {
        return phase;
    }
    match outcome {
        ContactOutcome::FatalHit => Phase::Lost,
        ContactOutcome::GoalReached => Phase::Won,
    }
}
