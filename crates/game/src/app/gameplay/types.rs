/// Coarse game status. Transitions are one-way except the hard reset,
/// which rebuilds the scene from scratch. Modeling the terminal states as
/// enum variants makes "at most one of lost/won" structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    NotStarted,
    Running,
    Lost,
    Won,
}

impl Phase {
    pub(crate) fn is_terminal(self) -> bool {
        matches!(self, Phase::Lost | Phase::Won)
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Phase::NotStarted => "not started",
            Phase::Running => "running",
            Phase::Lost => "lost",
            Phase::Won => "won",
        }
    }
}

/// Semantic tag assigned to every collider at construction. Outcome
/// classification works on tags, never on collider identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SurfaceTag {
    /// The character's head; the only body part hazards and goals react to.
    Head,
    /// Any other character part.
    Limb,
    /// Ground and platforms.
    Terrain,
    Spike,
    Goal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_lost_and_won_are_terminal() {
        assert!(!Phase::NotStarted.is_terminal());
        assert!(!Phase::Running.is_terminal());
        assert!(Phase::Lost.is_terminal());
        assert!(Phase::Won.is_terminal());
    }

    #[test]
    fn labels_are_distinct() {
        let labels = [
            Phase::NotStarted.label(),
            Phase::Running.label(),
            Phase::Lost.label(),
            Phase::Won.label(),
        ];
        for (index, label) in labels.iter().enumerate() {
            assert!(!label.is_empty());
            for other in labels.iter().skip(index + 1) {
                assert_ne!(label, other);
            }
        }
    }
}
