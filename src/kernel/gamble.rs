use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GambleOutcome {
    Won,
    Lost,
}

impl GambleOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GambleOutcome::Won)
    }
}

/// Pure 50/50 draw: a roll of 1 wins, 2 loses.
pub fn resolve_gamble<R: Rng + ?Sized>(rng: &mut R) -> GambleOutcome {
    match rng.gen_range(1..=2) {
        1 => GambleOutcome::Won,
        _ => GambleOutcome::Lost,
    }
}
