use rand::Rng;

pub const PIECE_COUNT: usize = 30;
pub const PALETTE: [&str; 5] = ["#FF6B35", "#00B4D8", "#0A2463", "#FF9E00", "#10b981"];
const MIN_FALL_MS: u64 = 1_000;
const FALL_SPREAD_MS: u64 = 1_000;

#[derive(Clone, Debug, PartialEq)]
pub struct ConfettiPiece {
    pub color: &'static str,
    pub left_percent: f64,
    pub end_rotation_deg: f64,
    pub duration_ms: u64,
}

impl ConfettiPiece {
    pub fn style(&self, fall_distance_px: f64) -> String {
        format!(
            "background-color: {}; left: {:.2}%; --fall-distance: {:.0}px; --end-rotation: {:.0}deg; animation-duration: {}ms;",
            self.color, self.left_percent, fall_distance_px, self.end_rotation_deg, self.duration_ms
        )
    }
}

pub fn burst<R: Rng>(rng: &mut R, count: usize) -> Vec<ConfettiPiece> {
    (0..count)
        .map(|_| ConfettiPiece {
            color: PALETTE[rng.gen_range(0..PALETTE.len())],
            left_percent: rng.gen_range(0.0..100.0),
            end_rotation_deg: rng.gen_range(0.0..360.0),
            duration_ms: MIN_FALL_MS + rng.gen_range(0..FALL_SPREAD_MS),
        })
        .collect()
}

/// How long the last piece of a burst keeps falling.
pub fn burst_lifetime_ms(pieces: &[ConfettiPiece]) -> u64 {
    pieces
        .iter()
        .map(|piece| piece.duration_ms)
        .max()
        .unwrap_or(0)
}
