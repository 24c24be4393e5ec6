pub const DEFAULT_DURATION_MS: f64 = 1_000.0;
pub const HEADER_OFFSET_PX: f64 = 80.0;
pub const BACK_TO_TOP_MS: f64 = 800.0;
pub const TOP_SECTION: &str = "home";

/// Quadratic ease-in-out: `t` elapsed, `b` start, `c` change, `d` duration.
pub fn ease_in_out_quad(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if d <= 0.0 {
        return b + c;
    }

    let mut t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t * t + b;
    }
    t -= 1.0;
    -c / 2.0 * (t * (t - 2.0) - 1.0) + b
}

/// The section id behind an in-page link, or `None` for bare `#` and
/// anything that is not a fragment link.
pub fn anchor_target(href: &str) -> Option<&str> {
    let id = href.strip_prefix('#')?;
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

pub fn scroll_destination(section_top: f64, header_offset: f64) -> f64 {
    (section_top - header_offset).max(0.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollAnimation {
    start: f64,
    distance: f64,
    duration_ms: f64,
}

impl ScrollAnimation {
    pub fn new(from: f64, to: f64, duration_ms: f64) -> Self {
        Self {
            start: from,
            distance: to - from,
            duration_ms,
        }
    }

    pub fn destination(&self) -> f64 {
        self.start + self.distance
    }

    /// Position after `elapsed_ms`; clamps at the destination.
    pub fn position_at(&self, elapsed_ms: f64) -> f64 {
        if self.is_done(elapsed_ms) {
            return self.destination();
        }
        ease_in_out_quad(elapsed_ms.max(0.0), self.start, self.distance, self.duration_ms)
    }

    pub fn is_done(&self, elapsed_ms: f64) -> bool {
        elapsed_ms >= self.duration_ms
    }
}
