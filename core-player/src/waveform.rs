//! # Waveform Seek Controller
//!
//! Maps a continuous drag gesture over a rendered amplitude sequence to a
//! single seek request, with an optimistic local animation decoupled from the
//! engine's confirmed position.
//!
//! Everything here is pure state: the scrub controller is an explicit
//! `Idle -> Dragging -> Committing` machine fed wall-clock instants by the
//! caller, so it is independent of any animation primitive and fully
//! deterministic under test.

use std::time::{Duration, Instant};

/// Tween length for easing the displayed value toward confirmed progress.
pub const SCRUB_EASE: Duration = Duration::from_millis(200);

/// Floor for amplitude normalization; keeps silent or empty sequences from
/// dividing by zero.
const MIN_AMPLITUDE: f32 = 0.01;

/// Bar geometry for the rendered waveform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformConfig {
    pub bar_width: f32,
    pub bar_gap: f32,
    pub min_bar_height: f32,
    pub max_bar_height: f32,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            bar_width: 3.0,
            bar_gap: 2.0,
            min_bar_height: 5.0,
            max_bar_height: 50.0,
        }
    }
}

/// Rendered bars: a height per bar plus the cumulative time threshold at
/// which each bar counts as played.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformBars {
    heights: Vec<f32>,
    thresholds: Vec<f64>,
}

impl WaveformBars {
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Rendered height of bar `index`.
    pub fn height(&self, index: usize) -> f32 {
        self.heights[index]
    }

    /// Seconds of progress at which bar `index` flips to the played color.
    pub fn threshold(&self, index: usize) -> f64 {
        self.thresholds[index]
    }

    /// Pure coloring predicate, recomputed per frame without extra state.
    pub fn is_played(&self, index: usize, drag_value: f64) -> bool {
        drag_value >= self.thresholds[index]
    }
}

/// Number of bars that fit the rendered width.
fn fitted_bar_count(width: f32, config: &WaveformConfig) -> usize {
    let slot = config.bar_width + config.bar_gap;
    if slot <= 0.0 || width <= 0.0 {
        return 1;
    }
    ((width / slot).floor() as usize).max(1)
}

/// Build the bar set for one amplitude sequence.
///
/// Downsamples by nearest-index selection when the sequence is longer than
/// the fitted bar count; never upsamples.
pub fn build_bars(
    amplitudes: &[f32],
    width: f32,
    max_duration: f64,
    config: &WaveformConfig,
) -> WaveformBars {
    if amplitudes.is_empty() {
        return WaveformBars {
            heights: Vec::new(),
            thresholds: Vec::new(),
        };
    }

    let bar_count = fitted_bar_count(width, config).min(amplitudes.len());
    let sampled: Vec<f32> = if bar_count >= amplitudes.len() {
        amplitudes.to_vec()
    } else {
        let step = amplitudes.len() as f64 / bar_count as f64;
        (0..bar_count)
            .map(|i| {
                let index = ((i as f64 * step).floor() as usize).min(amplitudes.len() - 1);
                amplitudes[index]
            })
            .collect()
    };

    let max_amplitude = sampled
        .iter()
        .fold(MIN_AMPLITUDE, |acc, &a| if a > acc { a } else { acc });

    let span = config.max_bar_height - config.min_bar_height;
    let count = sampled.len();
    let heights = sampled
        .iter()
        .map(|&a| config.min_bar_height + (a / max_amplitude) * span)
        .collect();
    let thresholds = (0..count)
        .map(|i| ((i + 1) as f64 / count as f64) * max_duration)
        .collect();

    WaveformBars {
        heights,
        thresholds,
    }
}

/// Cubic ease-in-out over `t` in `[0, 1]`.
fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Scrub gesture phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrubPhase {
    /// No gesture; displayed value eases toward confirmed progress.
    Idle,
    /// Finger down; displayed value tracks the gesture directly.
    Dragging,
    /// Gesture released; displayed value holds the committed position until
    /// the next confirmed progress tick arrives.
    Committing,
}

/// Maps drag coordinates to seek positions and animates the displayed
/// progress between confirmed engine positions.
#[derive(Debug, Clone)]
pub struct SeekController {
    width: f32,
    max_duration: f64,
    phase: ScrubPhase,
    drag_value: f64,
    tween_from: f64,
    tween_to: f64,
    tween_start: Option<Instant>,
}

impl SeekController {
    /// `width` is the rendered waveform width in pixels; `max_duration` the
    /// track duration in seconds.
    pub fn new(width: f32, max_duration: f64) -> Self {
        Self {
            width,
            max_duration,
            phase: ScrubPhase::Idle,
            drag_value: 0.0,
            tween_from: 0.0,
            tween_to: 0.0,
            tween_start: None,
        }
    }

    pub fn phase(&self) -> ScrubPhase {
        self.phase
    }

    /// Feed a confirmed progress value (seconds). Ignored while dragging;
    /// ends the committing phase; otherwise retargets the ease tween.
    pub fn sync_progress(&mut self, progress: f64, now: Instant) {
        match self.phase {
            ScrubPhase::Dragging => {}
            ScrubPhase::Committing => {
                self.phase = ScrubPhase::Idle;
                self.start_tween(self.drag_value, progress, now);
            }
            ScrubPhase::Idle => {
                let from = self.displayed(now);
                self.start_tween(from, progress, now);
            }
        }
    }

    /// Begin a drag gesture at `now`; the displayed value freezes where the
    /// animation currently is.
    pub fn begin_drag(&mut self, now: Instant) {
        self.drag_value = self.displayed(now);
        self.phase = ScrubPhase::Dragging;
    }

    /// Drive the drag from a gesture x-coordinate. Clamped into the rendered
    /// width, then mapped linearly onto `[0, max_duration]`. No seek is
    /// issued here, so intermediate movement can never cause a seek storm.
    pub fn drag_to(&mut self, x: f32) {
        if self.phase != ScrubPhase::Dragging || self.width <= 0.0 {
            return;
        }
        let clamped = x.clamp(0.0, self.width);
        self.drag_value = (clamped / self.width) as f64 * self.max_duration;
    }

    /// Release the gesture. Returns the single position (seconds) to pass to
    /// `seek_to`; `None` when no drag was in progress.
    pub fn release(&mut self) -> Option<f64> {
        if self.phase != ScrubPhase::Dragging {
            return None;
        }
        self.phase = ScrubPhase::Committing;
        Some(self.drag_value)
    }

    /// Value to render at `now`: the gesture position while dragging or
    /// committing, otherwise the eased tween toward confirmed progress.
    pub fn displayed(&self, now: Instant) -> f64 {
        match self.phase {
            ScrubPhase::Dragging | ScrubPhase::Committing => self.drag_value,
            ScrubPhase::Idle => match self.tween_start {
                None => self.tween_to,
                Some(start) => {
                    let elapsed = now.saturating_duration_since(start);
                    if elapsed >= SCRUB_EASE {
                        self.tween_to
                    } else {
                        let t = elapsed.as_secs_f64() / SCRUB_EASE.as_secs_f64();
                        self.tween_from + (self.tween_to - self.tween_from) * ease_in_out(t)
                    }
                }
            },
        }
    }

    fn start_tween(&mut self, from: f64, to: f64, now: Instant) {
        self.tween_from = from;
        self.tween_to = to;
        self.tween_start = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_count_fits_width() {
        let config = WaveformConfig::default(); // slot = 5px
        let bars = build_bars(&[1.0; 500], 200.0, 100.0, &config);
        assert_eq!(bars.len(), 40);
    }

    #[test]
    fn never_upsamples() {
        let config = WaveformConfig::default();
        let bars = build_bars(&[1.0; 10], 1000.0, 100.0, &config);
        assert_eq!(bars.len(), 10);
    }

    #[test]
    fn downsample_uses_nearest_index_stride() {
        let config = WaveformConfig {
            bar_width: 3.0,
            bar_gap: 2.0,
            min_bar_height: 0.0,
            max_bar_height: 1.0,
        };
        // 8 samples into 4 bars: stride 2 selects indices 0, 2, 4, 6.
        let data = [0.1, 0.9, 0.2, 0.9, 0.3, 0.9, 0.4, 0.9];
        let bars = build_bars(&data, 20.0, 100.0, &config);
        assert_eq!(bars.len(), 4);
        let max = 0.4f32;
        for (i, expected) in [0.1f32, 0.2, 0.3, 0.4].iter().enumerate() {
            let got = bars.height(i);
            assert!((got - expected / max).abs() < 1e-6, "bar {i}: {got}");
        }
    }

    #[test]
    fn silent_sequence_normalizes_against_epsilon() {
        let config = WaveformConfig::default();
        let bars = build_bars(&[0.0; 4], 20.0, 100.0, &config);
        for i in 0..bars.len() {
            assert_eq!(bars.height(i), config.min_bar_height);
        }
    }

    #[test]
    fn empty_sequence_yields_no_bars() {
        let bars = build_bars(&[], 200.0, 100.0, &WaveformConfig::default());
        assert!(bars.is_empty());
    }

    #[test]
    fn coloring_splits_at_threshold() {
        let config = WaveformConfig::default();
        let bars = build_bars(&[1.0; 4], 20.0, 100.0, &config);
        // Thresholds: 25, 50, 75, 100 seconds.
        assert!(bars.is_played(0, 30.0));
        assert!(!bars.is_played(1, 30.0));
        assert!(bars.is_played(1, 50.0)); // inclusive boundary
        assert!(!bars.is_played(3, 99.9));
    }

    #[test]
    fn drag_is_clamped_to_width() {
        let now = Instant::now();
        let mut scrub = SeekController::new(300.0, 120.0);
        scrub.begin_drag(now);
        scrub.drag_to(-50.0);
        assert_eq!(scrub.displayed(now), 0.0);
        scrub.drag_to(450.0);
        assert_eq!(scrub.displayed(now), 120.0);
        scrub.drag_to(150.0);
        assert!((scrub.displayed(now) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn commit_only_on_release() {
        let now = Instant::now();
        let mut scrub = SeekController::new(300.0, 120.0);
        assert_eq!(scrub.release(), None);

        scrub.begin_drag(now);
        scrub.drag_to(75.0);
        scrub.drag_to(150.0);
        let committed = scrub.release();
        assert_eq!(committed, Some(60.0));
        assert_eq!(scrub.phase(), ScrubPhase::Committing);
        // Committing holds the optimistic value...
        assert_eq!(scrub.displayed(now), 60.0);
        // ...until a confirmed tick arrives.
        scrub.sync_progress(61.0, now);
        assert_eq!(scrub.phase(), ScrubPhase::Idle);
    }

    #[test]
    fn tween_reaches_target_after_ease_duration() {
        let start = Instant::now();
        let mut scrub = SeekController::new(300.0, 120.0);
        scrub.sync_progress(10.0, start);
        // Midpoint of a cubic ease-in-out is exactly halfway.
        let mid = scrub.displayed(start + SCRUB_EASE / 2);
        assert!((mid - 5.0).abs() < 1e-9);
        assert_eq!(scrub.displayed(start + SCRUB_EASE), 10.0);
        assert_eq!(scrub.displayed(start + SCRUB_EASE * 3), 10.0);
    }

    #[test]
    fn progress_ignored_while_dragging() {
        let now = Instant::now();
        let mut scrub = SeekController::new(300.0, 120.0);
        scrub.begin_drag(now);
        scrub.drag_to(150.0);
        scrub.sync_progress(5.0, now);
        assert_eq!(scrub.phase(), ScrubPhase::Dragging);
        assert!((scrub.displayed(now) - 60.0).abs() < 1e-9);
    }
}
