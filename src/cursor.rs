// src/cursor.rs - Fingertip to screen mapping with exponential smoothing
use nalgebra::Vector2;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CursorState {
    pub last_raw: Option<Vector2<f64>>,
    pub smoothed: Option<Vector2<f64>>,
}

#[derive(Debug, Clone)]
pub struct CursorMapper {
    screen: Vector2<f64>,
    mirror_x: bool,
    alpha: f64,
    state: CursorState,
}

impl CursorMapper {
    /// `alpha` weights the previous smoothed position; validated by the config.
    pub fn new(screen_width: f64, screen_height: f64, mirror_x: bool, alpha: f64) -> Self {
        Self {
            screen: Vector2::new(screen_width, screen_height),
            mirror_x,
            alpha,
            state: CursorState::default(),
        }
    }

    /// Changes geometry and smoothing while keeping the accumulated position.
    pub fn reconfigure(&mut self, screen_width: f64, screen_height: f64, mirror_x: bool, alpha: f64) {
        self.screen = Vector2::new(screen_width, screen_height);
        self.mirror_x = mirror_x;
        self.alpha = alpha;
    }

    pub fn state(&self) -> &CursorState {
        &self.state
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Linear scale from normalized camera space to screen pixels.
    pub fn map(&self, normalized: Vector2<f64>) -> Vector2<f64> {
        let x = if self.mirror_x { 1.0 - normalized.x } else { normalized.x };
        Vector2::new(
            x.clamp(0.0, 1.0) * self.screen.x,
            normalized.y.clamp(0.0, 1.0) * self.screen.y,
        )
    }

    /// `smoothed = alpha * previous + (1 - alpha) * raw`; the first sample
    /// passes through.
    pub fn smooth(&mut self, raw: Vector2<f64>) -> Vector2<f64> {
        let next = match self.state.smoothed {
            Some(previous) => previous * self.alpha + raw * (1.0 - self.alpha),
            None => raw,
        };
        self.state.last_raw = Some(raw);
        self.state.smoothed = Some(next);
        next
    }

    pub fn update(&mut self, normalized: Vector2<f64>) -> Vector2<f64> {
        let raw = self.map(normalized);
        self.smooth(raw)
    }

    pub fn reset(&mut self) {
        self.state = CursorState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_segment(p: Vector2<f64>, a: Vector2<f64>, b: Vector2<f64>) -> bool {
        let ab = b - a;
        let ap = p - a;
        let cross = ab.x * ap.y - ab.y * ap.x;
        let t = if ab.norm() > 0.0 { ap.dot(&ab) / ab.norm_squared() } else { 0.0 };
        cross.abs() < 1e-6 && (-1e-9..=1.0 + 1e-9).contains(&t)
    }

    #[test]
    fn maps_to_screen_resolution() {
        let mapper = CursorMapper::new(1920.0, 1080.0, false, 0.5);
        let p = mapper.map(Vector2::new(0.5, 0.25));
        assert_eq!(p, Vector2::new(960.0, 270.0));
    }

    #[test]
    fn mirror_flips_x_only() {
        let mapper = CursorMapper::new(1000.0, 500.0, true, 0.5);
        let p = mapper.map(Vector2::new(0.2, 0.2));
        assert!((p.x - 800.0).abs() < 1e-9);
        assert!((p.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_frame_clamps_to_screen() {
        let mapper = CursorMapper::new(1000.0, 500.0, false, 0.5);
        assert_eq!(mapper.map(Vector2::new(-0.3, 1.7)), Vector2::new(0.0, 500.0));
    }

    #[test]
    fn first_sample_passes_through() {
        let mut mapper = CursorMapper::new(1000.0, 1000.0, false, 0.8);
        assert_eq!(mapper.smooth(Vector2::new(10.0, 20.0)), Vector2::new(10.0, 20.0));
    }

    #[test]
    fn smoothed_output_never_overshoots() {
        let mut mapper = CursorMapper::new(1000.0, 1000.0, false, 0.7);
        let raws = [
            Vector2::new(0.0, 0.0),
            Vector2::new(100.0, 40.0),
            Vector2::new(-30.0, 250.0),
            Vector2::new(500.0, 500.0),
            Vector2::new(499.0, 501.0),
            Vector2::new(0.0, 900.0),
        ];
        let mut previous = mapper.smooth(raws[0]);
        for raw in &raws[1..] {
            let next = mapper.smooth(*raw);
            assert!(on_segment(next, previous, *raw), "{:?} not between {:?} and {:?}", next, previous, raw);
            assert!((next - previous).norm() <= (raw - previous).norm() + 1e-9);
            previous = next;
        }
    }

    #[test]
    fn zero_alpha_tracks_raw() {
        let mut mapper = CursorMapper::new(1000.0, 1000.0, false, 0.0);
        mapper.smooth(Vector2::new(0.0, 0.0));
        assert_eq!(mapper.smooth(Vector2::new(40.0, 60.0)), Vector2::new(40.0, 60.0));
    }

    #[test]
    fn reconfigure_keeps_state() {
        let mut mapper = CursorMapper::new(1000.0, 1000.0, false, 0.5);
        mapper.smooth(Vector2::new(100.0, 100.0));
        mapper.reconfigure(2000.0, 1000.0, true, 0.9);
        assert_eq!(mapper.state().smoothed, Some(Vector2::new(100.0, 100.0)));
        assert_eq!(mapper.alpha(), 0.9);
    }

    #[test]
    fn reset_clears_history() {
        let mut mapper = CursorMapper::new(1000.0, 1000.0, false, 0.5);
        mapper.update(Vector2::new(0.1, 0.1));
        mapper.reset();
        assert_eq!(mapper.state(), &CursorState::default());
    }
}
