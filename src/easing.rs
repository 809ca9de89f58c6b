use serde::{Deserialize, Serialize};

/// Named easing curves that can be selected from config or the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EasingKind {
    /// Symmetric quadratic ease-in-out
    QuadInOut,
    /// Cubic Bezier with control points (0.67, 0.03) and (0.29, 0.99)
    CubicBezier,
}

/// How an easing treats inputs outside its canonical [0, 1] domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EasingDomain {
    /// Clamp the input to [0, 1]; output stays in the curve's range
    Clamp,
    /// Evaluate past the ends: polynomials unclamped, Bezier curves
    /// continued linearly along their end tangents
    #[default]
    Extrapolate,
}

const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 32;
const EPSILON: f32 = 1e-6;

/// CSS-style cubic Bezier timing curve through (0, 0) and (1, 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    pub const LOOP: CubicBezier = CubicBezier::new(0.67, 0.03, 0.29, 0.99);

    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    // Polynomial coefficients of one axis: ((a * s + b) * s + c) * s
    fn coefficients(p1: f32, p2: f32) -> (f32, f32, f32) {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        (a, b, c)
    }

    fn sample(p1: f32, p2: f32, s: f32) -> f32 {
        let (a, b, c) = Self::coefficients(p1, p2);
        ((a * s + b) * s + c) * s
    }

    fn slope(p1: f32, p2: f32, s: f32) -> f32 {
        let (a, b, c) = Self::coefficients(p1, p2);
        (3.0 * a * s + 2.0 * b) * s + c
    }

    /// Curve parameter `s` whose x coordinate is `x`, for x in [0, 1]
    fn solve_parameter(&self, x: f32) -> f32 {
        let mut s = x;
        for _ in 0..NEWTON_ITERATIONS {
            let error = Self::sample(self.x1, self.x2, s) - x;
            if error.abs() < EPSILON {
                return s;
            }
            let slope = Self::slope(self.x1, self.x2, s);
            if slope.abs() < EPSILON {
                break;
            }
            s -= error / slope;
        }

        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        s = x;
        for _ in 0..BISECTION_ITERATIONS {
            let sx = Self::sample(self.x1, self.x2, s);
            if (sx - x).abs() < EPSILON {
                break;
            }
            if sx < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) * 0.5;
        }
        s
    }

    /// Evaluate for x in [0, 1]; inputs outside are clamped
    pub fn eval(&self, x: f32) -> f32 {
        let x = x.clamp(0.0, 1.0);
        if x == 0.0 || x == 1.0 {
            return x;
        }
        Self::sample(self.y1, self.y2, self.solve_parameter(x))
    }

    /// dy/dx at x = 0
    pub fn start_slope(&self) -> f32 {
        if self.x1 > EPSILON {
            self.y1 / self.x1
        } else if self.x2 > EPSILON {
            self.y2 / self.x2
        } else {
            0.0
        }
    }

    /// dy/dx at x = 1
    pub fn end_slope(&self) -> f32 {
        if self.x2 < 1.0 - EPSILON {
            (1.0 - self.y2) / (1.0 - self.x2)
        } else if self.x1 < 1.0 - EPSILON {
            (1.0 - self.y1) / (1.0 - self.x1)
        } else {
            0.0
        }
    }

    fn extrapolate(&self, x: f32) -> f32 {
        if x < 0.0 {
            self.start_slope() * x
        } else if x > 1.0 {
            1.0 + self.end_slope() * (x - 1.0)
        } else {
            self.eval(x)
        }
    }
}

/// Quadratic ease-in-out evaluated as the raw piecewise polynomial
fn quad_in_out(t: f32) -> f32 {
    let t = t / 0.5;
    if t < 1.0 {
        0.5 * t * t
    } else {
        let t = t - 1.0;
        -0.5 * (t * (t - 2.0) - 1.0)
    }
}

/// An easing curve paired with its out-of-domain policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Easing {
    curve: Curve,
    domain: EasingDomain,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Curve {
    QuadInOut,
    Bezier(CubicBezier),
}

impl Easing {
    pub fn new(kind: EasingKind, domain: EasingDomain) -> Self {
        let curve = match kind {
            EasingKind::QuadInOut => Curve::QuadInOut,
            EasingKind::CubicBezier => Curve::Bezier(CubicBezier::LOOP),
        };
        Self { curve, domain }
    }

    pub fn apply(&self, t: f32) -> f32 {
        match (self.curve, self.domain) {
            (Curve::QuadInOut, EasingDomain::Clamp) => quad_in_out(t.clamp(0.0, 1.0)),
            (Curve::QuadInOut, EasingDomain::Extrapolate) => quad_in_out(t),
            (Curve::Bezier(bezier), EasingDomain::Clamp) => bezier.eval(t),
            (Curve::Bezier(bezier), EasingDomain::Extrapolate) => bezier.extrapolate(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> impl Iterator<Item = f32> {
        (0..=400).map(|i| -2.0 + i as f32 * 0.01)
    }

    #[test]
    fn test_quad_in_out_canonical_points() {
        let ease = Easing::new(EasingKind::QuadInOut, EasingDomain::Clamp);
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(0.5), 0.5);
        assert_eq!(ease.apply(1.0), 1.0);
        assert!((ease.apply(0.25) - 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_quad_in_out_symmetry() {
        let ease = Easing::new(EasingKind::QuadInOut, EasingDomain::Clamp);
        for i in 0..=50 {
            let x = i as f32 / 100.0;
            let sum = ease.apply(0.5 - x) + ease.apply(0.5 + x);
            assert!((sum - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_clamp_bounds_output_on_loop_range() {
        for kind in [EasingKind::QuadInOut, EasingKind::CubicBezier] {
            let ease = Easing::new(kind, EasingDomain::Clamp);
            for t in samples() {
                let y = ease.apply(t);
                assert!((0.0..=1.0).contains(&y), "{:?}({}) = {}", kind, t, y);
            }
            assert_eq!(ease.apply(-2.0), 0.0);
            assert_eq!(ease.apply(2.0), 1.0);
        }
    }

    #[test]
    fn test_quad_extrapolation_at_loop_extremes() {
        let ease = Easing::new(EasingKind::QuadInOut, EasingDomain::Extrapolate);
        assert!((ease.apply(2.0) - -1.0).abs() < 1e-6);
        assert!((ease.apply(-2.0) - 8.0).abs() < 1e-6);
        // Matches the clamped curve inside the domain
        assert!((ease.apply(0.3) - quad_in_out(0.3)).abs() < 1e-6);
    }

    #[test]
    fn test_bezier_extrapolation_is_continuous_at_ends() {
        let ease = Easing::new(EasingKind::CubicBezier, EasingDomain::Extrapolate);
        assert!((ease.apply(1.0001) - ease.apply(0.9999)).abs() < 1e-3);
        assert!((ease.apply(0.0001) - ease.apply(-0.0001)).abs() < 1e-3);
        let bezier = CubicBezier::LOOP;
        let expected = 1.0 + bezier.end_slope();
        assert!((ease.apply(2.0) - expected).abs() < 1e-6);
        assert!((ease.apply(-2.0) - -2.0 * bezier.start_slope()).abs() < 1e-6);
    }

    #[test]
    fn test_bezier_endpoints() {
        let bezier = CubicBezier::LOOP;
        assert_eq!(bezier.eval(0.0), 0.0);
        assert_eq!(bezier.eval(1.0), 1.0);
    }

    #[test]
    fn test_bezier_monotonic() {
        let bezier = CubicBezier::LOOP;
        let mut previous = 0.0;
        for i in 1..=1000 {
            let y = bezier.eval(i as f32 / 1000.0);
            assert!(y >= previous - 1e-5, "not monotonic at {}", i);
            previous = y;
        }
    }

    #[test]
    fn test_bezier_linear_control_points_is_identity() {
        let linear = CubicBezier::new(1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0);
        for i in 0..=20 {
            let x = i as f32 / 20.0;
            assert!((linear.eval(x) - x).abs() < 1e-4);
        }
    }

    #[test]
    fn test_bezier_symmetric_curve_midpoint() {
        let ease_in_out = CubicBezier::new(0.42, 0.0, 0.58, 1.0);
        assert!((ease_in_out.eval(0.5) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_default_domain_matches_unclamped_quad() {
        assert_eq!(EasingDomain::default(), EasingDomain::Extrapolate);
        let ease = Easing::new(EasingKind::QuadInOut, EasingDomain::default());
        assert!((ease.apply(-2.0) - 8.0).abs() < 1e-6);
        assert!((ease.apply(2.0) - -1.0).abs() < 1e-6);
    }

    #[test]
    fn test_easing_kind_serde_names() {
        let kind: EasingKind = serde_json::from_str("\"cubic-bezier\"").unwrap();
        assert_eq!(kind, EasingKind::CubicBezier);
        let domain: EasingDomain = serde_json::from_str("\"extrapolate\"").unwrap();
        assert_eq!(domain, EasingDomain::Extrapolate);
    }
}
