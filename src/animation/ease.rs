use crate::foundation::error::{ScrollError, ScrollResult};

/// Easing strategy applied to a normalized drive value.
///
/// Every strategy maps `0 -> 0` and `1 -> 1`. `Spring` may overshoot in
/// between when underdamped.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    #[default]
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    OutQuart,
    /// Strong deceleration; the entrance curve for reveals.
    OutQuint,
    OutExpo,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// Holds 0 at the origin and jumps to 1 for any positive drive, like
    /// CSS `step-start` away from the boundary. Used for on/off state.
    StepStart,
    /// Damped oscillator step response, squeezed onto `[0, 1]`.
    Spring {
        stiffness: f64,
        damping: f64,
        mass: f64,
    },
}

impl Ease {
    /// Physically heavy spring used for section entrances.
    pub const HEAVY_SPRING: Self = Self::Spring {
        stiffness: 50.0,
        damping: 20.0,
        mass: 1.5,
    };

    /// Slow, smooth settle used by the hero image.
    pub const CINEMATIC: Self = Self::CubicBezier {
        x1: 0.22,
        y1: 1.0,
        x2: 0.36,
        y2: 1.0,
    };

    pub fn validate(self) -> ScrollResult<()> {
        match self {
            Self::CubicBezier { x1, y1, x2, y2 } => {
                if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
                    return Err(ScrollError::validation(
                        "cubic-bezier control points must be finite",
                    ));
                }
                if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
                    return Err(ScrollError::validation(
                        "cubic-bezier x control points must lie in [0, 1]",
                    ));
                }
                Ok(())
            }
            Self::Spring {
                stiffness,
                damping,
                mass,
            } => {
                if !(stiffness > 0.0 && mass > 0.0 && damping > 0.0) {
                    return Err(ScrollError::validation(
                        "spring stiffness, damping and mass must be > 0",
                    ));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
            Self::OutQuint => 1.0 - (1.0 - t).powi(5),
            Self::OutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(t, x1, y1, x2, y2),
            Self::StepStart => {
                if t > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Spring {
                stiffness,
                damping,
                mass,
            } => spring(t, stiffness, damping, mass),
        }
    }
}

fn cubic_bezier(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if t <= 0.0 || t >= 1.0 {
        return t;
    }

    // B(s) = 3(1-s)^2 s p1 + 3(1-s) s^2 p2 + s^3
    fn coord(s: f64, p1: f64, p2: f64) -> f64 {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
    }
    fn slope(s: f64, p1: f64, p2: f64) -> f64 {
        let inv = 1.0 - s;
        3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
    }

    let mut s = t;
    for _ in 0..8 {
        let dx = coord(s, x1, x2) - t;
        if dx.abs() < 1e-7 {
            return coord(s, y1, y2);
        }
        let d = slope(s, x1, x2);
        if d.abs() < 1e-6 {
            break;
        }
        s = (s - dx / d).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    s = t;
    for _ in 0..40 {
        let x = coord(s, x1, x2);
        if (x - t).abs() < 1e-7 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = 0.5 * (lo + hi);
    }
    coord(s, y1, y2)
}

// Settles when the envelope has decayed to 1/1000.
const SPRING_SETTLE_LN: f64 = 6.907_755_278_982_137;

fn spring(t: f64, stiffness: f64, damping: f64, mass: f64) -> f64 {
    if t >= 1.0 {
        return 1.0;
    }
    if t <= 0.0 || !(stiffness > 0.0 && damping > 0.0 && mass > 0.0) {
        return t.max(0.0);
    }

    let omega0 = (stiffness / mass).sqrt();
    let zeta = damping / (2.0 * (stiffness * mass).sqrt());

    if zeta < 1.0 {
        let settle = SPRING_SETTLE_LN / (zeta * omega0);
        let tau = t * settle;
        let omega_d = omega0 * (1.0 - zeta * zeta).sqrt();
        let envelope = (-zeta * omega0 * tau).exp();
        1.0 - envelope * ((omega_d * tau).cos() + (zeta * omega0 / omega_d) * (omega_d * tau).sin())
    } else if (zeta - 1.0).abs() < 1e-9 {
        let settle = SPRING_SETTLE_LN / omega0;
        let tau = t * settle;
        1.0 - (-omega0 * tau).exp() * (1.0 + omega0 * tau)
    } else {
        let root = (zeta * zeta - 1.0).sqrt();
        let r1 = -omega0 * (zeta - root);
        let r2 = -omega0 * (zeta + root);
        let settle = SPRING_SETTLE_LN / r1.abs();
        let tau = t * settle;
        1.0 + (r2 * (r1 * tau).exp() - r1 * (r2 * tau).exp()) / (r1 - r2)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
