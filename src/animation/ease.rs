/// Easing curve applied to the interval that starts at a keyframe (or slide).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// Quadratic acceleration from rest.
    EaseIn,
    /// Quadratic deceleration to rest.
    EaseOut,
    /// Accelerates through the first half, decelerates through the second.
    EaseInOut,
    /// Ease-out with decaying rebounds.
    Bounce,
}

impl Easing {
    /// Every curve, in menu order.
    pub const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::Bounce,
    ];

    /// Maps progress `t` (clamped to `[0, 1]`) through the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::Bounce => bounce_out(t),
        }
    }

    /// Lenient name lookup: `ease-in`, `easeIn`, `ease_in` and `EASE-IN` all resolve.
    pub fn parse(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "linear" => Some(Self::Linear),
            "easein" => Some(Self::EaseIn),
            "easeout" => Some(Self::EaseOut),
            "easeinout" => Some(Self::EaseInOut),
            "bounce" => Some(Self::Bounce),
            _ => None,
        }
    }

    /// Canonical kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
            Self::Bounce => "bounce",
        }
    }
}

// Four parabolic segments with decaying rebounds; settles exactly at 1.0.
fn bounce_out(t: f64) -> f64 {
    const N1: f64 = 7.5625;
    const D1: f64 = 2.75;
    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
