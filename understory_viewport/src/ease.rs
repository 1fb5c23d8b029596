// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Robert Penner's easing equations.
//!
//! Every curve uses the classic `(t, b, c, d)` signature: elapsed time,
//! start value, total change and duration. At `t == 0` the result is `b` and
//! at `t == d` it is `b + c`.

use core::f64::consts::PI;
use core::fmt;
use core::str::FromStr;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::modes::{ParseOptionError, deserialize_from_str};

/// A custom easing function with the `(t, b, c, d)` signature.
pub type EaseFn = fn(f64, f64, f64, f64) -> f64;

/// Easing curve used by animated plugins.
#[derive(Clone, Copy, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(try_from = "alloc::string::String")
)]
#[expect(missing_docs, reason = "variant names are the standard curve names")]
pub enum Ease {
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InSine,
    OutSine,
    #[default]
    InOutSine,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    InElastic,
    OutElastic,
    InOutElastic,
    InBack,
    OutBack,
    InOutBack,
    InBounce,
    OutBounce,
    InOutBounce,
    /// A caller-supplied curve.
    Custom(EaseFn),
}

const NAMES: &[(&str, Ease)] = &[
    ("linear", Ease::Linear),
    ("easeInQuad", Ease::InQuad),
    ("easeOutQuad", Ease::OutQuad),
    ("easeInOutQuad", Ease::InOutQuad),
    ("easeInCubic", Ease::InCubic),
    ("easeOutCubic", Ease::OutCubic),
    ("easeInOutCubic", Ease::InOutCubic),
    ("easeInQuart", Ease::InQuart),
    ("easeOutQuart", Ease::OutQuart),
    ("easeInOutQuart", Ease::InOutQuart),
    ("easeInQuint", Ease::InQuint),
    ("easeOutQuint", Ease::OutQuint),
    ("easeInOutQuint", Ease::InOutQuint),
    ("easeInSine", Ease::InSine),
    ("easeOutSine", Ease::OutSine),
    ("easeInOutSine", Ease::InOutSine),
    ("easeInExpo", Ease::InExpo),
    ("easeOutExpo", Ease::OutExpo),
    ("easeInOutExpo", Ease::InOutExpo),
    ("easeInCirc", Ease::InCirc),
    ("easeOutCirc", Ease::OutCirc),
    ("easeInOutCirc", Ease::InOutCirc),
    ("easeInElastic", Ease::InElastic),
    ("easeOutElastic", Ease::OutElastic),
    ("easeInOutElastic", Ease::InOutElastic),
    ("easeInBack", Ease::InBack),
    ("easeOutBack", Ease::OutBack),
    ("easeInOutBack", Ease::InOutBack),
    ("easeInBounce", Ease::InBounce),
    ("easeOutBounce", Ease::OutBounce),
    ("easeInOutBounce", Ease::InOutBounce),
];

const BACK: f64 = 1.70158;

impl Ease {
    /// Evaluates the curve at time `t` of duration `d`, from `b` by change `c`.
    #[must_use]
    pub fn apply(self, t: f64, b: f64, c: f64, d: f64) -> f64 {
        match self {
            Self::Linear => c * t / d + b,
            Self::InQuad => {
                let t = t / d;
                c * t * t + b
            }
            Self::OutQuad => {
                let t = t / d;
                -c * t * (t - 2.0) + b
            }
            Self::InOutQuad => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * t * t + b
                } else {
                    let t = t - 1.0;
                    -c / 2.0 * (t * (t - 2.0) - 1.0) + b
                }
            }
            Self::InCubic => c * (t / d).powi(3) + b,
            Self::OutCubic => c * ((t / d - 1.0).powi(3) + 1.0) + b,
            Self::InOutCubic => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * t.powi(3) + b
                } else {
                    c / 2.0 * ((t - 2.0).powi(3) + 2.0) + b
                }
            }
            Self::InQuart => c * (t / d).powi(4) + b,
            Self::OutQuart => -c * ((t / d - 1.0).powi(4) - 1.0) + b,
            Self::InOutQuart => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * t.powi(4) + b
                } else {
                    -c / 2.0 * ((t - 2.0).powi(4) - 2.0) + b
                }
            }
            Self::InQuint => c * (t / d).powi(5) + b,
            Self::OutQuint => c * ((t / d - 1.0).powi(5) + 1.0) + b,
            Self::InOutQuint => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * t.powi(5) + b
                } else {
                    c / 2.0 * ((t - 2.0).powi(5) + 2.0) + b
                }
            }
            Self::InSine => -c * (t / d * (PI / 2.0)).cos() + c + b,
            Self::OutSine => c * (t / d * (PI / 2.0)).sin() + b,
            Self::InOutSine => -c / 2.0 * ((PI * t / d).cos() - 1.0) + b,
            Self::InExpo => {
                if t == 0.0 {
                    b
                } else {
                    c * 2_f64.powf(10.0 * (t / d - 1.0)) + b
                }
            }
            Self::OutExpo => {
                if t == d {
                    b + c
                } else {
                    c * (1.0 - 2_f64.powf(-10.0 * t / d)) + b
                }
            }
            Self::InOutExpo => {
                if t == 0.0 {
                    return b;
                }
                if t == d {
                    return b + c;
                }
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * 2_f64.powf(10.0 * (t - 1.0)) + b
                } else {
                    c / 2.0 * (2.0 - 2_f64.powf(-10.0 * (t - 1.0))) + b
                }
            }
            Self::InCirc => {
                let t = t / d;
                -c * ((1.0 - t * t).sqrt() - 1.0) + b
            }
            Self::OutCirc => {
                let t = t / d - 1.0;
                c * (1.0 - t * t).sqrt() + b
            }
            Self::InOutCirc => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    -c / 2.0 * ((1.0 - t * t).sqrt() - 1.0) + b
                } else {
                    let t = t - 2.0;
                    c / 2.0 * ((1.0 - t * t).sqrt() + 1.0) + b
                }
            }
            Self::InElastic => {
                let t = t / d;
                if t == 0.0 || c == 0.0 {
                    return b;
                }
                if t == 1.0 {
                    return b + c;
                }
                let p = d * 0.3;
                let s = p / 4.0;
                let t = t - 1.0;
                -(c * 2_f64.powf(10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin()) + b
            }
            Self::OutElastic => {
                let t = t / d;
                if t == 0.0 || c == 0.0 {
                    return b;
                }
                if t == 1.0 {
                    return b + c;
                }
                let p = d * 0.3;
                let s = p / 4.0;
                c * 2_f64.powf(-10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin() + c + b
            }
            Self::InOutElastic => {
                let t = t / (d / 2.0);
                if t == 0.0 || c == 0.0 {
                    return b;
                }
                if t == 2.0 {
                    return b + c;
                }
                let p = d * (0.3 * 1.5);
                let s = p / 4.0;
                let t = t - 1.0;
                let wave = ((t * d - s) * (2.0 * PI) / p).sin();
                if t < 0.0 {
                    -0.5 * (c * 2_f64.powf(10.0 * t) * wave) + b
                } else {
                    c * 2_f64.powf(-10.0 * t) * wave * 0.5 + c + b
                }
            }
            Self::InBack => {
                let t = t / d;
                c * t * t * ((BACK + 1.0) * t - BACK) + b
            }
            Self::OutBack => {
                let t = t / d - 1.0;
                c * (t * t * ((BACK + 1.0) * t + BACK) + 1.0) + b
            }
            Self::InOutBack => {
                let s = BACK * 1.525;
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * (t * t * ((s + 1.0) * t - s)) + b
                } else {
                    let t = t - 2.0;
                    c / 2.0 * (t * t * ((s + 1.0) * t + s) + 2.0) + b
                }
            }
            Self::InBounce => c - out_bounce(d - t, 0.0, c, d) + b,
            Self::OutBounce => out_bounce(t, b, c, d),
            Self::InOutBounce => {
                if t < d / 2.0 {
                    (c - out_bounce(d - t * 2.0, 0.0, c, d)) * 0.5 + b
                } else {
                    out_bounce(t * 2.0 - d, 0.0, c, d) * 0.5 + c * 0.5 + b
                }
            }
            Self::Custom(f) => f(t, b, c, d),
        }
    }

    /// The conventional name of a built-in curve, or `None` for [`Ease::Custom`].
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        if matches!(self, Self::Custom(_)) {
            return None;
        }
        NAMES
            .iter()
            .find(|(_, ease)| core::mem::discriminant(ease) == core::mem::discriminant(&self))
            .map(|(name, _)| *name)
    }
}

fn out_bounce(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    if t < 1.0 / 2.75 {
        c * (7.5625 * t * t) + b
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        c * (7.5625 * t * t + 0.75) + b
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        c * (7.5625 * t * t + 0.9375) + b
    } else {
        let t = t - 2.625 / 2.75;
        c * (7.5625 * t * t + 0.984375) + b
    }
}

impl fmt::Debug for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => f.write_str("Custom(..)"),
        }
    }
}

impl FromStr for Ease {
    type Err = ParseOptionError;

    /// Accepts names such as `"easeInOutSine"`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, ease)| *ease)
            .ok_or_else(|| ParseOptionError::new("ease", s))
    }
}

deserialize_from_str!(Ease);
