/*!
    Rational time bases, timestamps and rescaling between them.
*/

use std::fmt;

/**
    A rational number, used for time bases and frame rates.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    pub const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    /**
        Returns the value as a float, or 0.0 for a zero denominator.
    */
    pub fn to_f64(self) -> f64 {
        if self.den == 0 {
            0.0
        } else {
            self.num as f64 / self.den as f64
        }
    }

    /**
        Returns true if this rational can be used as a time base.
    */
    pub const fn is_valid_time_base(self) -> bool {
        self.num > 0 && self.den > 0
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/**
    Presentation or decoding timestamp, in units of the owning stream's time base.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pts(pub i64);

/**
    Duration in units of the owning stream's time base.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MediaDuration(pub i64);

/**
    Rounding mode for [`rescale`], mirroring FFmpeg's `AVRounding`.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rounding {
    /// Round toward zero.
    Zero,
    /// Round away from zero.
    Inf,
    /// Round toward negative infinity.
    Down,
    /// Round toward positive infinity.
    Up,
    /// Round to nearest, halfway cases away from zero.
    #[default]
    NearInf,
}

/**
    Rescale `ts` from time base `from` to time base `to`.

    `i64::MIN` and `i64::MAX` are passed through untouched, so FFmpeg's
    "no timestamp" sentinel survives rescaling. A zero target denominator
    product yields `i64::MIN`. Results outside the `i64` range saturate.
*/
pub fn rescale(ts: i64, from: Rational, to: Rational, rounding: Rounding) -> i64 {
    if ts == i64::MIN || ts == i64::MAX {
        return ts;
    }
    if from == to {
        return ts;
    }

    let num = ts as i128 * from.num as i128 * to.den as i128;
    let den = to.num as i128 * from.den as i128;
    if den == 0 {
        return i64::MIN;
    }

    let negative = (num < 0) != (den < 0);
    let n = num.unsigned_abs();
    let d = den.unsigned_abs();

    let floor = n / d;
    let ceil = n.div_ceil(d);
    let magnitude = match rounding {
        Rounding::Zero => floor,
        Rounding::Inf => ceil,
        Rounding::NearInf => (n + d / 2) / d,
        Rounding::Down if negative => ceil,
        Rounding::Down => floor,
        Rounding::Up if negative => floor,
        Rounding::Up => ceil,
    };

    let value = if negative {
        -(magnitude as i128)
    } else {
        magnitude as i128
    };
    value.clamp(i64::MIN as i128 + 1, i64::MAX as i128 - 1) as i64
}
