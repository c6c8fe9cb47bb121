//! Tagged numeric values with explicit promotion rules.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// The kind of a [`Number`], without its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NumberKind {
    /// 64-bit signed integer.
    Int,
    /// IEEE-754 double.
    Float,
    /// Arbitrary-precision exact rational.
    Fraction,
}

impl fmt::Display for NumberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberKind::Int => write!(f, "int"),
            NumberKind::Float => write!(f, "float"),
            NumberKind::Fraction => write!(f, "fraction"),
        }
    }
}

/// A numeric value: integer, float or exact fraction.
///
/// Arithmetic follows three rules:
///
/// - `Int ∘ Int` stays `Int` for `+`, `-` and `*`; on `i64` overflow the
///   result is promoted to `Fraction` instead of wrapping.
/// - Any other combination of exact values (`Int`, `Fraction`) is a
///   `Fraction`. Division of exact values is always a `Fraction`.
/// - A `Float` operand makes the result `Float`.
///
/// Equality is kind-aware: `Int(1) != Fraction(1/1)`. Use
/// [`numeric_cmp`](Number::numeric_cmp) to compare values across kinds.
///
/// # Examples
///
/// ```
/// use u_landscape::numeric::Number;
///
/// let a = Number::Int(1);
/// let b = Number::fraction(1, 3);
/// assert_eq!(&a + &b, Number::fraction(4, 3));
/// assert_eq!(&a + &Number::Float(0.5), Number::Float(1.5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Exact rational value, always stored in lowest terms.
    Fraction(BigRational),
}

fn big(v: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(v))
}

impl Number {
    /// Builds the exact fraction `numer/denom`.
    ///
    /// # Panics
    /// Panics if `denom` is zero.
    pub fn fraction(numer: i64, denom: i64) -> Self {
        Number::Fraction(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    /// Returns the kind of this value.
    pub fn kind(&self) -> NumberKind {
        match self {
            Number::Int(_) => NumberKind::Int,
            Number::Float(_) => NumberKind::Float,
            Number::Fraction(_) => NumberKind::Fraction,
        }
    }

    /// Whether the value is exact (`Int` or `Fraction`).
    pub fn is_exact(&self) -> bool {
        !matches!(self, Number::Float(_))
    }

    /// Whether the value equals zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Number::Int(v) => *v == 0,
            Number::Float(v) => *v == 0.0,
            Number::Fraction(v) => v.is_zero(),
        }
    }

    /// Whether the value is neither infinite nor NaN. Exact values always
    /// are.
    pub fn is_finite(&self) -> bool {
        match self {
            Number::Float(v) => v.is_finite(),
            _ => true,
        }
    }

    /// Zero of the given kind.
    pub fn zero(kind: NumberKind) -> Self {
        match kind {
            NumberKind::Int => Number::Int(0),
            NumberKind::Float => Number::Float(0.0),
            NumberKind::Fraction => Number::Fraction(BigRational::zero()),
        }
    }

    /// Lossy conversion to `f64`.
    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Int(v) => *v as f64,
            Number::Float(v) => *v,
            Number::Fraction(v) => v.to_f64().unwrap_or(f64::NAN),
        }
    }

    /// Exact rational value, or `None` for floats.
    pub fn to_rational(&self) -> Option<BigRational> {
        match self {
            Number::Int(v) => Some(big(*v)),
            Number::Float(_) => None,
            Number::Fraction(v) => Some(v.clone()),
        }
    }

    /// Absolute value, same kind.
    pub fn abs(&self) -> Self {
        match self {
            Number::Int(v) => match v.checked_abs() {
                Some(a) => Number::Int(a),
                None => Number::Fraction(big(*v).abs()),
            },
            Number::Float(v) => Number::Float(v.abs()),
            Number::Fraction(v) => Number::Fraction(v.abs()),
        }
    }

    /// Square root, always a float.
    pub fn sqrt(&self) -> Self {
        Number::Float(self.to_f64().sqrt())
    }

    /// Compares two values numerically, across kinds.
    ///
    /// Exact values are compared exactly; a float on either side compares
    /// as `f64`. Returns `None` only when a NaN is involved.
    pub fn numeric_cmp(&self, other: &Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(b)),
            (Number::Float(_), _) | (_, Number::Float(_)) => {
                self.to_f64().partial_cmp(&other.to_f64())
            }
            _ => {
                let a = self.to_rational()?;
                let b = other.to_rational()?;
                Some(a.cmp(&b))
            }
        }
    }

    /// Numeric equality across kinds (`Int(1)` equals `Fraction(1/1)`).
    pub fn numeric_eq(&self, other: &Number) -> bool {
        self.numeric_cmp(other) == Some(Ordering::Equal)
    }

    /// Division with exactness preserved.
    ///
    /// Exact by exact gives a `Fraction`; otherwise a `Float`. Returns
    /// `None` when dividing by zero.
    pub fn checked_div(&self, other: &Number) -> Option<Number> {
        if other.is_zero() {
            return None;
        }
        match (self.to_rational(), other.to_rational()) {
            (Some(a), Some(b)) => Some(Number::Fraction(a / b)),
            _ => Some(Number::Float(self.to_f64() / other.to_f64())),
        }
    }

    /// Raises `self` to `exponent`.
    ///
    /// An exact base with an integer exponent stays exact (`Int` for a
    /// non-negative exponent on an `Int` base, `Fraction` otherwise).
    /// Every other combination is computed in floating point. Zero to a
    /// negative power gives `Float(inf)`.
    pub fn pow(&self, exponent: &Number) -> Number {
        if let Number::Int(e) = exponent {
            if let Ok(e32) = i32::try_from(*e) {
                match self {
                    Number::Int(b) if e32 >= 0 => {
                        if let Some(v) = b.checked_pow(e32 as u32) {
                            return Number::Int(v);
                        }
                        return Number::Fraction(num_traits::pow(big(*b), e32 as usize));
                    }
                    Number::Int(_) | Number::Fraction(_) => {
                        if self.is_zero() && e32 < 0 {
                            return Number::Float(f64::INFINITY);
                        }
                        let base = self.to_rational().unwrap_or_else(BigRational::one);
                        return Number::Fraction(base.pow(e32));
                    }
                    Number::Float(b) => return Number::Float(b.powi(e32)),
                }
            }
        }
        Number::Float(self.to_f64().powf(exponent.to_f64()))
    }

    /// Reciprocal, `None` for zero.
    pub fn recip(&self) -> Option<Number> {
        Number::Int(1).checked_div(self)
    }

    /// Converts to the given kind.
    ///
    /// Converting a float to an exact kind truncates toward zero for `Int`
    /// and uses the exact binary expansion for `Fraction`.
    pub fn to_kind(&self, kind: NumberKind) -> Number {
        match (kind, self) {
            (NumberKind::Float, _) => Number::Float(self.to_f64()),
            (NumberKind::Int, Number::Int(_)) | (NumberKind::Fraction, Number::Fraction(_)) => {
                self.clone()
            }
            (NumberKind::Int, Number::Fraction(v)) => match v.to_integer().to_i64() {
                Some(i) => Number::Int(i),
                None => self.clone(),
            },
            (NumberKind::Int, Number::Float(v)) => Number::Int(*v as i64),
            (NumberKind::Fraction, Number::Int(v)) => Number::Fraction(big(*v)),
            (NumberKind::Fraction, Number::Float(v)) => BigRational::from_float(*v)
                .map(Number::Fraction)
                .unwrap_or(Number::Float(*v)),
        }
    }

    /// Smallest of a non-empty sequence, first occurrence on ties.
    pub fn min_of<'a, I: IntoIterator<Item = &'a Number>>(values: I) -> Option<&'a Number> {
        values.into_iter().fold(None, |best, v| match best {
            Some(b) if v.numeric_cmp(b) != Some(Ordering::Less) => Some(b),
            _ => Some(v),
        })
    }

    /// Largest of a non-empty sequence, first occurrence on ties.
    pub fn max_of<'a, I: IntoIterator<Item = &'a Number>>(values: I) -> Option<&'a Number> {
        values.into_iter().fold(None, |best, v| match best {
            Some(b) if v.numeric_cmp(b) != Some(Ordering::Greater) => Some(b),
            _ => Some(v),
        })
    }

    /// Canonical token: decimal `Int`, `n/d` for `Fraction` (also when
    /// `d = 1`), and a float form that always contains a `.`.
    pub fn token(&self) -> String {
        match self {
            Number::Int(v) => v.to_string(),
            Number::Float(v) => format_float(*v),
            Number::Fraction(v) => format!("{}/{}", v.numer(), v.denom()),
        }
    }

    /// Parses a numeric token: `n/d` is a fraction, anything with a `.`
    /// is a float, everything else a base-10 integer.
    pub fn parse_token(token: &str) -> Option<Number> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        if let Some((n, d)) = token.split_once('/') {
            let n: BigInt = n.trim().parse().ok()?;
            let d: BigInt = d.trim().parse().ok()?;
            if d.is_zero() {
                return None;
            }
            return Some(Number::Fraction(BigRational::new(n, d)));
        }
        if token.contains('.') {
            return token.parse::<f64>().ok().map(Number::Float);
        }
        token.parse::<i64>().ok().map(Number::Int)
    }
}

/// Shortest round-trip representation that still reads back as a float.
///
/// `inf` and `NaN` are written as Rust debug-formats them and do not parse
/// back; problems refuse non-finite values.
fn format_float(v: f64) -> String {
    let s = format!("{v:?}");
    if s.contains('.') || !v.is_finite() {
        return s;
    }
    match s.find('e') {
        Some(pos) => format!("{}.0{}", &s[..pos], &s[pos..]),
        None => format!("{s}.0"),
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Int(v)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Float(v)
    }
}

impl From<BigRational> for Number {
    fn from(v: BigRational) -> Self {
        Number::Fraction(v)
    }
}

macro_rules! exact_op {
    ($trait:ident, $method:ident, $checked:ident) => {
        impl<'a> $trait<&'a Number> for &'a Number {
            type Output = Number;

            fn $method(self, rhs: &'a Number) -> Number {
                match (self, rhs) {
                    (Number::Int(a), Number::Int(b)) => match a.$checked(*b) {
                        Some(v) => Number::Int(v),
                        None => Number::Fraction(big(*a).$method(big(*b))),
                    },
                    (Number::Float(_), _) | (_, Number::Float(_)) => {
                        Number::Float(self.to_f64().$method(rhs.to_f64()))
                    }
                    _ => match (self.to_rational(), rhs.to_rational()) {
                        (Some(a), Some(b)) => Number::Fraction(a.$method(b)),
                        _ => Number::Float(self.to_f64().$method(rhs.to_f64())),
                    },
                }
            }
        }

        impl $trait for Number {
            type Output = Number;

            fn $method(self, rhs: Number) -> Number {
                (&self).$method(&rhs)
            }
        }
    };
}

exact_op!(Add, add, checked_add);
exact_op!(Sub, sub, checked_sub);
exact_op!(Mul, mul, checked_mul);

impl Neg for &Number {
    type Output = Number;

    fn neg(self) -> Number {
        match self {
            Number::Int(v) => match v.checked_neg() {
                Some(n) => Number::Int(n),
                None => Number::Fraction(-big(*v)),
            },
            Number::Float(v) => Number::Float(-v),
            Number::Fraction(v) => Number::Fraction(-v.clone()),
        }
    }
}

/// Ints and floats serialise as native numbers, fractions as their `n/d`
/// token. Deserialisation also accepts any token string.
#[cfg(feature = "serde")]
impl serde::Serialize for Number {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Number::Int(v) => serializer.serialize_i64(*v),
            Number::Float(v) => serializer.serialize_f64(*v),
            Number::Fraction(_) => serializer.serialize_str(&self.token()),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Number {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NumberVisitor;

        impl serde::de::Visitor<'_> for NumberVisitor {
            type Value = Number;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer, a float or a number token such as \"2/3\"")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Number, E> {
                Ok(Number::Int(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Number, E> {
                i64::try_from(v)
                    .map(Number::Int)
                    .map_err(|_| E::custom(format!("integer {v} out of range")))
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Number, E> {
                Ok(Number::Float(v))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Number, E> {
                Number::parse_token(v).ok_or_else(|| E::custom(format!("invalid number token {v:?}")))
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}
