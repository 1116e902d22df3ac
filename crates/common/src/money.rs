//! Money value object.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Amount in Polish zloty, held in grosze to avoid floating point drift.
///
/// On the wire an amount is a plain JSON number of zloty: whole amounts are
/// written as integers (`2200`), fractional ones as decimals (`49.99`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    grosze: i64,
}

impl Money {
    /// Creates an amount from grosze (1/100 PLN).
    pub const fn from_grosze(grosze: i64) -> Self {
        Self { grosze }
    }

    /// Creates an amount from whole zloty.
    pub const fn from_pln(pln: i64) -> Self {
        Self { grosze: pln * 100 }
    }

    /// Creates an amount from a decimal zloty value, rounding to the nearest grosz.
    pub fn from_pln_f64(pln: f64) -> Self {
        Self {
            grosze: (pln * 100.0).round() as i64,
        }
    }

    /// Returns zero.
    pub const fn zero() -> Self {
        Self { grosze: 0 }
    }

    /// Returns the amount in grosze.
    pub fn grosze(&self) -> i64 {
        self.grosze
    }

    /// Returns the whole zloty part.
    pub fn pln(&self) -> i64 {
        self.grosze / 100
    }

    /// Returns the grosze part (remainder after zloty).
    pub fn grosze_part(&self) -> i64 {
        self.grosze.abs() % 100
    }

    /// Returns the amount as a decimal zloty value.
    pub fn as_pln_f64(&self) -> f64 {
        self.grosze as f64 / 100.0
    }

    pub fn is_zero(&self) -> bool {
        self.grosze == 0
    }

    pub fn is_negative(&self) -> bool {
        self.grosze < 0
    }

    /// Adds two amounts, returning `None` on overflow.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.grosze.checked_add(rhs.grosze).map(Self::from_grosze)
    }

    /// Adds two amounts, clamping at the numeric bounds.
    pub fn saturating_add(self, rhs: Self) -> Self {
        Self::from_grosze(self.grosze.saturating_add(rhs.grosze))
    }
}

/// Largest grosze magnitude a JSON float can carry exactly (2^53 - 1).
const MAX_EXACT_FLOAT_GROSZE: f64 = 9_007_199_254_740_991.0;

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.grosze < 0 { "-" } else { "" };
        write!(
            f,
            "{sign}{}.{:02} PLN",
            self.pln().abs(),
            self.grosze_part()
        )
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            grosze: self.grosze + rhs.grosze,
        }
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money {
            grosze: self.grosze - rhs.grosze,
        }
    }
}

impl std::ops::Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money {
            grosze: -self.grosze,
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.grosze += rhs.grosze;
    }
}

impl std::ops::SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.grosze -= rhs.grosze;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.grosze % 100 == 0 {
            serializer.serialize_i64(self.grosze / 100)
        } else {
            serializer.serialize_f64(self.as_pln_f64())
        }
    }
}

struct MoneyVisitor;

impl Visitor<'_> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("an amount in PLN as a JSON number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(100)
            .map(Money::from_grosze)
            .ok_or_else(|| E::custom(format!("amount out of range: {v}")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .map_err(|_| E::custom(format!("amount out of range: {v}")))
            .and_then(|v| self.visit_i64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        if !v.is_finite() {
            return Err(E::custom("amount must be finite"));
        }
        if (v * 100.0).round().abs() > MAX_EXACT_FLOAT_GROSZE {
            return Err(E::custom(format!("amount out of range: {v}")));
        }
        Ok(Money::from_pln_f64(v))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}
