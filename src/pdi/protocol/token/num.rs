use super::{error::NumError, params::MAX_DECIMAL_WIDTH};
use bigdecimal::{
  num_bigint::{BigInt, Sign, ToBigInt},
  BigDecimal, ToPrimitive, Zero,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
  fmt::{Display, Formatter},
  str::FromStr,
};

#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Default)]
pub struct Num(BigDecimal);

impl Num {
  pub fn zero() -> Self {
    Self(BigDecimal::zero())
  }

  pub fn checked_add(&self, other: &Num) -> Result<Self, NumError> {
    Ok(Self(self.0.clone() + &other.0))
  }

  pub fn checked_sub(&self, other: &Num) -> Result<Self, NumError> {
    if self.0 < other.0 {
      return Err(NumError::Overflow {
        op: String::from("checked_sub"),
        org: self.clone(),
        other: other.clone(),
      });
    }

    Ok(Self(self.0.clone() - &other.0))
  }

  pub fn checked_mul(&self, other: &Num) -> Result<Self, NumError> {
    Ok(Self(self.0.clone() * &other.0))
  }

  /// Division truncated to the token's decimal width.
  pub fn checked_div(&self, other: &Num) -> Result<Self, NumError> {
    if other.0.is_zero() {
      return Err(NumError::Overflow {
        op: String::from("checked_div"),
        org: self.clone(),
        other: other.clone(),
      });
    }

    Ok(Self(
      (self.0.clone() / &other.0)
        .with_scale(i64::from(MAX_DECIMAL_WIDTH))
        .normalized(),
    ))
  }

  /// `self * percent / 100`, truncated to the token's decimal width.
  pub fn percent(&self, percent: u64) -> Result<Self, NumError> {
    self
      .checked_mul(&Num::from(percent))?
      .checked_div(&Num::from(100u64))
  }

  pub fn sign(&self) -> Sign {
    self.0.sign()
  }

  pub fn is_positive(&self) -> bool {
    self.sign() == Sign::Plus
  }

  pub fn scale(&self) -> i64 {
    let (_, scale) = self.0.as_bigint_and_exponent();
    scale
  }

  pub fn checked_to_u128(&self) -> Result<u128, NumError> {
    if !self.0.is_integer() {
      return Err(NumError::InvalidInteger(self.clone()));
    }
    self
      .0
      .to_bigint()
      .ok_or(NumError::InternalError(format!(
        "convert {} to bigint failed",
        self.0
      )))?
      .to_u128()
      .ok_or(NumError::Overflow {
        op: String::from("to_u128"),
        org: self.clone(),
        other: Self(BigDecimal::from(BigInt::from(u128::MAX))),
      })
  }
}

impl From<u64> for Num {
  fn from(n: u64) -> Self {
    Self(BigDecimal::from(n))
  }
}

impl From<u128> for Num {
  fn from(n: u128) -> Self {
    Self(BigDecimal::from(BigInt::from(n)))
  }
}

impl FromStr for Num {
  type Err = NumError;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s.starts_with('.') || s.ends_with('.') || s.find(&['e', 'E', '+', '-']).is_some() {
      return Err(NumError::InvalidNum(s.to_string()));
    }
    let num = BigDecimal::from_str(s).map_err(|_| NumError::InvalidNum(s.to_string()))?;

    let (_, scale) = num.as_bigint_and_exponent();
    if scale > i64::from(MAX_DECIMAL_WIDTH) {
      return Err(NumError::InvalidNum(s.to_string()));
    }

    Ok(Self(num))
  }
}

impl Display for Num {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    self.0.fmt(f)
  }
}

impl Serialize for Num {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    let s = self.to_string();
    serializer.serialize_str(&s)
  }
}

impl<'de> Deserialize<'de> for Num {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Ok(Self(
      BigDecimal::from_str(&s).map_err(serde::de::Error::custom)?,
    ))
  }
}
