use super::*;

/// The location of a single satoshi: an output and the offset of the satoshi
/// within that output.
#[derive(Debug, PartialEq, Copy, Clone, Eq, PartialOrd, Ord, Hash)]
pub struct SatPoint {
  pub outpoint: OutPoint,
  pub offset: u64,
}

impl SatPoint {
  /// `000…000:0:0`, recorded when a satoshi is consumed as a miner fee.
  pub fn zero() -> Self {
    Self {
      outpoint: unbound_outpoint(),
      offset: 0,
    }
  }

  pub fn is_zero(&self) -> bool {
    *self == Self::zero()
  }
}

impl Display for SatPoint {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}:{}", self.outpoint, self.offset)
  }
}

impl Serialize for SatPoint {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for SatPoint {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Self::from_str(&s).map_err(serde::de::Error::custom)
  }
}

impl FromStr for SatPoint {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (outpoint, offset) = s
      .rsplit_once(':')
      .ok_or_else(|| anyhow!("invalid satpoint: {s}"))?;

    Ok(SatPoint {
      outpoint: outpoint
        .parse()
        .with_context(|| format!("invalid satpoint outpoint: {s}"))?,
      offset: offset
        .parse()
        .with_context(|| format!("invalid satpoint offset: {s}"))?,
    })
  }
}
