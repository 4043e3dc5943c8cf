use {
  serde::{Deserialize, Deserializer, Serialize, Serializer},
  std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
  },
};

const MIXHASH_HEX_LEN: usize = 64;
const SIZE_MASK: u64 = (1 << 62) - 1;

const BECH32_PREFIXES: [&str; 3] = ["bc1", "tb1", "bcrt1"];

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum MixHashError {
  #[error("invalid length: {0}")]
  Length(usize),

  #[error("invalid hex character")]
  Character,
}

/// A content hash carrying its hashing method and data size in the first
/// eight bytes. Always held in the normalised `0x` + lowercase hex form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MixHash(String);

impl MixHash {
  fn header(&self) -> u64 {
    let mut header = [0; 8];
    // validated as hex on construction
    match hex::decode_to_slice(&self.0[2..18], &mut header) {
      Ok(()) => u64::from_be_bytes(header),
      Err(_) => 0,
    }
  }

  pub fn method(&self) -> u8 {
    u8::try_from(self.header() >> 62).unwrap_or_default()
  }

  pub fn size(&self) -> u64 {
    self.header() & SIZE_MASK
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl FromStr for MixHash {
  type Err = MixHashError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let digits = s.strip_prefix("0x").unwrap_or(s);

    if digits.len() != MIXHASH_HEX_LEN {
      return Err(MixHashError::Length(digits.len()));
    }

    hex::decode(digits).map_err(|_| MixHashError::Character)?;

    Ok(Self(format!("0x{}", digits.to_lowercase())))
  }
}

impl Display for MixHash {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl Serialize for MixHash {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&self.0)
  }
}

impl<'de> Deserialize<'de> for MixHash {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    DeserializeFromStr::deserialize(deserializer).map(|DeserializeFromStr(hash)| hash)
  }
}

struct DeserializeFromStr<T>(T);

impl<'de, T: FromStr> Deserialize<'de> for DeserializeFromStr<T>
where
  T::Err: Display,
{
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    Ok(Self(
      String::deserialize(deserializer)?
        .parse::<T>()
        .map_err(serde::de::Error::custom)?,
    ))
  }
}

/// Sum of the character codes of the last eight characters. Bech32 addresses
/// are case-insensitive and are lowercased first.
pub fn string_number(s: &str) -> u64 {
  let s = s.trim();
  let lower = s.to_lowercase();
  let s = if BECH32_PREFIXES
    .iter()
    .any(|prefix| lower.starts_with(prefix))
  {
    lower
  } else {
    s.to_string()
  };

  let chars = s.chars().collect::<Vec<char>>();
  chars[chars.len().saturating_sub(8)..]
    .iter()
    .map(|c| u64::from(u32::from(*c)))
    .sum()
}

/// Closeness of an address to a hash, used to settle same-block competitions.
pub fn distance(hash: &str, address: &str) -> u64 {
  string_number(hash).abs_diff(string_number(address))
}
