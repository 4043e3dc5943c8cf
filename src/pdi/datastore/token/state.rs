use serde::{Deserialize, Serialize};

/// Outcome of a token operation. The numeric codes are persisted and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[repr(u8)]
pub enum OpState {
  #[error("ok")]
  Ok = 0,
  #[error("already exists")]
  AlreadyExists = 1,
  #[error("hash unmatch")]
  HashUnmatch = 2,
  #[error("competition failed")]
  CompetitionFailed = 3,
  #[error("invalid amt")]
  InvalidAmt = 4,
  #[error("insufficient balance")]
  InsufficientBalance = 5,
  #[error("hash not found")]
  HashNotFound = 6,
  #[error("permission denied")]
  PermissionDenied = 7,
  #[error("invalid params")]
  InvalidParams = 8,
  #[error("invalid price")]
  InvalidPrice = 9,
  #[error("out of resonance limit")]
  OutOfResonanceLimit = 10,
  #[error("has no valid chant")]
  HasNoValidChant = 11,
  #[error("out address is not owner")]
  OutAddressIsNotOwner = 12,
}

impl OpState {
  pub fn code(self) -> u8 {
    self as u8
  }

  pub fn is_ok(self) -> bool {
    self == Self::Ok
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn codes_are_stable() {
    assert_eq!(OpState::Ok.code(), 0);
    assert_eq!(OpState::CompetitionFailed.code(), 3);
    assert_eq!(OpState::InsufficientBalance.code(), 5);
    assert_eq!(OpState::InvalidParams.code(), 8);
    assert_eq!(OpState::OutAddressIsNotOwner.code(), 12);
  }

  #[test]
  fn display() {
    assert_eq!(OpState::HashNotFound.to_string(), "hash not found");
  }
}
