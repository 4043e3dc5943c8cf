use {
  super::Num,
  crate::pdi::datastore::token::{OpState, TokenDataStoreReadOnly},
  std::fmt::{self, Debug, Formatter},
};

#[derive(thiserror::Error)]
pub enum Error<L: TokenDataStoreReadOnly> {
  #[error("rejected: {0}")]
  Rejected(OpState),

  #[error("ledger error: {0}")]
  LedgerError(<L>::Error),

  #[error("num error: {0}")]
  NumError(NumError),

  #[error("hash weight error: {0}")]
  WeightError(anyhow::Error),
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum JSONError {
  #[error("invalid content type")]
  InvalidContentType,

  #[error("unsupport content type")]
  UnSupportContentType,

  #[error("invalid json string")]
  InvalidJson,

  #[error("not pdi json")]
  NotProtocolJson,

  #[error("tick mismatch: {0}")]
  TickMismatch(String),

  #[error("unsupport op: {0}")]
  UnSupportOp(String),
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum NumError {
  #[error("{op} overflow: original: {org}, other: {other}")]
  Overflow { op: String, org: Num, other: Num },

  #[error("invalid integer {0}")]
  InvalidInteger(Num),

  #[error("internal error: {0}")]
  InternalError(String),

  #[error("invalid number: {0}")]
  InvalidNum(String),
}

// the store itself need not be `Debug`, only its error
impl<L: TokenDataStoreReadOnly> Debug for Error<L> {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      Self::Rejected(state) => f.debug_tuple("Rejected").field(state).finish(),
      Self::LedgerError(e) => f.debug_tuple("LedgerError").field(e).finish(),
      Self::NumError(e) => f.debug_tuple("NumError").field(e).finish(),
      Self::WeightError(e) => f.debug_tuple("WeightError").field(e).finish(),
    }
  }
}

impl<L: TokenDataStoreReadOnly> From<OpState> for Error<L> {
  fn from(state: OpState) -> Self {
    Self::Rejected(state)
  }
}

impl<L: TokenDataStoreReadOnly> From<NumError> for Error<L> {
  fn from(e: NumError) -> Self {
    Self::NumError(e)
  }
}
