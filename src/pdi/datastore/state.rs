use {
  super::{
    ord::redb::{self as ord_redb, OrdDbReadWriter as OrdStateRW, OrdDbReader as OrdStateReader},
    table::StoreError,
    token::redb::{
      self as token_redb, TokenDataStore as TokenStateRW, TokenDataStoreReader as TokenStateReader,
    },
    StateRWriter, StateReader,
  },
  redb::{ReadTransaction, WriteTransaction},
};

/// Creates every table on a fresh database. Returns whether anything was created.
pub fn try_init_tables<'db, 'a>(
  wtx: &'a WriteTransaction<'db>,
  rtx: &'a ReadTransaction<'db>,
) -> Result<bool, StoreError> {
  let ord = ord_redb::try_init_tables(wtx, rtx)?;
  let token = token_redb::try_init_tables(wtx, rtx)?;
  Ok(ord || token)
}

/// StateReadOnly, based on `redb`, is an implementation of the StateReader trait.
pub struct StateReadOnly<'db, 'a> {
  ord: OrdStateReader<'db, 'a>,
  token: TokenStateReader<'db, 'a>,
}

impl<'db, 'a> StateReadOnly<'db, 'a> {
  pub fn new(rtx: &'a ReadTransaction<'db>) -> Self {
    Self {
      ord: OrdStateReader::new(rtx),
      token: TokenStateReader::new(rtx),
    }
  }
}

impl<'db, 'a> StateReader for StateReadOnly<'db, 'a> {
  type OrdReader = OrdStateReader<'db, 'a>;
  type TokenReader = TokenStateReader<'db, 'a>;

  fn ord(&self) -> &Self::OrdReader {
    &self.ord
  }

  fn token(&self) -> &Self::TokenReader {
    &self.token
  }
}

/// StateReadWrite, based on `redb`, is an implementation of the StateRWriter trait.
pub struct StateReadWrite<'db, 'a> {
  ord: OrdStateRW<'db, 'a>,
  token: TokenStateRW<'db, 'a>,
}

impl<'db, 'a> StateReadWrite<'db, 'a> {
  pub fn new(wtx: &'a WriteTransaction<'db>) -> Self {
    Self {
      ord: OrdStateRW::new(wtx),
      token: TokenStateRW::new(wtx),
    }
  }
}

impl<'db, 'a> StateRWriter for StateReadWrite<'db, 'a> {
  type OrdRWriter = OrdStateRW<'db, 'a>;
  type TokenRWriter = TokenStateRW<'db, 'a>;

  fn ord(&self) -> &Self::OrdRWriter {
    &self.ord
  }

  fn token(&self) -> &Self::TokenRWriter {
    &self.token
  }
}
