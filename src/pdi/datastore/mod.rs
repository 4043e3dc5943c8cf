pub mod ord;
mod state;
pub(crate) mod table;
pub mod token;

pub use self::{
  ord::{OrdDataStoreReadOnly, OrdDataStoreReadWrite},
  state::{try_init_tables, StateReadOnly, StateReadWrite},
  table::StoreError,
  token::{TokenDataStoreReadOnly, TokenDataStoreReadWrite},
};

pub trait StateReader {
  type OrdReader: OrdDataStoreReadOnly;
  type TokenReader: TokenDataStoreReadOnly;

  fn ord(&self) -> &Self::OrdReader;
  fn token(&self) -> &Self::TokenReader;
}

pub trait StateRWriter {
  type OrdRWriter: OrdDataStoreReadWrite;
  type TokenRWriter: TokenDataStoreReadWrite;

  fn ord(&self) -> &Self::OrdRWriter;
  fn token(&self) -> &Self::TokenRWriter;
}
