pub mod records;
pub mod redb;
mod state;

pub use self::{
  records::*,
  redb::{TokenDataStore, TokenDataStoreReader},
  state::OpState,
};

use {
  crate::{pdi::protocol::token::Num, InscriptionId},
  std::fmt::{Debug, Display},
};

pub trait TokenDataStoreReadOnly {
  type Error: Debug + Display;

  /// Zero for addresses that never held the token.
  fn get_balance(&self, address: &str) -> Result<Num, Self::Error>;

  /// The part of the balance held by transfer inscriptions that have not
  /// moved yet.
  fn get_transferable_balance(&self, address: &str) -> Result<Num, Self::Error>;

  fn get_inscribe_data(&self, hash: &str) -> Result<Option<InscribeData>, Self::Error>;

  fn get_resonance(
    &self,
    hash: &str,
    address: &str,
  ) -> Result<Option<ResonanceRelation>, Self::Error>;

  fn get_resonances(&self, hash: &str) -> Result<Vec<ResonanceRelation>, Self::Error>;

  fn get_last_chant(&self, address: &str) -> Result<Option<u64>, Self::Error>;

  fn get_op_records(&self, inscription_id: &InscriptionId) -> Result<Vec<OpRecord>, Self::Error>;
}

pub trait TokenDataStoreReadWrite: TokenDataStoreReadOnly {
  fn update_balance(&self, address: &str, balance: &Num) -> Result<(), Self::Error>;

  fn update_transferable_balance(&self, address: &str, amount: &Num) -> Result<(), Self::Error>;

  fn set_inscribe_data(&self, data: &InscribeData) -> Result<(), Self::Error>;

  fn insert_resonance(&self, relation: &ResonanceRelation) -> Result<(), Self::Error>;

  fn remove_resonance(&self, hash: &str, address: &str) -> Result<(), Self::Error>;

  fn set_last_chant(&self, address: &str, block_height: u64) -> Result<(), Self::Error>;

  fn insert_op_record(&self, record: &OpRecord) -> Result<(), Self::Error>;
}
