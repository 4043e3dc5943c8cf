pub mod redb;

pub use self::redb::{OrdDbReadWriter, OrdDbReader};

use {
  crate::{pdi::protocol::token::Op, InscriptionId, SatPoint},
  bitcoin::Txid,
  serde::{Deserialize, Serialize},
  std::fmt::{Debug, Display},
};

/// Recorded once when a protocol inscription is first seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InscriptionEntry {
  pub inscription_id: InscriptionId,
  pub inscription_number: i64,
  pub block_height: u64,
  pub timestamp: u32,
  pub creator: String,
  pub satpoint: SatPoint,
  pub value: u64,
  pub commit_txid: Txid,
  pub content: String,
  pub op: Op,
}

/// One step in an inscription's movement history. Index 0 is the genesis
/// location; a record at the zero satpoint means the inscription was spent as
/// a fee and is no longer tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
  pub inscription_id: InscriptionId,
  pub inscription_number: i64,
  pub block_height: u64,
  pub timestamp: u32,
  pub satpoint: SatPoint,
  pub from: Option<String>,
  pub to: Option<String>,
  pub value: u64,
  pub index: u32,
}

impl TransferRecord {
  pub fn is_spent_as_fee(&self) -> bool {
    self.satpoint.is_zero()
  }
}

pub trait OrdDataStoreReadOnly {
  type Error: Debug + Display;

  fn get_inscription_entry(
    &self,
    inscription_id: &InscriptionId,
  ) -> Result<Option<InscriptionEntry>, Self::Error>;

  fn get_inscription_count(&self) -> Result<u64, Self::Error>;

  fn get_transfers(&self, inscription_id: &InscriptionId)
    -> Result<Vec<TransferRecord>, Self::Error>;

  fn get_latest_transfer(
    &self,
    inscription_id: &InscriptionId,
  ) -> Result<Option<TransferRecord>, Self::Error>;

  /// The most recent record of every inscription, fee-spent ones included.
  fn get_latest_transfers(&self) -> Result<Vec<TransferRecord>, Self::Error>;

  fn get_checkpoint(&self) -> Result<Option<u64>, Self::Error>;
}

pub trait OrdDataStoreReadWrite: OrdDataStoreReadOnly {
  fn insert_inscription_entry(&self, entry: &InscriptionEntry) -> Result<(), Self::Error>;

  fn insert_transfer(&self, record: &TransferRecord) -> Result<(), Self::Error>;

  fn set_checkpoint(&self, height: u64) -> Result<(), Self::Error>;
}
