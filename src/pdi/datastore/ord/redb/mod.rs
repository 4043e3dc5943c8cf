mod read_only;
mod read_write;

pub use self::{
  read_only::{try_init_tables, OrdDbReader},
  read_write::OrdDbReadWriter,
};

use {
  super::{InscriptionEntry, OrdDataStoreReadOnly, OrdDataStoreReadWrite, TransferRecord},
  crate::{
    pdi::datastore::table::{decode, encode, ReaderWrapper, StoreError},
    InscriptionId,
  },
  redb::TableDefinition,
};

const INSCRIPTION_ID_TO_ENTRY: TableDefinition<&str, &[u8]> =
  TableDefinition::new("INSCRIPTION_ID_TO_ENTRY");
const INSCRIPTION_TRANSFERS: TableDefinition<&str, &[u8]> =
  TableDefinition::new("INSCRIPTION_TRANSFERS");
const STATE: TableDefinition<&str, &[u8]> = TableDefinition::new("STATE");

const CHECKPOINT_KEY: &str = "checkpoint";

fn transfer_key(inscription_id: &InscriptionId, index: u32) -> String {
  format!("{inscription_id}_{index:010}")
}

fn min_transfer_key(inscription_id: &InscriptionId) -> String {
  transfer_key(inscription_id, u32::MIN)
}

fn max_transfer_key(inscription_id: &InscriptionId) -> String {
  transfer_key(inscription_id, u32::MAX)
}
