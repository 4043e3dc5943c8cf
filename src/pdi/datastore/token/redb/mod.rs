mod read_only;
mod read_write;

pub use self::{
  read_only::{try_init_tables, TokenDataStoreReader},
  read_write::TokenDataStore,
};

use {
  super::{
    InscribeData, OpRecord, ResonanceRelation, TokenDataStoreReadOnly, TokenDataStoreReadWrite,
  },
  crate::{
    pdi::{
      datastore::table::{decode, encode, ReaderWrapper, StoreError},
      protocol::token::Num,
    },
    InscriptionId,
  },
  redb::TableDefinition,
};

#[cfg(test)]
use super::{ChantRecord, OpState, SetPriceRecord};

const TOKEN_BALANCES: TableDefinition<&str, &[u8]> = TableDefinition::new("TOKEN_BALANCES");
const TRANSFERABLE_BALANCES: TableDefinition<&str, &[u8]> =
  TableDefinition::new("TRANSFERABLE_BALANCES");
const INSCRIBE_DATA: TableDefinition<&str, &[u8]> = TableDefinition::new("INSCRIBE_DATA");
const RESONANCES: TableDefinition<&str, &[u8]> = TableDefinition::new("RESONANCES");
const USER_LAST_CHANT: TableDefinition<&str, &[u8]> = TableDefinition::new("USER_LAST_CHANT");

const MINT_RECORDS: TableDefinition<&str, &[u8]> = TableDefinition::new("MINT_RECORDS");
const INSCRIBE_RECORDS: TableDefinition<&str, &[u8]> = TableDefinition::new("INSCRIBE_RECORDS");
const INSCRIBE_TRANSFER_RECORDS: TableDefinition<&str, &[u8]> =
  TableDefinition::new("INSCRIBE_TRANSFER_RECORDS");
const CHANT_RECORDS: TableDefinition<&str, &[u8]> = TableDefinition::new("CHANT_RECORDS");
const SET_PRICE_RECORDS: TableDefinition<&str, &[u8]> = TableDefinition::new("SET_PRICE_RECORDS");
const RESONANCE_RECORDS: TableDefinition<&str, &[u8]> = TableDefinition::new("RESONANCE_RECORDS");
const TRANSFER_RECORDS: TableDefinition<&str, &[u8]> = TableDefinition::new("TRANSFER_RECORDS");

fn resonance_key(hash: &str, address: &str) -> String {
  format!("{hash}_{address}")
}

fn min_resonance_key(hash: &str) -> String {
  format!("{hash}_")
}

// '`' sorts right after '_'
fn max_resonance_key(hash: &str) -> String {
  format!("{hash}`")
}

fn record_table(
  record: &OpRecord,
) -> (
  TableDefinition<'static, &'static str, &'static [u8]>,
  InscriptionId,
) {
  match record {
    OpRecord::Mint(r) => (MINT_RECORDS, r.inscription_id),
    OpRecord::Inscribe(r) => (INSCRIBE_RECORDS, r.inscription_id),
    OpRecord::InscribeTransfer(r) => (INSCRIBE_TRANSFER_RECORDS, r.inscription_id),
    OpRecord::Chant(r) => (CHANT_RECORDS, r.inscription_id),
    OpRecord::SetPrice(r) => (SET_PRICE_RECORDS, r.inscription_id),
    OpRecord::Resonance(r) => (RESONANCE_RECORDS, r.inscription_id),
    OpRecord::Transfer(r) => (TRANSFER_RECORDS, r.inscription_id),
  }
}

fn encode_record(record: &OpRecord) -> Result<Vec<u8>, StoreError> {
  match record {
    OpRecord::Mint(r) => encode(r),
    OpRecord::Inscribe(r) => encode(r),
    OpRecord::InscribeTransfer(r) => encode(r),
    OpRecord::Chant(r) => encode(r),
    OpRecord::SetPrice(r) => encode(r),
    OpRecord::Resonance(r) => encode(r),
    OpRecord::Transfer(r) => encode(r),
  }
}
