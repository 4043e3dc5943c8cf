use {
  super::*,
  crate::{
    client::PointOracle,
    config::TokenConfig,
    pdi::{
      datastore::{
        ord::{InscriptionEntry, TransferRecord},
        token::TokenDataStoreReadWrite,
      },
      protocol::BlockContext,
    },
    InscriptionId, SatPoint,
  },
  bitcoin::{OutPoint, Txid},
  std::{cell::Cell, collections::HashMap, str::FromStr},
};

pub(crate) const HASH: &str = "0x80000000059671f6000000000000000000000000000000000000000000000001";

/// Ends like `HASH`, so it passes the inscribe commit check.
pub(crate) const MATCHING_TXID: &str =
  "0000000000000000000000000000000000000000000000000000000000000001";
pub(crate) const UNMATCHED_TXID: &str =
  "0000000000000000000000000000000000000000000000000000000000000002";

/// `string_number(HASH)`; chants on `HASH` are only valid at heights congruent to it.
pub(crate) const HASH_NUMBER: u64 = 7 * 48 + 49;

#[derive(Default)]
pub(crate) struct MockOracle {
  points: HashMap<String, u64>,
  queries: Cell<usize>,
}

impl MockOracle {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn with_point(mut self, hash: &str, point: u64) -> Self {
    self.points.insert(hash.to_string(), point);
    self
  }

  pub(crate) fn queries(&self) -> usize {
    self.queries.get()
  }
}

impl PointOracle for MockOracle {
  fn hash_point(&self, _timestamp: u32, hash: &str) -> crate::Result<u64> {
    self.queries.set(self.queries.get() + 1);
    Ok(self.points.get(hash).copied().unwrap_or_default())
  }
}

pub(crate) fn mixhash() -> MixHash {
  MixHash::from_str(HASH).unwrap()
}

pub(crate) fn num(s: &str) -> Num {
  Num::from_str(s).unwrap()
}

pub(crate) fn inscription_id(n: u32) -> InscriptionId {
  InscriptionId::from_str(&format!(
    "1111111111111111111111111111111111111111111111111111111111111111i{n}"
  ))
  .unwrap()
}

pub(crate) fn block(height: u64) -> BlockContext {
  BlockContext {
    blockheight: height,
    blocktime: 1_700_000_000,
  }
}

pub(crate) fn entry(number: u32, creator: &str, height: u64, op: Op) -> InscriptionEntry {
  InscriptionEntry {
    inscription_id: inscription_id(number),
    inscription_number: i64::from(number),
    block_height: height,
    timestamp: 1_700_000_000,
    creator: creator.to_string(),
    satpoint: SatPoint {
      outpoint: OutPoint {
        txid: Txid::from_str(MATCHING_TXID).unwrap(),
        vout: 0,
      },
      offset: 0,
    },
    value: 546,
    commit_txid: Txid::from_str(MATCHING_TXID).unwrap(),
    content: String::new(),
    op,
  }
}

pub(crate) fn transfer(entry: &InscriptionEntry, to: &str, height: u64) -> TransferRecord {
  TransferRecord {
    inscription_id: entry.inscription_id,
    inscription_number: entry.inscription_number,
    block_height: height,
    timestamp: 1_700_000_000,
    satpoint: SatPoint {
      outpoint: OutPoint {
        txid: Txid::from_str(UNMATCHED_TXID).unwrap(),
        vout: 0,
      },
      offset: 0,
    },
    from: Some(entry.creator.clone()),
    to: Some(to.to_string()),
    value: 546,
    index: 1,
  }
}

pub(crate) fn mint_op(amt: &str) -> Op {
  Op::Mint {
    amt: Param::Valid(num(amt)),
    lucky: Param::Missing,
  }
}

pub(crate) fn inscribe_op(amt: &str) -> Op {
  Op::Inscribe {
    ph: Param::Valid(mixhash()),
    text: Param::Valid("hello".into()),
    amt: Param::Valid(num(amt)),
    price: Param::Missing,
  }
}

pub(crate) fn chant_op() -> Op {
  Op::Chant {
    ph: Param::Valid(mixhash()),
  }
}

pub(crate) fn resonance_op(amt: &str) -> Op {
  Op::Resonance {
    ph: Param::Valid(mixhash()),
    amt: Param::Valid(num(amt)),
  }
}

/// Funds the mint pool the way a fresh index does.
pub(crate) fn seed_pool<N: TokenDataStoreReadWrite>(store: &N, config: &TokenConfig) {
  store
    .update_balance(
      &config.mint_pool_address,
      &Num::from(config.mint_pool_initial_amount),
    )
    .unwrap();
}

pub(crate) fn fund<N: TokenDataStoreReadWrite>(store: &N, address: &str, amt: &str) {
  store.update_balance(address, &num(amt)).unwrap();
}
