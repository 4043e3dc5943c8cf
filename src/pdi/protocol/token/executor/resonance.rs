use {
  super::*,
  crate::pdi::{
    datastore::{
      ord::{InscriptionEntry, TransferRecord},
      token::{InscribeData, ResonanceRecord},
    },
    protocol::token::{distance, params::RESONANCE_OWNER_PERCENT, Op},
  },
};

/// A resonance candidate held until the end of its block.
#[derive(Debug, Clone)]
pub(in crate::pdi::protocol::token) struct PendingResonance {
  pub(in crate::pdi::protocol::token) entry: InscriptionEntry,
  pub(in crate::pdi::protocol::token) state: OpState,
  to: Option<String>,
  hash: Option<MixHash>,
  amt: Option<Num>,
  distance: u64,
}

impl Competitor for PendingResonance {
  fn hash(&self) -> Option<&MixHash> {
    self.hash.as_ref()
  }

  fn state(&self) -> OpState {
    self.state
  }

  fn set_state(&mut self, state: OpState) {
    self.state = state;
  }

  fn rank(&self) -> (u64, i64) {
    (self.distance, self.entry.inscription_number)
  }
}

/// Admits a resonance on the first move of its inscription. The payer is the
/// inscription's creator and the destination of the move must be the owner of
/// the hash.
pub(in crate::pdi::protocol::token) fn admit<N: TokenDataStoreReadWrite, P: PointOracle>(
  context: &ExecutionContext<P>,
  store: &N,
  entry: &InscriptionEntry,
  transfer: &TransferRecord,
) -> Result<PendingResonance> {
  let mut pending = PendingResonance {
    entry: entry.clone(),
    state: OpState::Ok,
    to: transfer.to.clone(),
    hash: None,
    amt: None,
    distance: 0,
  };

  let result = process_admission(context, store, &mut pending);
  pending.state = settle(OpKind::Resonance, result)?;

  log::debug!(
    "resonance {} admitted with state {:?}",
    entry.inscription_id,
    pending.state
  );

  Ok(pending)
}

fn process_admission<N: TokenDataStoreReadWrite, P: PointOracle>(
  context: &ExecutionContext<P>,
  store: &N,
  pending: &mut PendingResonance,
) -> Result<(), Error<N>> {
  let (ph, amt) = match &pending.entry.op {
    Op::Resonance { ph, amt } => (ph, amt),
    _ => return Err(Error::Rejected(OpState::InvalidParams)),
  };

  pending.amt = amt.valid().cloned();

  let (hash, amt) = match (ph.valid(), amt.valid()) {
    (Some(hash), Some(amt)) if amt.is_positive() => (hash.clone(), amt.clone()),
    _ => return Err(Error::Rejected(OpState::InvalidParams)),
  };
  pending.hash = Some(hash.clone());

  let data = match store
    .get_inscribe_data(hash.as_str())
    .map_err(Error::LedgerError)?
  {
    Some(data) => prune(context, store, data)?,
    None => return Err(Error::Rejected(OpState::HashNotFound)),
  };

  let payer = &pending.entry.creator;
  if store
    .get_resonance(hash.as_str(), payer)
    .map_err(Error::LedgerError)?
    .is_some()
  {
    return Err(Error::Rejected(OpState::AlreadyExists));
  }
  if *payer == data.owner {
    return Err(Error::Rejected(OpState::PermissionDenied));
  }

  if !data.price.is_positive() {
    return Err(Error::Rejected(OpState::InvalidPrice));
  }

  if amt < data.price {
    return Err(Error::Rejected(OpState::InvalidAmt));
  }

  if available_balance(store, payer)? < amt {
    return Err(Error::Rejected(OpState::InsufficientBalance));
  }

  if pending.to.as_ref() != Some(&data.owner) {
    return Err(Error::Rejected(OpState::OutAddressIsNotOwner));
  }

  if data.resonance_count >= context.config.resonance_max_count {
    return Err(Error::Rejected(OpState::OutOfResonanceLimit));
  }

  let chanted = store
    .get_last_chant(payer)
    .map_err(Error::LedgerError)?
    .map(|height| {
      context.block.blockheight.saturating_sub(height) <= context.config.chant_valid_blocks
    })
    .unwrap_or_default();
  if !chanted {
    return Err(Error::Rejected(OpState::HasNoValidChant));
  }

  pending.distance = distance(hash.as_str(), payer);

  Ok(())
}

/// Drops resonators whose chant right has lapsed and recounts the rest.
fn prune<N: TokenDataStoreReadWrite, P: PointOracle>(
  context: &ExecutionContext<P>,
  store: &N,
  mut data: InscribeData,
) -> Result<InscribeData, Error<N>> {
  let relations = store
    .get_resonances(&data.hash)
    .map_err(Error::LedgerError)?;

  let mut count = 0;
  for relation in relations {
    if context.is_live_resonator(store, &relation)? {
      count += 1;
      continue;
    }

    log::info!("resonance of {} on {} lapsed", relation.address, data.hash);
    store
      .remove_resonance(&data.hash, &relation.address)
      .map_err(Error::LedgerError)?;
  }

  if count != data.resonance_count {
    data.resonance_count = count;
    store.set_inscribe_data(&data).map_err(Error::LedgerError)?;
  }

  Ok(data)
}

/// Pays the owner and the foundation for the winning candidates.
pub(in crate::pdi::protocol::token) fn flush<N: TokenDataStoreReadWrite, P: PointOracle>(
  context: &ExecutionContext<P>,
  store: &N,
  pending: PendingResonance,
) -> Result<ResonanceRecord> {
  let entry = &pending.entry;
  let mut record = ResonanceRecord {
    inscription_id: entry.inscription_id,
    inscription_number: entry.inscription_number,
    block_height: context.block.blockheight,
    timestamp: context.block.blocktime,
    address: entry.creator.clone(),
    to: pending.to.clone(),
    hash: pending
      .hash
      .as_ref()
      .map(ToString::to_string)
      .unwrap_or_default(),
    amt: pending.amt.clone(),
    owner_bonus: Num::zero(),
    foundation_bonus: Num::zero(),
    state: pending.state,
  };

  if pending.state.is_ok() {
    let result = resonate(context, store, &pending, &mut record);
    record.state = settle(OpKind::Resonance, result)?;
  }

  insert_record(store, OpRecord::Resonance(record.clone()))?;

  Ok(record)
}

fn resonate<N: TokenDataStoreReadWrite, P: PointOracle>(
  context: &ExecutionContext<P>,
  store: &N,
  pending: &PendingResonance,
  record: &mut ResonanceRecord,
) -> Result<(), Error<N>> {
  let (hash, amt, owner) = match (&pending.hash, &pending.amt, &pending.to) {
    (Some(hash), Some(amt), Some(owner)) => (hash, amt, owner),
    _ => return Err(Error::Rejected(OpState::InvalidParams)),
  };
  let payer = &pending.entry.creator;

  let mut data = store
    .get_inscribe_data(hash.as_str())
    .map_err(Error::LedgerError)?
    .ok_or(Error::Rejected(OpState::HashNotFound))?;

  // ownership may have moved since admission
  if data.owner != *owner {
    return Err(Error::Rejected(OpState::OutAddressIsNotOwner));
  }

  // so may the balance
  if available_balance(store, payer)? < *amt {
    return Err(Error::Rejected(OpState::InsufficientBalance));
  }

  let owner_bonus = amt.percent(RESONANCE_OWNER_PERCENT)?;
  let foundation_bonus = amt.checked_sub(&owner_bonus)?;

  transfer_balance(store, payer, owner, &owner_bonus)?;
  transfer_balance(
    store,
    payer,
    &context.config.foundation_address,
    &foundation_bonus,
  )?;

  data.resonance_count += 1;
  store.set_inscribe_data(&data).map_err(Error::LedgerError)?;
  store
    .insert_resonance(&ResonanceRelation {
      hash: hash.to_string(),
      address: payer.clone(),
      inscription_id: pending.entry.inscription_id,
      block_height: context.block.blockheight,
      timestamp: context.block.blocktime,
    })
    .map_err(Error::LedgerError)?;

  log::info!(
    "resonance {} on {hash} by {payer}: {owner_bonus} to {owner}, {foundation_bonus} to foundation",
    pending.entry.inscription_id
  );

  record.owner_bonus = owner_bonus;
  record.foundation_bonus = foundation_bonus;

  Ok(())
}

#[cfg(test)]
mod tests {
  use {
    super::*,
    crate::pdi::{
      datastore::token::TokenDataStore,
      protocol::token::test::{
        block, entry, fund, inscription_id, num, resonance_op, transfer, MockOracle, HASH,
      },
    },
    pretty_assertions::assert_eq,
    redb::Database,
    tempfile::NamedTempFile,
  };

  const HEIGHT: u64 = 20_000;

  fn claim<N: TokenDataStoreReadWrite>(store: &N, price: &str, resonance_count: u32) {
    store
      .set_inscribe_data(&InscribeData {
        hash: HASH.into(),
        inscription_id: inscription_id(99),
        owner: "alice".into(),
        block_height: 1,
        timestamp: 1,
        text: None,
        price: num(price),
        resonance_count,
      })
      .unwrap();
  }

  fn resonate_once<N: TokenDataStoreReadWrite, P: PointOracle>(
    context: &ExecutionContext<P>,
    store: &N,
    number: u32,
    payer: &str,
    to: &str,
  ) -> ResonanceRecord {
    let inscription = entry(number, payer, HEIGHT, resonance_op("10"));
    let pending = admit(context, store, &inscription, &transfer(&inscription, to, HEIGHT)).unwrap();
    flush(context, store, pending).unwrap()
  }

  #[test]
  fn resonance_pays_owner_and_foundation() {
    let dbfile = NamedTempFile::new().unwrap();
    let db = Database::create(dbfile.path()).unwrap();
    let wtx = db.begin_write().unwrap();
    let store = TokenDataStore::new(&wtx);
    let config = TokenConfig::default();
    claim(&store, "10", 0);
    fund(&store, "bob", "100");
    store.set_last_chant("bob", HEIGHT - 100).unwrap();
    let oracle = MockOracle::new();
    let weights = HashWeightOracle::new(&oracle);
    let context = ExecutionContext {
      block: block(HEIGHT),
      config: &config,
      weights: &weights,
    };

    let record = resonate_once(&context, &store, 1, "bob", "alice");

    assert_eq!(record.state, OpState::Ok);
    assert_eq!(record.owner_bonus, num("8"));
    assert_eq!(record.foundation_bonus, num("2"));
    assert_eq!(store.get_balance("bob").unwrap(), num("90"));
    assert_eq!(store.get_balance("alice").unwrap(), num("8"));
    assert_eq!(store.get_balance("0x1").unwrap(), num("2"));
    assert_eq!(store.get_inscribe_data(HASH).unwrap().unwrap().resonance_count, 1);
    assert!(store.get_resonance(HASH, "bob").unwrap().is_some());

    assert_eq!(
      resonate_once(&context, &store, 2, "bob", "alice").state,
      OpState::AlreadyExists
    );
  }

  #[test]
  fn rejections_in_check_order() {
    let dbfile = NamedTempFile::new().unwrap();
    let db = Database::create(dbfile.path()).unwrap();
    let wtx = db.begin_write().unwrap();
    let store = TokenDataStore::new(&wtx);
    let config = TokenConfig::default();
    let oracle = MockOracle::new();
    let weights = HashWeightOracle::new(&oracle);
    let context = ExecutionContext {
      block: block(HEIGHT),
      config: &config,
      weights: &weights,
    };

    assert_eq!(
      resonate_once(&context, &store, 1, "bob", "alice").state,
      OpState::HashNotFound
    );

    claim(&store, "0", 0);
    assert_eq!(
      resonate_once(&context, &store, 2, "alice", "alice").state,
      OpState::PermissionDenied
    );
    assert_eq!(
      resonate_once(&context, &store, 3, "bob", "alice").state,
      OpState::InvalidPrice
    );

    claim(&store, "11", 0);
    assert_eq!(
      resonate_once(&context, &store, 4, "bob", "alice").state,
      OpState::InvalidAmt
    );

    claim(&store, "10", 0);
    assert_eq!(
      resonate_once(&context, &store, 5, "bob", "alice").state,
      OpState::InsufficientBalance
    );

    fund(&store, "bob", "10");
    assert_eq!(
      resonate_once(&context, &store, 6, "bob", "carol").state,
      OpState::OutAddressIsNotOwner
    );

    let limited_config = TokenConfig {
      resonance_max_count: 0,
      ..TokenConfig::default()
    };
    let limited = ExecutionContext {
      block: block(HEIGHT),
      config: &limited_config,
      weights: &weights,
    };
    assert_eq!(
      resonate_once(&limited, &store, 7, "bob", "alice").state,
      OpState::OutOfResonanceLimit
    );

    assert_eq!(
      resonate_once(&context, &store, 8, "bob", "alice").state,
      OpState::HasNoValidChant
    );

    store.set_last_chant("bob", HEIGHT - 12_801).unwrap();
    assert_eq!(
      resonate_once(&context, &store, 9, "bob", "alice").state,
      OpState::HasNoValidChant
    );

    store.set_last_chant("bob", HEIGHT - 12_800).unwrap();
    assert_eq!(
      resonate_once(&context, &store, 10, "bob", "alice").state,
      OpState::Ok
    );
    assert_eq!(store.get_balance("bob").unwrap(), Num::zero());
  }

  #[test]
  fn lapsed_resonators_are_pruned() {
    let dbfile = NamedTempFile::new().unwrap();
    let db = Database::create(dbfile.path()).unwrap();
    let wtx = db.begin_write().unwrap();
    let store = TokenDataStore::new(&wtx);
    let config = TokenConfig::default();
    claim(&store, "10", 15);
    for i in 0..15u32 {
      let address = format!("old{i}");
      store
        .insert_resonance(&ResonanceRelation {
          hash: HASH.into(),
          address: address.clone(),
          inscription_id: inscription_id(i),
          block_height: 1,
          timestamp: 1,
        })
        .unwrap();
      if i < 14 {
        store.set_last_chant(&address, 2).unwrap();
      } else {
        store.set_last_chant(&address, HEIGHT - 1).unwrap();
      }
    }
    fund(&store, "bob", "10");
    store.set_last_chant("bob", HEIGHT - 1).unwrap();
    let oracle = MockOracle::new();
    let weights = HashWeightOracle::new(&oracle);
    let context = ExecutionContext {
      block: block(HEIGHT),
      config: &config,
      weights: &weights,
    };

    let record = resonate_once(&context, &store, 100, "bob", "alice");

    assert_eq!(record.state, OpState::Ok);
    assert_eq!(store.get_resonances(HASH).unwrap().len(), 2);
    assert_eq!(store.get_inscribe_data(HASH).unwrap().unwrap().resonance_count, 2);
  }

  #[test]
  fn owner_change_before_flush_is_not_paid() {
    let dbfile = NamedTempFile::new().unwrap();
    let db = Database::create(dbfile.path()).unwrap();
    let wtx = db.begin_write().unwrap();
    let store = TokenDataStore::new(&wtx);
    let config = TokenConfig::default();
    claim(&store, "10", 0);
    fund(&store, "bob", "100");
    store.set_last_chant("bob", HEIGHT - 1).unwrap();
    let oracle = MockOracle::new();
    let weights = HashWeightOracle::new(&oracle);
    let context = ExecutionContext {
      block: block(HEIGHT),
      config: &config,
      weights: &weights,
    };

    let inscription = entry(1, "bob", HEIGHT, resonance_op("10"));
    let pending = admit(
      &context,
      &store,
      &inscription,
      &transfer(&inscription, "alice", HEIGHT),
    )
    .unwrap();
    assert_eq!(pending.state, OpState::Ok);

    // the hash moves to carol later in the block
    let mut data = store.get_inscribe_data(HASH).unwrap().unwrap();
    data.owner = "carol".into();
    store.set_inscribe_data(&data).unwrap();

    let record = flush(&context, &store, pending).unwrap();

    assert_eq!(record.state, OpState::OutAddressIsNotOwner);
    assert_eq!(store.get_balance("bob").unwrap(), num("100"));
    assert_eq!(store.get_balance("alice").unwrap(), Num::zero());
    assert_eq!(store.get_inscribe_data(HASH).unwrap().unwrap().resonance_count, 0);
  }
}
