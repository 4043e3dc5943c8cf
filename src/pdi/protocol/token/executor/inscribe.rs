use {
  super::*,
  crate::pdi::{
    datastore::{
      ord::{InscriptionEntry, TransferRecord},
      token::{InscribeData, InscribeRecord, InscribeTransferRecord},
    },
    protocol::token::{
      distance,
      params::{INSCRIBE_POOL_PERCENT, PRICE_WEIGHT_MULTIPLE},
      string_number, Op, Param,
    },
  },
};

/// An inscribe candidate held until the end of its block.
#[derive(Debug, Clone)]
pub(in crate::pdi::protocol::token) struct PendingInscribe {
  pub(in crate::pdi::protocol::token) entry: InscriptionEntry,
  pub(in crate::pdi::protocol::token) state: OpState,
  hash: Option<MixHash>,
  amt: Option<Num>,
  price: Num,
  weight: Option<HashWeight>,
  distance: u64,
}

impl Competitor for PendingInscribe {
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

/// Runs every check that does not depend on the rest of the block.
pub(in crate::pdi::protocol::token) fn admit<N: TokenDataStoreReadWrite, P: PointOracle>(
  context: &ExecutionContext<P>,
  store: &N,
  entry: &InscriptionEntry,
) -> Result<PendingInscribe> {
  let mut pending = PendingInscribe {
    entry: entry.clone(),
    state: OpState::Ok,
    hash: None,
    amt: None,
    price: Num::zero(),
    weight: None,
    distance: 0,
  };

  let result = process_admission(context, store, &mut pending);
  pending.state = settle(OpKind::Inscribe, result)?;

  log::debug!(
    "inscribe {} admitted with state {:?}",
    entry.inscription_id,
    pending.state
  );

  Ok(pending)
}

fn process_admission<N: TokenDataStoreReadWrite, P: PointOracle>(
  context: &ExecutionContext<P>,
  store: &N,
  pending: &mut PendingInscribe,
) -> Result<(), Error<N>> {
  let entry = &pending.entry;
  let (ph, amt, price) = match &entry.op {
    Op::Inscribe { ph, amt, price, .. } => (ph, amt, price),
    _ => return Err(Error::Rejected(OpState::InvalidParams)),
  };

  pending.amt = amt.valid().cloned();

  let (hash, amt) = match (ph.valid(), amt.valid()) {
    (Some(hash), Some(amt)) if amt.is_positive() => (hash.clone(), amt.clone()),
    _ => return Err(Error::Rejected(OpState::InvalidParams)),
  };
  if matches!(price, Param::Invalid(_)) {
    return Err(Error::Rejected(OpState::InvalidParams));
  }
  pending.hash = Some(hash.clone());

  if store
    .get_inscribe_data(hash.as_str())
    .map_err(Error::LedgerError)?
    .is_some()
  {
    return Err(Error::Rejected(OpState::AlreadyExists));
  }

  let commit = string_number(&entry.commit_txid.to_string());
  if string_number(hash.as_str())
    .abs_diff(commit)
    .checked_rem(context.config.inscribe_hash_threshold)
    != Some(0)
  {
    return Err(Error::Rejected(OpState::HashUnmatch));
  }

  let weight = context.hash_weight(&hash)?;
  if let Some(price) = price.valid() {
    let max_price = weight.max_price()?;
    if *price > max_price {
      log::warn!(
        "inscribe {} price {price} clipped to {PRICE_WEIGHT_MULTIPLE} * weight {}",
        entry.inscription_id,
        weight.weight
      );
    }
    pending.price = price.clone().min(max_price);
  }
  pending.weight = Some(weight.clone());

  if amt < weight.weight {
    return Err(Error::Rejected(OpState::InvalidAmt));
  }

  if available_balance(store, &entry.creator)? < amt {
    return Err(Error::Rejected(OpState::InsufficientBalance));
  }

  pending.distance = distance(hash.as_str(), &entry.creator);

  Ok(())
}

/// Charges every candidate that passed admission and claims the hash for the
/// winner. Competition losers pay like the winner.
pub(in crate::pdi::protocol::token) fn flush<N: TokenDataStoreReadWrite, P: PointOracle>(
  context: &ExecutionContext<P>,
  store: &N,
  mut pending: PendingInscribe,
) -> Result<InscribeRecord> {
  if matches!(pending.state, OpState::Ok | OpState::CompetitionFailed) {
    let result = charge(context, store, &pending);
    let state = settle(OpKind::Inscribe, result)?;
    if !state.is_ok() {
      pending.state = state;
    }
  }

  let entry = &pending.entry;
  let text = match &entry.op {
    Op::Inscribe { text, .. } => text.valid().cloned(),
    _ => None,
  };

  if pending.state.is_ok() {
    if let Some(hash) = &pending.hash {
      store
        .set_inscribe_data(&InscribeData {
          hash: hash.to_string(),
          inscription_id: entry.inscription_id,
          owner: entry.creator.clone(),
          block_height: context.block.blockheight,
          timestamp: context.block.blocktime,
          text: text.clone(),
          price: pending.price.clone(),
          resonance_count: 0,
        })
        .map_err(|e| anyhow!("failed to set inscribe data! error: {e}"))?;

      log::info!(
        "inscribe {} claimed {hash} for {}",
        entry.inscription_id,
        entry.creator
      );
    }
  }

  let record = InscribeRecord {
    inscription_id: entry.inscription_id,
    inscription_number: entry.inscription_number,
    block_height: context.block.blockheight,
    timestamp: context.block.blocktime,
    address: entry.creator.clone(),
    hash: pending
      .hash
      .as_ref()
      .map(ToString::to_string)
      .unwrap_or_default(),
    text,
    amt: pending.amt.clone(),
    price: pending.price.clone(),
    point: pending.weight.as_ref().map(|w| w.point).unwrap_or_default(),
    weight: pending
      .weight
      .as_ref()
      .map(|w| w.weight.clone())
      .unwrap_or_default(),
    state: pending.state,
  };

  insert_record(store, OpRecord::Inscribe(record.clone()))?;

  Ok(record)
}

fn charge<N: TokenDataStoreReadWrite, P: PointOracle>(
  context: &ExecutionContext<P>,
  store: &N,
  pending: &PendingInscribe,
) -> Result<(), Error<N>> {
  let amt = match &pending.amt {
    Some(amt) => amt,
    None => return Err(Error::Rejected(OpState::InvalidParams)),
  };
  let payer = &pending.entry.creator;

  // the balance may have moved since admission
  if available_balance(store, payer)? < *amt {
    return Err(Error::Rejected(OpState::InsufficientBalance));
  }

  let pool_amt = amt.percent(INSCRIBE_POOL_PERCENT)?;
  let service_charge = amt.checked_sub(&pool_amt)?;

  transfer_balance(store, payer, &context.config.mint_pool_address, &pool_amt)?;
  transfer_balance(
    store,
    payer,
    &context.config.foundation_address,
    &service_charge,
  )?;

  Ok(())
}

/// Moves ownership of a claimed hash along with the first transfer of the
/// inscription that claimed it.
pub(in crate::pdi::protocol::token) fn execute_transfer<
  N: TokenDataStoreReadWrite,
  P: PointOracle,
>(
  context: &ExecutionContext<P>,
  store: &N,
  entry: &InscriptionEntry,
  transfer: &TransferRecord,
) -> Result<Option<InscribeTransferRecord>> {
  if transfer.index != 1 {
    return Ok(None);
  }

  let claimed = store
    .get_op_records(&entry.inscription_id)
    .map_err(|e| anyhow!("failed to get op records! error: {e}"))?
    .into_iter()
    .find_map(|record| match record {
      OpRecord::Inscribe(record) if record.state.is_ok() => Some(record),
      _ => None,
    });

  let inscribe = match claimed {
    Some(inscribe) => inscribe,
    None => {
      log::debug!(
        "inscription {} moved without a claimed hash",
        entry.inscription_id
      );
      return Ok(None);
    }
  };

  let data = store
    .get_inscribe_data(&inscribe.hash)
    .map_err(|e| anyhow!("failed to get inscribe data! error: {e}"))?
    .ok_or_else(|| anyhow!("inscribe data of {} not found", inscribe.hash))?;

  let mut record = InscribeTransferRecord {
    inscription_id: entry.inscription_id,
    inscription_number: entry.inscription_number,
    block_height: context.block.blockheight,
    timestamp: context.block.blocktime,
    hash: inscribe.hash.clone(),
    from: data.owner.clone(),
    to: transfer.to.clone(),
    state: OpState::Ok,
  };

  let result = process_transfer(store, data, transfer);
  record.state = settle(OpKind::Inscribe, result)?;

  insert_record(store, OpRecord::InscribeTransfer(record.clone()))?;

  Ok(Some(record))
}

fn process_transfer<N: TokenDataStoreReadWrite>(
  store: &N,
  mut data: InscribeData,
  transfer: &TransferRecord,
) -> Result<(), Error<N>> {
  if transfer.block_height <= data.block_height {
    return Err(Error::Rejected(OpState::PermissionDenied));
  }

  // an output without an address leaves the hash with its owner
  let to = match &transfer.to {
    Some(to) => to.clone(),
    None => return Ok(()),
  };

  log::info!("hash {} owner {} -> {to}", data.hash, data.owner);

  data.owner = to;
  store.set_inscribe_data(&data).map_err(Error::LedgerError)
}
