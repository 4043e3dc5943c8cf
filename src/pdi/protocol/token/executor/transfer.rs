use {
  super::*,
  crate::pdi::{
    datastore::{
      ord::{InscriptionEntry, TransferRecord},
      token::TokenTransferRecord,
    },
    protocol::token::Op,
  },
};

/// Records a transfer inscription and holds its amount out of the creator's
/// available balance. Nothing moves until its first transfer.
pub(in crate::pdi::protocol::token) fn execute_inscribe<
  N: TokenDataStoreReadWrite,
  P: PointOracle,
>(
  context: &ExecutionContext<P>,
  store: &N,
  entry: &InscriptionEntry,
) -> Result<TokenTransferRecord> {
  let amt = match &entry.op {
    Op::Transfer { amt } => amt.valid().cloned(),
    _ => None,
  };

  let mut record = TokenTransferRecord {
    inscription_id: entry.inscription_id,
    inscription_number: entry.inscription_number,
    block_height: context.block.blockheight,
    timestamp: context.block.blocktime,
    from: entry.creator.clone(),
    to: None,
    amt: amt.clone(),
    state: OpState::Ok,
  };

  let result = match amt {
    Some(amt) if amt.is_positive() => reserve_transferable(store, &entry.creator, &amt),
    _ => Err(Error::Rejected(OpState::InvalidParams)),
  };
  record.state = settle(OpKind::Transfer, result)?;

  insert_record(store, OpRecord::Transfer(record.clone()))?;

  Ok(record)
}

/// Applies a recorded transfer inscription on its first move. Later moves
/// carry no token.
pub(in crate::pdi::protocol::token) fn execute_transfer<
  N: TokenDataStoreReadWrite,
  P: PointOracle,
>(
  context: &ExecutionContext<P>,
  store: &N,
  entry: &InscriptionEntry,
  transfer: &TransferRecord,
) -> Result<Option<TokenTransferRecord>> {
  if transfer.index != 1 {
    return Ok(None);
  }

  let mut record = store
    .get_op_records(&entry.inscription_id)
    .map_err(|e| anyhow!("failed to get op records! error: {e}"))?
    .into_iter()
    .find_map(|record| match record {
      OpRecord::Transfer(record) => Some(record),
      _ => None,
    })
    .ok_or_else(|| anyhow!("transfer record of {} not found", entry.inscription_id))?;

  if !record.state.is_ok() {
    log::debug!(
      "transfer {} moved with state {:?}, ignored",
      entry.inscription_id,
      record.state
    );
    return Ok(None);
  }

  // an output without an address sends the amount back to the sender
  let to = transfer.to.clone().unwrap_or_else(|| record.from.clone());
  let amt = record.amt.clone().unwrap_or_default();

  let result = release_transferable(store, &record.from, &amt)
    .and_then(|()| transfer_balance(store, &record.from, &to, &amt));
  record.state = settle(OpKind::Transfer, result)?;
  record.to = Some(to);

  log::info!(
    "transfer {} {amt} {} -> {:?} at {}: {:?}",
    entry.inscription_id,
    record.from,
    record.to,
    context.block.blockheight,
    record.state
  );

  // replaces the record stored at inscription time
  insert_record(store, OpRecord::Transfer(record.clone()))?;

  Ok(Some(record))
}
