use {
  super::{Error, HashWeight, HashWeightOracle, MixHash, Num, OpKind},
  crate::{
    client::PointOracle,
    config::TokenConfig,
    pdi::{
      datastore::token::{
        OpRecord, OpState, ResonanceRelation, TokenDataStoreReadOnly, TokenDataStoreReadWrite,
      },
      protocol::BlockContext,
    },
    Result,
  },
  anyhow::anyhow,
};

pub(super) mod chant;
pub(super) mod inscribe;
pub(super) mod mint;
pub(super) mod resonance;
pub(super) mod set_price;
pub(super) mod transfer;

pub struct ExecutionContext<'a, P> {
  pub block: BlockContext,
  pub config: &'a TokenConfig,
  pub weights: &'a HashWeightOracle<P>,
}

impl<'a, P: PointOracle> ExecutionContext<'a, P> {
  pub(super) fn hash_weight<L: TokenDataStoreReadOnly>(
    &self,
    hash: &MixHash,
  ) -> Result<HashWeight, Error<L>> {
    self
      .weights
      .query_hash_weight(self.block.blocktime, hash)
      .map_err(Error::WeightError)
  }

  /// Whether `address` may still act on `hash` through a resonance. A
  /// resonator stays live while their last chant, or the resonance itself, is
  /// within the chant validity window.
  pub(super) fn is_live_resonator<L: TokenDataStoreReadOnly>(
    &self,
    store: &L,
    relation: &ResonanceRelation,
  ) -> Result<bool, Error<L>> {
    let last_chant = store
      .get_last_chant(&relation.address)
      .map_err(Error::LedgerError)?
      .unwrap_or_default()
      .max(relation.block_height);

    Ok(self.block.blockheight.saturating_sub(last_chant) <= self.config.chant_valid_blocks)
  }
}

/// A candidate in a same-block, same-hash competition.
pub(super) trait Competitor {
  fn hash(&self) -> Option<&MixHash>;

  fn state(&self) -> OpState;

  fn set_state(&mut self, state: OpState);

  /// Lower ranks win: distance first, then inscription number.
  fn rank(&self) -> (u64, i64);
}

/// Admits `candidate` against the pending candidates of the block. Only one
/// candidate per hash is OK at any time, so the winner does not depend on the
/// order candidates arrive in.
pub(super) fn compete<T: Competitor>(pending: &mut [T], candidate: &mut T) {
  if !candidate.state().is_ok() {
    return;
  }

  let hash = match candidate.hash() {
    Some(hash) => hash.clone(),
    None => return,
  };

  for other in pending.iter_mut() {
    if !other.state().is_ok() || other.hash() != Some(&hash) {
      continue;
    }

    if other.rank() <= candidate.rank() {
      log::warn!(
        "competition failed on {hash}, rank {:?} loses to {:?}",
        candidate.rank(),
        other.rank()
      );
      candidate.set_state(OpState::CompetitionFailed);
      break;
    }

    log::warn!(
      "competition failed on {hash}, rank {:?} loses to {:?}",
      other.rank(),
      candidate.rank()
    );
    other.set_state(OpState::CompetitionFailed);
  }
}

/// Turns a handler outcome into the state recorded for it. Rejections are
/// states; anything else aborts the block.
pub(super) fn settle<L: TokenDataStoreReadOnly>(
  kind: OpKind,
  result: Result<(), Error<L>>,
) -> Result<OpState> {
  match result {
    Ok(()) => Ok(OpState::Ok),
    Err(Error::Rejected(state)) => Ok(state),
    Err(e) => Err(anyhow!("{kind} execute exception: {e}")),
  }
}

pub(super) fn insert_record<N: TokenDataStoreReadWrite>(
  store: &N,
  record: OpRecord,
) -> Result<OpRecord> {
  log::debug!("{:?}", record);
  store
    .insert_op_record(&record)
    .map_err(|e| anyhow!("failed to add op record to state! error: {e}"))?;
  Ok(record)
}

pub(super) fn balance<L: TokenDataStoreReadOnly>(
  store: &L,
  address: &str,
) -> Result<Num, Error<L>> {
  store.get_balance(address).map_err(Error::LedgerError)
}

/// The balance minus what pending transfer inscriptions hold.
pub(super) fn available_balance<L: TokenDataStoreReadOnly>(
  store: &L,
  address: &str,
) -> Result<Num, Error<L>> {
  let balance = balance(store, address)?;
  let transferable = store
    .get_transferable_balance(address)
    .map_err(Error::LedgerError)?;

  if transferable >= balance {
    return Ok(Num::zero());
  }

  Ok(balance.checked_sub(&transferable)?)
}

/// Holds `amt` of the available balance for a transfer inscription.
pub(super) fn reserve_transferable<N: TokenDataStoreReadWrite>(
  store: &N,
  address: &str,
  amt: &Num,
) -> Result<(), Error<N>> {
  if available_balance(store, address)? < *amt {
    return Err(Error::Rejected(OpState::InsufficientBalance));
  }

  let transferable = store
    .get_transferable_balance(address)
    .map_err(Error::LedgerError)?
    .checked_add(amt)?;
  store
    .update_transferable_balance(address, &transferable)
    .map_err(Error::LedgerError)
}

/// Returns a reservation made by `reserve_transferable`.
pub(super) fn release_transferable<N: TokenDataStoreReadWrite>(
  store: &N,
  address: &str,
  amt: &Num,
) -> Result<(), Error<N>> {
  let transferable = store
    .get_transferable_balance(address)
    .map_err(Error::LedgerError)?;
  if transferable < *amt {
    return Err(Error::Rejected(OpState::InsufficientBalance));
  }

  store
    .update_transferable_balance(address, &transferable.checked_sub(amt)?)
    .map_err(Error::LedgerError)
}

/// Moves `amt` from one account to another. Only the available balance can
/// be spent. On failure neither account changes.
pub fn transfer_balance<N: TokenDataStoreReadWrite>(
  store: &N,
  from: &str,
  to: &str,
  amt: &Num,
) -> Result<(), Error<N>> {
  if available_balance(store, from)? < *amt {
    return Err(Error::Rejected(OpState::InsufficientBalance));
  }

  let from_balance = balance(store, from)?;

  if from == to {
    return Ok(());
  }

  let from_balance = from_balance.checked_sub(amt)?;
  let to_balance = balance(store, to)?.checked_add(amt)?;

  store
    .update_balance(from, &from_balance)
    .map_err(Error::LedgerError)?;
  store
    .update_balance(to, &to_balance)
    .map_err(Error::LedgerError)?;

  Ok(())
}

/// Removes `amt` from circulation.
pub(super) fn burn<N: TokenDataStoreReadWrite>(
  store: &N,
  address: &str,
  amt: &Num,
) -> Result<(), Error<N>> {
  if available_balance(store, address)? < *amt {
    return Err(Error::Rejected(OpState::InsufficientBalance));
  }

  store
    .update_balance(address, &balance(store, address)?.checked_sub(amt)?)
    .map_err(Error::LedgerError)
}
