use {
  super::*,
  crate::pdi::{
    datastore::{ord::InscriptionEntry, token::ChantRecord},
    protocol::token::{params::CHANT_USER_PERCENT, string_number, Op},
  },
  std::collections::HashSet,
};

pub(in crate::pdi::protocol::token) fn execute<N: TokenDataStoreReadWrite, P: PointOracle>(
  context: &ExecutionContext<P>,
  store: &N,
  entry: &InscriptionEntry,
  chanted: &mut HashSet<String>,
) -> Result<ChantRecord> {
  let mut record = ChantRecord {
    inscription_id: entry.inscription_id,
    inscription_number: entry.inscription_number,
    block_height: context.block.blockheight,
    timestamp: context.block.blocktime,
    address: entry.creator.clone(),
    hash: String::new(),
    owner: None,
    stamina: Num::zero(),
    user_bonus: Num::zero(),
    owner_bonus: Num::zero(),
    state: OpState::Ok,
  };

  let result = process_chant(context, store, entry, chanted, &mut record);
  record.state = settle(OpKind::Chant, result)?;

  insert_record(store, OpRecord::Chant(record.clone()))?;

  Ok(record)
}

fn process_chant<N: TokenDataStoreReadWrite, P: PointOracle>(
  context: &ExecutionContext<P>,
  store: &N,
  entry: &InscriptionEntry,
  chanted: &mut HashSet<String>,
  record: &mut ChantRecord,
) -> Result<(), Error<N>> {
  let hash = match &entry.op {
    Op::Chant { ph } => ph.valid().cloned(),
    _ => None,
  }
  .ok_or(Error::Rejected(OpState::InvalidParams))?;
  record.hash = hash.to_string();

  let data = store
    .get_inscribe_data(hash.as_str())
    .map_err(Error::LedgerError)?
    .ok_or(Error::Rejected(OpState::HashNotFound))?;
  record.owner = Some(data.owner.clone());

  let caller = &entry.creator;
  let is_owner = *caller == data.owner;
  if !is_owner {
    let relation = store
      .get_resonance(hash.as_str(), caller)
      .map_err(Error::LedgerError)?;
    let resonating = match relation {
      Some(relation) => context.is_live_resonator(store, &relation)?,
      None => false,
    };
    if !resonating {
      return Err(Error::Rejected(OpState::PermissionDenied));
    }
  }

  if string_number(hash.as_str())
    .abs_diff(context.block.blockheight)
    .checked_rem(context.config.chant_block_threshold)
    != Some(0)
  {
    return Err(Error::Rejected(OpState::HashUnmatch));
  }

  let weight = context.hash_weight(&hash)?;
  let stamina = weight.stamina()?;
  if available_balance(store, caller)? < stamina {
    return Err(Error::Rejected(OpState::InsufficientBalance));
  }

  if chanted.contains(caller) {
    return Err(Error::Rejected(OpState::AlreadyExists));
  }

  let pool = &context.config.mint_pool_address;
  let pool_balance = available_balance(store, pool)?;
  if !pool_balance.is_positive() {
    return Err(Error::Rejected(OpState::InsufficientBalance));
  }
  let bonus = weight.weight.clone().min(pool_balance);

  let (user_bonus, owner_bonus) = if is_owner {
    (bonus, Num::zero())
  } else {
    let user_bonus = bonus.percent(CHANT_USER_PERCENT)?;
    let owner_bonus = bonus.checked_sub(&user_bonus)?;
    (user_bonus, owner_bonus)
  };

  burn(store, caller, &stamina)?;
  transfer_balance(store, pool, caller, &user_bonus)?;
  transfer_balance(store, pool, &data.owner, &owner_bonus)?;

  store
    .set_last_chant(caller, context.block.blockheight)
    .map_err(Error::LedgerError)?;
  chanted.insert(caller.clone());

  log::info!(
    "chant {} on {hash} by {caller}: stamina {stamina} bonus {user_bonus}/{owner_bonus}",
    entry.inscription_id
  );

  record.stamina = stamina;
  record.user_bonus = user_bonus;
  record.owner_bonus = owner_bonus;

  Ok(())
}
