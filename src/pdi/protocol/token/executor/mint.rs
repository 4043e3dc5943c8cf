use {
  super::*,
  crate::pdi::{
    datastore::{
      ord::InscriptionEntry,
      token::{MintRecord, MintType},
    },
    protocol::token::{string_number, Op, Param},
  },
};

pub(in crate::pdi::protocol::token) fn execute<N: TokenDataStoreReadWrite, P: PointOracle>(
  context: &ExecutionContext<P>,
  store: &N,
  entry: &InscriptionEntry,
) -> Result<MintRecord> {
  let (amt, lucky) = match &entry.op {
    Op::Mint { amt, lucky } => (amt, lucky),
    op => return Err(anyhow!("mint execute exception: unexpected op {:?}", op.kind())),
  };

  let mut record = MintRecord {
    inscription_id: entry.inscription_id,
    inscription_number: entry.inscription_number,
    block_height: context.block.blockheight,
    timestamp: context.block.blocktime,
    address: entry.creator.clone(),
    lucky: lucky.valid().cloned(),
    mint_type: MintType::Normal,
    declared_amt: amt.valid().cloned(),
    amt: Num::zero(),
    state: OpState::Ok,
  };

  let result = process_mint(context, store, entry, amt, lucky, &mut record);
  record.state = settle(OpKind::Mint, result)?;
  if !record.state.is_ok() {
    record.amt = Num::zero();
  }

  insert_record(store, OpRecord::Mint(record.clone()))?;

  Ok(record)
}

fn process_mint<N: TokenDataStoreReadWrite, P: PointOracle>(
  context: &ExecutionContext<P>,
  store: &N,
  entry: &InscriptionEntry,
  amt: &Param<Num>,
  lucky: &Param<String>,
  record: &mut MintRecord,
) -> Result<(), Error<N>> {
  let amt = match amt.valid() {
    Some(amt) if amt.is_positive() => amt,
    _ => return Err(Error::Rejected(OpState::InvalidParams)),
  };

  if matches!(lucky, Param::Invalid(_)) {
    return Err(Error::Rejected(OpState::InvalidParams));
  }

  let config = context.config;
  let lucky_block = lucky.is_valid()
    && (context.block.blockheight + string_number(&entry.creator))
      .checked_rem(config.lucky_mint_block_threshold)
      == Some(0);

  let cap = if lucky_block {
    record.mint_type = MintType::Lucky;
    config.lucky_mint_max_amount
  } else {
    config.normal_mint_max_amount
  };

  let amt = amt.clone().min(Num::from(cap));

  // the pool is debited before the minter is credited
  transfer_balance(store, &config.mint_pool_address, &entry.creator, &amt)?;

  log::info!(
    "mint {} {amt} to {} ({:?})",
    entry.inscription_id,
    entry.creator,
    record.mint_type
  );

  record.amt = amt;

  Ok(())
}

#[cfg(test)]
mod tests {
  use {
    super::*,
    crate::pdi::{
      datastore::token::TokenDataStore,
      protocol::token::test::{block, entry, mint_op, num, seed_pool, MockOracle},
    },
    pretty_assertions::assert_eq,
    redb::Database,
    tempfile::NamedTempFile,
  };

  // numeric value 384, a multiple of 64
  const LUCKY_ADDRESS: &str = "bc1q00000000";

  fn lucky_op(amt: &str) -> Op {
    Op::Mint {
      amt: Param::Valid(num(amt)),
      lucky: Param::Valid("x".into()),
    }
  }

  #[test]
  fn normal_mint_is_capped() {
    let dbfile = NamedTempFile::new().unwrap();
    let db = Database::create(dbfile.path()).unwrap();
    let wtx = db.begin_write().unwrap();
    let store = TokenDataStore::new(&wtx);
    let config = TokenConfig::default();
    seed_pool(&store, &config);
    let oracle = MockOracle::new();
    let weights = HashWeightOracle::new(&oracle);
    let context = ExecutionContext {
      block: block(100),
      config: &config,
      weights: &weights,
    };

    let record = execute(&context, &store, &entry(1, "alice", 100, mint_op("1000"))).unwrap();

    assert_eq!(record.state, OpState::Ok);
    assert_eq!(record.mint_type, MintType::Normal);
    assert_eq!(record.declared_amt, Some(num("1000")));
    assert_eq!(record.amt, num("210"));
    assert_eq!(store.get_balance("alice").unwrap(), num("210"));
    assert_eq!(store.get_balance("0x0").unwrap(), num("209999790"));
    assert_eq!(
      store.get_op_records(&record.inscription_id).unwrap(),
      vec![OpRecord::Mint(record)]
    );
  }

  #[test]
  fn lucky_mint_at_height_64() {
    let dbfile = NamedTempFile::new().unwrap();
    let db = Database::create(dbfile.path()).unwrap();
    let wtx = db.begin_write().unwrap();
    let store = TokenDataStore::new(&wtx);
    let config = TokenConfig::default();
    seed_pool(&store, &config);
    let oracle = MockOracle::new();
    let weights = HashWeightOracle::new(&oracle);
    let context = ExecutionContext {
      block: block(64),
      config: &config,
      weights: &weights,
    };

    let record = execute(&context, &store, &entry(1, LUCKY_ADDRESS, 64, lucky_op("5000"))).unwrap();

    assert_eq!(record.state, OpState::Ok);
    assert_eq!(record.mint_type, MintType::Lucky);
    assert_eq!(record.amt, num("2100"));
    assert_eq!(store.get_balance(LUCKY_ADDRESS).unwrap(), num("2100"));
  }

  #[test]
  fn lucky_tag_off_the_lucky_block_mints_normally() {
    let dbfile = NamedTempFile::new().unwrap();
    let db = Database::create(dbfile.path()).unwrap();
    let wtx = db.begin_write().unwrap();
    let store = TokenDataStore::new(&wtx);
    let config = TokenConfig::default();
    seed_pool(&store, &config);
    let oracle = MockOracle::new();
    let weights = HashWeightOracle::new(&oracle);
    let context = ExecutionContext {
      block: block(65),
      config: &config,
      weights: &weights,
    };

    let record = execute(&context, &store, &entry(1, LUCKY_ADDRESS, 65, lucky_op("2100"))).unwrap();

    assert_eq!(record.mint_type, MintType::Normal);
    assert_eq!(record.amt, num("210"));
  }

  #[test]
  fn invalid_params() {
    let dbfile = NamedTempFile::new().unwrap();
    let db = Database::create(dbfile.path()).unwrap();
    let wtx = db.begin_write().unwrap();
    let store = TokenDataStore::new(&wtx);
    let config = TokenConfig::default();
    seed_pool(&store, &config);
    let oracle = MockOracle::new();
    let weights = HashWeightOracle::new(&oracle);
    let context = ExecutionContext {
      block: block(100),
      config: &config,
      weights: &weights,
    };

    let zero = execute(&context, &store, &entry(1, "alice", 100, mint_op("0"))).unwrap();
    assert_eq!(zero.state, OpState::InvalidParams);

    let bad_lucky = Op::Mint {
      amt: Param::Valid(num("1")),
      lucky: Param::Invalid("7".into()),
    };
    let record = execute(&context, &store, &entry(2, "alice", 100, bad_lucky)).unwrap();
    assert_eq!(record.state, OpState::InvalidParams);
    assert_eq!(store.get_balance("alice").unwrap(), Num::zero());
  }

  #[test]
  fn empty_pool_is_insufficient_balance() {
    let dbfile = NamedTempFile::new().unwrap();
    let db = Database::create(dbfile.path()).unwrap();
    let wtx = db.begin_write().unwrap();
    let store = TokenDataStore::new(&wtx);
    let config = TokenConfig::default();
    store.update_balance("0x0", &num("100")).unwrap();
    let oracle = MockOracle::new();
    let weights = HashWeightOracle::new(&oracle);
    let context = ExecutionContext {
      block: block(100),
      config: &config,
      weights: &weights,
    };

    let record = execute(&context, &store, &entry(1, "alice", 100, mint_op("210"))).unwrap();

    assert_eq!(record.state, OpState::InsufficientBalance);
    assert_eq!(record.amt, Num::zero());
    assert_eq!(store.get_balance("alice").unwrap(), Num::zero());
    assert_eq!(store.get_balance("0x0").unwrap(), num("100"));
  }
}
