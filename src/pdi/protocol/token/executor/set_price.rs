use {
  super::*,
  crate::pdi::{
    datastore::{ord::InscriptionEntry, token::SetPriceRecord},
    protocol::token::Op,
  },
};

pub(in crate::pdi::protocol::token) fn execute<N: TokenDataStoreReadWrite, P: PointOracle>(
  context: &ExecutionContext<P>,
  store: &N,
  entry: &InscriptionEntry,
) -> Result<SetPriceRecord> {
  let mut record = SetPriceRecord {
    inscription_id: entry.inscription_id,
    inscription_number: entry.inscription_number,
    block_height: context.block.blockheight,
    timestamp: context.block.blocktime,
    address: entry.creator.clone(),
    hash: String::new(),
    price: Num::zero(),
    state: OpState::Ok,
  };

  let result = process_set_price(context, store, entry, &mut record);
  record.state = settle(OpKind::SetPrice, result)?;

  insert_record(store, OpRecord::SetPrice(record.clone()))?;

  Ok(record)
}

fn process_set_price<N: TokenDataStoreReadWrite, P: PointOracle>(
  context: &ExecutionContext<P>,
  store: &N,
  entry: &InscriptionEntry,
  record: &mut SetPriceRecord,
) -> Result<(), Error<N>> {
  let (hash, price) = match &entry.op {
    Op::SetPrice { ph, price } => match (ph.valid(), price.valid()) {
      (Some(hash), Some(price)) => (hash, price),
      _ => return Err(Error::Rejected(OpState::InvalidParams)),
    },
    _ => return Err(Error::Rejected(OpState::InvalidParams)),
  };
  record.hash = hash.to_string();
  record.price = price.clone();

  let mut data = store
    .get_inscribe_data(hash.as_str())
    .map_err(Error::LedgerError)?
    .ok_or(Error::Rejected(OpState::HashNotFound))?;

  if data.owner != entry.creator {
    return Err(Error::Rejected(OpState::PermissionDenied));
  }

  let max_price = context.hash_weight(hash)?.max_price()?;
  let price = price.clone().min(max_price);

  log::info!("hash {hash} price {} -> {price}", data.price);

  data.price = price.clone();
  store.set_inscribe_data(&data).map_err(Error::LedgerError)?;
  record.price = price;

  Ok(())
}

#[cfg(test)]
mod tests {
  use {
    super::*,
    crate::pdi::{
      datastore::token::{InscribeData, TokenDataStore},
      protocol::token::{
        test::{block, entry, inscription_id, mixhash, num, MockOracle, HASH},
        Param,
      },
    },
    pretty_assertions::assert_eq,
    redb::Database,
    tempfile::NamedTempFile,
  };

  fn set_price_op(price: &str) -> Op {
    Op::SetPrice {
      ph: Param::Valid(mixhash()),
      price: Param::Valid(num(price)),
    }
  }

  #[test]
  fn owner_sets_a_clipped_price() {
    let dbfile = NamedTempFile::new().unwrap();
    let db = Database::create(dbfile.path()).unwrap();
    let wtx = db.begin_write().unwrap();
    let store = TokenDataStore::new(&wtx);
    let config = TokenConfig::default();
    let oracle = MockOracle::new().with_point(HASH, 100);
    let weights = HashWeightOracle::new(&oracle);
    let context = ExecutionContext {
      block: block(10),
      config: &config,
      weights: &weights,
    };

    assert_eq!(
      execute(&context, &store, &entry(1, "alice", 10, set_price_op("5")))
        .unwrap()
        .state,
      OpState::HashNotFound
    );

    store
      .set_inscribe_data(&InscribeData {
        hash: HASH.into(),
        inscription_id: inscription_id(99),
        owner: "alice".into(),
        block_height: 1,
        timestamp: 1,
        text: None,
        price: Num::zero(),
        resonance_count: 0,
      })
      .unwrap();

    assert_eq!(
      execute(&context, &store, &entry(2, "bob", 10, set_price_op("5")))
        .unwrap()
        .state,
      OpState::PermissionDenied
    );

    let record = execute(&context, &store, &entry(3, "alice", 10, set_price_op("5"))).unwrap();
    assert_eq!(record.state, OpState::Ok);
    assert_eq!(store.get_inscribe_data(HASH).unwrap().unwrap().price, num("5"));

    let record = execute(&context, &store, &entry(4, "alice", 10, set_price_op("500"))).unwrap();
    assert_eq!(record.price, num("200"));
    assert_eq!(store.get_inscribe_data(HASH).unwrap().unwrap().price, num("200"));
  }

  #[test]
  fn invalid_price() {
    let dbfile = NamedTempFile::new().unwrap();
    let db = Database::create(dbfile.path()).unwrap();
    let wtx = db.begin_write().unwrap();
    let store = TokenDataStore::new(&wtx);
    let config = TokenConfig::default();
    let oracle = MockOracle::new();
    let weights = HashWeightOracle::new(&oracle);
    let context = ExecutionContext {
      block: block(10),
      config: &config,
      weights: &weights,
    };

    let op = Op::SetPrice {
      ph: Param::Valid(mixhash()),
      price: Param::Invalid("abc".into()),
    };
    assert_eq!(
      execute(&context, &store, &entry(1, "alice", 10, op)).unwrap().state,
      OpState::InvalidParams
    );
  }
}
