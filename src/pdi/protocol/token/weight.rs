use {
  super::{
    hash::MixHash,
    params::{PRICE_WEIGHT_MULTIPLE, STAMINA_DIVISOR, WEIGHT_SIZE_UNIT},
    Num,
  },
  crate::client::PointOracle,
  anyhow::Result,
  std::{cell::RefCell, collections::HashMap},
};

#[derive(Debug, Clone, PartialEq)]
pub struct HashWeight {
  pub size: u64,
  pub point: u64,
  pub weight: Num,
}

impl HashWeight {
  pub fn stamina(&self) -> Result<Num, super::NumError> {
    self.weight.checked_div(&Num::from(STAMINA_DIVISOR))
  }

  pub fn max_price(&self) -> Result<Num, super::NumError> {
    self.weight.checked_mul(&Num::from(PRICE_WEIGHT_MULTIPLE))
  }
}

/// `point * max(1, ceil(size / 1GiB))`.
pub fn calc_weight(point: u64, size: u64) -> Num {
  let units = (size / WEIGHT_SIZE_UNIT + u64::from(size % WEIGHT_SIZE_UNIT != 0)).max(1);
  Num::from(u128::from(point) * u128::from(units))
}

/// Prices content hashes with the point reported by the external oracle.
///
/// Lookups are memoised for the most recent timestamp only, which covers every
/// operation of the block being indexed.
pub struct HashWeightOracle<P> {
  oracle: P,
  cache: RefCell<(u32, HashMap<MixHash, HashWeight>)>,
}

impl<P: PointOracle> HashWeightOracle<P> {
  pub fn new(oracle: P) -> Self {
    Self {
      oracle,
      cache: RefCell::new((0, HashMap::new())),
    }
  }

  pub fn query_hash_weight(&self, timestamp: u32, hash: &MixHash) -> Result<HashWeight> {
    {
      let mut cache = self.cache.borrow_mut();
      if cache.0 != timestamp {
        *cache = (timestamp, HashMap::new());
      } else if let Some(weight) = cache.1.get(hash) {
        return Ok(weight.clone());
      }
    }

    let point = self.oracle.hash_point(timestamp, hash.as_str())?;
    let size = hash.size();
    let weight = HashWeight {
      size,
      point,
      weight: calc_weight(point, size),
    };

    log::debug!(
      "hash weight {hash} at {timestamp}: size {size} point {point} weight {}",
      weight.weight
    );

    self.cache.borrow_mut().1.insert(hash.clone(), weight.clone());

    Ok(weight)
  }
}

#[cfg(test)]
mod tests {
  use {
    super::*, crate::pdi::protocol::token::test::MockOracle, pretty_assertions::assert_eq,
    std::str::FromStr,
  };

  const HASH: &str = "0x80000000059671f6000000000000000000000000000000000000000000000001";

  #[test]
  fn weight_counts_started_gib() {
    assert_eq!(calc_weight(100, 0), Num::from(100u64));
    assert_eq!(calc_weight(100, 1), Num::from(100u64));
    assert_eq!(calc_weight(100, WEIGHT_SIZE_UNIT), Num::from(100u64));
    assert_eq!(calc_weight(100, WEIGHT_SIZE_UNIT + 1), Num::from(200u64));
    assert_eq!(calc_weight(0, 5 * WEIGHT_SIZE_UNIT), Num::zero());
  }

  #[test]
  fn query_uses_oracle_point_and_size() {
    let oracle = MockOracle::new().with_point(HASH, 1000);
    let weights = HashWeightOracle::new(&oracle);
    let hash = MixHash::from_str(HASH).unwrap();

    assert_eq!(
      weights.query_hash_weight(7, &hash).unwrap(),
      HashWeight {
        size: 93_745_654,
        point: 1000,
        weight: Num::from(1000u64),
      }
    );
  }

  #[test]
  fn unknown_hash_weighs_nothing() {
    let oracle = MockOracle::new();
    let weights = HashWeightOracle::new(&oracle);
    let hash = MixHash::from_str(HASH).unwrap();

    assert_eq!(
      weights.query_hash_weight(7, &hash).unwrap().weight,
      Num::zero()
    );
  }

  #[test]
  fn lookups_are_memoised_per_timestamp() {
    let oracle = MockOracle::new().with_point(HASH, 8);
    let weights = HashWeightOracle::new(&oracle);
    let hash = MixHash::from_str(HASH).unwrap();

    weights.query_hash_weight(7, &hash).unwrap();
    weights.query_hash_weight(7, &hash).unwrap();
    assert_eq!(oracle.queries(), 1);

    weights.query_hash_weight(8, &hash).unwrap();
    assert_eq!(oracle.queries(), 2);
  }

  #[test]
  fn stamina_and_max_price() {
    let weight = HashWeight {
      size: 0,
      point: 10,
      weight: Num::from(10u64),
    };
    assert_eq!(weight.stamina().unwrap(), Num::from_str("2.5").unwrap());
    assert_eq!(weight.max_price().unwrap(), Num::from(20u64));
  }
}
