use {
  self::mock::{Chain, OrdServer},
  bitcoin::{OutPoint, Txid},
  pdi_index::{
    config::TokenConfig,
    pdi::{
      datastore::token::{OpRecord, OpState},
      protocol::token::Num,
    },
    Index, InscriptionId,
  },
  pretty_assertions::assert_eq,
  std::str::FromStr,
  tempfile::TempDir,
};

mod mock;

/// Displays with the same last eight digits as `HASH`, so an inscribe
/// committed from it claims `HASH`.
const MATCHING_COMMIT: &str = "1000000000000000000000000000000000000000000000000000000000000001";

const HASH: &str = "0x80000000059671f6000000000000000000000000000000000000000000000001";

const GENESIS: u64 = 1;

fn num(s: &str) -> Num {
  s.parse().unwrap()
}

fn config() -> TokenConfig {
  TokenConfig {
    genesis_block_height: GENESIS,
    ..Default::default()
  }
}

struct TestIndex {
  _tempdir: TempDir,
  index: Index,
  chain: Chain,
  ord: OrdServer,
}

impl TestIndex {
  fn new() -> Self {
    let tempdir = TempDir::new().unwrap();
    let chain = Chain::default();
    let ord = OrdServer::default();

    // block 0 precedes genesis
    chain.mine(Vec::new());

    let index = Index::with_clients(
      &tempdir.path().join("index.redb"),
      config(),
      Box::new(chain.clone()),
      Box::new(ord.clone()),
      Box::new(mock::Oracle),
    )
    .unwrap();

    Self {
      _tempdir: tempdir,
      index,
      chain,
      ord,
    }
  }

  /// Reveals `content` to `address` and lists it with the ord server at the
  /// height of the next block.
  fn inscribe(&self, address: &str, content: &str) -> InscriptionId {
    self.inscribe_with_commit(None, address, content)
  }

  fn inscribe_with_commit(
    &self,
    commit: Option<Txid>,
    address: &str,
    content: &str,
  ) -> InscriptionId {
    let inscription_id = self.chain.inscribe(commit, address);
    self.ord.add(
      inscription_id,
      self.chain.height() + 1,
      "text/plain;charset=utf-8",
      content,
    );
    inscription_id
  }

  /// Spends the first output of `inscription_id`'s reveal to `address`.
  fn send(&self, inscription_id: InscriptionId, address: &str) -> Txid {
    self.chain.add_tx(
      vec![OutPoint {
        txid: inscription_id.txid,
        vout: 0,
      }],
      &[(546, Some(address))],
    )
  }

  fn mine(&mut self, txids: Vec<Txid>) {
    self.chain.mine(txids);
    self.ord.set_height(self.chain.height());
    self.index.update().unwrap();
    assert_eq!(self.index.checkpoint().unwrap(), Some(self.chain.height()));
  }

  fn balance(&self, address: &str) -> Num {
    self.index.balance(address).unwrap().balance
  }
}
