use {
  super::{tx::TxOutSimple, *},
  crate::client::{BitcoinRpc, BlockSimple, InscriptionInfo, OrdRpc},
  bitcoin::BlockHash,
  std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
    rc::Rc,
  },
};

pub(crate) const BLOCK_TIME: u32 = 1_700_000_000;

#[derive(Default)]
struct BitcoinState {
  txs: HashMap<Txid, TxSimple>,
  blocks: Vec<BlockSimple>,
  nonce: u64,
  fetches: usize,
}

/// An in-memory chain. Clones share state, so a test can keep extending the
/// chain after handing a clone to an `Index`.
#[derive(Clone, Default)]
pub(crate) struct MockBitcoin {
  state: Rc<RefCell<BitcoinState>>,
}

impl MockBitcoin {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn add_tx(&self, inputs: Vec<OutPoint>, outputs: &[(u64, Option<&str>)]) -> Txid {
    let mut state = self.state.borrow_mut();
    state.nonce += 1;
    let txid = Txid::hash(&state.nonce.to_le_bytes());

    state.txs.insert(
      txid,
      TxSimple {
        txid,
        inputs,
        outputs: outputs
          .iter()
          .map(|(value, address)| TxOutSimple {
            value: *value,
            address: address.map(str::to_string),
          })
          .collect(),
      },
    );

    txid
  }

  /// Creates a commit and a reveal transaction. The inscription lands on the
  /// first reveal output, paid to `address`.
  pub(crate) fn inscribe(&self, address: Option<&str>) -> InscriptionId {
    let commit = self.add_tx(Vec::new(), &[(10_000, Some("commit"))]);
    let reveal = self.add_tx(
      vec![OutPoint {
        txid: commit,
        vout: 0,
      }],
      &[(546, address)],
    );

    InscriptionId {
      txid: reveal,
      index: 0,
    }
  }

  /// Appends a block holding `txids`, at the next height.
  pub(crate) fn add_block(&self, txids: Vec<Txid>) -> BlockSimple {
    let mut state = self.state.borrow_mut();
    let height = u64::try_from(state.blocks.len()).unwrap();
    let block = BlockSimple {
      hash: BlockHash::hash(&height.to_le_bytes()),
      height,
      time: BLOCK_TIME + u32::try_from(height).unwrap(),
      txids,
    };
    state.blocks.push(block.clone());
    block
  }

  pub(crate) fn mine_empty(&self, count: usize) {
    for _ in 0..count {
      self.add_block(Vec::new());
    }
  }

  /// Number of transactions fetched so far.
  pub(crate) fn fetches(&self) -> usize {
    self.state.borrow().fetches
  }
}

impl BitcoinRpc for MockBitcoin {
  fn latest_height(&self) -> Result<u64> {
    let state = self.state.borrow();
    match state.blocks.len().checked_sub(1) {
      Some(height) => Ok(u64::try_from(height)?),
      None => bail!("no blocks"),
    }
  }

  fn block(&self, height: u64) -> Result<BlockSimple> {
    self
      .state
      .borrow()
      .blocks
      .get(usize::try_from(height)?)
      .cloned()
      .ok_or_else(|| anyhow!("block {height} not found"))
  }

  fn transaction(&self, txid: &Txid) -> Result<TxSimple> {
    let mut state = self.state.borrow_mut();
    state.fetches += 1;
    state
      .txs
      .get(txid)
      .cloned()
      .ok_or_else(|| anyhow!("transaction {txid} not found"))
  }
}

#[derive(Default)]
struct OrdState {
  height: u64,
  blocks: BTreeMap<u64, Vec<InscriptionId>>,
  infos: HashMap<InscriptionId, InscriptionInfo>,
  contents: HashMap<InscriptionId, Vec<u8>>,
}

/// An in-memory ord server.
#[derive(Clone, Default)]
pub(crate) struct MockOrd {
  state: Rc<RefCell<OrdState>>,
}

impl MockOrd {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Registers an inscription revealed at `genesis_height` and lists it in
  /// that block.
  pub(crate) fn add(
    &self,
    inscription_id: InscriptionId,
    number: i64,
    genesis_height: u64,
    content_type: &str,
    content: &str,
  ) {
    let mut state = self.state.borrow_mut();
    state.infos.insert(
      inscription_id,
      InscriptionInfo {
        inscription_id,
        number,
        genesis_height,
        timestamp: BLOCK_TIME,
        content_type: Some(content_type.into()),
        satpoint: None,
      },
    );
    state
      .contents
      .insert(inscription_id, content.as_bytes().to_vec());
    state
      .blocks
      .entry(genesis_height)
      .or_default()
      .push(inscription_id);
  }

  /// Lists an already registered inscription in another block.
  pub(crate) fn list(&self, height: u64, inscription_id: InscriptionId) {
    self
      .state
      .borrow_mut()
      .blocks
      .entry(height)
      .or_default()
      .push(inscription_id);
  }

  pub(crate) fn set_height(&self, height: u64) {
    self.state.borrow_mut().height = height;
  }
}

impl OrdRpc for MockOrd {
  fn latest_height(&self) -> Result<u64> {
    Ok(self.state.borrow().height)
  }

  fn inscriptions_by_block(&self, height: u64) -> Result<Vec<InscriptionId>> {
    Ok(
      self
        .state
        .borrow()
        .blocks
        .get(&height)
        .cloned()
        .unwrap_or_default(),
    )
  }

  fn inscription(&self, inscription_id: &InscriptionId) -> Result<InscriptionInfo> {
    self
      .state
      .borrow()
      .infos
      .get(inscription_id)
      .cloned()
      .ok_or_else(|| anyhow!("inscription {inscription_id} not found"))
  }

  fn content(&self, inscription_id: &InscriptionId) -> Result<Option<Vec<u8>>> {
    Ok(self.state.borrow().contents.get(inscription_id).cloned())
  }
}
