use {
  bitcoin::{hashes::Hash, BlockHash, OutPoint, Txid},
  pdi_index::{
    client::{BitcoinRpc, BlockSimple, InscriptionInfo, OrdRpc, PointOracle},
    index::tx::{TxOutSimple, TxSimple},
    InscriptionId,
  },
  std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
    rc::Rc,
  },
};

type Result<T> = anyhow::Result<T>;

#[derive(Default)]
struct ChainState {
  blocks: Vec<BlockSimple>,
  txs: HashMap<Txid, TxSimple>,
  nonce: u64,
}

#[derive(Clone, Default)]
pub(crate) struct Chain(Rc<RefCell<ChainState>>);

impl Chain {
  pub(crate) fn height(&self) -> u64 {
    self.0.borrow().blocks.len() as u64 - 1
  }

  pub(crate) fn add_tx(&self, inputs: Vec<OutPoint>, outputs: &[(u64, Option<&str>)]) -> Txid {
    let txid = {
      let mut state = self.0.borrow_mut();
      state.nonce += 1;
      Txid::hash(&state.nonce.to_be_bytes())
    };
    self.insert_tx(txid, inputs, outputs);
    txid
  }

  fn insert_tx(&self, txid: Txid, inputs: Vec<OutPoint>, outputs: &[(u64, Option<&str>)]) {
    self.0.borrow_mut().txs.insert(
      txid,
      TxSimple {
        txid,
        inputs,
        outputs: outputs
          .iter()
          .map(|(value, address)| TxOutSimple {
            value: *value,
            address: address.map(String::from),
          })
          .collect(),
      },
    );
  }

  /// Adds a commit, under `commit` when given, and a reveal paying its first
  /// output to `address`. Only the reveal needs to be mined.
  pub(crate) fn inscribe(&self, commit: Option<Txid>, address: &str) -> InscriptionId {
    let commit = match commit {
      Some(txid) => {
        self.insert_tx(txid, Vec::new(), &[(10_000, Some("funder"))]);
        txid
      }
      None => self.add_tx(Vec::new(), &[(10_000, Some("funder"))]),
    };

    let reveal = self.add_tx(
      vec![OutPoint {
        txid: commit,
        vout: 0,
      }],
      &[(546, Some(address))],
    );

    InscriptionId {
      txid: reveal,
      index: 0,
    }
  }

  pub(crate) fn mine(&self, txids: Vec<Txid>) {
    let mut state = self.0.borrow_mut();
    let height = state.blocks.len() as u64;
    state.blocks.push(BlockSimple {
      hash: BlockHash::hash(&height.to_be_bytes()),
      height,
      time: 1_700_000_000 + height as u32 * 600,
      txids,
    });
  }
}

impl BitcoinRpc for Chain {
  fn latest_height(&self) -> Result<u64> {
    Ok(self.height())
  }

  fn block(&self, height: u64) -> Result<BlockSimple> {
    self
      .0
      .borrow()
      .blocks
      .get(height as usize)
      .cloned()
      .ok_or_else(|| anyhow::anyhow!("no block at {height}"))
  }

  fn transaction(&self, txid: &Txid) -> Result<TxSimple> {
    self
      .0
      .borrow()
      .txs
      .get(txid)
      .cloned()
      .ok_or_else(|| anyhow::anyhow!("no transaction {txid}"))
  }
}

#[derive(Default)]
struct OrdState {
  height: u64,
  number: i64,
  blocks: BTreeMap<u64, Vec<InscriptionId>>,
  inscriptions: HashMap<InscriptionId, (InscriptionInfo, Vec<u8>)>,
}

#[derive(Clone, Default)]
pub(crate) struct OrdServer(Rc<RefCell<OrdState>>);

impl OrdServer {
  /// Inscriptions are numbered in the order they are added.
  pub(crate) fn add(&self, inscription_id: InscriptionId, height: u64, content_type: &str, content: &str) {
    let mut state = self.0.borrow_mut();
    let number = state.number;
    state.number += 1;
    state.blocks.entry(height).or_default().push(inscription_id);
    state.inscriptions.insert(
      inscription_id,
      (
        InscriptionInfo {
          inscription_id,
          number,
          genesis_height: height,
          timestamp: 1_700_000_000,
          content_type: Some(content_type.into()),
          satpoint: None,
        },
        content.as_bytes().to_vec(),
      ),
    );
  }

  pub(crate) fn set_height(&self, height: u64) {
    self.0.borrow_mut().height = height;
  }
}

impl OrdRpc for OrdServer {
  fn latest_height(&self) -> Result<u64> {
    Ok(self.0.borrow().height)
  }

  fn inscriptions_by_block(&self, height: u64) -> Result<Vec<InscriptionId>> {
    Ok(self.0.borrow().blocks.get(&height).cloned().unwrap_or_default())
  }

  fn inscription(&self, inscription_id: &InscriptionId) -> Result<InscriptionInfo> {
    self
      .0
      .borrow()
      .inscriptions
      .get(inscription_id)
      .map(|(info, _)| info.clone())
      .ok_or_else(|| anyhow::anyhow!("no inscription {inscription_id}"))
  }

  fn content(&self, inscription_id: &InscriptionId) -> Result<Option<Vec<u8>>> {
    Ok(
      self
        .0
        .borrow()
        .inscriptions
        .get(inscription_id)
        .map(|(_, content)| content.clone()),
    )
  }
}

/// Every hash has point zero, so inscribing costs only the declared amount.
pub(crate) struct Oracle;

impl PointOracle for Oracle {
  fn hash_point(&self, _timestamp: u32, _hash: &str) -> Result<u64> {
    Ok(0)
  }
}
