use {
  self::{monitor::TransferMonitor, tx::TxSimple, updater::BlockUpdater},
  super::*,
  crate::{
    client::{BitcoinClient, BitcoinRpc, OracleClient, OrdClient, OrdRpc, PointOracle},
    config::TokenConfig,
    pdi::{
      datastore::{
        ord::{InscriptionEntry, TransferRecord},
        token::{InscribeData, OpRecord, ResonanceRelation, TokenDataStore},
        try_init_tables, OrdDataStoreReadOnly, StateReadOnly, StateReader,
        TokenDataStoreReadOnly, TokenDataStoreReadWrite,
      },
      protocol::token::{HashWeightOracle, Num},
    },
  },
  redb::Database,
  std::path::Path,
};

mod monitor;
mod scanner;
#[cfg(test)]
pub(crate) mod test;
pub mod tx;
mod updater;
pub mod utxo;

pub use self::updater::BlockSummary;

const CAUGHT_UP_INTERVAL: Duration = Duration::from_secs(10);
const ERROR_INTERVAL: Duration = Duration::from_secs(5);

struct Clients {
  bitcoin: Box<dyn BitcoinRpc>,
  ord: Box<dyn OrdRpc>,
  weights: HashWeightOracle<Box<dyn PointOracle>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Status {
  pub checkpoint: Option<u64>,
  pub genesis_block_height: u64,
  pub next_height: u64,
  pub inscriptions: u64,
  pub tracked_inscriptions: usize,
  pub mint_pool_balance: Num,
  pub foundation_balance: Num,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Balance {
  pub address: String,
  pub balance: Num,
  pub transferable: Num,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashInfo {
  pub hash: String,
  pub data: Option<InscribeData>,
  pub resonances: Vec<ResonanceRelation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InscriptionHistory {
  pub entry: InscriptionEntry,
  pub transfers: Vec<TransferRecord>,
  pub records: Vec<OpRecord>,
}

/// The token index: a redb database fed block by block from Bitcoin Core, an
/// ord server and the hash point oracle.
///
/// An index opened without clients can only be queried.
pub struct Index {
  database: Database,
  config: TokenConfig,
  clients: Option<Clients>,
  monitor: TransferMonitor,
  monitor_stale: bool,
}

impl Index {
  /// Opens the index for queries only.
  pub(crate) fn open(options: &Options) -> Result<Self> {
    let config = options.load_config()?;
    Self::open_database(&Self::database_path(options)?, config.token)
  }

  /// Opens the index and connects to the configured services.
  pub(crate) fn open_for_sync(options: &Options) -> Result<Self> {
    let config = options.load_config()?;

    let rpc_url = options.bitcoin_rpc_url(&config);
    log::info!("connecting to Bitcoin Core RPC server at {rpc_url}");
    let bitcoin = BitcoinClient::new(
      &rpc_url,
      options.bitcoin_auth(&config)?,
      options.chain().network(),
      &config.rpc,
    )?;

    log::info!("connecting to ord server at {}", config.ord.url);
    let ord = OrdClient::new(&config.ord.url, &config.rpc)?;

    log::info!("connecting to hash point oracle at {}", config.oracle.url);
    let oracle = OracleClient::new(&config.oracle, &config.rpc)?;

    Self::with_clients(
      &Self::database_path(options)?,
      config.token,
      Box::new(bitcoin),
      Box::new(ord),
      Box::new(oracle),
    )
  }

  pub fn with_clients(
    path: &Path,
    config: TokenConfig,
    bitcoin: Box<dyn BitcoinRpc>,
    ord: Box<dyn OrdRpc>,
    oracle: Box<dyn PointOracle>,
  ) -> Result<Self> {
    let mut index = Self::open_database(path, config)?;
    index.clients = Some(Clients {
      bitcoin,
      ord,
      weights: HashWeightOracle::new(oracle),
    });
    index.reload_monitor()?;
    Ok(index)
  }

  fn database_path(options: &Options) -> Result<PathBuf> {
    let data_dir = options.data_dir()?;

    if let Err(err) = fs::create_dir_all(&data_dir) {
      bail!("failed to create data dir `{}`: {err}", data_dir.display());
    }

    Ok(data_dir.join("index.redb"))
  }

  /// Opens or creates the database. A fresh database gets its tables and the
  /// initial mint pool balance.
  pub fn open_database(path: &Path, config: TokenConfig) -> Result<Self> {
    let database = Database::create(path)
      .with_context(|| format!("failed to open index at `{}`", path.display()))?;

    let wtx = database.begin_write()?;
    let created = {
      let rtx = database.begin_read()?;
      try_init_tables(&wtx, &rtx)?
    };

    if created {
      log::info!(
        "created index at `{}`, mint pool {} holds {}",
        path.display(),
        config.mint_pool_address,
        config.mint_pool_initial_amount
      );
      TokenDataStore::new(&wtx).update_balance(
        &config.mint_pool_address,
        &Num::from(config.mint_pool_initial_amount),
      )?;
    }

    wtx.commit()?;

    Ok(Self {
      database,
      config,
      clients: None,
      monitor: TransferMonitor::new(),
      monitor_stale: true,
    })
  }

  fn reload_monitor(&mut self) -> Result {
    let rtx = self.database.begin_read()?;
    self.monitor.load(StateReadOnly::new(&rtx).ord())?;
    self.monitor_stale = false;
    Ok(())
  }

  pub fn checkpoint(&self) -> Result<Option<u64>> {
    let rtx = self.database.begin_read()?;
    Ok(StateReadOnly::new(&rtx).ord().get_checkpoint()?)
  }

  /// The block after the checkpoint, never below the genesis block.
  pub fn next_height(&self) -> Result<u64> {
    Ok(
      self
        .checkpoint()?
        .map(|checkpoint| checkpoint + 1)
        .unwrap_or_default()
        .max(self.config.genesis_block_height),
    )
  }

  /// Indexes every block both Bitcoin Core and the ord server have. Stops
  /// early on shutdown. Returns the number of blocks indexed.
  pub fn update(&mut self) -> Result<u64> {
    let latest = {
      let clients = self.clients()?;
      let bitcoin = clients.bitcoin.latest_height()?;
      let ord = clients.ord.latest_height()?;
      if ord < bitcoin {
        log::debug!("ord server at {ord} lags Bitcoin Core at {bitcoin}");
      }
      bitcoin.min(ord)
    };

    let mut indexed = 0;
    let mut height = self.next_height()?;

    while height <= latest {
      if shutting_down() {
        log::info!("shutting down at block {height}");
        break;
      }

      self.update_block(height)?;
      indexed += 1;
      height += 1;
    }

    Ok(indexed)
  }

  /// Indexes `height`, which must be the next block.
  pub fn update_block(&mut self, height: u64) -> Result<BlockSummary> {
    let next = self.next_height()?;
    if height != next {
      bail!("cannot index block {height}, next block is {next}");
    }

    if self.monitor_stale {
      self.reload_monitor()?;
    }

    let (clients, monitor) = match &self.clients {
      Some(clients) => (clients, &mut self.monitor),
      None => bail!("index was opened without chain clients"),
    };

    let result = BlockUpdater {
      bitcoin: clients.bitcoin.as_ref(),
      ord: clients.ord.as_ref(),
      weights: &clients.weights,
      config: &self.config,
      monitor,
    }
    .update_block(&self.database, height);

    if let Err(err) = &result {
      log::error!("failed to index block {height}: {err}");
      self.monitor_stale = true;
    }

    result
  }

  /// Follows the chain until shutdown. Failed blocks are retried.
  pub fn run(&mut self) -> Result {
    self.clients()?;

    log::info!("indexing from block {}", self.next_height()?);

    while !shutting_down() {
      let interval = match self.update() {
        Ok(indexed) => {
          if indexed > 0 {
            log::info!("caught up after {indexed} blocks");
          }
          CAUGHT_UP_INTERVAL
        }
        Err(err) => {
          log::error!("update failed, retrying in {}s: {err:#}", ERROR_INTERVAL.as_secs());
          ERROR_INTERVAL
        }
      };

      sleep(interval);
    }

    log::info!("index stopped at {:?}", self.checkpoint()?);

    Ok(())
  }

  fn clients(&self) -> Result<&Clients> {
    self
      .clients
      .as_ref()
      .ok_or_else(|| anyhow!("index was opened without chain clients"))
  }

  pub fn status(&self) -> Result<Status> {
    let rtx = self.database.begin_read()?;
    let state = StateReadOnly::new(&rtx);

    let checkpoint = state.ord().get_checkpoint()?;

    Ok(Status {
      checkpoint,
      genesis_block_height: self.config.genesis_block_height,
      next_height: checkpoint
        .map(|checkpoint| checkpoint + 1)
        .unwrap_or_default()
        .max(self.config.genesis_block_height),
      inscriptions: state.ord().get_inscription_count()?,
      tracked_inscriptions: state
        .ord()
        .get_latest_transfers()?
        .iter()
        .filter(|record| !record.is_spent_as_fee())
        .count(),
      mint_pool_balance: state.token().get_balance(&self.config.mint_pool_address)?,
      foundation_balance: state.token().get_balance(&self.config.foundation_address)?,
    })
  }

  pub fn balance(&self, address: &str) -> Result<Balance> {
    let rtx = self.database.begin_read()?;
    let state = StateReadOnly::new(&rtx);
    Ok(Balance {
      address: address.into(),
      balance: state.token().get_balance(address)?,
      transferable: state.token().get_transferable_balance(address)?,
    })
  }

  pub fn hash_info(&self, hash: &str) -> Result<HashInfo> {
    let rtx = self.database.begin_read()?;
    let state = StateReadOnly::new(&rtx);
    Ok(HashInfo {
      hash: hash.into(),
      data: state.token().get_inscribe_data(hash)?,
      resonances: state.token().get_resonances(hash)?,
    })
  }

  pub fn history(&self, inscription_id: &InscriptionId) -> Result<Option<InscriptionHistory>> {
    let rtx = self.database.begin_read()?;
    let state = StateReadOnly::new(&rtx);

    let entry = match state.ord().get_inscription_entry(inscription_id)? {
      Some(entry) => entry,
      None => return Ok(None),
    };

    Ok(Some(InscriptionHistory {
      entry,
      transfers: state.ord().get_transfers(inscription_id)?,
      records: state.token().get_op_records(inscription_id)?,
    }))
  }
}

/// Sleeps in short steps so shutdown is not held up.
fn sleep(duration: Duration) {
  let step = Duration::from_millis(200);
  let mut slept = Duration::ZERO;
  while slept < duration && !shutting_down() {
    thread::sleep(step);
    slept += step;
  }
}
