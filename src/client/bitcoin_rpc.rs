use {
  super::*,
  bitcoin::Network,
  bitcoincore_rpc::{Auth, Client, RpcApi},
  rayon::prelude::*,
};

pub struct BitcoinClient {
  client: Client,
  network: Network,
  retry: RetryPolicy,
  pool: rayon::ThreadPool,
}

impl BitcoinClient {
  pub fn new(url: &str, auth: Auth, network: Network, config: &config::RpcConfig) -> Result<Self> {
    let client = Client::new(url, auth).context("failed to connect to Bitcoin Core RPC URL")?;
    let pool = rayon::ThreadPoolBuilder::new()
      .num_threads(config.batch_concurrency.max(1))
      .build()?;

    Ok(Self {
      client,
      network,
      retry: RetryPolicy::new(config),
      pool,
    })
  }
}

impl BitcoinRpc for BitcoinClient {
  fn latest_height(&self) -> Result<u64> {
    with_retries(&self.retry, "get bitcoin block count", || {
      Ok(self.client.get_block_count()?)
    })
  }

  fn block(&self, height: u64) -> Result<BlockSimple> {
    let info = with_retries(&self.retry, format_args!("get block {height}"), || {
      let hash = self.client.get_block_hash(height)?;
      Ok(self.client.get_block_info(&hash)?)
    })?;

    Ok(BlockSimple {
      hash: info.hash,
      height,
      time: u32::try_from(info.time)?,
      txids: info.tx,
    })
  }

  fn transaction(&self, txid: &Txid) -> Result<TxSimple> {
    let tx = with_retries(&self.retry, format_args!("get transaction {txid}"), || {
      Ok(self.client.get_raw_transaction(txid, None)?)
    })?;

    Ok(TxSimple::from_transaction(&tx, self.network))
  }

  fn transactions(&self, txids: &[Txid]) -> Result<Vec<TxSimple>> {
    self
      .pool
      .install(|| txids.par_iter().map(|txid| self.transaction(txid)).collect())
  }
}
