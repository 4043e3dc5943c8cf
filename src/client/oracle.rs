use {
  super::*,
  crate::rpc::{self, JsonRpcClient},
  serde_json::json,
  tokio::runtime::Runtime,
};

#[derive(Debug, Deserialize)]
struct HashPointResult {
  synced: bool,
  #[serde(default)]
  point: Option<u64>,
}

/// JSON-RPC client for the external chain that records data hashes and their points.
pub struct OracleClient {
  rpc: JsonRpcClient,
  runtime: Runtime,
  retry: RetryPolicy,
  poll_interval: Duration,
}

impl OracleClient {
  pub fn new(config: &config::OracleConfig, rpc_config: &config::RpcConfig) -> Result<Self> {
    Ok(Self {
      rpc: JsonRpcClient::new(&config.url, Duration::from_secs(rpc_config.timeout))?,
      runtime: rpc::init_tokio_runtime()?,
      retry: RetryPolicy::new(rpc_config),
      poll_interval: Duration::from_secs(config.sync_poll_interval),
    })
  }
}

impl PointOracle for OracleClient {
  fn hash_point(&self, timestamp: u32, hash: &str) -> Result<u64> {
    loop {
      let result: HashPointResult = with_retries(
        &self.retry,
        format_args!("query point of hash {hash}"),
        || {
          self
            .runtime
            .block_on(self.rpc.call("hash_point", json!([timestamp, hash])))
        },
      )?;

      if result.synced {
        return Ok(result.point.unwrap_or_default());
      }

      if shutting_down() {
        bail!("interrupted while waiting for the point oracle to sync to {timestamp}");
      }

      log::info!(
        "point oracle has not synced to {timestamp} yet, retrying in {}s",
        self.poll_interval.as_secs()
      );
      thread::sleep(self.poll_interval);
    }
  }
}
