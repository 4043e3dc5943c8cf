use {
  super::*,
  crate::index::tx::TxSimple,
  bitcoin::BlockHash,
  std::io,
};

mod bitcoin_rpc;
mod oracle;
mod ord;

pub use self::{bitcoin_rpc::BitcoinClient, oracle::OracleClient, ord::OrdClient};

#[derive(Debug, Clone, PartialEq)]
pub struct BlockSimple {
  pub hash: BlockHash,
  pub height: u64,
  pub time: u32,
  pub txids: Vec<Txid>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InscriptionInfo {
  pub inscription_id: InscriptionId,
  pub number: i64,
  pub genesis_height: u64,
  pub timestamp: u32,
  pub content_type: Option<String>,
  pub satpoint: Option<SatPoint>,
}

pub trait BitcoinRpc {
  fn latest_height(&self) -> Result<u64>;

  fn block(&self, height: u64) -> Result<BlockSimple>;

  fn transaction(&self, txid: &Txid) -> Result<TxSimple>;

  /// Results are in request order. Any single failure fails the whole batch.
  fn transactions(&self, txids: &[Txid]) -> Result<Vec<TxSimple>> {
    txids.iter().map(|txid| self.transaction(txid)).collect()
  }
}

pub trait OrdRpc {
  fn latest_height(&self) -> Result<u64>;

  fn inscriptions_by_block(&self, height: u64) -> Result<Vec<InscriptionId>>;

  fn inscription(&self, inscription_id: &InscriptionId) -> Result<InscriptionInfo>;

  fn inscriptions(&self, inscription_ids: &[InscriptionId]) -> Result<Vec<InscriptionInfo>> {
    inscription_ids
      .iter()
      .map(|inscription_id| self.inscription(inscription_id))
      .collect()
  }

  /// `None` when the ord server has no content for the inscription.
  fn content(&self, inscription_id: &InscriptionId) -> Result<Option<Vec<u8>>>;
}

pub trait PointOracle {
  /// Blocks until the oracle has synced past `timestamp`. Unknown hashes have point 0.
  fn hash_point(&self, timestamp: u32, hash: &str) -> Result<u64>;
}

impl<T: PointOracle + ?Sized> PointOracle for &T {
  fn hash_point(&self, timestamp: u32, hash: &str) -> Result<u64> {
    (**self).hash_point(timestamp, hash)
  }
}

impl<T: PointOracle + ?Sized> PointOracle for Box<T> {
  fn hash_point(&self, timestamp: u32, hash: &str) -> Result<u64> {
    (**self).hash_point(timestamp, hash)
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
  pub retries: u32,
  pub interval: Duration,
}

impl RetryPolicy {
  pub fn new(config: &config::RpcConfig) -> Self {
    Self {
      retries: config.retries,
      interval: Duration::from_millis(config.retry_interval),
    }
  }
}

const TRANSIENT_MESSAGES: [&str; 3] = ["timed out", "connection refused", "connection reset"];

/// Whether `err` is a timeout, refused connection or reset connection anywhere in its chain.
pub fn is_transient(err: &Error) -> bool {
  err.chain().any(|cause| {
    if let Some(err) = cause.downcast_ref::<reqwest::Error>() {
      return err.is_timeout() || err.is_connect();
    }

    if let Some(err) = cause.downcast_ref::<io::Error>() {
      return matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionReset
      );
    }

    if cause.downcast_ref::<bitcoincore_rpc::Error>().is_some() {
      let message = cause.to_string().to_lowercase();
      return TRANSIENT_MESSAGES
        .iter()
        .any(|transient| message.contains(transient));
    }

    false
  })
}

pub fn with_retries<T>(
  policy: &RetryPolicy,
  what: impl Display,
  mut f: impl FnMut() -> Result<T>,
) -> Result<T> {
  let mut errors = 0;

  loop {
    match f() {
      Ok(result) => return Ok(result),
      Err(err) if errors < policy.retries && is_transient(&err) => {
        errors += 1;
        log::warn!(
          "failed to {what}, retrying in {}ms ({errors}/{}): {err}",
          policy.interval.as_millis(),
          policy.retries
        );
        thread::sleep(policy.interval);
      }
      Err(err) => return Err(err.context(format!("failed to {what}"))),
    }
  }
}

#[cfg(test)]
mod tests {
  use {super::*, std::cell::Cell};

  fn policy(retries: u32) -> RetryPolicy {
    RetryPolicy {
      retries,
      interval: Duration::from_millis(0),
    }
  }

  fn timeout() -> Error {
    io::Error::new(io::ErrorKind::TimedOut, "timed out").into()
  }

  #[test]
  fn transient_errors_are_detected_through_context() {
    assert!(is_transient(&timeout()));
    assert!(is_transient(&timeout().context("fetch block")));
    assert!(is_transient(
      &io::Error::new(io::ErrorKind::ConnectionRefused, "refused").into()
    ));
    assert!(!is_transient(
      &io::Error::new(io::ErrorKind::NotFound, "missing").into()
    ));
    assert!(!is_transient(&anyhow!("timed out")));
  }

  #[test]
  fn retries_transient_errors_until_success() {
    let calls = Cell::new(0);
    let result = with_retries(&policy(3), "fetch", || {
      calls.set(calls.get() + 1);
      if calls.get() < 3 {
        Err(timeout())
      } else {
        Ok(42)
      }
    });
    assert_eq!(result.unwrap(), 42);
    assert_eq!(calls.get(), 3);
  }

  #[test]
  fn gives_up_after_retry_budget() {
    let calls = Cell::new(0);
    let result: Result<()> = with_retries(&policy(2), "fetch", || {
      calls.set(calls.get() + 1);
      Err(timeout())
    });
    assert!(result.is_err());
    assert_eq!(calls.get(), 3);
  }

  #[test]
  fn permanent_errors_are_not_retried() {
    let calls = Cell::new(0);
    let result: Result<()> = with_retries(&policy(5), "fetch", || {
      calls.set(calls.get() + 1);
      Err(anyhow!("bad request"))
    });
    assert!(result.is_err());
    assert_eq!(calls.get(), 1);
  }
}
