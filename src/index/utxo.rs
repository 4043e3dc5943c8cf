use {super::*, crate::client::BitcoinRpc, std::collections::HashMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo {
  pub value: u64,
  pub address: Option<String>,
}

/// Memoized output values and addresses. Entries never change once an output
/// exists, so nothing is evicted.
#[derive(Debug, Default)]
pub struct UtxoCache {
  entries: HashMap<OutPoint, Utxo>,
}

impl UtxoCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn get<B: BitcoinRpc + ?Sized>(&mut self, bitcoin: &B, outpoint: &OutPoint) -> Result<Utxo> {
    if let Some(utxo) = self.entries.get(outpoint) {
      return Ok(utxo.clone());
    }

    let tx = bitcoin.transaction(&outpoint.txid)?;
    self.insert_transaction(&tx);

    self
      .entries
      .get(outpoint)
      .cloned()
      .ok_or_else(|| anyhow!("output {outpoint} out of range: tx has {} outputs", tx.outputs.len()))
  }

  pub fn value<B: BitcoinRpc + ?Sized>(&mut self, bitcoin: &B, outpoint: &OutPoint) -> Result<u64> {
    Ok(self.get(bitcoin, outpoint)?.value)
  }

  /// Caches every output of `tx`.
  pub fn insert_transaction(&mut self, tx: &TxSimple) {
    for (vout, output) in tx.outputs.iter().enumerate() {
      let vout = match u32::try_from(vout) {
        Ok(vout) => vout,
        Err(_) => break,
      };
      self.entries.insert(
        OutPoint {
          txid: tx.txid,
          vout,
        },
        Utxo {
          value: output.value,
          address: output.address.clone(),
        },
      );
    }
  }
}
