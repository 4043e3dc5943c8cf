use {
  super::*,
  bitcoin::{Address, Network, Transaction},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutSimple {
  pub value: u64,
  pub address: Option<String>,
}

/// A transaction reduced to what satoshi tracking needs: non-coinbase inputs in
/// order and outputs in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxSimple {
  pub txid: Txid,
  pub inputs: Vec<OutPoint>,
  pub outputs: Vec<TxOutSimple>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextSatPoint {
  NotApplicable,
  Moved {
    satpoint: SatPoint,
    address: Option<String>,
    value: u64,
  },
  SpentAsFee,
}

impl TxSimple {
  pub fn from_transaction(tx: &Transaction, network: Network) -> Self {
    Self {
      txid: tx.txid(),
      inputs: tx
        .input
        .iter()
        .filter(|input| !input.previous_output.is_null())
        .map(|input| input.previous_output)
        .collect(),
      outputs: tx
        .output
        .iter()
        .map(|output| TxOutSimple {
          value: output.value,
          address: Address::from_script(&output.script_pubkey, network)
            .ok()
            .map(|address| address.to_string()),
        })
        .collect(),
    }
  }

  pub fn output(&self, vout: u32) -> Option<&TxOutSimple> {
    self.outputs.get(usize::try_from(vout).ok()?)
  }

  /// Follows the satoshi at `satpoint` through this transaction.
  ///
  /// The satoshi's absolute position is its offset plus the values of all
  /// inputs spent before its own; outputs cover consecutive half-open ranges
  /// of that position space, and anything past the last output goes to fees.
  /// `input_value` is only asked about inputs preceding the matched one.
  pub fn calc_next_satpoint(
    &self,
    satpoint: SatPoint,
    mut input_value: impl FnMut(&OutPoint) -> Result<u64>,
  ) -> Result<NextSatPoint> {
    let matched = match self
      .inputs
      .iter()
      .position(|input| *input == satpoint.outpoint)
    {
      Some(matched) => matched,
      None => return Ok(NextSatPoint::NotApplicable),
    };

    let mut position = satpoint.offset;
    for input in &self.inputs[..matched] {
      position = position
        .checked_add(input_value(input)?)
        .ok_or_else(|| anyhow!("sat position overflow in tx {}", self.txid))?;
    }

    let mut start = 0u64;
    for (vout, output) in self.outputs.iter().enumerate() {
      let end = start
        .checked_add(output.value)
        .ok_or_else(|| anyhow!("output value overflow in tx {}", self.txid))?;

      if position < end {
        return Ok(NextSatPoint::Moved {
          satpoint: SatPoint {
            outpoint: OutPoint {
              txid: self.txid,
              vout: u32::try_from(vout)?,
            },
            offset: position - start,
          },
          address: output.address.clone(),
          value: output.value,
        });
      }

      start = end;
    }

    Ok(NextSatPoint::SpentAsFee)
  }
}
