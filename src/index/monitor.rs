use {
  super::{tx::NextSatPoint, utxo::UtxoCache, *},
  crate::{
    client::{BitcoinRpc, BlockSimple},
    pdi::{
      datastore::ord::{
        InscriptionEntry, OrdDataStoreReadOnly, OrdDataStoreReadWrite, TransferRecord,
      },
      protocol::token::params::FEE_ADDRESS,
    },
  },
  std::collections::BTreeMap,
};

/// The current location of an inscription that is still on chain.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedInscription {
  pub inscription_id: InscriptionId,
  pub inscription_number: i64,
  pub satpoint: SatPoint,
  /// Last known holder. An output without an address keeps the previous one.
  pub address: Option<String>,
  pub index: u32,
}

impl From<&TransferRecord> for TrackedInscription {
  fn from(record: &TransferRecord) -> Self {
    Self {
      inscription_id: record.inscription_id,
      inscription_number: record.inscription_number,
      satpoint: record.satpoint,
      address: record.to.clone().or_else(|| record.from.clone()),
      index: record.index,
    }
  }
}

/// Where a new inscription's satoshi landed in its reveal transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct GenesisLocation {
  pub satpoint: SatPoint,
  pub address: Option<String>,
  pub value: u64,
  pub commit_txid: Txid,
}

/// Follows tracked inscriptions from output to output.
///
/// Several inscriptions may share an output, so each outpoint holds every
/// inscription on it in insertion order.
#[derive(Debug, Default)]
pub struct TransferMonitor {
  live: BTreeMap<OutPoint, Vec<TrackedInscription>>,
  utxos: UtxoCache,
}

impl TransferMonitor {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of inscriptions currently tracked.
  pub fn len(&self) -> usize {
    self.live.values().map(Vec::len).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.live.is_empty()
  }

  pub fn inscriptions_on(&self, outpoint: &OutPoint) -> &[TrackedInscription] {
    self
      .live
      .get(outpoint)
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  /// Rebuilds the live index from the last persisted record of every
  /// inscription. Inscriptions lost to fees stay untracked.
  pub fn load<O: OrdDataStoreReadOnly>(&mut self, store: &O) -> Result {
    self.live.clear();

    for record in store
      .get_latest_transfers()
      .map_err(|e| anyhow!("failed to load transfer records! error: {e}"))?
    {
      if record.is_spent_as_fee() {
        continue;
      }
      self.track(TrackedInscription::from(&record));
    }

    log::info!("loaded {} tracked inscriptions", self.len());

    Ok(())
  }

  fn track(&mut self, tracked: TrackedInscription) {
    self
      .live
      .entry(tracked.satpoint.outpoint)
      .or_default()
      .push(tracked);
  }

  /// Locates the first satoshi of the reveal input named by the inscription
  /// id. `None` means that satoshi went to fees.
  pub fn calc_create_satpoint<B: BitcoinRpc + ?Sized>(
    &mut self,
    bitcoin: &B,
    inscription_id: &InscriptionId,
  ) -> Result<Option<GenesisLocation>> {
    let tx = bitcoin.transaction(&inscription_id.txid)?;
    self.utxos.insert_transaction(&tx);

    let last = match tx.inputs.len().checked_sub(1) {
      Some(last) => last,
      None => bail!("reveal tx {} of {inscription_id} has no inputs", tx.txid),
    };

    let mut input = usize::try_from(inscription_id.index)?;
    if input > last {
      log::warn!(
        "inscription {inscription_id} points past the {} inputs of its reveal tx, using the last",
        tx.inputs.len()
      );
      input = last;
    }

    let outpoint = tx.inputs[input];
    let utxos = &mut self.utxos;
    let next = tx.calc_next_satpoint(
      SatPoint {
        outpoint,
        offset: 0,
      },
      |outpoint| utxos.value(bitcoin, outpoint),
    )?;

    match next {
      NextSatPoint::Moved {
        satpoint,
        address,
        value,
      } => Ok(Some(GenesisLocation {
        satpoint,
        address,
        value,
        commit_txid: outpoint.txid,
      })),
      NextSatPoint::SpentAsFee => Ok(None),
      NextSatPoint::NotApplicable => {
        bail!("reveal tx {} does not spend its own input {outpoint}", tx.txid)
      }
    }
  }

  /// Persists a new inscription with its genesis record and starts tracking
  /// it.
  pub fn add_new_inscription<O: OrdDataStoreReadWrite>(
    &mut self,
    store: &O,
    entry: &InscriptionEntry,
  ) -> Result<TransferRecord> {
    let record = TransferRecord {
      inscription_id: entry.inscription_id,
      inscription_number: entry.inscription_number,
      block_height: entry.block_height,
      timestamp: entry.timestamp,
      satpoint: entry.satpoint,
      from: None,
      to: Some(entry.creator.clone()),
      value: entry.value,
      index: 0,
    };

    store
      .insert_inscription_entry(entry)
      .map_err(|e| anyhow!("failed to insert inscription entry! error: {e}"))?;
    store
      .insert_transfer(&record)
      .map_err(|e| anyhow!("failed to insert transfer record! error: {e}"))?;

    self.track(TrackedInscription::from(&record));

    log::debug!(
      "tracking inscription {} at {}",
      entry.inscription_id,
      entry.satpoint
    );

    Ok(record)
  }

  /// Follows every tracked inscription spent in `block` and persists its new
  /// location. Returns the moves, in chain order. Inscriptions lost to fees
  /// get a terminal record and produce no event.
  pub fn process_block<B: BitcoinRpc + ?Sized, O: OrdDataStoreReadWrite>(
    &mut self,
    bitcoin: &B,
    store: &O,
    block: &BlockSimple,
  ) -> Result<Vec<TransferRecord>> {
    let mut transfers = Vec::new();

    if self.live.is_empty() {
      return Ok(transfers);
    }

    let txs = bitcoin.transactions(&block.txids)?;

    for tx in &txs {
      self.utxos.insert_transaction(tx);

      for input in &tx.inputs {
        let spent = match self.live.remove(input) {
          Some(spent) => spent,
          None => continue,
        };

        for tracked in spent {
          let utxos = &mut self.utxos;
          let next = tx.calc_next_satpoint(tracked.satpoint, |outpoint| {
            utxos.value(bitcoin, outpoint)
          })?;

          let index = tracked
            .index
            .checked_add(1)
            .ok_or_else(|| anyhow!("transfer index overflow for {}", tracked.inscription_id))?;

          let record = match next {
            NextSatPoint::Moved {
              satpoint,
              address,
              value,
            } => TransferRecord {
              inscription_id: tracked.inscription_id,
              inscription_number: tracked.inscription_number,
              block_height: block.height,
              timestamp: block.time,
              satpoint,
              from: tracked.address.clone(),
              to: address,
              value,
              index,
            },
            NextSatPoint::SpentAsFee => TransferRecord {
              inscription_id: tracked.inscription_id,
              inscription_number: tracked.inscription_number,
              block_height: block.height,
              timestamp: block.time,
              satpoint: SatPoint::zero(),
              from: tracked.address.clone(),
              to: Some(FEE_ADDRESS.into()),
              value: 0,
              index,
            },
            NextSatPoint::NotApplicable => bail!(
              "tx {} spends {input} but does not carry {}",
              tx.txid,
              tracked.inscription_id
            ),
          };

          store
            .insert_transfer(&record)
            .map_err(|e| anyhow!("failed to insert transfer record! error: {e}"))?;

          if record.is_spent_as_fee() {
            log::info!(
              "inscription {} spent as fee in {}",
              record.inscription_id,
              tx.txid
            );
            continue;
          }

          log::debug!(
            "inscription {} moved {} -> {}",
            record.inscription_id,
            tracked.satpoint,
            record.satpoint
          );

          self.track(TrackedInscription::from(&record));
          transfers.push(record);
        }
      }
    }

    Ok(transfers)
  }
}
