use {
  super::{monitor::TransferMonitor, *},
  crate::{
    client::{BitcoinRpc, InscriptionInfo, OrdRpc},
    config::TokenConfig,
    pdi::{datastore::ord::InscriptionEntry, protocol::token::Op},
  },
};

/// Finds the protocol inscriptions created at `height`, in inscription number
/// order. Content that does not parse as a protocol op is skipped, as are
/// inscriptions whose first satoshi went to fees or to an output without an
/// address.
pub fn scan_block<B: BitcoinRpc + ?Sized, R: OrdRpc + ?Sized>(
  bitcoin: &B,
  ord: &R,
  monitor: &mut TransferMonitor,
  config: &TokenConfig,
  height: u64,
) -> Result<Vec<InscriptionEntry>> {
  let inscription_ids = ord.inscriptions_by_block(height)?;
  if inscription_ids.is_empty() {
    log::debug!("no inscriptions in block {height}");
    return Ok(Vec::new());
  }

  let mut infos = ord.inscriptions(&inscription_ids)?;
  infos.sort_by_key(|info| info.number);

  let mut entries = Vec::new();
  for info in infos {
    if info.genesis_height != height {
      bail!(
        "inscription {} has genesis height {} in block {height}",
        info.inscription_id,
        info.genesis_height
      );
    }

    if let Some(entry) = scan_inscription(bitcoin, ord, monitor, config, height, info)? {
      entries.push(entry);
    }
  }

  log::info!(
    "block {height}: {} of {} inscriptions are protocol ops",
    entries.len(),
    inscription_ids.len()
  );

  Ok(entries)
}

fn scan_inscription<B: BitcoinRpc + ?Sized, R: OrdRpc + ?Sized>(
  bitcoin: &B,
  ord: &R,
  monitor: &mut TransferMonitor,
  config: &TokenConfig,
  height: u64,
  info: InscriptionInfo,
) -> Result<Option<InscriptionEntry>> {
  let inscription_id = info.inscription_id;

  let content = match ord.content(&inscription_id)? {
    Some(content) => content,
    None => {
      log::debug!("inscription {inscription_id} has no content");
      return Ok(None);
    }
  };

  let op = match Op::parse(info.content_type.as_deref(), &content, &config.token_name) {
    Ok(op) => op,
    Err(e) => {
      log::trace!("skip inscription {inscription_id}: {e}");
      return Ok(None);
    }
  };

  let genesis = match monitor.calc_create_satpoint(bitcoin, &inscription_id)? {
    Some(genesis) => genesis,
    None => {
      log::warn!("inscription {inscription_id} was spent as fee at genesis");
      return Ok(None);
    }
  };

  let creator = match genesis.address {
    Some(address) => address,
    None => {
      log::warn!(
        "inscription {inscription_id} landed on {} without an address",
        genesis.satpoint
      );
      return Ok(None);
    }
  };

  log::debug!(
    "found {} inscription {inscription_id} by {creator}",
    op.kind()
  );

  Ok(Some(InscriptionEntry {
    inscription_id,
    inscription_number: info.number,
    block_height: height,
    timestamp: info.timestamp,
    creator,
    satpoint: genesis.satpoint,
    value: genesis.value,
    commit_txid: genesis.commit_txid,
    content: String::from_utf8_lossy(&content).into_owned(),
    op,
  }))
}
