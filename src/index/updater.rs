use {
  super::{monitor::TransferMonitor, scanner, *},
  crate::pdi::{
    datastore::{ord::OrdDataStoreReadWrite, StateRWriter, StateReadWrite},
    protocol::{token::TokenBlockIndexer, BlockContext},
  },
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockSummary {
  pub height: u64,
  pub inscriptions: usize,
  pub transfers: usize,
  pub operations: usize,
}

/// Indexes one block into a single write transaction.
pub(super) struct BlockUpdater<'a> {
  pub(super) bitcoin: &'a dyn BitcoinRpc,
  pub(super) ord: &'a dyn OrdRpc,
  pub(super) weights: &'a HashWeightOracle<Box<dyn PointOracle>>,
  pub(super) config: &'a TokenConfig,
  pub(super) monitor: &'a mut TransferMonitor,
}

impl<'a> BlockUpdater<'a> {
  /// Commits the block and its checkpoint together. On error nothing is
  /// written, but the monitor may have advanced and must be reloaded.
  pub(super) fn update_block(&mut self, database: &Database, height: u64) -> Result<BlockSummary> {
    let block = self.bitcoin.block(height)?;

    let wtx = database.begin_write()?;

    let summary = {
      let state = StateReadWrite::new(&wtx);

      let entries = scanner::scan_block(self.bitcoin, self.ord, self.monitor, self.config, height)?;

      for entry in &entries {
        self.monitor.add_new_inscription(state.ord(), entry)?;
      }

      let transfers = self.monitor.process_block(self.bitcoin, state.ord(), &block)?;

      let records = TokenBlockIndexer::new(
        BlockContext {
          blockheight: height,
          blocktime: block.time,
        },
        self.config,
        self.weights,
      )
      .index_block(&state, &entries, &transfers)?;

      state.ord().set_checkpoint(height)?;

      BlockSummary {
        height,
        inscriptions: entries.len(),
        transfers: transfers.len(),
        operations: records.len(),
      }
    };

    wtx.commit()?;

    log::info!(
      "indexed block {height} {}: {} inscriptions, {} transfers, {} operations, {} tracked",
      block.hash,
      summary.inscriptions,
      summary.transfers,
      summary.operations,
      self.monitor.len()
    );

    Ok(summary)
  }
}
