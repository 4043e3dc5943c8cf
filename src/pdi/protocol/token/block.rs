use {
  super::{
    executor::{
      chant, compete,
      inscribe::{self, PendingInscribe},
      mint,
      resonance::{self, PendingResonance},
      set_price, transfer, ExecutionContext,
    },
    HashWeightOracle, OpKind,
  },
  crate::{
    client::PointOracle,
    config::TokenConfig,
    pdi::{
      datastore::{
        ord::{InscriptionEntry, OrdDataStoreReadOnly, TransferRecord},
        token::{OpRecord, TokenDataStoreReadWrite},
        StateRWriter,
      },
      protocol::BlockContext,
    },
    Result,
  },
  anyhow::anyhow,
  std::collections::HashSet,
};

/// Applies the token operations of one block.
///
/// New inscriptions are handled first, then transfers, then the deferred
/// Inscribe and Resonance competitions. Every call writes through the same
/// store, so dropping the surrounding write transaction discards the block.
pub struct TokenBlockIndexer<'a, P> {
  context: ExecutionContext<'a, P>,
  pending_inscribes: Vec<PendingInscribe>,
  // first moves of inscribe candidates that are still pending
  pending_inscribe_transfers: Vec<(InscriptionEntry, TransferRecord)>,
  pending_resonances: Vec<PendingResonance>,
  chanted: HashSet<String>,
}

impl<'a, P: PointOracle> TokenBlockIndexer<'a, P> {
  pub fn new(
    block: BlockContext,
    config: &'a TokenConfig,
    weights: &'a HashWeightOracle<P>,
  ) -> Self {
    Self {
      context: ExecutionContext {
        block,
        config,
        weights,
      },
      pending_inscribes: Vec::new(),
      pending_inscribe_transfers: Vec::new(),
      pending_resonances: Vec::new(),
      chanted: HashSet::new(),
    }
  }

  /// Runs the whole block: `inscriptions` are the entries created in it and
  /// `transfers` the moves detected in it, both in chain order.
  pub fn index_block<S: StateRWriter>(
    mut self,
    state: &S,
    inscriptions: &[InscriptionEntry],
    transfers: &[TransferRecord],
  ) -> Result<Vec<OpRecord>> {
    let mut records = Vec::new();

    for entry in inscriptions {
      records.extend(self.index_inscription(state.token(), entry)?);
    }

    for record in transfers {
      records.extend(self.index_transfer(state.ord(), state.token(), record)?);
    }

    records.extend(self.flush(state.token())?);

    log::info!(
      "block {} token operations: {}",
      self.context.block.blockheight,
      records.len()
    );

    Ok(records)
  }

  /// Handles a protocol inscription created in this block. Inscribe
  /// candidates are held until `flush`.
  pub fn index_inscription<N: TokenDataStoreReadWrite>(
    &mut self,
    store: &N,
    entry: &InscriptionEntry,
  ) -> Result<Option<OpRecord>> {
    let context = &self.context;
    let record = match entry.op.kind() {
      OpKind::Mint => OpRecord::Mint(mint::execute(context, store, entry)?),
      OpKind::Transfer => OpRecord::Transfer(transfer::execute_inscribe(context, store, entry)?),
      OpKind::Chant => OpRecord::Chant(chant::execute(context, store, entry, &mut self.chanted)?),
      OpKind::SetPrice => OpRecord::SetPrice(set_price::execute(context, store, entry)?),
      OpKind::Inscribe => {
        let mut pending = inscribe::admit(context, store, entry)?;
        compete(&mut self.pending_inscribes, &mut pending);
        self.pending_inscribes.push(pending);
        return Ok(None);
      }
      // applied on its first transfer
      OpKind::Resonance => return Ok(None),
    };

    Ok(Some(record))
  }

  /// Handles a move of a protocol inscription. Fee records carry no token
  /// effect.
  pub fn index_transfer<O: OrdDataStoreReadOnly, N: TokenDataStoreReadWrite>(
    &mut self,
    ord_store: &O,
    store: &N,
    transfer: &TransferRecord,
  ) -> Result<Option<OpRecord>> {
    if transfer.is_spent_as_fee() {
      return Ok(None);
    }

    let entry = ord_store
      .get_inscription_entry(&transfer.inscription_id)
      .map_err(|e| anyhow!("failed to get inscription entry! error: {e}"))?
      .ok_or_else(|| anyhow!("inscription {} not found", transfer.inscription_id))?;

    let context = &self.context;
    let record = match entry.op.kind() {
      OpKind::Inscribe
        if self
          .pending_inscribes
          .iter()
          .any(|pending| pending.entry.inscription_id == entry.inscription_id) =>
      {
        self
          .pending_inscribe_transfers
          .push((entry, transfer.clone()));
        None
      }
      OpKind::Inscribe => {
        inscribe::execute_transfer(context, store, &entry, transfer)?.map(OpRecord::InscribeTransfer)
      }
      OpKind::Transfer => {
        transfer::execute_transfer(context, store, &entry, transfer)?.map(OpRecord::Transfer)
      }
      OpKind::Resonance if transfer.index == 1 => {
        let mut pending = resonance::admit(context, store, &entry, transfer)?;
        compete(&mut self.pending_resonances, &mut pending);
        self.pending_resonances.push(pending);
        None
      }
      _ => None,
    };

    Ok(record)
  }

  /// Settles the deferred competitions: every Inscribe candidate, then the
  /// moves of those candidates, then every Resonance candidate, in arrival
  /// order.
  pub fn flush<N: TokenDataStoreReadWrite>(&mut self, store: &N) -> Result<Vec<OpRecord>> {
    let mut records = Vec::new();

    for pending in self.pending_inscribes.drain(..) {
      records.push(OpRecord::Inscribe(inscribe::flush(
        &self.context,
        store,
        pending,
      )?));
    }

    for (entry, transfer) in self.pending_inscribe_transfers.drain(..) {
      records.extend(
        inscribe::execute_transfer(&self.context, store, &entry, &transfer)?
          .map(OpRecord::InscribeTransfer),
      );
    }

    for pending in self.pending_resonances.drain(..) {
      records.push(OpRecord::Resonance(resonance::flush(
        &self.context,
        store,
        pending,
      )?));
    }

    Ok(records)
  }
}
