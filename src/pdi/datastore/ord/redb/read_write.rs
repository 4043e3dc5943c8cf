use {
  super::{read_only::new_with_wtx, *},
  redb::WriteTransaction,
};

pub struct OrdDbReadWriter<'db, 'a> {
  wtx: &'a WriteTransaction<'db>,
}

impl<'db, 'a> OrdDbReadWriter<'db, 'a> {
  pub fn new(wtx: &'a WriteTransaction<'db>) -> Self {
    Self { wtx }
  }
}

impl<'db, 'a> OrdDataStoreReadOnly for OrdDbReadWriter<'db, 'a> {
  type Error = StoreError;

  fn get_inscription_entry(
    &self,
    inscription_id: &InscriptionId,
  ) -> Result<Option<InscriptionEntry>, Self::Error> {
    new_with_wtx(self.wtx).get_inscription_entry(inscription_id)
  }

  fn get_inscription_count(&self) -> Result<u64, Self::Error> {
    new_with_wtx(self.wtx).get_inscription_count()
  }

  fn get_transfers(
    &self,
    inscription_id: &InscriptionId,
  ) -> Result<Vec<TransferRecord>, Self::Error> {
    new_with_wtx(self.wtx).get_transfers(inscription_id)
  }

  fn get_latest_transfer(
    &self,
    inscription_id: &InscriptionId,
  ) -> Result<Option<TransferRecord>, Self::Error> {
    new_with_wtx(self.wtx).get_latest_transfer(inscription_id)
  }

  fn get_latest_transfers(&self) -> Result<Vec<TransferRecord>, Self::Error> {
    new_with_wtx(self.wtx).get_latest_transfers()
  }

  fn get_checkpoint(&self) -> Result<Option<u64>, Self::Error> {
    new_with_wtx(self.wtx).get_checkpoint()
  }
}

impl<'db, 'a> OrdDataStoreReadWrite for OrdDbReadWriter<'db, 'a> {
  fn insert_inscription_entry(&self, entry: &InscriptionEntry) -> Result<(), Self::Error> {
    self.wtx.open_table(INSCRIPTION_ID_TO_ENTRY)?.insert(
      entry.inscription_id.to_string().as_str(),
      encode(entry)?.as_slice(),
    )?;
    Ok(())
  }

  fn insert_transfer(&self, record: &TransferRecord) -> Result<(), Self::Error> {
    self.wtx.open_table(INSCRIPTION_TRANSFERS)?.insert(
      transfer_key(&record.inscription_id, record.index).as_str(),
      encode(record)?.as_slice(),
    )?;
    Ok(())
  }

  fn set_checkpoint(&self, height: u64) -> Result<(), Self::Error> {
    self
      .wtx
      .open_table(STATE)?
      .insert(CHECKPOINT_KEY, encode(&height)?.as_slice())?;
    Ok(())
  }
}
