use {
  super::*,
  redb::{ReadTransaction, WriteTransaction},
  std::collections::BTreeMap,
};

pub fn try_init_tables<'db, 'a>(
  wtx: &'a WriteTransaction<'db>,
  rtx: &'a ReadTransaction<'db>,
) -> Result<bool, StoreError> {
  if rtx.open_table(INSCRIPTION_ID_TO_ENTRY).is_err() {
    wtx.open_table(INSCRIPTION_ID_TO_ENTRY)?;
    wtx.open_table(INSCRIPTION_TRANSFERS)?;
    wtx.open_table(STATE)?;
    return Ok(true);
  }

  Ok(false)
}

pub struct OrdDbReader<'db, 'a> {
  wrapper: ReaderWrapper<'db, 'a>,
}

pub(super) fn new_with_wtx<'db, 'a>(wtx: &'a WriteTransaction<'db>) -> OrdDbReader<'db, 'a> {
  OrdDbReader {
    wrapper: ReaderWrapper::Wtx(wtx),
  }
}

impl<'db, 'a> OrdDbReader<'db, 'a> {
  pub fn new(rtx: &'a ReadTransaction<'db>) -> Self {
    Self {
      wrapper: ReaderWrapper::Rtx(rtx),
    }
  }
}

impl<'db, 'a> OrdDataStoreReadOnly for OrdDbReader<'db, 'a> {
  type Error = StoreError;

  fn get_inscription_entry(
    &self,
    inscription_id: &InscriptionId,
  ) -> Result<Option<InscriptionEntry>, Self::Error> {
    self
      .wrapper
      .open_table(INSCRIPTION_ID_TO_ENTRY)?
      .get(inscription_id.to_string().as_str())?
      .map(|v| decode(v.value()))
      .transpose()
  }

  fn get_inscription_count(&self) -> Result<u64, Self::Error> {
    Ok(self.wrapper.open_table(INSCRIPTION_ID_TO_ENTRY)?.len()?)
  }

  fn get_transfers(
    &self,
    inscription_id: &InscriptionId,
  ) -> Result<Vec<TransferRecord>, Self::Error> {
    let table = self.wrapper.open_table(INSCRIPTION_TRANSFERS)?;
    let min = min_transfer_key(inscription_id);
    let max = max_transfer_key(inscription_id);

    let mut records = Vec::new();
    for result in table.range(min.as_str()..=max.as_str())? {
      let (_, data) = result?;
      records.push(decode(data.value())?);
    }

    Ok(records)
  }

  fn get_latest_transfer(
    &self,
    inscription_id: &InscriptionId,
  ) -> Result<Option<TransferRecord>, Self::Error> {
    let table = self.wrapper.open_table(INSCRIPTION_TRANSFERS)?;
    let min = min_transfer_key(inscription_id);
    let max = max_transfer_key(inscription_id);

    let latest = table
      .range(min.as_str()..=max.as_str())?
      .next_back()
      .map(|result| {
        let (_, data) = result?;
        decode(data.value())
      })
      .transpose();

    latest
  }

  fn get_latest_transfers(&self) -> Result<Vec<TransferRecord>, Self::Error> {
    let table = self.wrapper.open_table(INSCRIPTION_TRANSFERS)?;

    // keys sort by inscription id, then index
    let mut latest = BTreeMap::new();
    for result in table.iter()? {
      let (_, data) = result?;
      let record: TransferRecord = decode(data.value())?;
      latest.insert(record.inscription_id, record);
    }

    Ok(latest.into_values().collect())
  }

  fn get_checkpoint(&self) -> Result<Option<u64>, Self::Error> {
    self
      .wrapper
      .open_table(STATE)?
      .get(CHECKPOINT_KEY)?
      .map(|v| decode(v.value()))
      .transpose()
  }
}
