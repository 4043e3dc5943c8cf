use {
  super::*,
  redb::{ReadTransaction, WriteTransaction},
  serde::de::DeserializeOwned,
};

pub fn try_init_tables<'db, 'a>(
  wtx: &'a WriteTransaction<'db>,
  rtx: &'a ReadTransaction<'db>,
) -> Result<bool, StoreError> {
  if rtx.open_table(TOKEN_BALANCES).is_err() {
    wtx.open_table(TOKEN_BALANCES)?;
    wtx.open_table(TRANSFERABLE_BALANCES)?;
    wtx.open_table(INSCRIBE_DATA)?;
    wtx.open_table(RESONANCES)?;
    wtx.open_table(USER_LAST_CHANT)?;
    wtx.open_table(MINT_RECORDS)?;
    wtx.open_table(INSCRIBE_RECORDS)?;
    wtx.open_table(INSCRIBE_TRANSFER_RECORDS)?;
    wtx.open_table(CHANT_RECORDS)?;
    wtx.open_table(SET_PRICE_RECORDS)?;
    wtx.open_table(RESONANCE_RECORDS)?;
    wtx.open_table(TRANSFER_RECORDS)?;
    return Ok(true);
  }

  Ok(false)
}

pub struct TokenDataStoreReader<'db, 'a> {
  wrapper: ReaderWrapper<'db, 'a>,
}

pub(super) fn new_with_wtx<'db, 'a>(
  wtx: &'a WriteTransaction<'db>,
) -> TokenDataStoreReader<'db, 'a> {
  TokenDataStoreReader {
    wrapper: ReaderWrapper::Wtx(wtx),
  }
}

impl<'db, 'a> TokenDataStoreReader<'db, 'a> {
  pub fn new(rtx: &'a ReadTransaction<'db>) -> Self {
    Self {
      wrapper: ReaderWrapper::Rtx(rtx),
    }
  }

  fn get<T: DeserializeOwned>(
    &self,
    definition: TableDefinition<&'static str, &'static [u8]>,
    key: &str,
  ) -> Result<Option<T>, StoreError> {
    self
      .wrapper
      .open_table(definition)?
      .get(key)?
      .map(|v| decode(v.value()))
      .transpose()
  }
}

impl<'db, 'a> TokenDataStoreReadOnly for TokenDataStoreReader<'db, 'a> {
  type Error = StoreError;

  fn get_balance(&self, address: &str) -> Result<Num, Self::Error> {
    Ok(self.get(TOKEN_BALANCES, address)?.unwrap_or_default())
  }

  fn get_transferable_balance(&self, address: &str) -> Result<Num, Self::Error> {
    Ok(self.get(TRANSFERABLE_BALANCES, address)?.unwrap_or_default())
  }

  fn get_inscribe_data(&self, hash: &str) -> Result<Option<InscribeData>, Self::Error> {
    self.get(INSCRIBE_DATA, hash)
  }

  fn get_resonance(
    &self,
    hash: &str,
    address: &str,
  ) -> Result<Option<ResonanceRelation>, Self::Error> {
    self.get(RESONANCES, &resonance_key(hash, address))
  }

  fn get_resonances(&self, hash: &str) -> Result<Vec<ResonanceRelation>, Self::Error> {
    let table = self.wrapper.open_table(RESONANCES)?;
    let min = min_resonance_key(hash);
    let max = max_resonance_key(hash);

    let mut relations = Vec::new();
    for result in table.range(min.as_str()..max.as_str())? {
      let (_, data) = result?;
      relations.push(decode(data.value())?);
    }

    Ok(relations)
  }

  fn get_last_chant(&self, address: &str) -> Result<Option<u64>, Self::Error> {
    self.get(USER_LAST_CHANT, address)
  }

  fn get_op_records(&self, inscription_id: &InscriptionId) -> Result<Vec<OpRecord>, Self::Error> {
    let key = inscription_id.to_string();
    let mut records = Vec::new();

    if let Some(record) = self.get(MINT_RECORDS, &key)? {
      records.push(OpRecord::Mint(record));
    }
    if let Some(record) = self.get(INSCRIBE_RECORDS, &key)? {
      records.push(OpRecord::Inscribe(record));
    }
    if let Some(record) = self.get(INSCRIBE_TRANSFER_RECORDS, &key)? {
      records.push(OpRecord::InscribeTransfer(record));
    }
    if let Some(record) = self.get(CHANT_RECORDS, &key)? {
      records.push(OpRecord::Chant(record));
    }
    if let Some(record) = self.get(SET_PRICE_RECORDS, &key)? {
      records.push(OpRecord::SetPrice(record));
    }
    if let Some(record) = self.get(RESONANCE_RECORDS, &key)? {
      records.push(OpRecord::Resonance(record));
    }
    if let Some(record) = self.get(TRANSFER_RECORDS, &key)? {
      records.push(OpRecord::Transfer(record));
    }

    Ok(records)
  }
}
