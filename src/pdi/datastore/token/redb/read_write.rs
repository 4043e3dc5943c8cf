use {
  super::{read_only::new_with_wtx, *},
  redb::WriteTransaction,
};

pub struct TokenDataStore<'db, 'a> {
  wtx: &'a WriteTransaction<'db>,
}

impl<'db, 'a> TokenDataStore<'db, 'a> {
  pub fn new(wtx: &'a WriteTransaction<'db>) -> Self {
    Self { wtx }
  }
}

impl<'db, 'a> TokenDataStoreReadOnly for TokenDataStore<'db, 'a> {
  type Error = StoreError;

  fn get_balance(&self, address: &str) -> Result<Num, Self::Error> {
    new_with_wtx(self.wtx).get_balance(address)
  }

  fn get_transferable_balance(&self, address: &str) -> Result<Num, Self::Error> {
    new_with_wtx(self.wtx).get_transferable_balance(address)
  }

  fn get_inscribe_data(&self, hash: &str) -> Result<Option<InscribeData>, Self::Error> {
    new_with_wtx(self.wtx).get_inscribe_data(hash)
  }

  fn get_resonance(
    &self,
    hash: &str,
    address: &str,
  ) -> Result<Option<ResonanceRelation>, Self::Error> {
    new_with_wtx(self.wtx).get_resonance(hash, address)
  }

  fn get_resonances(&self, hash: &str) -> Result<Vec<ResonanceRelation>, Self::Error> {
    new_with_wtx(self.wtx).get_resonances(hash)
  }

  fn get_last_chant(&self, address: &str) -> Result<Option<u64>, Self::Error> {
    new_with_wtx(self.wtx).get_last_chant(address)
  }

  fn get_op_records(&self, inscription_id: &InscriptionId) -> Result<Vec<OpRecord>, Self::Error> {
    new_with_wtx(self.wtx).get_op_records(inscription_id)
  }
}

impl<'db, 'a> TokenDataStoreReadWrite for TokenDataStore<'db, 'a> {
  fn update_balance(&self, address: &str, balance: &Num) -> Result<(), Self::Error> {
    self
      .wtx
      .open_table(TOKEN_BALANCES)?
      .insert(address, encode(balance)?.as_slice())?;
    Ok(())
  }

  fn update_transferable_balance(&self, address: &str, amount: &Num) -> Result<(), Self::Error> {
    self
      .wtx
      .open_table(TRANSFERABLE_BALANCES)?
      .insert(address, encode(amount)?.as_slice())?;
    Ok(())
  }

  fn set_inscribe_data(&self, data: &InscribeData) -> Result<(), Self::Error> {
    self
      .wtx
      .open_table(INSCRIBE_DATA)?
      .insert(data.hash.as_str(), encode(data)?.as_slice())?;
    Ok(())
  }

  fn insert_resonance(&self, relation: &ResonanceRelation) -> Result<(), Self::Error> {
    self.wtx.open_table(RESONANCES)?.insert(
      resonance_key(&relation.hash, &relation.address).as_str(),
      encode(relation)?.as_slice(),
    )?;
    Ok(())
  }

  fn remove_resonance(&self, hash: &str, address: &str) -> Result<(), Self::Error> {
    self
      .wtx
      .open_table(RESONANCES)?
      .remove(resonance_key(hash, address).as_str())?;
    Ok(())
  }

  fn set_last_chant(&self, address: &str, block_height: u64) -> Result<(), Self::Error> {
    self
      .wtx
      .open_table(USER_LAST_CHANT)?
      .insert(address, encode(&block_height)?.as_slice())?;
    Ok(())
  }

  fn insert_op_record(&self, record: &OpRecord) -> Result<(), Self::Error> {
    let (definition, inscription_id) = record_table(record);
    self.wtx.open_table(definition)?.insert(
      inscription_id.to_string().as_str(),
      encode_record(record)?.as_slice(),
    )?;
    Ok(())
  }
}
