use {
  redb::{
    AccessGuard, Range, ReadOnlyTable, ReadTransaction, ReadableTable, RedbKey, RedbValue,
    StorageError, Table, TableDefinition, WriteTransaction,
  },
  serde::{de::DeserializeOwned, Serialize},
  std::{borrow::Borrow, ops::RangeBounds},
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("redb error: {0}")]
  Redb(#[from] redb::Error),

  #[error("codec error: {0}")]
  Codec(#[from] bincode::Error),
}

impl From<redb::TableError> for StoreError {
  fn from(e: redb::TableError) -> Self {
    Self::Redb(e.into())
  }
}

impl From<StorageError> for StoreError {
  fn from(e: StorageError) -> Self {
    Self::Redb(e.into())
  }
}

pub(crate) fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, StoreError> {
  Ok(bincode::serialize(value)?)
}

pub(crate) fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<T, StoreError> {
  Ok(bincode::deserialize(data)?)
}

/// Read access through either a read or a write transaction, so that writers
/// observe their own uncommitted changes.
pub(crate) enum ReaderWrapper<'db, 'a> {
  Rtx(&'a ReadTransaction<'db>),
  Wtx(&'a WriteTransaction<'db>),
}

impl<'db, 'a> ReaderWrapper<'db, 'a> {
  pub(crate) fn open_table<K: RedbKey + 'static, V: RedbValue + 'static>(
    &self,
    definition: TableDefinition<'_, K, V>,
  ) -> Result<TableWrapper<'db, '_, K, V>, StoreError> {
    match self {
      Self::Rtx(rtx) => Ok(TableWrapper::RtxTable(rtx.open_table(definition)?)),
      Self::Wtx(wtx) => Ok(TableWrapper::WtxTable(wtx.open_table(definition)?)),
    }
  }
}

pub(crate) enum TableWrapper<'db, 'txn, K: RedbKey + 'static, V: RedbValue + 'static> {
  RtxTable(ReadOnlyTable<'txn, K, V>),
  WtxTable(Table<'db, 'txn, K, V>),
}

impl<'db, 'txn, K: RedbKey + 'static, V: RedbValue + 'static> TableWrapper<'db, 'txn, K, V> {
  pub(crate) fn get<'a>(
    &self,
    key: impl Borrow<K::SelfType<'a>>,
  ) -> Result<Option<AccessGuard<'_, V>>, StorageError>
  where
    K: 'a,
  {
    match self {
      Self::RtxTable(rtx_table) => rtx_table.get(key),
      Self::WtxTable(wtx_table) => wtx_table.get(key),
    }
  }

  pub(crate) fn range<'a: 'b, 'b, KR>(
    &'a self,
    range: impl RangeBounds<KR> + 'b,
  ) -> Result<Range<'a, K, V>, StorageError>
  where
    K: 'a,
    KR: Borrow<K::SelfType<'b>> + 'b,
  {
    match self {
      Self::RtxTable(rtx_table) => rtx_table.range(range),
      Self::WtxTable(wtx_table) => wtx_table.range(range),
    }
  }

  pub(crate) fn iter(&self) -> Result<Range<K, V>, StorageError> {
    match self {
      Self::RtxTable(rtx_table) => rtx_table.iter(),
      Self::WtxTable(wtx_table) => wtx_table.iter(),
    }
  }

  pub(crate) fn len(&self) -> Result<u64, StorageError> {
    match self {
      Self::RtxTable(rtx_table) => rtx_table.len(),
      Self::WtxTable(wtx_table) => wtx_table.len(),
    }
  }
}
