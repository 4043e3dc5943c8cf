use {
  super::OpState,
  crate::{pdi::protocol::token::Num, InscriptionId},
  serde::{Deserialize, Serialize},
};

/// A claimed data hash and its economic state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InscribeData {
  pub hash: String,
  pub inscription_id: InscriptionId,
  pub owner: String,
  pub block_height: u64,
  pub timestamp: u32,
  pub text: Option<String>,
  pub price: Num,
  pub resonance_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResonanceRelation {
  pub hash: String,
  pub address: String,
  pub inscription_id: InscriptionId,
  pub block_height: u64,
  pub timestamp: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MintType {
  Normal,
  Lucky,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MintRecord {
  pub inscription_id: InscriptionId,
  pub inscription_number: i64,
  pub block_height: u64,
  pub timestamp: u32,
  pub address: String,
  pub lucky: Option<String>,
  pub mint_type: MintType,
  /// The amount asked for in the inscription.
  pub declared_amt: Option<Num>,
  /// The amount actually credited, after the per-mint cap.
  pub amt: Num,
  pub state: OpState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InscribeRecord {
  pub inscription_id: InscriptionId,
  pub inscription_number: i64,
  pub block_height: u64,
  pub timestamp: u32,
  pub address: String,
  pub hash: String,
  pub text: Option<String>,
  pub amt: Option<Num>,
  pub price: Num,
  pub point: u64,
  pub weight: Num,
  pub state: OpState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InscribeTransferRecord {
  pub inscription_id: InscriptionId,
  pub inscription_number: i64,
  pub block_height: u64,
  pub timestamp: u32,
  pub hash: String,
  pub from: String,
  pub to: Option<String>,
  pub state: OpState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChantRecord {
  pub inscription_id: InscriptionId,
  pub inscription_number: i64,
  pub block_height: u64,
  pub timestamp: u32,
  pub address: String,
  pub hash: String,
  pub owner: Option<String>,
  pub stamina: Num,
  pub user_bonus: Num,
  pub owner_bonus: Num,
  pub state: OpState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetPriceRecord {
  pub inscription_id: InscriptionId,
  pub inscription_number: i64,
  pub block_height: u64,
  pub timestamp: u32,
  pub address: String,
  pub hash: String,
  pub price: Num,
  pub state: OpState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResonanceRecord {
  pub inscription_id: InscriptionId,
  pub inscription_number: i64,
  pub block_height: u64,
  pub timestamp: u32,
  pub address: String,
  pub to: Option<String>,
  pub hash: String,
  pub amt: Option<Num>,
  pub owner_bonus: Num,
  pub foundation_bonus: Num,
  pub state: OpState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenTransferRecord {
  pub inscription_id: InscriptionId,
  pub inscription_number: i64,
  pub block_height: u64,
  pub timestamp: u32,
  pub from: String,
  pub to: Option<String>,
  pub amt: Option<Num>,
  pub state: OpState,
}

/// Any audit row, for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OpRecord {
  Mint(MintRecord),
  Inscribe(InscribeRecord),
  InscribeTransfer(InscribeTransferRecord),
  Chant(ChantRecord),
  SetPrice(SetPriceRecord),
  Resonance(ResonanceRecord),
  Transfer(TokenTransferRecord),
}

impl OpRecord {
  pub fn state(&self) -> OpState {
    match self {
      Self::Mint(record) => record.state,
      Self::Inscribe(record) => record.state,
      Self::InscribeTransfer(record) => record.state,
      Self::Chant(record) => record.state,
      Self::SetPrice(record) => record.state,
      Self::Resonance(record) => record.state,
      Self::Transfer(record) => record.state,
    }
  }
}
