mod block;
mod error;
mod executor;
mod hash;
mod num;
mod operation;
pub(crate) mod params;
#[cfg(test)]
pub(crate) mod test;
mod weight;

pub use self::{
  block::TokenBlockIndexer,
  error::{Error, JSONError, NumError},
  executor::{transfer_balance, ExecutionContext},
  hash::{distance, string_number, MixHash, MixHashError},
  num::Num,
  operation::{Op, OpKind, Param},
  weight::{calc_weight, HashWeight, HashWeightOracle},
};
