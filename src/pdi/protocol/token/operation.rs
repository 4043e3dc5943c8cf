use {
  super::{error::JSONError, hash::MixHash, params::*, Num},
  serde::{Deserialize, Serialize},
  serde_json::{Map, Value},
  std::{fmt, str::FromStr},
};

const CONTENT_TYPES: [&str; 3] = ["text/plain;charset=utf-8", "text/plain", "application/json"];

/// A content field, kept even when it is malformed so that the operation can
/// still be recorded with an `INVALID_PARAMS` state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Param<T> {
  Missing,
  Invalid(String),
  Valid(T),
}

impl<T> Default for Param<T> {
  fn default() -> Self {
    Self::Missing
  }
}

impl<T> Param<T> {
  pub fn valid(&self) -> Option<&T> {
    match self {
      Self::Valid(value) => Some(value),
      _ => None,
    }
  }

  pub fn is_missing(&self) -> bool {
    matches!(self, Self::Missing)
  }

  pub fn is_valid(&self) -> bool {
    matches!(self, Self::Valid(_))
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Op {
  Mint {
    amt: Param<Num>,
    lucky: Param<String>,
  },
  Transfer {
    amt: Param<Num>,
  },
  Inscribe {
    ph: Param<MixHash>,
    text: Param<String>,
    amt: Param<Num>,
    price: Param<Num>,
  },
  Chant {
    ph: Param<MixHash>,
  },
  SetPrice {
    ph: Param<MixHash>,
    price: Param<Num>,
  },
  Resonance {
    ph: Param<MixHash>,
    amt: Param<Num>,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
  Mint,
  Transfer,
  Inscribe,
  Chant,
  SetPrice,
  Resonance,
}

impl fmt::Display for OpKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(match self {
      Self::Mint => "mint",
      Self::Transfer => "transfer",
      Self::Inscribe => "inscribe",
      Self::Chant => "chant",
      Self::SetPrice => "set_price",
      Self::Resonance => "resonance",
    })
  }
}

impl Op {
  pub fn kind(&self) -> OpKind {
    match self {
      Self::Mint { .. } => OpKind::Mint,
      Self::Transfer { .. } => OpKind::Transfer,
      Self::Inscribe { .. } => OpKind::Inscribe,
      Self::Chant { .. } => OpKind::Chant,
      Self::SetPrice { .. } => OpKind::SetPrice,
      Self::Resonance { .. } => OpKind::Resonance,
    }
  }

  /// Decodes inscription content into an operation. Content that is not an
  /// operation of this token is an error and the inscription is ignored.
  pub fn parse(
    content_type: Option<&str>,
    content: &[u8],
    token_name: &str,
  ) -> Result<Op, JSONError> {
    let content_type = content_type.ok_or(JSONError::InvalidContentType)?;
    let content_type = content_type.to_lowercase().replace(' ', "");
    if !CONTENT_TYPES.contains(&content_type.as_str()) {
      return Err(JSONError::UnSupportContentType);
    }

    let value: Value = serde_json::from_slice(content).map_err(|_| JSONError::InvalidJson)?;
    let object = value.as_object().ok_or(JSONError::InvalidJson)?;

    let protocol = object
      .get("p")
      .and_then(Value::as_str)
      .map(str::to_lowercase)
      .ok_or(JSONError::NotProtocolJson)?;
    let op = object.get("op").and_then(Value::as_str).unwrap_or_default();

    match protocol.as_str() {
      BRC20_PROTOCOL_LITERAL => {
        let tick = object.get("tick").and_then(Value::as_str).unwrap_or_default();
        if tick != token_name {
          return Err(JSONError::TickMismatch(tick.to_string()));
        }

        match (op, object.get("call").and_then(Value::as_str)) {
          ("mint", _) => Ok(Op::Mint {
            amt: num_param(object, "amt"),
            lucky: string_param(object, "lucky"),
          }),
          ("transfer", Some(INSCRIBE_CALL)) => Ok(inscribe(object)),
          ("transfer", Some(RESONANCE_CALL)) => Ok(resonance(object)),
          ("transfer", _) => Ok(Op::Transfer {
            amt: num_param(object, "amt"),
          }),
          (op, _) => Err(JSONError::UnSupportOp(op.to_string())),
        }
      }
      PDI_PROTOCOL_LITERAL => match op {
        "inscribe" => Ok(inscribe(object)),
        "chant" => Ok(Op::Chant {
          ph: hash_param(object, "ph"),
        }),
        "set" => Ok(Op::SetPrice {
          ph: hash_param(object, "ph"),
          price: num_param(object, "price"),
        }),
        "res" => Ok(resonance(object)),
        op => Err(JSONError::UnSupportOp(op.to_string())),
      },
      _ => Err(JSONError::NotProtocolJson),
    }
  }
}

fn inscribe(object: &Map<String, Value>) -> Op {
  Op::Inscribe {
    ph: hash_param(object, "ph"),
    text: string_param(object, "text"),
    amt: num_param(object, "amt"),
    price: num_param(object, "price"),
  }
}

fn resonance(object: &Map<String, Value>) -> Op {
  Op::Resonance {
    ph: hash_param(object, "ph"),
    amt: num_param(object, "amt"),
  }
}

fn string_param(object: &Map<String, Value>, key: &str) -> Param<String> {
  match object.get(key) {
    None | Some(Value::Null) => Param::Missing,
    Some(Value::String(s)) => Param::Valid(s.clone()),
    Some(other) => Param::Invalid(other.to_string()),
  }
}

fn num_param(object: &Map<String, Value>, key: &str) -> Param<Num> {
  let raw = match object.get(key) {
    None | Some(Value::Null) => return Param::Missing,
    Some(Value::String(s)) => s.clone(),
    Some(Value::Number(n)) => n.to_string(),
    Some(other) => return Param::Invalid(other.to_string()),
  };

  match Num::from_str(raw.trim()) {
    Ok(num) => Param::Valid(num),
    Err(_) => Param::Invalid(raw),
  }
}

fn hash_param(object: &Map<String, Value>, key: &str) -> Param<MixHash> {
  match string_param(object, key) {
    Param::Valid(s) => match MixHash::from_str(s.trim()) {
      Ok(hash) => Param::Valid(hash),
      Err(_) => Param::Invalid(s),
    },
    Param::Invalid(s) => Param::Invalid(s),
    Param::Missing => Param::Missing,
  }
}
