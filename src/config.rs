use super::*;

#[derive(Deserialize, Serialize, Default, PartialEq, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  pub bitcoin: BitcoinConfig,
  pub ord: OrdConfig,
  pub oracle: OracleConfig,
  pub rpc: RpcConfig,
  pub token: TokenConfig,
}

#[derive(Deserialize, Serialize, Default, PartialEq, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct BitcoinConfig {
  pub rpc_url: Option<String>,
  pub cookie_file: Option<PathBuf>,
  pub rpc_user: Option<String>,
  pub rpc_pass: Option<String>,
}

#[derive(Deserialize, Serialize, PartialEq, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct OrdConfig {
  pub url: String,
}

impl Default for OrdConfig {
  fn default() -> Self {
    Self {
      url: "http://127.0.0.1:80".into(),
    }
  }
}

#[derive(Deserialize, Serialize, PartialEq, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct OracleConfig {
  pub url: String,
  /// Seconds to wait before asking again while the oracle is still syncing.
  pub sync_poll_interval: u64,
}

impl Default for OracleConfig {
  fn default() -> Self {
    Self {
      url: "http://127.0.0.1:13021".into(),
      sync_poll_interval: 10,
    }
  }
}

#[derive(Deserialize, Serialize, PartialEq, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct RpcConfig {
  /// Request timeout in seconds.
  pub timeout: u64,
  pub retries: u32,
  /// Milliseconds between retries.
  pub retry_interval: u64,
  pub batch_concurrency: usize,
}

impl Default for RpcConfig {
  fn default() -> Self {
    Self {
      timeout: 30,
      retries: 5,
      retry_interval: 2000,
      batch_concurrency: 8,
    }
  }
}

#[derive(Deserialize, Serialize, PartialEq, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct TokenConfig {
  pub token_name: String,
  pub genesis_block_height: u64,
  pub foundation_address: String,
  pub mint_pool_address: String,
  pub mint_pool_initial_amount: u64,
  pub normal_mint_max_amount: u64,
  pub lucky_mint_max_amount: u64,
  pub inscribe_hash_threshold: u64,
  pub lucky_mint_block_threshold: u64,
  pub chant_block_threshold: u64,
  pub resonance_max_count: u32,
  pub chant_valid_blocks: u64,
}

impl Default for TokenConfig {
  fn default() -> Self {
    Self {
      token_name: "DMC".into(),
      genesis_block_height: 779832,
      foundation_address: "0x1".into(),
      mint_pool_address: "0x0".into(),
      mint_pool_initial_amount: 210_000_000,
      normal_mint_max_amount: 210,
      lucky_mint_max_amount: 2100,
      inscribe_hash_threshold: 32,
      lucky_mint_block_threshold: 64,
      chant_block_threshold: 64,
      resonance_max_count: 15,
      chant_valid_blocks: 12800,
    }
  }
}

impl Config {
  pub fn load(path: &std::path::Path) -> Result<Self> {
    let file = fs::File::open(path)
      .with_context(|| format!("failed to open config file `{}`", path.display()))?;
    serde_yaml::from_reader(file)
      .with_context(|| format!("failed to deserialize config file `{}`", path.display()))
  }
}
