use {super::*, bitcoincore_rpc::Auth, log::LevelFilter};

#[derive(Clone, Default, Debug, Parser)]
pub(crate) struct Options {
  #[arg(long, help = "Load configuration from <CONFIG>.")]
  pub(crate) config: Option<PathBuf>,
  #[arg(
    long = "chain",
    value_enum,
    default_value = "mainnet",
    help = "Use <CHAIN>."
  )]
  pub(crate) chain_argument: Chain,
  #[arg(long, help = "Store index in <DATA_DIR>.")]
  pub(crate) data_dir: Option<PathBuf>,
  #[arg(long, help = "Write logs to <LOG_DIR>. [default: <DATA_DIR>/logs]")]
  pub(crate) log_dir: Option<PathBuf>,
  #[arg(long, default_value = "info", help = "Log level, one of error|warn|info|debug|trace.")]
  pub(crate) log_level: String,
  #[arg(long, help = "Connect to Bitcoin Core RPC at <BITCOIN_RPC_URL>.")]
  pub(crate) bitcoin_rpc_url: Option<String>,
  #[arg(long, help = "Load Bitcoin Core RPC cookie file from <COOKIE_FILE>.")]
  pub(crate) cookie_file: Option<PathBuf>,
  #[arg(long, requires = "bitcoin_rpc_pass", help = "Authenticate to Bitcoin Core RPC as <BITCOIN_RPC_USER>.")]
  pub(crate) bitcoin_rpc_user: Option<String>,
  #[arg(long, requires = "bitcoin_rpc_user", help = "Authenticate to Bitcoin Core RPC with <BITCOIN_RPC_PASS>.")]
  pub(crate) bitcoin_rpc_pass: Option<String>,
  #[arg(long, help = "Query the ord server at <ORD_URL>.")]
  pub(crate) ord_url: Option<String>,
  #[arg(long, help = "Query hash points from the oracle at <ORACLE_URL>.")]
  pub(crate) oracle_url: Option<String>,
}

impl Options {
  pub(crate) fn chain(&self) -> Chain {
    self.chain_argument
  }

  pub(crate) fn data_dir(&self) -> Result<PathBuf> {
    let base = match &self.data_dir {
      Some(base) => base.clone(),
      None => dirs::data_dir()
        .ok_or_else(|| anyhow!("failed to retrieve data dir"))?
        .join("pdi-index"),
    };

    Ok(self.chain().join_with_data_dir(&base))
  }

  pub(crate) fn log_dir(&self) -> Result<PathBuf> {
    match &self.log_dir {
      Some(dir) => Ok(dir.clone()),
      None => Ok(self.data_dir()?.join("logs")),
    }
  }

  pub(crate) fn log_level(&self) -> LevelFilter {
    LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
  }

  /// Loads the config file, if any, and applies command line overrides on top.
  pub(crate) fn load_config(&self) -> Result<Config> {
    let mut config = match &self.config {
      Some(path) => Config::load(path)?,
      None => Config::default(),
    };

    if let Some(url) = &self.bitcoin_rpc_url {
      config.bitcoin.rpc_url = Some(url.clone());
    }
    if let Some(cookie_file) = &self.cookie_file {
      config.bitcoin.cookie_file = Some(cookie_file.clone());
    }
    if let Some(user) = &self.bitcoin_rpc_user {
      config.bitcoin.rpc_user = Some(user.clone());
    }
    if let Some(pass) = &self.bitcoin_rpc_pass {
      config.bitcoin.rpc_pass = Some(pass.clone());
    }
    if let Some(url) = &self.ord_url {
      config.ord.url = url.clone();
    }
    if let Some(url) = &self.oracle_url {
      config.oracle.url = url.clone();
    }

    Ok(config)
  }

  pub(crate) fn bitcoin_rpc_url(&self, config: &Config) -> String {
    config
      .bitcoin
      .rpc_url
      .clone()
      .unwrap_or_else(|| format!("127.0.0.1:{}", self.chain().default_rpc_port()))
  }

  pub(crate) fn bitcoin_auth(&self, config: &Config) -> Result<Auth> {
    if let (Some(user), Some(pass)) = (&config.bitcoin.rpc_user, &config.bitcoin.rpc_pass) {
      return Ok(Auth::UserPass(user.clone(), pass.clone()));
    }

    Ok(Auth::CookieFile(self.cookie_file(config)?))
  }

  fn cookie_file(&self, config: &Config) -> Result<PathBuf> {
    if let Some(cookie_file) = &config.bitcoin.cookie_file {
      return Ok(cookie_file.clone());
    }

    let path = if cfg!(target_os = "linux") {
      dirs::home_dir()
        .ok_or_else(|| anyhow!("failed to retrieve home dir"))?
        .join(".bitcoin")
    } else {
      dirs::data_dir()
        .ok_or_else(|| anyhow!("failed to retrieve data dir"))?
        .join("Bitcoin")
    };

    let path = match self.chain() {
      Chain::Mainnet => path,
      Chain::Testnet => path.join("testnet3"),
      Chain::Signet => path.join("signet"),
      Chain::Regtest => path.join("regtest"),
    };

    Ok(path.join(".cookie"))
  }
}
