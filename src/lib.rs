#![allow(
  clippy::too_many_arguments,
  clippy::type_complexity,
  clippy::result_large_err
)]
#![deny(
  clippy::cast_lossless,
  clippy::cast_possible_truncation,
  clippy::cast_possible_wrap,
  clippy::cast_sign_loss
)]

use {
  self::{
    arguments::Arguments,
    chain::Chain,
    options::Options,
    subcommand::{Output, SubcommandResult},
  },
  anyhow::{anyhow, bail, Context, Error},
  bitcoin::{hashes::Hash, OutPoint, Txid},
  clap::Parser,
  serde::{Deserialize, Deserializer, Serialize, Serializer},
  std::{
    env,
    fmt::{self, Display, Formatter},
    fs,
    path::PathBuf,
    process,
    str::FromStr,
    sync::atomic::{self, AtomicBool},
    thread,
    time::Duration,
  },
};

pub use crate::{
  config::Config, index::Index, inscription_id::InscriptionId, sat_point::SatPoint,
};

mod arguments;
mod chain;
pub mod client;
pub mod config;
pub mod index;
pub mod inscription_id;
mod logger;
mod options;
pub mod pdi;
pub mod rpc;
pub mod sat_point;
pub mod subcommand;

type Result<T = (), E = Error> = std::result::Result<T, E>;

static SHUTTING_DOWN: AtomicBool = AtomicBool::new(false);

pub fn shutting_down() -> bool {
  SHUTTING_DOWN.load(atomic::Ordering::Relaxed)
}

fn unbound_outpoint() -> OutPoint {
  OutPoint {
    txid: Hash::all_zeros(),
    vout: 0,
  }
}

pub fn main() {
  let args = Arguments::parse();

  let log_dir = match args.options.log_dir() {
    Ok(dir) => dir,
    Err(err) => {
      eprintln!("error: failed to resolve log dir: {err}");
      process::exit(1);
    }
  };
  if let Err(err) = logger::init(args.options.log_level(), log_dir) {
    eprintln!("error: failed to initialize logger: {err}");
    process::exit(1);
  }

  if let Err(err) = ctrlc::set_handler(move || {
    if SHUTTING_DOWN.fetch_or(true, atomic::Ordering::Relaxed) {
      process::exit(1);
    }

    println!("Shutting down gracefully. Press <CTRL-C> again to shutdown immediately.");
  }) {
    eprintln!("error: failed to set <CTRL-C> handler: {err}");
    process::exit(1);
  }

  match args.run() {
    Err(err) => {
      eprintln!("error: {err}");
      err
        .chain()
        .skip(1)
        .for_each(|cause| eprintln!("because: {cause}"));
      if env::var_os("RUST_BACKTRACE")
        .map(|val| val == "1")
        .unwrap_or_default()
      {
        eprintln!("{}", err.backtrace());
      }

      process::exit(1);
    }
    Ok(output) => {
      if let Some(output) = output {
        output.print_json();
      }
    }
  }
}
