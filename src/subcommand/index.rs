use super::*;

#[derive(Debug, Parser)]
pub(crate) enum IndexSubcommand {
  #[command(about = "Follow the chain and index token operations until interrupted")]
  Run,
  #[command(about = "Display the checkpoint and pool balances")]
  Status,
}

impl IndexSubcommand {
  pub(crate) fn run(self, options: Options) -> SubcommandResult {
    match self {
      Self::Run => {
        let mut index = Index::open_for_sync(&options)?;
        index.run()?;
        Ok(None)
      }
      Self::Status => Ok(Some(Box::new(Index::open(&options)?.status()?))),
    }
  }
}
