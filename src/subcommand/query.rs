use super::*;

#[derive(Debug, Parser)]
pub(crate) enum Query {
  #[command(about = "Display the token balance of <ADDRESS>")]
  Balance { address: String },
  #[command(about = "Display the owner, price and resonances of <HASH>")]
  Hash { hash: String },
  #[command(about = "Display the transfers and token records of <INSCRIPTION_ID>")]
  History { inscription_id: InscriptionId },
}

impl Query {
  pub(crate) fn run(self, options: Options) -> SubcommandResult {
    let index = Index::open(&options)?;

    match self {
      Self::Balance { address } => Ok(Some(Box::new(index.balance(&address)?))),
      Self::Hash { hash } => Ok(Some(Box::new(index.hash_info(&hash)?))),
      Self::History { inscription_id } => match index.history(&inscription_id)? {
        Some(history) => Ok(Some(Box::new(history))),
        None => bail!("inscription {inscription_id} is not indexed"),
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_query_commands() {
    let arguments =
      Arguments::try_parse_from(["pdi-index", "query", "balance", "bc1qalice"]).unwrap();
    assert!(matches!(
      arguments.subcommand,
      Subcommand::Query(Query::Balance { address }) if address == "bc1qalice"
    ));

    let arguments = Arguments::try_parse_from([
      "pdi-index",
      "query",
      "history",
      "1111111111111111111111111111111111111111111111111111111111111111i0",
    ])
    .unwrap();
    assert!(matches!(
      arguments.subcommand,
      Subcommand::Query(Query::History { inscription_id }) if inscription_id.index == 0
    ));

    assert!(Arguments::try_parse_from(["pdi-index", "query", "history", "nope"]).is_err());
  }
}
