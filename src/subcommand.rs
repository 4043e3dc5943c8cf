use {super::*, std::io};

mod index;
mod query;

#[derive(Debug, Parser)]
pub(crate) enum Subcommand {
  #[command(subcommand, about = "Index commands")]
  Index(index::IndexSubcommand),
  #[command(subcommand, about = "Query the index")]
  Query(query::Query),
}

impl Subcommand {
  pub(crate) fn run(self, options: Options) -> SubcommandResult {
    match self {
      Self::Index(index) => index.run(options),
      Self::Query(query) => query.run(options),
    }
  }
}

pub(crate) trait Output: Send {
  fn print_json(&self);
}

impl<T> Output for T
where
  T: Serialize + Send,
{
  fn print_json(&self) {
    serde_json::to_writer_pretty(io::stdout(), self).ok();
    println!();
  }
}

/// `None` when the command has nothing to print.
pub(crate) type SubcommandResult = Result<Option<Box<dyn Output>>>;
