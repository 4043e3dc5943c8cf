use {
  super::*,
  log::LevelFilter,
  log4rs::{
    append::{
      console::ConsoleAppender,
      rolling_file::{
        policy::compound::{
          roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy,
        },
        RollingFileAppender,
      },
    },
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
  },
};

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {l} {t} - {m}{n}";
const LOG_FILE: &str = "pdi-index.log";
const LOG_FILE_SIZE: u64 = 50 * 1024 * 1024;
const LOG_FILE_ARCHIVES: u32 = 10;

pub(crate) fn init(level: LevelFilter, log_dir: PathBuf) -> Result<log4rs::Handle> {
  fs::create_dir_all(&log_dir)
    .with_context(|| format!("failed to create log dir `{}`", log_dir.display()))?;

  let stdout = ConsoleAppender::builder()
    .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
    .build();

  let archive_pattern = log_dir.join(format!("{LOG_FILE}.{{}}.gz"));
  let roller = FixedWindowRoller::builder()
    .build(
      archive_pattern
        .to_str()
        .ok_or_else(|| anyhow!("invalid log dir `{}`", log_dir.display()))?,
      LOG_FILE_ARCHIVES,
    )
    .map_err(|e| anyhow!("failed to build log roller: {e}"))?;
  let policy = CompoundPolicy::new(
    Box::new(SizeTrigger::new(LOG_FILE_SIZE)),
    Box::new(roller),
  );

  let file = RollingFileAppender::builder()
    .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
    .build(log_dir.join(LOG_FILE), Box::new(policy))?;

  let config = log4rs::Config::builder()
    .appender(Appender::builder().build("stdout", Box::new(stdout)))
    .appender(Appender::builder().build("file", Box::new(file)))
    .build(
      Root::builder()
        .appender("stdout")
        .appender("file")
        .build(level),
    )?;

  Ok(log4rs::init_config(config)?)
}
