pub mod token;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockContext {
  pub blockheight: u64,
  pub blocktime: u32,
}
