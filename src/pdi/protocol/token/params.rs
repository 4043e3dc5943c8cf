pub const MAX_DECIMAL_WIDTH: u8 = 18;

pub const BRC20_PROTOCOL_LITERAL: &str = "brc-20";
pub const PDI_PROTOCOL_LITERAL: &str = "pdi";

pub const INSCRIBE_CALL: &str = "pdi-inscribe";
pub const RESONANCE_CALL: &str = "pdi-res";

/// Share of an inscribe payment that returns to the mint pool.
pub const INSCRIBE_POOL_PERCENT: u64 = 98;
/// Share of a chant bonus kept by the chanter on someone else's hash.
pub const CHANT_USER_PERCENT: u64 = 80;
/// Share of a resonance payment that goes to the hash owner.
pub const RESONANCE_OWNER_PERCENT: u64 = 80;

pub const PRICE_WEIGHT_MULTIPLE: u64 = 2;
pub const STAMINA_DIVISOR: u64 = 4;
/// Data sizes are weighted per started GiB.
pub const WEIGHT_SIZE_UNIT: u64 = 1 << 30;

/// Destination of an inscription that was spent as a fee.
pub const FEE_ADDRESS: &str = "1111111111111111111114oLvT2";
