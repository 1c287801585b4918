//! Monetary arithmetic on amounts in the smallest currency unit (cents).
//!
//! Rates are expressed in basis points so money stays integer end-to-end:
//! 10_000 bps = 100%, 6_000 bps = 60%, 1_500 bps = 15%.

/// Basis points in a whole (100%).
pub const BPS_SCALE: u32 = 10_000;

/// Apply a basis-point rate to an amount in cents, rounding half-up.
///
/// Intermediate math is widened to `u128`, so this cannot overflow for any
/// `u64` amount.
pub fn apply_rate_bps(amount: u64, rate_bps: u32) -> u64 {
    let scaled = amount as u128 * rate_bps as u128 + (BPS_SCALE as u128 / 2);
    (scaled / BPS_SCALE as u128) as u64
}
