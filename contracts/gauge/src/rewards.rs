use soroban_sdk::{Env, I256};

use crate::GaugeError;

/// Fixed-point scaling factor for reward integrals.
///
/// An integral is "reward tokens per unit of stake" multiplied by this
/// constant, so stake and reward amounts with 18 decimals keep full
/// precision under integer arithmetic.
pub const SCALE: i128 = 1_000_000_000_000_000_000;

// ── Core reward engine ──────────────────────────────────────────────────────

/// A zero integral.
pub fn zero(env: &Env) -> I256 {
    I256::from_i32(env, 0)
}

/// Integral growth for a newly observed reward balance.
///
/// ```text
/// Δintegral = delta × SCALE / total_staked
/// ```
///
/// Integrals live in 256 bits: a large reward over a tiny stake pushes the
/// integral well past `i128::MAX` (10^20 over one unit of stake is already
/// 10^38), and that must stay a valid state.
///
/// With nothing staked there is no one to credit, so the increment is zero
/// and the caller keeps the delta unmeasured until stake exists.
pub fn integral_increment(env: &Env, delta: i128, total_staked: i128) -> I256 {
    if total_staked <= 0 || delta <= 0 {
        return zero(env);
    }

    I256::from_i128(env, delta)
        .mul(&I256::from_i128(env, SCALE))
        .div(&I256::from_i128(env, total_staked))
}

/// Rewards earned by `stake` while the integral moved from `snapshot` to
/// `integral`.
///
/// ```text
/// earned = stake × (integral − snapshot) / SCALE
/// ```
///
/// `stake` must be the balance held over that whole interval, i.e. the
/// balance before whatever change triggered the checkpoint. The result is
/// bounded by the rewards that arrived in that interval, so it fits `i128`.
pub fn earned(env: &Env, stake: i128, integral: &I256, snapshot: &I256) -> Result<i128, GaugeError> {
    if stake <= 0 || integral <= snapshot {
        return Ok(0);
    }

    integral
        .sub(snapshot)
        .mul(&I256::from_i128(env, stake))
        .div(&I256::from_i128(env, SCALE))
        .to_i128()
        .ok_or(GaugeError::ArithmeticError)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
