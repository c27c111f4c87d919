use common::ttl;
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, I256};

use crate::{rewards, GaugeError};

const CHECKPOINT: Symbol = symbol_short!("RWD_CKPT");

/// Per-account view of one reward token.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardCheckpoint {
    /// Accumulator integral as of this account's last checkpoint.
    pub integral_snapshot: I256,
    /// Earned and not yet paid.
    pub accrued: i128,
    /// Lifetime amount paid out.
    pub claimed: i128,
}

impl RewardCheckpoint {
    pub fn new(env: &Env) -> Self {
        RewardCheckpoint {
            integral_snapshot: rewards::zero(env),
            accrued: 0,
            claimed: 0,
        }
    }
}

fn key(account: &Address, token: &Address) -> (Symbol, Address, Address) {
    (CHECKPOINT, account.clone(), token.clone())
}

pub fn load(env: &Env, account: &Address, token: &Address) -> RewardCheckpoint {
    let key = key(account, token);
    match env.storage().persistent().get(&key) {
        Some(checkpoint) => {
            ttl::extend_persistent(env, &key);
            checkpoint
        }
        None => RewardCheckpoint::new(env),
    }
}

pub fn store(env: &Env, account: &Address, token: &Address, checkpoint: &RewardCheckpoint) {
    let key = key(account, token);
    env.storage().persistent().set(&key, checkpoint);
    ttl::extend_persistent(env, &key);
}

/// Credit what `stake` earned since the snapshot and move the snapshot up
/// to `integral`.
pub fn advance(
    env: &Env,
    checkpoint: &RewardCheckpoint,
    stake: i128,
    integral: &I256,
) -> Result<RewardCheckpoint, GaugeError> {
    let earned = rewards::earned(env, stake, integral, &checkpoint.integral_snapshot)?;

    Ok(RewardCheckpoint {
        integral_snapshot: integral.clone(),
        accrued: checkpoint
            .accrued
            .checked_add(earned)
            .ok_or(GaugeError::ArithmeticError)?,
        claimed: checkpoint.claimed,
    })
}

/// Persisted `advance` for `account`.
///
/// `stake` must be the account's balance before the pending mutation.
pub fn settle(
    env: &Env,
    account: &Address,
    token: &Address,
    stake: i128,
    integral: &I256,
) -> Result<RewardCheckpoint, GaugeError> {
    let current = load(env, account, token);
    let next = advance(env, &current, stake, integral)?;
    if next != current {
        store(env, account, token, &next);
    }
    Ok(next)
}

/// Move the whole accrued amount into `claimed`, returning the payout.
pub fn take_accrued(env: &Env, account: &Address, token: &Address) -> Result<i128, GaugeError> {
    let mut checkpoint = load(env, account, token);
    let payout = checkpoint.accrued;
    if payout <= 0 {
        return Ok(0);
    }

    checkpoint.accrued = 0;
    checkpoint.claimed = checkpoint
        .claimed
        .checked_add(payout)
        .ok_or(GaugeError::ArithmeticError)?;
    store(env, account, token, &checkpoint);
    Ok(payout)
}
