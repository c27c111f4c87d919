use common::ttl;
use soroban_sdk::{contracttype, symbol_short, token, Address, Env, Symbol, I256};

use crate::{rewards, GaugeError};

const REWARD_ACC: Symbol = symbol_short!("RWD_ACC");

/// Global reward state for one reward token.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardAccumulator {
    /// Reward per unit of stake since genesis, scaled by `rewards::SCALE`.
    /// Never decreases.
    pub integral: I256,
    /// Held balance of the token as of the last integration, net of payouts.
    pub balance: i128,
}

impl RewardAccumulator {
    pub fn new(env: &Env) -> Self {
        RewardAccumulator {
            integral: rewards::zero(env),
            balance: 0,
        }
    }
}

fn key(token: &Address) -> (Symbol, Address) {
    (REWARD_ACC, token.clone())
}

pub fn load(env: &Env, token: &Address) -> RewardAccumulator {
    let key = key(token);
    match env.storage().persistent().get(&key) {
        Some(acc) => {
            ttl::extend_persistent(env, &key);
            acc
        }
        None => RewardAccumulator::new(env),
    }
}

pub fn store(env: &Env, token: &Address, acc: &RewardAccumulator) {
    let key = key(token);
    env.storage().persistent().set(&key, acc);
    ttl::extend_persistent(env, &key);
}

/// The gauge's current holding of `token`.
pub fn held_balance(env: &Env, token: &Address) -> i128 {
    token::Client::new(env, token).balance(&env.current_contract_address())
}

/// Fold a newly observed held balance into the accumulator.
///
/// Only runs while something is staked. With zero stake the accumulator is
/// returned untouched, so the surplus is measured again (and credited in
/// full) by the first integration that happens with stake present. A held
/// balance below the recorded one is never negative reward; it just
/// resets the baseline.
pub fn integrate(
    env: &Env,
    acc: &RewardAccumulator,
    held: i128,
    total_staked: i128,
) -> RewardAccumulator {
    if total_staked <= 0 {
        return acc.clone();
    }

    let delta = held.saturating_sub(acc.balance).max(0);
    let increment = rewards::integral_increment(env, delta, total_staked);

    RewardAccumulator {
        integral: acc.integral.add(&increment),
        balance: held,
    }
}

/// Measure the held balance of `token` and persist the integrated state.
pub fn sync_and_integrate(env: &Env, token: &Address, total_staked: i128) -> RewardAccumulator {
    let current = load(env, token);
    let next = integrate(env, &current, held_balance(env, token), total_staked);
    if next != current {
        store(env, token, &next);
    }
    next
}

/// What `sync_and_integrate` would produce right now, without writing.
pub fn project(env: &Env, token: &Address, total_staked: i128) -> RewardAccumulator {
    integrate(env, &load(env, token), held_balance(env, token), total_staked)
}

/// Account for tokens the gauge itself sent out, so they are not mistaken
/// for an external decrease on the next sync.
pub fn record_payout(env: &Env, token: &Address, payout: i128) -> Result<(), GaugeError> {
    let mut acc = load(env, token);
    acc.balance = acc
        .balance
        .checked_sub(payout)
        .ok_or(GaugeError::ArithmeticError)?;
    store(env, token, &acc);
    Ok(())
}
