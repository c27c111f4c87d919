//! Stake balances, the global total, and spender allowances.
//!
//! Nothing here touches reward state; callers checkpoint rewards before
//! calling any mutator.

use common::ttl;
use soroban_sdk::{symbol_short, token, Address, Env, Symbol};

use crate::GaugeError;

const TOTAL_STAKED: Symbol = symbol_short!("TOT_STK");

// Per-account persistent storage uses tuple keys: (prefix, address[, address])
const USER_STAKE: Symbol = symbol_short!("STK");
const ALLOWANCE: Symbol = symbol_short!("ALLOW");

pub fn balance_of(env: &Env, account: &Address) -> i128 {
    let key = (USER_STAKE, account.clone());
    match env.storage().persistent().get::<_, i128>(&key) {
        Some(balance) => {
            ttl::extend_persistent(env, &key);
            balance
        }
        None => 0,
    }
}

pub fn total_supply(env: &Env) -> i128 {
    env.storage().instance().get(&TOTAL_STAKED).unwrap_or(0)
}

fn set_balance(env: &Env, account: &Address, balance: i128) {
    let key = (USER_STAKE, account.clone());
    env.storage().persistent().set(&key, &balance);
    ttl::extend_persistent(env, &key);
}

fn set_total_supply(env: &Env, total: i128) {
    env.storage().instance().set(&TOTAL_STAKED, &total);
}

/// Mint `amount` of stake to `account`, growing the total with it.
pub fn credit(env: &Env, account: &Address, amount: i128) -> Result<i128, GaugeError> {
    let balance = balance_of(env, account)
        .checked_add(amount)
        .ok_or(GaugeError::ArithmeticError)?;
    let total = total_supply(env)
        .checked_add(amount)
        .ok_or(GaugeError::ArithmeticError)?;

    set_balance(env, account, balance);
    set_total_supply(env, total);
    Ok(total)
}

/// Burn `amount` of stake from `account`, shrinking the total with it.
pub fn debit(env: &Env, account: &Address, amount: i128) -> Result<i128, GaugeError> {
    let balance = balance_of(env, account);
    if balance < amount {
        return Err(GaugeError::InsufficientBalance);
    }
    let total = total_supply(env)
        .checked_sub(amount)
        .ok_or(GaugeError::ArithmeticError)?;

    set_balance(env, account, balance - amount);
    set_total_supply(env, total);
    Ok(total)
}

/// Move stake between two accounts. The total is unchanged.
pub fn move_stake(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), GaugeError> {
    let from_balance = balance_of(env, from);
    if from_balance < amount {
        return Err(GaugeError::InsufficientBalance);
    }
    if from == to {
        return Ok(());
    }

    let to_balance = balance_of(env, to)
        .checked_add(amount)
        .ok_or(GaugeError::ArithmeticError)?;

    set_balance(env, from, from_balance - amount);
    set_balance(env, to, to_balance);
    Ok(())
}

// ── Allowances ──────────────────────────────────────────────────────────────

pub fn allowance(env: &Env, owner: &Address, spender: &Address) -> i128 {
    let key = (ALLOWANCE, owner.clone(), spender.clone());
    env.storage().persistent().get(&key).unwrap_or(0)
}

pub fn set_allowance(env: &Env, owner: &Address, spender: &Address, amount: i128) {
    let key = (ALLOWANCE, owner.clone(), spender.clone());
    if amount == 0 {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, &amount);
    ttl::extend_persistent(env, &key);
}

/// Consume `amount` of the allowance `owner` granted to `spender`.
pub fn spend_allowance(
    env: &Env,
    owner: &Address,
    spender: &Address,
    amount: i128,
) -> Result<(), GaugeError> {
    let current = allowance(env, owner, spender);
    if current < amount {
        return Err(GaugeError::InsufficientAllowance);
    }
    set_allowance(env, owner, spender, current - amount);
    Ok(())
}

// ── Token movement ──────────────────────────────────────────────────────────

/// Transfer `amount` of `token` and surface a failure as `TransferFailed`
/// instead of trapping, so the caller's error is what the invoker sees.
pub fn transfer_token(
    env: &Env,
    token: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), GaugeError> {
    match token::Client::new(env, token).try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(GaugeError::TransferFailed),
    }
}
