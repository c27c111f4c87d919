//! Reward syncing, account checkpointing and payouts.
//!
//! Every stake-mutating entry point runs `sync_rewards` and then
//! `checkpoint_account` for each affected account *before* the stake moves,
//! so elapsed accrual is always weighed by the stake that earned it.

use common::ttl;
use soroban_sdk::{log, symbol_short, Address, Env, Map, Symbol, Vec, I256};

use crate::source::SourceFailurePolicy;
use crate::{accumulator, checkpoint, events, ledger, registry, GaugeConfig, GaugeError};

const LAST_PULL: Symbol = symbol_short!("LAST_PUL");
const RECEIVER: Symbol = symbol_short!("RECEIVER");

/// Integral of each registered reward token after a sync, in slot order.
pub type Integrals = Vec<(Address, I256)>;

// ── Source pull ─────────────────────────────────────────────────────────────

pub fn last_pull(env: &Env) -> Option<u64> {
    env.storage().instance().get(&LAST_PULL)
}

pub fn reset_last_pull(env: &Env) {
    env.storage().instance().remove(&LAST_PULL);
}

fn pull_due(env: &Env, pull_interval: u64, now: u64) -> bool {
    match last_pull(env) {
        None => true,
        Some(_) if pull_interval == 0 => true,
        Some(last) => now >= last.saturating_add(pull_interval),
    }
}

/// Pull the configured source if a pull is due, applying `policy` when the
/// source call fails.
pub fn pull_source(
    env: &Env,
    pull_interval: u64,
    policy: SourceFailurePolicy,
) -> Result<(), GaugeError> {
    let source = registry::reward_source(env);
    if !source.is_external() {
        return Ok(());
    }

    let now = env.ledger().timestamp();
    if !pull_due(env, pull_interval, now) {
        return Ok(());
    }

    if source.pull(env) {
        env.storage().instance().set(&LAST_PULL, &now);
        return Ok(());
    }

    match policy {
        SourceFailurePolicy::Skip => {
            log!(env, "reward source pull failed; integrating held balances only");
            events::publish_source_failed(env, source);
            Ok(())
        }
        SourceFailurePolicy::Abort => Err(GaugeError::SourcePullFailed),
    }
}

// ── Sync & checkpoint ───────────────────────────────────────────────────────

/// Pull the source and integrate every registered reward token against the
/// current total stake.
pub fn sync_rewards(env: &Env, config: &GaugeConfig) -> Result<Integrals, GaugeError> {
    pull_source(env, config.pull_interval, config.failure_policy)?;
    Ok(integrate_all(env))
}

/// Integrate every registered reward token without pulling the source.
pub fn integrate_all(env: &Env) -> Integrals {
    let total = ledger::total_supply(env);
    let mut integrals = Vec::new(env);
    for token in registry::reward_tokens(env).iter() {
        let acc = accumulator::sync_and_integrate(env, &token, total);
        integrals.push_back((token, acc.integral));
    }
    integrals
}

/// Settle `account` for every synced token using its current (pre-change)
/// stake.
pub fn checkpoint_account(
    env: &Env,
    account: &Address,
    integrals: &Integrals,
) -> Result<(), GaugeError> {
    let stake = ledger::balance_of(env, account);
    for (token, integral) in integrals.iter() {
        checkpoint::settle(env, account, &token, stake, &integral)?;
    }
    Ok(())
}

// ── Payout ──────────────────────────────────────────────────────────────────

pub fn rewards_receiver(env: &Env, account: &Address) -> Option<Address> {
    let key = (RECEIVER, account.clone());
    env.storage().persistent().get(&key)
}

pub fn set_rewards_receiver(env: &Env, account: &Address, receiver: &Option<Address>) {
    let key = (RECEIVER, account.clone());
    match receiver {
        Some(receiver) => {
            env.storage().persistent().set(&key, receiver);
            ttl::extend_persistent(env, &key);
        }
        None => env.storage().persistent().remove(&key),
    }
}

/// An explicit receiver wins, then the account's registered receiver, then
/// the account itself.
pub fn resolve_receiver(env: &Env, account: &Address, explicit: Option<Address>) -> Address {
    explicit
        .or_else(|| rewards_receiver(env, account))
        .unwrap_or(account.clone())
}

/// Pay out everything `account` has accrued for the synced tokens.
///
/// Any failed transfer fails the whole payout; the caller returns the error
/// and the host discards every payout already made in this call.
pub fn pay_out(
    env: &Env,
    account: &Address,
    receiver: &Address,
    integrals: &Integrals,
) -> Result<Map<Address, i128>, GaugeError> {
    let gauge = env.current_contract_address();
    let mut payouts = Map::new(env);

    for (token, _) in integrals.iter() {
        let payout = checkpoint::take_accrued(env, account, &token)?;
        if payout > 0 {
            ledger::transfer_token(env, &token, &gauge, receiver, payout)?;
            accumulator::record_payout(env, &token, payout)?;
        }
        payouts.set(token, payout);
    }

    events::publish_claim(env, account.clone(), receiver.clone(), payouts.clone());

    Ok(payouts)
}

// ── Projection ──────────────────────────────────────────────────────────────

/// What the next claim would pay `account` in `token`, from balances the
/// gauge holds right now. Writes nothing.
pub fn claimable(env: &Env, account: &Address, token: &Address) -> Result<i128, GaugeError> {
    if !registry::is_registered(env, token) {
        return Ok(0);
    }

    let acc = accumulator::project(env, token, ledger::total_supply(env));
    let current = checkpoint::load(env, account, token);
    let stake = ledger::balance_of(env, account);
    Ok(checkpoint::advance(env, &current, stake, &acc.integral)?.accrued)
}
