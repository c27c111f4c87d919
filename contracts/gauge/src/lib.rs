#![no_std]

#[cfg(test)]
extern crate std;

pub mod accumulator;
pub mod checkpoint;
pub mod claim;
pub mod events;
pub mod ledger;
pub mod registry;
pub mod rewards;
pub mod source;

use common::{admin, ttl};
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, Address, Env, Map, Symbol, Vec,
};

use accumulator::RewardAccumulator;
use checkpoint::RewardCheckpoint;
use registry::RewardConfig;
use source::{RewardSource, SourceFailurePolicy};

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const CONFIG: Symbol = symbol_short!("CONFIG");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum GaugeError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    InsufficientBalance = 5,
    InsufficientAllowance = 6,
    RegistryFull = 7,
    DuplicateToken = 8,
    RewardTokenLocked = 9,
    InvalidRewardToken = 10,
    TransferFailed = 11,
    SourcePullFailed = 12,
    ArithmeticError = 13,
    NoPendingAdmin = 14,
}

// ── Public-facing types ──────────────────────────────────────────────────────

/// Runtime configuration fixed at `initialize`, tunable by the admin.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GaugeConfig {
    /// Token users deposit.
    pub stake_token: Address,
    /// What a failed reward-source pull does to the triggering operation.
    pub failure_policy: SourceFailurePolicy,
    /// Minimum seconds between two external pulls (0 = every sync).
    pub pull_interval: u64,
}

// ── Contract ─────────────────────────────────────────────────────────────────

/// Rewards-only gauge: holds stake and streams every registered reward token
/// to stakers in proportion to stake held over time.
#[contract]
pub struct GaugeContract;

#[contractimpl]
impl GaugeContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the gauge.
    ///
    /// * `stake_token`    – SAC address of the token users deposit.
    /// * `failure_policy` – behaviour when the reward source cannot be pulled.
    /// * `pull_interval`  – seconds between external pulls; 0 pulls on every sync.
    pub fn initialize(
        env: Env,
        admin: Address,
        stake_token: Address,
        failure_policy: SourceFailurePolicy,
        pull_interval: u64,
    ) -> Result<(), GaugeError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(GaugeError::AlreadyInitialized);
        }

        let config = GaugeConfig {
            stake_token: stake_token.clone(),
            failure_policy,
            pull_interval,
        };
        admin::set_admin(&env, &admin);
        env.storage().instance().set(&CONFIG, &config);
        env.storage().instance().set(&INITIALIZED, &true);
        ttl::extend_instance(&env);
        // Totals, registry and accumulators start empty; readers default
        // absent keys, so no explicit init is needed.

        events::publish_initialized(&env, admin, stake_token, failure_policy, pull_interval);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` stake tokens from `from`, credited to `to`.
    ///
    /// `to` is checkpointed with its pre-deposit stake first, so the new
    /// tokens never earn rewards that accrued before they arrived. With
    /// `claim_rewards` set, `to`'s accrued rewards are paid out in the same call.
    pub fn deposit(
        env: Env,
        from: Address,
        to: Address,
        amount: i128,
        claim_rewards: bool,
    ) -> Result<(), GaugeError> {
        let config = Self::load_config(&env)?;
        from.require_auth();

        if amount <= 0 {
            return Err(GaugeError::InvalidAmount);
        }

        // 1. Sync rewards, then snapshot `to` at its old stake.
        let integrals = claim::sync_rewards(&env, &config)?;
        claim::checkpoint_account(&env, &to, &integrals)?;
        if claim_rewards {
            let receiver = claim::resolve_receiver(&env, &to, None);
            claim::pay_out(&env, &to, &receiver, &integrals)?;
        }

        // 2. Pull stake tokens into the gauge.
        ledger::transfer_token(
            &env,
            &config.stake_token,
            &from,
            &env.current_contract_address(),
            amount,
        )?;

        // 3. Credit the stake.
        let total = ledger::credit(&env, &to, amount)?;

        events::publish_deposit(&env, from, to, amount, total);

        Ok(())
    }

    /// Withdraw `amount` of `account`'s stake back to `account`.
    pub fn withdraw(
        env: Env,
        account: Address,
        amount: i128,
        claim_rewards: bool,
    ) -> Result<(), GaugeError> {
        let config = Self::load_config(&env)?;
        account.require_auth();

        if amount <= 0 {
            return Err(GaugeError::InvalidAmount);
        }

        // 1. Flush rewards before reducing stake.
        let integrals = claim::sync_rewards(&env, &config)?;
        claim::checkpoint_account(&env, &account, &integrals)?;
        if claim_rewards {
            let receiver = claim::resolve_receiver(&env, &account, None);
            claim::pay_out(&env, &account, &receiver, &integrals)?;
        }

        // 2. Reduce stake (fails on an insufficient balance), then return
        // the tokens.
        let total = ledger::debit(&env, &account, amount)?;
        ledger::transfer_token(
            &env,
            &config.stake_token,
            &env.current_contract_address(),
            &account,
            amount,
        )?;

        events::publish_withdraw(&env, account, amount, total);

        Ok(())
    }

    /// Move `amount` of stake from `from` to `to`.
    ///
    /// Both sides are checkpointed; neither is paid out.
    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), GaugeError> {
        let config = Self::load_config(&env)?;
        from.require_auth();

        Self::transfer_stake(&env, &config, &from, &to, amount)
    }

    /// Move stake on behalf of `from` using an allowance granted to `spender`.
    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), GaugeError> {
        let config = Self::load_config(&env)?;
        spender.require_auth();

        if amount < 0 {
            return Err(GaugeError::InvalidAmount);
        }
        ledger::spend_allowance(&env, &from, &spender, amount)?;

        Self::transfer_stake(&env, &config, &from, &to, amount)
    }

    pub fn approve(
        env: Env,
        owner: Address,
        spender: Address,
        amount: i128,
    ) -> Result<(), GaugeError> {
        Self::require_initialized(&env)?;
        owner.require_auth();

        if amount < 0 {
            return Err(GaugeError::InvalidAmount);
        }
        ledger::set_allowance(&env, &owner, &spender, amount);

        events::publish_approval(&env, owner, spender, amount);

        Ok(())
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Claim every reward token `account` has accrued.
    ///
    /// With an explicit `receiver` the account must authorize the call.
    /// Without one, anyone may trigger the claim and it pays the account's
    /// registered rewards receiver, or the account itself.
    ///
    /// Returns the amount paid per reward token.
    pub fn claim_rewards(
        env: Env,
        account: Address,
        receiver: Option<Address>,
    ) -> Result<Map<Address, i128>, GaugeError> {
        let config = Self::load_config(&env)?;
        if receiver.is_some() {
            account.require_auth();
        }

        let integrals = claim::sync_rewards(&env, &config)?;
        claim::checkpoint_account(&env, &account, &integrals)?;

        let receiver = claim::resolve_receiver(&env, &account, receiver);
        claim::pay_out(&env, &account, &receiver, &integrals)
    }

    /// Register (or clear, with `None`) the default payout target for
    /// `account`'s claims.
    pub fn set_rewards_receiver(
        env: Env,
        account: Address,
        receiver: Option<Address>,
    ) -> Result<(), GaugeError> {
        Self::require_initialized(&env)?;
        account.require_auth();

        claim::set_rewards_receiver(&env, &account, &receiver);

        events::publish_receiver_set(&env, account, receiver);

        Ok(())
    }

    /// Checkpoint `account` for real (source pull included) without paying
    /// out, and return what it has accrued in `token`.
    ///
    /// Simulate this call to read the exact amount the next claim pays.
    pub fn claimable_reward_write(
        env: Env,
        account: Address,
        token: Address,
    ) -> Result<i128, GaugeError> {
        let config = Self::load_config(&env)?;

        let integrals = claim::sync_rewards(&env, &config)?;
        claim::checkpoint_account(&env, &account, &integrals)?;

        Ok(checkpoint::load(&env, &account, &token).accrued)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Claimable amount of `token` for `account`, projected from balances the
    /// gauge holds now. Does not pull the source or write state.
    ///
    /// With a `Streamer` or `Relay` source this leaves out whatever the next
    /// pull would collect. `claimable_reward_write` returns the exact figure
    /// for external sources.
    pub fn claimable_reward(env: Env, account: Address, token: Address) -> Result<i128, GaugeError> {
        Self::require_initialized(&env)?;
        claim::claimable(&env, &account, &token)
    }

    /// Lifetime amount of `token` paid out for `account`.
    pub fn claimed_reward(env: Env, account: Address, token: Address) -> i128 {
        checkpoint::load(&env, &account, &token).claimed
    }

    pub fn balance_of(env: Env, account: Address) -> i128 {
        ledger::balance_of(&env, &account)
    }

    pub fn total_supply(env: Env) -> i128 {
        ledger::total_supply(&env)
    }

    pub fn allowance(env: Env, owner: Address, spender: Address) -> i128 {
        ledger::allowance(&env, &owner, &spender)
    }

    pub fn rewards_receiver(env: Env, account: Address) -> Option<Address> {
        claim::rewards_receiver(&env, &account)
    }

    pub fn reward_tokens(env: Env) -> Vec<Address> {
        registry::reward_tokens(&env)
    }

    /// Token in registry slot `index`; `None` for unused slots.
    pub fn reward_token(env: Env, index: u32) -> Option<Address> {
        registry::reward_token(&env, index)
    }

    pub fn reward_config(env: Env, index: u32) -> Option<RewardConfig> {
        registry::reward_config(&env, index)
    }

    pub fn reward_source(env: Env) -> RewardSource {
        registry::reward_source(&env)
    }

    pub fn get_accumulator(env: Env, token: Address) -> RewardAccumulator {
        accumulator::load(&env, &token)
    }

    pub fn get_checkpoint(env: Env, account: Address, token: Address) -> RewardCheckpoint {
        checkpoint::load(&env, &account, &token)
    }

    /// Timestamp of the last successful external pull.
    pub fn last_pull(env: Env) -> Option<u64> {
        claim::last_pull(&env)
    }

    pub fn get_config(env: Env) -> Result<GaugeConfig, GaugeError> {
        Self::load_config(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_admin(env: Env) -> Result<Address, GaugeError> {
        admin::get_admin(&env).ok_or(GaugeError::NotInitialized)
    }

    pub fn version() -> u32 {
        1
    }

    // ── Admin functions ──────────────────────────────────────────────────────

    /// Replace the reward source and extend the reward token list.
    ///
    /// Existing slots cannot change. Every accumulator is synced against the
    /// *old* source first, so nothing it already delivered is lost. A broken
    /// old source never blocks the switch: its pull failure is skipped here
    /// regardless of the configured policy.
    pub fn set_rewards(
        env: Env,
        caller: Address,
        source: RewardSource,
        tokens: Vec<Address>,
    ) -> Result<(), GaugeError> {
        let config = Self::load_config(&env)?;
        Self::require_admin(&env, &caller)?;

        registry::validate(&registry::reward_tokens(&env), &tokens, &config.stake_token)?;

        claim::pull_source(&env, 0, SourceFailurePolicy::Skip)?;
        claim::integrate_all(&env);

        registry::store(&env, &source, &tokens);
        claim::reset_last_pull(&env);

        events::publish_rewards_set(&env, source, tokens);

        Ok(())
    }

    pub fn set_failure_policy(
        env: Env,
        caller: Address,
        failure_policy: SourceFailurePolicy,
    ) -> Result<(), GaugeError> {
        let mut config = Self::load_config(&env)?;
        Self::require_admin(&env, &caller)?;

        config.failure_policy = failure_policy;
        env.storage().instance().set(&CONFIG, &config);

        events::publish_policy_set(&env, failure_policy);

        Ok(())
    }

    pub fn set_pull_interval(
        env: Env,
        caller: Address,
        pull_interval: u64,
    ) -> Result<(), GaugeError> {
        let mut config = Self::load_config(&env)?;
        Self::require_admin(&env, &caller)?;

        config.pull_interval = pull_interval;
        env.storage().instance().set(&CONFIG, &config);

        events::publish_pull_interval_set(&env, pull_interval);

        Ok(())
    }

    // ── Admin transfer (two-step) ──────────────────────────────────────────

    /// Propose a new admin. The new admin must call `accept_admin`.
    pub fn propose_admin(
        env: Env,
        current_admin: Address,
        new_admin: Address,
    ) -> Result<(), GaugeError> {
        Self::require_admin(&env, &current_admin)?;

        admin::propose(&env, &new_admin);

        events::publish_admin_transfer_proposed(&env, current_admin, new_admin);

        Ok(())
    }

    pub fn accept_admin(env: Env, new_admin: Address) -> Result<(), GaugeError> {
        Self::require_initialized(&env)?;
        new_admin.require_auth();

        if admin::pending_admin(&env).is_none() {
            return Err(GaugeError::NoPendingAdmin);
        }
        let old_admin = admin::accept(&env, &new_admin).ok_or(GaugeError::Unauthorized)?;

        events::publish_admin_transfer_accepted(&env, old_admin, new_admin);

        Ok(())
    }

    pub fn cancel_admin_transfer(env: Env, current_admin: Address) -> Result<(), GaugeError> {
        Self::require_admin(&env, &current_admin)?;

        let pending = admin::cancel(&env).ok_or(GaugeError::NoPendingAdmin)?;

        events::publish_admin_transfer_cancelled(&env, current_admin, pending);

        Ok(())
    }

    pub fn get_pending_admin(env: Env) -> Option<Address> {
        admin::pending_admin(&env)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), GaugeError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(GaugeError::NotInitialized);
        }
        ttl::extend_instance(env);
        Ok(())
    }

    fn load_config(env: &Env) -> Result<GaugeConfig, GaugeError> {
        Self::require_initialized(env)?;
        env.storage()
            .instance()
            .get(&CONFIG)
            .ok_or(GaugeError::NotInitialized)
    }

    /// Guard: `caller` authorized the call and is the stored admin.
    fn require_admin(env: &Env, caller: &Address) -> Result<(), GaugeError> {
        Self::require_initialized(env)?;
        caller.require_auth();
        if !admin::is_admin(env, caller) {
            return Err(GaugeError::Unauthorized);
        }
        Ok(())
    }

    /// Checkpoint both sides at their pre-transfer stake, then move it.
    ///
    /// `ledger::move_stake` rejects an overdraft; the checkpoints written
    /// before it are rolled back with the error.
    fn transfer_stake(
        env: &Env,
        config: &GaugeConfig,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), GaugeError> {
        if amount < 0 {
            return Err(GaugeError::InvalidAmount);
        }

        let integrals = claim::sync_rewards(env, config)?;
        claim::checkpoint_account(env, from, &integrals)?;
        if to != from {
            claim::checkpoint_account(env, to, &integrals)?;
        }

        ledger::move_stake(env, from, to, amount)?;

        events::publish_transfer(env, from.clone(), to.clone(), amount);

        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_rewards;
