#![no_std]

pub mod emission;
pub mod events;

use common::{admin, ttl};
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, token, Address, Env, Symbol, Vec,
};

// ── Storage key constants ───────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const RECEIVER: Symbol = symbol_short!("RECEIVER");
const REWARD_TOKENS: Symbol = symbol_short!("RWD_TOKS");

// Per-token persistent storage uses tuple keys: (prefix, token_address)
const REWARD_DATA: Symbol = symbol_short!("RWD_DATA");

/// Maximum number of tokens a single streamer emits.
pub const MAX_REWARDS: u32 = 8;

// ── Contract errors ─────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum StreamerError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    RewardExists = 5,
    RewardNotFound = 6,
    TooManyRewards = 7,
}

// ── Types ───────────────────────────────────────────────────────────────────

/// Emission schedule for one reward token.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardData {
    /// The only address allowed to fund this stream.
    pub distributor: Address,
    /// Length of a reward period in seconds.
    pub duration: u64,
    /// Timestamp at which the current period stops emitting.
    pub period_finish: u64,
    /// Tokens released per second during the period.
    pub rate: i128,
    /// Emission up to this timestamp has been paid to the receiver.
    pub last_update: u64,
    /// Lifetime amount paid out.
    pub paid: i128,
}

// ── Contract ────────────────────────────────────────────────────────────────

/// Streams funded reward tokens to a single receiver (normally a gauge)
/// linearly over a fixed period.
#[contract]
pub struct RewardStreamer;

#[contractimpl]
impl RewardStreamer {
    pub fn initialize(env: Env, admin: Address, receiver: Address) -> Result<(), StreamerError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(StreamerError::AlreadyInitialized);
        }

        admin::set_admin(&env, &admin);
        env.storage().instance().set(&RECEIVER, &receiver);
        env.storage().instance().set(&INITIALIZED, &true);
        ttl::extend_instance(&env);

        events::publish_initialized(&env, admin, receiver);

        Ok(())
    }

    /// Register a new reward token together with the distributor allowed to
    /// fund it and the period length used by every notification.
    pub fn add_reward(
        env: Env,
        caller: Address,
        token: Address,
        distributor: Address,
        duration: u64,
    ) -> Result<(), StreamerError> {
        Self::require_admin(&env, &caller)?;

        if duration == 0 {
            return Err(StreamerError::InvalidInput);
        }

        let mut tokens = Self::reward_tokens(env.clone());
        if tokens.iter().any(|existing| existing == token) {
            return Err(StreamerError::RewardExists);
        }
        if tokens.len() >= MAX_REWARDS {
            return Err(StreamerError::TooManyRewards);
        }

        tokens.push_back(token.clone());
        env.storage().instance().set(&REWARD_TOKENS, &tokens);

        let data = RewardData {
            distributor: distributor.clone(),
            duration,
            period_finish: 0,
            rate: 0,
            last_update: env.ledger().timestamp(),
            paid: 0,
        };
        Self::store_reward_data(&env, &token, &data);

        events::publish_reward_added(&env, token, distributor, duration);

        Ok(())
    }

    /// Pull `amount` of `token` from its distributor and (re)start the
    /// emission period at the current timestamp.
    ///
    /// Emission already due under the previous period is paid to the
    /// receiver first; whatever was still scheduled rolls into the new rate.
    pub fn notify_reward_amount(
        env: Env,
        distributor: Address,
        token: Address,
        amount: i128,
    ) -> Result<(), StreamerError> {
        Self::require_initialized(&env)?;
        distributor.require_auth();

        if amount <= 0 {
            return Err(StreamerError::InvalidInput);
        }

        let mut data = Self::load_reward_data(&env, &token)?;
        if data.distributor != distributor {
            return Err(StreamerError::Unauthorized);
        }

        token::Client::new(&env, &token).transfer(
            &distributor,
            &env.current_contract_address(),
            &amount,
        );

        let receiver = Self::receiver(&env)?;
        let now = env.ledger().timestamp();
        Self::pay_pending(&env, &token, &receiver, &mut data, now);

        data.rate = emission::next_rate(amount, data.rate, data.period_finish, now, data.duration);
        data.last_update = now;
        data.period_finish = now.saturating_add(data.duration);
        Self::store_reward_data(&env, &token, &data);

        events::publish_reward_notified(&env, token, amount, data.rate, data.period_finish);

        Ok(())
    }

    /// Pay every token's emission since its last update to the receiver.
    pub fn get_reward(env: Env) -> Result<(), StreamerError> {
        Self::require_initialized(&env)?;
        let receiver = Self::receiver(&env)?;
        receiver.require_auth();

        let now = env.ledger().timestamp();
        for token in Self::reward_tokens(env.clone()).iter() {
            let mut data = Self::load_reward_data(&env, &token)?;
            Self::pay_pending(&env, &token, &receiver, &mut data, now);
            Self::store_reward_data(&env, &token, &data);
        }

        Ok(())
    }

    pub fn set_receiver(env: Env, caller: Address, receiver: Address) -> Result<(), StreamerError> {
        Self::require_admin(&env, &caller)?;

        env.storage().instance().set(&RECEIVER, &receiver);

        events::publish_receiver_set(&env, receiver);

        Ok(())
    }

    // ── View functions ──────────────────────────────────────────────────────

    pub fn reward_data(env: Env, token: Address) -> Result<RewardData, StreamerError> {
        Self::load_reward_data(&env, &token)
    }

    pub fn reward_tokens(env: Env) -> Vec<Address> {
        env.storage()
            .instance()
            .get(&REWARD_TOKENS)
            .unwrap_or(Vec::new(&env))
    }

    pub fn get_receiver(env: Env) -> Result<Address, StreamerError> {
        Self::receiver(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, StreamerError> {
        admin::get_admin(&env).ok_or(StreamerError::NotInitialized)
    }

    // ── Internal helpers ────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), StreamerError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(StreamerError::NotInitialized);
        }
        ttl::extend_instance(env);
        Ok(())
    }

    fn require_admin(env: &Env, caller: &Address) -> Result<(), StreamerError> {
        Self::require_initialized(env)?;
        caller.require_auth();
        if !admin::is_admin(env, caller) {
            return Err(StreamerError::Unauthorized);
        }
        Ok(())
    }

    fn receiver(env: &Env) -> Result<Address, StreamerError> {
        env.storage()
            .instance()
            .get(&RECEIVER)
            .ok_or(StreamerError::NotInitialized)
    }

    fn load_reward_data(env: &Env, token: &Address) -> Result<RewardData, StreamerError> {
        let key = (REWARD_DATA, token.clone());
        let data = env
            .storage()
            .persistent()
            .get(&key)
            .ok_or(StreamerError::RewardNotFound)?;
        ttl::extend_persistent(env, &key);
        Ok(data)
    }

    fn store_reward_data(env: &Env, token: &Address, data: &RewardData) {
        let key = (REWARD_DATA, token.clone());
        env.storage().persistent().set(&key, data);
        ttl::extend_persistent(env, &key);
    }

    /// Transfer the emission accrued since `data.last_update` and advance it.
    /// The caller persists `data`.
    fn pay_pending(env: &Env, token: &Address, receiver: &Address, data: &mut RewardData, now: u64) {
        let amount = emission::pending_emission(data.rate, data.last_update, data.period_finish, now);
        data.last_update = now.min(data.period_finish).max(data.last_update);

        if amount > 0 {
            token::Client::new(env, token).transfer(
                &env.current_contract_address(),
                receiver,
                &amount,
            );
            data.paid = data.paid.saturating_add(amount);
            events::publish_reward_paid(env, token.clone(), receiver.clone(), amount);
        }
    }
}
