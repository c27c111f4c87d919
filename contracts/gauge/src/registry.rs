use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::source::RewardSource;
use crate::GaugeError;

/// Maximum number of reward tokens a gauge distributes.
pub const MAX_REWARDS: u32 = 8;

const REWARD_TOKENS: Symbol = symbol_short!("RWD_TOKS");
const REWARD_SOURCE: Symbol = symbol_short!("RWD_SRC");

/// Configuration of one registry slot.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardConfig {
    pub token: Address,
    pub source: RewardSource,
}

pub fn reward_tokens(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&REWARD_TOKENS)
        .unwrap_or(Vec::new(env))
}

/// Token in slot `index`, or `None` for an unused slot.
pub fn reward_token(env: &Env, index: u32) -> Option<Address> {
    reward_tokens(env).get(index)
}

pub fn is_registered(env: &Env, token: &Address) -> bool {
    reward_tokens(env).iter().any(|registered| registered == *token)
}

pub fn reward_source(env: &Env) -> RewardSource {
    env.storage()
        .instance()
        .get(&REWARD_SOURCE)
        .unwrap_or(RewardSource::Direct)
}

pub fn reward_config(env: &Env, index: u32) -> Option<RewardConfig> {
    reward_token(env, index).map(|token| RewardConfig {
        token,
        source: reward_source(env),
    })
}

/// Check a replacement token list against the current one.
///
/// Slots are append-only: every registered token must keep its position,
/// so accrued-but-unclaimed balances stay reachable through the same
/// accumulator and checkpoints.
pub fn validate(
    current: &Vec<Address>,
    proposed: &Vec<Address>,
    stake_token: &Address,
) -> Result<(), GaugeError> {
    if proposed.len() > MAX_REWARDS {
        return Err(GaugeError::RegistryFull);
    }
    if proposed.len() < current.len() {
        return Err(GaugeError::RewardTokenLocked);
    }

    for (index, token) in proposed.iter().enumerate() {
        if token == *stake_token {
            return Err(GaugeError::InvalidRewardToken);
        }
        let index = index as u32;
        if let Some(existing) = current.get(index) {
            if existing != token {
                return Err(GaugeError::RewardTokenLocked);
            }
        }
        for later in proposed.iter().skip(index as usize + 1) {
            if later == token {
                return Err(GaugeError::DuplicateToken);
            }
        }
    }

    Ok(())
}

pub fn store(env: &Env, source: &RewardSource, tokens: &Vec<Address>) {
    env.storage().instance().set(&REWARD_SOURCE, source);
    env.storage().instance().set(&REWARD_TOKENS, tokens);
}
