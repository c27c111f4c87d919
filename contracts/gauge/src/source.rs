use soroban_sdk::{contractclient, contracttype, Address, Env};

/// Where reward tokens come from, and how the gauge asks for them.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RewardSource {
    /// Tokens are transferred straight to the gauge; nothing to pull.
    Direct,
    /// A streaming-emission contract that pays its configured receiver on
    /// `get_reward`.
    Streamer(Address),
    /// A bridge-relay adapter that forwards bridged rewards to `receiver`.
    Relay(Address),
}

/// What a failed pull does to the operation that triggered it.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SourceFailurePolicy {
    /// Integrate whatever the gauge already holds and carry on.
    Skip,
    /// Fail the enclosing operation with `SourcePullFailed`.
    Abort,
}

#[contractclient(name = "StreamerSourceClient")]
pub trait StreamerSource {
    fn get_reward(env: Env);
}

#[contractclient(name = "RelaySourceClient")]
pub trait RelaySource {
    fn relay_rewards(env: Env, receiver: Address) -> i128;
}

impl RewardSource {
    pub fn is_external(&self) -> bool {
        !matches!(self, RewardSource::Direct)
    }

    /// Ask the source to send the gauge what it is owed.
    ///
    /// Returns `false` when the source call failed. The host rolls back
    /// anything the failed call wrote, so the gauge's held balances are
    /// exactly what they were before.
    pub fn pull(&self, env: &Env) -> bool {
        match self {
            RewardSource::Direct => true,
            RewardSource::Streamer(address) => matches!(
                StreamerSourceClient::new(env, address).try_get_reward(),
                Ok(Ok(_))
            ),
            RewardSource::Relay(address) => matches!(
                RelaySourceClient::new(env, address)
                    .try_relay_rewards(&env.current_contract_address()),
                Ok(Ok(_))
            ),
        }
    }
}
