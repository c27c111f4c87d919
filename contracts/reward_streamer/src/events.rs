use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub receiver: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardAddedEvent {
    pub token: Address,
    pub distributor: Address,
    pub duration: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardNotifiedEvent {
    pub token: Address,
    pub amount: i128,
    pub rate: i128,
    pub period_finish: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPaidEvent {
    pub token: Address,
    pub receiver: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReceiverSetEvent {
    pub receiver: Address,
}

pub fn publish_initialized(env: &Env, admin: Address, receiver: Address) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent { admin, receiver },
    );
}

pub fn publish_reward_added(env: &Env, token: Address, distributor: Address, duration: u64) {
    env.events().publish(
        (symbol_short!("RWD_ADD"), token.clone()),
        RewardAddedEvent {
            token,
            distributor,
            duration,
        },
    );
}

pub fn publish_reward_notified(
    env: &Env,
    token: Address,
    amount: i128,
    rate: i128,
    period_finish: u64,
) {
    env.events().publish(
        (symbol_short!("NOTIFY"), token.clone()),
        RewardNotifiedEvent {
            token,
            amount,
            rate,
            period_finish,
        },
    );
}

pub fn publish_reward_paid(env: &Env, token: Address, receiver: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("PAID"), token.clone(), receiver.clone()),
        RewardPaidEvent {
            token,
            receiver,
            amount,
        },
    );
}

pub fn publish_receiver_set(env: &Env, receiver: Address) {
    env.events()
        .publish((symbol_short!("RCV_SET"),), ReceiverSetEvent { receiver });
}
