use soroban_sdk::{contracttype, symbol_short, Address, Env, Map, Vec};

use crate::source::{RewardSource, SourceFailurePolicy};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub stake_token: Address,
    pub failure_policy: SourceFailurePolicy,
    pub pull_interval: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub from: Address,
    pub to: Address,
    pub amount: i128,
    pub total_supply: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub account: Address,
    pub amount: i128,
    pub total_supply: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferEvent {
    pub from: Address,
    pub to: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApprovalEvent {
    pub owner: Address,
    pub spender: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimEvent {
    pub account: Address,
    pub receiver: Address,
    pub payouts: Map<Address, i128>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsSetEvent {
    pub source: RewardSource,
    pub tokens: Vec<Address>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReceiverSetEvent {
    pub account: Address,
    pub receiver: Option<Address>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceFailedEvent {
    pub source: RewardSource,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PolicySetEvent {
    pub failure_policy: SourceFailurePolicy,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PullIntervalSetEvent {
    pub pull_interval: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferEvent {
    pub current_admin: Address,
    pub new_admin: Address,
}

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    stake_token: Address,
    failure_policy: SourceFailurePolicy,
    pull_interval: u64,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            stake_token,
            failure_policy,
            pull_interval,
        },
    );
}

pub fn publish_deposit(env: &Env, from: Address, to: Address, amount: i128, total_supply: i128) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), to.clone()),
        DepositEvent {
            from,
            to,
            amount,
            total_supply,
        },
    );
}

pub fn publish_withdraw(env: &Env, account: Address, amount: i128, total_supply: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), account.clone()),
        WithdrawEvent {
            account,
            amount,
            total_supply,
        },
    );
}

pub fn publish_transfer(env: &Env, from: Address, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("XFER"), from.clone(), to.clone()),
        TransferEvent { from, to, amount },
    );
}

pub fn publish_approval(env: &Env, owner: Address, spender: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("APPROVE"), owner.clone(), spender.clone()),
        ApprovalEvent {
            owner,
            spender,
            amount,
        },
    );
}

pub fn publish_claim(env: &Env, account: Address, receiver: Address, payouts: Map<Address, i128>) {
    env.events().publish(
        (symbol_short!("CLAIM"), account.clone()),
        ClaimEvent {
            account,
            receiver,
            payouts,
        },
    );
}

pub fn publish_rewards_set(env: &Env, source: RewardSource, tokens: Vec<Address>) {
    env.events().publish(
        (symbol_short!("RWD_SET"),),
        RewardsSetEvent { source, tokens },
    );
}

pub fn publish_receiver_set(env: &Env, account: Address, receiver: Option<Address>) {
    env.events().publish(
        (symbol_short!("RCV_SET"), account.clone()),
        ReceiverSetEvent { account, receiver },
    );
}

pub fn publish_source_failed(env: &Env, source: RewardSource) {
    env.events().publish(
        (symbol_short!("SRC_FAIL"),),
        SourceFailedEvent {
            source,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_policy_set(env: &Env, failure_policy: SourceFailurePolicy) {
    env.events()
        .publish((symbol_short!("POLICY"),), PolicySetEvent { failure_policy });
}

pub fn publish_pull_interval_set(env: &Env, pull_interval: u64) {
    env.events().publish(
        (symbol_short!("PULL_INT"),),
        PullIntervalSetEvent { pull_interval },
    );
}

pub fn publish_admin_transfer_proposed(env: &Env, current_admin: Address, new_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_PROP"),),
        AdminTransferEvent {
            current_admin,
            new_admin,
        },
    );
}

pub fn publish_admin_transfer_accepted(env: &Env, old_admin: Address, new_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_ACC"),),
        AdminTransferEvent {
            current_admin: old_admin,
            new_admin,
        },
    );
}

pub fn publish_admin_transfer_cancelled(env: &Env, current_admin: Address, pending: Address) {
    env.events().publish(
        (symbol_short!("ADM_CNCL"),),
        AdminTransferEvent {
            current_admin,
            new_admin: pending,
        },
    );
}
