#![no_main]

use arbitrary::Arbitrary;
use gauge::source::{RewardSource, SourceFailurePolicy};
use gauge::{GaugeContract, GaugeContractClient};
use libfuzzer_sys::fuzz_target;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{token, vec, Address, Env};

const ACCOUNTS: usize = 3;
const MAX_OPS: usize = 32;

#[derive(Arbitrary, Debug)]
enum Op {
    Deposit { account: u8, amount: u32 },
    Withdraw { account: u8, amount: u32 },
    Transfer { from: u8, to: u8, amount: u32 },
    Fund { amount: u64 },
    Claim { account: u8 },
}

fuzz_target!(|ops: Vec<Op>| {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let stake_token = env.register_stellar_asset_contract_v2(admin.clone()).address();
    let reward_token = env.register_stellar_asset_contract_v2(admin.clone()).address();
    let stake_admin = token::StellarAssetClient::new(&env, &stake_token);
    let reward_admin = token::StellarAssetClient::new(&env, &reward_token);
    let rewards = token::Client::new(&env, &reward_token);

    let contract_id = env.register(GaugeContract, ());
    let gauge = GaugeContractClient::new(&env, &contract_id);
    gauge.initialize(&admin, &stake_token, &SourceFailurePolicy::Skip, &0);
    gauge.set_rewards(&admin, &RewardSource::Direct, &vec![&env, reward_token.clone()]);

    let accounts: [Address; ACCOUNTS] = core::array::from_fn(|_| Address::generate(&env));
    let pick = |index: u8| &accounts[index as usize % ACCOUNTS];
    let mut funded: i128 = 0;

    for op in ops.into_iter().take(MAX_OPS) {
        match op {
            Op::Deposit { account, amount } => {
                let amount = amount as i128 + 1;
                stake_admin.mint(pick(account), &amount);
                gauge.deposit(pick(account), pick(account), &amount, &false);
            }
            Op::Withdraw { account, amount } => {
                let _ = gauge.try_withdraw(pick(account), &(amount as i128 + 1), &false);
            }
            Op::Transfer { from, to, amount } => {
                let _ = gauge.try_transfer(pick(from), pick(to), &(amount as i128));
            }
            Op::Fund { amount } => {
                let amount = amount as i128 + 1;
                reward_admin.mint(&contract_id, &amount);
                funded += amount;
            }
            Op::Claim { account } => {
                gauge.claim_rewards(pick(account), &None);
            }
        }

        let staked: i128 = accounts.iter().map(|a| gauge.balance_of(a)).sum();
        assert_eq!(staked, gauge.total_supply());

        let mut owed = 0i128;
        let mut paid = 0i128;
        for account in accounts.iter() {
            let ckpt = gauge.get_checkpoint(account, &reward_token);
            assert!(ckpt.accrued >= 0);
            assert_eq!(rewards.balance(account), ckpt.claimed);
            owed += ckpt.accrued;
            paid += ckpt.claimed;
        }
        assert!(owed + paid <= funded);
        assert_eq!(rewards.balance(&contract_id), funded - paid);
    }
});
