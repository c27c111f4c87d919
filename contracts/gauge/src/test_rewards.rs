use soroban_sdk::testutils::IssuerFlags;
use soroban_sdk::{token, vec};

use crate::checkpoint::RewardCheckpoint;
use crate::source::RewardSource;
use crate::test::{is_close, GaugeTest, LP_AMOUNT, REWARD, WEEK};
use crate::{rewards, GaugeError};

const HALF_WEEK: u64 = WEEK / 2;

// ── Streamed rewards ────────────────────────────────────────────────────────

#[test]
fn test_single_staker_receives_full_stream() {
    let t = GaugeTest::new();
    let alice = t.account();
    let bob = t.account();

    t.deposit(&alice, LP_AMOUNT);
    let streamer = t.streamer();
    t.set_streamer_rewards(&streamer.address);
    t.notify(&streamer, REWARD);

    t.advance(2 * WEEK);
    t.gauge.claim_rewards(&alice, &None);
    t.gauge.claim_rewards(&bob, &None);

    let paid = t.reward_balance(&alice);
    assert!(paid <= REWARD);
    // Only the per-second rounding of the stream rate stays behind.
    assert!(REWARD - paid < WEEK as i128);
    assert_eq!(t.reward_balance(&bob), 0);
    assert_eq!(t.gauge.claimed_reward(&alice, &t.reward_token), paid);
}

#[test]
fn test_rewards_split_evenly_between_equal_stakers() {
    let t = GaugeTest::new();
    let accounts = t.accounts(10);

    for account in accounts.iter() {
        t.deposit(&account, LP_AMOUNT);
    }
    let streamer = t.streamer();
    t.set_streamer_rewards(&streamer.address);
    t.notify(&streamer, REWARD);

    t.advance(WEEK);

    let mut total_paid = 0;
    for account in accounts.iter() {
        t.gauge.claim_rewards(&account, &None);
        let paid = t.reward_balance(&account);
        assert!(is_close(paid, REWARD / 10, 10, 0));
        total_paid += paid;
    }
    assert!(total_paid <= REWARD);
    assert!(is_close(total_paid, REWARD, 10, 0));
}

#[test]
fn test_rewards_survive_mass_exit() {
    let t = GaugeTest::new();
    let funder = t.account();
    let accounts = t.accounts(10);

    t.mint(&t.stake_token, &funder, 10 * LP_AMOUNT);
    for account in accounts.iter() {
        t.gauge.deposit(&funder, &account, &LP_AMOUNT, &false);
    }
    let streamer = t.streamer();
    t.set_streamer_rewards(&streamer.address);
    t.notify(&streamer, REWARD);

    t.advance(WEEK);

    for account in accounts.iter() {
        t.gauge.withdraw(&account, &LP_AMOUNT, &false);
        assert_eq!(t.gauge.balance_of(&account), 0);
        assert_eq!(t.stake_balance(&account), LP_AMOUNT);
        assert_eq!(t.gauge.claimed_reward(&account, &t.reward_token), 0);
        assert!(t.gauge.claimable_reward_write(&account, &t.reward_token) > 0);
    }
    assert_eq!(t.gauge.total_supply(), 0);

    for account in accounts.iter() {
        let projected = t.gauge.claimable_reward(&account, &t.reward_token);
        t.gauge.claim_rewards(&account, &None);
        let paid = t.reward_balance(&account);
        assert_eq!(paid, projected);
        assert!(is_close(paid, REWARD / 10, 10, 0));
    }
}

// ── Stake transfers ─────────────────────────────────────────────────────────

#[test]
fn test_transfer_does_not_trigger_claim_for_sender() {
    let t = GaugeTest::new();
    let alice = t.account();
    let bob = t.account();

    t.deposit(&alice, LP_AMOUNT);
    let streamer = t.streamer();
    t.set_streamer_rewards(&streamer.address);
    t.notify(&streamer, REWARD);

    t.advance(HALF_WEEK);
    t.gauge.transfer(&alice, &bob, &LP_AMOUNT);

    assert_eq!(t.reward_balance(&alice), 0);
    let checkpoint = t.gauge.get_checkpoint(&alice, &t.reward_token);
    assert!(is_close(checkpoint.accrued, REWARD / 2, 100, 0));
    assert_eq!(checkpoint.claimed, 0);
}

#[test]
fn test_transfer_does_not_trigger_claim_for_receiver() {
    let t = GaugeTest::new();
    let alice = t.account();
    let bob = t.account();

    t.deposit(&alice, LP_AMOUNT);
    let streamer = t.streamer();
    t.set_streamer_rewards(&streamer.address);
    t.notify(&streamer, REWARD);

    t.advance(HALF_WEEK);
    t.gauge.transfer(&alice, &bob, &(LP_AMOUNT / 2));
    t.advance(WEEK);
    t.gauge.transfer(&bob, &alice, &(LP_AMOUNT / 2));

    assert_eq!(t.reward_balance(&alice), 0);
    assert_eq!(t.reward_balance(&bob), 0);
    assert!(t.gauge.get_checkpoint(&bob, &t.reward_token).accrued > 0);
}

#[test]
fn test_claims_stay_accurate_across_transfer() {
    let t = GaugeTest::new();
    let alice = t.account();
    let bob = t.account();

    t.deposit(&alice, LP_AMOUNT);
    let streamer = t.streamer();
    t.set_streamer_rewards(&streamer.address);
    t.notify(&streamer, REWARD);

    t.advance(HALF_WEEK);
    t.gauge.transfer(&alice, &bob, &LP_AMOUNT);
    t.advance(HALF_WEEK);

    t.gauge.claim_rewards(&alice, &None);
    t.gauge.claim_rewards(&bob, &None);

    assert!(is_close(t.reward_balance(&alice), REWARD / 2, 100, 0));
    assert!(is_close(t.reward_balance(&bob), REWARD / 2, 100, 0));
    assert!(t.reward_balance(&alice) + t.reward_balance(&bob) <= REWARD);
}

#[test]
fn test_transfer_settles_both_sides_at_old_stake() {
    let t = GaugeTest::new();
    t.set_direct_rewards();
    let alice = t.account();
    let bob = t.account();

    t.deposit(&alice, 100);
    t.fund_gauge(1_000);
    t.gauge.transfer(&alice, &bob, &40);

    assert_eq!(t.gauge.get_checkpoint(&alice, &t.reward_token).accrued, 1_000);
    assert_eq!(t.gauge.get_checkpoint(&bob, &t.reward_token).accrued, 0);
    assert_eq!(t.reward_balance(&alice), 0);

    // Later rewards follow the new split 60/40.
    t.fund_gauge(1_000);
    assert_eq!(t.gauge.claimable_reward(&alice, &t.reward_token), 1_600);
    assert_eq!(t.gauge.claimable_reward(&bob, &t.reward_token), 400);
}

// ── Edge cases ──────────────────────────────────────────────────────────────

#[test]
fn test_claim_without_deposit_pays_nothing() {
    let t = GaugeTest::new();
    let alice = t.account();
    let bob = t.account();

    t.deposit(&alice, LP_AMOUNT);
    let streamer = t.streamer();
    t.notify(&streamer, REWARD);
    t.set_streamer_rewards(&streamer.address);

    t.advance(WEEK);
    let payouts = t.gauge.claim_rewards(&bob, &None);

    assert_eq!(payouts.get(t.reward_token.clone()), Some(0));
    assert_eq!(t.reward_balance(&bob), 0);
}

#[test]
fn test_claim_without_registered_rewards_pays_nothing() {
    let t = GaugeTest::new();
    let bob = t.account();

    t.deposit(&bob, LP_AMOUNT);
    t.advance(WEEK);
    t.gauge.withdraw(&bob, &LP_AMOUNT, &false);

    let payouts = t.gauge.claim_rewards(&bob, &None);
    assert!(payouts.is_empty());
    assert_eq!(t.reward_balance(&bob), 0);
    assert_eq!(t.gauge.claimable_reward(&bob, &t.reward_token), 0);
}

#[test]
fn test_rewards_held_before_any_stake_go_to_first_staker() {
    let t = GaugeTest::new();
    t.set_direct_rewards();
    let alice = t.account();
    let bob = t.account();

    t.fund_gauge(1_000);

    // Syncing with nothing staked leaves the accumulator alone.
    t.gauge.claim_rewards(&bob, &None);
    let acc = t.gauge.get_accumulator(&t.reward_token);
    assert_eq!(acc.integral, rewards::zero(&t.env));
    assert_eq!(acc.balance, 0);

    t.deposit(&alice, 100);
    assert_eq!(t.gauge.get_checkpoint(&alice, &t.reward_token).accrued, 0);
    assert_eq!(t.gauge.claimable_reward(&alice, &t.reward_token), 1_000);

    t.gauge.claim_rewards(&alice, &None);
    assert_eq!(t.reward_balance(&alice), 1_000);
    assert_eq!(t.reward_balance(&t.gauge.address), 0);
    assert_eq!(t.gauge.get_accumulator(&t.reward_token).balance, 0);
}

#[test]
fn test_late_depositor_does_not_share_earlier_rewards() {
    let t = GaugeTest::new();
    t.set_direct_rewards();
    let alice = t.account();
    let carol = t.account();

    t.deposit(&alice, 100);
    t.fund_gauge(1_000);
    t.deposit(&carol, 300);

    assert_eq!(t.gauge.claimable_reward(&alice, &t.reward_token), 1_000);
    assert_eq!(t.gauge.claimable_reward(&carol, &t.reward_token), 0);

    t.fund_gauge(400);
    assert_eq!(t.gauge.claimable_reward(&alice, &t.reward_token), 1_100);
    assert_eq!(t.gauge.claimable_reward(&carol, &t.reward_token), 300);
}

#[test]
fn test_failed_withdraw_changes_nothing() {
    let t = GaugeTest::new();
    t.set_direct_rewards();
    let alice = t.account();

    t.deposit(&alice, 100);
    t.fund_gauge(1_000);
    t.gauge.claim_rewards(&alice, &None);
    t.fund_gauge(500);

    let acc_before = t.gauge.get_accumulator(&t.reward_token);
    let ckpt_before = t.gauge.get_checkpoint(&alice, &t.reward_token);

    assert_eq!(
        t.gauge.try_withdraw(&alice, &101, &true),
        Err(Ok(GaugeError::InsufficientBalance))
    );

    assert_eq!(t.gauge.balance_of(&alice), 100);
    assert_eq!(t.gauge.total_supply(), 100);
    assert_eq!(t.stake_balance(&alice), 0);
    assert_eq!(t.reward_balance(&alice), 1_000);
    assert_eq!(t.gauge.get_accumulator(&t.reward_token), acc_before);
    assert_eq!(t.gauge.get_checkpoint(&alice, &t.reward_token), ckpt_before);
}

#[test]
fn test_deposit_and_withdraw_can_claim_in_the_same_call() {
    let t = GaugeTest::new();
    t.set_direct_rewards();
    let alice = t.account();

    t.deposit(&alice, 100);
    t.fund_gauge(1_000);

    t.mint(&t.stake_token, &alice, 50);
    t.gauge.deposit(&alice, &alice, &50, &true);
    assert_eq!(t.reward_balance(&alice), 1_000);
    assert_eq!(t.gauge.balance_of(&alice), 150);

    t.fund_gauge(300);
    t.gauge.withdraw(&alice, &150, &true);
    assert_eq!(t.reward_balance(&alice), 1_300);
    assert_eq!(t.gauge.claimed_reward(&alice, &t.reward_token), 1_300);
}

#[test]
fn test_claimable_projection_matches_claim() {
    let t = GaugeTest::new();
    t.set_direct_rewards();
    let alice = t.account();
    let bob = t.account();

    t.deposit(&alice, 300);
    t.deposit(&bob, 700);
    t.fund_gauge(10_000);

    let projected = t.gauge.claimable_reward(&alice, &t.reward_token);
    // The projection writes nothing.
    assert_eq!(
        t.gauge.get_accumulator(&t.reward_token).integral,
        rewards::zero(&t.env)
    );

    let payouts = t.gauge.claim_rewards(&alice, &None);
    assert_eq!(projected, 3_000);
    assert_eq!(payouts.get(t.reward_token.clone()), Some(projected));
    assert_eq!(t.gauge.claimable_reward(&alice, &t.reward_token), 0);
    assert_eq!(t.gauge.claimable_reward(&bob, &t.reward_token), 7_000);
}

#[test]
fn test_multiple_reward_tokens_accrue_independently() {
    let t = GaugeTest::new();
    let second = t
        .env
        .register_stellar_asset_contract_v2(t.admin.clone())
        .address();
    t.gauge.set_rewards(
        &t.admin,
        &RewardSource::Direct,
        &vec![&t.env, t.reward_token.clone(), second.clone()],
    );
    let alice = t.account();
    let bob = t.account();

    t.deposit(&alice, 100);
    t.deposit(&bob, 100);
    t.fund_gauge(1_000);
    t.mint(&second, &t.gauge.address, 50);

    let payouts = t.gauge.claim_rewards(&alice, &None);
    assert_eq!(payouts.get(t.reward_token.clone()), Some(500));
    assert_eq!(payouts.get(second.clone()), Some(25));
    assert_eq!(t.gauge.claimable_reward(&bob, &second), 25);
}

#[test]
fn test_large_reward_over_dust_stake_stays_operable() {
    let t = GaugeTest::new();
    t.set_direct_rewards();
    let alice = t.account();
    let bob = t.account();

    // One unit of stake against 2 × 10^20 reward pushes the integral past
    // i128::MAX.
    t.deposit(&alice, 1);
    t.fund_gauge(2 * REWARD);

    t.gauge.withdraw(&alice, &1, &false);
    assert_eq!(t.stake_balance(&alice), 1);
    assert_eq!(
        t.gauge.get_accumulator(&t.reward_token).integral.to_i128(),
        None
    );

    t.deposit(&bob, 10);
    let payouts = t.gauge.claim_rewards(&alice, &None);
    assert_eq!(payouts.get(t.reward_token.clone()), Some(2 * REWARD));
    assert_eq!(t.reward_balance(&alice), 2 * REWARD);

    t.fund_gauge(10);
    t.gauge.claim_rewards(&bob, &None);
    assert_eq!(t.reward_balance(&bob), 10);
}

#[test]
fn test_failed_payout_reverts_the_whole_claim() {
    let t = GaugeTest::new();
    let frozen = t
        .env
        .register_stellar_asset_contract_v2(t.admin.clone());
    frozen.issuer().set_flag(IssuerFlags::RevocableFlag);
    let second = frozen.address();
    t.gauge.set_rewards(
        &t.admin,
        &RewardSource::Direct,
        &vec![&t.env, t.reward_token.clone(), second.clone()],
    );
    let alice = t.account();

    t.deposit(&alice, 100);
    t.fund_gauge(1_000);
    t.mint(&second, &t.gauge.address, 500);
    token::StellarAssetClient::new(&t.env, &second).set_authorized(&alice, &false);

    assert_eq!(
        t.gauge.try_claim_rewards(&alice, &None),
        Err(Ok(GaugeError::TransferFailed))
    );

    // The first token's payout was rolled back with the second's failure.
    assert_eq!(t.reward_balance(&alice), 0);
    assert_eq!(t.reward_balance(&t.gauge.address), 1_000);
    assert_eq!(
        t.gauge.get_checkpoint(&alice, &t.reward_token),
        RewardCheckpoint::new(&t.env)
    );
    assert_eq!(
        t.gauge.get_checkpoint(&alice, &second),
        RewardCheckpoint::new(&t.env)
    );
}
