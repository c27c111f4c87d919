/// Tokens a stream has released between `last_update` and `now`.
///
/// Emission stops at `period_finish`; anything before `last_update` has
/// already been paid out.
///
/// ```text
/// emitted = rate × (min(now, period_finish) − last_update)
/// ```
#[allow(clippy::arithmetic_side_effects)]
pub fn pending_emission(rate: i128, last_update: u64, period_finish: u64, now: u64) -> i128 {
    let until = now.min(period_finish);
    if until <= last_update || rate <= 0 {
        return 0;
    }

    // u64 → i128 is lossless.
    rate.saturating_mul((until - last_update) as i128)
}

/// Per-second rate for a period that starts at `now`.
///
/// Any amount still scheduled from a running period is rolled into the new
/// one, so re-notifying never strands tokens:
///
/// ```text
/// leftover = rate × (period_finish − now)      (0 once the period ended)
/// new_rate = (amount + leftover) / duration
/// ```
///
/// The division truncates; the remainder stays in the streamer as dust.
#[allow(clippy::arithmetic_side_effects)]
pub fn next_rate(amount: i128, rate: i128, period_finish: u64, now: u64, duration: u64) -> i128 {
    if duration == 0 {
        return 0;
    }

    let leftover = if now < period_finish {
        rate.saturating_mul((period_finish - now) as i128)
    } else {
        0
    };

    amount.saturating_add(leftover) / duration as i128
}
