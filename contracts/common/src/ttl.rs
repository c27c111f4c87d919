use soroban_sdk::{Env, IntoVal, Val};

/// Ledgers remaining before a persistent entry is bumped (~1 day at 5s/ledger).
pub const PERSISTENT_TTL_THRESHOLD: u32 = 17_280;
/// Ledgers a persistent entry is extended to when bumped (~30 days).
pub const PERSISTENT_TTL_EXTEND_TO: u32 = 518_400;

pub const INSTANCE_TTL_THRESHOLD: u32 = 17_280;
pub const INSTANCE_TTL_EXTEND_TO: u32 = 518_400;

/// Extend a persistent entry. The entry must exist.
pub fn extend_persistent<K>(env: &Env, key: &K)
where
    K: IntoVal<Env, Val>,
{
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND_TO);
}

/// Extend the contract instance (and every instance-storage key with it).
pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND_TO);
}
