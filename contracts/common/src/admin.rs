//! Two-step admin handover shared by every contract in the workspace.
//!
//! The current admin proposes a successor, and the successor must accept
//! before the role moves. Callers are expected to have run `require_auth`
//! on the acting address already; these helpers only touch storage.

use soroban_sdk::{symbol_short, Address, Env, Symbol};

const ADMIN: Symbol = symbol_short!("ADMIN");
const PENDING_ADMIN: Symbol = symbol_short!("PEND_ADM");

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&ADMIN, admin);
}

pub fn get_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&ADMIN)
}

/// Returns whether `caller` is the stored admin.
pub fn is_admin(env: &Env, caller: &Address) -> bool {
    get_admin(env).is_some_and(|admin| admin == *caller)
}

/// Record `new_admin` as the pending successor, replacing any earlier proposal.
pub fn propose(env: &Env, new_admin: &Address) {
    env.storage().instance().set(&PENDING_ADMIN, new_admin);
}

pub fn pending_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&PENDING_ADMIN)
}

/// Promote `new_admin` if it is the pending successor.
///
/// Returns the previous admin on success, `None` when `new_admin` was not
/// proposed.
pub fn accept(env: &Env, new_admin: &Address) -> Option<Address> {
    let pending = pending_admin(env)?;
    if pending != *new_admin {
        return None;
    }
    let previous = get_admin(env)?;
    set_admin(env, new_admin);
    env.storage().instance().remove(&PENDING_ADMIN);
    Some(previous)
}

/// Drop the pending proposal, returning the address that was pending.
pub fn cancel(env: &Env) -> Option<Address> {
    let pending = pending_admin(env)?;
    env.storage().instance().remove(&PENDING_ADMIN);
    Some(pending)
}
