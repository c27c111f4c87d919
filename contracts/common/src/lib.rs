#![no_std]

pub mod admin;
pub mod ttl;
