//! Sanction store keys
//!
//! ```text
//! 0x00 | name                    -> param value (coin string)
//! 0x01 | len | addr              -> 0x01 (sanctioned)
//! 0x02 | len | addr | id (BE)    -> temp status byte
//! 0x03 | id (BE) | len | addr    -> temp status byte (proposal index)
//! ```

use coinguard_core::keys::{
    address_id_key, address_key, id_address_key, id_key, parse_address_id_key, parse_address_key,
    parse_id_address_key,
};
use coinguard_core::{Address, FatalError};

/// Store namespace
pub const STORE_KEY: &str = "sanction";

pub const PARAMS_PREFIX: u8 = 0x00;
pub const SANCTIONED_PREFIX: u8 = 0x01;
pub const TEMP_PREFIX: u8 = 0x02;
pub const PROPOSAL_INDEX_PREFIX: u8 = 0x03;

/// Value stored under a sanctioned-address key
pub const SANCTIONED_VALUE: u8 = 0x01;

pub fn param_key(name: &str) -> Vec<u8> {
    let mut key = vec![PARAMS_PREFIX];
    key.extend_from_slice(name.as_bytes());
    key
}

pub fn sanctioned_key(addr: &Address) -> Vec<u8> {
    address_key(SANCTIONED_PREFIX, addr)
}

pub fn parse_sanctioned_key(key: &[u8]) -> Result<Address, FatalError> {
    parse_address_key(SANCTIONED_PREFIX, key)
}

pub fn temp_key(addr: &Address, proposal_id: u64) -> Vec<u8> {
    address_id_key(TEMP_PREFIX, addr, proposal_id)
}

/// Prefix covering every temp entry of `addr`, ordered by proposal id
pub fn temp_addr_prefix(addr: &Address) -> Vec<u8> {
    address_key(TEMP_PREFIX, addr)
}

pub fn parse_temp_key(key: &[u8]) -> Result<(Address, u64), FatalError> {
    parse_address_id_key(TEMP_PREFIX, key)
}

pub fn proposal_index_key(proposal_id: u64, addr: &Address) -> Vec<u8> {
    id_address_key(PROPOSAL_INDEX_PREFIX, proposal_id, addr)
}

/// Prefix covering every index entry of one proposal
pub fn proposal_index_prefix(proposal_id: u64) -> Vec<u8> {
    id_key(PROPOSAL_INDEX_PREFIX, proposal_id)
}

pub fn parse_proposal_index_key(key: &[u8]) -> Result<(u64, Address), FatalError> {
    parse_id_address_key(PROPOSAL_INDEX_PREFIX, key)
}
