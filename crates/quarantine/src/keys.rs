//! Quarantine store keys
//!
//! ```text
//! 0x00 | len | to                -> 0x00 (opted in)
//! 0x01 | len | to | len | from   -> auto-response byte
//! 0x02 | len | to | len | from   -> QuarantineRecord (json)
//! ```

use coinguard_core::keys::{address_key, address_pair_key, parse_address_key, parse_address_pair_key};
use coinguard_core::{Address, FatalError};

/// Store namespace
pub const STORE_KEY: &str = "quarantine";

pub const OPT_IN_PREFIX: u8 = 0x00;
pub const AUTO_RESPONSE_PREFIX: u8 = 0x01;
pub const RECORD_PREFIX: u8 = 0x02;

/// Value stored under an opt-in key
pub const OPT_IN_VALUE: u8 = 0x00;

pub fn opt_in_key(to: &Address) -> Vec<u8> {
    address_key(OPT_IN_PREFIX, to)
}

pub fn parse_opt_in_key(key: &[u8]) -> Result<Address, FatalError> {
    parse_address_key(OPT_IN_PREFIX, key)
}

pub fn auto_response_key(to: &Address, from: &Address) -> Vec<u8> {
    address_pair_key(AUTO_RESPONSE_PREFIX, to, from)
}

/// Prefix covering every auto-response of `to`
pub fn auto_response_prefix(to: &Address) -> Vec<u8> {
    address_key(AUTO_RESPONSE_PREFIX, to)
}

pub fn parse_auto_response_key(key: &[u8]) -> Result<(Address, Address), FatalError> {
    parse_address_pair_key(AUTO_RESPONSE_PREFIX, key)
}

pub fn record_key(to: &Address, from: &Address) -> Vec<u8> {
    address_pair_key(RECORD_PREFIX, to, from)
}

/// Prefix covering every record of `to`
pub fn record_prefix(to: &Address) -> Vec<u8> {
    address_key(RECORD_PREFIX, to)
}

pub fn parse_record_key(key: &[u8]) -> Result<(Address, Address), FatalError> {
    parse_address_pair_key(RECORD_PREFIX, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: &[u8]) -> Address {
        Address::new(b.to_vec()).unwrap()
    }

    #[test]
    fn test_prefixes_are_distinct() {
        let prefixes = [OPT_IN_PREFIX, AUTO_RESPONSE_PREFIX, RECORD_PREFIX];
        for (i, a) in prefixes.iter().enumerate() {
            for b in &prefixes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_record_key_under_recipient_prefix() {
        let to = addr(&[1, 2]);
        let key = record_key(&to, &addr(&[3]));
        assert!(key.starts_with(&record_prefix(&to)));
        assert_eq!(parse_record_key(&key).unwrap(), (to, addr(&[3])));
    }

    #[test]
    fn test_record_and_auto_response_keys_differ() {
        let (to, from) = (addr(&[1]), addr(&[2]));
        assert_ne!(record_key(&to, &from), auto_response_key(&to, &from));
    }

    #[test]
    fn test_opt_in_key_roundtrip() {
        let to = addr(&[0xab; 20]);
        assert_eq!(parse_opt_in_key(&opt_in_key(&to)).unwrap(), to);
    }
}
