//! Store key encoding
//!
//! Layout: `<prefix byte><len-prefixed address>[<len-prefixed address> | <u64 BE>]`.
//! Length prefixes are a single byte, so an address key sorts by length
//! first and then by bytes. Decoders return `FatalError` since a key that
//! does not parse can only come from corrupted state.

use crate::address::{Address, MAX_ADDRESS_LEN};
use crate::error::FatalError;

/// `len || bytes`
pub fn length_prefixed(addr: &Address) -> Vec<u8> {
    let bytes = addr.as_bytes();
    debug_assert!(bytes.len() <= MAX_ADDRESS_LEN);
    let mut out = Vec::with_capacity(bytes.len() + 1);
    out.push(bytes.len() as u8);
    out.extend_from_slice(bytes);
    out
}

/// `prefix || len || addr`
pub fn address_key(prefix: u8, addr: &Address) -> Vec<u8> {
    let mut key = vec![prefix];
    key.extend(length_prefixed(addr));
    key
}

/// `prefix || len || first || len || second`
pub fn address_pair_key(prefix: u8, first: &Address, second: &Address) -> Vec<u8> {
    let mut key = address_key(prefix, first);
    key.extend(length_prefixed(second));
    key
}

/// `prefix || len || addr || id(BE)`
pub fn address_id_key(prefix: u8, addr: &Address, id: u64) -> Vec<u8> {
    let mut key = address_key(prefix, addr);
    key.extend_from_slice(&id.to_be_bytes());
    key
}

/// `prefix || id(BE)`
pub fn id_key(prefix: u8, id: u64) -> Vec<u8> {
    let mut key = vec![prefix];
    key.extend_from_slice(&id.to_be_bytes());
    key
}

/// `prefix || id(BE) || len || addr`
pub fn id_address_key(prefix: u8, id: u64, addr: &Address) -> Vec<u8> {
    let mut key = id_key(prefix, id);
    key.extend(length_prefixed(addr));
    key
}

/// Read one length-prefixed address; returns it and the remaining bytes.
pub fn read_address(bytes: &[u8]) -> Result<(Address, &[u8]), FatalError> {
    let (&len, rest) = bytes
        .split_first()
        .ok_or_else(|| FatalError::corrupt(bytes, "missing address length"))?;
    let len = len as usize;
    if rest.len() < len {
        return Err(FatalError::corrupt(bytes, "address shorter than its length prefix"));
    }
    let (addr, rest) = rest.split_at(len);
    let addr = Address::new(addr.to_vec()).map_err(|e| FatalError::corrupt(bytes, e.to_string()))?;
    Ok((addr, rest))
}

/// Read a big-endian u64; returns it and the remaining bytes.
pub fn read_u64(bytes: &[u8]) -> Result<(u64, &[u8]), FatalError> {
    if bytes.len() < 8 {
        return Err(FatalError::corrupt(bytes, "expected 8-byte id"));
    }
    let (id, rest) = bytes.split_at(8);
    let mut buf = [0u8; 8];
    buf.copy_from_slice(id);
    Ok((u64::from_be_bytes(buf), rest))
}

/// Strip the expected prefix byte.
pub fn strip_prefix(prefix: u8, key: &[u8]) -> Result<&[u8], FatalError> {
    match key.split_first() {
        Some((&p, rest)) if p == prefix => Ok(rest),
        _ => Err(FatalError::corrupt(key, format!("expected key prefix {prefix:#04x}"))),
    }
}

/// Decode `prefix || addr`
pub fn parse_address_key(prefix: u8, key: &[u8]) -> Result<Address, FatalError> {
    let (addr, rest) = read_address(strip_prefix(prefix, key)?)?;
    expect_end(key, rest)?;
    Ok(addr)
}

/// Decode `prefix || first || second`
pub fn parse_address_pair_key(prefix: u8, key: &[u8]) -> Result<(Address, Address), FatalError> {
    let (first, rest) = read_address(strip_prefix(prefix, key)?)?;
    let (second, rest) = read_address(rest)?;
    expect_end(key, rest)?;
    Ok((first, second))
}

/// Decode `prefix || addr || id`
pub fn parse_address_id_key(prefix: u8, key: &[u8]) -> Result<(Address, u64), FatalError> {
    let (addr, rest) = read_address(strip_prefix(prefix, key)?)?;
    let (id, rest) = read_u64(rest)?;
    expect_end(key, rest)?;
    Ok((addr, id))
}

/// Decode `prefix || id || addr`
pub fn parse_id_address_key(prefix: u8, key: &[u8]) -> Result<(u64, Address), FatalError> {
    let (id, rest) = read_u64(strip_prefix(prefix, key)?)?;
    let (addr, rest) = read_address(rest)?;
    expect_end(key, rest)?;
    Ok((id, addr))
}

fn expect_end(key: &[u8], rest: &[u8]) -> Result<(), FatalError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(FatalError::corrupt(key, "unexpected trailing bytes"))
    }
}
