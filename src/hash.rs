use lazy_static::lazy_static;
use ring::constant_time;
use ring::rand::{SecureRandom, SystemRandom};
use scrypt::Params;

/// Salt length in bytes before hex encoding.
const SALT_LEN: usize = 16;
/// Derived key length in bytes before hex encoding.
const KEY_LEN: usize = 64;
/// scrypt cost parameter as log2(N); 2^14 = 16384.
const LOG_N: u8 = 14;
/// scrypt block size.
const BLOCK_SIZE: u32 = 8;
/// scrypt parallelism.
const PARALLELISM: u32 = 1;

/// Separates the hex-encoded salt from the hex-encoded key in the stored
/// value. Cannot appear inside either component.
const DELIMITER: char = ':';

lazy_static! {
    static ref RNG: SystemRandom = SystemRandom::new();
}

fn params() -> Params {
    // the parameters are compile-time constants, so a failure here is a
    // programming error, not an input error
    Params::new(LOG_N, BLOCK_SIZE, PARALLELISM, KEY_LEN).expect("invalid scrypt parameters")
}

fn derive_key(password: &str, salt: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0; KEY_LEN];
    scrypt::scrypt(password.as_bytes(), salt, &params(), &mut key)
        .expect("scrypt derivation failed");
    key
}

/// Generate a random salt and derive a key from the password, returning
/// `<hex-salt>:<hex-key>` for storage.
///
/// Non-deterministic: every call draws a fresh salt, so hashing the same
/// password twice yields different encodings.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0; SALT_LEN];
    RNG.fill(&mut salt).expect("system RNG failure");

    let key = derive_key(password, &salt);
    format!("{}{}{}", hex::encode(salt), DELIMITER, hex::encode(key))
}

/// Check a submitted password against a stored `<hex-salt>:<hex-key>` value.
///
/// Fails closed: a malformed stored value returns false rather than
/// panicking. The comparison is constant-time over the full key length.
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let (salt_hex, key_hex) = match encoded.split_once(DELIMITER) {
        Some(parts) => parts,
        None => return false,
    };
    if salt_hex.is_empty() || key_hex.is_empty() {
        return false;
    }

    let salt = match hex::decode(salt_hex) {
        Ok(s) => s,
        Err(_) => return false,
    };
    let expected = match hex::decode(key_hex) {
        Ok(k) => k,
        Err(_) => return false,
    };

    let derived = derive_key(password, &salt);
    constant_time::verify_slices_are_equal(&derived, &expected).is_ok()
}
