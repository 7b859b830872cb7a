use log::warn;

use crate::hash;
use crate::store::{Store, StoreError};

/// Username of the account created when the store is empty.
pub const DEFAULT_USERNAME: &str = "admin";

/// Well-known password of the bootstrap account. Fine for a demo, a
/// liability anywhere else; see the warning logged on creation.
pub const DEFAULT_PASSWORD: &str = "123";

/// Guarantee the store always holds at least one operable login.
///
/// No-op unless the store is empty. The default account goes through the
/// same hashing path as a normal signup. Losing an insert race against a
/// concurrent bootstrap counts as success, the account exists either way.
pub fn ensure_default_user(store: &Store) -> Result<(), StoreError> {
    if store.count_users()? > 0 {
        return Ok(());
    }

    let password_hash = hash::hash_password(DEFAULT_PASSWORD);
    match store.insert_user(DEFAULT_USERNAME, &password_hash) {
        Ok(_) => {
            warn!(
                "credential store was empty; created default account '{}' with a well-known \
                 password - change it before exposing this service to anyone",
                DEFAULT_USERNAME
            );
            Ok(())
        }
        Err(StoreError::DuplicateUsername) => Ok(()),
        Err(err) => Err(err),
    }
}
