use actix_web::{web, HttpResponse};

use crate::bootstrap;
use crate::error::AuthError;
use crate::hash;
use crate::resource::{AuthParams, AuthResponse, AuthUser};
use crate::store::Store;

/// Burned through the verifier when the username is unknown, so the 401
/// takes as long as a real key mismatch and response timing cannot be used
/// to enumerate accounts.
const DUMMY_HASH: &str = "00000000000000000000000000000000:\
     0000000000000000000000000000000000000000000000000000000000000000\
     0000000000000000000000000000000000000000000000000000000000000000";

pub async fn login(
    params: web::Json<AuthParams>,
    store: web::Data<Store>,
) -> Result<HttpResponse, AuthError> {
    params.validate()?;
    let AuthParams { username, password } = params.into_inner();
    let store = store.get_ref().clone();

    // key derivation and the store round-trip both belong off the executor
    let user = web::block(move || -> Result<AuthUser, AuthError> {
        bootstrap::ensure_default_user(&store)?;

        match store.find_by_username(&username)? {
            Some(user) if hash::verify_password(&password, &user.password_hash) => Ok(user.into()),
            Some(_) => Err(AuthError::InvalidCredentials),
            None => {
                let _ = hash::verify_password(&password, DUMMY_HASH);
                Err(AuthError::InvalidCredentials)
            }
        }
    })
    .await??;

    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        user,
    }))
}
