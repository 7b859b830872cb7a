use actix_web::{web, HttpResponse};

use crate::bootstrap;
use crate::error::AuthError;
use crate::hash;
use crate::resource::{AuthParams, AuthResponse, AuthUser};
use crate::store::Store;

pub async fn signup(
    params: web::Json<AuthParams>,
    store: web::Data<Store>,
) -> Result<HttpResponse, AuthError> {
    params.validate()?;
    let AuthParams { username, password } = params.into_inner();
    let store = store.get_ref().clone();

    let user = web::block(move || -> Result<AuthUser, AuthError> {
        bootstrap::ensure_default_user(&store)?;

        let password_hash = hash::hash_password(&password);
        // uniqueness rides on the insert itself; a lookup first would race
        // a concurrent signup for the same name
        let user = store.insert_user(&username, &password_hash)?;
        Ok(user.into())
    })
    .await??;

    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        user,
    }))
}
