use crate::{
    auth::{
        generate_token, hash_password, verify_password, AuthResponse, LoginRequest, RegisterRequest,
    },
    error::AppError,
    models::{NewUser, UserRole},
    store::UserStore,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates a new user account and returns an authentication token. Every
/// account registers with the `user` role; admins are provisioned directly
/// in the store.
#[post("/register")]
pub async fn register(
    store: web::Data<dyn UserStore>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    // Check if email already exists
    let existing_user = store.find_user_by_email(&register_data.email).await?;
    if existing_user.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash = hash_password(&register_data.password)?;
    let register_data = register_data.into_inner();

    let user = store
        .insert_user(NewUser {
            username: register_data.username,
            email: register_data.email,
            password_hash,
            role: UserRole::User,
        })
        .await?;

    let token = generate_token(user.id, user.role)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        token,
        user_id: user.id,
    }))
}

/// Login user
///
/// Authenticates a user and returns an authentication token. An unknown
/// email and a wrong password fail identically, so a caller cannot probe
/// which accounts exist.
#[post("/login")]
pub async fn login(
    store: web::Data<dyn UserStore>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = store.find_user_by_email(&login_data.email).await?;

    match user {
        Some(user) => {
            if verify_password(&login_data.password, &user.password_hash)? {
                let token = generate_token(user.id, user.role)?;
                Ok(HttpResponse::Ok().json(AuthResponse {
                    token,
                    user_id: user.id,
                }))
            } else {
                Err(AppError::Unauthorized("Invalid credentials".into()))
            }
        }
        None => Err(AppError::Unauthorized("Invalid credentials".into())),
    }
}
