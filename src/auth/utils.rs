use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::user::UserRole,
};

pub fn require_admin(claims: &Claims) -> AppResult<()> {
    if claims.role != UserRole::Admin {
        return Err(AppError::Unauthorized(
            "Only admins can perform this action".to_string(),
        ));
    }
    Ok(())
}

pub fn require_player(claims: &Claims) -> AppResult<()> {
    if claims.role != UserRole::Player {
        return Err(AppError::Unauthorized(
            "Access denied: players only".to_string(),
        ));
    }
    Ok(())
}
