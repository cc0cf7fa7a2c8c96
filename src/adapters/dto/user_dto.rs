use serde::Serialize;

use crate::application::dto::user_dto::UserUpdateDTO;

#[derive(Debug, Serialize)]
pub struct CreateUserRequest<'a> {
    pub uid: &'a str,
}

/// The service expects the uid in the body as well as in the path.
#[derive(Debug, Serialize)]
pub struct UpdateUserRequest<'a> {
    pub uid: &'a str,
    #[serde(flatten)]
    pub updates: UserUpdateDTO,
}
