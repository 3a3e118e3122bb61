use serde::{Deserialize, Serialize};

// -- JWT Claims --

/// JWT claims issued on sign-in and checked by the identity middleware.
/// `sub` is the numeric user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub iat: usize,
    pub exp: usize,
}

// -- Validation --

/// Shape checks applied to a request body after it deserializes and before
/// it reaches a service. A body that fails is answered with 400.
pub trait Validate {
    fn is_valid(&self) -> bool;
}

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub username: String,
    pub password: String,
}

impl Validate for SignUpRequest {
    fn is_valid(&self) -> bool {
        !self.name.is_empty() && !self.username.is_empty() && !self.password.is_empty()
    }
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

impl Validate for SignInRequest {
    fn is_valid(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

// -- Lists --

#[derive(Debug, Deserialize)]
pub struct CreateListRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl Validate for CreateListRequest {
    fn is_valid(&self) -> bool {
        !self.title.is_empty()
    }
}

/// Partial update of a list. An absent field is left unchanged; an empty
/// string is written as given.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateListRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Validate for UpdateListRequest {
    fn is_valid(&self) -> bool {
        true
    }
}

// -- Items --

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub done: bool,
}

impl Validate for CreateItemRequest {
    fn is_valid(&self) -> bool {
        !self.title.is_empty()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub done: Option<bool>,
}

impl Validate for UpdateItemRequest {
    fn is_valid(&self) -> bool {
        true
    }
}

// -- Envelopes --

#[derive(Debug, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Body of every failure response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_up_requires_every_field() {
        let missing_name = serde_json::from_str::<SignUpRequest>(
            r#"{"username": "test", "password": "qwerty"}"#,
        );
        assert!(missing_name.is_err());

        let empty_name: SignUpRequest =
            serde_json::from_str(r#"{"name": "", "username": "test", "password": "qwerty"}"#)
                .unwrap();
        assert!(!empty_name.is_valid());
    }

    #[test]
    fn update_distinguishes_absent_from_empty() {
        let req: UpdateItemRequest = serde_json::from_str(r#"{"description": ""}"#).unwrap();
        assert_eq!(req.title, None);
        assert_eq!(req.description.as_deref(), Some(""));
        assert_eq!(req.done, None);
        assert!(req.is_valid());

        let blank: UpdateListRequest =
            serde_json::from_str(r#"{"title": "", "description": ""}"#).unwrap();
        assert_eq!(blank.title.as_deref(), Some(""));
        assert!(blank.is_valid());

        assert!(UpdateListRequest::default().is_valid());
    }

    #[test]
    fn extra_keys_are_ignored() {
        let req: UpdateListRequest =
            serde_json::from_str(r#"{"id": 1, "title": "groceries", "description": ""}"#).unwrap();
        assert_eq!(req.title.as_deref(), Some("groceries"));

        let req: SignUpRequest = serde_json::from_str(
            r#"{"name": "T", "username": "t", "password": "q", "email": "x"}"#,
        )
        .unwrap();
        assert!(req.is_valid());
    }

    #[test]
    fn create_item_defaults() {
        let req: CreateItemRequest = serde_json::from_str(r#"{"title": "milk"}"#).unwrap();
        assert_eq!(req.description, "");
        assert!(!req.done);
    }
}
