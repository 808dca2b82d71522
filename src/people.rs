//! Demo resource client for the `/people` endpoint.

use crate::{ApiResponse, ApiService, ApiTransport, CallLogger, RequestOptions, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Base endpoint of the people resource.
pub const PEOPLE_ENDPOINT: &str = "/people";

fn default_active() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A person as exchanged with the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonModel {
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default = "default_active", skip_serializing_if = "is_false")]
    pub is_active: bool,
}

impl PersonModel {
    /// A new active person with the given names and no id yet.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            ..Self::default()
        }
    }
}

impl Default for PersonModel {
    fn default() -> Self {
        Self {
            id: 0,
            first_name: None,
            last_name: None,
            is_active: true,
        }
    }
}

/// Body returned when a person is created or updated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePersonResponse {
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Client for the people resource.
pub struct PersonService<T> {
    api: ApiService<T>,
}

impl<T> Clone for PersonService<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
        }
    }
}

impl<T: ApiTransport> PersonService<T> {
    /// Creates an unauthenticated client.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiService`] configuration errors.
    pub fn new(transport: T, logger: Option<Arc<dyn CallLogger>>) -> Result<Self> {
        Ok(Self {
            api: ApiService::new(PEOPLE_ENDPOINT, transport, logger)?,
        })
    }

    /// Creates a client authenticating with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_key` is empty.
    pub fn with_api_key(
        api_key: impl Into<String>,
        transport: T,
        logger: Option<Arc<dyn CallLogger>>,
    ) -> Result<Self> {
        Ok(Self {
            api: ApiService::with_api_key(PEOPLE_ENDPOINT, api_key, transport, logger)?,
        })
    }

    /// The underlying generic client.
    pub fn api(&self) -> &ApiService<T> {
        &self.api
    }

    /// `GET /people/{id}`
    pub async fn get_person_by_id(&self, id: &str) -> ApiResponse<PersonModel> {
        self.api.get(RequestOptions::path(id)).await
    }

    /// `POST /people`
    pub async fn add_person(&self, person: &PersonModel) -> ApiResponse<UpdatePersonResponse> {
        self.api.post(Some(person), RequestOptions::default()).await
    }

    /// `PUT /people/{id}`
    pub async fn update_person(
        &self,
        id: &str,
        person: &PersonModel,
    ) -> ApiResponse<UpdatePersonResponse> {
        self.api
            .put(Some(person), RequestOptions::path(format!("/{}", id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_serialization_omits_defaults() {
        let person = PersonModel::new("Enrico", "Rossini");
        let json = serde_json::to_value(&person).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 0,
                "firstName": "Enrico",
                "lastName": "Rossini",
                "isActive": true
            })
        );

        let inactive = PersonModel {
            is_active: false,
            first_name: None,
            ..person
        };
        let json = serde_json::to_value(&inactive).unwrap();
        assert_eq!(json, serde_json::json!({"id": 0, "lastName": "Rossini"}));
    }

    #[test]
    fn test_person_deserialization_defaults_to_active() {
        let person: PersonModel = serde_json::from_str(r#"{"id": 5}"#).unwrap();
        assert_eq!(person.id, 5);
        assert!(person.is_active);
        assert!(person.first_name.is_none());
    }

    #[test]
    fn test_update_response_error_message_name() {
        let response: UpdatePersonResponse =
            serde_json::from_str(r#"{"id": 1, "errorMessage": "duplicate"}"#).unwrap();
        assert_eq!(response.error_message.as_deref(), Some("duplicate"));
    }
}
