use super::error::ModelServiceError;
use crate::domain::user::UserId;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// A chat model admins can switch translation to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationModel {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const AVAILABLE_MODELS: [TranslationModel; 2] = [
    TranslationModel {
        id: "gpt-4o-mini",
        name: "GPT-4o Mini",
        description: "Fastest, most cost-effective",
    },
    TranslationModel {
        id: "gpt-4o",
        name: "GPT-4o",
        description: "Most capable, slower",
    },
];

pub fn find_model(id: &str) -> Option<&'static TranslationModel> {
    AVAILABLE_MODELS.iter().find(|model| model.id == id)
}

/// The model translations are currently produced with.
///
/// Starts from the configured model and lives for the process. Every request
/// reads it once, so the model in a cache key is the model that produced the
/// cached text.
pub struct ModelSelector {
    current: RwLock<String>,
}

impl ModelSelector {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            current: RwLock::new(initial.into()),
        }
    }

    pub fn current(&self) -> String {
        self.current.read().clone()
    }

    /// Switch to one of `AVAILABLE_MODELS`; returns the previous model
    pub fn select(&self, id: &str) -> Result<String, ModelServiceError> {
        let model =
            find_model(id).ok_or_else(|| ModelServiceError::UnknownModel(id.to_string()))?;
        let mut current = self.current.write();
        Ok(std::mem::replace(&mut *current, model.id.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<&TranslationModel> for ModelInfo {
    fn from(model: &TranslationModel) -> Self {
        Self {
            id: model.id.to_string(),
            name: model.name.to_string(),
            description: model.description.to_string(),
        }
    }
}

/// Response for GET and PUT /api/admin/model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSelection {
    pub current: String,
    pub available: Vec<ModelInfo>,
}

/// Request for PUT /api/admin/model
#[derive(Debug, Serialize, Deserialize)]
pub struct SetModelRequest {
    pub model: String,
}

pub struct ModelService {
    selector: Arc<ModelSelector>,
    admin_ids: HashSet<UserId>,
}

impl ModelService {
    pub fn new(selector: Arc<ModelSelector>, admin_ids: HashSet<UserId>) -> Self {
        Self {
            selector,
            admin_ids,
        }
    }

    fn selection(&self) -> ModelSelection {
        ModelSelection {
            current: self.selector.current(),
            available: AVAILABLE_MODELS.iter().map(ModelInfo::from).collect(),
        }
    }

    fn guard_admin(&self, requester: UserId, action: &str) -> Result<(), ModelServiceError> {
        if self.admin_ids.contains(&requester) {
            return Ok(());
        }
        tracing::warn!(
            target: "audit",
            user_id = requester,
            action,
            "Non-admin attempted admin action"
        );
        Err(ModelServiceError::Forbidden(format!(
            "admin privileges required to {}",
            action
        )))
    }
}

#[async_trait]
pub trait ModelServiceApi: Send + Sync {
    /// Admin only: current translation model and the ones to pick from
    async fn get_model(&self, requester: UserId) -> Result<ModelSelection, ModelServiceError>;

    /// Admin only: switch translation to `model` for every later request
    async fn set_model(
        &self,
        requester: UserId,
        model: &str,
    ) -> Result<ModelSelection, ModelServiceError>;
}

#[async_trait]
impl ModelServiceApi for ModelService {
    async fn get_model(&self, requester: UserId) -> Result<ModelSelection, ModelServiceError> {
        self.guard_admin(requester, "view the translation model")?;
        Ok(self.selection())
    }

    async fn set_model(
        &self,
        requester: UserId,
        model: &str,
    ) -> Result<ModelSelection, ModelServiceError> {
        self.guard_admin(requester, "change the translation model")?;

        let previous = self.selector.select(model)?;
        tracing::warn!(
            target: "audit",
            admin_id = requester,
            previous = %previous,
            model,
            "Translation model changed"
        );
        Ok(self.selection())
    }
}
