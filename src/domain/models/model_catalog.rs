use serde::Serialize;

use super::{ModelCategory, ModelDescriptor};

pub const DEFAULT_MODEL_ID: &str = "gpt-4o";

/// Models sharing a category, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelGroup {
    pub category: ModelCategory,
    pub label: &'static str,
    pub models: Vec<ModelDescriptor>,
}

/// Read-only, ordered list of selectable models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    models: Vec<ModelDescriptor>,
    default_id: String,
}

impl ModelCatalog {
    /// Builds a catalog. `default_id` falls back to the first entry when it
    /// is not part of `models`.
    pub fn new(models: Vec<ModelDescriptor>, default_id: impl Into<String>) -> Self {
        let requested: String = default_id.into();
        let default_id = if models.iter().any(|m| m.id() == requested) {
            requested
        } else {
            models
                .first()
                .map(|m| m.id().to_string())
                .unwrap_or(requested)
        };
        Self { models, default_id }
    }

    /// The models offered by the hosted chat-completion service.
    pub fn builtin() -> Self {
        let models = vec![
            ModelDescriptor::new("o1-preview", "O1 Preview", ModelCategory::O1)
                .with_description("Preview of the next-generation O1 model")
                .with_prices("$0.0150", "$0.0600"),
            ModelDescriptor::new("gpt-4o", "GPT-4 Optimized", ModelCategory::Gpt4)
                .with_description("Optimized GPT-4 model")
                .with_prices("$0.00250", "$0.01000"),
            ModelDescriptor::new("gpt-4o-mini", "GPT-4 Optimized Mini", ModelCategory::Gpt4)
                .with_description("Lightweight optimized GPT-4 model")
                .with_prices("$0.000150", "$0.000600"),
            ModelDescriptor::new("gpt-3.5-turbo", "GPT-3.5 Turbo", ModelCategory::Gpt35)
                .with_description("Fast, economical model (16K context)")
                .with_prices("$0.003", "$0.006"),
        ];
        Self::new(models, DEFAULT_MODEL_ID)
    }

    pub fn find(&self, id: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn default_model_id(&self) -> &str {
        &self.default_id
    }

    pub fn default_model(&self) -> Option<&ModelDescriptor> {
        self.find(&self.default_id)
    }

    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Groups models by category in a single pass. Groups appear in the
    /// order their first model appears in the catalog.
    pub fn grouped(&self) -> Vec<ModelGroup> {
        let mut groups: Vec<ModelGroup> = Vec::new();
        for model in &self.models {
            match groups.iter_mut().find(|g| g.category == model.category()) {
                Some(group) => group.models.push(model.clone()),
                None => groups.push(ModelGroup {
                    category: model.category(),
                    label: model.category().display_label(),
                    models: vec![model.clone()],
                }),
            }
        }
        groups
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_default_is_gpt_4o() {
        let catalog = ModelCatalog::builtin();
        assert_eq!(catalog.default_model_id(), "gpt-4o");
        assert_eq!(
            catalog.default_model().map(|m| m.display_label()),
            Some("GPT-4 Optimized")
        );
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.models()[0].id(), "o1-preview");
    }

    #[test]
    fn find_by_id() {
        let catalog = ModelCatalog::builtin();
        assert!(catalog.contains("gpt-3.5-turbo"));
        assert!(!catalog.contains("does-not-exist"));
        assert_eq!(
            catalog.find("o1-preview").map(|m| m.category()),
            Some(ModelCategory::O1)
        );
    }

    #[test]
    fn grouped_keeps_catalog_order() {
        let groups = ModelCatalog::builtin().grouped();
        let categories: Vec<ModelCategory> = groups.iter().map(|g| g.category).collect();
        assert_eq!(
            categories,
            vec![ModelCategory::O1, ModelCategory::Gpt4, ModelCategory::Gpt35]
        );

        let gpt4: Vec<&str> = groups[1].models.iter().map(|m| m.id()).collect();
        assert_eq!(gpt4, vec!["gpt-4o", "gpt-4o-mini"]);
        assert_eq!(groups[1].label, "GPT-4 Series");
    }

    #[test]
    fn unknown_default_falls_back_to_first_model() {
        let catalog = ModelCatalog::new(
            vec![ModelDescriptor::new("local-llm", "Local", ModelCategory::Other)],
            "missing",
        );
        assert_eq!(catalog.default_model_id(), "local-llm");
    }
}
