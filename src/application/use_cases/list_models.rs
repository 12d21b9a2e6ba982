use std::sync::Arc;

use crate::domain::{ModelCatalog, ModelGroup};

pub struct ListModelsUseCase {
    catalog: Arc<ModelCatalog>,
}

impl ListModelsUseCase {
    pub fn new(catalog: Arc<ModelCatalog>) -> Self {
        Self { catalog }
    }

    pub fn execute(&self) -> Vec<ModelGroup> {
        self.catalog.grouped()
    }

    pub fn default_model_id(&self) -> &str {
        self.catalog.default_model_id()
    }
}
