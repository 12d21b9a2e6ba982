use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelCategory {
    O1,
    Gpt4,
    Gpt35,
    Other,
}

impl ModelCategory {
    /// Heading used when the catalog is shown grouped by category.
    pub fn display_label(&self) -> &'static str {
        match self {
            ModelCategory::O1 => "O1 Series",
            ModelCategory::Gpt4 => "GPT-4 Series",
            ModelCategory::Gpt35 => "GPT-3.5 Series",
            ModelCategory::Other => "Other",
        }
    }
}

/// Static description of a selectable model. Prices are kept as display
/// strings (e.g. `"$0.00250"`), per 1K tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelDescriptor {
    id: String,
    display_label: String,
    category: ModelCategory,
    description: Option<String>,
    price_input_per_k_tokens: Option<String>,
    price_output_per_k_tokens: Option<String>,
}

impl ModelDescriptor {
    pub fn new(
        id: impl Into<String>,
        display_label: impl Into<String>,
        category: ModelCategory,
    ) -> Self {
        Self {
            id: id.into(),
            display_label: display_label.into(),
            category,
            description: None,
            price_input_per_k_tokens: None,
            price_output_per_k_tokens: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_prices(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.price_input_per_k_tokens = Some(input.into());
        self.price_output_per_k_tokens = Some(output.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_label(&self) -> &str {
        &self.display_label
    }

    pub fn category(&self) -> ModelCategory {
        self.category
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price_input_per_k_tokens(&self) -> Option<&str> {
        self.price_input_per_k_tokens.as_deref()
    }

    pub fn price_output_per_k_tokens(&self) -> Option<&str> {
        self.price_output_per_k_tokens.as_deref()
    }

    /// Hover text shown next to the model in a picker: description, then the
    /// per-1K-token prices. Lines without data are omitted.
    pub fn tooltip(&self) -> String {
        let mut lines = Vec::with_capacity(3);
        if let Some(description) = &self.description {
            lines.push(description.clone());
        }
        if let Some(price) = &self.price_input_per_k_tokens {
            lines.push(format!("Input: {price}/1K tokens"));
        }
        if let Some(price) = &self.price_output_per_k_tokens {
            lines.push(format!("Output: {price}/1K tokens"));
        }
        lines.join("\n")
    }
}
