use anyhow::Result;

use crate::ModelGroup;

use super::super::Container;

pub struct ModelsController<'a> {
    container: &'a Container,
}

impl<'a> ModelsController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn list(&self) -> Result<String> {
        let use_case = self.container.list_models_use_case();
        let groups = use_case.execute();
        let selected = self.container.session().selected_model().await;
        Ok(format!(
            "{}\n\nDefault model: {}",
            format_model_groups(&groups, &selected),
            use_case.default_model_id()
        ))
    }
}

/// One block per series; the selected model is marked with `*` and every
/// entry is followed by its tooltip, indented.
pub fn format_model_groups(groups: &[ModelGroup], selected: &str) -> String {
    let mut output = String::new();

    for group in groups {
        output.push_str(&format!("{}\n", group.label));
        for model in &group.models {
            let marker = if model.id() == selected { "*" } else { " " };
            output.push_str(&format!(
                "  {} {:<16} {}\n",
                marker,
                model.id(),
                model.display_label()
            ));
            for line in model.tooltip().lines() {
                output.push_str(&format!("      {}\n", line));
            }
        }
        output.push('\n');
    }

    output.trim_end().to_string()
}
