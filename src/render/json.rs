//! JSON documentation: a top-level array with one entry per feature

use serde::Serialize;

use super::{Documentation, DocumentationFormat, RenderError, Renderer};
use crate::model::{AnnotatedScenario, Background, Examples, Outcome, Step, Tag};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn format(&self) -> DocumentationFormat {
        DocumentationFormat::Json
    }

    fn file_name(&self) -> &'static str {
        "features.json"
    }

    fn render(&self, doc: &Documentation) -> Result<String, RenderError> {
        let entries: Vec<FeatureEntry<'_>> = doc
            .features
            .iter()
            .map(|documented| {
                let feature = &documented.feature;
                let result = ResultJson::new(feature.result.outcome);
                FeatureEntry {
                    relative_folder: &documented.relative_path,
                    feature: FeatureJson {
                        name: &feature.name,
                        description: &feature.description,
                        tags: &feature.tags,
                        background: feature.background.as_ref(),
                        feature_elements: feature.scenarios.iter().map(ScenarioJson::new).collect(),
                        result,
                    },
                    result,
                }
            })
            .collect();
        Ok(serde_json::to_string_pretty(&entries)?)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct FeatureEntry<'a> {
    relative_folder: &'a str,
    feature: FeatureJson<'a>,
    result: ResultJson,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct FeatureJson<'a> {
    name: &'a str,
    description: &'a str,
    tags: &'a [Tag],
    #[serde(skip_serializing_if = "Option::is_none")]
    background: Option<&'a Background>,
    feature_elements: Vec<ScenarioJson<'a>>,
    result: ResultJson,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ScenarioJson<'a> {
    name: &'a str,
    description: &'a str,
    tags: &'a [Tag],
    steps: &'a [Step],
    #[serde(skip_serializing_if = "is_empty")]
    examples: &'a [Examples],
    result: ResultJson,
}

impl<'a> ScenarioJson<'a> {
    fn new(annotated: &'a AnnotatedScenario) -> Self {
        let scenario = &annotated.scenario;
        Self {
            name: &scenario.name,
            description: &scenario.description,
            tags: &scenario.tags,
            steps: &scenario.steps,
            examples: &scenario.examples,
            result: ResultJson::new(annotated.outcome),
        }
    }
}

fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}

#[derive(Serialize, Clone, Copy)]
#[serde(rename_all = "PascalCase")]
struct ResultJson {
    was_executed: bool,
    was_successful: bool,
    outcome: Outcome,
}

impl ResultJson {
    fn new(outcome: Outcome) -> Self {
        Self {
            was_executed: outcome.is_executed(),
            was_successful: outcome.is_successful(),
            outcome,
        }
    }
}
