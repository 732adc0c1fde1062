//! Markdown documentation, one section per feature

use std::fmt::Write;

use super::{Documentation, DocumentationFormat, RenderError, Renderer};
use crate::model::{Outcome, Step, Table};

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn format(&self) -> DocumentationFormat {
        DocumentationFormat::Markdown
    }

    fn file_name(&self) -> &'static str {
        "features.md"
    }

    fn render(&self, doc: &Documentation) -> Result<String, RenderError> {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = write_document(&mut out, doc);
        Ok(out)
    }
}

fn badge(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Passed => "`passed`",
        Outcome::Failed => "`FAILED`",
        Outcome::Pending => "`pending`",
        Outcome::NotRun => "`not run`",
    }
}

fn write_document(out: &mut String, doc: &Documentation) -> std::fmt::Result {
    let title = doc.project_name.as_deref().unwrap_or("Features");
    match &doc.project_version {
        Some(version) => writeln!(out, "# {} {}", title, version)?,
        None => writeln!(out, "# {}", title)?,
    }
    writeln!(out)?;

    if !doc.verified {
        writeln!(
            out,
            "> **Unverified:** test results could not be read. Outcomes below may be incomplete."
        )?;
        for warning in &doc.warnings {
            writeln!(out, "> - {}", warning)?;
        }
        writeln!(out)?;
    }

    for documented in &doc.features {
        let feature = &documented.feature;
        writeln!(out, "## {} {}", feature.name, badge(feature.result.outcome))?;
        writeln!(out)?;
        writeln!(out, "_{}_", documented.relative_path)?;
        writeln!(out)?;
        write_tags(out, feature.tags.iter().map(|t| t.as_str()))?;
        write_description(out, &feature.description)?;

        if let Some(background) = &feature.background {
            writeln!(out, "### Background: {}", background.name)?;
            writeln!(out)?;
            write_steps(out, &background.steps)?;
        }

        for annotated in &feature.scenarios {
            let scenario = &annotated.scenario;
            writeln!(out, "### {} {}", scenario.name, badge(annotated.outcome))?;
            writeln!(out)?;
            write_tags(out, scenario.tags.iter().map(|t| t.as_str()))?;
            write_description(out, &scenario.description)?;
            write_steps(out, &scenario.steps)?;

            for examples in &scenario.examples {
                if examples.name.is_empty() {
                    writeln!(out, "#### Examples")?;
                } else {
                    writeln!(out, "#### Examples: {}", examples.name)?;
                }
                writeln!(out)?;
                write_table(out, &examples.table_argument, "")?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

fn write_tags<'a>(out: &mut String, tags: impl Iterator<Item = &'a str>) -> std::fmt::Result {
    let tags: Vec<String> = tags.map(|t| format!("`{}`", t)).collect();
    if !tags.is_empty() {
        writeln!(out, "{}", tags.join(" "))?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_description(out: &mut String, description: &str) -> std::fmt::Result {
    if !description.is_empty() {
        writeln!(out, "{}", description)?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_steps(out: &mut String, steps: &[Step]) -> std::fmt::Result {
    for step in steps {
        writeln!(out, "- **{}** {}", step.native_keyword, step.name)?;
        if let Some(table) = &step.table_argument {
            writeln!(out)?;
            write_table(out, table, "  ")?;
            writeln!(out)?;
        }
        if let Some(doc) = &step.doc_string_argument {
            writeln!(out)?;
            writeln!(out, "  ```{}", doc.content_type.as_deref().unwrap_or_default())?;
            for line in doc.content.lines() {
                writeln!(out, "  {}", line)?;
            }
            writeln!(out, "  ```")?;
            writeln!(out)?;
        }
    }
    writeln!(out)
}

fn write_table(out: &mut String, table: &Table, indent: &str) -> std::fmt::Result {
    let row = |cells: &[String]| {
        let cells: Vec<String> = cells.iter().map(|c| c.replace('|', "\\|")).collect();
        format!("{}| {} |", indent, cells.join(" | "))
    };
    writeln!(out, "{}", row(&table.header_row))?;
    writeln!(
        out,
        "{}|{}",
        indent,
        vec!["---|"; table.width()].concat()
    )?;
    for data in &table.data_rows {
        writeln!(out, "{}", row(data))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlate::Correlator;
    use crate::gherkin::parse_feature;
    use crate::render::DocumentedFeature;

    fn documentation(verified: bool) -> Documentation {
        let feature = parse_feature(
            "Feature: Calculator\n  Scenario Outline: Add\n    Given <a>\n    Examples:\n      | a |\n      | 1 |\n",
        )
        .unwrap();
        Documentation {
            project_name: Some("Bank".to_string()),
            project_version: Some("1.2".to_string()),
            features: vec![DocumentedFeature {
                relative_path: "calc.feature".to_string(),
                feature: Correlator::new(&[]).correlate(feature),
            }],
            verified,
            warnings: vec!["results.trx: empty report".to_string()],
        }
    }

    #[test]
    fn test_render_sections() {
        let out = MarkdownRenderer.render(&documentation(true)).unwrap();
        assert!(out.starts_with("# Bank 1.2\n"));
        assert!(out.contains("## Calculator `not run`"));
        assert!(out.contains("### Add `not run`"));
        assert!(out.contains("- **Given** <a>"));
        assert!(out.contains("| a |\n|---|\n| 1 |"));
        assert!(!out.contains("Unverified"));
    }

    #[test]
    fn test_unverified_banner() {
        let out = MarkdownRenderer.render(&documentation(false)).unwrap();
        assert!(out.contains("> **Unverified:**"));
        assert!(out.contains("> - results.trx: empty report"));
    }
}
