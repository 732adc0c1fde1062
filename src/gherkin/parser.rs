//! Line-oriented Gherkin parser

use crate::model::{
    Background, DocString, Examples, Feature, Scenario, ScenarioKind, Step, StepKeyword, Table,
    Tag,
};

use super::error::{FeatureParseError, ParseErrorKind};

const STEP_KEYWORDS: &[(&str, StepKeyword)] = &[
    ("Given", StepKeyword::Given),
    ("When", StepKeyword::When),
    ("Then", StepKeyword::Then),
    ("And", StepKeyword::And),
    ("But", StepKeyword::But),
    ("*", StepKeyword::Star),
];

/// Parse one feature file's source text
pub fn parse_feature(source: &str) -> Result<Feature, FeatureParseError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut parser = Parser::default();

    for (idx, raw) in source.lines().enumerate() {
        parser.line(idx + 1, raw)?;
    }
    parser.finish(source.lines().count().max(1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Section {
    #[default]
    Preamble,
    Feature,
    Rule,
    Background,
    Scenario,
    Examples,
}

#[derive(Debug)]
struct OpenDocString {
    delimiter: &'static str,
    indent: usize,
    content_type: Option<String>,
    lines: Vec<String>,
    start_line: usize,
}

#[derive(Debug, Default)]
struct Parser {
    section: Section,
    feature: Option<Feature>,
    background: Option<Background>,
    rule: Option<String>,
    rule_tags: Vec<Tag>,
    scenario: Option<Scenario>,
    examples: Option<Examples>,
    pending_tags: Vec<Tag>,
    pending_tags_line: usize,
    doc: Option<OpenDocString>,
}

impl Parser {
    fn line(&mut self, n: usize, raw: &str) -> Result<(), FeatureParseError> {
        if self.doc.is_some() {
            self.doc_line(raw);
            return Ok(());
        }

        let line = raw.trim();
        if line.is_empty() {
            return Ok(());
        }
        if let Some(comment) = line.strip_prefix('#') {
            return self.comment(n, comment);
        }
        if line.starts_with('@') {
            return self.tags(n, line);
        }
        if line.starts_with('|') {
            return self.table_row(n, line);
        }
        if let Some(delimiter) = ["\"\"\"", "```"].into_iter().find(|d| line.starts_with(d)) {
            return self.open_doc(n, raw, line, delimiter);
        }

        if let Some(name) = line.strip_prefix("Feature:") {
            return self.feature(n, name);
        }
        if self.feature.is_none() {
            return Err(FeatureParseError::new(n, ParseErrorKind::MissingFeature));
        }

        if let Some(name) = line.strip_prefix("Background:") {
            return self.background(n, name);
        }
        if let Some(name) = line.strip_prefix("Rule:") {
            self.rule(name);
            return Ok(());
        }
        for (prefix, kind) in [
            ("Scenario Outline:", ScenarioKind::ScenarioOutline),
            ("Scenario Template:", ScenarioKind::ScenarioOutline),
            ("Scenario:", ScenarioKind::Scenario),
            ("Example:", ScenarioKind::Scenario),
        ] {
            if let Some(name) = line.strip_prefix(prefix) {
                self.scenario(n, kind, name);
                return Ok(());
            }
        }
        for prefix in ["Examples:", "Scenarios:"] {
            if let Some(name) = line.strip_prefix(prefix) {
                return self.examples(n, name);
            }
        }
        if let Some((keyword, text)) = split_step(line) {
            return self.step(n, keyword, text);
        }

        self.description(n, line)
    }

    fn comment(&mut self, n: usize, comment: &str) -> Result<(), FeatureParseError> {
        if self.feature.is_some() {
            return Ok(());
        }
        let comment = comment.trim();
        if let Some(lang) = comment.strip_prefix("language:") {
            let lang = lang.trim();
            if !lang.eq_ignore_ascii_case("en") {
                return Err(FeatureParseError::new(
                    n,
                    ParseErrorKind::UnsupportedLanguage(lang.to_string()),
                ));
            }
        }
        Ok(())
    }

    fn tags(&mut self, n: usize, line: &str) -> Result<(), FeatureParseError> {
        for token in line.split_whitespace() {
            if token.starts_with('#') {
                break;
            }
            if !token.starts_with('@') || token.len() < 2 {
                return Err(FeatureParseError::new(
                    n,
                    ParseErrorKind::InvalidTag(token.to_string()),
                ));
            }
            self.pending_tags.push(Tag::new(token));
        }
        if self.pending_tags_line == 0 {
            self.pending_tags_line = n;
        }
        Ok(())
    }

    fn take_tags(&mut self) -> Vec<Tag> {
        self.pending_tags_line = 0;
        std::mem::take(&mut self.pending_tags)
    }

    fn reject_pending_tags(&self) -> Result<(), FeatureParseError> {
        if self.pending_tags.is_empty() {
            Ok(())
        } else {
            Err(FeatureParseError::new(
                self.pending_tags_line,
                ParseErrorKind::MisplacedTags,
            ))
        }
    }

    fn feature(&mut self, n: usize, name: &str) -> Result<(), FeatureParseError> {
        if self.feature.is_some() {
            return Err(FeatureParseError::new(n, ParseErrorKind::DuplicateFeature));
        }
        let mut feature = Feature::new(name.trim());
        feature.tags = self.take_tags();
        feature.line = n;
        self.feature = Some(feature);
        self.section = Section::Feature;
        Ok(())
    }

    fn background(&mut self, n: usize, name: &str) -> Result<(), FeatureParseError> {
        self.reject_pending_tags()?;
        self.flush_scenario();
        let has_background = self
            .feature
            .as_ref()
            .map_or(false, |f| f.background.is_some());
        if has_background || self.background.is_some() {
            return Err(FeatureParseError::new(n, ParseErrorKind::DuplicateBackground));
        }
        self.background = Some(Background {
            name: name.trim().to_string(),
            description: String::new(),
            steps: Vec::new(),
        });
        self.section = Section::Background;
        Ok(())
    }

    fn rule(&mut self, name: &str) {
        self.flush_scenario();
        self.flush_background();
        self.rule = Some(name.trim().to_string());
        self.rule_tags = self.take_tags();
        self.section = Section::Rule;
    }

    fn scenario(&mut self, n: usize, kind: ScenarioKind, name: &str) {
        self.flush_scenario();
        self.flush_background();

        let mut scenario = Scenario::new(kind, name.trim(), n);
        // Tags on a rule apply to every scenario inside it
        scenario.tags = self.rule_tags.clone();
        scenario.tags.extend(self.take_tags());
        scenario.rule = self.rule.clone();
        self.scenario = Some(scenario);
        self.section = Section::Scenario;
    }

    fn examples(&mut self, n: usize, name: &str) -> Result<(), FeatureParseError> {
        if self.scenario.is_none() {
            return Err(FeatureParseError::new(
                n,
                ParseErrorKind::ExamplesOutsideScenario,
            ));
        }
        self.flush_examples();
        self.examples = Some(Examples {
            name: name.trim().to_string(),
            description: String::new(),
            tags: self.take_tags(),
            table_argument: Table::default(),
        });
        self.section = Section::Examples;
        Ok(())
    }

    fn step(&mut self, n: usize, keyword: StepKeyword, text: &str) -> Result<(), FeatureParseError> {
        self.reject_pending_tags()?;
        let step = Step {
            keyword,
            native_keyword: keyword.as_str().to_string(),
            name: text.to_string(),
            table_argument: None,
            doc_string_argument: None,
            line: n,
        };
        match self.current_steps() {
            Some(steps) => {
                steps.push(step);
                Ok(())
            }
            None => Err(FeatureParseError::new(n, ParseErrorKind::StepOutsideScenario)),
        }
    }

    fn current_steps(&mut self) -> Option<&mut Vec<Step>> {
        match self.section {
            Section::Background => self.background.as_mut().map(|b| &mut b.steps),
            Section::Scenario => self.scenario.as_mut().map(|s| &mut s.steps),
            _ => None,
        }
    }

    fn last_step(&mut self) -> Option<&mut Step> {
        self.current_steps().and_then(|steps| steps.last_mut())
    }

    fn table_row(&mut self, n: usize, line: &str) -> Result<(), FeatureParseError> {
        self.reject_pending_tags()?;
        let cells = parse_row(line).ok_or_else(|| {
            FeatureParseError::new(n, ParseErrorKind::MalformedTableRow)
        })?;

        let table = if self.section == Section::Examples {
            self.examples.as_mut().map(|e| &mut e.table_argument)
        } else {
            self.last_step()
                .map(|step| step.table_argument.get_or_insert_with(Table::default))
        };
        let table = table.ok_or_else(|| FeatureParseError::new(n, ParseErrorKind::StrayTable))?;

        if table.header_row.is_empty() {
            table.header_row = cells;
        } else if cells.len() != table.width() {
            return Err(FeatureParseError::new(
                n,
                ParseErrorKind::InconsistentCellCount {
                    expected: table.width(),
                    found: cells.len(),
                },
            ));
        } else {
            table.data_rows.push(cells);
        }
        Ok(())
    }

    fn open_doc(
        &mut self,
        n: usize,
        raw: &str,
        line: &str,
        delimiter: &'static str,
    ) -> Result<(), FeatureParseError> {
        if self.last_step().is_none() {
            return Err(FeatureParseError::new(n, ParseErrorKind::StrayDocString));
        }
        let content_type = line[delimiter.len()..].trim();
        self.doc = Some(OpenDocString {
            delimiter,
            indent: raw.len() - raw.trim_start().len(),
            content_type: (!content_type.is_empty()).then(|| content_type.to_string()),
            lines: Vec::new(),
            start_line: n,
        });
        Ok(())
    }

    fn doc_line(&mut self, raw: &str) {
        let Some(doc) = self.doc.as_mut() else {
            return;
        };
        if raw.trim() == doc.delimiter {
            if let Some(doc) = self.doc.take() {
                let escaped: String = doc.delimiter.chars().map(|c| format!("\\{}", c)).collect();
                let content = doc.lines.join("\n").replace(&escaped, doc.delimiter);
                if let Some(step) = self.last_step() {
                    step.doc_string_argument = Some(DocString {
                        content_type: doc.content_type,
                        content,
                    });
                }
            }
            return;
        }
        doc.lines.push(strip_indent(raw, doc.indent).to_string());
    }

    fn description(&mut self, n: usize, line: &str) -> Result<(), FeatureParseError> {
        self.reject_pending_tags()?;
        let target = match self.section {
            Section::Preamble => None,
            Section::Feature => self.feature.as_mut().map(|f| &mut f.description),
            // Rule descriptions are not kept
            Section::Rule => return Ok(()),
            Section::Background => self
                .background
                .as_mut()
                .filter(|b| b.steps.is_empty())
                .map(|b| &mut b.description),
            Section::Scenario => self
                .scenario
                .as_mut()
                .filter(|s| s.steps.is_empty())
                .map(|s| &mut s.description),
            Section::Examples => self
                .examples
                .as_mut()
                .filter(|e| e.table_argument.header_row.is_empty())
                .map(|e| &mut e.description),
        };
        let target = target.ok_or_else(|| {
            FeatureParseError::new(n, ParseErrorKind::UnexpectedContent(line.to_string()))
        })?;
        if !target.is_empty() {
            target.push('\n');
        }
        target.push_str(line);
        Ok(())
    }

    fn flush_examples(&mut self) {
        if let (Some(examples), Some(scenario)) = (self.examples.take(), self.scenario.as_mut()) {
            scenario.examples.push(examples);
        }
    }

    fn flush_scenario(&mut self) {
        self.flush_examples();
        if let (Some(scenario), Some(feature)) = (self.scenario.take(), self.feature.as_mut()) {
            feature.elements.push(scenario);
        }
    }

    fn flush_background(&mut self) {
        if let (Some(background), Some(feature)) = (self.background.take(), self.feature.as_mut()) {
            feature.background = Some(background);
        }
    }

    fn finish(mut self, last_line: usize) -> Result<Feature, FeatureParseError> {
        if let Some(doc) = &self.doc {
            return Err(FeatureParseError::new(
                doc.start_line,
                ParseErrorKind::UnterminatedDocString,
            ));
        }
        self.reject_pending_tags()?;
        self.flush_scenario();
        self.flush_background();
        self.feature
            .ok_or_else(|| FeatureParseError::new(last_line, ParseErrorKind::MissingFeature))
    }
}

fn split_step(line: &str) -> Option<(StepKeyword, &str)> {
    STEP_KEYWORDS.iter().find_map(|(word, keyword)| {
        let rest = line.strip_prefix(word)?;
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            Some((*keyword, rest.trim()))
        } else {
            None
        }
    })
}

/// Split `| a | b\|c |` into trimmed cells. `None` when the row is not closed.
fn parse_row(line: &str) -> Option<Vec<String>> {
    let inner = line.strip_prefix('|')?;
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = inner.chars();
    let mut closed = false;

    while let Some(c) = chars.next() {
        closed = false;
        match c {
            '\\' => match chars.next() {
                Some('|') => cell.push('|'),
                Some('n') => cell.push('\n'),
                Some('\\') => cell.push('\\'),
                Some(other) => {
                    cell.push('\\');
                    cell.push(other);
                }
                None => cell.push('\\'),
            },
            '|' => {
                cells.push(cell.trim().to_string());
                cell.clear();
                closed = true;
            }
            _ => cell.push(c),
        }
    }

    if closed && cell.trim().is_empty() {
        Some(cells)
    } else {
        None
    }
}

fn strip_indent(line: &str, indent: usize) -> &str {
    let mut rest = line;
    for _ in 0..indent {
        match rest.chars().next() {
            Some(c) if c.is_whitespace() => rest = &rest[c.len_utf8()..],
            _ => break,
        }
    }
    rest
}
