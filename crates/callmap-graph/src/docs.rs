//! Best-effort segmentation of generated function documentation.
//!
//! The documentation text is informal markdown. Sections are introduced by a
//! `#`..`####` heading or a `**bold**` label, optionally followed by a colon.
//! Anything that does not look like a recognised header is left in the body
//! of the preceding section; unknown layouts fall back to placeholders.

use callmap_core::FunctionRecord;
use indexmap::IndexSet;
use regex::Regex;
use std::sync::LazyLock;

pub const NO_DOCUMENTATION: &str = "No documentation available.";
pub const NO_CALLS: &str = "No calls found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Description,
    Parameters,
    ReturnValue,
    Pseudocode,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Description,
        Section::Parameters,
        Section::ReturnValue,
        Section::Pseudocode,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::Description => "Description",
            Section::Parameters => "Parameters",
            Section::ReturnValue => "Return Value",
            Section::Pseudocode => "Pseudocode",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Section::Description => "No description available.",
            Section::Parameters => "No parameters listed.",
            Section::ReturnValue => "No return value specified.",
            Section::Pseudocode => "No pseudocode available.",
        }
    }

    fn header_regex(self) -> &'static Regex {
        &HEADERS[self as usize]
    }
}

const HEADER_PREFIX: &str = r"(?:#{1,4}\s*|\*\*)\s*";

static HEADERS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    Section::ALL.map(|section| {
        let pattern = format!(
            r"(?i){HEADER_PREFIX}{}(?:\*{{2}}|\s*:)?.*?\n+",
            regex::escape(section.label())
        );
        Regex::new(&pattern).expect("section header pattern is valid")
    })
});

static NEXT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    let labels = Section::ALL
        .iter()
        .map(|s| regex::escape(s.label()))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\n+\s*{HEADER_PREFIX}(?:{labels})"))
        .expect("section boundary pattern is valid")
});

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").expect("fence pattern is valid"));

/// Trimmed body of `section`, or `None` when absent or blank.
pub fn extract_section(doc: &str, section: Section) -> Option<String> {
    let header = section.header_regex().find(doc)?;
    let rest = &doc[header.end()..];
    let body = match NEXT_HEADER.find(rest) {
        Some(next) => &rest[..next.start()],
        None => rest,
    };
    let body = body.trim();
    (!body.is_empty()).then(|| body.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameters {
    Listed(Vec<String>),
    Missing,
}

impl Parameters {
    pub fn placeholder() -> &'static str {
        Section::Parameters.placeholder()
    }
}

/// The four documentation sections with placeholders substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDoc {
    pub description: String,
    pub parameters: Parameters,
    pub return_value: String,
    pub pseudocode: String,
}

pub fn parse_documentation(doc: &str) -> FunctionDoc {
    let text_or_placeholder = |section: Section| {
        extract_section(doc, section).unwrap_or_else(|| section.placeholder().to_string())
    };

    let parameters = match extract_section(doc, Section::Parameters) {
        Some(text) => Parameters::Listed(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        None => Parameters::Missing,
    };

    let pseudocode = text_or_placeholder(Section::Pseudocode);
    let pseudocode = match FENCED_BLOCK.captures(&pseudocode) {
        Some(caps) => caps[1].trim().to_string(),
        None => pseudocode,
    };

    FunctionDoc {
        description: text_or_placeholder(Section::Description),
        parameters,
        return_value: text_or_placeholder(Section::ReturnValue),
        pseudocode,
    }
}

/// Distinct callee names in first-occurrence order.
pub fn unique_calls(calls: &[String]) -> Vec<String> {
    let unique: IndexSet<&String> = calls.iter().collect();
    unique.into_iter().cloned().collect()
}

/// Everything the detail overlay shows for one function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailContent {
    pub function_name: String,
    /// `None` when the record carries no (or empty) documentation.
    pub documentation: Option<FunctionDoc>,
    pub calls: Vec<String>,
}

impl DetailContent {
    pub fn from_record(function_name: &str, record: &FunctionRecord) -> Self {
        let documentation = record
            .documentation
            .as_deref()
            .filter(|doc| !doc.is_empty())
            .map(parse_documentation);
        Self {
            function_name: function_name.to_string(),
            documentation,
            calls: unique_calls(&record.calls),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_DOC: &str = "## Description\nDoes X.\n## Parameters\n- p1: int\n## Return Value\nint\n## Pseudocode\n```\nreturn p1\n```";

    #[test]
    fn test_heading_sections_parse_to_literal_bodies() {
        let doc = parse_documentation(FULL_DOC);
        assert_eq!(doc.description, "Does X.");
        assert_eq!(doc.parameters, Parameters::Listed(vec!["- p1: int".to_string()]));
        assert_eq!(doc.return_value, "int");
        assert_eq!(doc.pseudocode, "return p1");
    }

    #[test]
    fn test_unrecognised_text_yields_placeholders() {
        let doc = parse_documentation("This function frees a page.\nIt returns nothing.");
        assert_eq!(doc.description, "No description available.");
        assert_eq!(doc.parameters, Parameters::Missing);
        assert_eq!(doc.return_value, "No return value specified.");
        assert_eq!(doc.pseudocode, "No pseudocode available.");
    }

    #[test]
    fn test_bold_labels_with_colons_are_recognised() {
        let text = "**Description:** Maps a page.\n\n**Parameters:**\n- `va`: virtual address\n  \n- `pa`: physical address\n\n**Return Value:**\n0 on success\n\n**Pseudocode:**\nif va is null: fail";
        // The body starts on the line after the label, and the next boundary
        // needs a header that begins a line after a newline run.
        assert_eq!(
            extract_section(text, Section::Description).as_deref(),
            Some("**Parameters:**\n- `va`: virtual address\n  \n- `pa`: physical address")
        );
        let doc = parse_documentation(text);
        assert_eq!(
            doc.parameters,
            Parameters::Listed(vec![
                "- `va`: virtual address".to_string(),
                "- `pa`: physical address".to_string(),
            ])
        );
        assert_eq!(doc.return_value, "0 on success");
        assert_eq!(doc.pseudocode, "if va is null: fail");
    }

    #[test]
    fn test_labels_match_case_insensitively() {
        let text = "### DESCRIPTION\nloud\n#### return value:\n-1";
        assert_eq!(extract_section(text, Section::Description).as_deref(), Some("loud"));
        assert_eq!(extract_section(text, Section::ReturnValue).as_deref(), Some("-1"));
    }

    #[test]
    fn test_pseudocode_without_fence_keeps_raw_text() {
        let doc = parse_documentation("# Pseudocode\nloop forever");
        assert_eq!(doc.pseudocode, "loop forever");
    }

    #[test]
    fn test_unique_calls_preserve_first_occurrence() {
        let calls: Vec<String> = ["f", "g", "f", "h", "g"].iter().map(|s| s.to_string()).collect();
        assert_eq!(unique_calls(&calls), vec!["f", "g", "h"]);
    }

    #[test]
    fn test_detail_content_for_record() {
        let record = FunctionRecord::with_calls(["f", "g", "f"]);
        let content = DetailContent::from_record("f", &record);
        assert_eq!(content.function_name, "f");
        assert!(content.documentation.is_none());
        assert_eq!(content.calls, vec!["f", "g"]);

        let record = FunctionRecord::default().documented("");
        assert!(DetailContent::from_record("g", &record).documentation.is_none());

        let record = FunctionRecord::default().documented(FULL_DOC);
        let content = DetailContent::from_record("h", &record);
        assert_eq!(content.documentation.unwrap().return_value, "int");
        assert!(content.calls.is_empty());
    }
}
