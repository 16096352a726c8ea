//! Prompt templates for the four model requests the dashboard makes.
//!
//! These templates use basic `format!()` interpolation for type safety.

use crate::error::Result;
use crate::models::ReportRecord;

const CHART_SCHEMA: &str = r#"interface ChartDataPoint { name: string; [key: string]: string | number; }
interface ChartConfig {
  type: 'bar' | 'line' | 'pie';
  data: ChartDataPoint[];
  dataKeys: { key: string; color: string; stackId?: string; name?: string }[];
  title: string;
  description: string;
  xAxisKey: string;
}"#;

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("  - {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Generate a prompt asking for a markdown narrative about one report
///
/// # Arguments
/// * `report` - The report to analyse
/// * `excerpt_chars` - How many characters of the full text to include
///
/// # Example
/// ```
/// use diwboard::llm::prompts::narrative_prompt;
/// use diwboard::models::ReportRecord;
///
/// let report = ReportRecord {
///     id: "construction".to_string(),
///     title: "Construction Volume".to_string(),
///     release_date: None,
///     summary: "Volume falls.".to_string(),
///     key_findings: vec!["Down 3.5%".to_string()],
///     charts: vec![],
///     full_text: "Full text".to_string(),
/// };
/// let prompt = narrative_prompt(&report, 4000).unwrap();
/// assert!(prompt.contains("Down 3.5%"));
/// ```
pub fn narrative_prompt(report: &ReportRecord, excerpt_chars: usize) -> Result<String> {
    let title = &report.title;
    let summary = &report.summary;
    let findings = bullet_list(&report.key_findings);
    let charts = serde_json::to_string_pretty(&report.charts)?;
    let excerpt = report.excerpt(excerpt_chars);

    Ok(format!(
        r#"You are a senior economic analyst at the German Institute for Economic Research (DIW Berlin).
Write a narrative analysis of the weekly report "{title}".

The analysis should:
1. Open with a short, high-level statement of the main issue.
2. Explain the key trends visible in the data and charts below.
3. Discuss the interconnections: how these findings may influence, or be influenced by, other economic sectors or social issues in Germany.
4. Close with a forward-looking takeaway.
5. Use GitHub-flavored Markdown with headings, bold text and bullet points.

Report data:
- Title: {title}
- Summary: {summary}
- Key findings:
{findings}
- Charts: {charts}
- Report excerpt:
---
{excerpt}...
---"#
    ))
}

/// System instruction for a chat session grounded in one report
pub fn chat_system_instruction(report: &ReportRecord, excerpt_chars: usize) -> String {
    let title = &report.title;
    let summary = &report.summary;
    let findings = report.key_findings.join(", ");
    let excerpt = report.excerpt(excerpt_chars);

    format!(
        r#"You are an AI assistant from DIW Berlin specialising in German economic data. Your knowledge base for this conversation is the weekly report "{title}". The user can see the report's summary, key findings and charts.

Your tasks:
1. Answer questions about the report concisely.
2. Summarise the findings or explain the charts when asked.
3. Where relevant, briefly point out links to other economic areas.
4. Stay within the report's context. Do not invent data; say so when you do not know.

Report context:
- Title: {title}
- Summary: {summary}
- Key findings: {findings}
- Full text: {excerpt}..."#
    )
}

/// Generate the cross-report storyboard synthesis prompt
///
/// The full serialized report set is embedded so the model can cite ids.
pub fn storyboard_prompt(reports: &[ReportRecord]) -> Result<String> {
    let source = serde_json::to_string_pretty(reports)?;

    Ok(format!(
        r#"You are a macroeconomic strategist. Analyse the collection of economic reports below and find the single underlying story that connects them: the "narrative singularity". State it as a clear thesis, visualise it, and reflect on how you reached it.

Respond with one JSON object matching these TypeScript interfaces:
{CHART_SCHEMA}
interface GraphNode {{ id: string; title: string; }}
interface GraphEdge {{ source: string; target: string; label: string; }}
interface RelationshipGraphData {{ nodes: GraphNode[]; edges: GraphEdge[]; }}
interface KeyActor {{ name: string; description: string; icon: string; }}
interface StoryboardData {{
  narrative: string;
  charts: ChartConfig[];
  introspection: string;
  retrospection: string;
  relationshipGraph: RelationshipGraphData;
  keyActors?: KeyActor[];
}}

Instructions:
1. narrative: state the thesis first, show how each report supports it, explain the compounded implications, and end with a forward-looking call to action. Markdown.
2. charts: 1-2 new charts that visualise the thesis itself rather than re-plotting source charts. Use [] if nothing meaningful can be drawn.
3. relationshipGraph: one node per source report using the report's id and title; 2-4 edges for the most critical links, each label a concise causal explanation.
4. introspection: in Markdown, explain the reasoning path, the pivotal evidence from each report, and the non-obvious connections behind the graph.
5. retrospection: in Markdown, name one alternative thesis you discarded and why, and the one additional data point that would most strengthen the analysis.
6. keyActors: 3-6 institutions or groups central to the thesis, each with a short description and a Font Awesome icon class (for example "fa-solid fa-building-columns").

Source reports:
{source}

Return ONLY the JSON object, with no surrounding text or markdown fences."#
    ))
}

/// Generate the prompt that turns extracted PDF text into a report record
///
/// The model is told not to echo the text back; it is attached afterwards.
pub fn report_structuring_prompt(full_text: &str) -> String {
    format!(
        r#"You are a data analyst. Convert the economic report text below into one structured JSON object.

The object MUST follow this TypeScript interface. Do NOT include a fullText field.
{CHART_SCHEMA}
interface ReportDataForJson {{
  id: string;            // URL-friendly slug derived from the title, e.g. "women-in-leadership"
  title: string;         // concise title of the report
  releaseDate: string;   // release date as YYYY-MM-DD, taken from the text
  summary: string;       // 2-3 sentence summary
  keyFindings: string[]; // 3-5 key points
  charts: ChartConfig[]; // 1-2 charts built from quantitative data in the text, or []
}}

Instructions:
1. Read the whole text; it was extracted from a PDF and may contain headers, footers and odd line breaks. Ignore them.
2. Choose the chart type that best fits each data series, set xAxisKey to the category field, and give every dataKey a hex colour.
3. If the text holds no chartable data, return [] for charts. Never invent numbers.
4. Return ONLY the JSON object, with no surrounding text or markdown fences.

Report text:
---
{full_text}
---"#
    )
}
