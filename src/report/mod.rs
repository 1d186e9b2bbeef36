pub mod document;
pub mod docx_text;
pub mod excel;

pub use document::ReportDocument;

/// One LLM-generated section of a compliance plan. The section list is data:
/// pipelines build it from the template set and the loaded table, and the
/// document assembly loop does the rest.
#[derive(Debug, Clone)]
pub struct PlanSection {
    pub title: String,
    pub prompt: String,
}

impl PlanSection {
    pub fn new(title: impl Into<String>, prompt: impl Into<String>) -> Self {
        PlanSection {
            title: title.into(),
            prompt: prompt.into(),
        }
    }
}
