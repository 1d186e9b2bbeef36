//! Multi-country compliance plan pipeline: every country column of the Data
//! sheet, regional pattern analysis, per-category sections and a non-LLM
//! action summary appendix.

use std::fmt::Write as _;

use chrono::Local;
use tracing::info;

use crate::analysis::{country_actions, regional_patterns, CountryActions, RegionalPatterns};
use crate::config::Config;
use crate::constants::*;
use crate::errors::{Error, Result};
use crate::llm::{ChatClient, ChatMessage};
use crate::report::{PlanSection, ReportDocument};
use crate::utils::render;
use crate::workbook::{CompareWorkbook, RegulatoryTable};

pub const PLAN_FILE_NAME: &str = "Multi_Country_Compliance_Plan.docx";

pub async fn run(config: &Config) -> Result<()> {
    let mut workbook = CompareWorkbook::open(&config.workbook)?;
    let table = workbook.table_all_countries()?;
    let product = workbook.product().unwrap_or_else(|_| config.product.clone());
    info!(countries = table.countries.len(), %product, "building multi-country plan");

    let patterns = regional_patterns(&table);
    let actions = country_actions(&table);

    let client = super::build_chat_client(config)?;
    let document = build_plan_document(&client, &table, &product, &patterns, &actions).await?;

    std::fs::create_dir_all(&config.output_dir).map_err(|e| {
        Error::DocumentIo(format!("cannot create {}: {e}", config.output_dir.display()))
    })?;
    let path = config.output_dir.join(PLAN_FILE_NAME);
    document.save(&path)?;

    info!(plan = %path.display(), "plan pipeline finished");
    Ok(())
}

async fn build_plan_document(
    client: &ChatClient,
    table: &RegulatoryTable,
    product: &str,
    patterns: &RegionalPatterns,
    actions: &CountryActions,
) -> Result<ReportDocument> {
    let countries = table.countries.join(", ");
    let categories = table.categories();

    let mut document = ReportDocument::new(&format!(
        "Multi-Country Regulatory Compliance Strategy for {product}"
    ));
    document.add_paragraph(&format!(
        "Generated on: {}",
        Local::now().format("%Y-%m-%d %H:%M")
    ));

    document.add_heading("Regulatory Categories Overview", 1);
    document.add_paragraph("This compliance plan covers the following regulatory categories:");
    for category in &categories {
        document.add_bullet(category);
    }

    for section in plan_sections(table, product, &countries, &categories, patterns) {
        document.add_heading(&section.title, 1);
        let body = client
            .send_text(&[ChatMessage::user(&section.prompt).dated()])
            .await?;
        document.add_paragraph(&body);
    }

    add_action_summary(&mut document, table, actions);
    Ok(document)
}

fn plan_sections(
    table: &RegulatoryTable,
    product: &str,
    countries: &str,
    categories: &[String],
    patterns: &RegionalPatterns,
) -> Vec<PlanSection> {
    let category_list = categories.join("\n");
    let mut sections = vec![PlanSection::new(
        "Executive Summary",
        render(
            PLAN_EXECUTIVE_SUMMARY_PROMPT,
            &[("product", product), ("countries", countries)],
        ),
    )];

    for category in categories {
        sections.push(PlanSection::new(
            format!("{category} Requirements"),
            render(
                PLAN_CATEGORY_PROMPT,
                &[
                    ("category", category.as_str()),
                    ("product", product),
                    ("countries", countries),
                    (
                        "data",
                        &super::compare::format_category_data(table, category),
                    ),
                ],
            ),
        ));
    }

    if !patterns.is_empty() {
        sections.push(PlanSection::new(
            "Regional Pattern Analysis",
            render(
                PLAN_REGIONAL_PATTERNS_PROMPT,
                &[("product", product), ("patterns", &format_patterns(patterns))],
            ),
        ));
    }

    for (title, template) in [
        ("Implementation Timeline", PLAN_TIMELINE_PROMPT),
        ("Cost Optimization Strategy", PLAN_COST_PROMPT),
        ("Risk Mitigation", PLAN_RISK_PROMPT),
    ] {
        sections.push(PlanSection::new(
            title,
            render(
                template,
                &[("countries", countries), ("categories", category_list.as_str())],
            ),
        ));
    }

    sections
}

/// Renders the shared-requirement groups as prompt context.
fn format_patterns(patterns: &RegionalPatterns) -> String {
    let mut out = String::new();
    for (category, attributes) in patterns {
        for (attribute, groups) in attributes {
            for group in groups {
                let _ = writeln!(
                    out,
                    "{category} / {attribute}: '{}' shared by {}",
                    group.requirement,
                    group.countries.join(", ")
                );
            }
        }
    }
    out
}

/// The per-country action checklist, straight from the data with no LLM call.
fn add_action_summary(document: &mut ReportDocument, table: &RegulatoryTable, actions: &CountryActions) {
    document.add_heading("Country-Specific Action Summary", 1);
    document.add_paragraph(
        "This section provides a comprehensive checklist of required actions for each country, \
         including opportunities for leveraging common requirements.",
    );

    for country in &table.countries {
        document.add_heading(&format!("{country} Action Items"), 2);
        let Some(by_category) = actions.get(country) else {
            continue;
        };
        if by_category.values().all(|items| items.is_empty()) {
            document.add_paragraph("No specific actions required.");
            continue;
        }
        for (category, items) in by_category {
            document.add_heading(category, 3);
            for item in items {
                document.add_bullet(item);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SharedRequirement;
    use crate::workbook::RegulatoryRow;

    fn table() -> RegulatoryTable {
        RegulatoryTable {
            countries: vec!["Finland".to_string(), "Norway".to_string()],
            rows: vec![RegulatoryRow {
                category: "Safety".to_string(),
                subcategory: "Electrical".to_string(),
                attribute: "Certification".to_string(),
                requirements: vec!["CE".to_string(), "CE".to_string()],
            }],
        }
    }

    #[test]
    fn sections_include_executive_summary_and_patterns() {
        let table = table();
        let patterns = regional_patterns(&table);
        let sections = plan_sections(
            &table,
            "Cooktop",
            "Finland, Norway",
            &table.categories(),
            &patterns,
        );

        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Executive Summary",
                "Safety Requirements",
                "Regional Pattern Analysis",
                "Implementation Timeline",
                "Cost Optimization Strategy",
                "Risk Mitigation",
            ]
        );
    }

    #[test]
    fn pattern_section_is_skipped_without_shared_requirements() {
        let mut table = table();
        table.rows[0].requirements = vec!["CE".to_string(), "Nemko".to_string()];
        let patterns = regional_patterns(&table);
        let sections = plan_sections(
            &table,
            "Cooktop",
            "Finland, Norway",
            &table.categories(),
            &patterns,
        );
        assert!(!sections.iter().any(|s| s.title == "Regional Pattern Analysis"));
    }

    #[test]
    fn patterns_render_with_their_country_groups() {
        let mut patterns = RegionalPatterns::new();
        patterns
            .entry("Safety".to_string())
            .or_default()
            .entry("Certification".to_string())
            .or_default()
            .push(SharedRequirement {
                requirement: "CE".to_string(),
                countries: vec!["Finland".to_string(), "Norway".to_string()],
            });

        assert_eq!(
            format_patterns(&patterns).trim(),
            "Safety / Certification: 'CE' shared by Finland, Norway"
        );
    }
}
