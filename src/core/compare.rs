//! Two-country comparison pipeline: load the Compare/Data sheets, ask the
//! model for a per-attribute verdict, then emit the Excel summary and the
//! two-country compliance plan document.

use std::fmt::Write as _;

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::config::Config;
use crate::constants::*;
use crate::errors::{Error, Result};
use crate::llm::{ChatClient, ChatMessage};
use crate::report::excel::{write_comparison_summary, ComparisonRecord};
use crate::report::{PlanSection, ReportDocument};
use crate::utils::render;
use crate::workbook::{CompareWorkbook, RegulatoryTable};

pub async fn run(config: &Config) -> Result<()> {
    let mut workbook = CompareWorkbook::open(&config.workbook)?;
    let (left, right) = workbook.compare_pair()?;
    info!(%left, %right, "comparing regulatory data");
    let table = workbook.table_for(&[left.clone(), right.clone()])?;

    let client = super::build_chat_client(config)?;
    let records = compare_rows(&client, &table).await?;

    std::fs::create_dir_all(&config.output_dir).map_err(|e| {
        Error::DocumentIo(format!("cannot create {}: {e}", config.output_dir.display()))
    })?;

    let summary_path = config
        .output_dir
        .join(format!("Compare_Summary_{left}_{right}.xlsx"));
    write_comparison_summary(&summary_path, &left, &right, &records)?;

    let plan_path = config
        .output_dir
        .join(format!("Compliance_Plan_{left}_{right}.docx"));
    let document = build_plan_document(&client, config, &table).await?;
    document.save(&plan_path)?;

    info!(summary = %summary_path.display(), plan = %plan_path.display(), "compare pipeline finished");
    Ok(())
}

/// Asks the model for a verdict on every attribute row. Country names are
/// substituted back for the neutral set labels in the stored summary.
async fn compare_rows(client: &ChatClient, table: &RegulatoryTable) -> Result<Vec<ComparisonRecord>> {
    let left = &table.countries[0];
    let right = &table.countries[1];

    let progress = ProgressBar::new(table.rows.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut records = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        progress.set_message(row.attribute.clone());

        let prompt = render(
            COMPARE_ATTRIBUTES_PROMPT,
            &[("set1", row.requirement(0)), ("set2", row.requirement(1))],
        );
        let verdict = client
            .send_text(&[ChatMessage::user(&prompt).dated()])
            .await?;

        records.push(ComparisonRecord {
            category: row.category.clone(),
            subcategory: row.subcategory.clone(),
            attribute: row.attribute.clone(),
            left: row.requirement(0).to_string(),
            right: row.requirement(1).to_string(),
            summary: verdict.replace("Set 1", left).replace("Set 2", right),
        });
        progress.inc(1);
    }
    progress.finish_and_clear();
    Ok(records)
}

/// Assembles the two-country plan: a fixed scope summary built from the data,
/// then one LLM call per section from the template list.
async fn build_plan_document(
    client: &ChatClient,
    config: &Config,
    table: &RegulatoryTable,
) -> Result<ReportDocument> {
    let countries = table.countries.join(" and ");
    let categories = table.categories();

    let mut document = ReportDocument::new(&format!(
        "Regulatory Compliance Strategy for {} - {countries}",
        config.product
    ));
    document.add_paragraph(&format!(
        "Generated on: {}",
        Local::now().format("%Y-%m-%d %H:%M")
    ));

    document.add_heading("Regulatory Scope Summary", 1);
    document.add_paragraph("This compliance plan covers the following regulatory categories:");
    for category in &categories {
        document.add_bullet(category);
    }
    document.add_paragraph(
        "Note: This compliance plan is limited to the regulatory categories listed above \
         based on the provided data. Additional regulatory requirements may apply.",
    );

    for section in plan_sections(config, table, &countries, &categories) {
        document.add_heading(&section.title, 1);
        let body = client
            .send_text(&[ChatMessage::user(&section.prompt).dated()])
            .await?;
        document.add_paragraph(&body);
    }

    Ok(document)
}

fn plan_sections(
    config: &Config,
    table: &RegulatoryTable,
    countries: &str,
    categories: &[String],
) -> Vec<PlanSection> {
    let category_list = categories.join("\n");
    let mut sections = vec![PlanSection::new(
        "Project Overview",
        render(
            PLAN_OVERVIEW_PROMPT,
            &[
                ("product", config.product.as_str()),
                ("countries", countries),
                ("data", &format_table_by_category(table, categories)),
            ],
        ),
    )];

    for category in categories {
        sections.push(PlanSection::new(
            format!("{category} Requirements"),
            render(
                PLAN_CATEGORY_PROMPT,
                &[
                    ("category", category.as_str()),
                    ("product", config.product.as_str()),
                    ("countries", countries),
                    ("data", &format_category_data(table, category)),
                ],
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

/// Renders the rows of one category as prompt context.
pub(crate) fn format_category_data(table: &RegulatoryTable, category: &str) -> String {
    let mut out = String::new();
    for row in table.rows_for_category(category) {
        let _ = write!(out, "{} ({})", row.attribute, row.subcategory);
        for (idx, country) in table.countries.iter().enumerate() {
            let _ = write!(out, " | {country}: {}", row.requirement(idx));
        }
        out.push('\n');
    }
    out
}

pub(crate) fn format_table_by_category(table: &RegulatoryTable, categories: &[String]) -> String {
    let mut out = String::new();
    for category in categories {
        let _ = writeln!(out, "Category: {category}");
        out.push_str(&format_category_data(table, category));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::RegulatoryRow;
    use std::path::PathBuf;
    use std::time::Duration;

    fn table() -> RegulatoryTable {
        RegulatoryTable {
            countries: vec!["Finland".to_string(), "Norway".to_string()],
            rows: vec![
                RegulatoryRow {
                    category: "Safety".to_string(),
                    subcategory: "Electrical".to_string(),
                    attribute: "Certification".to_string(),
                    requirements: vec!["CE, FI mark".to_string(), "CE".to_string()],
                },
                RegulatoryRow {
                    category: "EMC".to_string(),
                    subcategory: "Emissions".to_string(),
                    attribute: "Standard".to_string(),
                    requirements: vec!["EN 55014".to_string(), "EN 55014".to_string()],
                },
            ],
        }
    }

    fn config() -> Config {
        toml::from_str(
            r#"
            workbook = "compare.xlsx"
            product = "Cooktop"

            [endpoint]
            kind = "groq"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn section_list_covers_overview_categories_and_strategy() {
        let table = table();
        let categories = table.categories();
        let sections = plan_sections(&config(), &table, "Finland and Norway", &categories);

        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Project Overview",
                "Safety Requirements",
                "EMC Requirements",
                "Implementation Timeline",
                "Cost Optimization Strategy",
                "Risk Mitigation",
            ]
        );
        assert!(sections[1].prompt.contains("Certification (Electrical)"));
        assert!(sections[1].prompt.contains("Finland: CE, FI mark"));
        assert!(sections[3].prompt.contains("Safety\nEMC"));
    }

    #[test]
    fn category_data_lists_every_selected_country() {
        let data = format_category_data(&table(), "EMC");
        assert_eq!(
            data.trim(),
            "Standard (Emissions) | Finland: EN 55014 | Norway: EN 55014"
        );
    }

    #[test]
    fn config_default_limits_apply() {
        let config = config();
        assert_eq!(config.limits.min_interval, Duration::from_secs(1));
        assert_eq!(config.workbook, PathBuf::from("compare.xlsx"));
    }
}
