//! Cross-country analysis over the loaded regulatory table: groups countries
//! sharing identical requirement text and derives per-country action lists,
//! flagging where one market's compliance work can be leveraged for another.

use std::collections::BTreeMap;

use crate::workbook::RegulatoryTable;

/// A requirement shared verbatim by two or more countries.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedRequirement {
    pub requirement: String,
    pub countries: Vec<String>,
}

/// category -> attribute -> requirement groups shared by >= 2 countries.
pub type RegionalPatterns = BTreeMap<String, BTreeMap<String, Vec<SharedRequirement>>>;

/// country -> category -> action items.
pub type CountryActions = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Groups countries whose requirement text for an attribute is identical.
/// Only groups of two or more are reported.
pub fn regional_patterns(table: &RegulatoryTable) -> RegionalPatterns {
    let mut patterns: RegionalPatterns = BTreeMap::new();

    for row in &table.rows {
        for group in requirement_groups(table, row) {
            if group.countries.len() > 1 {
                patterns
                    .entry(row.category.clone())
                    .or_default()
                    .entry(row.attribute.clone())
                    .or_default()
                    .push(group);
            }
        }
    }

    patterns
}

/// Builds the per-country action list. A requirement shared by several
/// countries is carried in full by the first country in table order; the
/// others get a note to leverage that country's compliance work.
pub fn country_actions(table: &RegulatoryTable) -> CountryActions {
    let mut actions: CountryActions = table
        .countries
        .iter()
        .map(|c| (c.clone(), BTreeMap::new()))
        .collect();

    for row in &table.rows {
        for group in requirement_groups(table, row) {
            let primary = &group.countries[0];
            let item = format!("{} - {}: {}", row.category, row.attribute, group.requirement);
            push_action(&mut actions, primary, &row.category, item);

            for other in &group.countries[1..] {
                push_action(
                    &mut actions,
                    other,
                    &row.category,
                    format!("Leverage {primary}'s compliance for: {}", row.attribute),
                );
            }
        }
    }

    actions
}

/// Groups this row's countries by identical requirement text, preserving
/// table order; blank cells are skipped.
fn requirement_groups(table: &RegulatoryTable, row: &crate::workbook::RegulatoryRow) -> Vec<SharedRequirement> {
    let mut groups: Vec<SharedRequirement> = Vec::new();
    for (idx, country) in table.countries.iter().enumerate() {
        let requirement = row.requirement(idx).trim();
        if requirement.is_empty() {
            continue;
        }
        match groups.iter_mut().find(|g| g.requirement == requirement) {
            Some(group) => group.countries.push(country.clone()),
            None => groups.push(SharedRequirement {
                requirement: requirement.to_string(),
                countries: vec![country.clone()],
            }),
        }
    }
    groups
}

fn push_action(actions: &mut CountryActions, country: &str, category: &str, item: String) {
    actions
        .entry(country.to_string())
        .or_default()
        .entry(category.to_string())
        .or_default()
        .push(item);
}
