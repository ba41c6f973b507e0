//! The nested form/tree shape the designer edits in, and the pure reducer
//! behind its cascading field updates.
//!
//! The source system re-derived dependent fields (unit, unit price, color
//! reset) through imperative form updates; here every cascade is the single
//! pure function [`apply_field_change`] so it is testable without a UI.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::compare::FlatRow;
use crate::model::{LineItem, Project, QuotationType, Snapshot};

/// One project of the nested form: a name and its line items, no ids yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormProject {
    pub name: String,
    #[serde(default)]
    pub categories: Vec<LineItem>,
}

/// Flatten the nested form into comparable rows.
///
/// This is the form-shaped counterpart of
/// [`crate::compare::flatten_snapshot`]; identical logical content yields
/// identical rows, so both call sites converge on the same comparison.
#[must_use]
pub fn flatten_form(projects: &[FormProject]) -> Vec<FlatRow> {
    let mut rows = Vec::new();
    for project in projects {
        for item in &project.categories {
            rows.push(FlatRow {
                project_name: project.name.clone(),
                item: item.clone(),
            });
        }
    }
    rows
}

/// Turn the nested form into a persistable snapshot shape, minting fresh
/// sequential ids.
///
/// Ids minted here are only stable within one save; cross-version identity
/// always goes through the matching key, never these ids.
#[must_use]
pub fn materialize(projects: &[FormProject]) -> Snapshot {
    let mut out_projects = Vec::with_capacity(projects.len());
    let mut out_categories = Vec::new();
    let mut next_item_id: i64 = 1;

    for (index, project) in projects.iter().enumerate() {
        let project_id = i64::try_from(index).unwrap_or(i64::MAX) + 1;
        out_projects.push(Project {
            id: project_id,
            name: project.name.clone(),
            sort_order: i64::try_from(index).unwrap_or(i64::MAX),
        });
        for item in &project.categories {
            let mut item = item.clone();
            item.id = next_item_id;
            item.project_id = project_id;
            next_item_id += 1;
            out_categories.push(item);
        }
    }

    Snapshot {
        projects: out_projects,
        categories: out_categories,
    }
}

/// A single edit to one line-item field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    Level1Category(i64),
    Level2Category(i64),
    Material(i64),
    Color(i64),
    Height(Option<f64>),
    Width(Option<f64>),
    Quantity(f64),
    Unit(String),
    Remark(Option<String>),
    UnitPrice(Option<f64>),
}

/// Apply one field edit and its cascades, returning the updated row.
///
/// Cascades mirror the source form exactly:
/// - quantity / unit price → recompute the derived total
/// - level-2 category → category name + pricing unit, and re-derive the
///   unit price when a material is already chosen
/// - material → material name, color reset, and re-derive the unit price
///   when a level-2 category is already chosen
/// - level-1 category → category name, clear level-2/unit/material/color
/// - color → color name
#[must_use]
pub fn apply_field_change(
    item: &LineItem,
    catalog: &Catalog,
    quotation_type: Option<QuotationType>,
    change: &FieldChange,
) -> LineItem {
    let mut updated = item.clone();
    match change {
        FieldChange::Quantity(quantity) => {
            updated.quantity = *quantity;
            updated.recompute_total();
        }
        FieldChange::UnitPrice(price) => {
            updated.unit_price = *price;
            updated.recompute_total();
        }
        FieldChange::Level2Category(id) => {
            updated.level2_category_id = *id;
            if let Some(level2) = catalog.level2(updated.level1_category_id, *id) {
                updated.level2_category_name = level2.name.clone();
                updated.unit = level2.pricing_unit.clone();
                refresh_unit_price(&mut updated, catalog, quotation_type);
            }
        }
        FieldChange::Material(id) => {
            updated.material_id = Some(*id);
            if let Some(material) = catalog.material(*id) {
                updated.material_name = Some(material.name.clone());
                updated.color_id = None;
                updated.color_name = None;
                if updated.level2_category_id != 0 {
                    refresh_unit_price(&mut updated, catalog, quotation_type);
                }
            }
        }
        FieldChange::Level1Category(id) => {
            updated.level1_category_id = *id;
            if let Some(level1) = catalog.level1(*id) {
                updated.level1_category_name = level1.name.clone();
                updated.level2_category_id = 0;
                updated.level2_category_name = String::new();
                updated.unit = String::new();
                updated.material_id = None;
                updated.material_name = None;
                updated.color_id = None;
                updated.color_name = None;
            }
        }
        FieldChange::Color(id) => {
            updated.color_id = Some(*id);
            if let Some(color) = catalog.color(*id) {
                updated.color_name = Some(color.name.clone());
            }
        }
        FieldChange::Height(height) => updated.height = *height,
        FieldChange::Width(width) => updated.width = *width,
        FieldChange::Unit(unit) => updated.unit = unit.clone(),
        FieldChange::Remark(remark) => updated.remark = remark.clone(),
    }
    updated
}

fn refresh_unit_price(
    item: &mut LineItem,
    catalog: &Catalog,
    quotation_type: Option<QuotationType>,
) {
    let Some(quotation_type) = quotation_type else {
        return;
    };
    let Some(material_id) = item.material_id else {
        return;
    };
    if let Some(price) = catalog.unit_price(material_id, quotation_type) {
        item.unit_price = Some(price);
        item.recompute_total();
    }
}
