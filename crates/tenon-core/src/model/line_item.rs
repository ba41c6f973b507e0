use serde::{Deserialize, Serialize};
use std::fmt;

/// A named group of line items ("主卧", "厨房", ...).
///
/// `name` is the only externally meaningful identity: snapshot ids are
/// minted by value at capture time and are not comparable across versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub sort_order: i64,
}

/// One quotation line item (a "category" row in the source system).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    pub id: i64,
    pub project_id: i64,
    pub level1_category_id: i64,
    pub level1_category_name: String,
    pub level2_category_id: i64,
    pub level2_category_name: String,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub quantity: f64,
    pub unit: String,
    pub material_id: Option<i64>,
    pub material_name: Option<String>,
    pub color_id: Option<i64>,
    pub color_name: Option<String>,
    pub remark: Option<String>,
    pub unit_price: Option<f64>,
    pub total_price: Option<f64>,
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            id: 0,
            project_id: 0,
            level1_category_id: 0,
            level1_category_name: String::new(),
            level2_category_id: 0,
            level2_category_name: String::new(),
            height: None,
            width: None,
            quantity: 0.0,
            unit: String::new(),
            material_id: None,
            material_name: None,
            color_id: None,
            color_name: None,
            remark: None,
            unit_price: None,
            total_price: None,
        }
    }
}

impl LineItem {
    /// Recompute the derived `total_price` from `quantity * unit_price`.
    ///
    /// `total_price` is never independently authoritative; any comparison of
    /// it is informational only.
    pub fn recompute_total(&mut self) {
        self.total_price = self.unit_price.map(|price| self.quantity * price);
    }

    /// Project one compared field out of this row.
    #[must_use]
    pub fn field(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Level1CategoryName => FieldValue::Text(Some(&self.level1_category_name)),
            Field::Level2CategoryName => FieldValue::Text(Some(&self.level2_category_name)),
            Field::Height => FieldValue::Float(self.height),
            Field::Width => FieldValue::Float(self.width),
            Field::Quantity => FieldValue::Float(Some(self.quantity)),
            Field::Unit => FieldValue::Text(Some(&self.unit)),
            Field::MaterialName => FieldValue::Text(self.material_name.as_deref()),
            Field::ColorName => FieldValue::Text(self.color_name.as_deref()),
            Field::Remark => FieldValue::Text(self.remark.as_deref()),
            Field::UnitPrice => FieldValue::Float(self.unit_price),
            Field::TotalPrice => FieldValue::Float(self.total_price),
        }
    }
}

/// The line-item columns the comparison view diffs.
///
/// Structural ids (`project_id`, category ids) are identity, not content,
/// and are excluded: they form the matching key instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Level1CategoryName,
    Level2CategoryName,
    Height,
    Width,
    Quantity,
    Unit,
    MaterialName,
    ColorName,
    Remark,
    UnitPrice,
    TotalPrice,
}

impl Field {
    /// Every compared field, in display-column order.
    pub const ALL: [Self; 11] = [
        Self::Level1CategoryName,
        Self::Level2CategoryName,
        Self::Height,
        Self::Width,
        Self::Quantity,
        Self::Unit,
        Self::MaterialName,
        Self::ColorName,
        Self::Remark,
        Self::UnitPrice,
        Self::TotalPrice,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Level1CategoryName => "level1_category_name",
            Self::Level2CategoryName => "level2_category_name",
            Self::Height => "height",
            Self::Width => "width",
            Self::Quantity => "quantity",
            Self::Unit => "unit",
            Self::MaterialName => "material_name",
            Self::ColorName => "color_name",
            Self::Remark => "remark",
            Self::UnitPrice => "unit_price",
            Self::TotalPrice => "total_price",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A borrowed view of one field's value, before string normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    Float(Option<f64>),
}
