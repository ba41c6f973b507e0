//! Read-only quotation catalog: the category tree, the material price list,
//! and the color list.
//!
//! The catalog only feeds the auto-fill cascades in [`crate::form`]; it is a
//! pure lookup and takes no part in change attribution.

use serde::{Deserialize, Serialize};

use crate::model::QuotationType;

/// A level-1 category and its level-2 children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub children: Vec<SubCategory>,
}

/// A level-2 category. Selecting one fixes the pricing unit of the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub pricing_unit: String,
}

/// A base material with its two price columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: i64,
    pub name: String,
    pub dealer_price: Option<f64>,
    pub owner_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub id: i64,
    pub name: String,
}

/// The whole catalog, as served by the quotation-config backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub categories: Vec<CategoryNode>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub colors: Vec<Color>,
}

impl Catalog {
    #[must_use]
    pub fn level1(&self, id: i64) -> Option<&CategoryNode> {
        self.categories.iter().find(|node| node.id == id)
    }

    #[must_use]
    pub fn level2(&self, level1_id: i64, level2_id: i64) -> Option<&SubCategory> {
        self.level1(level1_id)?
            .children
            .iter()
            .find(|child| child.id == level2_id)
    }

    #[must_use]
    pub fn material(&self, id: i64) -> Option<&Material> {
        self.materials.iter().find(|material| material.id == id)
    }

    #[must_use]
    pub fn color(&self, id: i64) -> Option<&Color> {
        self.colors.iter().find(|color| color.id == id)
    }

    /// Look up the unit price for a material under the given quotation type.
    ///
    /// Returns `None` when the material is unknown or has no price in that
    /// column.
    #[must_use]
    pub fn unit_price(&self, material_id: i64, quotation_type: QuotationType) -> Option<f64> {
        let material = self.material(material_id)?;
        match quotation_type {
            QuotationType::Dealer => material.dealer_price,
            QuotationType::Owner => material.owner_price,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{Catalog, CategoryNode, Color, Material, SubCategory};
    use crate::model::QuotationType;

    pub(crate) fn sample_catalog() -> Catalog {
        Catalog {
            categories: vec![CategoryNode {
                id: 1,
                name: "柜体".into(),
                children: vec![
                    SubCategory {
                        id: 11,
                        name: "衣柜".into(),
                        pricing_unit: "平方".into(),
                    },
                    SubCategory {
                        id: 12,
                        name: "鞋柜".into(),
                        pricing_unit: "米".into(),
                    },
                ],
            }],
            materials: vec![
                Material {
                    id: 5,
                    name: "实木颗粒板".into(),
                    dealer_price: Some(520.0),
                    owner_price: Some(680.0),
                },
                Material {
                    id: 6,
                    name: "多层实木".into(),
                    dealer_price: None,
                    owner_price: Some(880.0),
                },
            ],
            colors: vec![Color {
                id: 3,
                name: "暖白".into(),
            }],
        }
    }

    #[test]
    fn lookups_resolve_by_id() {
        let catalog = sample_catalog();
        assert_eq!(catalog.level1(1).map(|n| n.name.as_str()), Some("柜体"));
        assert_eq!(
            catalog.level2(1, 12).map(|c| c.pricing_unit.as_str()),
            Some("米")
        );
        assert!(catalog.level2(1, 99).is_none());
        assert!(catalog.level2(9, 11).is_none());
        assert_eq!(catalog.color(3).map(|c| c.name.as_str()), Some("暖白"));
    }

    #[test]
    fn unit_price_follows_quotation_type() {
        let catalog = sample_catalog();
        assert_eq!(catalog.unit_price(5, QuotationType::Dealer), Some(520.0));
        assert_eq!(catalog.unit_price(5, QuotationType::Owner), Some(680.0));
        // material without a dealer column
        assert_eq!(catalog.unit_price(6, QuotationType::Dealer), None);
        assert_eq!(catalog.unit_price(99, QuotationType::Owner), None);
    }
}
