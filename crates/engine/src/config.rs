use serde::Deserialize;

use crate::error::PipelineError;
use crate::normalize::DEFAULT_STRIP_CHARS;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub catalog: CatalogConfig,
    pub demand: DemandConfig,
    #[serde(default)]
    pub sales: Option<SalesConfig>,
    #[serde(default = "default_strip_chars")]
    pub strip_chars: Vec<char>,
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,
    #[serde(default)]
    pub tie_break: TieBreakConfig,
    #[serde(default)]
    pub fail_on_conflicts: bool,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_strip_chars() -> Vec<char> {
    DEFAULT_STRIP_CHARS.to_vec()
}

/// The eight canonical reporting regions. Overridable per run; order fixes
/// the column order of the aggregate relation.
fn default_regions() -> Vec<String> {
    [
        "North America",
        "Mexico",
        "Puerto Rico",
        "Europe",
        "Africa",
        "Central America",
        "South America",
        "Middle East",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The wide equivalence catalog: one row per internal SKU, one configured
/// column per brand. Brand columns are configuration data, not code: adding
/// a brand is a config entry, never a structural change.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub file: String,
    pub sku_column: String,
    pub brands: Vec<BrandColumn>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrandColumn {
    pub column: String,
    pub label: String,
}

// ---------------------------------------------------------------------------
// Demand + Sales
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DemandConfig {
    pub file: String,
    pub columns: DemandColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DemandColumns {
    pub record_id: String,
    pub brand: String,
    pub part_number: String,
    pub quantity: String,
    pub region: String,
    pub period: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SalesConfig {
    pub file: String,
    pub columns: SalesColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SalesColumns {
    pub sku: String,
    pub region: String,
    pub quantity: String,
}

// ---------------------------------------------------------------------------
// Tie-break
// ---------------------------------------------------------------------------

/// Order used to pick exactly one winner per ambiguous canonical key.
///
/// `brand_lexical` sorts candidates by (brand label, SKU) ascending.
/// `brand_priority` sorts by position in `priority` first; brands not listed
/// sort after every listed brand, lexically.
#[derive(Debug, Clone, Deserialize)]
pub struct TieBreakConfig {
    #[serde(default)]
    pub strategy: TieBreakStrategy,
    #[serde(default)]
    pub priority: Vec<String>,
}

impl Default for TieBreakConfig {
    fn default() -> Self {
        Self {
            strategy: TieBreakStrategy::BrandLexical,
            priority: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreakStrategy {
    BrandLexical,
    BrandPriority,
}

impl Default for TieBreakStrategy {
    fn default() -> Self {
        Self::BrandLexical
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default)]
    pub json: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl PipelineConfig {
    pub fn from_toml(input: &str) -> Result<Self, PipelineError> {
        let config: PipelineConfig =
            toml::from_str(input).map_err(|e| PipelineError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.catalog.sku_column.is_empty() {
            return Err(PipelineError::ConfigValidation(
                "catalog.sku_column must not be empty".into(),
            ));
        }

        if self.catalog.brands.is_empty() {
            return Err(PipelineError::ConfigValidation(
                "at least one brand column is required".into(),
            ));
        }

        for brand in &self.catalog.brands {
            if brand.column.is_empty() || brand.label.is_empty() {
                return Err(PipelineError::ConfigValidation(
                    "brand column and label must not be empty".into(),
                ));
            }
        }

        for (i, brand) in self.catalog.brands.iter().enumerate() {
            for other in &self.catalog.brands[i + 1..] {
                if brand.column == other.column {
                    return Err(PipelineError::ConfigValidation(format!(
                        "duplicate brand column '{}'",
                        brand.column
                    )));
                }
                if brand.label == other.label {
                    return Err(PipelineError::ConfigValidation(format!(
                        "duplicate brand label '{}'",
                        brand.label
                    )));
                }
            }
        }

        // An empty region list would silently drop every subtotal; refuse to run.
        if self.regions.is_empty() {
            return Err(PipelineError::ConfigValidation(
                "at least one region is required".into(),
            ));
        }

        for (i, region) in self.regions.iter().enumerate() {
            if region.is_empty() {
                return Err(PipelineError::ConfigValidation(
                    "region labels must not be empty".into(),
                ));
            }
            if self.regions[i + 1..].contains(region) {
                return Err(PipelineError::ConfigValidation(format!(
                    "duplicate region '{region}'"
                )));
            }
        }

        match self.tie_break.strategy {
            TieBreakStrategy::BrandPriority => {
                if self.tie_break.priority.is_empty() {
                    return Err(PipelineError::ConfigValidation(
                        "tie_break strategy 'brand_priority' requires a priority list".into(),
                    ));
                }
                for (i, brand) in self.tie_break.priority.iter().enumerate() {
                    if self.tie_break.priority[i + 1..].contains(brand) {
                        return Err(PipelineError::ConfigValidation(format!(
                            "duplicate brand '{brand}' in tie_break priority"
                        )));
                    }
                }
            }
            TieBreakStrategy::BrandLexical => {
                if !self.tie_break.priority.is_empty() {
                    return Err(PipelineError::ConfigValidation(
                        "tie_break priority is only used with strategy = 'brand_priority'".into(),
                    ));
                }
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
name = "Aftermarket Benchmarking"

[catalog]
file = "catalog.csv"
sku_column = "InternalSku"
brands = [
    { column = "OEM", label = "OEM" },
    { column = "Moog", label = "Moog" },
    { column = "MAS", label = "MAS" },
]

[demand]
file = "demand.csv"

[demand.columns]
record_id   = "id"
brand       = "brand"
part_number = "part_number"
quantity    = "annual_qty"
region      = "region"
period      = "period"
"#;

    #[test]
    fn parse_valid_with_defaults() {
        let config = PipelineConfig::from_toml(VALID).unwrap();
        assert_eq!(config.name, "Aftermarket Benchmarking");
        assert_eq!(config.catalog.brands.len(), 3);
        assert_eq!(config.strip_chars, vec!['-', '.', ' ', '/']);
        assert_eq!(config.regions.len(), 8);
        assert_eq!(config.regions[0], "North America");
        assert_eq!(config.tie_break.strategy, TieBreakStrategy::BrandLexical);
        assert!(!config.fail_on_conflicts);
        assert!(config.sales.is_none());
        assert!(config.output.dir.is_none());
    }

    #[test]
    fn parse_custom_strip_and_regions() {
        // Top-level keys must precede the first table.
        let input = format!(
            "strip_chars = [\"-\", \"_\"]\nregions = [\"North America\", \"Europe\"]\n{VALID}"
        );
        let config = PipelineConfig::from_toml(&input).unwrap();
        assert_eq!(config.strip_chars, vec!['-', '_']);
        assert_eq!(config.regions, vec!["North America", "Europe"]);
    }

    #[test]
    fn parse_sales_section() {
        let input = format!(
            r#"{VALID}
[sales]
file = "sales.csv"

[sales.columns]
sku      = "sku"
region   = "region"
quantity = "sold"
"#
        );
        let config = PipelineConfig::from_toml(&input).unwrap();
        let sales = config.sales.unwrap();
        assert_eq!(sales.file, "sales.csv");
        assert_eq!(sales.columns.quantity, "sold");
    }

    #[test]
    fn parse_brand_priority() {
        let input = format!(
            r#"{VALID}
[tie_break]
strategy = "brand_priority"
priority = ["OEM", "Moog"]
"#
        );
        let config = PipelineConfig::from_toml(&input).unwrap();
        assert_eq!(config.tie_break.strategy, TieBreakStrategy::BrandPriority);
        assert_eq!(config.tie_break.priority, vec!["OEM", "Moog"]);
    }

    #[test]
    fn reject_empty_region_list() {
        let input = format!("regions = []\n{VALID}");
        let err = PipelineConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("at least one region"));
    }

    #[test]
    fn reject_duplicate_region() {
        let input = format!("regions = [\"Europe\", \"Europe\"]\n{VALID}");
        let err = PipelineConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("duplicate region"));
    }

    #[test]
    fn reject_duplicate_brand_label() {
        let input = r#"
name = "Bad"

[catalog]
file = "catalog.csv"
sku_column = "InternalSku"
brands = [
    { column = "Moog", label = "Moog" },
    { column = "MoogAlt", label = "Moog" },
]

[demand]
file = "demand.csv"

[demand.columns]
record_id   = "id"
brand       = "brand"
part_number = "part_number"
quantity    = "annual_qty"
region      = "region"
period      = "period"
"#;
        let err = PipelineConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("duplicate brand label 'Moog'"));
    }

    #[test]
    fn reject_empty_brand_list() {
        let input = VALID.replace(
            r#"brands = [
    { column = "OEM", label = "OEM" },
    { column = "Moog", label = "Moog" },
    { column = "MAS", label = "MAS" },
]"#,
            "brands = []",
        );
        let err = PipelineConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("at least one brand column"));
    }

    #[test]
    fn reject_priority_without_strategy() {
        let input = format!(
            r#"{VALID}
[tie_break]
priority = ["OEM"]
"#
        );
        let err = PipelineConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("brand_priority"));
    }

    #[test]
    fn reject_brand_priority_without_list() {
        let input = format!(
            r#"{VALID}
[tie_break]
strategy = "brand_priority"
"#
        );
        let err = PipelineConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("requires a priority list"));
    }

    #[test]
    fn reject_unknown_strategy() {
        let input = format!(
            r#"{VALID}
[tie_break]
strategy = "brand_lexicographic"
"#
        );
        assert!(PipelineConfig::from_toml(&input).is_err());
    }
}
