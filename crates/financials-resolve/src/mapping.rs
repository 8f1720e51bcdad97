//! Field mapping table.
//!
//! Filers tag the same concept with different XBRL elements, and the
//! taxonomy renames elements over time. The mapping table lists, for every
//! canonical field, the candidate elements in order of preference and how to
//! combine them. The table is configuration data: [`MappingTable::standard`]
//! is built in, and alternative versions can be loaded from JSON.

use std::collections::HashSet;

use financials_core::{Field, FinancialsError, Result};
use serde::{Deserialize, Serialize};

/// How a canonical field is resolved.
///
/// Every rule first tries `tags` in order; the first element that resolves
/// wins. Composite rules only apply when none of `tags` resolves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// First element that resolves.
    FirstOf {
        /// Candidate elements, most preferred first.
        tags: Vec<String>,
    },
    /// Sum of whichever `components` resolve.
    SumOf {
        /// Aggregate elements, most preferred first.
        tags: Vec<String>,
        /// Sub-component elements, each resolved independently.
        components: Vec<String>,
    },
    /// Gross profit − operating expenses + depreciation/amortization addback.
    Ebitda {
        /// Elements reporting the figure directly.
        #[serde(default)]
        tags: Vec<String>,
        /// Addback elements, most preferred first.
        addback: Vec<String>,
    },
    /// Operating + investing + financing cash flow − exchange-rate effect.
    CashChange {
        /// Elements reporting the change in cash directly.
        #[serde(default)]
        tags: Vec<String>,
        /// Exchange-rate effect elements, most preferred first.
        fx_effect: Vec<String>,
    },
}

impl Rule {
    /// Elements that report the field directly.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        match self {
            Self::FirstOf { tags }
            | Self::SumOf { tags, .. }
            | Self::Ebitda { tags, .. }
            | Self::CashChange { tags, .. } => tags,
        }
    }

    /// Fields that must be resolved before this rule can be applied.
    #[must_use]
    pub const fn dependencies(&self) -> &'static [Field] {
        match self {
            Self::FirstOf { .. } | Self::SumOf { .. } => &[],
            Self::Ebitda { .. } => &[Field::GrossProfit, Field::OperatingExpenses],
            Self::CashChange { .. } => &[
                Field::OperatingCashFlow,
                Field::InvestingCashFlow,
                Field::FinancingCashFlow,
            ],
        }
    }
}

const fn record_history() -> bool {
    true
}

/// Resolution rule of one canonical field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Canonical field.
    pub field: Field,
    /// Resolution rule.
    #[serde(flatten)]
    pub rule: Rule,
    /// Whether superseded candidates are written to history.
    #[serde(default = "record_history")]
    pub history: bool,
}

impl FieldSpec {
    fn first_of(field: Field, tags: &[&str]) -> Self {
        Self {
            field,
            rule: Rule::FirstOf { tags: owned(tags) },
            history: true,
        }
    }
}

fn owned(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|t| (*t).to_string()).collect()
}

/// Versioned list of field rules, applied in order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingTable {
    /// Version label of this table.
    pub version: String,
    /// Field rules in resolution order.
    pub fields: Vec<FieldSpec>,
}

impl MappingTable {
    /// The built-in table covering every [`Field`].
    #[must_use]
    pub fn standard() -> Self {
        use Field::*;

        let fields = vec![
            // Balance sheet
            FieldSpec::first_of(Assets, &["Assets"]),
            FieldSpec::first_of(
                Cash,
                &[
                    "Cash",
                    "CashAndCashEquivalentsAtCarryingValue",
                    "CashCashEquivalentsRestrictedCashAndRestrictedCashEquivalents",
                ],
            ),
            FieldSpec::first_of(CurrentAssets, &["AssetsCurrent"]),
            FieldSpec::first_of(PpeNet, &["PropertyPlantAndEquipmentNet"]),
            FieldSpec::first_of(PpeGross, &["PropertyPlantAndEquipmentGross"]),
            FieldSpec::first_of(CurrentLiabilities, &["LiabilitiesCurrent"]),
            FieldSpec {
                field: LongTermDebt,
                rule: Rule::SumOf {
                    tags: owned(&["LongTermDebt"]),
                    components: owned(&["LongTermDebtCurrent", "LongTermDebtNoncurrent"]),
                },
                history: true,
            },
            FieldSpec::first_of(
                Equity,
                &[
                    "CommonStockholdersEquity",
                    "StockholdersEquity",
                    "StockholdersEquityIncludingPortionAttributableToNoncontrollingInterest",
                    "PartnersCapitalIncludingPortionAttributableToNoncontrollingInterest",
                    "PartnersCapital",
                    "MemberEquity",
                    "AssetsNet",
                ],
            ),
            // Income statement
            FieldSpec::first_of(
                Sales,
                &[
                    "SalesRevenueNet",
                    "Revenues",
                    "RevenueFromContractWithCustomerExcludingAssessedTax",
                    "RevenueFromContractWithCustomerIncludingAssessedTax",
                ],
            ),
            FieldSpec::first_of(
                Cogs,
                &["CostOfGoodsAndServicesSold", "CostOfGoodsSold", "CostOfRevenue"],
            ),
            FieldSpec::first_of(GrossProfit, &["GrossProfit"]),
            FieldSpec::first_of(Research, &["ResearchAndDevelopmentExpense"]),
            FieldSpec::first_of(Sga, &["SellingGeneralAndAdministrativeExpense"]),
            FieldSpec::first_of(
                OperatingExpenses,
                &["OperatingCostsAndExpenses", "OperatingExpenses"],
            ),
            FieldSpec {
                field: Ebitda,
                rule: Rule::Ebitda {
                    tags: Vec::new(),
                    addback: owned(&[
                        "DepreciationAndAmortization",
                        "DepreciationDepletionAndAmortization",
                    ]),
                },
                history: true,
            },
            FieldSpec::first_of(IncomeTax, &["IncomeTaxesPaid", "IncomeTaxesPaidNet"]),
            FieldSpec::first_of(
                NetIncome,
                &[
                    "NetIncomeLoss",
                    "ProfitLoss",
                    "NetIncomeLossAvailableToCommonStockholdersBasic",
                ],
            ),
            FieldSpec::first_of(
                OperatingIncome,
                &[
                    "IncomeLossFromContinuingOperationsBeforeIncomeTaxesExtraordinaryItemsNoncontrollingInterest",
                    "IncomeLossFromContinuingOperationsBeforeIncomeTaxesMinorityInterestAndIncomeLossFromEquityMethodInvestments",
                ],
            ),
            // Cash flow
            FieldSpec::first_of(
                OperatingCashFlow,
                &[
                    "NetCashProvidedByUsedInOperatingActivities",
                    "NetCashProvidedByUsedInOperatingActivitiesContinuingOperations",
                ],
            ),
            FieldSpec::first_of(Depreciation, &["Depreciation"]),
            FieldSpec::first_of(
                InvestingCashFlow,
                &[
                    "NetCashProvidedByUsedInInvestingActivities",
                    "NetCashProvidedByUsedInInvestingActivitiesContinuingOperations",
                ],
            ),
            FieldSpec::first_of(
                CapitalExpenditures,
                &["PaymentsToAcquirePropertyPlantAndEquipment"],
            ),
            FieldSpec::first_of(
                FinancingCashFlow,
                &[
                    "NetCashProvidedByUsedInFinancingActivities",
                    "NetCashProvidedByUsedInFinancingActivitiesContinuingOperations",
                ],
            ),
            FieldSpec::first_of(
                Dividends,
                &["PaymentsOfDividends", "PaymentsOfDividendsCommonStock"],
            ),
            FieldSpec {
                field: CashChange,
                rule: Rule::CashChange {
                    tags: owned(&[
                        "CashAndCashEquivalentsPeriodIncreaseDecrease",
                        "CashCashEquivalentsRestrictedCashAndRestrictedCashEquivalentsPeriodIncreaseDecreaseIncludingExchangeRateEffect",
                    ]),
                    fx_effect: owned(&[
                        "EffectOfExchangeRateOnCashAndCashEquivalents",
                        "EffectOfExchangeRateOnCashAndCashEquivalentsContinuingOperations",
                    ]),
                },
                history: true,
            },
        ];

        Self {
            version: "3".to_string(),
            fields,
        }
    }

    /// Loads and validates a table from JSON.
    ///
    /// # Errors
    /// Returns [`FinancialsError::Config`] if the JSON is malformed or the
    /// table fails [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(json)
            .map_err(|e| FinancialsError::Config(format!("Failed to parse mapping table: {}", e)))?;
        table.validate()?;
        Ok(table)
    }

    /// Serializes the table to pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`FinancialsError::Config`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| FinancialsError::Config(e.to_string()))
    }

    /// Checks that every field appears once, that composite rules come after
    /// the fields they depend on, and that no rule is empty.
    ///
    /// # Errors
    /// Returns [`FinancialsError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for spec in &self.fields {
            for dependency in spec.rule.dependencies() {
                if !seen.contains(dependency) {
                    return Err(FinancialsError::Config(format!(
                        "{} depends on {}, which must be listed before it",
                        spec.field, dependency
                    )));
                }
            }
            if !seen.insert(spec.field) {
                return Err(FinancialsError::Config(format!(
                    "{} is listed more than once",
                    spec.field
                )));
            }
            let empty = match &spec.rule {
                Rule::FirstOf { tags } => tags.is_empty(),
                Rule::SumOf { components, .. } => components.is_empty(),
                Rule::Ebitda { addback, .. } => addback.is_empty(),
                Rule::CashChange { .. } => false,
            };
            if empty {
                return Err(FinancialsError::Config(format!(
                    "{} has no candidate elements",
                    spec.field
                )));
            }
        }
        Ok(())
    }

    /// Rule for `field`, if the table covers it.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.field == field)
    }

    /// Field rules in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }
}

impl Default for MappingTable {
    fn default() -> Self {
        Self::standard()
    }
}
