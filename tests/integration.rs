//! Integration tests for the strategy engine.
//!
//! These tests load the bundled FY 2024/25 rule set from disk and cover:
//! - Progressive income tax and levy at bracket boundaries
//! - Superannuation contribution scenarios
//! - Mortgage offset interest and amortization
//! - Spouse contribution tax offset
//! - Projections and the strategy comparison
//! - Rule set loading errors

use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
use rust_decimal::Decimal;
use std::str::FromStr;

use strategy_engine::calculation::{
    CONCESSIONAL_CAP_EXCEEDED, HIGH_INCOME_SURCHARGE, OffsetCalculator, SpouseCalculator,
    SuperCalculator, TaxEngine, compound_growth, growth_series, project_with_strategy,
};
use strategy_engine::config::{InvestmentStrategy, RuleSet, RuleSetLoader};
use strategy_engine::error::{EngineError, ErrorKind};
use strategy_engine::models::{
    OffsetScenario, SpouseScenario, Strategy, StrategyComparison, SuperScenario,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn load_rules() -> RuleSet {
    RuleSetLoader::load("./config/au_2024_25.yaml").expect("Failed to load rule set")
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn super_scenario(income: &str, salary_sacrifice: &str, personal: &str) -> SuperScenario {
    SuperScenario {
        taxable_income: decimal(income),
        salary_sacrifice: decimal(salary_sacrifice),
        personal_deductible: decimal(personal),
        guarantee_rate_override: None,
        include_levy: true,
    }
}

fn offset_scenario(principal: &str, current: &str, additional: &str) -> OffsetScenario {
    OffsetScenario {
        principal: decimal(principal),
        annual_rate: decimal("0.06"),
        term_years: 30,
        current_offset_balance: decimal(current),
        additional_contribution: decimal(additional),
    }
}

// =============================================================================
// Rule Set Loading
// =============================================================================

#[test]
fn test_bundled_rule_set_loads() {
    let rules = load_rules();

    assert_eq!(rules.metadata().code, "AU-2024-25");
    assert_eq!(rules.brackets().len(), 5);
    assert!(rules.brackets().last().unwrap().max.is_none());
    assert_eq!(rules.concessional_cap(), decimal("30000"));
    assert_eq!(
        rules.investment_return(InvestmentStrategy::Growth),
        decimal("0.09")
    );
}

#[test]
fn test_missing_rule_set_file() {
    let err = RuleSetLoader::load("./config/does_not_exist.yaml").unwrap_err();

    assert!(matches!(err, EngineError::ConfigNotFound { .. }));
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn test_overlapping_brackets_fail_at_load() {
    let yaml = include_str!("../config/au_2024_25.yaml")
        .replace("{ min: 18201, max: 45000", "{ min: 18000, max: 45000");

    let err = RuleSetLoader::from_yaml_str(&yaml, "overlap.yaml").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().contains("overlaps"), "{}", err);
}

// =============================================================================
// Income Tax and Levy
// =============================================================================

#[test]
fn test_income_tax_at_bracket_boundaries() {
    let rules = load_rules();
    let engine = TaxEngine::new(&rules);

    let cases = [
        ("0", "0"),
        ("18200", "0"),
        ("45000", "4288"),
        ("80000", "14788"),
        ("135000", "31288"),
        ("190000", "51638"),
        ("200000", "56138"),
    ];

    for (income, expected) in cases {
        assert_eq!(
            engine.income_tax(decimal(income)),
            decimal(expected),
            "income tax on {}",
            income
        );
    }
}

#[test]
fn test_fractional_income_above_boundary() {
    let rules = load_rules();
    let engine = TaxEngine::new(&rules);

    // The half dollar above 45000 is taxed at the next bracket's 30%.
    assert_eq!(engine.income_tax(decimal("45000.50")), decimal("4288.15"));
    assert_eq!(engine.marginal_rate(decimal("45000.50"), false).unwrap(), decimal("0.30"));
}

#[test]
fn test_levy_cliff() {
    let rules = load_rules();
    let engine = TaxEngine::new(&rules);

    assert_eq!(engine.levy(decimal("24276"), true), decimal("0"));
    assert_eq!(engine.levy(decimal("24277"), true), decimal("485.54"));
    assert_eq!(engine.levy(decimal("80000"), false), decimal("0"));
}

#[test]
fn test_total_tax_and_take_home() {
    let rules = load_rules();
    let engine = TaxEngine::new(&rules);

    let result = engine.total_tax(decimal("80000"), true);
    assert_eq!(result.income_tax, decimal("14788"));
    assert_eq!(result.levy, decimal("1600"));
    assert_eq!(result.total_tax, decimal("16388"));
    assert_eq!(engine.take_home_pay(decimal("80000"), true), decimal("63612"));
}

#[test]
fn test_marginal_rate_of_negative_income_is_rejected() {
    let rules = load_rules();
    let err = TaxEngine::new(&rules)
        .marginal_rate(decimal("-1"), true)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
}

// =============================================================================
// Superannuation
// =============================================================================

#[test]
fn test_salary_sacrifice_scenario() {
    let rules = load_rules();
    let result = SuperCalculator::new(&rules)
        .evaluate(&super_scenario("80000", "10000", "0"))
        .unwrap();

    assert_eq!(result.employer_guarantee, decimal("9200"));
    assert_eq!(result.total_concessional, decimal("19200"));
    assert_eq!(result.taxable_income_after, decimal("70000"));
    assert_eq!(result.tax_before.total_tax, decimal("16388"));
    assert_eq!(result.tax_after.total_tax, decimal("13188"));
    assert_eq!(result.contributions_tax, decimal("1500"));
    assert_eq!(result.net_into_super, decimal("8500"));
    assert_eq!(result.tax_saving, decimal("1700"));
    assert_eq!(result.take_home_delta, decimal("-6800"));
    assert_eq!(result.marginal_rate, decimal("0.32"));
    assert!(!result.exceeds_cap);
    assert!(!result.high_income_surcharge_applies);
}

#[test]
fn test_personal_deductible_does_not_reduce_taxable_income() {
    let rules = load_rules();
    let result = SuperCalculator::new(&rules)
        .evaluate(&super_scenario("80000", "0", "5000"))
        .unwrap();

    assert_eq!(result.taxable_income_after, decimal("80000"));
    assert_eq!(result.contributions_tax, decimal("750"));
    assert_eq!(result.take_home_delta, decimal("-5000"));
}

#[test]
fn test_cap_and_surcharge_advisories() {
    let rules = load_rules();
    let result = SuperCalculator::new(&rules)
        .evaluate(&super_scenario("260000", "5000", "0"))
        .unwrap();

    assert!(result.exceeds_cap);
    assert!(result.high_income_surcharge_applies);
    assert!(result.audit_trace.has_warning(CONCESSIONAL_CAP_EXCEEDED));
    assert!(result.audit_trace.has_warning(HIGH_INCOME_SURCHARGE));
    // (29900 + 5000) x 0.15
    assert_eq!(result.high_income_surcharge_estimate, decimal("5235"));
}

#[test]
fn test_salary_sacrifice_larger_than_income() {
    let rules = load_rules();
    let result = SuperCalculator::new(&rules)
        .evaluate(&super_scenario("10000", "15000", "0"))
        .unwrap();

    assert_eq!(result.taxable_income_after, decimal("0"));
    assert_eq!(result.tax_after.total_tax, decimal("0"));
}

// =============================================================================
// Mortgage Offset
// =============================================================================

#[test]
fn test_offset_example_scenario() {
    let result = OffsetCalculator::new()
        .evaluate(&offset_scenario("500000", "50000", "10000"))
        .unwrap();

    assert_eq!(result.interest_saved_year1, decimal("600"));
    assert_eq!(result.monthly_interest_saving, decimal("50"));
    assert_eq!(result.years_off_loan, decimal("20.80"));
    assert!(result.total_interest_saved > decimal("69502"));
    assert!(result.total_interest_saved < decimal("69504"));
}

#[test]
fn test_offset_simulation_beats_closed_form_without_offset() {
    let calculator = OffsetCalculator::new();
    let scenario = offset_scenario("500000", "50000", "10000");

    let simulation = calculator.simulate(&scenario).unwrap();
    let result = calculator.evaluate(&scenario).unwrap();

    assert_eq!(simulation.months_to_payoff, 266);
    assert_eq!(simulation.monthly_repayment, result.monthly_repayment);
    assert!(simulation.total_interest < result.total_interest_without_offset);
}

// =============================================================================
// Spouse Contribution
// =============================================================================

#[test]
fn test_spouse_offset_taper() {
    let rules = load_rules();
    let calculator = SpouseCalculator::new(&rules);

    let cases = [
        ("30000", "540"),
        ("37000", "540"),
        ("38500", "270"),
        ("40000", "0"),
        ("55000", "0"),
    ];

    for (income, expected) in cases {
        let result = calculator
            .evaluate(&SpouseScenario {
                spouse_income: decimal(income),
                contribution_amount: decimal("3000"),
            })
            .unwrap();
        assert_eq!(result.tax_offset, decimal(expected), "spouse income {}", income);
    }
}

// =============================================================================
// Projection and Comparison
// =============================================================================

#[test]
fn test_projection_with_strategy() {
    let rules = load_rules();

    let balance = project_with_strategy(
        decimal("50000"),
        decimal("10000"),
        InvestmentStrategy::Balanced,
        1,
        &rules,
    )
    .unwrap();
    assert_eq!(balance, decimal("64200"));

    let series = growth_series(decimal("50000"), decimal("10000"), decimal("0.07"), 5).unwrap();
    assert_eq!(series.len(), 6);
    assert_eq!(series[1].balance, balance);
}

#[test]
fn test_comparison_runs_every_calculator() {
    let rules = load_rules();
    let comparison = StrategyComparison::evaluate(
        &rules,
        &super_scenario("80000", "10000", "0"),
        &offset_scenario("500000", "50000", "10000"),
        &SpouseScenario {
            spouse_income: decimal("30000"),
            contribution_amount: decimal("3000"),
        },
    )
    .unwrap();

    assert_eq!(comparison.superannuation.tax_saving, decimal("1700"));
    assert_eq!(comparison.offset.interest_saved_year1, decimal("600"));
    assert_eq!(comparison.spouse.tax_offset, decimal("540"));
    assert_eq!(
        comparison.best_annual_benefit,
        Some(Strategy::SuperContribution)
    );
    assert!(comparison.warnings.is_empty());
}

#[test]
fn test_results_serialize_decimals_as_strings() {
    let result = OffsetCalculator::new()
        .evaluate(&offset_scenario("500000", "50000", "10000"))
        .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["interest_saved_year1"], "600.00");
    assert_eq!(json["fully_offset"], false);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_income_tax_is_non_decreasing(a in 0u32..400_000, b in 0u32..400_000) {
        let rules = load_rules();
        let engine = TaxEngine::new(&rules);
        let (low, high) = if a <= b { (a, b) } else { (b, a) };

        prop_assert!(engine.income_tax(Decimal::from(low)) <= engine.income_tax(Decimal::from(high)));
    }

    #[test]
    fn prop_super_evaluate_is_idempotent(income in 0u32..400_000, sacrifice in 0u32..40_000) {
        let rules = load_rules();
        let calculator = SuperCalculator::new(&rules);
        let scenario = SuperScenario {
            taxable_income: Decimal::from(income),
            salary_sacrifice: Decimal::from(sacrifice),
            personal_deductible: Decimal::ZERO,
            guarantee_rate_override: None,
            include_levy: true,
        };

        prop_assert_eq!(calculator.evaluate(&scenario).unwrap(), calculator.evaluate(&scenario).unwrap());
    }

    #[test]
    fn prop_zero_rate_growth_is_identity(balance in 0u32..10_000_000, years in 0u32..50) {
        let x = Decimal::from(balance);
        prop_assert_eq!(compound_growth(x, Decimal::ZERO, Decimal::ZERO, years).unwrap(), x);
    }
}
