use fincalc_core::calculators::brrrr::{self, BrrrrInput};
use fincalc_core::{CalcError, CalculatorRegistry, Horizon, InputRecord, Settings};
use serde_json::json;

fn registry() -> CalculatorRegistry {
    CalculatorRegistry::builtin(&Settings::default()).unwrap()
}

fn record(value: serde_json::Value) -> InputRecord {
    InputRecord::from_value(value).unwrap()
}

#[test]
fn test_every_example_validates_and_calculates() {
    let registry = registry();
    for descriptor in registry.list() {
        assert!(!descriptor.examples.is_empty(), "{} has no examples", descriptor.id);
        for example in &descriptor.examples {
            let validation = registry.validate(&descriptor.id, &example.inputs).unwrap();
            assert!(
                validation.is_valid,
                "{} / {}: {:?}",
                descriptor.id,
                example.title,
                validation.errors
            );
            let outputs = registry.calculate(&descriptor.id, &example.inputs);
            assert!(outputs.is_ok(), "{} / {}: {:?}", descriptor.id, example.title, outputs);
        }
    }
}

#[test]
fn test_declared_outputs_are_present() {
    let registry = registry();
    for descriptor in registry.list() {
        let example = &descriptor.examples[0];
        let outputs = registry.calculate(&descriptor.id, &example.inputs).unwrap();
        for output in &descriptor.outputs {
            assert!(
                outputs.values.contains_key(&output.id),
                "{} is missing output {}",
                descriptor.id,
                output.id
            );
        }
    }
}

#[test]
fn test_calculation_is_idempotent() {
    let registry = registry();
    for descriptor in registry.list() {
        let inputs = &descriptor.examples[0].inputs;
        let first = registry.calculate(&descriptor.id, inputs).unwrap();
        let second = registry.calculate(&descriptor.id, inputs).unwrap();
        assert_eq!(first, second, "{}", descriptor.id);
    }
}

#[test]
fn test_descriptor_json_is_camel_case() {
    let registry = registry();
    let descriptor = registry.get("rate-lock").unwrap().descriptor();
    let json = serde_json::to_value(descriptor).unwrap();

    assert_eq!(json["id"], "rate-lock");
    assert_eq!(json["category"], "finance");
    let loan_term = json["inputs"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["id"] == "loanTerm")
        .unwrap();
    assert_eq!(loan_term["type"], "number");
    assert_eq!(loan_term["defaultValue"], 30.0);
    assert!(loan_term.get("default_value").is_none());
}

#[test]
fn test_required_fields_fail_fast() {
    let registry = registry();
    // loanAmount is out of range, but the missing fields are reported alone
    let validation = registry
        .validate("mortgage-points", &record(json!({ "loanAmount": 5 })))
        .unwrap();
    assert!(!validation.is_valid);
    assert_eq!(validation.errors.len(), 2);
    assert!(validation.has_error_for("baseInterestRate"));
    assert!(validation.has_error_for("discountPoints"));
    assert!(!validation.has_error_for("loanAmount"));
    assert_eq!(validation.errors[0].message, "Base Interest Rate is required");
}

#[test]
fn test_range_bounds_are_inclusive() {
    let registry = registry();
    let at_min = record(json!({
        "loanAmount": 10_000,
        "baseInterestRate": 20,
        "discountPoints": 0
    }));
    assert!(registry.validate("mortgage-points", &at_min).unwrap().is_valid);

    let below_min = record(json!({
        "loanAmount": 9_999.99,
        "baseInterestRate": 6.5,
        "discountPoints": 1
    }));
    let validation = registry.validate("mortgage-points", &below_min).unwrap();
    assert_eq!(
        validation.error_messages(),
        vec!["Loan Amount must be at least $10,000"]
    );
}

#[test]
fn test_select_options_are_enforced() {
    let registry = registry();
    let inputs = record(json!({
        "loanAmount": 300_000,
        "currentRate": 6.5,
        "lockPeriodDays": 45,
        "daysToClosing": 30,
        "marketVolatility": "extreme"
    }));
    let validation = registry.validate("rate-lock", &inputs).unwrap();
    assert_eq!(
        validation.error_messages(),
        vec!["Market Volatility must be one of: low, moderate, high"]
    );
}

#[test]
fn test_blank_strings_count_as_missing() {
    let registry = registry();
    let inputs = record(json!({
        "loanAmount": "  ",
        "baseInterestRate": 6.5,
        "discountPoints": 1
    }));
    let validation = registry.validate("mortgage-points", &inputs).unwrap();
    assert!(validation.has_error_for("loanAmount"));
}

#[test]
fn test_invalid_record_returns_validation_failed() {
    let registry = registry();
    let inputs = record(json!({
        "purchasePrice": 150_000,
        "downPayment": 200_000,
        "rehabCost": 25_000,
        "closingCosts": 8_000,
        "purchaseLoanRate": 7.5,
        "purchaseLoanTerm": 30,
        "afterRepairValue": 220_000,
        "monthlyRent": 1_800,
        "monthlyExpenses": 400,
        "refinanceRate": 6.5,
        "refinanceTerm": 30,
        "refinanceLTV": 75
    }));
    let err = registry.calculate("brrrr", &inputs).unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_FAILED");
    assert!(err.validation_issues().iter().any(|i| i.field == "downPayment"));
    assert!(matches!(err, CalcError::ValidationFailed { .. }));
}

#[test]
fn test_brrrr_scenario_through_records() {
    let registry = registry();
    let inputs = record(json!({
        "purchasePrice": 150_000,
        "downPayment": 30_000,
        "rehabCost": 25_000,
        "closingCosts": 8_000,
        "purchaseLoanRate": 7.5,
        "purchaseLoanTerm": 30,
        "afterRepairValue": 220_000,
        "monthlyRent": 1_800,
        "monthlyExpenses": 400,
        "refinanceRate": 6.5,
        "refinanceTerm": 30,
        "refinanceLTV": 75
    }));
    let outputs = registry.calculate("brrrr", &inputs).unwrap();
    assert_eq!(outputs.number("totalInvestment"), Some(63_000.0));

    let annual = outputs.number("annualCashFlow").unwrap();
    let coc = outputs.number("cashOnCashReturn").unwrap();
    assert!((coc - annual / 63_000.0 * 100.0).abs() < 1e-9);

    // The typed API agrees with the record API
    let typed = brrrr::calculate(&BrrrrInput::default()).unwrap();
    assert_eq!(outputs.number("annualCashFlow"), Some(typed.annual_cash_flow));
}

#[test]
fn test_usda_income_scenario_through_records() {
    let registry = registry();
    let base = json!({
        "purchasePrice": 250_000,
        "householdSize": 4,
        "creditScore": 700,
        "interestRate": 6.25
    });

    let mut above = base.clone();
    above["annualHouseholdIncome"] = json!(112_450.0 * 1.15 + 500.0);
    let outputs = registry.calculate("usda-loan", &record(above)).unwrap();
    assert_eq!(outputs.text("incomeEligibility"), Some("Not Eligible"));

    let mut at_limit = base;
    at_limit["annualHouseholdIncome"] = json!(112_450);
    let outputs = registry.calculate("usda-loan", &record(at_limit)).unwrap();
    assert_eq!(outputs.text("incomeEligibility"), Some("Eligible"));
}

#[test]
fn test_mortgage_points_break_even_scenario() {
    let registry = registry();
    let inputs = record(json!({
        "loanAmount": "300,000",
        "baseInterestRate": 6.75,
        "discountPoints": 2,
        "loanTerm": 30
    }));
    let outputs = registry.calculate("mortgage-points", &inputs).unwrap();
    let horizon: Horizon =
        serde_json::from_value(outputs.get("breakEvenMonths").unwrap().clone()).unwrap();
    let months = horizon.periods().unwrap();
    let expected =
        outputs.number("pointsCost").unwrap() / outputs.number("monthlySavings").unwrap();
    assert!((months - expected).abs() < 1e-9);
}

#[test]
fn test_warnings_do_not_block() {
    let registry = registry();
    let inputs = record(json!({
        "loanAmount": 300_000,
        "baseInterestRate": 12,
        "discountPoints": 4.5
    }));
    let outputs = registry.calculate("mortgage-points", &inputs).unwrap();
    assert!(outputs.warnings.iter().any(|w| w.field == "baseInterestRate"));
    assert!(outputs.warnings.iter().any(|w| w.field == "discountPoints"));
}
