use super::common::*;
use crate::lending::eligibility::{
    EligibilityConfig, EligibilityDecision, EligibilityEngine, RejectionReason, RiskTier,
};
use crate::lending::installment::monthly_installment;
use crate::lending::request::LoanTerms;
use crate::lending::scoring::CreditScore;

fn terms(amount: f64, rate: f64, tenure: i64) -> LoanTerms {
    LoanTerms::new(amount, rate, tenure).expect("valid terms")
}

#[test]
fn tiers_are_open_below_and_closed_above() {
    let cases = [
        (100, RiskTier::Prime),
        (51, RiskTier::Prime),
        (50, RiskTier::Elevated),
        (31, RiskTier::Elevated),
        (30, RiskTier::HighRisk),
        (11, RiskTier::HighRisk),
        (10, RiskTier::Declined),
        (0, RiskTier::Declined),
    ];
    for (score, expected) in cases {
        assert_eq!(
            RiskTier::for_score(CreditScore::clamped(score)),
            expected,
            "score {score}"
        );
    }
}

#[test]
fn prime_scores_keep_the_requested_rate() {
    let engine = evaluation_engine();
    let borrower = customer(1, 50_000);

    let outcome = engine
        .evaluate(&borrower, &terms(100_000.0, 10.0, 12), CreditScore::clamped(60))
        .expect("evaluates");

    assert!(outcome.approved());
    assert_eq!(outcome.tier, RiskTier::Prime);
    assert_eq!(outcome.requested_rate, 10.0);
    assert_eq!(outcome.applied_rate, 10.0);
    let installment = outcome.installment().expect("installment present");
    assert!((installment - 8_791.59).abs() < 0.01, "got {installment}");
}

#[test]
fn boundary_scores_resolve_deterministically() {
    let engine = evaluation_engine();
    let borrower = customer(1, 50_000);
    let request = terms(100_000.0, 10.0, 12);

    let at = |score: i32| {
        engine
            .evaluate(&borrower, &request, CreditScore::clamped(score))
            .expect("evaluates")
    };

    let at_51 = at(51);
    assert!(at_51.approved());
    assert_eq!(at_51.applied_rate, 10.0);

    let at_50 = at(50);
    assert!(at_50.approved());
    assert_eq!(at_50.applied_rate, 12.0);

    let at_30 = at(30);
    assert!(at_30.approved());
    assert_eq!(at_30.applied_rate, 16.0);

    let at_10 = at(10);
    assert!(!at_10.approved());
    assert_eq!(at_10.applied_rate, 10.0);
    assert!(at_10.installment().is_none());
    assert_eq!(
        at_10.rejection(),
        Some(&RejectionReason::CreditScore {
            score: CreditScore::clamped(10)
        })
    );
}

#[test]
fn score_fifty_keeps_a_rate_already_above_the_floor() {
    let engine = evaluation_engine();
    let borrower = customer(1, 50_000);

    let outcome = engine
        .evaluate(&borrower, &terms(100_000.0, 14.0, 12), CreditScore::clamped(50))
        .expect("evaluates");

    assert!(outcome.approved());
    assert_eq!(outcome.applied_rate, 14.0);
}

#[test]
fn corrected_rate_feeds_the_installment() {
    let engine = evaluation_engine();
    let borrower = customer(1, 50_000);

    let outcome = engine
        .evaluate(&borrower, &terms(100_000.0, 8.0, 12), CreditScore::clamped(20))
        .expect("evaluates");

    let expected = monthly_installment(100_000.0, 16.0, 12).expect("valid terms");
    assert_eq!(outcome.installment(), Some(expected));
}

#[test]
fn affordability_gate_rejects_with_its_own_reason() {
    let engine = evaluation_engine();
    let borrower = customer(1, 40_000);

    let outcome = engine
        .evaluate(&borrower, &terms(500_000.0, 10.0, 12), CreditScore::clamped(90))
        .expect("evaluates");

    assert!(!outcome.approved());
    assert!(outcome.installment().is_none());
    match outcome.decision {
        EligibilityDecision::Rejected(RejectionReason::Affordability { installment, limit }) => {
            assert_eq!(limit, 20_000.0);
            assert!(installment > limit);
        }
        other => panic!("expected affordability rejection, got {other:?}"),
    }
}

#[test]
fn installment_exactly_at_the_limit_is_affordable() {
    let engine = EligibilityEngine::new(EligibilityConfig::default());
    let borrower = customer(1, 20_000);

    // 120,000 over 12 months at 0% is exactly half of 20,000.
    let outcome = engine
        .evaluate(&borrower, &terms(120_000.0, 0.0, 12), CreditScore::clamped(80))
        .expect("evaluates");

    assert_eq!(outcome.installment(), Some(10_000.0));
}

#[test]
fn affordability_ratio_is_configurable() {
    let engine = EligibilityEngine::new(EligibilityConfig {
        max_installment_ratio: 0.2,
        ..EligibilityConfig::default()
    });
    let borrower = customer(1, 50_000);

    let outcome = engine
        .evaluate(&borrower, &terms(150_000.0, 10.0, 12), CreditScore::clamped(80))
        .expect("evaluates");

    assert!(matches!(
        outcome.rejection(),
        Some(RejectionReason::Affordability { .. })
    ));
}
