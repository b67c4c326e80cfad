//! Fixed monthly payment for an amortized loan.

/// Invalid loan terms handed to the calculator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InstallmentError {
    #[error("principal must be a positive amount, got {0}")]
    NonPositivePrincipal(f64),
    #[error("interest rate must be a non-negative percentage, got {0}")]
    NegativeRate(f64),
    #[error("tenure must be at least one month, got {0}")]
    NonPositiveTenure(i64),
}

/// Equated monthly installment for `principal` at `annual_rate_percent` over `tenure_months`.
///
/// Uses `P·r / (1 − (1 + r)^−n)` with `r = annual_rate_percent / 1200`. The denominator is
/// evaluated as `−expm1(−n·ln1p(r))` so rates too small to change `1 + r` still give a
/// positive value. A zero rate, or one so small the denominator underflows, is prorated
/// as `P / n`.
pub fn monthly_installment(
    principal: f64,
    annual_rate_percent: f64,
    tenure_months: i64,
) -> Result<f64, InstallmentError> {
    if !(principal.is_finite() && principal > 0.0) {
        return Err(InstallmentError::NonPositivePrincipal(principal));
    }
    if !(annual_rate_percent.is_finite() && annual_rate_percent >= 0.0) {
        return Err(InstallmentError::NegativeRate(annual_rate_percent));
    }
    if tenure_months < 1 {
        return Err(InstallmentError::NonPositiveTenure(tenure_months));
    }

    let months = tenure_months as f64;
    let monthly_rate = annual_rate_percent / 1200.0;

    let prorated = principal / months;
    if monthly_rate == 0.0 {
        return Ok(prorated);
    }

    let denominator = -(-months * monthly_rate.ln_1p()).exp_m1();
    let installment = principal * monthly_rate / denominator;
    if denominator > 0.0 && installment.is_finite() {
        Ok(installment.max(prorated))
    } else {
        Ok(prorated)
    }
}
