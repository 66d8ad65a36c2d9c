//! ARIMA(p, d, q) estimation and forecasting.
//!
//! Fitting minimises the conditional sum of squares: the series is differenced
//! `d` times, then the residuals of
//!
//!   w_t = c + phi_1*w_{t-1} + .. + phi_p*w_{t-p}
//!           + theta_1*e_{t-1} + .. + theta_q*e_{t-q} + e_t
//!
//! are minimised over (c, phi, theta) with Levenberg-Marquardt, conditioning
//! on the first p observations and zero pre-sample shocks. Prediction
//! intervals come from the psi-weight recursion of the full ARI polynomial
//! phi(B) * (1-B)^d, so uncertainty widens correctly on the integrated scale.

use levenberg_marquardt::{LeastSquaresProblem, LevenbergMarquardt};
use nalgebra::{DMatrix, DVector, Dyn, Owned};
use statrs::distribution::{ContinuousCDF, Normal};

/// Conditional-sum-of-squares objective for Levenberg-Marquardt.
///
/// Parameter layout: `[c, phi_1..phi_p, theta_1..theta_q]`.
#[derive(Clone)]
struct CssProblem {
    w: Vec<f64>,
    p: usize,
    q: usize,
    params: DVector<f64>,
}

impl CssProblem {
    /// Residuals e_t for t in p..n, with e_t = 0 for the conditioning prefix.
    /// Returns the full-length shock vector (leading zeros included).
    fn shocks(&self) -> Vec<f64> {
        css_shocks(&self.w, self.p, self.q, self.params.as_slice())
    }
}

fn css_shocks(w: &[f64], p: usize, q: usize, params: &[f64]) -> Vec<f64> {
    let c = params[0];
    let phi = &params[1..1 + p];
    let theta = &params[1 + p..1 + p + q];

    let n = w.len();
    let mut e = vec![0.0; n];
    for t in p..n {
        let mut pred = c;
        for (i, &phi_i) in phi.iter().enumerate() {
            pred += phi_i * w[t - 1 - i];
        }
        for (j, &theta_j) in theta.iter().enumerate() {
            if t >= j + 1 {
                pred += theta_j * e[t - 1 - j];
            }
        }
        e[t] = w[t] - pred;
    }
    e
}

impl LeastSquaresProblem<f64, Dyn, Dyn> for CssProblem {
    type ParameterStorage = Owned<f64, Dyn>;
    type ResidualStorage = Owned<f64, Dyn>;
    type JacobianStorage = Owned<f64, Dyn, Dyn>;

    fn set_params(&mut self, params: &DVector<f64>) {
        self.params.copy_from(params);
    }

    fn params(&self) -> DVector<f64> {
        self.params.clone()
    }

    fn residuals(&self) -> Option<DVector<f64>> {
        let e = self.shocks();
        let resid = DVector::from_iterator(e.len() - self.p, e.into_iter().skip(self.p));
        if resid.iter().all(|v| v.is_finite()) {
            Some(resid)
        } else {
            None
        }
    }

    fn jacobian(&self) -> Option<DMatrix<f64>> {
        // Forward-difference Jacobian. The MA recursion makes the analytic
        // derivative a second recursion; the numeric one is accurate enough
        // for CSS and keeps the objective in one place.
        let base = self.residuals()?;
        let m = base.len();
        let k = self.params.len();

        let mut jac = DMatrix::zeros(m, k);
        let mut perturbed = self.clone();
        for j in 0..k {
            let h = 1e-6 * (1.0 + self.params[j].abs());
            let mut params = self.params.clone();
            params[j] += h;
            perturbed.set_params(&params);
            let resid = perturbed.residuals()?;
            for i in 0..m {
                jac[(i, j)] = (resid[i] - base[i]) / h;
            }
        }
        Some(jac)
    }
}

/// A fitted ARIMA model, ready to forecast.
#[derive(Debug)]
pub struct FittedArima {
    pub order: (usize, usize, usize),
    pub intercept: f64,
    pub phi: Vec<f64>,
    pub theta: Vec<f64>,
    pub sigma2: f64,
    /// The series at every differencing level: levels[0] is the original,
    /// levels[d] is the series the ARMA part was fitted on.
    levels: Vec<Vec<f64>>,
    /// Full-length fitted shocks on the differenced scale.
    shocks: Vec<f64>,
}

/// Point forecasts with a two-sided prediction interval, all on the original
/// (undifferenced) scale.
pub struct ForecastPath {
    pub points: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// Fit an ARIMA model by conditional sum of squares.
///
/// Errors are plain strings describing the cause; the caller wraps them into
/// its own error type.
pub fn fit(values: &[f64], order: (usize, usize, usize)) -> Result<FittedArima, String> {
    let (p, d, q) = order;
    if values.len() <= d {
        return Err(format!(
            "differencing order {} leaves no observations (series length {})",
            d,
            values.len()
        ));
    }

    let levels = difference_levels(values, d);
    let w = levels[d].clone();
    let n_resid = w.len().saturating_sub(p);
    let k = 1 + p + q;
    if n_resid < k {
        return Err(format!(
            "series too short to estimate ARIMA({p},{d},{q}): {} residuals for {k} parameters",
            n_resid
        ));
    }

    // Start from the sample mean for the intercept and zero AR/MA weights.
    let mut init = DVector::zeros(k);
    init[0] = w.iter().sum::<f64>() / w.len() as f64;

    let problem = CssProblem {
        w: w.clone(),
        p,
        q,
        params: init,
    };
    let (problem, report) = LevenbergMarquardt::new().minimize(problem);

    // A zero objective is a perfect fit; some termination reasons mark it
    // unsuccessful even though the parameters are exact.
    if !report.termination.was_successful() && report.objective_function > f64::EPSILON {
        return Err(format!(
            "optimizer did not converge ({:?})",
            report.termination
        ));
    }
    if problem.params.iter().any(|v| !v.is_finite()) {
        return Err("optimizer produced non-finite parameters".to_owned());
    }

    let shocks = problem.shocks();
    let css: f64 = shocks.iter().skip(p).map(|e| e * e).sum();
    let dof = n_resid.saturating_sub(k).max(1);
    let sigma2 = css / dof as f64;

    let params = problem.params.as_slice();
    Ok(FittedArima {
        order,
        intercept: params[0],
        phi: params[1..1 + p].to_vec(),
        theta: params[1 + p..1 + p + q].to_vec(),
        sigma2,
        levels,
        shocks,
    })
}

impl FittedArima {
    /// Forecast `steps` ahead with a symmetric two-sided interval at
    /// `confidence` (e.g. 0.95).
    pub fn forecast(&self, steps: usize, confidence: f64) -> Result<ForecastPath, String> {
        let d = self.order.1;
        let w = &self.levels[d];
        let n = w.len();

        // Point forecasts on the differenced scale; future shocks are zero.
        let mut w_ext = w.clone();
        let mut e_ext = self.shocks.clone();
        for h in 0..steps {
            let t = n + h;
            let mut pred = self.intercept;
            for (i, &phi_i) in self.phi.iter().enumerate() {
                pred += phi_i * w_ext[t - 1 - i];
            }
            for (j, &theta_j) in self.theta.iter().enumerate() {
                if t >= j + 1 {
                    pred += theta_j * e_ext[t - 1 - j];
                }
            }
            w_ext.push(pred);
            e_ext.push(0.0);
        }
        let diffed_forecast = &w_ext[n..];

        // Integrate back through the differencing levels.
        let points = integrate(diffed_forecast, &self.levels);

        // Forecast-error variance from the psi weights of the full model.
        let psi = psi_weights(&self.phi, &self.theta, d, steps);
        let normal = Normal::new(0.0, 1.0).map_err(|e| e.to_string())?;
        let z = normal.inverse_cdf(1.0 - (1.0 - confidence) / 2.0);

        let mut lower = Vec::with_capacity(steps);
        let mut upper = Vec::with_capacity(steps);
        let mut psi_sq_sum = 0.0;
        for (h, &point) in points.iter().enumerate() {
            psi_sq_sum += psi[h] * psi[h];
            let se = (self.sigma2 * psi_sq_sum).sqrt();
            let width = z * se;
            if !point.is_finite() || !width.is_finite() {
                return Err("forecast produced non-finite values".to_owned());
            }
            lower.push(point - width);
            upper.push(point + width);
        }

        Ok(ForecastPath {
            points,
            lower,
            upper,
        })
    }
}

/// Difference a series `d` times, keeping every intermediate level for the
/// later integration step.
fn difference_levels(values: &[f64], d: usize) -> Vec<Vec<f64>> {
    let mut levels = vec![values.to_vec()];
    for _ in 0..d {
        let prev = levels.last().expect("at least one level");
        let next: Vec<f64> = prev.windows(2).map(|w| w[1] - w[0]).collect();
        levels.push(next);
    }
    levels
}

/// Undo the differencing: cumulate the forecast back up through the levels,
/// seeding each level with its last observed value.
fn integrate(diffed_forecast: &[f64], levels: &[Vec<f64>]) -> Vec<f64> {
    let mut forecast = diffed_forecast.to_vec();
    for level in levels[..levels.len() - 1].iter().rev() {
        let mut last = *level.last().expect("non-empty level");
        for value in &mut forecast {
            last += *value;
            *value = last;
        }
    }
    forecast
}

/// Psi (MA-infinity) weights of the integrated model.
///
/// The AR side is the expanded polynomial phi(B) * (1-B)^d, so the weights,
/// and with them the forecast variance, grow with the horizon for d > 0.
fn psi_weights(phi: &[f64], theta: &[f64], d: usize, steps: usize) -> Vec<f64> {
    // Expand phi(B) * (1-B)^d into 1 - alpha_1*B - .. - alpha_P*B^P.
    let mut poly = vec![1.0];
    poly.extend(phi.iter().map(|&v| -v));
    for _ in 0..d {
        // Convolve with (1 - B).
        let mut next = vec![0.0; poly.len() + 1];
        for (i, &coeff) in poly.iter().enumerate() {
            next[i] += coeff;
            next[i + 1] -= coeff;
        }
        poly = next;
    }
    let alpha: Vec<f64> = poly[1..].iter().map(|&v| -v).collect();

    let mut psi = vec![0.0; steps.max(1)];
    psi[0] = 1.0;
    for j in 1..psi.len() {
        let mut value = if j <= theta.len() { theta[j - 1] } else { 0.0 };
        for (i, &alpha_i) in alpha.iter().enumerate().take(j) {
            value += alpha_i * psi[j - 1 - i];
        }
        psi[j] = value;
    }
    psi
}
