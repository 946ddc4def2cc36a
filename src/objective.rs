//! Objective
//!
//! Loss derivatives with respect to raw model predictions. The evaluator only
//! needs first derivatives at the final predictions; replaying leaf estimation
//! additionally needs second and third derivatives.
use crate::errors::InfluenceError;
use crate::utils::{items_to_strings, odds};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Loss the ensemble was trained with.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum LossFunction {
    SquaredLoss,
    LogLoss,
}

impl FromStr for LossFunction {
    type Err = InfluenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SquaredLoss" | "RMSE" => Ok(LossFunction::SquaredLoss),
            "LogLoss" | "Logloss" => Ok(LossFunction::LogLoss),
            _ => Err(InfluenceError::ParseString(
                s.to_string(),
                "LossFunction".to_string(),
                items_to_strings(vec!["SquaredLoss", "RMSE", "LogLoss", "Logloss"]),
            )),
        }
    }
}

/// How leaf values were estimated at training time.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum LeafEstimationMethod {
    /// Leaf value is `-sum(g) / (sum(h) + l2)`.
    Newton,
    /// Leaf value is `-sum(g) / (count + l2)`.
    Gradient,
}

impl FromStr for LeafEstimationMethod {
    type Err = InfluenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Newton" => Ok(LeafEstimationMethod::Newton),
            "Gradient" => Ok(LeafEstimationMethod::Gradient),
            _ => Err(InfluenceError::ParseString(
                s.to_string(),
                "LeafEstimationMethod".to_string(),
                items_to_strings(vec!["Newton", "Gradient"]),
            )),
        }
    }
}

pub trait ObjectiveFunction {
    /// First derivative of the loss at `yhat`.
    fn der1(y: f64, yhat: f64) -> f64;
    /// Second derivative of the loss at `yhat`.
    fn der2(y: f64, yhat: f64) -> f64;
    /// Third derivative of the loss at `yhat`.
    fn der3(y: f64, yhat: f64) -> f64;
}

#[derive(Default)]
pub struct SquaredLoss {}

impl ObjectiveFunction for SquaredLoss {
    #[inline]
    fn der1(y: f64, yhat: f64) -> f64 {
        yhat - y
    }

    #[inline]
    fn der2(_y: f64, _yhat: f64) -> f64 {
        1.0
    }

    #[inline]
    fn der3(_y: f64, _yhat: f64) -> f64 {
        0.0
    }
}

#[derive(Default)]
pub struct LogLoss {}

impl ObjectiveFunction for LogLoss {
    #[inline]
    fn der1(y: f64, yhat: f64) -> f64 {
        odds(yhat) - y
    }

    #[inline]
    fn der2(_y: f64, yhat: f64) -> f64 {
        let p = odds(yhat);
        p * (1.0 - p)
    }

    #[inline]
    fn der3(_y: f64, yhat: f64) -> f64 {
        let p = odds(yhat);
        p * (1.0 - p) * (1.0 - 2.0 * p)
    }
}

/// Per document derivatives. Higher orders are left empty unless requested.
#[derive(Debug, Default, Clone)]
pub struct Derivatives {
    pub first: Vec<f64>,
    pub second: Vec<f64>,
    pub third: Vec<f64>,
}

fn derivatives_for<O: ObjectiveFunction>(
    method: LeafEstimationMethod,
    approxes: &[f64],
    target: &[f64],
    higher_order: bool,
) -> Derivatives {
    let first = target.iter().zip(approxes).map(|(y, a)| O::der1(*y, *a)).collect();
    if !higher_order {
        return Derivatives {
            first,
            ..Default::default()
        };
    }
    let (second, third) = match method {
        LeafEstimationMethod::Newton => (
            target.iter().zip(approxes).map(|(y, a)| O::der2(*y, *a)).collect(),
            target.iter().zip(approxes).map(|(y, a)| O::der3(*y, *a)).collect(),
        ),
        LeafEstimationMethod::Gradient => (vec![1.0; approxes.len()], vec![0.0; approxes.len()]),
    };
    Derivatives { first, second, third }
}

/// Evaluate loss derivatives for a batch of documents.
///
/// * `loss` - Loss function the ensemble was trained with.
/// * `method` - Leaf estimation method, decides the second and third derivatives.
/// * `approxes` - Raw predictions, one per document.
/// * `target` - Labels, one per document.
/// * `higher_order` - Also compute second and third derivatives.
pub fn evaluate_derivatives(
    loss: LossFunction,
    method: LeafEstimationMethod,
    approxes: &[f64],
    target: &[f64],
    higher_order: bool,
) -> Derivatives {
    match loss {
        LossFunction::SquaredLoss => derivatives_for::<SquaredLoss>(method, approxes, target, higher_order),
        LossFunction::LogLoss => derivatives_for::<LogLoss>(method, approxes, target, higher_order),
    }
}
