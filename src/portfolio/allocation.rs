//! Client-side portfolio allocation: a fixed list of assets, their relative
//! weights in percentage points, and the colors used to draw them.
//!
//! The allocation is built once from a literal constant, mutated in place one
//! weight at a time, and never persisted. Weights are percentage points,
//! each non-negative, with the aggregate capped at 100; an edit moves exactly
//! one slot and the other slots are left untouched (no renormalization). The current share used to
//! compute an edit's delta is taken against the actual total, so the math
//! stays consistent when earlier edits pulled the total below 100.

use derive_more::Display;
use eyre::{ensure, Result};
use std::collections::HashSet;

use super::asset::{AssetName, SliceColor};

/// Tolerance for the aggregate cap check, so a delta of exactly zero on a
/// fully allocated portfolio is still accepted.
const CAP_EPSILON: f64 = 1e-9;

/// Why an adjustment was rejected. None of these mutate the allocation.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum AdjustError {
    /// The named asset is not part of this allocation
    #[display("unknown asset: {name}")]
    UnknownAsset { name: String },
    /// The requested share is not a finite number in [0, 100]
    #[display("percentage must be a number between 0 and 100, got {value}")]
    PercentOutOfRange { value: f64 },
    /// Applying the edit would push the aggregate weight past 100
    #[display("total allocation cannot exceed 100%, this change would reach {would_be:.1}%")]
    CapExceeded { would_be: f64 },
    /// Applying the edit would drive the asset's weight below zero
    #[display("{name} cannot fall below zero, this change would leave it at {would_be:.1}")]
    WeightBelowZero { name: String, would_be: f64 },
}

impl std::error::Error for AdjustError {}

/// The tracked allocation: three parallel sequences of equal length
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    assets: Vec<AssetName>,
    weights: Vec<f64>,
    colors: Vec<SliceColor>,
}

impl Allocation {
    /// Builds an allocation from parallel sequences.
    ///
    /// # Errors
    /// * If the sequences differ in length
    /// * If an asset name appears twice
    pub fn new(assets: Vec<AssetName>, weights: Vec<f64>, colors: Vec<SliceColor>) -> Result<Self> {
        ensure!(
            assets.len() == weights.len() && assets.len() == colors.len(),
            "allocation sequences must have equal lengths: {} assets, {} weights, {} colors",
            assets.len(),
            weights.len(),
            colors.len()
        );
        let mut seen = HashSet::new();
        for asset in &assets {
            ensure!(seen.insert(asset), "duplicate asset: {asset}");
        }
        Ok(Self {
            assets,
            weights,
            colors,
        })
    }

    /// The nine-currency starter mix shipped with the tracker
    #[must_use]
    pub fn default_mix() -> Self {
        let entries: [(&str, f64, SliceColor); 9] = [
            ("Solana", 10.0, SliceColor::translucent(0, 0, 255)),
            ("Bitcoin", 20.0, SliceColor::translucent(255, 255, 0)),
            ("Polygon", 5.0, SliceColor::translucent(128, 0, 128)),
            ("Avax", 10.0, SliceColor::translucent(255, 0, 0)),
            ("Ethereum", 15.0, SliceColor::translucent(165, 42, 42)),
            ("Cardano", 8.0, SliceColor::translucent(255, 192, 203)),
            ("Binance Coin", 7.0, SliceColor::translucent(255, 165, 0)),
            ("Tether", 12.0, SliceColor::translucent(0, 0, 0)),
            ("XRP", 13.0, SliceColor::translucent(0, 255, 255)),
        ];

        let assets = entries.iter().map(|(name, _, _)| AssetName::from(*name));
        let weights = entries.iter().map(|(_, weight, _)| *weight);
        let colors = entries.iter().map(|(_, _, color)| *color);

        Self::new(assets.collect(), weights.collect(), colors.collect())
            .expect("default mix is a valid allocation")
    }

    #[must_use]
    pub fn assets(&self) -> &[AssetName] {
        &self.assets
    }

    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[must_use]
    pub fn colors(&self) -> &[SliceColor] {
        &self.colors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Sum of all weights in percentage points
    #[must_use]
    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Slice shares normalized against the actual total, one per asset.
    /// All zeros when nothing is allocated.
    #[must_use]
    pub fn shares(&self) -> Vec<f64> {
        let total = self.total();
        if total <= 0.0 {
            return vec![0.0; self.weights.len()];
        }
        self.weights.iter().map(|w| w / total).collect()
    }

    /// Position of an asset by display name
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.assets.iter().position(|asset| asset.as_str() == name)
    }

    /// Moves one asset's share to `target_pct` percent of the current total.
    ///
    /// Computes the delta between the requested share and the asset's current
    /// share, rejects the edit if the aggregate would pass 100, and otherwise
    /// applies the delta to that single slot.
    ///
    /// # Errors
    /// * `AdjustError::UnknownAsset` if `name` is not in the allocation
    /// * `AdjustError::PercentOutOfRange` if `target_pct` is not finite or
    ///   outside [0, 100]
    /// * `AdjustError::CapExceeded` if the aggregate would exceed 100
    /// * `AdjustError::WeightBelowZero` if the asset's weight would go negative
    pub fn adjust(&mut self, name: &str, target_pct: f64) -> Result<&[f64], AdjustError> {
        let index = self.position(name).ok_or_else(|| AdjustError::UnknownAsset {
            name: name.to_string(),
        })?;

        if !target_pct.is_finite() || !(0.0..=100.0).contains(&target_pct) {
            return Err(AdjustError::PercentOutOfRange { value: target_pct });
        }

        let total = self.total();
        let current_pct = if total > 0.0 {
            self.weights[index] / total * 100.0
        } else {
            0.0
        };

        let delta = target_pct - current_pct;
        let would_be = total + delta;
        if would_be > 100.0 + CAP_EPSILON {
            return Err(AdjustError::CapExceeded { would_be });
        }

        // When the total sits below 100 a share is worth more than its
        // percentage points, so a downward delta can overshoot the weight
        let new_weight = self.weights[index] + delta;
        if new_weight < -CAP_EPSILON {
            return Err(AdjustError::WeightBelowZero {
                name: name.to_string(),
                would_be: new_weight,
            });
        }

        self.weights[index] += delta;
        Ok(&self.weights)
    }
}

impl Default for Allocation {
    fn default() -> Self {
        Self::default_mix()
    }
}
