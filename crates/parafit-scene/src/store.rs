//! Caller-owned collection of curves and their fits.
//!
//! The fitting engine itself is stateless; this store is where an
//! application keeps its point sets, display flags and the latest
//! successful fit of each curve.

use log::{debug, warn};
use parafit_core::{FitConfig, FitError, Result};
use parafit_fit::{fit_spatial_parabola_with, FitResult};
use parafit_math::Point3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct CurveId;
}

/// A named point set with display state and its most recent fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveRecord {
    pub name: String,
    pub points: Vec<Point3>,
    pub visible: bool,
    pub thickness: f64,
    /// Latest successful fit, `None` until one succeeds.
    pub fit: Option<FitResult>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurveStore {
    curves: SlotMap<CurveId, CurveRecord>,
    config: FitConfig,
}

impl CurveStore {
    pub const DEFAULT_THICKNESS: f64 = 2.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FitConfig) -> Self {
        Self {
            curves: SlotMap::with_key(),
            config,
        }
    }

    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn get(&self, id: CurveId) -> Option<&CurveRecord> {
        self.curves.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CurveId, &CurveRecord)> {
        self.curves.iter()
    }

    /// Add a curve of at least two points and try to fit it.
    ///
    /// An empty `name` becomes `"Curve N"`. The curve is added even when the
    /// fit fails; the failure is logged, `fit` stays unset and the error is
    /// returned alongside the new id.
    pub fn add_curve(
        &mut self,
        name: &str,
        points: Vec<Point3>,
    ) -> Result<(CurveId, Option<FitError>)> {
        if points.len() < 2 {
            return Err(FitError::DegenerateInput {
                points: points.len(),
            });
        }

        let name = if name.trim().is_empty() {
            format!("Curve {}", self.curves.len() + 1)
        } else {
            name.to_string()
        };

        let (fit, fit_error) = match fit_spatial_parabola_with(&points, &self.config) {
            Ok(fit) => (Some(fit), None),
            Err(e) => {
                warn!("curve '{}' added without a fit: {}", name, e);
                (None, Some(e))
            }
        };

        debug!("adding curve '{}' with {} points", name, points.len());
        let id = self.curves.insert(CurveRecord {
            name,
            points,
            visible: true,
            thickness: Self::DEFAULT_THICKNESS,
            fit,
        });
        Ok((id, fit_error))
    }

    pub fn remove_curve(&mut self, id: CurveId) -> Result<CurveRecord> {
        self.curves.remove(id).ok_or_else(|| not_found(id))
    }

    /// Flip visibility, returning the new state.
    pub fn toggle_visibility(&mut self, id: CurveId) -> Result<bool> {
        let record = self.record_mut(id)?;
        record.visible = !record.visible;
        Ok(record.visible)
    }

    pub fn rename(&mut self, id: CurveId, name: &str) -> Result<()> {
        self.record_mut(id)?.name = name.to_string();
        Ok(())
    }

    pub fn set_thickness(&mut self, id: CurveId, thickness: f64) -> Result<()> {
        if !(thickness.is_finite() && thickness > 0.0) {
            return Err(FitError::InvalidOperation(format!(
                "thickness must be positive, got {}",
                thickness
            )));
        }
        self.record_mut(id)?.thickness = thickness;
        Ok(())
    }

    /// Replace a curve's points and refit.
    ///
    /// If the new points cannot be fitted the record is left exactly as it
    /// was, previous fit included, and the error is returned.
    pub fn update_points(&mut self, id: CurveId, points: Vec<Point3>) -> Result<FitResult> {
        if !self.curves.contains_key(id) {
            return Err(not_found(id));
        }
        let fit = fit_spatial_parabola_with(&points, &self.config)?;
        let record = self.record_mut(id)?;
        record.points = points;
        record.fit = Some(fit);
        Ok(fit)
    }

    /// Refit every curve in parallel.
    ///
    /// Successful fits replace the stored ones; curves that fail keep their
    /// previous fit and are reported in the returned list.
    pub fn refit_all(&mut self) -> Vec<(CurveId, FitError)> {
        let config = self.config;
        let results: Vec<(CurveId, Result<FitResult>)> = {
            let jobs: Vec<(CurveId, &[Point3])> = self
                .curves
                .iter()
                .map(|(id, record)| (id, record.points.as_slice()))
                .collect();
            jobs.par_iter()
                .map(|&(id, points)| (id, fit_spatial_parabola_with(points, &config)))
                .collect()
        };

        let mut failures = Vec::new();
        for (id, result) in results {
            match result {
                Ok(fit) => {
                    if let Some(record) = self.curves.get_mut(id) {
                        record.fit = Some(fit);
                    }
                }
                Err(e) => failures.push((id, e)),
            }
        }
        failures
    }

    /// Resampled fitted curves of all visible curves that have a fit.
    pub fn visible_polylines(&self, steps: usize) -> Vec<(CurveId, Vec<Point3>)> {
        self.curves
            .iter()
            .filter(|(_, record)| record.visible)
            .filter_map(|(id, record)| {
                record
                    .fit
                    .as_ref()
                    .map(|fit| (id, fit.sample_with(steps, &self.config)))
            })
            .collect()
    }

    fn record_mut(&mut self, id: CurveId) -> Result<&mut CurveRecord> {
        self.curves.get_mut(id).ok_or_else(|| not_found(id))
    }
}

fn not_found(id: CurveId) -> FitError {
    FitError::NotFound(format!("curve {:?}", id))
}
