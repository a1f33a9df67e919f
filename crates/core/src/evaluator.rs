//! Coulomb superposition over point charges.
//!
//! The [`Evaluator`] is a pure function of its configuration and the charge
//! slice it is handed: every query walks all charges from scratch. Positions
//! are in display units and converted to meters with the evaluator's
//! pixels-per-meter factor before Coulomb's law is applied.
//!
//! A query point sitting exactly on a non-zero charge has no defined field or
//! potential. That case is reported as [`Coincident`] rather than a number, so
//! callers can tell "undefined, do not plot" apart from a genuine zero field
//! where contributions cancel.

use crate::charge::Charge;
use crate::error::FieldError;
use crate::params::{param_f64, param_string};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Coulomb constant in N·m²/C².
pub const DEFAULT_COULOMB: f64 = 8.99e9;
/// Display units per meter when the caller does not supply one.
pub const DEFAULT_CONVERSION: f64 = 100.0;

/// Euclidean distance between two points, in whatever units they share.
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    (a - b).length()
}

/// The query point lies exactly on the charge at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("query point coincides with charge at index {index}")]
pub struct Coincident {
    /// Index of the offending charge in the evaluated slice.
    pub index: usize,
}

/// Direction convention for each charge's contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignConvention {
    /// Field points away from positive charges, toward negative ones.
    #[default]
    Outward,
    /// Field points toward positive charges. Accumulates `charge - query`.
    Inward,
}

impl SignConvention {
    fn displacement(self, query: DVec2, source: DVec2) -> DVec2 {
        match self {
            SignConvention::Outward => query - source,
            SignConvention::Inward => source - query,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SignConvention::Outward => "outward",
            SignConvention::Inward => "inward",
        }
    }
}

impl fmt::Display for SignConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SignConvention {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "outward" => Ok(SignConvention::Outward),
            "inward" => Ok(SignConvention::Inward),
            _ => Err(FieldError::UnknownConvention(s.to_string())),
        }
    }
}

/// Field, its magnitude and the potential at one point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Probe {
    pub point: DVec2,
    /// Net field in N/C.
    pub field: DVec2,
    /// `|field|` in N/C.
    pub magnitude: f64,
    /// Potential in volts.
    pub potential: f64,
}

/// Superposition evaluator with a fixed unit conversion and Coulomb constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluator {
    conversion: f64,
    coulomb: f64,
    convention: SignConvention,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            conversion: DEFAULT_CONVERSION,
            coulomb: DEFAULT_COULOMB,
            convention: SignConvention::default(),
        }
    }
}

impl Evaluator {
    /// Creates an evaluator with the default Coulomb constant and convention.
    ///
    /// Returns `FieldError::InvalidConversion` unless `conversion` is finite
    /// and positive.
    pub fn new(conversion: f64) -> Result<Self, FieldError> {
        Self::default().with_conversion(conversion)
    }

    pub fn with_conversion(mut self, conversion: f64) -> Result<Self, FieldError> {
        if !conversion.is_finite() || conversion <= 0.0 {
            return Err(FieldError::InvalidConversion(conversion));
        }
        self.conversion = conversion;
        Ok(self)
    }

    pub fn with_coulomb(mut self, coulomb: f64) -> Result<Self, FieldError> {
        if !coulomb.is_finite() {
            return Err(FieldError::InvalidCoulombConstant(coulomb));
        }
        self.coulomb = coulomb;
        Ok(self)
    }

    pub fn with_convention(mut self, convention: SignConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Builds an evaluator from a JSON object.
    ///
    /// Reads `conversion`, `coulomb` and `convention`, falling back to
    /// defaults for missing or mistyped keys. Values that are present but
    /// invalid are rejected.
    pub fn from_json(params: &Value) -> Result<Self, FieldError> {
        let convention: SignConvention =
            param_string(params, "convention", SignConvention::default().name()).parse()?;
        Self::default()
            .with_conversion(param_f64(params, "conversion", DEFAULT_CONVERSION))?
            .with_coulomb(param_f64(params, "coulomb", DEFAULT_COULOMB))
            .map(|e| e.with_convention(convention))
    }

    /// Current settings as a JSON object, in the shape `from_json` accepts.
    pub fn params(&self) -> Value {
        json!({
            "conversion": self.conversion,
            "coulomb": self.coulomb,
            "convention": self.convention.name(),
        })
    }

    pub fn conversion(&self) -> f64 {
        self.conversion
    }

    pub fn coulomb(&self) -> f64 {
        self.coulomb
    }

    pub fn convention(&self) -> SignConvention {
        self.convention
    }

    /// Physical distance in meters between two display-space points.
    pub fn measure(&self, a: DVec2, b: DVec2) -> f64 {
        distance(a, b) / self.conversion
    }

    /// Net field at `point` in N/C.
    ///
    /// An empty slice yields the zero vector. Sensors (zero charge) are
    /// skipped and never cause coincidence.
    pub fn field(&self, point: DVec2, charges: &[Charge]) -> Result<DVec2, Coincident> {
        self.accumulate_field(point, charges, None)
    }

    /// Net field at `point` with the charge at `excluded` left out.
    pub fn field_excluding(
        &self,
        point: DVec2,
        charges: &[Charge],
        excluded: usize,
    ) -> Result<DVec2, Coincident> {
        self.accumulate_field(point, charges, Some(excluded))
    }

    /// Net potential at `point` in volts.
    pub fn potential(&self, point: DVec2, charges: &[Charge]) -> Result<f64, Coincident> {
        let mut total = 0.0;
        for (index, c) in charges.iter().enumerate() {
            if c.is_sensor() {
                continue;
            }
            let r = distance(point, c.position) / self.conversion;
            if r == 0.0 {
                return Err(Coincident { index });
            }
            total += self.coulomb * c.charge / r;
        }
        Ok(total)
    }

    /// Field and potential at `point` in a single pass over the charges.
    pub fn probe(&self, point: DVec2, charges: &[Charge]) -> Result<Probe, Coincident> {
        let mut field = DVec2::ZERO;
        let mut potential = 0.0;
        for (index, c) in charges.iter().enumerate() {
            if let Some((e, v)) = self.contribution(point, c, index)? {
                field += e;
                potential += v;
            }
        }
        Ok(Probe {
            point,
            field,
            magnitude: field.length(),
            potential,
        })
    }

    /// Force in newtons on the charge at `index`, from every other charge.
    ///
    /// Returns `FieldError::ChargeIndexOutOfRange` for a bad index. A second
    /// charge at the same position surfaces as `Ok(Err(Coincident))`.
    pub fn force_on(
        &self,
        index: usize,
        charges: &[Charge],
    ) -> Result<Result<DVec2, Coincident>, FieldError> {
        let target = charges
            .get(index)
            .ok_or(FieldError::ChargeIndexOutOfRange {
                index,
                len: charges.len(),
            })?;
        Ok(self
            .field_excluding(target.position, charges, index)
            .map(|e| e * target.charge))
    }

    fn accumulate_field(
        &self,
        point: DVec2,
        charges: &[Charge],
        excluded: Option<usize>,
    ) -> Result<DVec2, Coincident> {
        let mut field = DVec2::ZERO;
        for (index, c) in charges.iter().enumerate() {
            if Some(index) == excluded {
                continue;
            }
            if let Some((e, _)) = self.contribution(point, c, index)? {
                field += e;
            }
        }
        Ok(field)
    }

    /// One charge's field and potential terms, or `None` for a sensor.
    fn contribution(
        &self,
        point: DVec2,
        charge: &Charge,
        index: usize,
    ) -> Result<Option<(DVec2, f64)>, Coincident> {
        if charge.is_sensor() {
            return Ok(None);
        }
        let d = self.convention.displacement(point, charge.position);
        let len = d.length();
        let r = len / self.conversion;
        if r == 0.0 {
            return Err(Coincident { index });
        }
        let kq = self.coulomb * charge.charge;
        let field = d / len * (kq / (r * r));
        Ok(Some((field, kq / r)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const K: f64 = DEFAULT_COULOMB;

    fn assert_close(a: f64, b: f64) {
        let tol = 1e-9 * a.abs().max(b.abs()).max(1e-12);
        assert!((a - b).abs() <= tol, "expected {b}, got {a}");
    }

    fn assert_vec_close(a: DVec2, b: DVec2) {
        assert_close(a.x, b.x);
        assert_close(a.y, b.y);
    }

    fn dipole() -> Vec<Charge> {
        vec![
            Charge::new(100.0, 300.0, 1e-9),
            Charge::new(700.0, 300.0, -1e-9),
        ]
    }

    // -- distance / measure --

    #[test]
    fn distance_is_euclidean() {
        assert_close(distance(DVec2::new(0.0, 0.0), DVec2::new(3.0, 4.0)), 5.0);
        assert_close(distance(DVec2::new(-1.0, 2.0), DVec2::new(-1.0, 2.0)), 0.0);
    }

    #[test]
    fn measure_converts_pixels_to_meters() {
        let ev = Evaluator::new(200.0).unwrap();
        assert_close(ev.measure(DVec2::new(100.0, 300.0), DVec2::new(400.0, 300.0)), 1.5);
    }

    // -- construction --

    #[test]
    fn default_uses_documented_constants() {
        let ev = Evaluator::default();
        assert_eq!(ev.conversion(), 100.0);
        assert_eq!(ev.coulomb(), 8.99e9);
        assert_eq!(ev.convention(), SignConvention::Outward);
    }

    #[test]
    fn new_rejects_non_positive_conversion() {
        assert!(matches!(
            Evaluator::new(0.0),
            Err(FieldError::InvalidConversion(_))
        ));
        assert!(Evaluator::new(-5.0).is_err());
        assert!(Evaluator::new(f64::NAN).is_err());
        assert!(Evaluator::new(f64::INFINITY).is_err());
    }

    #[test]
    fn with_coulomb_rejects_non_finite() {
        let result = Evaluator::default().with_coulomb(f64::NAN);
        assert!(matches!(result, Err(FieldError::InvalidCoulombConstant(_))));
    }

    #[test]
    fn from_json_reads_all_keys() {
        let ev = Evaluator::from_json(&json!({
            "conversion": 200,
            "coulomb": 9e9,
            "convention": "inward",
        }))
        .unwrap();
        assert_eq!(ev.conversion(), 200.0);
        assert_eq!(ev.coulomb(), 9e9);
        assert_eq!(ev.convention(), SignConvention::Inward);
    }

    #[test]
    fn from_json_falls_back_to_defaults() {
        let ev = Evaluator::from_json(&json!({})).unwrap();
        assert_eq!(ev, Evaluator::default());
    }

    #[test]
    fn from_json_rejects_bad_convention() {
        let result = Evaluator::from_json(&json!({"convention": "sideways"}));
        assert!(matches!(result, Err(FieldError::UnknownConvention(_))));
    }

    #[test]
    fn from_json_rejects_zero_conversion() {
        let result = Evaluator::from_json(&json!({"conversion": 0.0}));
        assert!(matches!(result, Err(FieldError::InvalidConversion(_))));
    }

    #[test]
    fn params_round_trip_through_from_json() {
        let ev = Evaluator::new(250.0)
            .unwrap()
            .with_convention(SignConvention::Inward);
        assert_eq!(Evaluator::from_json(&ev.params()).unwrap(), ev);
    }

    #[test]
    fn convention_parses_case_insensitively() {
        assert_eq!("Outward".parse::<SignConvention>().unwrap(), SignConvention::Outward);
        assert_eq!("INWARD".parse::<SignConvention>().unwrap(), SignConvention::Inward);
    }

    // -- field: single charge --

    #[test]
    fn single_charge_magnitude_follows_inverse_square() {
        let ev = Evaluator::new(100.0).unwrap();
        let charges = [Charge::new(0.0, 0.0, 2e-9)];
        let e = ev.field(DVec2::new(300.0, 400.0), &charges).unwrap();
        // 500 px / 100 = 5 m
        assert_close(e.length(), K * 2e-9 / 25.0);
    }

    #[test]
    fn positive_charge_field_points_away_outward() {
        let ev = Evaluator::default();
        let charges = [Charge::new(0.0, 0.0, 1e-9)];
        let e = ev.field(DVec2::new(50.0, 0.0), &charges).unwrap();
        assert!(e.x > 0.0);
        assert_close(e.y, 0.0);
    }

    #[test]
    fn negative_charge_field_points_toward_it_outward() {
        let ev = Evaluator::default();
        let charges = [Charge::new(0.0, 0.0, -1e-9)];
        let e = ev.field(DVec2::new(0.0, 80.0), &charges).unwrap();
        assert!(e.y < 0.0);
        assert_close(e.x, 0.0);
    }

    #[test]
    fn inward_convention_flips_direction() {
        let charges = [Charge::new(10.0, 20.0, 1e-9)];
        let p = DVec2::new(-30.0, 55.0);
        let out = Evaluator::default().field(p, &charges).unwrap();
        let inward = Evaluator::default()
            .with_convention(SignConvention::Inward)
            .field(p, &charges)
            .unwrap();
        assert_vec_close(inward, -out);
    }

    #[test]
    fn field_is_parallel_to_line_through_charge() {
        let ev = Evaluator::new(50.0).unwrap();
        let c = Charge::new(120.0, -40.0, 3e-9);
        let p = DVec2::new(-10.0, 75.0);
        let e = ev.field(p, &[c]).unwrap();
        let dir = (p - c.position).normalize();
        assert!(e.perp_dot(dir).abs() <= 1e-9 * e.length());
        assert!(e.dot(dir) > 0.0);
    }

    // -- field: coincidence and degenerate sets --

    #[test]
    fn query_at_charge_is_coincident() {
        let ev = Evaluator::default();
        let charges = dipole();
        assert_eq!(
            ev.field(DVec2::new(700.0, 300.0), &charges),
            Err(Coincident { index: 1 })
        );
    }

    #[test]
    fn empty_set_yields_zero_vector() {
        let ev = Evaluator::default();
        assert_eq!(ev.field(DVec2::new(1.0, 2.0), &[]), Ok(DVec2::ZERO));
        assert_eq!(ev.potential(DVec2::new(1.0, 2.0), &[]), Ok(0.0));
    }

    #[test]
    fn cancelling_charges_give_zero_not_coincident() {
        let ev = Evaluator::default();
        let charges = [Charge::new(-100.0, 0.0, 1e-9), Charge::new(100.0, 0.0, 1e-9)];
        let e = ev.field(DVec2::ZERO, &charges).unwrap();
        assert!(e.length() < 1e-12, "expected cancellation, got {e}");
    }

    #[test]
    fn sensor_contributes_nothing_and_is_never_coincident() {
        let ev = Evaluator::default();
        let mut charges = dipole();
        let without = ev.field(DVec2::new(400.0, 150.0), &charges).unwrap();
        charges.push(Charge::sensor(400.0, 150.0));
        let with = ev.field(DVec2::new(400.0, 150.0), &charges).unwrap();
        assert_eq!(with, without);
        assert!(ev.potential(DVec2::new(400.0, 150.0), &charges).is_ok());
    }

    // -- the dipole scenario --

    #[test]
    fn dipole_midpoint_matches_superposition() {
        let ev = Evaluator::new(200.0).unwrap();
        let e = ev.field(DVec2::new(400.0, 300.0), &dipole()).unwrap();
        let expected = 2.0 * K * 1e-9 / (1.5 * 1.5);
        assert_close(e.length(), expected);
        assert!(e.x > 0.0, "field should point toward the negative charge");
        assert_close(e.y, 0.0);
    }

    #[test]
    fn dipole_midpoint_potential_is_zero() {
        let ev = Evaluator::new(200.0).unwrap();
        let v = ev.potential(DVec2::new(400.0, 300.0), &dipole()).unwrap();
        assert!(v.abs() < 1e-9, "expected ~0 V, got {v}");
    }

    // -- symmetry --

    #[test]
    fn opposite_pair_bisector_field_is_along_axis() {
        let ev = Evaluator::default();
        let charges = [Charge::new(-50.0, 0.0, 1e-9), Charge::new(50.0, 0.0, -1e-9)];
        for y in [-200.0, -30.0, 10.0, 75.0] {
            let e = ev.field(DVec2::new(0.0, y), &charges).unwrap();
            assert!(e.y.abs() <= 1e-9 * e.x.abs(), "perpendicular leak at y={y}: {e}");
        }
    }

    #[test]
    fn like_pair_bisector_field_has_no_axial_component() {
        let ev = Evaluator::default();
        let charges = [Charge::new(-50.0, 0.0, 1e-9), Charge::new(50.0, 0.0, 1e-9)];
        for y in [-200.0, -30.0, 10.0, 75.0] {
            let e = ev.field(DVec2::new(0.0, y), &charges).unwrap();
            assert!(e.x.abs() <= 1e-9 * e.y.abs(), "axial leak at y={y}: {e}");
        }
    }

    // -- potential --

    #[test]
    fn single_charge_potential_is_kq_over_r() {
        let ev = Evaluator::new(100.0).unwrap();
        let v = ev
            .potential(DVec2::new(0.0, 200.0), &[Charge::new(0.0, 0.0, -4e-9)])
            .unwrap();
        assert_close(v, K * -4e-9 / 2.0);
    }

    #[test]
    fn potential_at_charge_is_coincident() {
        let ev = Evaluator::default();
        assert_eq!(
            ev.potential(DVec2::new(100.0, 300.0), &dipole()),
            Err(Coincident { index: 0 })
        );
    }

    // -- probe --

    #[test]
    fn probe_agrees_with_separate_queries() {
        let ev = Evaluator::new(200.0).unwrap();
        let p = DVec2::new(250.0, 120.0);
        let probe = ev.probe(p, &dipole()).unwrap();
        assert_vec_close(probe.field, ev.field(p, &dipole()).unwrap());
        assert_close(probe.potential, ev.potential(p, &dipole()).unwrap());
        assert_close(probe.magnitude, probe.field.length());
        assert_eq!(probe.point, p);
    }

    #[test]
    fn probe_at_charge_is_coincident() {
        let ev = Evaluator::default();
        assert!(ev.probe(DVec2::new(100.0, 300.0), &dipole()).is_err());
    }

    // -- exclusion and force --

    #[test]
    fn field_excluding_skips_coincident_self() {
        let ev = Evaluator::new(200.0).unwrap();
        let charges = dipole();
        let e = ev
            .field_excluding(charges[0].position, &charges, 0)
            .unwrap();
        // Only the negative charge 3 m away remains, pulling toward +x.
        assert_close(e.x, K * 1e-9 / 9.0);
    }

    #[test]
    fn force_between_opposite_charges_is_attractive() {
        let ev = Evaluator::new(200.0).unwrap();
        let charges = dipole();
        let f0 = ev.force_on(0, &charges).unwrap().unwrap();
        let f1 = ev.force_on(1, &charges).unwrap().unwrap();
        assert!(f0.x > 0.0, "positive charge pulled right, got {f0}");
        assert!(f1.x < 0.0, "negative charge pulled left, got {f1}");
        assert_vec_close(f0, -f1);
        assert_close(f0.length(), K * 1e-18 / 9.0);
    }

    #[test]
    fn force_on_sensor_is_zero() {
        let ev = Evaluator::default();
        let mut charges = dipole();
        charges.push(Charge::sensor(400.0, 0.0));
        assert_eq!(ev.force_on(2, &charges).unwrap(), Ok(DVec2::ZERO));
    }

    #[test]
    fn force_on_bad_index_is_error() {
        let ev = Evaluator::default();
        assert!(matches!(
            ev.force_on(5, &dipole()),
            Err(FieldError::ChargeIndexOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn force_on_stacked_charges_is_coincident() {
        let ev = Evaluator::default();
        let charges = [Charge::new(0.0, 0.0, 1e-9), Charge::new(0.0, 0.0, 1e-9)];
        assert_eq!(ev.force_on(0, &charges).unwrap(), Err(Coincident { index: 1 }));
    }

    // -- Property-based tests --

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn coord() -> impl Strategy<Value = f64> {
            -1000.0_f64..1000.0
        }

        fn magnitude() -> impl Strategy<Value = f64> {
            prop_oneof![-5e-9_f64..-1e-12, 1e-12_f64..5e-9]
        }

        fn charge() -> impl Strategy<Value = Charge> {
            (coord(), coord(), magnitude()).prop_map(|(x, y, q)| Charge::new(x, y, q))
        }

        fn point() -> impl Strategy<Value = DVec2> {
            (coord(), coord()).prop_map(|(x, y)| DVec2::new(x, y))
        }

        fn far_enough(p: DVec2, charges: &[Charge]) -> bool {
            charges.iter().all(|c| c.position.distance(p) > 1.0)
        }

        proptest! {
            #[test]
            fn superposition_holds(a in charge(), b in charge(), p in point()) {
                prop_assume!(far_enough(p, &[a, b]));
                let ev = Evaluator::default();
                let both = ev.field(p, &[a, b]).unwrap();
                let sum = ev.field(p, &[a]).unwrap() + ev.field(p, &[b]).unwrap();
                let tol = 1e-9 * (both.length() + sum.length()).max(1e-12);
                prop_assert!((both - sum).length() <= tol, "{both} vs {sum}");
            }

            #[test]
            fn order_does_not_matter(a in charge(), b in charge(), c in charge(), p in point()) {
                prop_assume!(far_enough(p, &[a, b, c]));
                let ev = Evaluator::default();
                let abc = ev.probe(p, &[a, b, c]).unwrap();
                let cba = ev.probe(p, &[c, b, a]).unwrap();
                let scale: f64 = [a, b, c]
                    .iter()
                    .map(|q| ev.field(p, &[*q]).unwrap().length())
                    .sum();
                let tol = 1e-9 * scale.max(1e-12);
                prop_assert!((abc.field - cba.field).length() <= tol);
            }

            #[test]
            fn doubling_charge_doubles_contribution(c in charge(), p in point()) {
                prop_assume!(far_enough(p, &[c]));
                let ev = Evaluator::default();
                let doubled = Charge { charge: c.charge * 2.0, ..c };
                let one = ev.probe(p, &[c]).unwrap();
                let two = ev.probe(p, &[doubled]).unwrap();
                prop_assert!((two.magnitude - 2.0 * one.magnitude).abs() <= 1e-9 * two.magnitude);
                prop_assert!((two.potential - 2.0 * one.potential).abs() <= 1e-9 * two.potential.abs());
            }

            #[test]
            fn single_charge_magnitude_matches_coulomb(
                c in charge(),
                p in point(),
                conversion in 1.0_f64..500.0,
            ) {
                prop_assume!(far_enough(p, &[c]));
                let ev = Evaluator::new(conversion).unwrap();
                let r = distance(p, c.position) / conversion;
                let expected = DEFAULT_COULOMB * c.charge.abs() / (r * r);
                let got = ev.field(p, &[c]).unwrap().length();
                prop_assert!((got - expected).abs() <= 1e-9 * expected, "{got} vs {expected}");
            }

            #[test]
            fn query_on_any_charge_is_coincident(charges in prop::collection::vec(charge(), 1..6), pick in 0_usize..6) {
                let ev = Evaluator::default();
                let idx = pick % charges.len();
                let result = ev.field(charges[idx].position, &charges);
                prop_assert!(result.is_err());
            }
        }
    }
}
