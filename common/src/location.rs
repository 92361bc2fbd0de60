//! Location related module
//!
//! Positions are plain WGS84 latitude/longitude pairs in degrees.  Distances use the
//! equirectangular ("kwik") approximation: cheap and accurate enough at the scale of a city
//! airspace (tens of km), not meant for global distances.
//!
//! All distances are in meters.
//!

use serde::Deserialize;
use thiserror::Error;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS: f64 = 6_371_000.;

#[derive(Debug, Error, PartialEq)]
pub enum DistanceError {
    #[error("Mismatched array lengths: {0} lat/{1} lon vs {2} lat/{3} lon")]
    Mismatch(usize, usize, usize, usize),
}

/// Actual location
///
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
pub struct LatLon {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lon: f64,
}

impl LatLon {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Distance in meters to `other`.
    ///
    #[inline]
    pub fn kwikdist(&self, other: &LatLon) -> f64 {
        kwikdist(self.lat, self.lon, other.lat, other.lon)
    }
}

/// Size of a longitude difference once wrapped around the globe, in [0°, 180°].
///
/// Only the magnitude is used so that `a - b` and `b - a` give the same bits.
///
#[inline]
pub fn wrap_dlon(dlon: f64) -> f64 {
    let a = dlon.abs() % 360.;
    if a > 180. {
        360. - a
    } else {
        a
    }
}

/// Quick and dirty distance between two points, in meters.
///
#[inline]
pub fn kwikdist(lata: f64, lona: f64, latb: f64, lonb: f64) -> f64 {
    let dlat = (latb - lata).to_radians();
    let dlon = wrap_dlon(lonb - lona).to_radians();
    let cavelat = ((lata + latb) * 0.5).to_radians().cos();

    EARTH_RADIUS * (dlat * dlat + dlon * dlon * cavelat * cavelat).sqrt()
}

/// Element-wise distance between two sets of positions given as parallel arrays.
///
/// All four slices must have the same length.
///
pub fn kwikdist_matrix(
    lata: &[f64],
    lona: &[f64],
    latb: &[f64],
    lonb: &[f64],
) -> Result<Vec<f64>, DistanceError> {
    let n = lata.len();
    if lona.len() != n || latb.len() != n || lonb.len() != n {
        return Err(DistanceError::Mismatch(
            lata.len(),
            lona.len(),
            latb.len(),
            lonb.len(),
        ));
    }
    Ok(lata
        .iter()
        .zip(lona)
        .zip(latb.iter().zip(lonb))
        .map(|((&la, &lo), (&lb, &ob))| kwikdist(la, lo, lb, ob))
        .collect())
}

/// Distance from every position to a single reference point (e.g. the airspace center).
///
pub fn kwikdist_from(lats: &[f64], lons: &[f64], point: LatLon) -> Result<Vec<f64>, DistanceError> {
    if lats.len() != lons.len() {
        return Err(DistanceError::Mismatch(lats.len(), lons.len(), 1, 1));
    }
    Ok(lats
        .iter()
        .zip(lons)
        .map(|(&lat, &lon)| kwikdist(lat, lon, point.lat, point.lon))
        .collect())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[inline]
    fn shorten(v: f64) -> String {
        format!("{:.3}", v)
    }

    #[rstest]
    #[case(0., 0.)]
    #[case(10., 10.)]
    #[case(-10., 10.)]
    #[case(180., 180.)]
    #[case(-180., 180.)]
    #[case(358., 2.)]
    #[case(-358., 2.)]
    #[case(540., 180.)]
    fn test_wrap_dlon(#[case] inp: f64, #[case] out: f64) {
        assert_eq!(out, wrap_dlon(inp));
    }

    #[test]
    fn test_kwikdist_symmetric_bits() {
        // Longitude differences around 99° used to round differently depending on the order
        //
        for i in 0..2_000 {
            let lata = 48. + i as f64 * 1e-6;
            let lona = 100.137156789 + i as f64 * 1e-7;
            let (latb, lonb) = (48.5, 0.98);

            assert_eq!(
                kwikdist(lata, lona, latb, lonb),
                kwikdist(latb, lonb, lata, lona),
                "{lata}, {lona}"
            );
        }
    }

    #[test]
    fn test_kwikdist_one_degree_lat() {
        // One degree of latitude is R * pi / 180
        //
        let d = kwikdist(48., 16., 49., 16.);
        assert_eq!(shorten(EARTH_RADIUS.to_radians()), shorten(d));
        assert_eq!("111194.927", shorten(d));
    }

    #[test]
    fn test_kwikdist_antimeridian() {
        let a = kwikdist_matrix(&[10., 10.], &[179., 179.], &[10., 10.], &[-179., 181.]).unwrap();
        assert_eq!(a[0], a[1]);
        assert!(a[0] > 0.);
    }

    #[test]
    fn test_kwikdist_matrix_mismatch() {
        let r = kwikdist_matrix(&[1., 2.], &[1.], &[1., 2.], &[1., 2.]);
        assert_eq!(Err(DistanceError::Mismatch(2, 1, 2, 2)), r);
    }

    #[test]
    fn test_kwikdist_from_center() {
        let center = LatLon::new(48.20499787612939, 16.362249993868282);
        let d = kwikdist_from(&[center.lat, 48.3], &[center.lon, 16.362249993868282], center)
            .unwrap();
        assert_eq!(0., d[0]);
        assert_eq!(d[1], center.kwikdist(&LatLon::new(48.3, 16.362249993868282)));
        assert!(d[1] > 10_000.);
    }

    #[test]
    fn test_kwikdist_from_empty() {
        let d = kwikdist_from(&[], &[], LatLon::default()).unwrap();
        assert!(d.is_empty());
    }

    proptest! {
        #[test]
        fn prop_kwikdist_symmetric(
            lata in -80f64..80., lona in -180f64..180.,
            latb in -80f64..80., lonb in -180f64..180.,
        ) {
            let ab = kwikdist_matrix(&[lata], &[lona], &[latb], &[lonb]).unwrap();
            let ba = kwikdist_matrix(&[latb], &[lonb], &[lata], &[lona]).unwrap();
            prop_assert_eq!(ab[0], ba[0]);
        }

        #[test]
        fn prop_kwikdist_identity(lat in -90f64..90., lon in -180f64..180.) {
            prop_assert_eq!(0., kwikdist(lat, lon, lat, lon));
        }

        #[test]
        fn prop_kwikdist_wraparound(lat in -80f64..80., lon in -180f64..180., dl in -10f64..10.) {
            let a = kwikdist(lat, lon, lat, lon + dl);
            let b = kwikdist(lat, lon, lat, lon + dl + 360.);
            prop_assert!((a - b).abs() < 1e-3);
        }
    }
}
