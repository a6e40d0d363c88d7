use celestial_region::constants::GALACTIC_TO_ICRS;
use celestial_region::{GalacticCartesian, RegionDescriptor, RegionError};

fn icrs_to_galactic_direct(d: f64, ra_deg: f64, dec_deg: f64) -> [f64; 3] {
    let (ra, dec) = (ra_deg.to_radians(), dec_deg.to_radians());
    let v = [dec.cos() * ra.cos(), dec.cos() * ra.sin(), dec.sin()];
    let mut out = [0.0; 3];
    for (i, row) in GALACTIC_TO_ICRS.iter().enumerate() {
        out[i] = d * (row[0] * v[0] + row[1] * v[1] + row[2] * v[2]);
    }
    out
}

/// (l, b) in degrees of the ICRS direction (ra, dec).
fn galactic_angles(ra_deg: f64, dec_deg: f64) -> (f64, f64) {
    let [x, y, z] = icrs_to_galactic_direct(1.0, ra_deg, dec_deg);
    (y.atan2(x).to_degrees(), z.asin().to_degrees())
}

#[test]
fn parallax_implies_distance() {
    for plx in [0.1, 1.0, 5.718, 10.0, 123.4] {
        let r = RegionDescriptor::new().parallax(plx).resolve().unwrap();
        assert!((r.distance().unwrap().parsecs() - 1000.0 / plx).abs() < 1e-9);
    }
}

#[test]
fn distance_implies_parallax() {
    for d in [1.0, 47.3, 100.0, 174.9, 2500.0] {
        let r = RegionDescriptor::new().distance(d).resolve().unwrap();
        assert!((r.parallax_mas().unwrap() - 1000.0 / d).abs() < 1e-9);
    }
}

#[test]
fn matching_parallax_and_distance_accepted() {
    let r = RegionDescriptor::new()
        .parallax(10.0)
        .distance(100.000001)
        .resolve();
    assert!(r.is_ok());
}

#[test]
fn mismatched_parallax_and_distance_rejected_when_strict() {
    let err = RegionDescriptor::new()
        .parallax(10.0)
        .distance(101.0)
        .strict(true)
        .resolve()
        .unwrap_err();
    assert!(matches!(err, RegionError::CoordinateMismatch { .. }));
}

#[test]
fn equatorial_path_only() {
    let r = RegionDescriptor::new()
        .distance(100.0)
        .equatorial(10.0, 20.0)
        .resolve()
        .unwrap();
    let c = r.resolve_center().unwrap();
    let expected = icrs_to_galactic_direct(100.0, 10.0, 20.0);
    for (got, want) in c.to_array().iter().zip(expected.iter()) {
        assert!((got - want).abs() < 1e-6, "{} vs {}", got, want);
    }
}

#[test]
fn galactic_path_only() {
    let r = RegionDescriptor::new()
        .parallax(10.0)
        .galactic(30.0, 5.0)
        .resolve()
        .unwrap();
    let c = r.resolve_center().unwrap();
    let (b, l) = (5.0_f64.to_radians(), 30.0_f64.to_radians());
    assert!((c.x() - 100.0 * b.cos() * l.cos()).abs() < 1e-6);
    assert!((c.y() - 100.0 * b.cos() * l.sin()).abs() < 1e-6);
    assert!((c.z() - 100.0 * b.sin()).abs() < 1e-6);
}

#[test]
fn agreeing_paths_are_averaged() {
    let (ra, dec) = (56.75, 24.12);
    let (l, b) = galactic_angles(ra, dec);
    let l = l + 0.01;

    let r = RegionDescriptor::new()
        .distance(100.0)
        .equatorial(ra, dec)
        .parallax(10.0)
        .galactic(l, b)
        .resolve()
        .unwrap();
    let c = r.resolve_center().unwrap();

    let eq: GalacticCartesian = {
        let [x, y, z] = icrs_to_galactic_direct(100.0, ra, dec);
        GalacticCartesian::new(x, y, z)
    };
    let (lr, br) = (l.to_radians(), b.to_radians());
    let gal = GalacticCartesian::new(
        100.0 * br.cos() * lr.cos(),
        100.0 * br.cos() * lr.sin(),
        100.0 * br.sin(),
    );
    assert!(eq.agrees_with(&gal, 0.1));
    assert!(eq.max_abs_difference(&gal) > 1e-3);

    let mid = eq.midpoint(&gal);
    assert!(c.max_abs_difference(&mid) < 1e-9);
    assert!(r.diagnostics().is_empty());
}

#[test]
fn disagreeing_paths() {
    let (ra, dec) = (56.75, 24.12);
    let (l, b) = galactic_angles(ra, dec);
    let shifted = || {
        RegionDescriptor::new()
            .named("shifted")
            .distance(100.0)
            .equatorial(ra, dec)
            .parallax(10.0)
            .galactic(l + 1.0, b)
    };

    let strict = shifted().strict(true).resolve().unwrap();
    match strict.resolve_center() {
        Err(RegionError::CoordinateMismatch { discrepancy, .. }) => assert!(discrepancy > 0.1),
        other => panic!("expected CoordinateMismatch, got {:?}", other),
    }

    let lenient = shifted().strict(false).resolve().unwrap();
    let c = lenient.resolve_center().unwrap();
    let [x, y, z] = icrs_to_galactic_direct(100.0, ra, dec);
    assert!(c.max_abs_difference(&GalacticCartesian::new(x, y, z)) < 1e-9);
    assert_eq!(lenient.diagnostics().len(), 1);
}

#[test]
fn insufficient_inputs() {
    let cases = [
        RegionDescriptor::new(),
        RegionDescriptor::new().parallax(10.0),
        RegionDescriptor::new().equatorial(10.0, 20.0),
        RegionDescriptor::new().galactic(30.0, 5.0),
    ];
    for (i, descriptor) in cases.into_iter().enumerate() {
        let r = descriptor.resolve().unwrap();
        assert!(
            matches!(r.resolve_center(), Err(RegionError::InsufficientData { .. })),
            "case {} should lack data",
            i
        );
    }
}

#[test]
fn resolve_center_is_cached() {
    let r = RegionDescriptor::new()
        .named("Pleiades")
        .parallax(5.718)
        .galactic(147.3566, -6.4040)
        .resolve()
        .unwrap();
    let first = r.resolve_center().unwrap();
    let second = r.resolve_center().unwrap();
    assert_eq!(first, second);
}

#[test]
fn lenient_mismatch_logged_once() {
    let (l, b) = galactic_angles(10.0, 20.0);
    let r = RegionDescriptor::new()
        .distance(100.0)
        .equatorial(10.0, 20.0)
        .parallax(10.0)
        .galactic(l + 2.0, b)
        .strict(false)
        .resolve()
        .unwrap();
    r.resolve_center().unwrap();
    r.resolve_center().unwrap();
    assert_eq!(r.diagnostics().len(), 1);
}

#[test]
fn distance_tolerance_boundary() {
    // parallax 10 mas -> exactly 100 pc
    let inside = RegionDescriptor::new()
        .parallax(10.0)
        .distance(100.000009)
        .resolve();
    assert!(inside.is_ok());

    let at_edge = RegionDescriptor::new()
        .parallax(10.0)
        .distance(100.00001)
        .resolve()
        .unwrap_err();
    assert!(matches!(at_edge, RegionError::CoordinateMismatch { .. }));
}

#[test]
fn center_tolerance_boundary() {
    // l = 0, b = 0 at 100 pc places the derived center at exactly (100, 0, 0)
    let with_explicit = |y: f64| {
        RegionDescriptor::new()
            .parallax(10.0)
            .galactic(0.0, 0.0)
            .cartesian(100.0, y, 0.0)
            .resolve()
            .unwrap()
    };

    let inside = with_explicit(0.09999);
    assert_eq!(
        inside.resolve_center().unwrap(),
        GalacticCartesian::new(100.0, 0.0, 0.0)
    );

    let at_edge = with_explicit(0.1);
    match at_edge.resolve_center() {
        Err(RegionError::CoordinateMismatch { discrepancy, .. }) => {
            assert_eq!(discrepancy, 0.1)
        }
        other => panic!("expected CoordinateMismatch, got {:?}", other),
    }

    let check = celestial_region::cross_validate(
        GalacticCartesian::new(0.0, 0.0, 0.1),
        GalacticCartesian::new(0.0, 0.0, 0.0),
    );
    assert!(!check.matches);
}
