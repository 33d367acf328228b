use gyre_core::vec3::{dot, norm};
use gyre_core::{ConfigError, NumberFormat, Options, Pusher};
use gyre_field::{GradientProvider, UniformProvider};
use gyre_pusher::{build_pusher, BorisPusher, GuidingCentrePusher, PusherSettings};
use gyre_test_utils::MockField;
use proptest::prelude::*;

fn settings(line: &str) -> PusherSettings {
    PusherSettings::from_options(&Options::parse(line)).unwrap()
}

#[test]
fn pxyz_on_logical_metric_is_rejected_before_stepping() {
    let err = BorisPusher::new(settings("-pxyz"), Box::new(MockField::logical())).err();
    assert!(matches!(
        err,
        Some(ConfigError::CartesianProjectionUnavailable { .. })
    ));

    let gradient = GradientProvider::new(1.0, 1.0, 1.0).unwrap();
    let err = build_pusher(
        &Options::parse("-pusher=guiding-centre -pxyz"),
        Box::new(gradient),
    )
    .err();
    assert_eq!(
        err,
        Some(ConfigError::CartesianProjectionUnavailable {
            metric: "logical".into()
        })
    );
}

#[test]
fn inconsistent_metric_is_rejected() {
    let err = GuidingCentrePusher::new(settings(""), Box::new(MockField::inconsistent())).err();
    assert_eq!(err, Some(ConfigError::InconsistentMetric));
}

#[test]
fn vanishing_field_at_start_is_rejected() {
    let field = MockField::with_fields([0.0; 3], None, true);
    let err = BorisPusher::new(settings(""), Box::new(field)).err();
    assert!(matches!(err, Some(ConfigError::InvalidSetting { .. })));
}

#[test]
fn overflowing_half_step_velocity_is_rejected() {
    // A huge perpendicular E overflows the back-rotation, not the settings.
    let err = BorisPusher::new(
        settings("-tfinal=4 -samples=4"),
        Box::new(UniformProvider::new([0.0, 0.0, 1.0], Some([1e300, 0.0, 0.0]))),
    )
    .err();
    assert!(matches!(
        err,
        Some(ConfigError::InvalidSetting { setting: "energy", .. })
    ));
}

#[test]
fn overflowing_initial_speed_is_rejected_by_every_pusher() {
    for pusher in ["boris", "guiding-centre"] {
        let line = format!("-pusher={pusher} -energy=1e300 -vref=1e-200");
        let err = build_pusher(
            &Options::parse(&line),
            Box::new(UniformProvider::new([0.0, 0.0, 1.0], None)),
        )
        .err();
        assert!(
            matches!(err, Some(ConfigError::InvalidSetting { setting: "energy", .. })),
            "{pusher}"
        );
    }
}

#[test]
fn times_are_exact_multiples_of_the_step() {
    let mut p = build_pusher(
        &Options::parse("-tfinal=1 -samples=10"),
        Box::new(UniformProvider::new([0.0, 0.0, 1.0], None)),
    )
    .unwrap();
    let mut time = 0.0;
    for i in 1..=10 {
        time = p.push_state(time).unwrap();
        assert_eq!(time, i as f64 * 0.1);
    }
    assert_eq!(time, 1.0);
}

#[test]
fn boris_conserves_speed_in_pure_magnetic_field() {
    let mut p = BorisPusher::new(
        settings("-samples=200 -tfinal=20 -vref=1e4 -pitch=0.3"),
        Box::new(UniformProvider::new([0.0, 0.0, 0.5], None)),
    )
    .unwrap();
    let v0 = norm(p.velocity(0.0));
    let mut t = 0.0;
    for _ in 0..200 {
        t = p.push_state(t).unwrap();
    }
    assert!((norm(p.velocity(t)) - v0).abs() < 1e-10 * v0);
}

#[test]
fn boris_row_matches_field_names() {
    let p = BorisPusher::new(
        settings("-pxyz -pkin -pb -pjac -phires"),
        Box::new(UniformProvider::new([0.0, 0.0, 2.0], None)),
    )
    .unwrap();
    assert_eq!(
        p.output_fields().header_line(),
        "# fields: t qu qv qw vx vy vz x y z Epar Eperp B jac"
    );
    let row = p.output_row(0.0);
    assert_eq!(row.len(), p.output_fields().len());
    assert_eq!(row[12], 2.0);
    assert_eq!(row[13], 1.0);
    assert_eq!(p.number_format(), NumberFormat::Scientific16);
}

#[test]
fn guiding_centre_follows_field_line_in_uniform_field() {
    let mut p = GuidingCentrePusher::new(
        settings("-samples=10 -tfinal=1 -pitch=1 -qu=0"),
        Box::new(UniformProvider::new([0.0, 0.0, 1.0], None)),
    )
    .unwrap();
    let vpar = p.output_row(0.0)[4];
    let mut t = 0.0;
    for _ in 0..10 {
        t = p.push_state(t).unwrap();
    }
    let q = p.position(t);
    assert!(q[0].abs() < 1e-12);
    assert!(q[1].abs() < 1e-12);
    assert!((q[2] - vpar * t).abs() < 1e-9 * vpar.max(1.0));
}

#[test]
fn guiding_centre_drifts_with_e_cross_b() {
    let mut p = GuidingCentrePusher::new(
        settings("-samples=4 -tfinal=1 -pitch=0 -energy=0 -qu=0"),
        Box::new(UniformProvider::new([0.0, 0.0, 1.0], Some([1.0, 0.0, 0.0]))),
    )
    .unwrap();
    let v = p.velocity(0.0);
    // E x B with E = x, B = z gives -y.
    assert!((v[1] + 1.0).abs() < 1e-12);
    let mut t = 0.0;
    for _ in 0..4 {
        t = p.push_state(t).unwrap();
    }
    assert!((p.position(t)[1] + 1.0).abs() < 1e-9);
}

#[test]
fn guiding_centre_grad_b_drift_is_binormal() {
    let p = GuidingCentrePusher::new(
        settings("-pitch=0 -energy=1 -vref=1e4"),
        Box::new(GradientProvider::new(1.0, 1.0, 1.0).unwrap()),
    )
    .unwrap();
    assert!(p.magnetic_moment() > 0.0);
    // |B| grows along qu and b = z, so the grad-B drift is along b x grad|B| = +y.
    let v = p.velocity(0.0);
    assert!(v[1] > 0.0);
    assert_eq!(dot(v, [1.0, 0.0, 0.0]), 0.0);
}

proptest! {
    #[test]
    fn every_row_has_the_declared_width(
        pxyz in any::<bool>(), pkin in any::<bool>(), pb in any::<bool>(), pjac in any::<bool>(),
        gc in any::<bool>(),
    ) {
        let mut line = String::from("-samples=8");
        for (on, flag) in [(pxyz, "-pxyz"), (pkin, "-pkin"), (pb, "-pb"), (pjac, "-pjac")] {
            if on {
                line.push(' ');
                line.push_str(flag);
            }
        }
        if gc {
            line.push_str(" -pusher=guiding-centre");
        }
        let mut p = build_pusher(
            &Options::parse(&line),
            Box::new(UniformProvider::new([0.0, 0.0, 1.0], None)),
        ).unwrap();
        let width = p.output_fields().len();
        let mut t = 0.0;
        for _ in 0..3 {
            prop_assert_eq!(p.output_row(t).len(), width);
            t = p.push_state(t).unwrap();
        }
    }
}
