//! Touch and rangefinder sensors against hand-placed contacts and geoms.

use std::f64::consts::{FRAC_PI_4, PI};

use approx::assert_relative_eq;
use nalgebra::{UnitQuaternion, Vector3};
use sim_sensor::{
    ConstraintType, Contact, Data, GeomType, MjJointType, MjObjectType, MjSensorType, Model,
};

use super::harness::forward;
use super::sensor_test_utils::Rig;

// ============================================================================
// Touch
// ============================================================================

const FLOOR: usize = 0;
const CRATE_GEOM: usize = 1;
const BALL_GEOM: usize = 2;

/// Floor plane, a free crate (box, half-size 0.1) resting on it, and a free
/// ball beside it. The crate carries touch sensors with different zones.
fn crate_on_floor() -> Model {
    let mut model = Model::empty();
    model.add_geom(0, GeomType::Plane, Vector3::zeros(), UnitQuaternion::identity(), Vector3::zeros());

    let crate_body = model.add_body(0, Vector3::zeros(), UnitQuaternion::identity(), 2.0, Vector3::repeat(0.01));
    model.add_joint(crate_body, MjJointType::Free, Vector3::zeros(), Vector3::z());
    model.add_geom(
        crate_body,
        GeomType::Box,
        Vector3::zeros(),
        UnitQuaternion::identity(),
        Vector3::repeat(0.1),
    );

    let ball = model.add_body(0, Vector3::zeros(), UnitQuaternion::identity(), 1.0, Vector3::repeat(0.004));
    model.add_joint(ball, MjJointType::Free, Vector3::zeros(), Vector3::z());
    model.add_geom(ball, GeomType::Sphere, Vector3::zeros(), UnitQuaternion::identity(), Vector3::new(0.1, 0.0, 0.0));

    // Zone enclosing the whole crate.
    let whole = model.add_site(
        crate_body,
        GeomType::Box,
        Vector3::zeros(),
        UnitQuaternion::identity(),
        Vector3::repeat(0.11),
    );
    // Small zone near the crate's top face.
    let top = model.add_site(
        crate_body,
        GeomType::Sphere,
        Vector3::new(0.0, 0.0, 0.05),
        UnitQuaternion::identity(),
        Vector3::new(0.05, 0.0, 0.0),
    );

    let s = model.add_sensor(MjSensorType::Touch, MjObjectType::Site, whole);
    model.sensor_name[s] = Some("touch_whole".to_string());
    let s = model.add_sensor(MjSensorType::Touch, MjObjectType::Site, top);
    model.sensor_name[s] = Some("touch_top".to_string());
    model
}

/// Place both free bodies: crate centred at height 0.1, ball off to the side.
fn resting_state(model: &Model) -> Data {
    let mut data = model.make_data();
    data.qpos.rows_mut(0, 7).copy_from_slice(&[0.0, 0.0, 0.1, 1.0, 0.0, 0.0, 0.0]);
    data.qpos.rows_mut(7, 7).copy_from_slice(&[1.0, 0.0, 0.1, 1.0, 0.0, 0.0, 0.0]);
    data
}

fn push_contact(data: &mut Data, contact: Contact, efc_type: ConstraintType, forces: &[f64]) {
    let id = data.contacts.len();
    let depth = contact.depth;
    data.contacts.push(contact);
    data.push_constraint(efc_type, id, -depth, 0.0, 0.0, forces);
}

/// Floor-to-crate contact under the crate centre, normal +Z.
fn floor_contact() -> Contact {
    Contact::new(Vector3::zeros(), Vector3::z(), 1e-3, FLOOR, CRATE_GEOM, 3)
}

fn touch_after(rig: &Rig, contacts: impl FnOnce(&mut Data)) -> Data {
    let mut data = resting_state(&rig.model);
    forward(&rig.model, &mut data, &[]);
    contacts(&mut data);
    rig.sense(&mut data);
    data
}

#[test]
fn frictionless_contact_reports_its_normal_force() {
    let rig = Rig::new(crate_on_floor());
    let data = touch_after(&rig, |d| {
        push_contact(d, floor_contact(), ConstraintType::ContactFrictionless, &[12.0]);
    });
    assert_relative_eq!(rig.scalar(&data, "touch_whole"), 12.0);
}

#[test]
fn touch_cutoff_caps_the_summed_force() {
    let mut model = crate_on_floor();
    model.sensor_cutoff[0] = 5.0;
    let rig = Rig::new(model);

    let data = touch_after(&rig, |d| {
        push_contact(d, floor_contact(), ConstraintType::ContactFrictionless, &[12.0]);
    });
    assert_relative_eq!(rig.scalar(&data, "touch_whole"), 5.0);

    // Readings under the cutoff pass through.
    let data = touch_after(&rig, |d| {
        push_contact(d, floor_contact(), ConstraintType::ContactFrictionless, &[3.5]);
    });
    assert_relative_eq!(rig.scalar(&data, "touch_whole"), 3.5);
}

#[test]
fn pyramidal_contact_sums_facet_rows() {
    let rig = Rig::new(crate_on_floor());
    let data = touch_after(&rig, |d| {
        push_contact(d, floor_contact(), ConstraintType::ContactPyramidal, &[1.0, 2.0, 3.0, 4.0]);
    });
    assert_relative_eq!(rig.scalar(&data, "touch_whole"), 10.0);
}

#[test]
fn elliptic_contact_uses_first_row_only() {
    let rig = Rig::new(crate_on_floor());
    let data = touch_after(&rig, |d| {
        push_contact(d, floor_contact(), ConstraintType::ContactElliptic, &[5.0, 0.3, -0.2]);
    });
    assert_relative_eq!(rig.scalar(&data, "touch_whole"), 5.0);
}

#[test]
fn mixed_rows_accumulate_contacts_and_skip_limits() {
    let rig = Rig::new(crate_on_floor());
    let data = touch_after(&rig, |d| {
        push_contact(d, floor_contact(), ConstraintType::ContactFrictionless, &[12.0]);
        d.push_constraint(ConstraintType::LimitJoint, 0, -0.1, 0.0, 0.0, &[100.0]);
        push_contact(d, floor_contact(), ConstraintType::ContactPyramidal, &[1.0, 2.0, 3.0, 4.0]);
        push_contact(d, floor_contact(), ConstraintType::ContactElliptic, &[5.0, 0.3, -0.2]);
    });
    assert_relative_eq!(rig.scalar(&data, "touch_whole"), 27.0);
}

#[test]
fn non_positive_normal_force_is_ignored() {
    let rig = Rig::new(crate_on_floor());
    let data = touch_after(&rig, |d| {
        push_contact(d, floor_contact(), ConstraintType::ContactFrictionless, &[-2.0]);
        push_contact(d, floor_contact(), ConstraintType::ContactFrictionless, &[0.0]);
    });
    assert_eq!(rig.scalar(&data, "touch_whole"), 0.0);
}

#[test]
fn contacts_on_other_bodies_are_ignored() {
    let rig = Rig::new(crate_on_floor());
    let data = touch_after(&rig, |d| {
        let contact = Contact::new(Vector3::new(1.0, 0.0, 0.0), Vector3::z(), 1e-3, FLOOR, BALL_GEOM, 3);
        push_contact(d, contact, ConstraintType::ContactFrictionless, &[9.0]);
    });
    assert_eq!(rig.scalar(&data, "touch_whole"), 0.0);
    assert_eq!(rig.scalar(&data, "touch_top"), 0.0);
}

#[test]
fn zone_filters_by_force_ray() {
    let rig = Rig::new(crate_on_floor());

    // Under the crate: the ray points down, away from the top zone.
    let data = touch_after(&rig, |d| {
        push_contact(d, floor_contact(), ConstraintType::ContactFrictionless, &[12.0]);
    });
    assert_eq!(rig.scalar(&data, "touch_top"), 0.0);

    // Crate as first party, contact above the zone with the normal pointing
    // down: the ray passes through the zone although the point is outside.
    let data = touch_after(&rig, |d| {
        let contact = Contact::new(Vector3::new(0.0, 0.0, 0.3), -Vector3::z(), 1e-3, CRATE_GEOM, BALL_GEOM, 3);
        push_contact(d, contact, ConstraintType::ContactFrictionless, &[4.0]);
    });
    assert_relative_eq!(rig.scalar(&data, "touch_top"), 4.0);

    // Same, shifted sideways: the ray misses.
    let data = touch_after(&rig, |d| {
        let contact = Contact::new(Vector3::new(0.3, 0.0, 0.3), -Vector3::z(), 1e-3, CRATE_GEOM, BALL_GEOM, 3);
        push_contact(d, contact, ConstraintType::ContactFrictionless, &[4.0]);
    });
    assert_eq!(rig.scalar(&data, "touch_top"), 0.0);
}

#[test]
fn contact_point_inside_zone_always_counts() {
    let rig = Rig::new(crate_on_floor());
    let data = touch_after(&rig, |d| {
        // Zone centre of the top site is at world height 0.15.
        let contact = Contact::new(Vector3::new(0.0, 0.0, 0.15), Vector3::x(), 1e-3, CRATE_GEOM, BALL_GEOM, 3);
        push_contact(d, contact, ConstraintType::ContactFrictionless, &[3.0]);
    });
    assert_relative_eq!(rig.scalar(&data, "touch_top"), 3.0);
    assert_relative_eq!(rig.scalar(&data, "touch_whole"), 3.0);
}

// ============================================================================
// Rangefinder
// ============================================================================

/// Floor plane, a world sphere at height 0.5, and a welded body at height 1
/// carrying its own sphere plus three rangefinder sites.
fn range_rig() -> Rig {
    let mut model = Model::empty();
    model.add_geom(0, GeomType::Plane, Vector3::zeros(), UnitQuaternion::identity(), Vector3::zeros());

    let head = model.add_body(0, Vector3::new(0.0, 0.0, 1.0), UnitQuaternion::identity(), 1.0, Vector3::repeat(0.01));
    // Encloses the sites; must not occlude them.
    model.add_geom(head, GeomType::Sphere, Vector3::zeros(), UnitQuaternion::identity(), Vector3::new(0.2, 0.0, 0.0));

    let down = model.add_site(
        head,
        GeomType::Sphere,
        Vector3::zeros(),
        UnitQuaternion::from_euler_angles(PI, 0.0, 0.0),
        Vector3::new(0.01, 0.0, 0.0),
    );
    let up = model.add_site(head, GeomType::Sphere, Vector3::zeros(), UnitQuaternion::identity(), Vector3::new(0.01, 0.0, 0.0));
    let slanted = model.add_site(
        head,
        GeomType::Sphere,
        Vector3::zeros(),
        UnitQuaternion::from_euler_angles(3.0 * FRAC_PI_4, 0.0, 0.0),
        Vector3::new(0.01, 0.0, 0.0),
    );

    for (site, name) in [(down, "range_down"), (up, "range_up"), (slanted, "range_slanted")] {
        let s = model.add_sensor(MjSensorType::Rangefinder, MjObjectType::Site, site);
        model.sensor_name[s] = Some(name.to_string());
    }
    Rig::new(model)
}

fn ranged(rig: &Rig) -> Data {
    let mut data = rig.model.make_data();
    rig.step(&mut data, &[]);
    data
}

#[test]
fn rangefinder_hits_floor_and_ignores_own_body() {
    let rig = range_rig();
    let data = ranged(&rig);
    assert_relative_eq!(rig.scalar(&data, "range_down"), 1.0, epsilon = 1e-12);
    assert_relative_eq!(rig.scalar(&data, "range_slanted"), 2.0_f64.sqrt(), epsilon = 1e-12);
    assert_eq!(rig.scalar(&data, "range_up"), -1.0);
}

#[test]
fn rangefinder_reports_nearest_geom() {
    let mut model = (*range_rig().model).clone();
    model.add_geom(0, GeomType::Sphere, Vector3::new(0.0, 0.0, 0.5), UnitQuaternion::identity(), Vector3::new(0.1, 0.0, 0.0));
    let rig = Rig::new(model);
    let data = ranged(&rig);
    assert_relative_eq!(rig.scalar(&data, "range_down"), 0.4, epsilon = 1e-12);
    // The slanted ray passes beside the sphere.
    assert_relative_eq!(rig.scalar(&data, "range_slanted"), 2.0_f64.sqrt(), epsilon = 1e-12);
}

#[test]
fn rangefinder_cutoff_keeps_no_hit_value() {
    let mut model = (*range_rig().model).clone();
    for s in 0..model.nsensor {
        model.sensor_cutoff[s] = 0.25;
    }
    let rig = Rig::new(model);
    let data = ranged(&rig);
    assert_relative_eq!(rig.scalar(&data, "range_down"), 0.25);
    assert_eq!(rig.scalar(&data, "range_up"), -1.0);
}
