use tether::{
    ContactResolver, ForceKind, Link, LinkEnd, NoOpStepObserver, Particle, ParticleSet,
    PhysicsError, Vec3,
};

fn resolve_once(set: &mut ParticleSet<f64>, link: &Link<f64>) {
    let contact = link.contact(set).unwrap().expect("link should be violated");
    let mut contacts = [contact];
    let report = ContactResolver::new()
        .with_iteration_limit(1)
        .resolve_contacts(&mut contacts, set, 0.016, &mut NoOpStepObserver)
        .unwrap();
    assert_eq!(report.iterations, 1);
}

#[test]
fn slack_cable_reports_nothing() {
    let mut set = ParticleSet::new();
    let p = set.insert(Particle::new(Vec3::new(0.0f64, -2.0, 0.0), 1.0));
    let cable = Link::cable(p, LinkEnd::Anchor(Vec3::zero()), 3.0, 0.5);

    assert!(cable.contact(&set).unwrap().is_none());
    set.get_mut(p).unwrap().position = Vec3::new(0.0, 0.0, -2.999);
    assert!(cable.contact(&set).unwrap().is_none());
}

#[test]
fn taut_cable_reports_overshoot_along_anchor_to_particle() {
    let mut set = ParticleSet::new();
    let eps = 0.05;
    let p = set.insert(Particle::new(Vec3::new(0.0f64, -(3.0 + eps), 0.0), 1.0));
    let anchor = Vec3::zero();
    let cable = Link::cable(p, LinkEnd::Anchor(anchor), 3.0, 0.5);

    let contact = cable.contact(&set).unwrap().unwrap();
    assert!((contact.penetration - eps).abs() < 1e-12);
    assert!(contact.normal.distance(Vec3::new(0.0, -1.0, 0.0)) < 1e-12);
    assert!((contact.restitution - 0.5).abs() < 1e-12);
    assert_eq!(contact.b, None);
}

#[test]
fn cable_clamps_back_onto_max_length_with_restitution() {
    let mut set = ParticleSet::new();
    let p = set.insert(
        Particle::new(Vec3::new(3.2f64, 0.0, 0.0), 1.0).with_velocity(Vec3::new(4.0, 1.0, 0.0)),
    );
    let cable = Link::cable(p, LinkEnd::Anchor(Vec3::zero()), 3.0, 0.5);
    resolve_once(&mut set, &cable);

    let particle = set.get(p).unwrap();
    assert!((particle.position.length() - 3.0).abs() < 1e-12);
    // Radial velocity reversed and halved, tangential velocity untouched.
    assert!((particle.velocity.x + 2.0).abs() < 1e-12);
    assert!((particle.velocity.y - 1.0).abs() < 1e-12);
}

#[test]
fn cable_to_negative_mass_particle_treats_it_as_fixed() {
    let mut set = ParticleSet::new();
    let post = set.insert(Particle::new(Vec3::zero(), -1.0f64));
    let p = set.insert(Particle::new(Vec3::new(1.5, 0.0, 0.0), 1.0));
    let cable = Link::cable(p, LinkEnd::Particle(post), 1.0, 0.0);
    resolve_once(&mut set, &cable);

    assert_eq!(set.get(post).unwrap().position, Vec3::zero());
    assert!((set.get(p).unwrap().position.x - 1.0).abs() < 1e-12);
}

#[test]
fn rod_at_exact_length_reports_nothing() {
    let mut set = ParticleSet::new();
    let a = set.insert(Particle::new(Vec3::new(0.0f64, 0.0, 0.0), 1.0));
    let b = set.insert(Particle::new(Vec3::new(0.0, 2.0, 0.0), 1.0));
    let rod = Link::rod(a, LinkEnd::Particle(b), 2.0);
    assert!(rod.contact(&set).unwrap().is_none());
}

#[test]
fn stretched_rod_restores_length() {
    let mut set = ParticleSet::new();
    let a = set.insert(Particle::new(Vec3::new(0.0f64, 0.0, 0.0), 1.0));
    let b = set.insert(Particle::new(Vec3::new(0.0, 2.3, 0.0), 1.0));
    let rod = Link::rod(a, LinkEnd::Particle(b), 2.0);

    let contact = rod.contact(&set).unwrap().unwrap();
    assert!((contact.penetration - 0.3).abs() < 1e-12);

    resolve_once(&mut set, &rod);
    assert!((rod.current_length(&set).unwrap() - 2.0).abs() < 1e-12);
    // Equal masses share the correction.
    assert!((set.get(a).unwrap().position.y - 0.15).abs() < 1e-12);
}

#[test]
fn compressed_rod_pushes_apart() {
    let mut set = ParticleSet::new();
    let p = set.insert(Particle::new(Vec3::new(1.6f64, 0.0, 0.0), 1.0));
    let rod = Link::rod(p, LinkEnd::Anchor(Vec3::zero()), 2.0);

    let contact = rod.contact(&set).unwrap().unwrap();
    assert!((contact.penetration - 0.4).abs() < 1e-12);
    assert!(contact.normal.distance(Vec3::new(-1.0, 0.0, 0.0)) < 1e-12);

    resolve_once(&mut set, &rod);
    assert!((set.get(p).unwrap().position.x - 2.0).abs() < 1e-12);
}

#[test]
fn rod_kills_closing_velocity() {
    let mut set = ParticleSet::new();
    let p = set.insert(
        Particle::new(Vec3::new(2.1f64, 0.0, 0.0), 1.0).with_velocity(Vec3::new(5.0, 0.0, 0.0)),
    );
    let rod = Link::rod(p, LinkEnd::Anchor(Vec3::zero()), 2.0);
    resolve_once(&mut set, &rod);
    assert!(set.get(p).unwrap().velocity.x.abs() < 1e-12);
}

#[test]
fn coincident_ends_report_nothing() {
    let mut set = ParticleSet::new();
    let p = set.insert(Particle::new(Vec3::new(1.0f64, 1.0, 1.0), 1.0));
    let rod = Link::rod(p, LinkEnd::Anchor(Vec3::new(1.0, 1.0, 1.0)), 2.0);
    assert!(rod.contact(&set).unwrap().is_none());
}

#[test]
fn link_validation() {
    let mut set = ParticleSet::new();
    let p = set.insert(Particle::new(Vec3::<f64>::zero(), 1.0));
    let anchor = LinkEnd::Anchor(Vec3::new(0.0, 1.0, 0.0));

    assert_eq!(Link::rod(p, anchor, 0.0).validate(&set), Err(PhysicsError::InvalidLength));
    assert_eq!(Link::cable(p, anchor, 1.0, 1.5).validate(&set), Err(PhysicsError::InvalidRestitution));
    assert_eq!(
        Link::rod(p, LinkEnd::Particle(p), 1.0).validate(&set),
        Err(PhysicsError::SelfLink { index: p.index() })
    );
    assert!(Link::cable(p, anchor, 1.0, 0.3).validate(&set).is_ok());
}

#[test]
fn bungee_only_pulls_when_stretched() {
    let anchor = Vec3::zero();
    let bungee = ForceKind::bungee(LinkEnd::Anchor(anchor), 5.0, 2.0);

    let slack = Particle::new(Vec3::new(1.0f64, 0.0, 0.0), 1.0);
    assert_eq!(bungee.force_on(&slack, Some(anchor)), Vec3::zero());

    let stretched = Particle::new(Vec3::new(0.0, 0.0, 4.0), 1.0);
    let f = bungee.force_on(&stretched, Some(anchor));
    assert!((f.length() - 10.0).abs() < 1e-12);
    assert!(f.normalize().distance(Vec3::new(0.0, 0.0, -1.0)) < 1e-12);
}

#[test]
fn bungee_through_registry_reads_anchor_particle() {
    let mut set = ParticleSet::new();
    let hook = set.insert(Particle::immovable(Vec3::new(0.0f64, 10.0, 0.0)));
    let jumper = set.insert(Particle::new(Vec3::new(0.0, 4.0, 0.0), 1.0));
    let bungee = ForceKind::bungee(LinkEnd::Particle(hook), 2.0, 5.0);

    bungee.update_force(jumper, &mut set, 0.016).unwrap();
    // Stretched by 1 toward the hook above.
    assert!((set.get(jumper).unwrap().accumulated_force().y - 2.0).abs() < 1e-12);
}
