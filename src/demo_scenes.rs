use crate::{
    camera::Camera,
    lights::quad_light::QuadLight,
    materials::{
        Materials, dielectric::Dielectric, lambertian::Lambertian, metal::Metal,
        oren_nayar::OrenNayar,
    },
    objects::{Axis, Hittables, hitlist::HitList, quad::Quad, quad::new_box, sphere::Sphere,
        transforms::Rotate, transforms::Translate},
    scene::{Background, Scene},
    textures::{
        Textures, checker_texture::CheckerTexture, noise_texture::NoiseStyle,
        noise_texture::NoiseTexture,
    },
    utils::{Color, Point3, Vec3},
};

use std::sync::Arc;

/// The classic Cornell box: white walls, red left, green right, area
/// light in the ceiling, two rotated boxes.
pub fn cornell_box() -> (Scene, Camera) {
    let red = Materials::Lambertian(Lambertian::new_from_color(Color::new(0.65, 0.05, 0.05)));
    let white = Materials::Lambertian(Lambertian::new_from_color(Color::new(0.73, 0.73, 0.73)));
    let green = Materials::Lambertian(Lambertian::new_from_color(Color::new(0.12, 0.45, 0.15)));

    let mut objects = HitList::default();

    // green right wall
    objects.add(Hittables::Quad(Quad::new(
        Point3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
        "right wall",
    )));
    // red left wall
    objects.add(Hittables::Quad(Quad::new(
        Point3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        red,
        "left wall",
    )));
    // floor
    objects.add(Hittables::Quad(Quad::new(
        Point3::new(0.0, 0.0, 0.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
        "floor",
    )));
    // ceiling
    objects.add(Hittables::Quad(Quad::new(
        Point3::new(555.0, 555.0, 555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        white.clone(),
        "ceiling",
    )));
    // back wall
    objects.add(Hittables::Quad(Quad::new(
        Point3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        white.clone(),
        "back wall",
    )));

    let lamp = QuadLight::new(
        Point3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
        15.0,
        Color::white(),
        false,
        "ceiling light",
    );
    objects.add(Hittables::QuadLight(lamp.clone()));

    // tall box
    let tall = new_box(
        &Point3::new(0.0, 0.0, 0.0),
        &Point3::new(165.0, 330.0, 165.0),
        white.clone(),
        "tall box",
    );
    let tall = Hittables::Rotate(Rotate::new(tall, Axis::Y, 15.0));
    let tall = Hittables::Translate(Translate::new(tall, Vec3::new(265.0, 0.0, 295.0)));
    objects.add(tall);

    // short box
    let short = new_box(
        &Point3::new(0.0, 0.0, 0.0),
        &Point3::new(165.0, 165.0, 165.0),
        white,
        "short box",
    );
    let short = Hittables::Rotate(Rotate::new(short, Axis::Y, -18.0));
    let short = Hittables::Translate(Translate::new(short, Vec3::new(130.0, 0.0, 65.0)));
    objects.add(short);

    let mut emissive = HitList::default();
    emissive.add(Hittables::QuadLight(lamp));

    let scene = Scene::new(objects, emissive, Background::Solid(Color::black()));

    let mut cam = Camera::new(1.0, 600);
    cam.look_from(Point3::new(278.0, 278.0, -800.0));
    cam.look_at(Point3::new(278.0, 278.0, 0.0));
    cam.set_vfov(40.0);

    (scene, cam)
}

/// Three spheres over a checker ground: matte, glass, metal.
pub fn three_spheres() -> (Scene, Camera) {
    let mut objects = HitList::default();

    let checker = CheckerTexture::new_from_color(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    );
    let ground = Materials::Lambertian(Lambertian::new_from_texture(Arc::new(
        Textures::CheckerTexture(checker),
    )));
    objects.add(Hittables::Sphere(Sphere::new(
        Point3::new(0.0, -100.5, -1.0),
        100.0,
        ground,
        "ground",
    )));

    objects.add(Hittables::Sphere(Sphere::new(
        Point3::new(0.0, 0.0, -1.2),
        0.5,
        Materials::Lambertian(Lambertian::new_from_color(Color::new(0.1, 0.2, 0.5))),
        "center",
    )));
    objects.add(Hittables::Sphere(Sphere::new(
        Point3::new(-1.0, 0.0, -1.0),
        0.5,
        Materials::Dielectric(Dielectric::new(1.5)),
        "glass",
    )));
    objects.add(Hittables::Sphere(Sphere::new(
        Point3::new(1.0, 0.0, -1.0),
        0.5,
        Materials::Metal(Metal::new(Color::new(0.8, 0.6, 0.2), 0.05)),
        "metal",
    )));

    let lamp = QuadLight::new(
        Point3::new(-2.0, 4.0, -3.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        4.0,
        Color::white(),
        false,
        "sky light",
    );
    objects.add(Hittables::QuadLight(lamp.clone()));
    let mut emissive = HitList::default();
    emissive.add(Hittables::QuadLight(lamp));

    let scene = Scene::new(
        objects,
        emissive,
        Background::Solid(Color::new(0.5, 0.7, 1.0)),
    );

    let mut cam = Camera::new(16.0 / 9.0, 400);
    cam.look_from(Point3::new(-2.0, 2.0, 1.0));
    cam.look_at(Point3::new(0.0, 0.0, -1.0));
    cam.set_vfov(20.0);
    cam.set_defocus_angle(0.6);
    cam.set_focus_dist(3.4);

    (scene, cam)
}

/// A marble sphere next to a rough clay one, showing the noise
/// texture and the Oren-Nayar diffuse model.
pub fn marble_and_clay() -> (Scene, Camera) {
    let mut objects = HitList::default();

    let marble = NoiseTexture::new_seeded(4.0, NoiseStyle::Marble, 7);
    objects.add(Hittables::Sphere(Sphere::new(
        Point3::new(-1.1, 1.0, 0.0),
        1.0,
        Materials::Lambertian(Lambertian::new_from_texture(Arc::new(
            Textures::NoiseTexture(marble),
        ))),
        "marble",
    )));

    objects.add(Hittables::Sphere(Sphere::new(
        Point3::new(1.1, 1.0, 0.0),
        1.0,
        Materials::OrenNayar(OrenNayar::new_from_color(Color::new(0.7, 0.45, 0.3), 0.5)),
        "clay",
    )));

    let turb = NoiseTexture::new_seeded(1.0, NoiseStyle::Turbulence, 11);
    objects.add(Hittables::Sphere(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        Materials::Lambertian(Lambertian::new_from_texture(Arc::new(
            Textures::NoiseTexture(turb),
        ))),
        "ground",
    )));

    let lamp = QuadLight::new(
        Point3::new(-2.0, 5.0, -2.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        5.0,
        Color::white(),
        false,
        "overhead",
    );
    objects.add(Hittables::QuadLight(lamp.clone()));
    let mut emissive = HitList::default();
    emissive.add(Hittables::QuadLight(lamp));

    let scene = Scene::new(
        objects,
        emissive,
        Background::Solid(Color::new(0.7, 0.8, 1.0)),
    );

    let mut cam = Camera::new(16.0 / 9.0, 400);
    cam.look_from(Point3::new(0.0, 2.0, 9.0));
    cam.look_at(Point3::new(0.0, 1.0, 0.0));
    cam.set_vfov(30.0);

    (scene, cam)
}

/// One sphere sweeping from the origin toward +x over the shutter
/// window, for motion-blur runs.
pub fn motion_blur() -> (Scene, Camera) {
    let mut objects = HitList::default();

    objects.add(Hittables::Sphere(Sphere::new_moving(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        0.3,
        Materials::Lambertian(Lambertian::new_from_color(Color::new(0.8, 0.3, 0.3))),
        "mover",
    )));

    let lamp = QuadLight::new(
        Point3::new(-2.0, 3.0, -2.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        6.0,
        Color::white(),
        false,
        "overhead",
    );
    objects.add(Hittables::QuadLight(lamp.clone()));
    let mut emissive = HitList::default();
    emissive.add(Hittables::QuadLight(lamp));

    let scene = Scene::new(objects, emissive, Background::Solid(Color::black()));

    let mut cam = Camera::new(2.0, 200);
    cam.look_from(Point3::new(0.5, 0.0, 6.0));
    cam.look_at(Point3::new(0.5, 0.0, 0.0));
    cam.set_vfov(20.0);
    cam.set_shutter(0.0, 1.0);

    (scene, cam)
}
