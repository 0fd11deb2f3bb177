use anyhow::Result;
use drape::geometry::{torso_quad, Homography};
use drape::pose::{PoseEstimator, StaticPose};
use drape::{ErrorKind, Joint, LandmarkSet, Point2D, Quadrilateral, TryOnConfig, TryOnEngine};
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

fn write_fixtures(dir: &Path) -> Result<()> {
    let base = RgbImage::from_fn(400, 600, |x, y| Rgb([(x / 2) as u8, (y / 3) as u8, 90]));
    base.save(dir.join("person.png"))?;

    let garment = RgbaImage::from_fn(200, 300, |x, y| {
        if x < 10 || y < 10 || x >= 190 || y >= 290 {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([30, 60, 200, 255])
        }
    });
    garment.save(dir.join("shirt.png"))?;
    Ok(())
}

fn torso() -> StaticPose {
    // (100,150) (300,150) (280,450) (120,450) on a 400x600 photo
    StaticPose::new([
        Point2D::new(0.25, 0.25),
        Point2D::new(0.75, 0.25),
        Point2D::new(0.7, 0.75),
        Point2D::new(0.3, 0.75),
    ])
}

#[test]
fn garment_is_drawn_between_shoulders_and_hips() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_fixtures(dir.path())?;
    let output = dir.path().join("result.png");

    let mut engine = TryOnEngine::new(torso(), TryOnConfig::default())?;
    engine.apply(
        dir.path().join("person.png"),
        dir.path().join("shirt.png"),
        &output,
    )?;
    engine.shutdown();

    let base = image::open(dir.path().join("person.png"))?.to_rgb8();
    let result = image::open(&output)?;
    assert_eq!(result.color(), image::ColorType::Rgb8);
    let result = result.to_rgb8();
    assert_eq!(result.dimensions(), (400, 600));

    let dst = Quadrilateral::new([
        Point2D::new(100.0, 150.0),
        Point2D::new(300.0, 150.0),
        Point2D::new(280.0, 450.0),
        Point2D::new(120.0, 450.0),
    ]);
    let h = Homography::estimate(&Quadrilateral::from_size(200, 300), &dst)?;

    // Garment interior around its centre is visible
    for (u, v) in [(100.0, 150.0), (50.0, 50.0), (150.0, 250.0)] {
        let p = h.apply(Point2D::new(u, v)).expect("finite");
        let (x, y) = (p.x.round() as u32, p.y.round() as u32);
        assert_eq!(*result.get_pixel(x, y), Rgb([30, 60, 200]), "at ({x}, {y})");
    }

    // Everything outside the torso is the original photo
    for (x, y, pixel) in result.enumerate_pixels() {
        if !dst.contains(&Point2D::new(x as f64, y as f64)) {
            assert_eq!(pixel, base.get_pixel(x, y), "pixel ({x}, {y})");
        }
    }
    Ok(())
}

#[test]
fn collapsed_torso_writes_nothing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_fixtures(dir.path())?;
    let output = dir.path().join("result.png");

    // Collapsed torso: every joint at the same spot
    let pose = StaticPose::new([Point2D::new(0.5, 0.5); 4]);
    let mut engine = TryOnEngine::new(pose, TryOnConfig::default())?;
    let err = engine
        .apply(
            dir.path().join("person.png"),
            dir.path().join("shirt.png"),
            &output,
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DegenerateGeometry);
    assert!(!output.exists());
    Ok(())
}

/// Reports shoulders and the left hip only
struct NoRightHip;

impl PoseEstimator for NoRightHip {
    fn estimate(&mut self, image: &RgbImage) -> Result<Option<LandmarkSet>> {
        let (width, height) = image.dimensions();
        Ok(Some(
            LandmarkSet::normalized(width, height)
                .with(Joint::LeftShoulder, 0.25, 0.25)
                .with(Joint::RightShoulder, 0.75, 0.25)
                .with(Joint::LeftHip, 0.3, 0.75),
        ))
    }
}

#[test]
fn missing_hip_writes_nothing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_fixtures(dir.path())?;
    let output = dir.path().join("result.png");

    let mut engine = TryOnEngine::new(NoRightHip, TryOnConfig::default())?;
    let err = engine
        .apply(
            dir.path().join("person.png"),
            dir.path().join("shirt.png"),
            &output,
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingLandmarks);
    assert!(err.to_string().contains("RightHip"));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn unreadable_garment() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_fixtures(dir.path())?;

    let mut engine = TryOnEngine::new(torso(), TryOnConfig::default())?;
    let err = engine
        .apply(
            dir.path().join("person.png"),
            dir.path().join("nope.png"),
            dir.path().join("result.png"),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ImageLoadFailed);
    Ok(())
}

#[test]
fn quad_from_landmarks_matches_estimator_torso() -> Result<()> {
    let mut pose = torso();
    let landmarks = pose.estimate(&RgbImage::new(400, 600))?.expect("pose");
    let quad = torso_quad(&landmarks)?;
    assert_eq!(quad.corners[0], Point2D::new(100.0, 150.0));
    assert_eq!(quad.corners[1], Point2D::new(300.0, 150.0));
    Ok(())
}
