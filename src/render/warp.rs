use crate::config::Interpolation;
use crate::error::TryOnError;
use crate::geometry::{Homography, Point2D};
use image::{Rgba, RgbaImage};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

fn nearest(src: &RgbaImage, u: f64, v: f64) -> Rgba<u8> {
    let (width, height) = src.dimensions();
    let (iu, iv) = (u.round(), v.round());
    if iu < 0.0 || iv < 0.0 || iu >= width as f64 || iv >= height as f64 {
        return TRANSPARENT;
    }
    *src.get_pixel(iu as u32, iv as u32)
}

/// Bilinear sample with a transparent constant border
fn bilinear(src: &RgbaImage, u: f64, v: f64) -> Rgba<u8> {
    let (width, height) = src.dimensions();
    if u <= -1.0 || v <= -1.0 || u >= width as f64 || v >= height as f64 {
        return TRANSPARENT;
    }

    let (u0, v0) = (u.floor(), v.floor());
    let (fu, fv) = (u - u0, v - v0);
    let texel = |x: f64, y: f64| -> [f64; 4] {
        if x < 0.0 || y < 0.0 || x >= width as f64 || y >= height as f64 {
            return [0.0; 4];
        }
        let p = src.get_pixel(x as u32, y as u32);
        [p[0] as f64, p[1] as f64, p[2] as f64, p[3] as f64]
    };

    let p00 = texel(u0, v0);
    let p01 = texel(u0 + 1.0, v0);
    let p10 = texel(u0, v0 + 1.0);
    let p11 = texel(u0 + 1.0, v0 + 1.0);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let value = p00[c] * (1.0 - fu) * (1.0 - fv)
            + p01[c] * fu * (1.0 - fv)
            + p10[c] * (1.0 - fu) * fv
            + p11[c] * fu * fv;
        out[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}

/// Resample the garment into a `width` x `height` frame through `h`.
///
/// Each output pixel pulls from the garment at `h⁻¹ · (x, y)`, so the result
/// has no holes. Samples that fall outside the garment are fully transparent
/// black.
///
/// Bilinear sampling treats the area around the garment as a transparent
/// constant border. A sample up to one pixel outside the garment still mixes
/// in its edge texels, so an opaque garment edge gains a one pixel fringe of
/// partial alpha just outside the quad. Under hard cutout that fringe is
/// drawn in the darkened edge colour; a transparent margin on the garment
/// avoids it.
pub fn warp_garment(
    garment: &RgbaImage,
    h: &Homography,
    (width, height): (u32, u32),
    interpolation: Interpolation,
) -> Result<RgbaImage, TryOnError> {
    let _span = tracing::debug_span!("warp").entered();

    let inv = h.inverse()?;
    let sample = match interpolation {
        Interpolation::Nearest => nearest,
        Interpolation::Bilinear => bilinear,
    };

    let warped = RgbaImage::from_fn(width, height, |x, y| {
        match inv.apply(Point2D::new(x as f64, y as f64)) {
            Some(p) => sample(garment, p.x, p.y),
            None => TRANSPARENT,
        }
    });

    tracing::debug!(
        "Warped {}x{} garment into {}x{} frame",
        garment.width(),
        garment.height(),
        width,
        height
    );
    Ok(warped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Quadrilateral;
    use anyhow::Result;

    fn checker(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 10) as u8, (y * 10) as u8, ((x + y) % 2 * 255) as u8, 255])
        })
    }

    #[test]
    fn identity_reproduces_garment() -> Result<()> {
        let garment = checker(8, 6);
        for mode in [Interpolation::Nearest, Interpolation::Bilinear] {
            let warped = warp_garment(&garment, &Homography::IDENTITY, (8, 6), mode)?;
            assert_eq!(warped, garment);
        }
        Ok(())
    }

    #[test]
    fn translation_leaves_transparent_margin() -> Result<()> {
        let garment = checker(4, 4);
        let shift = Homography {
            m: [[1.0, 0.0, 3.0], [0.0, 1.0, 2.0], [0.0, 0.0, 1.0]],
        };
        let warped = warp_garment(&garment, &shift, (10, 10), Interpolation::Nearest)?;

        assert_eq!(*warped.get_pixel(3, 2), *garment.get_pixel(0, 0));
        assert_eq!(*warped.get_pixel(6, 5), *garment.get_pixel(3, 3));
        assert_eq!(warped.get_pixel(0, 0)[3], 0);
        assert_eq!(warped.get_pixel(9, 9)[3], 0);
        assert_eq!(*warped.get_pixel(8, 8), TRANSPARENT);
        Ok(())
    }

    #[test]
    fn opaque_garment_interior_matches_nearest_sample() -> Result<()> {
        let garment = checker(20, 30);
        let dst = Quadrilateral::new([
            Point2D::new(10.0, 15.0),
            Point2D::new(50.0, 12.0),
            Point2D::new(45.0, 60.0),
            Point2D::new(14.0, 58.0),
        ]);
        let h = Homography::estimate(&Quadrilateral::from_size(20, 30), &dst)?;
        let inv = h.inverse()?;
        let warped = warp_garment(&garment, &h, (64, 64), Interpolation::Nearest)?;

        let mut inside = 0;
        for (x, y, pixel) in warped.enumerate_pixels() {
            let p = Point2D::new(x as f64, y as f64);
            let src = inv.apply(p).expect("finite");
            let (iu, iv) = (src.x.round(), src.y.round());
            let in_garment = iu >= 0.0 && iv >= 0.0 && iu < 20.0 && iv < 30.0;
            if in_garment {
                inside += 1;
                assert_eq!(*pixel, *garment.get_pixel(iu as u32, iv as u32));
            } else {
                assert_eq!(pixel[3], 0);
            }
        }
        assert!(inside > 0);
        Ok(())
    }

    #[test]
    fn bilinear_fades_at_border() -> Result<()> {
        let garment = RgbaImage::from_pixel(4, 4, Rgba([200, 100, 50, 255]));
        let shift = Homography {
            m: [[1.0, 0.0, 0.5], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        };
        let warped = warp_garment(&garment, &shift, (6, 4), Interpolation::Bilinear)?;
        // x = 0 samples u = -0.5: half the footprint is off the garment
        assert_eq!(warped.get_pixel(0, 1)[3], 128);
        assert_eq!(warped.get_pixel(2, 1)[3], 255);
        assert_eq!(warped.get_pixel(5, 1)[3], 0);
        Ok(())
    }
}
