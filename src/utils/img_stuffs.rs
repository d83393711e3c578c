use icon_seq::Rgb565;
use image::{imageops, RgbaImage};

/// Nearest neighbour keeps hard pixel edges, anything smoother smears pixel art.
///
/// Frames that already have the target size are returned as is.
pub fn resize_nearest(img: RgbaImage, width: u32, height: u32) -> RgbaImage {
    if img.dimensions() == (width, height) {
        return img;
    }

    imageops::resize(&img, width, height, imageops::FilterType::Nearest)
}

/// Alpha weighted mean colour over every pixel of every frame.
///
/// Fully transparent input gives black.
pub fn average_color(frames: &[RgbaImage]) -> [u8; 3] {
    let (sum, weight) = frames.iter().flat_map(|frame| frame.pixels()).fold(
        ([0u64; 3], 0u64),
        |(mut sum, weight), pixel| {
            let alpha = pixel[3] as u64;

            sum[0] += pixel[0] as u64 * alpha;
            sum[1] += pixel[1] as u64 * alpha;
            sum[2] += pixel[2] as u64 * alpha;

            (sum, weight + alpha)
        },
    );

    if weight == 0 {
        return [0, 0, 0];
    }

    sum.map(|channel| ((channel + weight / 2) / weight) as u8)
}

/// Row-major, top to bottom and left to right.
pub fn rgba8_to_rgb565(img: &RgbaImage, fill: [u8; 3]) -> Vec<Rgb565> {
    img.pixels()
        .map(|pixel| Rgb565::from_rgba(pixel.0, fill))
        .collect()
}

#[cfg(test)]
mod test {
    use image::Rgba;

    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn quadrants(side: u32) -> RgbaImage {
        let half = side / 2;

        RgbaImage::from_fn(side, side, |x, y| match (x < half, y < half) {
            (true, true) => RED,
            (false, true) => GREEN,
            (true, false) => BLUE,
            (false, false) => WHITE,
        })
    }

    #[test]
    fn same_size_is_untouched() {
        let img = RgbaImage::from_fn(5, 3, |x, y| Rgba([x as u8 * 40, y as u8 * 80, 7, 255]));
        let resized = resize_nearest(img.clone(), 5, 3);

        assert_eq!(resized, img);
    }

    #[test]
    fn downscale_keeps_hard_edges() {
        let resized = resize_nearest(quadrants(16), 2, 2);

        assert_eq!(resized.dimensions(), (2, 2));
        assert_eq!(*resized.get_pixel(0, 0), RED);
        assert_eq!(*resized.get_pixel(1, 0), GREEN);
        assert_eq!(*resized.get_pixel(0, 1), BLUE);
        assert_eq!(*resized.get_pixel(1, 1), WHITE);
    }

    #[test]
    fn upscale_repeats_pixels() {
        let resized = resize_nearest(quadrants(2), 8, 8);

        assert_eq!(resized.dimensions(), (8, 8));
        assert_eq!(*resized.get_pixel(0, 0), RED);
        assert_eq!(*resized.get_pixel(7, 0), GREEN);
        assert_eq!(*resized.get_pixel(0, 7), BLUE);
        assert_eq!(*resized.get_pixel(7, 7), WHITE);
    }

    #[test]
    fn non_square_target() {
        let resized = resize_nearest(quadrants(10), 3, 7);
        assert_eq!(resized.pixels().count(), 21);
    }

    #[test]
    fn average_ignores_transparent() {
        let mut img = RgbaImage::from_pixel(2, 1, RED);
        img.put_pixel(1, 0, Rgba([0, 0, 255, 0]));

        assert_eq!(average_color(&[img]), [255, 0, 0]);
    }

    #[test]
    fn average_over_frames() {
        let red = RgbaImage::from_pixel(1, 1, RED);
        let blue = RgbaImage::from_pixel(1, 1, BLUE);

        assert_eq!(average_color(&[red, blue]), [128, 0, 128]);
    }

    #[test]
    fn average_of_nothing_is_black() {
        let clear = RgbaImage::from_pixel(3, 3, Rgba([90, 90, 90, 0]));

        assert_eq!(average_color(&[clear]), [0, 0, 0]);
        assert_eq!(average_color(&[]), [0, 0, 0]);
    }

    #[test]
    fn pixel_order() {
        let img = RgbaImage::from_fn(2, 2, |x, y| if (x, y) == (1, 0) { BLUE } else { RED });
        let packed: Vec<u16> = rgba8_to_rgb565(&img, [0, 0, 0])
            .iter()
            .map(|pixel| pixel.swapped())
            .collect();

        assert_eq!(packed, vec![0x00F8, 0x1F00, 0x00F8, 0x00F8]);
    }

    #[test]
    fn transparent_is_black() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([13, 200, 77, 0]));

        assert!(rgba8_to_rgb565(&img, [0, 0, 0])
            .iter()
            .all(|pixel| pixel.to_string() == "0x0000"));
    }
}
