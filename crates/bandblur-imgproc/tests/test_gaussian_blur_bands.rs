use bandblur_image::{Image, ImageSize};
use bandblur_imgproc::filter::{gaussian_blur_bands, kernels, BandedGaussianBlur, FilterError};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_image(size: ImageSize, seed: u64) -> Result<Image<u8, 1>, FilterError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..size.num_pixels())
        .map(|_| rng.random::<u8>())
        .collect::<Vec<_>>();
    Ok(Image::new(size, data)?)
}

// straightforward per pixel blur used as a reference
fn blur_reference(src: &Image<u8, 1>, kernel_size: usize, sigma: f32) -> Vec<u8> {
    let kernel = kernels::gaussian_kernel_2d(kernel_size, sigma).unwrap();
    let r = kernel.radius() as isize;
    let (w, h) = (src.width() as isize, src.height() as isize);

    let mut out = Vec::with_capacity(src.as_slice().len());
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0f32;
            for ky in -r..=r {
                for kx in -r..=r {
                    let sx = (x + kx).clamp(0, w - 1) as usize;
                    let sy = (y + ky).clamp(0, h - 1) as usize;
                    let v = *src.get_pixel(sx, sy, 0).unwrap() as f32;
                    sum += v * kernel.get((ky + r) as usize, (kx + r) as usize);
                }
            }
            out.push(sum.round().clamp(0.0, 255.0) as u8);
        }
    }
    out
}

#[test]
fn matches_reference() -> Result<(), FilterError> {
    let _ = env_logger::builder().is_test(true).try_init();

    let src = random_image([41, 23].into(), 7)?;
    let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;

    gaussian_blur_bands(&src, &mut dst, 7, 2.0, 4)?;

    assert_eq!(dst.as_slice(), blur_reference(&src, 7, 2.0).as_slice());

    Ok(())
}

#[test]
fn worker_count_does_not_change_output() -> Result<(), FilterError> {
    let src = random_image([64, 53].into(), 42)?;
    let blur = BandedGaussianBlur::default()
        .with_kernel_size(9)
        .with_sigma(3.0);

    let expected = blur.with_num_workers(1).run(&src)?;

    for num_workers in [2, 3, 7, 16, 52, 53] {
        let dst = blur.with_num_workers(num_workers).run(&src)?;
        assert_eq!(dst.size(), src.size());
        assert_eq!(
            dst.as_slice(),
            expected.as_slice(),
            "num_workers = {num_workers}"
        );
    }

    Ok(())
}

#[test]
fn repeated_runs_are_identical() -> Result<(), FilterError> {
    let src = random_image([97, 61].into(), 1234)?;
    let blur = BandedGaussianBlur::default()
        .with_kernel_size(11)
        .with_sigma(2.5)
        .with_num_workers(16);

    let first = blur.run(&src)?;
    for _ in 0..5 {
        assert_eq!(blur.run(&src)?, first);
    }

    Ok(())
}

#[test]
fn single_row_image() -> Result<(), FilterError> {
    let src = random_image([50, 1].into(), 3)?;
    let kernel_1d = kernels::gaussian_kernel_1d(21, 4.0)?;

    let dst = BandedGaussianBlur::default()
        .with_kernel_size(21)
        .with_sigma(4.0)
        .with_num_workers(1)
        .run(&src)?;

    // with a single row the 2D kernel collapses to its horizontal marginal
    let row = src.as_slice();
    let r = 10isize;
    for (x, &v) in dst.as_slice().iter().enumerate() {
        let expected = (-r..=r)
            .map(|kx| {
                let sx = (x as isize + kx).clamp(0, row.len() as isize - 1) as usize;
                row[sx] as f32 * kernel_1d[(kx + r) as usize]
            })
            .sum::<f32>()
            .round();
        assert!((v as f32 - expected).abs() <= 1.0, "x = {x}");
    }

    Ok(())
}

#[test]
fn rgb_source_reads_first_channel() -> Result<(), FilterError> {
    let gray = random_image([16, 12].into(), 99)?;
    let rgb_data = gray
        .as_slice()
        .iter()
        .flat_map(|&v| [v, v, v])
        .collect::<Vec<_>>();
    let rgb = Image::<u8, 3>::new(gray.size(), rgb_data)?;

    let blur = BandedGaussianBlur::default()
        .with_kernel_size(5)
        .with_sigma(1.2)
        .with_num_workers(3);

    let gray_out = blur.run(&gray)?;
    let rgb_out = blur.run(&rgb)?;

    assert_eq!(rgb_out.channel(0)?, gray_out);
    assert_eq!(rgb_out.channel(1)?, gray_out);
    assert_eq!(rgb_out.channel(2)?, gray_out);

    Ok(())
}
