use std::path::PathBuf;

use argh::FromArgs;
use bandblur::{
    image::Image,
    imgproc::filter::{BandedGaussianBlur, FilterError},
    io::functional as F,
};

mod instrument;
use instrument::TrackingAllocator;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator::new();

/// Blur a grayscale image with a gaussian filter computed in parallel bands
#[derive(Debug, FromArgs)]
struct Args {
    /// path to the input image
    #[argh(positional)]
    input: PathBuf,

    /// path to the output image, png, jpg or jpeg
    #[argh(positional)]
    output: PathBuf,

    /// side of the square gaussian kernel, must be odd
    #[argh(option, short = 'k', default = "61")]
    kernel_size: usize,

    /// standard deviation of the gaussian kernel
    #[argh(option, short = 's', default = "10.0")]
    sigma: f32,

    /// number of row bands processed in parallel
    #[argh(option, short = 'n', default = "16")]
    num_workers: usize,

    /// jpeg quality of the output, from 0 to 100
    #[argh(option, short = 'q', default = "95")]
    quality: u8,

    /// write a single channel image instead of an rgb one
    #[argh(switch)]
    mono: bool,
}

enum Blurred {
    Mono(Image<u8, 1>),
    Rgb(Image<u8, 3>),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    // the input is expected to be grayscale, only its first channel is used
    let src = F::read_image_any_rgb8(&args.input)?;
    log::info!("loaded {} {}", args.input.display(), src.size());

    // a band needs at least one row
    let num_workers = args.num_workers.clamp(1, src.rows().max(1));
    if num_workers != args.num_workers {
        log::warn!(
            "using {num_workers} workers instead of {} for an image of {} rows",
            args.num_workers,
            src.rows()
        );
    }

    let blur = BandedGaussianBlur::default()
        .with_kernel_size(args.kernel_size)
        .with_sigma(args.sigma)
        .with_num_workers(num_workers);

    let (blurred, stats) = instrument::measure(&GLOBAL, || -> Result<Blurred, FilterError> {
        if args.mono {
            let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;
            blur.apply(&src, &mut dst)?;
            Ok(Blurred::Mono(dst))
        } else {
            Ok(Blurred::Rgb(blur.run(&src)?))
        }
    });

    match blurred? {
        Blurred::Mono(dst) => F::write_image_mono8(&args.output, &dst, args.quality)?,
        Blurred::Rgb(dst) => F::write_image_rgb8(&args.output, &dst, args.quality)?,
    }

    log::info!(
        "gaussian blur {}x{} sigma {} applied in {} bands, saved to {}",
        blur.kernel_size,
        blur.kernel_size,
        blur.sigma,
        blur.num_workers,
        args.output.display()
    );
    log::info!("execution time: {} ms", stats.elapsed.as_millis());
    log::info!(
        "memory used: {} KiB (peak {} KiB)",
        stats.heap_delta / 1024,
        stats.heap_peak / 1024
    );

    Ok(())
}
