#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use bandblur_image as image;

#[doc(inline)]
pub use bandblur_imgproc as imgproc;

#[doc(inline)]
pub use bandblur_io as io;
