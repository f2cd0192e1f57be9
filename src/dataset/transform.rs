//! Image preprocessing pipeline.
//!
//! Each stage is a pure [`Transform`]; stages are chained with
//! [`Transform::then`], and the stage types only line up in the order
//! image → image → tensor → tensor, so a pipeline cannot normalize before it
//! has converted to a tensor.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

/// Edge length of the centre crop taken from every source image
pub const CROP_SIZE: u32 = 56;

/// Edge length of the image tensors handed to the model
pub const IMAGE_SIZE: u32 = 28;

/// Number of colour channels in an [`ImageTensor`]
pub const CHANNELS: usize = 3;

/// Per-channel normalization mean
pub const NORMALIZE_MEAN: [f32; CHANNELS] = [0.485, 0.45, 0.421];

/// Per-channel normalization standard deviation
pub const NORMALIZE_STD: [f32; CHANNELS] = [0.5, 0.5, 0.5];

/// A pure preprocessing step
pub trait Transform<In> {
    type Output;

    fn apply(&self, input: In) -> Self::Output;

    /// Run `next` on the output of this transform
    fn then<T>(self, next: T) -> Chain<Self, T>
    where
        Self: Sized,
        T: Transform<Self::Output>,
    {
        Chain { first: self, second: next }
    }
}

/// Two transforms applied in sequence
#[derive(Debug, Clone)]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<In, A, B> Transform<In> for Chain<A, B>
where
    A: Transform<In>,
    B: Transform<A::Output>,
{
    type Output = B::Output;

    fn apply(&self, input: In) -> Self::Output {
        self.second.apply(self.first.apply(input))
    }
}

/// The fixed fashionNet preprocessing pipeline type
pub type Pipeline = Chain<Chain<Chain<CenterCrop, Resize>, ToTensor>, Normalize>;

/// Centre crop to 56×56, resize to 28×28, scale to `[0, 1]`, normalize
pub fn default_pipeline() -> Pipeline {
    CenterCrop::new(CROP_SIZE)
        .then(Resize::shorter_side(IMAGE_SIZE))
        .then(ToTensor)
        .then(Normalize::new(NORMALIZE_MEAN, NORMALIZE_STD))
}

/// CHW float image with three channels
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    data: Vec<f32>,
    height: usize,
    width: usize,
}

impl ImageTensor {
    /// Wrap a CHW buffer; `None` if its length does not match the shape
    pub fn from_chw(data: Vec<f32>, height: usize, width: usize) -> Option<Self> {
        if data.len() != CHANNELS * height * width {
            return None;
        }
        Some(Self { data, height, width })
    }

    /// `[channels, height, width]`
    pub fn shape(&self) -> [usize; 3] {
        [CHANNELS, self.height, self.width]
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn get(&self, channel: usize, y: usize, x: usize) -> Option<f32> {
        if channel >= CHANNELS || y >= self.height || x >= self.width {
            return None;
        }
        Some(self.data[(channel * self.height + y) * self.width + x])
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Smallest and largest element, `None` for an empty tensor
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.data.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Crop a fixed-size window about the image centre.
///
/// The window offset is `(source - target) / 2` rounded half to even, and any
/// part of the window outside the source is filled with black, so the output
/// always has the requested size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CenterCrop {
    pub width: u32,
    pub height: u32,
}

impl CenterCrop {
    pub fn new(size: u32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }
}

fn centered_offset(source: u32, target: u32) -> i64 {
    ((source as f64 - target as f64) / 2.0).round_ties_even() as i64
}

impl Transform<RgbImage> for CenterCrop {
    type Output = RgbImage;

    fn apply(&self, image: RgbImage) -> RgbImage {
        let (src_w, src_h) = image.dimensions();
        let left = centered_offset(src_w, self.width);
        let top = centered_offset(src_h, self.height);

        RgbImage::from_fn(self.width, self.height, |x, y| {
            let sx = left + x as i64;
            let sy = top + y as i64;
            if (0..src_w as i64).contains(&sx) && (0..src_h as i64).contains(&sy) {
                *image.get_pixel(sx as u32, sy as u32)
            } else {
                Rgb([0, 0, 0])
            }
        })
    }
}

/// Target size of a [`Resize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeTarget {
    /// Scale so the shorter edge has this length, keeping the aspect ratio
    ShorterSide(u32),
    /// Scale to exactly `(width, height)`
    Exact(u32, u32),
}

/// Bilinear resize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resize {
    pub target: ResizeTarget,
}

impl Resize {
    pub fn shorter_side(size: u32) -> Self {
        Self {
            target: ResizeTarget::ShorterSide(size),
        }
    }

    pub fn exact(width: u32, height: u32) -> Self {
        Self {
            target: ResizeTarget::Exact(width, height),
        }
    }

    /// Output dimensions for an input of `width`×`height`
    pub fn output_size(&self, width: u32, height: u32) -> (u32, u32) {
        match self.target {
            ResizeTarget::Exact(w, h) => (w, h),
            ResizeTarget::ShorterSide(size) => {
                if width == 0 || height == 0 {
                    (width, height)
                } else if width < height {
                    let long = (size as u64 * height as u64 / width as u64) as u32;
                    (size, long)
                } else {
                    let long = (size as u64 * width as u64 / height as u64) as u32;
                    (long, size)
                }
            }
        }
    }
}

impl Transform<RgbImage> for Resize {
    type Output = RgbImage;

    fn apply(&self, image: RgbImage) -> RgbImage {
        let (width, height) = image.dimensions();
        let (new_w, new_h) = self.output_size(width, height);

        if (new_w, new_h) == (width, height) || width == 0 || height == 0 {
            return image;
        }

        imageops::resize(&image, new_w, new_h, FilterType::Triangle)
    }
}

/// HWC `u8` image → CHW `f32` tensor in `[0, 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToTensor;

impl Transform<RgbImage> for ToTensor {
    type Output = ImageTensor;

    fn apply(&self, image: RgbImage) -> ImageTensor {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let plane = height * width;
        let mut data = vec![0.0f32; CHANNELS * plane];

        for (x, y, pixel) in image.enumerate_pixels() {
            let offset = y as usize * width + x as usize;
            for c in 0..CHANNELS {
                data[c * plane + offset] = pixel[c] as f32 / 255.0;
            }
        }

        ImageTensor { data, height, width }
    }
}

/// `(x - mean[c]) / std[c]` for each channel `c`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub mean: [f32; CHANNELS],
    pub std: [f32; CHANNELS],
}

impl Normalize {
    pub fn new(mean: [f32; CHANNELS], std: [f32; CHANNELS]) -> Self {
        Self { mean, std }
    }
}

impl Transform<ImageTensor> for Normalize {
    type Output = ImageTensor;

    fn apply(&self, mut tensor: ImageTensor) -> ImageTensor {
        let plane = tensor.height * tensor.width;
        for (c, channel) in tensor.data.chunks_mut(plane.max(1)).enumerate() {
            for v in channel {
                *v = (*v - self.mean[c]) / self.std[c];
            }
        }
        tensor
    }
}
