use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};

use icon_seq::{format_bitmaps, sanitize_symbol, HeaderArtifact, IconSeqError, IconSequence, Rgb565};
use image::{
    codecs::{gif::GifDecoder, png::PngDecoder},
    AnimationDecoder, DynamicImage, Frames, ImageFormat, RgbaImage,
};
use serde::Deserialize;

use crate::utils::{
    constants::{DEFAULT_HEADER_NAME, DEFAULT_ICON_SIZE, TRANSPARENT_FILL_BLACK},
    img_stuffs::{average_color, resize_nearest, rgba8_to_rgb565},
};

#[derive(Debug, thiserror::Error)]
pub enum Gif2HeaderError {
    #[error("Icon file does not exist: {path}")]
    MissingFile { path: PathBuf },
    #[error("Frame count not defined for `{path}` ({format})")]
    UnsupportedFormat { path: PathBuf, format: String },
    #[error("Invalid target size {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },
    #[error("Too many frames for a descriptor: {count}")]
    TooManyFrames { count: usize },
    #[error("Symbol name is empty")]
    EmptySymbol,
    #[error("Cannot decode image: {source}")]
    Decode {
        #[from]
        source: image::ImageError,
    },
    #[error("Cannot write header: {source}")]
    Artifact {
        #[from]
        source: IconSeqError,
    },
    #[error("Cannot read file `{path}`: {source}")]
    IOError {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// How many frames of the source get converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameCap {
    #[default]
    All,
    Limit(usize),
}

impl FrameCap {
    pub fn limit(&self) -> usize {
        match self {
            FrameCap::All => usize::MAX,
            FrameCap::Limit(n) => *n,
        }
    }
}

impl From<Option<usize>> for FrameCap {
    fn from(value: Option<usize>) -> Self {
        value.map_or(FrameCap::All, FrameCap::Limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Truncates the header and declares `IconSequence` before the icon.
    #[default]
    Fresh,
    /// Adds the icon to the end of an existing header.
    Append,
}

/// What fully transparent pixels turn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransparentFill {
    #[default]
    Black,
    /// Alpha weighted average of the whole animation.
    AverageColor,
}

#[derive(Debug, Clone)]
pub struct Gif2HeaderOptions {
    pub source_path: PathBuf,
    pub target_width: u32,
    pub target_height: u32,
    pub max_frames: FrameCap,
    /// Goes into `icon_<symbol>`. Dots become underscores.
    pub symbol_name: String,
    pub write_mode: WriteMode,
    pub transparent_fill: TransparentFill,
    pub output_path: PathBuf,
}

impl Default for Gif2HeaderOptions {
    fn default() -> Self {
        Self {
            source_path: PathBuf::new(),
            target_width: DEFAULT_ICON_SIZE,
            target_height: DEFAULT_ICON_SIZE,
            max_frames: FrameCap::All,
            symbol_name: String::new(),
            write_mode: WriteMode::Fresh,
            transparent_fill: TransparentFill::Black,
            output_path: PathBuf::from(DEFAULT_HEADER_NAME),
        }
    }
}

/// Outcome of one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub symbol: String,
    /// Frames in the source file.
    pub reported_frames: usize,
    /// Frames written out, never more than the cap.
    pub emitted_frames: usize,
    pub expected_pixels: usize,
    pub actual_pixels: usize,
}

impl ConversionReport {
    pub fn is_consistent(&self) -> bool {
        self.expected_pixels == self.actual_pixels
    }
}

pub struct LoadedFrames {
    pub frames: Vec<RgbaImage>,
    /// Counts frames past the cap as well.
    pub reported: usize,
}

pub struct Gif2HeaderBuilder {
    pub options: Gif2HeaderOptions,
}

impl Gif2HeaderBuilder {
    /// Symbol defaults to the file stem of `source`.
    pub fn new(source: impl AsRef<Path> + Into<PathBuf>) -> Self {
        let symbol_name = source
            .as_ref()
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            options: Gif2HeaderOptions {
                source_path: source.into(),
                symbol_name,
                ..Default::default()
            },
        }
    }

    pub fn width(&mut self, a: u32) -> &mut Self {
        self.options.target_width = a;
        self
    }

    pub fn height(&mut self, a: u32) -> &mut Self {
        self.options.target_height = a;
        self
    }

    pub fn max_frames(&mut self, a: FrameCap) -> &mut Self {
        self.options.max_frames = a;
        self
    }

    pub fn symbol(&mut self, a: &str) -> &mut Self {
        a.clone_into(&mut self.options.symbol_name);
        self
    }

    pub fn write_mode(&mut self, a: WriteMode) -> &mut Self {
        self.options.write_mode = a;
        self
    }

    pub fn transparent_fill(&mut self, a: TransparentFill) -> &mut Self {
        self.options.transparent_fill = a;
        self
    }

    pub fn output(&mut self, a: impl AsRef<Path> + Into<PathBuf>) -> &mut Self {
        self.options.output_path = a.into();
        self
    }

    pub fn work(&self) -> Result<ConversionReport, Gif2HeaderError> {
        gif2header(&self.options)
    }
}

/// Converts one animated image into an array/descriptor pair in the header.
///
/// Nothing is written when the source cannot be read.
pub fn gif2header(options: &Gif2HeaderOptions) -> Result<ConversionReport, Gif2HeaderError> {
    let Gif2HeaderOptions {
        source_path,
        target_width,
        target_height,
        max_frames,
        symbol_name,
        write_mode,
        transparent_fill,
        output_path,
    } = options;

    let (width, height) = match (u16::try_from(*target_width), u16::try_from(*target_height)) {
        (Ok(width), Ok(height)) if width > 0 && height > 0 => (width, height),
        _ => {
            return Err(Gif2HeaderError::InvalidDimension {
                width: *target_width,
                height: *target_height,
            })
        }
    };

    let symbol = sanitize_symbol(symbol_name);
    if symbol.is_empty() {
        return Err(Gif2HeaderError::EmptySymbol);
    }

    let LoadedFrames { frames, reported } = load_frames(source_path, *max_frames)?;

    let frames = frames
        .into_iter()
        .map(|frame| resize_nearest(frame, *target_width, *target_height))
        .collect::<Vec<RgbaImage>>();

    let emitted = frames.len();
    let frame_count = u16::try_from(emitted)
        .map_err(|_| Gif2HeaderError::TooManyFrames { count: emitted })?;

    if emitted < reported {
        log::debug!(
            "Skipping {} frames of {} past the cap",
            reported - emitted,
            source_path.display()
        );
    }

    let pixels = pack_frames(&frames, *transparent_fill);
    let seq = IconSequence::new(&symbol, width, height, frame_count, pixels);

    log::info!("Generated icon '{}' with {} frames", symbol, emitted);

    let expected_pixels = *target_width as usize * *target_height as usize * emitted;
    let bitmaps = format_bitmaps(&seq);
    let actual_pixels = count_hex_words(&bitmaps);
    check_pixel_count(expected_pixels, &bitmaps);

    let mut artifact = match write_mode {
        WriteMode::Fresh => HeaderArtifact::create(output_path.clone())?,
        WriteMode::Append => HeaderArtifact::append(output_path.clone())?,
    };

    artifact.write_icon(&seq)?;

    log::info!(
        "Wrote {} to {}",
        seq.identifier(),
        artifact.path().display()
    );

    Ok(ConversionReport {
        symbol,
        reported_frames: reported,
        emitted_frames: emitted,
        expected_pixels,
        actual_pixels,
    })
}

/// Decodes up to `cap` frames as RGBA.
///
/// GIF and APNG give their animation frames, a still PNG counts as a single frame.
pub fn load_frames(path: &Path, cap: FrameCap) -> Result<LoadedFrames, Gif2HeaderError> {
    if !path.exists() {
        return Err(Gif2HeaderError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let bytes = fs::read(path).map_err(|op| Gif2HeaderError::IOError {
        source: op,
        path: path.to_path_buf(),
    })?;

    let unsupported = |format: String| Gif2HeaderError::UnsupportedFormat {
        path: path.to_path_buf(),
        format,
    };

    let format = image::guess_format(&bytes).map_err(|_| unsupported("unknown".to_string()))?;

    match format {
        ImageFormat::Gif => {
            let decoder = GifDecoder::new(Cursor::new(bytes))?;
            collect_frames(decoder.into_frames(), cap)
        }
        ImageFormat::Png => {
            let decoder = PngDecoder::new(Cursor::new(bytes))?;

            if decoder.is_apng()? {
                collect_frames(decoder.apng()?.into_frames(), cap)
            } else {
                let img = DynamicImage::from_decoder(decoder)?.into_rgba8();
                let frames = if cap.limit() > 0 { vec![img] } else { vec![] };

                Ok(LoadedFrames {
                    frames,
                    reported: 1,
                })
            }
        }
        rest => Err(unsupported(format!("{:?}", rest))),
    }
}

fn collect_frames(frames: Frames<'_>, cap: FrameCap) -> Result<LoadedFrames, Gif2HeaderError> {
    let limit = cap.limit();
    let mut res = LoadedFrames {
        frames: vec![],
        reported: 0,
    };

    for frame in frames {
        if res.frames.len() < limit {
            res.frames.push(frame?.into_buffer());
        }

        res.reported += 1;
    }

    Ok(res)
}

/// Packs every frame, in order, into one flat sequence.
pub fn pack_frames(frames: &[RgbaImage], fill: TransparentFill) -> Vec<Rgb565> {
    let fill = match fill {
        TransparentFill::Black => TRANSPARENT_FILL_BLACK,
        TransparentFill::AverageColor => average_color(frames),
    };

    frames
        .iter()
        .flat_map(|frame| rgba8_to_rgb565(frame, fill))
        .collect()
}

fn count_hex_words(bitmaps: &str) -> usize {
    bitmaps.matches(',').count()
}

/// Compares the expected pixel count with what ended up in the array text.
///
/// Only logs, a mismatch never stops the conversion.
pub fn check_pixel_count(expected: usize, bitmaps: &str) -> bool {
    let actual = count_hex_words(bitmaps);

    if expected == actual {
        log::info!("Expected total pixels: {expected}, actual total pixels: {actual}");
        true
    } else {
        log::warn!("Pixel count mismatch. Expected ({expected}). Have ({actual})");
        false
    }
}
