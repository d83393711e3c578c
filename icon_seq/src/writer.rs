use std::{
    fmt::Write as FmtWrite,
    fs::{self, File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    constants::{ICON_SEQUENCE_TYPEDEF, INCLUDE_LINE},
    error::IconSeqError,
    parser::declares_icon_sequence,
    IconSequence,
};

/// Accumulates header text in one buffer.
pub struct HeaderWriter {
    pub data: String,
}

impl Default for HeaderWriter {
    fn default() -> Self {
        Self::new()
    }
}

trait WriteToWriter {
    fn write_to_text(&self, writer: &mut HeaderWriter);
}

impl HeaderWriter {
    pub fn new() -> Self {
        Self {
            data: String::new(),
        }
    }

    pub fn append_str(&mut self, s: &str) {
        self.data.push_str(s);
    }

    pub fn append_line(&mut self, s: &str) {
        self.data.push_str(s);
        self.data.push('\n');
    }

    /// Include and the shared `IconSequence` typedef. Goes once at the top of an artifact.
    pub fn preamble(&mut self) -> &mut Self {
        self.append_line(INCLUDE_LINE);
        self.append_line(ICON_SEQUENCE_TYPEDEF);
        self
    }

    /// `static const uint16_t PROGMEM icon_<sym>_bitmaps[] = { 0x...., };`
    pub fn bitmaps(&mut self, seq: &IconSequence) -> &mut Self {
        let _ = write!(
            self.data,
            "static const uint16_t PROGMEM {}[] = {{ ",
            seq.bitmaps_identifier()
        );

        seq.pixels.write_to_text(self);

        self.append_str("};");
        self
    }

    /// `static const IconSequence PROGMEM icon_<sym> = { (uint16_t *) icon_<sym>_bitmaps, W, H, F };`
    pub fn sequence(&mut self, seq: &IconSequence) -> &mut Self {
        let _ = write!(
            self.data,
            "static const IconSequence PROGMEM {} = {{ (uint16_t *) {}, {}, {}, {} }};",
            seq.identifier(),
            seq.bitmaps_identifier(),
            seq.width,
            seq.height,
            seq.frame_count
        );
        self
    }

    /// Array plus descriptor, separated from whatever precedes it by a blank line.
    pub fn icon_block(&mut self, seq: &IconSequence) -> &mut Self {
        self.append_str("\n");
        self.bitmaps(seq);
        self.append_str("\n");
        self.sequence(seq);
        self.append_str("\n\n");
        self
    }
}

impl WriteToWriter for Vec<crate::Rgb565> {
    fn write_to_text(&self, writer: &mut HeaderWriter) {
        self.iter().for_each(|pixel| {
            let _ = write!(writer.data, "{}, ", pixel);
        });
    }
}

/// Formats only the array declaration of `seq`.
pub fn format_bitmaps(seq: &IconSequence) -> String {
    let mut writer = HeaderWriter::new();
    writer.bitmaps(seq);
    writer.data
}

/// The header file icons get written into.
///
/// Either start one from scratch with [`HeaderArtifact::create`] or keep adding to an existing one
/// with [`HeaderArtifact::append`]. The shared typedef is written exactly once either way.
pub struct HeaderArtifact {
    file: File,
    path: PathBuf,
}

impl HeaderArtifact {
    /// Truncates `path` and writes the preamble.
    pub fn create(path: impl AsRef<Path> + Into<PathBuf>) -> Result<Self, IconSeqError> {
        let path: PathBuf = path.into();

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|op| IconSeqError::IOError {
                source: op,
                path: path.clone(),
            })?;

        let mut artifact = Self { file, path };

        let mut writer = HeaderWriter::new();
        writer.preamble();
        artifact.write_text(&writer.data)?;

        Ok(artifact)
    }

    /// Opens `path` for appending.
    ///
    /// If the file is missing or does not declare `IconSequence` yet, the preamble is written first.
    pub fn append(path: impl AsRef<Path> + Into<PathBuf>) -> Result<Self, IconSeqError> {
        let path: PathBuf = path.into();

        let declares_type = if path.exists() {
            let text = fs::read_to_string(&path).map_err(|op| IconSeqError::IOError {
                source: op,
                path: path.clone(),
            })?;

            declares_icon_sequence(&text)
        } else {
            false
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|op| IconSeqError::IOError {
                source: op,
                path: path.clone(),
            })?;

        let mut artifact = Self { file, path };

        if !declares_type {
            log::debug!(
                "{} does not declare IconSequence yet, writing preamble",
                artifact.path.display()
            );

            let mut writer = HeaderWriter::new();
            writer.preamble();
            artifact.write_text(&writer.data)?;
        }

        Ok(artifact)
    }

    pub fn write_icon(&mut self, seq: &IconSequence) -> Result<(), IconSeqError> {
        let mut writer = HeaderWriter::new();
        writer.icon_block(seq);

        self.write_text(&writer.data)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_text(&mut self, text: &str) -> Result<(), IconSeqError> {
        self.file
            .write_all(text.as_bytes())
            .and_then(|_| self.file.flush())
            .map_err(|op| IconSeqError::IOError {
                source: op,
                path: self.path.clone(),
            })
    }
}
