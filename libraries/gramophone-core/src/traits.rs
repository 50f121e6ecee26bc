/// Core traits for gramophone
use std::path::Path;

/// Any playable audio item, regardless of where it came from
///
/// Implemented by library tracks and downloaded podcast episodes so that
/// streaming code can serve either without knowing the concrete type.
pub trait AudioFile {
    /// File name including extension
    fn audio_filename(&self) -> &str;

    /// Bitrate in kbps
    fn audio_bitrate(&self) -> i64;

    /// Length in seconds
    fn audio_length(&self) -> i64;

    /// Extension including the leading dot, or an empty string
    fn ext(&self) -> String {
        Path::new(self.audio_filename())
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
    }

    /// MIME type guessed from the extension, or an empty string
    fn mime(&self) -> String {
        mime_guess::from_path(self.audio_filename())
            .first()
            .map(|mime| mime.essence_str().to_owned())
            .unwrap_or_default()
    }
}
