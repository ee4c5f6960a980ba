use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating uploaded file names.
    /// Plain names with word characters, spaces, dots, hyphens; no path separators.
    /// - Valid: "episode-12.pdf", "voice over.mp3", "clips_final.zip"
    /// - Invalid: "../../etc/passwd", "a/b.mp4", "", ".hidden"
    pub static ref FILE_NAME_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9 ._()-]*$").unwrap();
}
