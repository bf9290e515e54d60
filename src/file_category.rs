/// Extension-based file categorization.
///
/// Maps file extensions to broad categories (bitmap images, audio, ebooks, …)
/// used to pick a destination folder under the sorted root.
///
/// # Examples
///
/// ```
/// use dropsort::file_category::{Category, CategoryMap};
///
/// let map = CategoryMap::new();
/// assert_eq!(map.classify("photo.jpg"), Category::ImageBitmap);
/// assert_eq!(map.classify(".flac"), Category::Audio);
/// assert_eq!(map.classify("README"), Category::Unknown);
/// ```
use std::collections::HashMap;
use std::path::Path;

/// Classification bucket for a file, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Bitmap images (JPG, PNG, GIF, …).
    ImageBitmap,
    /// Camera raw images (CR2, NEF, DNG, …).
    ImageRaw,
    /// Vector graphics (SVG, AI, EPS, …).
    ImageVector,
    /// Audio files (MP3, FLAC, OGG, …).
    Audio,
    /// Video files (MP4, MKV, MOV, …).
    Video,
    /// Subtitle files (SRT, ASS, VTT, …).
    Subtitle,
    /// Text documents (TXT, DOCX, MD, …).
    TextDocument,
    /// Spreadsheets (XLSX, CSV, ODS, …).
    Spreadsheet,
    /// Presentations (PPTX, ODP, KEY, …).
    Presentation,
    /// PDFs and ebooks (PDF, EPUB, MOBI, …).
    PdfOrEbook,
    /// Windows executables and installers (EXE, MSI, PS1, …).
    WindowsExecutable,
    /// Unix shell scripts and binaries (SH, ZSH, RUN, …).
    UnixScript,
    /// No extension, or an extension nothing else claimed.
    Unknown,
}

impl Category {
    /// Relative folder under the sorted root for this category.
    ///
    /// `Unknown` has no fixed folder; the destination tree groups its files
    /// by their literal extension under `Unknown/`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use dropsort::file_category::Category;
    ///
    /// assert_eq!(Category::ImageBitmap.folder(), Some(Path::new("Images/Bitmap")));
    /// assert_eq!(Category::Audio.folder(), Some(Path::new("Audio")));
    /// assert_eq!(Category::Unknown.folder(), None);
    /// ```
    pub fn folder(&self) -> Option<&'static Path> {
        let rel = match self {
            Category::ImageBitmap => "Images/Bitmap",
            Category::ImageRaw => "Images/RawImages",
            Category::ImageVector => "Images/Vector",
            Category::Audio => "Audio",
            Category::Video => "Videos",
            Category::Subtitle => "Subtitles",
            Category::TextDocument => "TextDocuments",
            Category::Spreadsheet => "Spreadsheets",
            Category::Presentation => "Presentations",
            Category::PdfOrEbook => "PdfAndEbooks",
            Category::WindowsExecutable => "WindowsExecutables",
            Category::UnixScript => "UnixScripts",
            Category::Unknown => return None,
        };
        Some(Path::new(rel))
    }
}

const BITMAP_IMAGE_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".tiff", ".bmp", ".heic", ".svg",
];
const RAW_IMAGE_EXTENSIONS: &[&str] = &[".cr2", ".nef", ".arw", ".rw2", ".orf", ".dng"];
const VECTOR_IMAGE_EXTENSIONS: &[&str] = &[".svg", ".ai", ".eps", ".pdf"];

const AUDIO_EXTENSIONS: &[&str] = &[
    ".mp3", ".wav", ".flac", ".m4a", ".aac", ".ogg", ".wma", ".opus",
];
const VIDEO_EXTENSIONS: &[&str] = &[
    ".mp4", ".mkv", ".mov", ".avi", ".wmv", ".webm", ".flv", ".m4v",
];
const SUBTITLE_EXTENSIONS: &[&str] = &[".srt", ".sub", ".ass", ".vtt"];

const TEXT_DOCUMENT_EXTENSIONS: &[&str] = &[
    ".txt", ".rtf", ".doc", ".docx", ".odt", ".md", ".csv", ".tex",
];
const SPREADSHEET_EXTENSIONS: &[&str] = &[".xlsx", ".xls", ".ods", ".csv", ".tsv", ".xlsm"];
const PRESENTATION_EXTENSIONS: &[&str] = &[".pptx", ".ppt", ".odp", ".key"];
const PDF_EBOOK_EXTENSIONS: &[&str] = &[".pdf", ".epub", ".mobi", ".azw3"];

const WINDOWS_EXECUTABLE_EXTENSIONS: &[&str] = &[".exe", ".msi", ".bat", ".cmd", ".com", ".ps1"];
const UNIX_SCRIPT_EXTENSIONS: &[&str] = &[".sh", ".bash", ".zsh", ".fish", ".run", ".bin"];

/// Maps file extensions to categories.
///
/// Built once at startup and immutable afterwards; lookups are
/// case-insensitive on lowercased dotted keys (".jpg").
#[derive(Debug, Clone)]
pub struct CategoryMap {
    extensions: HashMap<String, Category>,
}

impl CategoryMap {
    /// Creates a map with the standard extension groups.
    ///
    /// Registration order is the precedence rule: an extension listed in more
    /// than one group belongs to the group registered last. That makes
    /// `.svg` vector graphics, `.csv` a spreadsheet and `.pdf` an ebook.
    pub fn new() -> Self {
        let mut map = Self {
            extensions: HashMap::new(),
        };
        map.register(BITMAP_IMAGE_EXTENSIONS, Category::ImageBitmap);
        map.register(RAW_IMAGE_EXTENSIONS, Category::ImageRaw);
        map.register(VECTOR_IMAGE_EXTENSIONS, Category::ImageVector);
        map.register(AUDIO_EXTENSIONS, Category::Audio);
        map.register(VIDEO_EXTENSIONS, Category::Video);
        map.register(SUBTITLE_EXTENSIONS, Category::Subtitle);
        map.register(TEXT_DOCUMENT_EXTENSIONS, Category::TextDocument);
        map.register(SPREADSHEET_EXTENSIONS, Category::Spreadsheet);
        map.register(PRESENTATION_EXTENSIONS, Category::Presentation);
        map.register(PDF_EBOOK_EXTENSIONS, Category::PdfOrEbook);
        map.register(WINDOWS_EXECUTABLE_EXTENSIONS, Category::WindowsExecutable);
        map.register(UNIX_SCRIPT_EXTENSIONS, Category::UnixScript);
        map
    }

    fn register(&mut self, extensions: &[&str], category: Category) {
        for ext in extensions {
            self.extensions.insert(ext.to_lowercase(), category);
        }
    }

    /// Classifies a bare dotted extension (".jpg") or a full filename.
    ///
    /// Empty input, a missing extension or an unlisted extension all map to
    /// `Category::Unknown`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dropsort::file_category::{Category, CategoryMap};
    ///
    /// let map = CategoryMap::new();
    /// assert_eq!(map.classify(".JPG"), Category::ImageBitmap);
    /// assert_eq!(map.classify("report.pdf"), Category::PdfOrEbook);
    /// assert_eq!(map.classify("data.xyz"), Category::Unknown);
    /// ```
    pub fn classify(&self, name_or_extension: &str) -> Category {
        let extension = if name_or_extension.starts_with('.') {
            Some(name_or_extension.to_string())
        } else {
            Path::new(name_or_extension)
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
        };

        match extension {
            Some(ext) => self
                .extensions
                .get(&ext.to_lowercase())
                .copied()
                .unwrap_or(Category::Unknown),
            None => Category::Unknown,
        }
    }
}

impl Default for CategoryMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_folders() {
        assert_eq!(
            Category::ImageBitmap.folder(),
            Some(Path::new("Images/Bitmap"))
        );
        assert_eq!(
            Category::ImageRaw.folder(),
            Some(Path::new("Images/RawImages"))
        );
        assert_eq!(Category::Video.folder(), Some(Path::new("Videos")));
        assert_eq!(
            Category::PdfOrEbook.folder(),
            Some(Path::new("PdfAndEbooks"))
        );
        assert_eq!(Category::Unknown.folder(), None);
    }

    #[test]
    fn test_classify_bare_extension() {
        let map = CategoryMap::new();
        assert_eq!(map.classify(".jpg"), Category::ImageBitmap);
        assert_eq!(map.classify(".flac"), Category::Audio);
        assert_eq!(map.classify(".srt"), Category::Subtitle);
        assert_eq!(map.classify(".sh"), Category::UnixScript);
    }

    #[test]
    fn test_classify_full_filename() {
        let map = CategoryMap::new();
        assert_eq!(map.classify("holiday.mp4"), Category::Video);
        assert_eq!(map.classify("notes.md"), Category::TextDocument);
        assert_eq!(map.classify("setup.exe"), Category::WindowsExecutable);
    }

    #[test]
    fn test_classify_case_insensitive() {
        let map = CategoryMap::new();
        assert_eq!(map.classify(".JPG"), Category::ImageBitmap);
        assert_eq!(map.classify("photo.JPG"), Category::ImageBitmap);
        assert_eq!(map.classify("SONG.Mp3"), Category::Audio);
    }

    #[test]
    fn test_classify_no_extension_is_unknown() {
        let map = CategoryMap::new();
        assert_eq!(map.classify("README"), Category::Unknown);
        assert_eq!(map.classify(""), Category::Unknown);
    }

    #[test]
    fn test_classify_unlisted_extension_is_unknown() {
        let map = CategoryMap::new();
        assert_eq!(map.classify(".xyz"), Category::Unknown);
        assert_eq!(map.classify("data.xyz"), Category::Unknown);
    }

    #[test]
    fn test_duplicate_extensions_last_registration_wins() {
        let map = CategoryMap::new();
        // .svg is both a bitmap-group and a vector-group extension
        assert_eq!(map.classify(".svg"), Category::ImageVector);
        // .csv is both a text document and a spreadsheet
        assert_eq!(map.classify(".csv"), Category::Spreadsheet);
        // .pdf is both vector graphics and an ebook
        assert_eq!(map.classify(".pdf"), Category::PdfOrEbook);
    }

    #[test]
    fn test_classify_multi_dot_filename_uses_last_extension() {
        let map = CategoryMap::new();
        assert_eq!(map.classify("backup.2024.mp3"), Category::Audio);
    }
}
