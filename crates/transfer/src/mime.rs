use std::path::Path;

use msalign_protocol::constants::DEFAULT_CONTENT_TYPE;

/// Guesses the content type of a file from its name.
///
/// Compression suffixes (`.gz`, `.bz2`, `.xz`, `.br`) are an encoding, not
/// a type: they are stripped and the type comes from the extension before
/// them, so `reads.fq.gz` is unknown while `data.tar.gz` and `data.tgz` are
/// tar archives. Unknown names fall back to `application/octet-stream`
/// (sequence formats such as `.fa` included).
pub fn guess_content_type(path: &Path) -> &'static str {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return DEFAULT_CONTENT_TYPE;
    };
    let name = name.to_lowercase();

    let (stem, ext) = split_ext(&name);
    let ext = match ext {
        "tgz" | "taz" | "tz" | "tbz2" | "txz" => "tar",
        "svgz" => "svg",
        "gz" | "bz2" | "xz" | "br" => split_ext(stem).1,
        other => other,
    };

    match ext {
        "txt" | "text" | "log" => "text/plain",
        "csv" => "text/csv",
        "tsv" => "text/tab-separated-values",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "tar" => "application/x-tar",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// Splits off the last extension. Leading dots belong to the stem.
fn split_ext(name: &str) -> (&str, &str) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.trim_start_matches('.').is_empty() => (stem, ext),
        _ => (name, ""),
    }
}
