/// MIME types the upload form is expected to send, mapped to the extension
/// used in generated storage keys.
const MIME_TO_EXT: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("image/svg+xml", "svg"),
];

/// Fallback extension when neither the content type nor the filename gives
/// one away.
const DEFAULT_EXT: &str = "jpg";

/// Pick a file extension: the MIME map first, then `mime_guess` for types
/// outside it, then the original filename's extension, then the default.
fn extension_for(content_type: &str, original_name: Option<&str>) -> String {
    if let Some((_, ext)) = MIME_TO_EXT.iter().find(|(mime, _)| *mime == content_type) {
        return (*ext).to_string();
    }

    if let Some(exts) = mime_guess::get_mime_extensions_str(content_type)
        && let Some(ext) = exts.first()
    {
        return (*ext).to_string();
    }

    if let Some(name) = original_name
        && let Some((stem, ext)) = name.rsplit_once('.')
        && !stem.is_empty()
        && !ext.is_empty()
    {
        return ext.to_ascii_lowercase();
    }

    DEFAULT_EXT.to_string()
}

/// Derive the storage key for an upload: a timestamped name with an
/// extension inferred from the content type, falling back to the original
/// filename's extension.
pub fn generate_object_key(content_type: &str, original_name: Option<&str>) -> String {
    let timestamp = chrono::Utc::now().timestamp_millis();
    format!(
        "image-{timestamp}.{}",
        extension_for(content_type, original_name)
    )
}
