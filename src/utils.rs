/// The only media type the portal stores.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Returns true when the upload is declared as a PDF or carries a `.pdf` name.
pub fn is_pdf(content_type: Option<&str>, filename: &str) -> bool {
    content_type == Some(PDF_MIME_TYPE) || filename.to_lowercase().ends_with(".pdf")
}

/// Content type used when serving a stored file back.
pub fn content_type_for(filename: &str) -> &'static str {
    if filename.to_lowercase().ends_with(".pdf") {
        PDF_MIME_TYPE
    } else {
        "application/octet-stream"
    }
}

/// Builds an attachment `Content-Disposition` value for `filename`.
///
/// The quoted `filename` is ASCII with `"` and `\` escaped and other
/// characters replaced by `_`; names that needed replacing also get an
/// RFC 5987 `filename*` parameter carrying the exact UTF-8 name.
pub fn content_disposition(filename: &str) -> String {
    let mut quoted = String::with_capacity(filename.len());
    let mut plain = true;
    for c in filename.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            ' '..='~' => quoted.push(c),
            _ => {
                quoted.push('_');
                plain = false;
            }
        }
    }

    if plain {
        format!("attachment; filename=\"{}\"", quoted)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            quoted,
            urlencoding::encode(filename)
        )
    }
}

/// Normalizes a client-supplied filename for storage.
///
/// Directory components are dropped and every run of whitespace becomes a
/// single underscore. Returns `None` when nothing usable is left.
pub fn sanitize_filename(original: &str) -> Option<String> {
    let name = original.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(original);

    let mut sanitized = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                sanitized.push('_');
            }
            in_whitespace = true;
        } else {
            sanitized.push(c);
            in_whitespace = false;
        }
    }

    match sanitized.as_str() {
        "" | "." | ".." => None,
        _ => Some(sanitized),
    }
}

/// Splits a filename into its stem and extension (extension keeps the dot).
///
/// A leading dot does not start an extension, so `.pdf` has none.
pub fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => filename.split_at(idx),
        _ => (filename, ""),
    }
}

/// Builds the `n`-th collision candidate, e.g. `report(2).pdf`.
pub fn numbered_filename(filename: &str, counter: u32) -> String {
    if counter == 0 {
        return filename.to_string();
    }
    let (stem, ext) = split_extension(filename);
    format!("{}({}){}", stem, counter, ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_detection_accepts_type_or_extension() {
        assert!(is_pdf(Some("application/pdf"), "scan"));
        assert!(is_pdf(Some("application/octet-stream"), "Report.PDF"));
        assert!(is_pdf(None, "notes.pdf"));
        assert!(!is_pdf(Some("text/plain"), "notes.txt"));
        assert!(!is_pdf(None, "pdf"));
    }

    #[test]
    fn content_disposition_quotes_plain_names() {
        assert_eq!(content_disposition("report.pdf"), "attachment; filename=\"report.pdf\"");
    }

    #[test]
    fn content_disposition_escapes_quotes_and_backslashes() {
        assert_eq!(content_disposition("a\"b.pdf"), "attachment; filename=\"a\\\"b.pdf\"");
        assert_eq!(content_disposition("a\\b.pdf"), "attachment; filename=\"a\\\\b.pdf\"");
    }

    #[test]
    fn content_disposition_adds_utf8_name_for_non_ascii() {
        assert_eq!(
            content_disposition("résumé.pdf"),
            "attachment; filename=\"r_sum_.pdf\"; filename*=UTF-8''r%C3%A9sum%C3%A9.pdf"
        );
    }

    #[test]
    fn sanitize_collapses_whitespace_runs() {
        assert_eq!(sanitize_filename("my  report.pdf").as_deref(), Some("my_report.pdf"));
        assert_eq!(sanitize_filename(" lab\tresults .pdf").as_deref(), Some("_lab_results_.pdf"));
        assert_eq!(sanitize_filename("plain.pdf").as_deref(), Some("plain.pdf"));
    }

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd.pdf").as_deref(), Some("passwd.pdf"));
        assert_eq!(sanitize_filename("C:\\Users\\me\\scan.pdf").as_deref(), Some("scan.pdf"));
        assert_eq!(sanitize_filename("dir/.."), None);
        assert_eq!(sanitize_filename(""), None);
    }

    #[test]
    fn split_extension_handles_dotfiles() {
        assert_eq!(split_extension("report.pdf"), ("report", ".pdf"));
        assert_eq!(split_extension("archive.tar.pdf"), ("archive.tar", ".pdf"));
        assert_eq!(split_extension(".pdf"), (".pdf", ""));
        assert_eq!(split_extension("README"), ("README", ""));
    }

    #[test]
    fn numbered_filename_inserts_counter_before_extension() {
        assert_eq!(numbered_filename("report.pdf", 0), "report.pdf");
        assert_eq!(numbered_filename("report.pdf", 1), "report(1).pdf");
        assert_eq!(numbered_filename("report.pdf", 12), "report(12).pdf");
        assert_eq!(numbered_filename("scan", 2), "scan(2)");
    }
}
