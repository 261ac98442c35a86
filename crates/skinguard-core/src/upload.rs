//! Upload validation: allowed extensions and filename sanitization.

use unicode_normalization::UnicodeNormalization;

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Largest upload the service accepts (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// True if `filename` has an allowed image extension after its last `.`.
pub fn allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Reduce a client-supplied filename to something safe to join onto the
/// upload folder. Accented letters are decomposed to their ASCII base. The
/// result never contains a path separator and may be empty.
pub fn secure_filename(filename: &str) -> String {
    let spaced: String = filename
        .nfkd()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_image_extensions_case_insensitively() {
        assert!(allowed_file("mole.png"));
        assert!(allowed_file("mole.JPG"));
        assert!(allowed_file("scan.2024.jpeg"));
    }

    #[test]
    fn rejects_other_or_missing_extensions() {
        assert!(!allowed_file("mole.gif"));
        assert!(!allowed_file("mole"));
        assert!(!allowed_file("png"));
        assert!(!allowed_file("mole.png.exe"));
        assert!(!allowed_file(""));
    }

    #[test]
    fn sanitizes_plain_names() {
        assert_eq!(secure_filename("My Mole Photo.jpg"), "My_Mole_Photo.jpg");
        assert_eq!(secure_filename("lesion-01.png"), "lesion-01.png");
    }

    #[test]
    fn strips_path_traversal() {
        assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename(r"C:\Users\me\mole.png"), "C_Users_me_mole.png");
        assert!(!secure_filename("/a/../b.png").contains('/'));
    }

    #[test]
    fn transliterates_accents_before_filtering() {
        assert_eq!(secure_filename("naïve.png"), "naive.png");
        assert_eq!(secure_filename("Mélanome café.jpg"), "Melanome_cafe.jpg");
    }

    #[test]
    fn drops_unsafe_and_non_ascii_characters() {
        assert_eq!(secure_filename("naïve<script>.png"), "naivescript.png");
        assert_eq!(secure_filename("..."), "");
        assert_eq!(secure_filename("ß"), "");
    }
}
