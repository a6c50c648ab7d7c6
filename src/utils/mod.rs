/// Strip any directory components a client put in an uploaded filename
pub fn upload_basename(filename: &str) -> &str {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim()
}

/// Uploaded configurations must be `.conf` or `.txt` files
pub fn is_config_filename(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    [".conf", ".txt"]
        .iter()
        .any(|ext| lower.len() > ext.len() && lower.ends_with(ext))
}

/// Download filename for a rendered diagram,
/// e.g. "3f2a..._topology.png"
pub fn diagram_download_name(config_id: &str, diagram_type: &str, format: &str) -> String {
    format!("{}_{}.{}", config_id, diagram_type, format)
}

/// `Content-Disposition` value that forces a download under `filename`
pub fn attachment_header(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename.replace('"', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_basename() {
        assert_eq!(upload_basename("ex3300-1.conf"), "ex3300-1.conf");
        assert_eq!(upload_basename("../../etc/passwd"), "passwd");
        assert_eq!(upload_basename("C:\\configs\\sw.txt"), "sw.txt");
    }

    #[test]
    fn test_is_config_filename() {
        assert!(is_config_filename("ex3300-1.conf"));
        assert!(is_config_filename("BACKUP.TXT"));
        assert!(!is_config_filename("config.json"));
        assert!(!is_config_filename(".conf"));
        assert!(!is_config_filename(""));
        assert!(!is_config_filename("router.conf.bak"));
    }

    #[test]
    fn test_diagram_download_name() {
        assert_eq!(diagram_download_name("abc", "vlans", "svg"), "abc_vlans.svg");
    }

    #[test]
    fn test_attachment_header() {
        assert_eq!(attachment_header("a.png"), "attachment; filename=\"a.png\"");
        assert_eq!(attachment_header("a\".png"), "attachment; filename=\"a.png\"");
    }
}
