//! Upload page HTML

const HEAD: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Wave File FFT / Spectrogram</title>
<style>
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 1440px; padding: 0 1rem; }
form { margin-bottom: 1.5rem; }
img { max-width: 100%; border: 1px solid #ddd; }
</style>
</head>
<body>
<h1>Wave File FFT / Spectrogram</h1>
<form method="post" action="/" enctype="multipart/form-data">
<input type="file" name="audio" accept=".wav,audio/wav">
<button type="submit">Upload</button>
</form>
"#;

const TAIL: &str = "</body>\n</html>\n";

/// Render the upload page, embedding the figure when one was produced
pub fn upload_page(image_url: Option<&str>) -> String {
    let mut html = String::from(HEAD);
    if let Some(url) = image_url {
        html.push_str(&format!(
            "<img src=\"{}\" alt=\"Time-domain signal, FFT spectrum and spectrogram\">\n",
            escape_attr(url)
        ));
    }
    html.push_str(TAIL);
    html
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_form() {
        let html = upload_page(None);
        assert!(html.contains(r#"name="audio""#));
        assert!(html.contains(r#"enctype="multipart/form-data""#));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_with_image() {
        let html = upload_page(Some("./static/output.png"));
        assert!(html.contains(r#"<img src="./static/output.png""#));
    }

    #[test]
    fn test_url_is_escaped() {
        let html = upload_page(Some("x\"><script>"));
        assert!(!html.contains("<script>"));
    }
}
