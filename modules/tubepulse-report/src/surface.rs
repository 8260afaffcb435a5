use std::io::Write;

use tracing::warn;

/// One appended piece of the report: a titled section or a bare message.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub title: Option<String>,
    pub html: String,
}

impl Fragment {
    pub fn section(title: &str, inner: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            html: format!(
                "<div class=\"section\">\n  <div class=\"section-title\">{title}</div>\n  {inner}\n</div>\n"
            ),
        }
    }

    pub fn message(html: impl Into<String>) -> Self {
        let mut html = html.into();
        html.push('\n');
        Self { title: None, html }
    }
}

/// Render target for one run. Append-only: nothing appended is ever replaced.
pub trait ReportSurface {
    fn append(&mut self, fragment: Fragment);
}

/// Headless surface that keeps every fragment in memory.
#[derive(Debug, Default)]
pub struct MemorySurface {
    fragments: Vec<Fragment>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Section titles in the order they were appended.
    pub fn titles(&self) -> Vec<&str> {
        self.fragments
            .iter()
            .filter_map(|f| f.title.as_deref())
            .collect()
    }

    pub fn has_section(&self, title: &str) -> bool {
        self.titles().contains(&title)
    }

    pub fn html(&self) -> String {
        self.fragments.iter().map(|f| f.html.as_str()).collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.fragments.iter().any(|f| f.html.contains(needle))
    }
}

impl ReportSurface for MemorySurface {
    fn append(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }
}

/// Writes each fragment as soon as it is appended, inside a minimal HTML page.
pub struct StreamSurface<W: Write> {
    out: W,
}

impl<W: Write> StreamSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn begin(&mut self, title: &str) -> std::io::Result<()> {
        write!(
            self.out,
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<div id=\"output\">\n"
        )?;
        self.out.flush()
    }

    pub fn finish(mut self) -> std::io::Result<W> {
        write!(self.out, "</div>\n</body>\n</html>\n")?;
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> ReportSurface for StreamSurface<W> {
    fn append(&mut self, fragment: Fragment) {
        let written = self
            .out
            .write_all(fragment.html.as_bytes())
            .and_then(|_| self.out.flush());
        if let Err(e) = written {
            warn!(error = %e, section = ?fragment.title, "Failed to write report fragment");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_surface_records_sections_in_order() {
        let mut surface = MemorySurface::new();
        surface.append(Fragment::section("First", "<p>a</p>"));
        surface.append(Fragment::message("<p>note</p>"));
        surface.append(Fragment::section("Second", "<p>b</p>"));

        assert_eq!(surface.titles(), vec!["First", "Second"]);
        assert!(surface.has_section("Second"));
        assert!(!surface.has_section("Third"));
        assert!(surface.contains("<p>note</p>"));
        assert_eq!(surface.fragments().len(), 3);
    }

    #[test]
    fn section_markup() {
        let f = Fragment::section("YouTube Video ID", "<p>abc</p>");
        assert!(f.html.starts_with("<div class=\"section\">"));
        assert!(f.html.contains("<div class=\"section-title\">YouTube Video ID</div>"));
        assert!(f.html.contains("<p>abc</p>"));
    }

    #[test]
    fn stream_surface_wraps_fragments_in_a_page() {
        let mut surface = StreamSurface::new(Vec::new());
        surface.begin("Report").unwrap();
        surface.append(Fragment::message("<p>hello</p>"));
        let bytes = surface.finish().unwrap();
        let page = String::from_utf8(bytes).unwrap();

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Report</title>"));
        let body_at = page.find("<p>hello</p>").unwrap();
        assert!(body_at < page.find("</body>").unwrap());
    }
}
