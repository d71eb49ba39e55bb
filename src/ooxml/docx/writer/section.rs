/// Section properties (`w:sectPr`) emitted at the end of the body.
use serde::{Deserialize, Serialize};

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    #[default]
    Portrait,
    Landscape,
}

impl PageOrientation {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}

/// Page size and margins, all lengths in twips (1440 per inch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionProperties {
    pub page_width: u32,
    pub page_height: u32,
    pub orientation: PageOrientation,
    pub margin_top: u32,
    pub margin_bottom: u32,
    pub margin_left: u32,
    pub margin_right: u32,
}

impl Default for SectionProperties {
    fn default() -> Self {
        // US Letter, one inch margins
        Self {
            page_width: 12240,
            page_height: 15840,
            orientation: PageOrientation::Portrait,
            margin_top: 1440,
            margin_bottom: 1440,
            margin_left: 1440,
            margin_right: 1440,
        }
    }
}

impl SectionProperties {
    /// US Letter (8.5" x 11").
    pub fn letter() -> Self {
        Self::default()
    }

    /// A4 (210mm x 297mm).
    pub fn a4() -> Self {
        Self {
            page_width: 11906,
            page_height: 16838,
            ..Default::default()
        }
    }

    /// Switch to landscape, swapping width and height.
    pub fn landscape(mut self) -> Self {
        if self.orientation != PageOrientation::Landscape {
            self.orientation = PageOrientation::Landscape;
            std::mem::swap(&mut self.page_width, &mut self.page_height);
        }
        self
    }

    pub(crate) fn write_xml(&self, xml: &mut String) {
        xml.push_str("<w:sectPr>");
        xml.push_str(&format!(
            r#"<w:pgSz w:w="{}" w:h="{}" w:orient="{}"/>"#,
            self.page_width,
            self.page_height,
            self.orientation.as_str()
        ));
        xml.push_str(&format!(
            r#"<w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="720" w:footer="720" w:gutter="0"/>"#,
            self.margin_top, self.margin_right, self.margin_bottom, self.margin_left
        ));
        xml.push_str("</w:sectPr>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_swaps_once() {
        let section = SectionProperties::a4().landscape().landscape();
        assert_eq!(section.page_width, 16838);
        assert_eq!(section.page_height, 11906);
        assert_eq!(section.orientation, PageOrientation::Landscape);
    }

    #[test]
    fn test_section_xml() {
        let mut xml = String::new();
        SectionProperties::letter().write_xml(&mut xml);
        assert!(xml.starts_with("<w:sectPr><w:pgSz w:w=\"12240\" w:h=\"15840\""));
        assert!(xml.ends_with("</w:sectPr>"));
    }
}
