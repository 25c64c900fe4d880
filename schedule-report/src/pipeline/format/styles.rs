//! Cell formats for the final report

use anyhow::Result;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern};

use super::classify::RowKind;
use crate::config::LayoutConfig;

/// Every format the report uses, built once from the layout config
#[derive(Debug, Clone)]
pub struct ReportStyles {
    pub title: Format,
    pub letterhead: Format,
    pub banner: Format,
    pub label: Format,
    pub data: Format,
    pub first_row: Format,
}

impl ReportStyles {
    pub fn new(layout: &LayoutConfig) -> Result<Self> {
        let centered = Format::new()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap();

        let title = centered.clone().set_font_size(layout.title_font_size);
        let letterhead = centered.set_font_size(layout.letterhead_font_size);

        let label = Format::new().set_bold().set_font_size(layout.body_font_size);
        let banner = label
            .clone()
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(layout.banner_rgb()?));
        let data = Format::new().set_font_size(layout.body_font_size);
        let first_row = label
            .clone()
            .set_border_top(FormatBorder::Thin)
            .set_border_top_color(Color::Black)
            .set_border_bottom(FormatBorder::Thin)
            .set_border_bottom_color(Color::Black);

        Ok(Self {
            title,
            letterhead,
            banner,
            label,
            data,
            first_row,
        })
    }

    /// Format for a classified body row
    pub fn for_kind(&self, kind: RowKind) -> &Format {
        match kind {
            RowKind::Banner => &self.banner,
            RowKind::HeaderLabel => &self.label,
            RowKind::Data => &self.data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styles() -> ReportStyles {
        ReportStyles::new(&LayoutConfig::default()).unwrap()
    }

    #[test]
    fn test_body_formats_per_kind() {
        let styles = styles();
        let label = Format::new().set_bold().set_font_size(7.0);

        assert_eq!(styles.for_kind(RowKind::HeaderLabel), &label);
        assert_eq!(
            styles.for_kind(RowKind::Banner),
            &label
                .clone()
                .set_pattern(FormatPattern::Solid)
                .set_background_color(Color::RGB(0xD3D3D3))
        );
        assert_eq!(styles.for_kind(RowKind::Data), &Format::new().set_font_size(7.0));
    }

    #[test]
    fn test_first_row_is_bold_with_thin_rules() {
        let expected = Format::new()
            .set_bold()
            .set_font_size(7.0)
            .set_border_top(FormatBorder::Thin)
            .set_border_top_color(Color::Black)
            .set_border_bottom(FormatBorder::Thin)
            .set_border_bottom_color(Color::Black);
        assert_eq!(styles().first_row, expected);
    }

    #[test]
    fn test_letterhead_font_sizes() {
        let centered = Format::new()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap();
        let styles = styles();
        assert_eq!(styles.title, centered.clone().set_font_size(20.0));
        assert_eq!(styles.letterhead, centered.set_font_size(6.0));
    }

    #[test]
    fn test_custom_fill_and_sizes() {
        let layout = LayoutConfig {
            banner_fill: "#FFEE00".to_string(),
            body_font_size: 9.0,
            ..LayoutConfig::default()
        };
        let styles = ReportStyles::new(&layout).unwrap();
        assert_eq!(
            styles.banner,
            Format::new()
                .set_bold()
                .set_font_size(9.0)
                .set_pattern(FormatPattern::Solid)
                .set_background_color(Color::RGB(0xFFEE00))
        );
    }

    #[test]
    fn test_bad_fill_is_error() {
        let layout = LayoutConfig {
            banner_fill: "grey".to_string(),
            ..LayoutConfig::default()
        };
        assert!(ReportStyles::new(&layout).is_err());
    }
}
