use super::{CellValue, ReportError, ReportRow};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Image, Workbook, Worksheet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Column headings, A..K
pub const HEADINGS: [&str; 11] = [
    "Article",
    "Description",
    "Property Account Code",
    "Unit Value",
    "Date Acquired",
    "P.O. Number",
    "Location",
    "Category",
    "Condition",
    "Issued To",
    "Quantity",
];

/// Column widths in character units, A..K
pub const COLUMN_WIDTHS: [f64; 11] = [
    15.0, 30.0, 25.0, 15.0, 18.0, 18.0, 20.0, 20.0, 15.0, 25.0, 12.0,
];

/// Zero-based row of the headings (row 9 in the sheet)
pub const HEADING_ROW: u32 = 8;
/// Zero-based row of the first data row (row 10 in the sheet)
pub const FIRST_DATA_ROW: u32 = 9;

const LAST_COL: u16 = 10;
const LOGO_ROW: u32 = 3;
const LOGO_ANCHOR_COL: u16 = 5;
const LOGO_SIZE_PX: f64 = 80.0;
const LOGO_OFFSET_Y: u32 = 5;
const PX_PER_WIDTH_UNIT: f64 = 7.0;
const HEADING_FILL: u32 = 0x059669;
const DATA_BORDER: u32 = 0xCCCCCC;

/// Style of a merged banner row
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BannerStyle {
    /// Bold, centered, given font size
    Title(f64),
    /// Centered, no text
    Blank,
}

/// A merged A:K row above the headings
#[derive(Debug, Clone, PartialEq)]
pub struct BannerRow {
    pub row: u32,
    pub text: String,
    pub style: BannerStyle,
    pub height: Option<f64>,
}

/// Where the logo image goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoPlacement {
    pub row: u32,
    pub col: u16,
    pub x_offset: u32,
    pub y_offset: u32,
}

/// Horizontal offset in pixels, relative to the left edge of `anchor_col`,
/// that centers an image of `image_px` over the full width of `widths`.
/// May be negative when the center falls left of the anchor column.
pub fn centered_offset(widths: &[f64], anchor_col: usize, image_px: f64) -> i64 {
    let total: f64 = widths.iter().sum();
    let before_anchor: f64 = widths.iter().take(anchor_col).sum();
    ((total / 2.0 - before_anchor) * PX_PER_WIDTH_UNIT - image_px / 2.0).round() as i64
}

/// Resolves a signed offset from `anchor_col` into a non-negative one by
/// moving the anchor left (or right) across whole columns.
pub fn logo_placement(widths: &[f64]) -> LogoPlacement {
    let mut col = LOGO_ANCHOR_COL as usize;
    let mut offset = centered_offset(widths, col, LOGO_SIZE_PX);

    while offset < 0 && col > 0 {
        col -= 1;
        offset += (widths[col] * PX_PER_WIDTH_UNIT).round() as i64;
    }
    while col + 1 < widths.len() {
        let col_px = (widths[col] * PX_PER_WIDTH_UNIT).round() as i64;
        if offset < col_px {
            break;
        }
        offset -= col_px;
        col += 1;
    }

    LogoPlacement {
        row: LOGO_ROW,
        col: col as u16,
        x_offset: offset.max(0) as u32,
        y_offset: LOGO_OFFSET_Y,
    }
}

/// Sheet title for the optional category context
pub fn report_title(category: Option<&str>) -> String {
    match category.filter(|c| !c.is_empty()) {
        Some(category) => format!("{} MONITORING", category.to_uppercase()),
        None => "DESKTOP MONITORING".to_string(),
    }
}

/// Everything that gets written, computed without touching the workbook
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPlan {
    pub column_widths: Vec<f64>,
    pub banner: Vec<BannerRow>,
    pub logo: LogoPlacement,
    pub heading_row: u32,
    pub first_data_row: u32,
    pub data: Vec<[CellValue; 11]>,
}

/// The monitoring-assets workbook generator
#[derive(Debug, Clone)]
pub struct MonitoringAssetsReport {
    letterhead: [String; 3],
    logo_path: Option<PathBuf>,
    category: Option<String>,
    year: i32,
}

impl MonitoringAssetsReport {
    pub fn new(year: i32) -> Self {
        Self {
            letterhead: [
                "Republic of the Philippines".to_string(),
                "National Irrigation Administration".to_string(),
                "Region XI".to_string(),
            ],
            logo_path: None,
            category: None,
            year,
        }
    }

    /// Replaces the three letterhead lines. Missing lines become blank.
    pub fn letterhead(mut self, lines: &[String]) -> Self {
        for (slot, line) in self.letterhead.iter_mut().zip(
            lines
                .iter()
                .cloned()
                .chain(std::iter::repeat(String::new())),
        ) {
            *slot = line;
        }
        self
    }

    pub fn logo_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.logo_path = Some(path.into());
        self
    }

    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    pub fn plan(&self, rows: &[ReportRow]) -> SheetPlan {
        let banner = vec![
            BannerRow {
                row: 0,
                text: self.letterhead[0].clone(),
                style: BannerStyle::Title(14.0),
                height: None,
            },
            BannerRow {
                row: 1,
                text: self.letterhead[1].clone(),
                style: BannerStyle::Title(16.0),
                height: None,
            },
            BannerRow {
                row: 2,
                text: self.letterhead[2].clone(),
                style: BannerStyle::Title(12.0),
                height: None,
            },
            BannerRow {
                row: LOGO_ROW,
                text: String::new(),
                style: BannerStyle::Blank,
                height: Some(80.0),
            },
            BannerRow {
                row: 4,
                text: String::new(),
                style: BannerStyle::Blank,
                height: Some(10.0),
            },
            BannerRow {
                row: 5,
                text: report_title(self.category.as_deref()),
                style: BannerStyle::Title(14.0),
                height: None,
            },
            BannerRow {
                row: 6,
                text: format!("For the Year {}", self.year),
                style: BannerStyle::Title(12.0),
                height: None,
            },
            BannerRow {
                row: 7,
                text: String::new(),
                style: BannerStyle::Blank,
                height: Some(10.0),
            },
        ];

        SheetPlan {
            column_widths: COLUMN_WIDTHS.to_vec(),
            banner,
            logo: logo_placement(&COLUMN_WIDTHS),
            heading_row: HEADING_ROW,
            first_data_row: FIRST_DATA_ROW,
            data: rows.iter().map(ReportRow::cells).collect(),
        }
    }

    /// Renders the workbook to XLSX bytes
    pub fn render(&self, rows: &[ReportRow]) -> Result<Vec<u8>, ReportError> {
        let plan = self.plan(rows);
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Monitoring Assets")?;

        write_plan(worksheet, &plan)?;
        if let Some(path) = self.logo_path.as_deref() {
            insert_logo(worksheet, path, plan.logo)?;
        }

        debug!(rows = rows.len(), "Rendered monitoring assets workbook");
        Ok(workbook.save_to_buffer()?)
    }
}

fn write_plan(worksheet: &mut Worksheet, plan: &SheetPlan) -> Result<(), ReportError> {
    for (col, width) in plan.column_widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    let blank = Format::new()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);

    for line in &plan.banner {
        let format = match line.style {
            BannerStyle::Title(size) => Format::new()
                .set_bold()
                .set_font_size(size)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            BannerStyle::Blank => blank.clone(),
        };
        worksheet.merge_range(line.row, 0, line.row, LAST_COL, &line.text, &format)?;
        if let Some(height) = line.height {
            worksheet.set_row_height(line.row, height)?;
        }
    }

    let heading = Format::new()
        .set_bold()
        .set_font_size(12)
        .set_font_color(0xFFFFFF)
        .set_background_color(HEADING_FILL)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
        .set_border_color(0x000000);
    for (col, title) in HEADINGS.iter().enumerate() {
        worksheet.write_with_format(plan.heading_row, col as u16, *title, &heading)?;
    }

    let data = Format::new()
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
        .set_border_color(DATA_BORDER);
    for (offset, cells) in plan.data.iter().enumerate() {
        let row = plan.first_data_row + offset as u32;
        for (col, cell) in cells.iter().enumerate() {
            let col = col as u16;
            match cell {
                CellValue::Text(text) => {
                    worksheet.write_with_format(row, col, text.as_str(), &data)?;
                }
                CellValue::Number(n) => {
                    worksheet.write_with_format(row, col, *n, &data)?;
                }
                CellValue::Empty => {
                    worksheet.write_blank(row, col, &data)?;
                }
            }
        }
    }

    Ok(())
}

/// Places the logo when the file exists. A file that cannot be decoded is
/// logged and skipped.
fn insert_logo(
    worksheet: &mut Worksheet,
    path: &Path,
    placement: LogoPlacement,
) -> Result<(), ReportError> {
    if !path.exists() {
        debug!(path = %path.display(), "Logo not found, skipping");
        return Ok(());
    }

    let image = match Image::new(path) {
        Ok(image) => image.set_scale_to_size(LOGO_SIZE_PX, LOGO_SIZE_PX, false),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to insert logo in spreadsheet");
            return Ok(());
        }
    };

    if let Err(e) = worksheet.insert_image_with_offset(
        placement.row,
        placement.col,
        &image,
        placement.x_offset,
        placement.y_offset,
    ) {
        warn!(path = %path.display(), error = %e, "Failed to insert logo in spreadsheet");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::{fixtures::bare, NOT_ASSIGNED};
    use std::io::{Cursor, Read, Write};

    // 1x1 transparent PNG
    const PNG_1X1: [u8; 67] = [
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    // 2x1 transparent PNG
    const PNG_2X1: [u8; 68] = [
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0xF4,
        0x22, 0x7F, 0x8A, 0x00, 0x00, 0x00, 0x0B, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x60,
        0x80, 0x02, 0x00, 0x00, 0x09, 0x00, 0x01, 0xFB, 0x52, 0xB8, 0xA9, 0x00, 0x00, 0x00, 0x00,
        0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    /// Text of every `<si>` entry in sharedStrings.xml, in index order
    fn shared_strings(xml: &str) -> Vec<String> {
        xml.split("<si>")
            .skip(1)
            .map(|si| {
                let open = si.find("<t").unwrap();
                let start = open + si[open..].find('>').unwrap() + 1;
                if si[..start].ends_with("/>") {
                    return String::new();
                }
                si.find("</t>")
                    .map(|end| si[start..end].to_string())
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Shared-string text stored in `cell`, `None` for a missing or blank cell
    fn cell_text(sheet: &str, strings: &[String], cell: &str) -> Option<String> {
        let start = sheet.find(&format!("<c r=\"{}\"", cell))?;
        let rest = &sheet[start..];
        let tag = &rest[..rest.find('>')?];
        if tag.ends_with('/') || !tag.contains("t=\"s\"") {
            return None;
        }
        let value = &rest[rest.find("<v>")? + 3..rest.find("</v>")?];
        strings.get(value.parse::<usize>().ok()?).cloned()
    }

    fn attribute(xml: &str, name: &str) -> u64 {
        let start = xml.find(&format!("{}=\"", name)).unwrap() + name.len() + 2;
        let end = start + xml[start..].find('"').unwrap();
        xml[start..end].parse().unwrap()
    }

    fn rows(n: i32) -> Vec<ReportRow> {
        (1..=n).map(|id| ReportRow::from(&bare(id))).collect()
    }

    #[test]
    fn default_widths_center_logo_left_of_column_f() {
        assert_eq!(COLUMN_WIDTHS.iter().sum::<f64>(), 213.0);
        assert_eq!(centered_offset(&COLUMN_WIDTHS, 5, 80.0), -16);

        let placement = logo_placement(&COLUMN_WIDTHS);
        assert_eq!(
            placement,
            LogoPlacement {
                row: 3,
                col: 4,
                x_offset: 110,
                y_offset: 5,
            }
        );
    }

    #[test]
    fn positive_offset_stays_on_anchor_column() {
        // Wider right half pushes the center into column F
        let mut widths = COLUMN_WIDTHS;
        widths[10] = 39.0;
        assert_eq!(centered_offset(&widths, 5, 80.0), 79);
        let placement = logo_placement(&widths);
        assert_eq!(placement.col, 5);
        assert_eq!(placement.x_offset, 79);
    }

    #[test]
    fn headings_and_data_rows_are_fixed() {
        let report = MonitoringAssetsReport::new(2025);
        for plan in [report.plan(&[]), report.plan(&rows(3))] {
            assert_eq!(plan.heading_row, 8);
            assert_eq!(plan.first_data_row, 9);
            assert_eq!(plan.banner.len(), 8);
        }
        assert!(report.plan(&[]).data.is_empty());
        assert_eq!(report.plan(&rows(3)).data.len(), 3);
    }

    #[test]
    fn banner_layout() {
        let plan = MonitoringAssetsReport::new(2024)
            .category(Some("Electronics".into()))
            .plan(&[]);

        let texts: Vec<&str> = plan.banner.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(
            texts,
            [
                "Republic of the Philippines",
                "National Irrigation Administration",
                "Region XI",
                "",
                "",
                "ELECTRONICS MONITORING",
                "For the Year 2024",
                "",
            ]
        );
        assert_eq!(plan.banner[1].style, BannerStyle::Title(16.0));
        assert_eq!(plan.banner[3].height, Some(80.0));
        assert_eq!(plan.banner[4].height, Some(10.0));
        assert_eq!(plan.banner[7].height, Some(10.0));
        assert_eq!(plan.column_widths, COLUMN_WIDTHS.to_vec());
    }

    #[test]
    fn title_defaults_to_desktop_monitoring() {
        assert_eq!(report_title(None), "DESKTOP MONITORING");
        assert_eq!(report_title(Some("")), "DESKTOP MONITORING");
        assert_eq!(report_title(Some("Office Supplies")), "OFFICE SUPPLIES MONITORING");
    }

    #[test]
    fn custom_letterhead_replaces_lines() {
        let plan = MonitoringAssetsReport::new(2025)
            .letterhead(&["Line A".to_string(), "Line B".to_string()])
            .plan(&[]);
        assert_eq!(plan.banner[0].text, "Line A");
        assert_eq!(plan.banner[1].text, "Line B");
        assert_eq!(plan.banner[2].text, "");
    }

    #[test]
    fn renders_xlsx_without_logo() {
        let bytes = MonitoringAssetsReport::new(2025)
            .logo_path("/definitely/not/here.png")
            .render(&rows(2))
            .unwrap();
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn renders_with_valid_logo() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&PNG_1X1).unwrap();

        let without = MonitoringAssetsReport::new(2025).render(&rows(1)).unwrap();
        let with = MonitoringAssetsReport::new(2025)
            .logo_path(file.path())
            .render(&rows(1))
            .unwrap();
        assert_eq!(&with[0..2], b"PK");
        assert!(with.len() > without.len());
    }

    #[test]
    fn corrupt_logo_does_not_prevent_export() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"not an image at all").unwrap();

        let bytes = MonitoringAssetsReport::new(2025)
            .logo_path(file.path())
            .render(&rows(1))
            .unwrap();
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn workbook_has_headings_on_row_9_and_data_from_row_10() {
        for count in [0, 2] {
            let bytes = MonitoringAssetsReport::new(2025).render(&rows(count)).unwrap();
            let strings = shared_strings(&read_part(&bytes, "xl/sharedStrings.xml"));
            let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");

            assert_eq!(cell_text(&sheet, &strings, "A9").as_deref(), Some("Article"));
            assert_eq!(cell_text(&sheet, &strings, "K9").as_deref(), Some("Quantity"));
            let first_row = cell_text(&sheet, &strings, "A10");
            if count == 0 {
                assert_eq!(first_row, None);
            } else {
                assert_eq!(first_row.as_deref(), Some("Desktop Computer"));
                assert_eq!(cell_text(&sheet, &strings, "J11").as_deref(), Some(NOT_ASSIGNED));
            }
        }
    }

    #[test]
    fn logo_is_stretched_to_a_square() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&PNG_2X1).unwrap();

        let bytes = MonitoringAssetsReport::new(2025)
            .logo_path(file.path())
            .render(&rows(1))
            .unwrap();
        let drawing = read_part(&bytes, "xl/drawings/drawing1.xml");
        let extent = &drawing[drawing.find("ext cx=").unwrap()..];
        assert_eq!(attribute(extent, "cx"), attribute(extent, "cy"));
    }
}
