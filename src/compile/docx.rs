/// Word document output
///
/// Layout: a title, the compile time, the page count, then one
/// "Page N" heading per page followed by the image at full text width.

use chrono::Local;
use docx_rs::{Docx, Paragraph, Pic, Run, Style, StyleType};
use image::{GenericImageView, ImageFormat};
use std::fs::{self, File};
use std::io::Cursor;
use std::path::Path;
use tracing::{info, warn};

use super::{CompileReport, DocumentWriter, PageFailure};
use crate::error::{CompilerError, Result};
use crate::scan::decode_image;
use crate::state::data::{file_name_of, Page};

/// English Metric Units per inch
const EMU_PER_INCH: f64 = 914_400.0;

/// Page images are scaled to this width
const DEFAULT_IMAGE_WIDTH_INCHES: f64 = 7.5;

/// Paragraph style ids, registered under Word's built-in style names
const TITLE_STYLE: &str = "Title";
const PAGE_HEADING_STYLE: &str = "Heading2";

#[derive(Debug, Clone)]
pub struct DocxWriter {
    pub title: String,
    pub image_width_inches: f64,
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self {
            title: "Sheet Music Compilation".to_string(),
            image_width_inches: DEFAULT_IMAGE_WIDTH_INCHES,
        }
    }
}

impl DocxWriter {
    /// Decode the page image and wrap it as an embedded picture
    fn picture(&self, path: &Path) -> std::result::Result<Pic, String> {
        let img = decode_image(path).map_err(|e| e.to_string())?;
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err("image has no pixels".to_string());
        }

        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| e.to_string())?;

        let width_emu = self.image_width_inches * EMU_PER_INCH;
        let height_emu = width_emu * height as f64 / width as f64;
        Ok(Pic::new(&png).size(width_emu as u32, height_emu as u32))
    }
}

fn styles(doc: Docx) -> Docx {
    doc.add_style(Style::new(TITLE_STYLE, StyleType::Paragraph).name("Title").size(48).bold())
        .add_style(
            Style::new(PAGE_HEADING_STYLE, StyleType::Paragraph)
                .name("heading 2")
                .size(28)
                .bold(),
        )
}

fn heading(text: &str, style: &str) -> Paragraph {
    Paragraph::new().style(style).add_run(Run::new().add_text(text))
}

fn line(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

impl DocumentWriter for DocxWriter {
    fn write(&self, pages: &[Page], output_folder: &Path) -> Result<CompileReport> {
        if pages.is_empty() {
            return Err(CompilerError::Document("No pages to compile".to_string()));
        }

        fs::create_dir_all(output_folder)?;

        let now = Local::now();
        let mut doc = styles(Docx::new())
            .add_paragraph(heading(&self.title, TITLE_STYLE))
            .add_paragraph(line(&format!("Compiled on: {}", now.format("%Y-%m-%d %H:%M:%S"))))
            .add_paragraph(line(&format!("Total pages: {}", pages.len())))
            .add_paragraph(Paragraph::new());

        let mut failures = Vec::new();
        for page in pages {
            doc = doc.add_paragraph(heading(&format!("Page {}", page.number), PAGE_HEADING_STYLE));

            match self.picture(&page.path) {
                Ok(pic) => {
                    doc = doc
                        .add_paragraph(Paragraph::new().add_run(Run::new().add_image(pic)))
                        .add_paragraph(Paragraph::new());
                }
                Err(error) => {
                    let name = file_name_of(&page.path);
                    warn!("⚠️  Error loading page {} ({}): {}", page.number, name, error);
                    doc = doc.add_paragraph(line(&format!("Error loading page: {} - {}", name, error)));
                    failures.push(PageFailure {
                        number: page.number,
                        path: page.path.clone(),
                        error,
                    });
                }
            }
        }

        let file_name = format!("Sheet_Music_Compilation_{}.docx", now.format("%Y%m%d_%H%M%S"));
        let output_path = output_folder.join(file_name);
        let file = File::create(&output_path)?;
        doc.build()
            .pack(file)
            .map_err(|e| CompilerError::Document(e.to_string()))?;

        info!(
            "✅ Wrote {} pages to {} ({} failed)",
            pages.len(),
            output_path.display(),
            failures.len()
        );

        Ok(CompileReport {
            output_path,
            page_count: pages.len(),
            failures,
        })
    }
}
