//! Print document construction, measurement, and pagination.

use rxpad_core::{ComponentKind, PrescriptionTemplate};
use rxpad_types::HexColor;

/// Capture geometry for an A4 prescription page.
///
/// The document is laid out at a fixed 800 px-equivalent content width and
/// rasterised at 2× scale, then cut into 210×295 mm pages.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSpec {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub content_width_px: u32,
    pub raster_scale: f64,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 295.0,
            content_width_px: 800,
            raster_scale: 2.0,
        }
    }
}

impl PageSpec {
    /// Page height in layout pixels, derived from the page aspect ratio at
    /// the fixed content width.
    pub fn page_height_px(&self) -> u32 {
        (self.page_height_mm / self.page_width_mm * f64::from(self.content_width_px)).floor()
            as u32
    }

    /// Raster dimensions of one page at the configured scale.
    pub fn raster_size(&self) -> (u32, u32) {
        let scale = |px: u32| (f64::from(px) * self.raster_scale).round() as u32;
        (scale(self.content_width_px), scale(self.page_height_px()))
    }
}

/// Vertical padding around a free-text block.
const TEXT_PADDING_PX: u32 = 12;
/// Line height for wrapped free text.
const TEXT_LINE_HEIGHT_PX: u32 = 22;
/// Wrap width for free text at the fixed content width.
const TEXT_CHARS_PER_LINE: usize = 80;

/// One laid-out block, in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintBlock {
    pub kind: ComponentKind,
    pub text: String,
    pub height_px: u32,
}

impl PrintBlock {
    fn measure(kind: ComponentKind, text: &str) -> u32 {
        match kind {
            ComponentKind::Divider => 24,
            ComponentKind::Header => 40,
            ComponentKind::Rx | ComponentKind::Lx => 48,
            ComponentKind::Input | ComponentKind::Date => 56,
            ComponentKind::Text => {
                let lines: u32 = text
                    .split('\n')
                    .map(|line| {
                        let chars = line.chars().count();
                        (chars.max(1).div_ceil(TEXT_CHARS_PER_LINE)) as u32
                    })
                    .sum::<u32>()
                    .max(1);
                TEXT_PADDING_PX * 2 + lines * TEXT_LINE_HEIGHT_PX
            }
        }
    }
}

/// A full prescription document ready for capture: the theme colour and one
/// measured block per component, in component-list order.
#[derive(Clone, Debug, PartialEq)]
pub struct PrintDocument {
    pub color: HexColor,
    pub blocks: Vec<PrintBlock>,
}

impl PrintDocument {
    /// Builds the document from a validated template. Component order is
    /// preserved exactly; each block carries the component's display text
    /// (its own text, or the kind's default caption).
    pub fn build(template: &PrescriptionTemplate) -> Self {
        let blocks = template
            .components
            .iter()
            .map(|component| {
                let text = component.display_text().to_owned();
                let height_px = PrintBlock::measure(component.kind, &text);
                PrintBlock {
                    kind: component.kind,
                    text,
                    height_px,
                }
            })
            .collect();

        Self {
            color: template.color.clone(),
            blocks,
        }
    }
}

/// One captured page: a contiguous run of blocks and their summed height.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub blocks: Vec<PrintBlock>,
    pub content_height_px: u32,
}

/// Flows blocks into pages of at most `page_height_px` content height.
///
/// Greedy top-to-bottom flow: a block that does not fit the remaining space
/// starts a new page, and a block taller than a whole page occupies a page
/// alone. Output order equals input order; no block is dropped or split.
pub fn paginate(blocks: &[PrintBlock], page_height_px: u32) -> Vec<Page> {
    let mut pages: Vec<Page> = Vec::new();
    let mut current: Vec<PrintBlock> = Vec::new();
    let mut current_height: u32 = 0;

    for block in blocks {
        if !current.is_empty() && current_height + block.height_px > page_height_px {
            pages.push(Page {
                blocks: std::mem::take(&mut current),
                content_height_px: current_height,
            });
            current_height = 0;
        }
        current_height += block.height_px;
        current.push(block.clone());
    }

    if !current.is_empty() {
        pages.push(Page {
            blocks: current,
            content_height_px: current_height,
        });
    }

    pages
}
