//! # slidescene
//!
//! PPTX presentation reconstruction into a positioned, styled scene graph.
//!
//! This library reads a packaged OOXML presentation (a ZIP container of
//! interrelated XML parts) and rebuilds its slides as structured scenes:
//! shapes, text runs, images, nested groups, backgrounds, and
//! theme-derived colors, all positioned in one pixel coordinate space.
//! Missing or malformed parts degrade to documented fallbacks; only an
//! unreadable archive fails a parse.
//!
//! ## Quick Start
//!
//! ```no_run
//! use slidescene::parse_file;
//!
//! let presentation = parse_file("deck.pptx")?;
//! println!("{} slides at {}x{}",
//!     presentation.slides.len(),
//!     presentation.size.width,
//!     presentation.size.height);
//!
//! for slide in &presentation.slides {
//!     println!("slide {}: {} elements", slide.number, slide.elements.len());
//! }
//! # Ok::<(), slidescene::Error>(())
//! ```
//!
//! ## Reusing the parser
//!
//! ```no_run
//! use slidescene::PresentationParser;
//!
//! let parser = PresentationParser::open("deck.pptx")?;
//! println!("{} slides declared", parser.slide_count());
//! let presentation = parser.parse()?;
//! let json = presentation.to_json()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod container;
pub mod error;
pub mod model;
pub mod parser;
pub mod units;

// Re-exports
pub use container::{PptxContainer, Relationship, Relationships};
pub use error::{Error, Result};
pub use model::{
    Alignment, Autofit, Background, Baseline, Bullet, Caps, Color, ColorScheme, CropRect,
    DashStyle, Element, Fill, FontScheme, FontSet, Frame, GradientKind, GradientStop,
    GroupElement, ImageElement, ImageFillMode, ImagePayload, Insets, LineCap, LineJoin, Metadata,
    Outline, Paragraph, Presentation, RenderSize, Run, SchemeSlot, ShapeElement, Slide, TextBody,
    TextElement, Theme, VerticalAnchor,
};
pub use parser::PresentationParser;

use std::path::Path;

/// Parse a PPTX file and return the reconstructed [`Presentation`].
///
/// # Example
///
/// ```no_run
/// use slidescene::parse_file;
///
/// let presentation = parse_file("deck.pptx")?;
/// println!("Slides: {}", presentation.slides.len());
/// # Ok::<(), slidescene::Error>(())
/// ```
pub fn parse_file(path: impl AsRef<Path>) -> Result<Presentation> {
    PresentationParser::open(path)?.parse()
}

/// Parse a PPTX package from bytes.
///
/// # Example
///
/// ```no_run
/// use slidescene::parse_bytes;
///
/// let data = std::fs::read("deck.pptx")?;
/// let presentation = parse_bytes(&data)?;
/// # Ok::<(), slidescene::Error>(())
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<Presentation> {
    PresentationParser::from_bytes(data.to_vec())?.parse()
}
