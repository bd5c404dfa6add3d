//! Caption compositing and interactive crop engine.
//!
//! The crate renders a captioned image frame from four inputs: a decoded
//! source bitmap, the caption text, a style parameter set and a filter
//! selection. Around that core it carries the interaction state machines the
//! editing surface needs: an interactive crop session, a 90-degree rotate
//! and a PNG export path.
//!
//! [`EditSession`] is the facade; the modules underneath are usable on their
//! own (the compositor, the filter engine, the text layout engine).

#![forbid(unsafe_code)]

pub mod assets;
pub mod crop;
pub mod effects;
pub mod export;
pub mod foundation;
pub mod geometry;
pub mod params;
pub mod render;
pub mod rotate;
pub mod session;
pub mod text;

pub use assets::color::Color;
pub use assets::decode::{ImageGeneration, SourceImage, decode_image};
pub use crop::{CropArea, CropSession, Handle};
pub use effects::filter::FilterId;
pub use export::ExportArtifact;
pub use foundation::core::{Canvas, Point, Rect, Rgba8, Size, Vec2};
pub use foundation::error::{CaptixError, CaptixResult};
pub use geometry::{ViewportFit, fit_viewport};
pub use params::StyleParams;
pub use render::compositor::{Scene, render_scene};
pub use render::surface::Surface;
pub use session::{EditSession, Frame};
pub use text::typeface::{GlyphTypeface, Typeface};
