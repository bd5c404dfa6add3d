use crate::effects::grade::{bloom, cinematic_grade, grain, vignette};
use crate::effects::ops::{FilterOp, apply_ops};
use crate::foundation::error::CaptixResult;
use crate::render::surface::Surface;

/// The closed set of selectable filters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterId {
    #[default]
    None,
    Cinematic,
    Grainy,
    Grayscale,
    Sepia,
    Blur,
    Brightness,
    Contrast,
    Saturate,
    Invert,
}

/// How a filter is executed.
///
/// `Simple` filters are a single chain of composable color primitives applied
/// during the blit; `MultiPass` filters additionally read back and mutate
/// pixel data across ordered stages. Adding a filter is a variant addition
/// here, not a string-map edit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterKind {
    Simple(&'static [FilterOp]),
    MultiPass(&'static [FilterStage]),
}

/// One stage of a multi-pass filter. Stages are cumulative and
/// order-dependent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterStage {
    /// A chain of simple color primitives.
    Ops(&'static [FilterOp]),
    /// Luminance-keyed cinematic color grade.
    CinematicGrade,
    /// Screen-blend a blurred, brightened copy back over the image.
    Bloom {
        sigma: f32,
        brightness: f32,
        opacity: f32,
    },
    /// Seeded uniform per-channel noise.
    Grain { amplitude: i32 },
    /// Radial darkening ramp toward the corners.
    Vignette { start: f32, max_alpha: f32 },
}

const CINEMATIC_PRE: &[FilterOp] = &[
    FilterOp::Contrast(1.4),
    FilterOp::Saturate(1.3),
    FilterOp::Brightness(0.95),
];

const GRAINY_PRE: &[FilterOp] = &[
    FilterOp::Saturate(0.6),
    FilterOp::Brightness(1.1),
    FilterOp::Contrast(0.9),
];

const CINEMATIC_STAGES: &[FilterStage] = &[
    FilterStage::Ops(CINEMATIC_PRE),
    FilterStage::CinematicGrade,
    FilterStage::Bloom {
        sigma: 8.0,
        brightness: 1.3,
        opacity: 0.3,
    },
    FilterStage::Vignette {
        start: 0.7,
        max_alpha: 0.5,
    },
];

const GRAINY_STAGES: &[FilterStage] = &[
    FilterStage::Ops(GRAINY_PRE),
    FilterStage::Grain { amplitude: 15 },
    FilterStage::Vignette {
        start: 0.8,
        max_alpha: 0.3,
    },
];

impl FilterId {
    /// Resolve the execution strategy for this filter.
    pub fn kind(self) -> FilterKind {
        match self {
            FilterId::None => FilterKind::Simple(&[]),
            FilterId::Cinematic => FilterKind::MultiPass(CINEMATIC_STAGES),
            FilterId::Grainy => FilterKind::MultiPass(GRAINY_STAGES),
            FilterId::Grayscale => FilterKind::Simple(&[FilterOp::Grayscale]),
            FilterId::Sepia => FilterKind::Simple(&[FilterOp::Sepia]),
            FilterId::Blur => FilterKind::Simple(&[FilterOp::Blur { sigma: 4.0 }]),
            FilterId::Brightness => FilterKind::Simple(&[FilterOp::Brightness(1.2)]),
            FilterId::Contrast => FilterKind::Simple(&[FilterOp::Contrast(1.2)]),
            FilterId::Saturate => FilterKind::Simple(&[FilterOp::Saturate(1.5)]),
            FilterId::Invert => FilterKind::Simple(&[FilterOp::Invert]),
        }
    }
}

/// Run a filter over the image layer.
///
/// The layer is the image's own surface, filtered before it is blitted under
/// the caption; filter state therefore cannot leak into later paint
/// operations. `noise_seed` drives the grain stage and is ignored by every
/// other filter.
pub fn apply_filter(surface: &mut Surface, id: FilterId, noise_seed: u64) -> CaptixResult<()> {
    match id.kind() {
        FilterKind::Simple(ops) => apply_ops(surface, ops),
        FilterKind::MultiPass(stages) => {
            for stage in stages {
                match *stage {
                    FilterStage::Ops(ops) => apply_ops(surface, ops)?,
                    FilterStage::CinematicGrade => cinematic_grade(surface),
                    FilterStage::Bloom {
                        sigma,
                        brightness,
                        opacity,
                    } => bloom(surface, sigma, brightness, opacity)?,
                    FilterStage::Grain { amplitude } => grain(surface, amplitude, noise_seed),
                    FilterStage::Vignette { start, max_alpha } => {
                        vignette(surface, start, max_alpha)
                    }
                }
            }
            Ok(())
        }
    }
}
